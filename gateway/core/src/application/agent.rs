// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::application::errors::ServiceError;
use crate::domain::agent::{
    AgentId, AgentItem, MetricsReceipt, RegisterAgentRequest, RegisterAgentResponse,
    UnregisterAgentResponse,
};
use crate::domain::context::RequestContext;
use crate::domain::stat::StatMetric;

/// Agent registration and metric intake, owned by its own backend.
#[async_trait]
pub trait AgentRegistry: Send + Sync {
    async fn register(
        &self,
        ctx: &RequestContext,
        request: RegisterAgentRequest,
    ) -> Result<RegisterAgentResponse, ServiceError>;

    async fn unregister(
        &self,
        ctx: &RequestContext,
        id: &AgentId,
    ) -> Result<UnregisterAgentResponse, ServiceError>;

    async fn get_by_agent_name(
        &self,
        ctx: &RequestContext,
        agent_name: &str,
    ) -> Result<Vec<AgentItem>, ServiceError>;

    async fn get_agent_by_id(&self, ctx: &RequestContext, id: &AgentId) -> Result<AgentItem, ServiceError>;

    async fn get_agent_list(&self, ctx: &RequestContext) -> Result<Vec<AgentItem>, ServiceError>;

    /// Consume a stream of samples and acknowledge once it ends.
    async fn send_metrics(
        &self,
        ctx: &RequestContext,
        metrics: BoxStream<'static, StatMetric>,
    ) -> Result<MetricsReceipt, ServiceError>;
}
