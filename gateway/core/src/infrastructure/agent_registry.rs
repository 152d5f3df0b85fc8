// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! In-process agent registry.
//!
//! Holds registrations in a [`DashMap`] and forwards every received metric to
//! the storage backend one at a time.

use async_trait::async_trait;
use dashmap::DashMap;
use futures::stream::{BoxStream, StreamExt};
use std::sync::Arc;
use tracing::{debug, info};

use crate::application::agent::AgentRegistry;
use crate::application::errors::{check_context, ServiceError};
use crate::application::storage::StorageService;
use crate::domain::agent::{
    AgentId, AgentItem, AgentStatus, MetricsReceipt, RegisterAgentRequest, RegisterAgentResponse,
    UnregisterAgentResponse,
};
use crate::domain::context::RequestContext;
use crate::domain::stat::StatMetric;

pub struct InMemoryAgentRegistry {
    agents: DashMap<AgentId, AgentItem>,
    storage: Arc<dyn StorageService>,
}

impl InMemoryAgentRegistry {
    pub fn new(storage: Arc<dyn StorageService>) -> Self {
        Self {
            agents: DashMap::new(),
            storage,
        }
    }

    fn sorted(mut agents: Vec<AgentItem>) -> Vec<AgentItem> {
        agents.sort_by(|a, b| a.agent_name.cmp(&b.agent_name).then_with(|| a.id.cmp(&b.id)));
        agents
    }
}

#[async_trait]
impl AgentRegistry for InMemoryAgentRegistry {
    async fn register(
        &self,
        _ctx: &RequestContext,
        request: RegisterAgentRequest,
    ) -> Result<RegisterAgentResponse, ServiceError> {
        if request.agent_name.trim().is_empty() {
            return Err(ServiceError::Validation("agent name must not be empty".to_string()));
        }
        let id = AgentId::new();
        info!(agent_id = %id, agent_name = %request.agent_name, "agent registered");
        self.agents.insert(
            id.clone(),
            AgentItem {
                id: id.clone(),
                agent_name: request.agent_name,
                status: AgentStatus::Registered,
                host_info: request.host_info,
            },
        );
        Ok(RegisterAgentResponse { id })
    }

    async fn unregister(
        &self,
        _ctx: &RequestContext,
        id: &AgentId,
    ) -> Result<UnregisterAgentResponse, ServiceError> {
        self.agents
            .remove(id)
            .map(|(id, _)| UnregisterAgentResponse { id })
            .ok_or_else(|| ServiceError::internal(format!("agent {} not found", id)))
    }

    async fn get_by_agent_name(
        &self,
        _ctx: &RequestContext,
        agent_name: &str,
    ) -> Result<Vec<AgentItem>, ServiceError> {
        Ok(Self::sorted(
            self.agents
                .iter()
                .filter(|entry| entry.agent_name == agent_name)
                .map(|entry| entry.value().clone())
                .collect(),
        ))
    }

    async fn get_agent_by_id(&self, _ctx: &RequestContext, id: &AgentId) -> Result<AgentItem, ServiceError> {
        self.agents
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ServiceError::internal(format!("agent {} not found", id)))
    }

    async fn get_agent_list(&self, _ctx: &RequestContext) -> Result<Vec<AgentItem>, ServiceError> {
        Ok(Self::sorted(self.agents.iter().map(|entry| entry.value().clone()).collect()))
    }

    async fn send_metrics(
        &self,
        ctx: &RequestContext,
        mut metrics: BoxStream<'static, StatMetric>,
    ) -> Result<MetricsReceipt, ServiceError> {
        let mut receipt = MetricsReceipt::default();
        loop {
            let next = tokio::select! {
                next = metrics.next() => next,
                _ = ctx.cancellation_token().cancelled() => return Err(ServiceError::Cancelled),
            };
            let Some(metric) = next else { break };
            check_context(ctx)?;
            if let Some(mut agent) = self.agents.get_mut(&metric.agent_id) {
                agent.status = AgentStatus::Running;
            }
            self.storage.save_stat_metric(ctx, metric).await?;
            receipt.accepted += 1;
        }
        debug!(accepted = receipt.accepted, "metric stream closed");
        Ok(receipt)
    }
}
