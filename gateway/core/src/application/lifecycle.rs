// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Application Lifecycle backend group.
//!
//! Registration of instrumented applications, their status transitions and
//! the transaction intake they report through.

use async_trait::async_trait;

use crate::application::errors::ServiceError;
use crate::domain::agent::AgentId;
use crate::domain::application::{Application, ApplicationId, ApplicationInfo, InitializedApplication};
use crate::domain::context::RequestContext;
use crate::domain::transaction::TransactionInfo;

#[async_trait]
pub trait ApplicationLifecycle: Send + Sync {
    async fn initialize_application(
        &self,
        ctx: &RequestContext,
        info: ApplicationInfo,
    ) -> Result<InitializedApplication, ServiceError>;

    async fn save_transaction(&self, ctx: &RequestContext, info: TransactionInfo) -> Result<(), ServiceError>;

    async fn get_application_by_id(
        &self,
        ctx: &RequestContext,
        id: &ApplicationId,
    ) -> Result<Application, ServiceError>;

    async fn get_application_list(&self, ctx: &RequestContext) -> Result<Vec<Application>, ServiceError>;

    async fn get_application_list_by_agent_id(
        &self,
        ctx: &RequestContext,
        agent_id: &AgentId,
    ) -> Result<Vec<Application>, ServiceError>;

    async fn archive_application_by_id(&self, ctx: &RequestContext, id: &ApplicationId) -> Result<(), ServiceError>;

    async fn enable_application_by_id(&self, ctx: &RequestContext, id: &ApplicationId) -> Result<(), ServiceError>;

    async fn disable_application_by_id(&self, ctx: &RequestContext, id: &ApplicationId) -> Result<(), ServiceError>;
}
