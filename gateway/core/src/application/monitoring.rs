// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use async_trait::async_trait;

use crate::application::errors::ServiceError;
use crate::domain::context::RequestContext;
use crate::domain::scheduler::{AddSchedulerRequest, Scheduler, SchedulerAck, SchedulerId};

#[async_trait]
pub trait MonitoringControl: Send + Sync {
    async fn get_scheduler_list(&self, ctx: &RequestContext) -> Result<Vec<Scheduler>, ServiceError>;

    async fn get_scheduler_by_id(&self, ctx: &RequestContext, id: &SchedulerId) -> Result<Scheduler, ServiceError>;

    async fn add(&self, ctx: &RequestContext, request: AddSchedulerRequest) -> Result<SchedulerAck, ServiceError>;

    async fn remove(&self, ctx: &RequestContext, id: &SchedulerId) -> Result<SchedulerAck, ServiceError>;

    async fn run(&self, ctx: &RequestContext, id: &SchedulerId) -> Result<SchedulerAck, ServiceError>;

    async fn stop(&self, ctx: &RequestContext, id: &SchedulerId) -> Result<SchedulerAck, ServiceError>;
}
