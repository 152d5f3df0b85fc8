// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! In-process scheduler control. Keeps scheduler definitions and their
//! run state; executing the checks themselves belongs to the scheduler
//! runtime and is not done here.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::info;

use crate::application::errors::ServiceError;
use crate::application::monitoring::MonitoringControl;
use crate::domain::context::RequestContext;
use crate::domain::scheduler::{AddSchedulerRequest, Scheduler, SchedulerAck, SchedulerId, SchedulerStatus};

#[derive(Default)]
pub struct InMemoryMonitoringControl {
    schedulers: RwLock<BTreeMap<SchedulerId, Scheduler>>,
}

impl InMemoryMonitoringControl {
    pub fn new() -> Self {
        Self::default()
    }

    fn set_status(&self, id: &SchedulerId, status: SchedulerStatus) -> Result<SchedulerAck, ServiceError> {
        let mut schedulers = self.schedulers.write();
        let scheduler = schedulers
            .get_mut(id)
            .ok_or_else(|| ServiceError::internal(format!("scheduler {} not found", id)))?;
        scheduler.status = status;
        info!(scheduler_id = %id, ?status, "scheduler status changed");
        Ok(SchedulerAck { id: id.clone() })
    }
}

#[async_trait]
impl MonitoringControl for InMemoryMonitoringControl {
    async fn get_scheduler_list(&self, _ctx: &RequestContext) -> Result<Vec<Scheduler>, ServiceError> {
        Ok(self.schedulers.read().values().cloned().collect())
    }

    async fn get_scheduler_by_id(&self, _ctx: &RequestContext, id: &SchedulerId) -> Result<Scheduler, ServiceError> {
        self.schedulers
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| ServiceError::internal(format!("scheduler {} not found", id)))
    }

    async fn add(&self, _ctx: &RequestContext, request: AddSchedulerRequest) -> Result<SchedulerAck, ServiceError> {
        if request.interval_secs == 0 {
            return Err(ServiceError::Validation("interval must be greater than zero".to_string()));
        }
        if request.timeout_secs == 0 || request.timeout_secs > request.interval_secs {
            return Err(ServiceError::Validation(
                "timeout must be between 1 and the interval".to_string(),
            ));
        }

        let scheduler = Scheduler {
            id: SchedulerId::new(),
            name: request.name,
            interval_secs: request.interval_secs,
            timeout_secs: request.timeout_secs,
            status: SchedulerStatus::Stopped,
            config: request.config,
        };
        let id = scheduler.id.clone();
        info!(scheduler_id = %id, check_type = ?scheduler.config.check_type(), "scheduler added");
        self.schedulers.write().insert(id.clone(), scheduler);
        Ok(SchedulerAck { id })
    }

    async fn remove(&self, _ctx: &RequestContext, id: &SchedulerId) -> Result<SchedulerAck, ServiceError> {
        self.schedulers
            .write()
            .remove(id)
            .map(|_| SchedulerAck { id: id.clone() })
            .ok_or_else(|| ServiceError::internal(format!("scheduler {} not found", id)))
    }

    async fn run(&self, _ctx: &RequestContext, id: &SchedulerId) -> Result<SchedulerAck, ServiceError> {
        self.set_status(id, SchedulerStatus::Running)
    }

    async fn stop(&self, _ctx: &RequestContext, id: &SchedulerId) -> Result<SchedulerAck, ServiceError> {
        self.set_status(id, SchedulerStatus::Stopped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scheduler::SchedulerConfig;

    fn tcp(interval_secs: u32, timeout_secs: u32) -> AddSchedulerRequest {
        AddSchedulerRequest {
            name: Some("db".to_string()),
            interval_secs,
            timeout_secs,
            config: SchedulerConfig::Tcp { host: "db.local".to_string(), port: 5432 },
        }
    }

    #[tokio::test]
    async fn test_add_run_stop_remove() {
        let control = InMemoryMonitoringControl::new();
        let ctx = RequestContext::new();
        let ack = control.add(&ctx, tcp(60, 5)).await.unwrap();

        assert_eq!(control.get_scheduler_by_id(&ctx, &ack.id).await.unwrap().status, SchedulerStatus::Stopped);
        control.run(&ctx, &ack.id).await.unwrap();
        assert_eq!(control.get_scheduler_by_id(&ctx, &ack.id).await.unwrap().status, SchedulerStatus::Running);
        control.stop(&ctx, &ack.id).await.unwrap();
        assert_eq!(control.get_scheduler_by_id(&ctx, &ack.id).await.unwrap().status, SchedulerStatus::Stopped);

        control.remove(&ctx, &ack.id).await.unwrap();
        assert!(control.get_scheduler_list(&ctx).await.unwrap().is_empty());
        assert!(control.run(&ctx, &ack.id).await.unwrap_err().is_internal());
    }

    #[tokio::test]
    async fn test_add_rejects_bad_timing() {
        let control = InMemoryMonitoringControl::new();
        let ctx = RequestContext::new();
        assert!(control.add(&ctx, tcp(0, 0)).await.unwrap_err().is_validation());
        assert!(control.add(&ctx, tcp(10, 30)).await.unwrap_err().is_validation());
    }
}
