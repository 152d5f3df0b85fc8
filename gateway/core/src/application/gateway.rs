// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Gateway Façade
//!
//! One external surface over four independently owned backend groups. Every
//! operation makes exactly one backend call and hands its result back
//! unchanged; scalar arguments are repackaged into typed ids on the way in.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Compose `AgentRegistry`, `MonitoringControl`, `StorageService`
//!   and `ApplicationLifecycle`
//! - **Related:** `presentation::api` (HTTP routes, one per operation)

use futures::stream::BoxStream;
use metrics::counter;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

use crate::application::agent::AgentRegistry;
use crate::application::errors::{check_context, ServiceError};
use crate::application::lifecycle::ApplicationLifecycle;
use crate::application::monitoring::MonitoringControl;
use crate::application::storage::StorageService;
use crate::domain::agent::{
    AgentId, AgentItem, MetricsReceipt, RegisterAgentRequest, RegisterAgentResponse,
    UnregisterAgentResponse,
};
use crate::domain::application::{Application, ApplicationId, ApplicationInfo, InitializedApplication};
use crate::domain::context::RequestContext;
use crate::domain::scheduler::{AddSchedulerRequest, Scheduler, SchedulerAck, SchedulerId};
use crate::domain::snapshot::{
    SchedulerInformation, SchedulerInformationQuery, SchedulerUptime, SchedulerUptimeQuery,
};
use crate::domain::stat::{AgentInformation, AgentStatQuery, StatMetric};
use crate::domain::transaction::{
    TransactionFilter, TransactionGroupFilter, TransactionGroups, TransactionId, TransactionInfo,
    TransactionPage, TransactionTree,
};

pub const REQUESTS_METRIC: &str = "vantage_gateway_requests_total";
pub const FAILURES_METRIC: &str = "vantage_gateway_failures_total";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendGroup {
    AgentRegistry,
    Monitoring,
    Storage,
    ApplicationLifecycle,
}

impl BackendGroup {
    pub fn as_str(self) -> &'static str {
        match self {
            BackendGroup::AgentRegistry => "agent_registry",
            BackendGroup::Monitoring => "monitoring",
            BackendGroup::Storage => "storage",
            BackendGroup::ApplicationLifecycle => "application_lifecycle",
        }
    }
}

#[derive(Clone)]
pub struct Gateway {
    agents: Arc<dyn AgentRegistry>,
    monitoring: Arc<dyn MonitoringControl>,
    storage: Arc<dyn StorageService>,
    applications: Arc<dyn ApplicationLifecycle>,
}

impl Gateway {
    pub fn new(
        agents: Arc<dyn AgentRegistry>,
        monitoring: Arc<dyn MonitoringControl>,
        storage: Arc<dyn StorageService>,
        applications: Arc<dyn ApplicationLifecycle>,
    ) -> Self {
        Self {
            agents,
            monitoring,
            storage,
            applications,
        }
    }

    async fn delegate<T, F, Fut>(
        &self,
        ctx: &RequestContext,
        operation: &'static str,
        backend: BackendGroup,
        call: F,
    ) -> Result<T, ServiceError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ServiceError>>,
    {
        counter!(REQUESTS_METRIC, "operation" => operation, "backend" => backend.as_str()).increment(1);
        debug!(operation, backend = backend.as_str(), "delegating");

        let result = match check_context(ctx) {
            Ok(()) => call().await,
            Err(err) => Err(err),
        };
        if let Err(err) = &result {
            counter!(FAILURES_METRIC, "operation" => operation, "backend" => backend.as_str()).increment(1);
            debug!(operation, backend = backend.as_str(), error = %err, "backend call failed");
        }
        result
    }

    // Agent registry

    pub async fn register_agent(
        &self,
        ctx: &RequestContext,
        request: RegisterAgentRequest,
    ) -> Result<RegisterAgentResponse, ServiceError> {
        self.delegate(ctx, "register_agent", BackendGroup::AgentRegistry, || {
            self.agents.register(ctx, request)
        })
        .await
    }

    pub async fn unregister_agent(
        &self,
        ctx: &RequestContext,
        id: impl Into<AgentId>,
    ) -> Result<UnregisterAgentResponse, ServiceError> {
        let id = id.into();
        self.delegate(ctx, "unregister_agent", BackendGroup::AgentRegistry, || {
            self.agents.unregister(ctx, &id)
        })
        .await
    }

    pub async fn get_agent_by_id(
        &self,
        ctx: &RequestContext,
        id: impl Into<AgentId>,
    ) -> Result<AgentItem, ServiceError> {
        let id = id.into();
        self.delegate(ctx, "get_agent_by_id", BackendGroup::AgentRegistry, || {
            self.agents.get_agent_by_id(ctx, &id)
        })
        .await
    }

    pub async fn get_agents_by_name(
        &self,
        ctx: &RequestContext,
        agent_name: &str,
    ) -> Result<Vec<AgentItem>, ServiceError> {
        self.delegate(ctx, "get_agents_by_name", BackendGroup::AgentRegistry, || {
            self.agents.get_by_agent_name(ctx, agent_name)
        })
        .await
    }

    pub async fn get_agent_list(&self, ctx: &RequestContext) -> Result<Vec<AgentItem>, ServiceError> {
        self.delegate(ctx, "get_agent_list", BackendGroup::AgentRegistry, || {
            self.agents.get_agent_list(ctx)
        })
        .await
    }

    /// Forward an agent's metric stream to the registry as-is
    pub async fn send_agent_metrics(
        &self,
        ctx: &RequestContext,
        metrics: BoxStream<'static, StatMetric>,
    ) -> Result<MetricsReceipt, ServiceError> {
        self.delegate(ctx, "send_agent_metrics", BackendGroup::AgentRegistry, || {
            self.agents.send_metrics(ctx, metrics)
        })
        .await
    }

    // Monitoring

    pub async fn get_scheduler_list(&self, ctx: &RequestContext) -> Result<Vec<Scheduler>, ServiceError> {
        self.delegate(ctx, "get_scheduler_list", BackendGroup::Monitoring, || {
            self.monitoring.get_scheduler_list(ctx)
        })
        .await
    }

    pub async fn get_scheduler_by_id(
        &self,
        ctx: &RequestContext,
        id: impl Into<SchedulerId>,
    ) -> Result<Scheduler, ServiceError> {
        let id = id.into();
        self.delegate(ctx, "get_scheduler_by_id", BackendGroup::Monitoring, || {
            self.monitoring.get_scheduler_by_id(ctx, &id)
        })
        .await
    }

    pub async fn add_scheduler(
        &self,
        ctx: &RequestContext,
        request: AddSchedulerRequest,
    ) -> Result<SchedulerAck, ServiceError> {
        self.delegate(ctx, "add_scheduler", BackendGroup::Monitoring, || {
            self.monitoring.add(ctx, request)
        })
        .await
    }

    pub async fn remove_scheduler(
        &self,
        ctx: &RequestContext,
        id: impl Into<SchedulerId>,
    ) -> Result<SchedulerAck, ServiceError> {
        let id = id.into();
        self.delegate(ctx, "remove_scheduler", BackendGroup::Monitoring, || {
            self.monitoring.remove(ctx, &id)
        })
        .await
    }

    pub async fn run_scheduler(
        &self,
        ctx: &RequestContext,
        id: impl Into<SchedulerId>,
    ) -> Result<SchedulerAck, ServiceError> {
        let id = id.into();
        self.delegate(ctx, "run_scheduler", BackendGroup::Monitoring, || {
            self.monitoring.run(ctx, &id)
        })
        .await
    }

    pub async fn stop_scheduler(
        &self,
        ctx: &RequestContext,
        id: impl Into<SchedulerId>,
    ) -> Result<SchedulerAck, ServiceError> {
        let id = id.into();
        self.delegate(ctx, "stop_scheduler", BackendGroup::Monitoring, || {
            self.monitoring.stop(ctx, &id)
        })
        .await
    }

    // Storage

    pub async fn get_agent_history_by_id(
        &self,
        ctx: &RequestContext,
        query: AgentStatQuery,
    ) -> Result<AgentInformation, ServiceError> {
        self.delegate(ctx, "get_agent_history_by_id", BackendGroup::Storage, || {
            self.storage.get_agent_information(ctx, &query)
        })
        .await
    }

    pub async fn get_scheduler_history_by_id(
        &self,
        ctx: &RequestContext,
        query: SchedulerInformationQuery,
    ) -> Result<SchedulerInformation, ServiceError> {
        self.delegate(ctx, "get_scheduler_history_by_id", BackendGroup::Storage, || {
            self.storage.get_scheduler_information(ctx, &query)
        })
        .await
    }

    pub async fn get_scheduler_uptime(
        &self,
        ctx: &RequestContext,
        query: SchedulerUptimeQuery,
    ) -> Result<SchedulerUptime, ServiceError> {
        self.delegate(ctx, "get_scheduler_uptime", BackendGroup::Storage, || {
            self.storage.get_scheduler_uptime(ctx, &query)
        })
        .await
    }

    pub async fn get_transaction_by_id(
        &self,
        ctx: &RequestContext,
        id: impl Into<TransactionId>,
    ) -> Result<TransactionTree, ServiceError> {
        let id = id.into();
        self.delegate(ctx, "get_transaction_by_id", BackendGroup::Storage, || {
            self.storage.get_transaction_by_id(ctx, &id)
        })
        .await
    }

    pub async fn get_transaction_groups(
        &self,
        ctx: &RequestContext,
        filter: TransactionGroupFilter,
    ) -> Result<TransactionGroups, ServiceError> {
        self.delegate(ctx, "get_transaction_groups", BackendGroup::Storage, || {
            self.storage.get_transactions_group(ctx, &filter)
        })
        .await
    }

    pub async fn get_transactions_list(
        &self,
        ctx: &RequestContext,
        filter: TransactionFilter,
    ) -> Result<TransactionPage, ServiceError> {
        self.delegate(ctx, "get_transactions_list", BackendGroup::Storage, || {
            self.storage.get_transactions(ctx, &filter)
        })
        .await
    }

    // Application lifecycle

    pub async fn register_application(
        &self,
        ctx: &RequestContext,
        info: ApplicationInfo,
    ) -> Result<InitializedApplication, ServiceError> {
        self.delegate(ctx, "register_application", BackendGroup::ApplicationLifecycle, || {
            self.applications.initialize_application(ctx, info)
        })
        .await
    }

    pub async fn save_transaction(&self, ctx: &RequestContext, info: TransactionInfo) -> Result<(), ServiceError> {
        self.delegate(ctx, "save_transaction", BackendGroup::ApplicationLifecycle, || {
            self.applications.save_transaction(ctx, info)
        })
        .await
    }

    pub async fn get_application_by_id(
        &self,
        ctx: &RequestContext,
        id: impl Into<ApplicationId>,
    ) -> Result<Application, ServiceError> {
        let id = id.into();
        self.delegate(ctx, "get_application_by_id", BackendGroup::ApplicationLifecycle, || {
            self.applications.get_application_by_id(ctx, &id)
        })
        .await
    }

    pub async fn get_application_list(&self, ctx: &RequestContext) -> Result<Vec<Application>, ServiceError> {
        self.delegate(ctx, "get_application_list", BackendGroup::ApplicationLifecycle, || {
            self.applications.get_application_list(ctx)
        })
        .await
    }

    pub async fn get_application_list_by_agent_id(
        &self,
        ctx: &RequestContext,
        agent_id: impl Into<AgentId>,
    ) -> Result<Vec<Application>, ServiceError> {
        let agent_id = agent_id.into();
        self.delegate(
            ctx,
            "get_application_list_by_agent_id",
            BackendGroup::ApplicationLifecycle,
            || self.applications.get_application_list_by_agent_id(ctx, &agent_id),
        )
        .await
    }

    pub async fn archive_application_by_id(
        &self,
        ctx: &RequestContext,
        id: impl Into<ApplicationId>,
    ) -> Result<(), ServiceError> {
        let id = id.into();
        self.delegate(ctx, "archive_application_by_id", BackendGroup::ApplicationLifecycle, || {
            self.applications.archive_application_by_id(ctx, &id)
        })
        .await
    }

    pub async fn enable_application_by_id(
        &self,
        ctx: &RequestContext,
        id: impl Into<ApplicationId>,
    ) -> Result<(), ServiceError> {
        let id = id.into();
        self.delegate(ctx, "enable_application_by_id", BackendGroup::ApplicationLifecycle, || {
            self.applications.enable_application_by_id(ctx, &id)
        })
        .await
    }

    pub async fn disable_application_by_id(
        &self,
        ctx: &RequestContext,
        id: impl Into<ApplicationId>,
    ) -> Result<(), ServiceError> {
        let id = id.into();
        self.delegate(ctx, "disable_application_by_id", BackendGroup::ApplicationLifecycle, || {
            self.applications.disable_application_by_id(ctx, &id)
        })
        .await
    }
}
