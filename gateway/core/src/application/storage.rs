// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Storage Façade
//!
//! Ingestion and retrieval of telemetry. Writes are acknowledged only after
//! the store confirms them; nothing is buffered or batched here. Every
//! failure leaves through [`wrap`](crate::application::errors::wrap).
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Storage backend capability group
//! - **Collaborators:** `StatDispatcher`, `TransactionAssembler`, `TelemetryRepository`

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::application::errors::{check_context, wrap, ServiceError};
use crate::application::stat_dispatcher::StatDispatcher;
use crate::application::transaction_assembler::TransactionAssembler;
use crate::domain::context::RequestContext;
use crate::domain::repository::TelemetryRepository;
use crate::domain::snapshot::{
    SchedulerInformation, SchedulerInformationQuery, SchedulerUptime, SchedulerUptimeQuery, Snapshot,
};
use crate::domain::stat::{AgentInformation, AgentStatQuery, StatMetric};
use crate::domain::transaction::{
    TransactionFilter, TransactionGroupFilter, TransactionGroups, TransactionId, TransactionInfo,
    TransactionPage, TransactionTree,
};

#[async_trait]
pub trait StorageService: Send + Sync {
    async fn save_snapshot(&self, ctx: &RequestContext, snapshot: Snapshot) -> Result<(), ServiceError>;

    async fn save_stat_metric(&self, ctx: &RequestContext, metric: StatMetric) -> Result<(), ServiceError>;

    async fn save_transaction(&self, ctx: &RequestContext, info: TransactionInfo) -> Result<(), ServiceError>;

    async fn get_scheduler_information(
        &self,
        ctx: &RequestContext,
        query: &SchedulerInformationQuery,
    ) -> Result<SchedulerInformation, ServiceError>;

    async fn get_scheduler_uptime(
        &self,
        ctx: &RequestContext,
        query: &SchedulerUptimeQuery,
    ) -> Result<SchedulerUptime, ServiceError>;

    async fn get_agent_information(
        &self,
        ctx: &RequestContext,
        query: &AgentStatQuery,
    ) -> Result<AgentInformation, ServiceError>;

    async fn get_transactions(
        &self,
        ctx: &RequestContext,
        filter: &TransactionFilter,
    ) -> Result<TransactionPage, ServiceError>;

    async fn get_transaction_by_id(
        &self,
        ctx: &RequestContext,
        id: &TransactionId,
    ) -> Result<TransactionTree, ServiceError>;

    async fn get_transactions_group(
        &self,
        ctx: &RequestContext,
        filter: &TransactionGroupFilter,
    ) -> Result<TransactionGroups, ServiceError>;
}

pub struct StandardStorageService {
    repository: Arc<dyn TelemetryRepository>,
    dispatcher: StatDispatcher,
    transactions: TransactionAssembler,
}

impl StandardStorageService {
    pub fn new(repository: Arc<dyn TelemetryRepository>) -> Self {
        Self {
            dispatcher: StatDispatcher::new(repository.clone()),
            transactions: TransactionAssembler::new(repository.clone()),
            repository,
        }
    }
}

#[async_trait]
impl StorageService for StandardStorageService {
    async fn save_snapshot(&self, ctx: &RequestContext, snapshot: Snapshot) -> Result<(), ServiceError> {
        check_context(ctx)?;
        debug!(scheduler_id = %snapshot.scheduler_id, "saving snapshot");
        wrap(self.repository.insert_snapshot(ctx, &snapshot).await)
    }

    async fn save_stat_metric(&self, ctx: &RequestContext, metric: StatMetric) -> Result<(), ServiceError> {
        check_context(ctx)?;
        debug!(agent_id = %metric.agent_id, "saving stat metric");
        wrap(self.repository.insert_stat_metric(ctx, &metric).await)
    }

    async fn save_transaction(&self, ctx: &RequestContext, info: TransactionInfo) -> Result<(), ServiceError> {
        check_context(ctx)?;
        debug!(transaction_id = %info.id, application_id = %info.application_id, "saving transaction");
        wrap(self.repository.insert_transaction_info(ctx, &info).await)
    }

    async fn get_scheduler_information(
        &self,
        ctx: &RequestContext,
        query: &SchedulerInformationQuery,
    ) -> Result<SchedulerInformation, ServiceError> {
        check_context(ctx)?;
        wrap(self.repository.get_snapshots(ctx, query).await)
    }

    async fn get_scheduler_uptime(
        &self,
        ctx: &RequestContext,
        query: &SchedulerUptimeQuery,
    ) -> Result<SchedulerUptime, ServiceError> {
        check_context(ctx)?;
        wrap(self.repository.get_snapshots_uptime(ctx, query).await)
    }

    async fn get_agent_information(
        &self,
        ctx: &RequestContext,
        query: &AgentStatQuery,
    ) -> Result<AgentInformation, ServiceError> {
        self.dispatcher.dispatch(ctx, query).await
    }

    async fn get_transactions(
        &self,
        ctx: &RequestContext,
        filter: &TransactionFilter,
    ) -> Result<TransactionPage, ServiceError> {
        self.transactions.get_transactions(ctx, filter).await
    }

    async fn get_transaction_by_id(
        &self,
        ctx: &RequestContext,
        id: &TransactionId,
    ) -> Result<TransactionTree, ServiceError> {
        self.transactions.get_transaction_by_id(ctx, id).await
    }

    async fn get_transactions_group(
        &self,
        ctx: &RequestContext,
        filter: &TransactionGroupFilter,
    ) -> Result<TransactionGroups, ServiceError> {
        self.transactions.get_transactions_group(ctx, filter).await
    }
}
