// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Persistence Contract
//!
//! The fixed set of insert/query operations the gateway consumes from the
//! telemetry store. The store itself (schema, indexing, retention) is an
//! external dependency; the gateway only shapes and routes requests to it.
//!
//! | Entity | Write | Read |
//! |--------|-------|------|
//! | `Snapshot` | `insert_snapshot` | `get_snapshots`, `get_snapshots_uptime` |
//! | `StatMetric` | `insert_stat_metric` | `get_{stat,cpu,memory,disk,net}_info` |
//! | `TransactionInfo` | `insert_transaction_info` | `get_transaction_info`, `get_transaction_by_id`, `get_transaction_group` |
//!
//! Every read that returns a page also returns the total number of matching
//! records, independent of page size.
//!
//! Implementations live in `crate::infrastructure::repositories`.

use async_trait::async_trait;

use crate::domain::context::RequestContext;
use crate::domain::snapshot::{
    SchedulerInformation, SchedulerInformationQuery, SchedulerUptime, SchedulerUptimeQuery, Snapshot,
};
use crate::domain::stat::{AgentInformation, StatMetric, StatWindow};
use crate::domain::transaction::{
    TransactionFilter, TransactionGroupFilter, TransactionGroups, TransactionId, TransactionInfo,
    TransactionPage, TransactionTree,
};

/// Telemetry store consumed by the storage façade.
///
/// The request context is forwarded verbatim so implementations backed by a
/// remote store can honour caller cancellation and deadlines.
#[async_trait]
pub trait TelemetryRepository: Send + Sync {
    /// Persist one scheduler result; returns once the write is durable
    async fn insert_snapshot(&self, ctx: &RequestContext, snapshot: &Snapshot) -> Result<(), RepositoryError>;

    /// Persist one agent resource sample
    async fn insert_stat_metric(&self, ctx: &RequestContext, metric: &StatMetric) -> Result<(), RepositoryError>;

    /// Persist one traced transaction
    async fn insert_transaction_info(&self, ctx: &RequestContext, info: &TransactionInfo) -> Result<(), RepositoryError>;

    /// Snapshots for a scheduler, in store-defined order, plus total count
    async fn get_snapshots(
        &self,
        ctx: &RequestContext,
        query: &SchedulerInformationQuery,
    ) -> Result<SchedulerInformation, RepositoryError>;

    async fn get_snapshots_uptime(
        &self,
        ctx: &RequestContext,
        query: &SchedulerUptimeQuery,
    ) -> Result<SchedulerUptime, RepositoryError>;

    /// Composite samples (every payload)
    async fn get_stat_info(&self, ctx: &RequestContext, window: &StatWindow) -> Result<AgentInformation, RepositoryError>;

    async fn get_cpu_info(&self, ctx: &RequestContext, window: &StatWindow) -> Result<AgentInformation, RepositoryError>;

    async fn get_memory_info(&self, ctx: &RequestContext, window: &StatWindow) -> Result<AgentInformation, RepositoryError>;

    async fn get_disk_info(&self, ctx: &RequestContext, window: &StatWindow) -> Result<AgentInformation, RepositoryError>;

    async fn get_net_info(&self, ctx: &RequestContext, window: &StatWindow) -> Result<AgentInformation, RepositoryError>;

    async fn get_transaction_info(
        &self,
        ctx: &RequestContext,
        filter: &TransactionFilter,
    ) -> Result<TransactionPage, RepositoryError>;

    /// The transaction plus the records whose parent is `id`, in one query
    async fn get_transaction_by_id(
        &self,
        ctx: &RequestContext,
        id: &TransactionId,
    ) -> Result<TransactionTree, RepositoryError>;

    async fn get_transaction_group(
        &self,
        ctx: &RequestContext,
        filter: &TransactionGroupFilter,
    ) -> Result<TransactionGroups, RepositoryError>;
}

/// Repository errors
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Serialization(err.to_string())
    }
}
