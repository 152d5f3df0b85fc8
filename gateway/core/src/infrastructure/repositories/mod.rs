// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Repository Implementations
//!
//! In-process implementation of the [`TelemetryRepository`] contract. The
//! production store lives outside this workspace; this adapter backs the
//! development server and the test suite.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Persist and query telemetry records
//! - **Pattern:** Repository (DDD), Adapter (Hexagonal Architecture)
//!
//! Every query filters first, counts the full match set, then pages, so the
//! returned `count` never depends on the page size.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::context::RequestContext;
use crate::domain::query::{Pagination, SortDirection, TimeRange};
use crate::domain::repository::{RepositoryError, TelemetryRepository};
use crate::domain::snapshot::{
    SchedulerInformation, SchedulerInformationQuery, SchedulerUptime, SchedulerUptimeQuery, Snapshot,
};
use crate::domain::stat::{AgentInformation, StatCategory, StatMetric, StatWindow};
use crate::domain::transaction::{
    TransactionFilter, TransactionGroup, TransactionGroupFilter, TransactionGroups, TransactionId,
    TransactionInfo, TransactionPage, TransactionSortBy, TransactionTree,
};

#[derive(Default)]
struct TelemetryTables {
    snapshots: Vec<Snapshot>,
    metrics: Vec<StatMetric>,
    transactions: Vec<TransactionInfo>,
}

#[derive(Clone, Default)]
pub struct InMemoryTelemetryRepository {
    tables: Arc<RwLock<TelemetryTables>>,
}

impl InMemoryTelemetryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn query_stats(&self, window: &StatWindow, category: StatCategory) -> AgentInformation {
        let tables = self.tables.read();
        let mut matched: Vec<&StatMetric> = tables
            .metrics
            .iter()
            .filter(|m| m.agent_id == window.agent_id)
            .filter(|m| m.has(category))
            .filter(|m| TimeRange::admits(window.time_range.as_ref(), m.time))
            .collect();
        matched.sort_by(|a, b| b.time.cmp(&a.time));

        let count = matched.len() as u64;
        let stats = Pagination::apply(window.pagination.as_ref(), matched)
            .into_iter()
            .map(|m| m.project(category))
            .collect();
        AgentInformation { stats, count }
    }
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

fn compare_transactions(a: &TransactionInfo, b: &TransactionInfo, sort_by: TransactionSortBy) -> Ordering {
    match sort_by {
        TransactionSortBy::StartTime => a.started_at.cmp(&b.started_at),
        TransactionSortBy::EndTime => a.ended_at.cmp(&b.ended_at),
        TransactionSortBy::Duration => (a.ended_at - a.started_at).cmp(&(b.ended_at - b.started_at)),
    }
}

#[async_trait]
impl TelemetryRepository for InMemoryTelemetryRepository {
    async fn insert_snapshot(&self, _ctx: &RequestContext, snapshot: &Snapshot) -> Result<(), RepositoryError> {
        self.tables.write().snapshots.push(snapshot.clone());
        Ok(())
    }

    async fn insert_stat_metric(&self, _ctx: &RequestContext, metric: &StatMetric) -> Result<(), RepositoryError> {
        self.tables.write().metrics.push(metric.clone());
        Ok(())
    }

    async fn insert_transaction_info(&self, _ctx: &RequestContext, info: &TransactionInfo) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write();
        if tables.transactions.iter().any(|tx| tx.id == info.id) {
            return Err(RepositoryError::Database(format!("duplicate transaction id {}", info.id)));
        }
        if let Some(parent) = &info.parent_id {
            if !tables.transactions.iter().any(|tx| &tx.id == parent) {
                return Err(RepositoryError::Database(format!(
                    "parent transaction {} does not exist",
                    parent
                )));
            }
        }
        tables.transactions.push(info.clone());
        Ok(())
    }

    async fn get_snapshots(
        &self,
        _ctx: &RequestContext,
        query: &SchedulerInformationQuery,
    ) -> Result<SchedulerInformation, RepositoryError> {
        let tables = self.tables.read();
        let mut matched: Vec<&Snapshot> = tables
            .snapshots
            .iter()
            .filter(|s| s.scheduler_id == query.scheduler_id)
            .filter(|s| TimeRange::admits(query.time_range.as_ref(), s.started_at))
            .filter(|s| query.status.map_or(true, |code| code == s.code))
            .collect();
        matched.sort_by(|a, b| directed(a.started_at.cmp(&b.started_at), query.direction));

        let count = matched.len() as u64;
        let snapshots = Pagination::apply(query.pagination.as_ref(), matched)
            .into_iter()
            .cloned()
            .collect();
        Ok(SchedulerInformation { snapshots, count })
    }

    async fn get_snapshots_uptime(
        &self,
        _ctx: &RequestContext,
        query: &SchedulerUptimeQuery,
    ) -> Result<SchedulerUptime, RepositoryError> {
        let tables = self.tables.read();
        let window: Vec<&Snapshot> = tables
            .snapshots
            .iter()
            .filter(|s| s.scheduler_id == query.scheduler_id)
            .filter(|s| TimeRange::admits(query.time_range.as_ref(), s.started_at))
            .collect();
        if window.is_empty() {
            return Ok(SchedulerUptime::default());
        }

        let healthy: Vec<&&Snapshot> = window.iter().filter(|s| s.is_ok()).collect();
        let latency_ms = if healthy.is_empty() {
            0.0
        } else {
            healthy.iter().map(|s| s.latency_ms()).sum::<f64>() / healthy.len() as f64
        };
        Ok(SchedulerUptime {
            uptime: healthy.len() as f64 / window.len() as f64,
            latency_ms,
        })
    }

    async fn get_stat_info(&self, _ctx: &RequestContext, window: &StatWindow) -> Result<AgentInformation, RepositoryError> {
        Ok(self.query_stats(window, StatCategory::All))
    }

    async fn get_cpu_info(&self, _ctx: &RequestContext, window: &StatWindow) -> Result<AgentInformation, RepositoryError> {
        Ok(self.query_stats(window, StatCategory::Cpu))
    }

    async fn get_memory_info(&self, _ctx: &RequestContext, window: &StatWindow) -> Result<AgentInformation, RepositoryError> {
        Ok(self.query_stats(window, StatCategory::Memory))
    }

    async fn get_disk_info(&self, _ctx: &RequestContext, window: &StatWindow) -> Result<AgentInformation, RepositoryError> {
        Ok(self.query_stats(window, StatCategory::Disk))
    }

    async fn get_net_info(&self, _ctx: &RequestContext, window: &StatWindow) -> Result<AgentInformation, RepositoryError> {
        Ok(self.query_stats(window, StatCategory::Net))
    }

    async fn get_transaction_info(
        &self,
        _ctx: &RequestContext,
        filter: &TransactionFilter,
    ) -> Result<TransactionPage, RepositoryError> {
        let tables = self.tables.read();
        let mut matched: Vec<&TransactionInfo> =
            tables.transactions.iter().filter(|tx| filter.matches(tx)).collect();
        matched.sort_by(|a, b| directed(compare_transactions(a, b, filter.sort_by), filter.direction));

        let count = matched.len() as u64;
        let transactions = Pagination::apply(filter.pagination.as_ref(), matched)
            .into_iter()
            .cloned()
            .collect();
        Ok(TransactionPage { transactions, count })
    }

    async fn get_transaction_by_id(
        &self,
        _ctx: &RequestContext,
        id: &TransactionId,
    ) -> Result<TransactionTree, RepositoryError> {
        let tables = self.tables.read();
        let transaction = tables
            .transactions
            .iter()
            .find(|tx| &tx.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("transaction {}", id)))?;

        let mut children: Vec<TransactionInfo> = tables
            .transactions
            .iter()
            .filter(|tx| tx.is_child_of(id))
            .cloned()
            .collect();
        children.sort_by(|a, b| a.started_at.cmp(&b.started_at));
        Ok(TransactionTree { transaction, children })
    }

    async fn get_transaction_group(
        &self,
        _ctx: &RequestContext,
        filter: &TransactionGroupFilter,
    ) -> Result<TransactionGroups, RepositoryError> {
        let tables = self.tables.read();
        let mut buckets: BTreeMap<String, Vec<&TransactionInfo>> = BTreeMap::new();
        for tx in tables.transactions.iter().filter(|tx| {
            tx.application_id == filter.application_id
                && TimeRange::admits(filter.time_range.as_ref(), tx.started_at)
                && filter.transaction_type.map_or(true, |t| t == tx.transaction_type)
                && filter.status.map_or(true, |s| s == tx.status)
        }) {
            buckets.entry(filter.group_by.key(tx)).or_default().push(tx);
        }

        Ok(buckets
            .into_iter()
            .map(|(key, txs)| (key, TransactionGroup::from_transactions(txs)))
            .collect())
    }
}
