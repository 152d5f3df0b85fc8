// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Agent-statistics dispatch.
//!
//! Every [`StatCategory`] owns exactly one persistence query. The category →
//! query table is built once; a tag that does not resolve to an entry is a
//! validation error and never reaches the store.

use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::application::errors::{check_context, wrap, ServiceError};
use crate::domain::context::RequestContext;
use crate::domain::repository::{RepositoryError, TelemetryRepository};
use crate::domain::stat::{AgentInformation, AgentStatQuery, StatCategory, StatWindow};

type StatQuery = for<'a> fn(
    &'a dyn TelemetryRepository,
    &'a RequestContext,
    &'a StatWindow,
) -> BoxFuture<'a, Result<AgentInformation, RepositoryError>>;

fn query_all<'a>(
    repo: &'a dyn TelemetryRepository,
    ctx: &'a RequestContext,
    window: &'a StatWindow,
) -> BoxFuture<'a, Result<AgentInformation, RepositoryError>> {
    repo.get_stat_info(ctx, window)
}

fn query_cpu<'a>(
    repo: &'a dyn TelemetryRepository,
    ctx: &'a RequestContext,
    window: &'a StatWindow,
) -> BoxFuture<'a, Result<AgentInformation, RepositoryError>> {
    repo.get_cpu_info(ctx, window)
}

fn query_memory<'a>(
    repo: &'a dyn TelemetryRepository,
    ctx: &'a RequestContext,
    window: &'a StatWindow,
) -> BoxFuture<'a, Result<AgentInformation, RepositoryError>> {
    repo.get_memory_info(ctx, window)
}

fn query_disk<'a>(
    repo: &'a dyn TelemetryRepository,
    ctx: &'a RequestContext,
    window: &'a StatWindow,
) -> BoxFuture<'a, Result<AgentInformation, RepositoryError>> {
    repo.get_disk_info(ctx, window)
}

fn query_net<'a>(
    repo: &'a dyn TelemetryRepository,
    ctx: &'a RequestContext,
    window: &'a StatWindow,
) -> BoxFuture<'a, Result<AgentInformation, RepositoryError>> {
    repo.get_net_info(ctx, window)
}

pub struct StatDispatcher {
    repository: Arc<dyn TelemetryRepository>,
    queries: HashMap<StatCategory, StatQuery>,
}

impl StatDispatcher {
    pub fn new(repository: Arc<dyn TelemetryRepository>) -> Self {
        let queries = HashMap::from([
            (StatCategory::All, query_all as StatQuery),
            (StatCategory::Cpu, query_cpu as StatQuery),
            (StatCategory::Memory, query_memory as StatQuery),
            (StatCategory::Disk, query_disk as StatQuery),
            (StatCategory::Net, query_net as StatQuery),
        ]);
        Self { repository, queries }
    }

    fn resolve(&self, tag: i32) -> Option<(StatCategory, StatQuery)> {
        let category = StatCategory::try_from(tag).ok()?;
        self.queries.get(&category).map(|run| (category, *run))
    }

    /// Run the single persistence query registered for `query.category`
    pub async fn dispatch(
        &self,
        ctx: &RequestContext,
        query: &AgentStatQuery,
    ) -> Result<AgentInformation, ServiceError> {
        let (category, run) = self
            .resolve(query.category)
            .ok_or_else(|| ServiceError::unsupported_stat_type(query.category))?;
        check_context(ctx)?;

        debug!(agent_id = %query.agent_id, category = category.as_str(), "dispatching stat query");
        let window = query.window();
        wrap(run(self.repository.as_ref(), ctx, &window).await)
    }
}
