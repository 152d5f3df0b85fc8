// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Scheduler snapshots: the persisted outcome of one scheduler execution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::query::{Pagination, SortDirection, TimeRange};
use crate::domain::scheduler::{CheckType, SchedulerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotCode {
    Ok,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub scheduler_id: SchedulerId,
    pub code: SnapshotCode,
    pub check_type: CheckType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    /// Check-specific result body, opaque to the gateway
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Snapshot {
    pub fn latency_ms(&self) -> f64 {
        (self.ended_at - self.started_at).num_milliseconds().max(0) as f64
    }

    pub fn is_ok(&self) -> bool {
        self.code == SnapshotCode::Ok
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerInformationQuery {
    pub scheduler_id: SchedulerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SnapshotCode>,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SchedulerInformationQuery {
    pub fn new(scheduler_id: impl Into<SchedulerId>) -> Self {
        Self {
            scheduler_id: scheduler_id.into(),
            pagination: None,
            time_range: None,
            status: None,
            direction: SortDirection::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchedulerInformation {
    pub snapshots: Vec<Snapshot>,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerUptimeQuery {
    pub scheduler_id: SchedulerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRange>,
}

/// Availability over a window as computed by the persistence layer
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SchedulerUptime {
    /// Fraction of successful snapshots, in `[0, 1]`
    pub uptime: f64,
    /// Mean latency of successful snapshots
    pub latency_ms: f64,
}
