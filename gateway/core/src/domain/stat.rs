// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Agent Statistics
//!
//! Resource samples pushed by monitoring agents and the query shapes used to
//! read them back. A [`StatMetric`] is written once and never mutated; reads
//! project it into a [`Statistic`] for the requested [`StatCategory`].
//!
//! | Tag | Category | Payload |
//! |-----|----------|---------|
//! | 0 | `All` | every payload present on the sample |
//! | 1 | `Cpu` | per-core load |
//! | 2 | `Memory` | physical + swap usage |
//! | 3 | `Disk` | per-mount usage |
//! | 4 | `Net` | per-interface counters |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::domain::agent::AgentId;
use crate::domain::query::{Pagination, TimeRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatCategory {
    All,
    Cpu,
    Memory,
    Disk,
    Net,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown stat category tag {0}")]
pub struct UnknownStatCategory(pub i32);

impl StatCategory {
    pub const VARIANTS: [StatCategory; 5] = [
        StatCategory::All,
        StatCategory::Cpu,
        StatCategory::Memory,
        StatCategory::Disk,
        StatCategory::Net,
    ];

    /// Wire tag
    pub fn tag(self) -> i32 {
        match self {
            StatCategory::All => 0,
            StatCategory::Cpu => 1,
            StatCategory::Memory => 2,
            StatCategory::Disk => 3,
            StatCategory::Net => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatCategory::All => "all",
            StatCategory::Cpu => "cpu",
            StatCategory::Memory => "memory",
            StatCategory::Disk => "disk",
            StatCategory::Net => "net",
        }
    }
}

impl TryFrom<i32> for StatCategory {
    type Error = UnknownStatCategory;

    fn try_from(tag: i32) -> Result<Self, Self::Error> {
        StatCategory::VARIANTS
            .into_iter()
            .find(|c| c.tag() == tag)
            .ok_or(UnknownStatCategory(tag))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuLoad {
    pub load: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuInfo {
    pub cpus: Vec<CpuLoad>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryUsage {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub shared: u64,
    pub used_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mem: Option<MemoryUsage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swap: Option<MemoryUsage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskUsage {
    pub total: u64,
    pub free: u64,
    pub used: u64,
    pub used_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskInfo {
    /// Keyed by mount point
    pub disks: BTreeMap<String, DiskUsage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceCounters {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
    pub packets_sent: u64,
    pub packets_recv: u64,
    pub err_in: u64,
    pub err_out: u64,
    pub drop_in: u64,
    pub drop_out: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetInfo {
    /// Keyed by interface name
    pub interfaces: BTreeMap<String, InterfaceCounters>,
}

/// One resource sample from an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatMetric {
    pub agent_id: AgentId,
    pub agent_name: String,
    pub time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_info: Option<CpuInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_info: Option<MemoryInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_info: Option<DiskInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_info: Option<NetInfo>,
}

impl StatMetric {
    pub fn new(agent_id: AgentId, agent_name: impl Into<String>, time: DateTime<Utc>) -> Self {
        Self {
            agent_id,
            agent_name: agent_name.into(),
            time,
            cpu_info: None,
            memory_info: None,
            disk_info: None,
            net_info: None,
        }
    }

    /// Whether the sample carries the payload a category selects
    pub fn has(&self, category: StatCategory) -> bool {
        match category {
            StatCategory::All => true,
            StatCategory::Cpu => self.cpu_info.is_some(),
            StatCategory::Memory => self.memory_info.is_some(),
            StatCategory::Disk => self.disk_info.is_some(),
            StatCategory::Net => self.net_info.is_some(),
        }
    }

    pub fn project(&self, category: StatCategory) -> Statistic {
        let keep = |c: StatCategory| category == StatCategory::All || category == c;
        Statistic {
            time: self.time,
            cpu_info: self.cpu_info.clone().filter(|_| keep(StatCategory::Cpu)),
            memory_info: self.memory_info.clone().filter(|_| keep(StatCategory::Memory)),
            disk_info: self.disk_info.clone().filter(|_| keep(StatCategory::Disk)),
            net_info: self.net_info.clone().filter(|_| keep(StatCategory::Net)),
        }
    }
}

/// One row of an agent-statistics query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistic {
    pub time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_info: Option<CpuInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_info: Option<MemoryInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_info: Option<DiskInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_info: Option<NetInfo>,
}

/// Agent-statistics request as received from callers. The category stays a
/// raw tag so unknown values reach the dispatcher and fail validation there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStatQuery {
    pub agent_id: AgentId,
    pub category: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRange>,
}

impl AgentStatQuery {
    pub fn new(agent_id: impl Into<AgentId>, category: StatCategory) -> Self {
        Self::with_tag(agent_id, category.tag())
    }

    pub fn with_tag(agent_id: impl Into<AgentId>, category: i32) -> Self {
        Self {
            agent_id: agent_id.into(),
            category,
            pagination: None,
            time_range: None,
        }
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn within(mut self, time_range: TimeRange) -> Self {
        self.time_range = Some(time_range);
        self
    }

    pub fn window(&self) -> StatWindow {
        StatWindow {
            agent_id: self.agent_id.clone(),
            pagination: self.pagination,
            time_range: self.time_range,
        }
    }
}

/// Category-free selector handed to the persistence layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatWindow {
    pub agent_id: AgentId,
    pub pagination: Option<Pagination>,
    pub time_range: Option<TimeRange>,
}

/// One page of statistics plus the total number of matching rows
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AgentInformation {
    pub stats: Vec<Statistic>,
    pub count: u64,
}
