// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchedulerId(pub String);

impl SchedulerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SchedulerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SchedulerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SchedulerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SchedulerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckType {
    Tcp,
    Http,
    Grpc,
    SiteMap,
    HttpJsonValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerStatus {
    Running,
    Stopped,
}

/// What a scheduler probes on every tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchedulerConfig {
    Tcp {
        host: String,
        port: u16,
    },
    Http {
        method: String,
        url: String,
        #[serde(default)]
        headers: BTreeMap<String, String>,
        status_code: u16,
    },
    Grpc {
        service: String,
        host: String,
        port: u16,
    },
    SiteMap {
        url: String,
        concurrency: u32,
    },
    HttpJsonValue {
        method: String,
        url: String,
        #[serde(default)]
        headers: BTreeMap<String, String>,
        selectors: Vec<String>,
    },
}

impl SchedulerConfig {
    pub fn check_type(&self) -> CheckType {
        match self {
            SchedulerConfig::Tcp { .. } => CheckType::Tcp,
            SchedulerConfig::Http { .. } => CheckType::Http,
            SchedulerConfig::Grpc { .. } => CheckType::Grpc,
            SchedulerConfig::SiteMap { .. } => CheckType::SiteMap,
            SchedulerConfig::HttpJsonValue { .. } => CheckType::HttpJsonValue,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheduler {
    pub id: SchedulerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub interval_secs: u32,
    pub timeout_secs: u32,
    pub status: SchedulerStatus,
    pub config: SchedulerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddSchedulerRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub interval_secs: u32,
    pub timeout_secs: u32,
    pub config: SchedulerConfig,
}

/// Acknowledgement carrying the scheduler an operation acted on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerAck {
    pub id: SchedulerId,
}
