// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Traced Transactions
//!
//! Records of traced operations reported by instrumented applications. A
//! transaction may name a parent; parents form a forest. Retrieval by id
//! resolves the transaction and its *direct* children only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use crate::domain::application::ApplicationId;
use crate::domain::query::{Pagination, SortDirection, TimeRange};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub String);

impl TransactionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TransactionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Unspecified,
    Xhr,
    Fetch,
    Websocket,
    Http,
    Grpc,
    Db,
    Internal,
    Router,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Unspecified => "unspecified",
            TransactionType::Xhr => "xhr",
            TransactionType::Fetch => "fetch",
            TransactionType::Websocket => "websocket",
            TransactionType::Http => "http",
            TransactionType::Grpc => "grpc",
            TransactionType::Db => "db",
            TransactionType::Internal => "internal",
            TransactionType::Router => "router",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Unspecified,
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInfo {
    pub id: TransactionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<TransactionId>,
    pub application_id: ApplicationId,
    pub name: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub method: String,
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
}

impl TransactionInfo {
    pub fn duration_ms(&self) -> f64 {
        (self.ended_at - self.started_at).num_milliseconds().max(0) as f64
    }

    pub fn is_child_of(&self, parent: &TransactionId) -> bool {
        self.parent_id.as_ref() == Some(parent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionSortBy {
    #[default]
    StartTime,
    EndTime,
    Duration,
}

/// List filter; every optional field narrows the result when set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFilter {
    pub application_id: ApplicationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRange>,
    #[serde(default)]
    pub sort_by: TransactionSortBy,
    #[serde(default)]
    pub direction: SortDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TransactionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl TransactionFilter {
    pub fn for_application(application_id: impl Into<ApplicationId>) -> Self {
        Self {
            application_id: application_id.into(),
            pagination: None,
            time_range: None,
            sort_by: TransactionSortBy::default(),
            direction: SortDirection::default(),
            transaction_type: None,
            status: None,
            host: None,
            name: None,
            path: None,
            method: None,
        }
    }

    pub fn matches(&self, tx: &TransactionInfo) -> bool {
        fn eq(want: &Option<String>, have: &str) -> bool {
            want.as_deref().map_or(true, |w| w == have)
        }
        tx.application_id == self.application_id
            && TimeRange::admits(self.time_range.as_ref(), tx.started_at)
            && self.transaction_type.map_or(true, |t| t == tx.transaction_type)
            && self.status.map_or(true, |s| s == tx.status)
            && eq(&self.host, &tx.host)
            && eq(&self.name, &tx.name)
            && eq(&self.path, &tx.path)
            && eq(&self.method, &tx.method)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionGroupBy {
    Type,
    Name,
    Method,
    Host,
    Path,
}

impl TransactionGroupBy {
    pub fn key(self, tx: &TransactionInfo) -> String {
        match self {
            TransactionGroupBy::Type => tx.transaction_type.as_str().to_string(),
            TransactionGroupBy::Name => tx.name.clone(),
            TransactionGroupBy::Method => tx.method.clone(),
            TransactionGroupBy::Host => tx.host.clone(),
            TransactionGroupBy::Path => tx.path.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionGroupFilter {
    pub application_id: ApplicationId,
    pub group_by: TransactionGroupBy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TransactionStatus>,
}

/// Aggregate over one group of transactions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TransactionGroup {
    pub count: u64,
    pub success_count: u64,
    pub success_ratio: f64,
    pub average_time_ms: f64,
    pub min_time_ms: f64,
    pub max_time_ms: f64,
}

impl TransactionGroup {
    pub fn from_transactions<'a>(txs: impl IntoIterator<Item = &'a TransactionInfo>) -> Self {
        let mut group = TransactionGroup {
            min_time_ms: f64::MAX,
            ..Default::default()
        };
        let mut total_ms = 0.0;
        for tx in txs {
            let duration = tx.duration_ms();
            group.count += 1;
            if tx.status == TransactionStatus::Success {
                group.success_count += 1;
            }
            total_ms += duration;
            group.min_time_ms = group.min_time_ms.min(duration);
            group.max_time_ms = group.max_time_ms.max(duration);
        }
        if group.count == 0 {
            return TransactionGroup::default();
        }
        group.average_time_ms = total_ms / group.count as f64;
        group.success_ratio = group.success_count as f64 / group.count as f64;
        group
    }
}

/// Group key → aggregate
pub type TransactionGroups = BTreeMap<String, TransactionGroup>;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransactionPage {
    pub transactions: Vec<TransactionInfo>,
    pub count: u64,
}

/// A transaction and its direct children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionTree {
    pub transaction: TransactionInfo,
    pub children: Vec<TransactionInfo>,
}
