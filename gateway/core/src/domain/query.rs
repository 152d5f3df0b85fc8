// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Shared query primitives: pagination, time windows and sort order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Offset/limit page selector. Unsigned fields keep both bounds at zero or above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub offset: u32,
    pub limit: u32,
}

impl Pagination {
    pub fn new(offset: u32, limit: u32) -> Self {
        Self { offset, limit }
    }

    /// Slice one page out of an already filtered and ordered result set.
    /// `None` returns everything; a limit of zero yields an empty page.
    pub fn apply<T>(pagination: Option<&Pagination>, items: Vec<T>) -> Vec<T> {
        match pagination {
            None => items,
            Some(page) => items
                .into_iter()
                .skip(page.offset as usize)
                .take(page.limit as usize)
                .collect(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("time range start {from} is after end {to}")]
pub struct InvalidTimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// Inclusive `[from, to]` window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TimeRangeBounds")]
pub struct TimeRange {
    from: DateTime<Utc>,
    to: DateTime<Utc>,
}

#[derive(Deserialize)]
struct TimeRangeBounds {
    from: DateTime<Utc>,
    to: DateTime<Utc>,
}

impl TryFrom<TimeRangeBounds> for TimeRange {
    type Error = InvalidTimeRange;

    fn try_from(bounds: TimeRangeBounds) -> Result<Self, Self::Error> {
        TimeRange::new(bounds.from, bounds.to)
    }
}

impl TimeRange {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Self, InvalidTimeRange> {
        if from > to {
            return Err(InvalidTimeRange { from, to });
        }
        Ok(Self { from, to })
    }

    pub fn from(&self) -> DateTime<Utc> {
        self.from
    }

    pub fn to(&self) -> DateTime<Utc> {
        self.to
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from <= at && at <= self.to
    }

    /// `true` when no range was requested
    pub fn admits(range: Option<&TimeRange>, at: DateTime<Utc>) -> bool {
        range.map_or(true, |r| r.contains(at))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}
