// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Error Translation
//!
//! [`ServiceError`] is the only error type that crosses a façade boundary.
//! Downstream failures of any kind pass through [`wrap`], which collapses them
//! into [`ServiceError::Internal`] with the original message kept verbatim.
//!
//! | Class | Raised by |
//! |-------|-----------|
//! | `Validation` | stat dispatcher, before any persistence call |
//! | `Internal` | [`wrap`], for every persistence/backend failure |
//! | `Cancelled` / `DeadlineExceeded` | [`check_context`], or a backend's own cancellation |
//!
//! There is no not-found class: a missing entity reaches callers
//! as `Internal`.

use std::fmt;
use thiserror::Error;
use tracing::warn;

use crate::domain::context::{ContextState, RequestContext};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("invalid argument: {0}")]
    Validation(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("request cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,
}

impl ServiceError {
    pub fn internal(err: impl fmt::Display) -> Self {
        ServiceError::Internal(err.to_string())
    }

    pub fn unsupported_stat_type(tag: i32) -> Self {
        ServiceError::Validation(format!("unsupported stat type: {}", tag))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ServiceError::Validation(_))
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, ServiceError::Internal(_))
    }
}

/// Translate a downstream result. Success passes through untouched.
pub fn wrap<T, E: fmt::Display>(result: Result<T, E>) -> Result<T, ServiceError> {
    result.map_err(|err| {
        warn!(error = %err, "downstream call failed");
        ServiceError::internal(err)
    })
}

/// Abort before a backend call when the caller has already given up
pub fn check_context(ctx: &RequestContext) -> Result<(), ServiceError> {
    match ctx.state() {
        ContextState::Active => Ok(()),
        ContextState::Cancelled => Err(ServiceError::Cancelled),
        ContextState::DeadlineExceeded => Err(ServiceError::DeadlineExceeded),
    }
}
