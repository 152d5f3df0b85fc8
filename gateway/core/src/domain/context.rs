// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Request Context
//!
//! Carries the caller's cancellation token and optional deadline through
//! every layer. Each façade operation hands the same context to the backend
//! or persistence call it makes.

use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Liveness of a request at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Active,
    Cancelled,
    DeadlineExceeded,
}

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cancellation: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context whose deadline is `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new().with_deadline(Instant::now() + timeout)
    }

    /// Context bound to an existing cancellation token, typically a child of
    /// the server's shutdown token
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            cancellation: token,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Cancellation wins over an expired deadline.
    pub fn state(&self) -> ContextState {
        if self.cancellation.is_cancelled() {
            return ContextState::Cancelled;
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => ContextState::DeadlineExceeded,
            _ => ContextState::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state() == ContextState::Active
    }
}
