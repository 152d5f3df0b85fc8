// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Vantage core
//!
//! Telemetry aggregation gateway: stat-category dispatch, transaction
//! assembly, error translation and the façades that route external calls
//! to the agent, monitoring, storage and application backends.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Domain types, application services, adapters and HTTP surface

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;
