// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain Layer
//!
//! Entities, value types and the persistence contract. Nothing here knows
//! about transports or concrete stores.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Telemetry entities, query shapes, persistence contract

pub mod agent;
pub mod application;
pub mod context;
pub mod gateway_config;
pub mod query;
pub mod repository;
pub mod scheduler;
pub mod snapshot;
pub mod stat;
pub mod transaction;
