// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Infrastructure Layer
//!
//! In-process adapters for the persistence contract and the three
//! non-storage backend groups.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure Layer
//! - **Purpose:** Concrete implementations behind application-layer traits

pub mod agent_registry;
pub mod application_registry;
pub mod monitoring;
pub mod repositories;

pub use agent_registry::InMemoryAgentRegistry;
pub use application_registry::InMemoryApplicationLifecycle;
pub use monitoring::InMemoryMonitoringControl;
pub use repositories::InMemoryTelemetryRepository;
