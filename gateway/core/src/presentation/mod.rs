// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Presentation Layer (`vantage-core`)
//!
//! External surface over the gateway façade. No business logic lives here;
//! every route makes one call into [`crate::application::gateway::Gateway`].
//!
//! | Module | Transport | Description |
//! |--------|-----------|-------------|
//! | [`api`] | HTTP (Axum) | REST endpoints, one per gateway operation |
//! | [`grpc`] | gRPC (Tonic) | Status mapping for remote backend groups |

pub mod api;
pub mod grpc;
