// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! gRPC bridge
//!
//! Conversions between the service error taxonomy and `tonic::Status`, so a
//! backend group reached over gRPC reports failures in the same classes as
//! an in-process one.
//!
//! # Architecture
//!
//! - **Layer:** Presentation Layer
//! - **Purpose:** Transport status mapping

pub mod status;

pub use status::from_remote;
