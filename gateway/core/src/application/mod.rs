// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod errors;
pub mod stat_dispatcher;
pub mod transaction_assembler;
pub mod storage;

// Backend capability groups
pub mod agent;
pub mod monitoring;
pub mod lifecycle;

pub mod gateway;

pub use errors::{check_context, wrap, ServiceError};
pub use gateway::{BackendGroup, Gateway};
pub use storage::{StandardStorageService, StorageService};
