// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::sync::Arc;
use tracing::debug;

use crate::application::errors::{check_context, wrap, ServiceError};
use crate::domain::context::RequestContext;
use crate::domain::repository::TelemetryRepository;
use crate::domain::transaction::{
    TransactionFilter, TransactionGroupFilter, TransactionGroups, TransactionId, TransactionPage,
    TransactionTree,
};

/// Resolves transactions, their direct children, lists and groups.
///
/// Lists and groups are pure pass-through: filtering, paging and aggregation
/// all happen in the store.
pub struct TransactionAssembler {
    repository: Arc<dyn TelemetryRepository>,
}

impl TransactionAssembler {
    pub fn new(repository: Arc<dyn TelemetryRepository>) -> Self {
        Self { repository }
    }

    /// One level only: records whose parent is `id`. Anything the store
    /// returns that is not a direct child is dropped.
    pub async fn get_transaction_by_id(
        &self,
        ctx: &RequestContext,
        id: &TransactionId,
    ) -> Result<TransactionTree, ServiceError> {
        check_context(ctx)?;
        let mut tree = wrap(self.repository.get_transaction_by_id(ctx, id).await)?;

        let returned = tree.children.len();
        tree.children.retain(|child| child.is_child_of(id));
        if tree.children.len() != returned {
            debug!(
                transaction_id = %id,
                dropped = returned - tree.children.len(),
                "store returned non-direct children"
            );
        }
        Ok(tree)
    }

    pub async fn get_transactions(
        &self,
        ctx: &RequestContext,
        filter: &TransactionFilter,
    ) -> Result<TransactionPage, ServiceError> {
        check_context(ctx)?;
        wrap(self.repository.get_transaction_info(ctx, filter).await)
    }

    pub async fn get_transactions_group(
        &self,
        ctx: &RequestContext,
        filter: &TransactionGroupFilter,
    ) -> Result<TransactionGroups, ServiceError> {
        check_context(ctx)?;
        wrap(self.repository.get_transaction_group(ctx, filter).await)
    }
}
