// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use tonic::{Code, Status};

use crate::application::errors::ServiceError;

impl From<ServiceError> for Status {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(message) => Status::invalid_argument(message),
            ServiceError::Internal(message) => Status::internal(message),
            ServiceError::Cancelled => Status::cancelled("request cancelled"),
            ServiceError::DeadlineExceeded => Status::deadline_exceeded("deadline exceeded"),
        }
    }
}

/// Every code without a dedicated class is an internal failure.
impl From<Status> for ServiceError {
    fn from(status: Status) -> Self {
        match status.code() {
            Code::InvalidArgument => ServiceError::Validation(status.message().to_string()),
            Code::Cancelled => ServiceError::Cancelled,
            Code::DeadlineExceeded => ServiceError::DeadlineExceeded,
            code if status.message().is_empty() => ServiceError::Internal(code.description().to_string()),
            _ => ServiceError::Internal(status.message().to_string()),
        }
    }
}

/// Translate the result of a remote backend call
pub fn from_remote<T>(result: Result<T, Status>) -> Result<T, ServiceError> {
    result.map_err(ServiceError::from)
}
