// SPDX-License-Identifier: MIT

//! Error types shared across the contracts.

use thiserror::Error;

use crate::id::MethodId;

/// Failure of an erasure method's overwrite pass.
///
/// Storage failures are never masked here; partial-write recovery beyond the
/// caller's retry budget is out of scope.
#[derive(Debug, Error)]
pub enum MethodError {
    #[error("I/O failure during overwrite pass")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(&'static str),
}

pub type MethodResult<T = ()> = Result<T, MethodError>;

/// Failure to resolve a method through the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no erasure method registered under {0}")]
    UnknownMethod(MethodId),
    #[error("the host has no default erasure method configured")]
    NoDefault,
}
