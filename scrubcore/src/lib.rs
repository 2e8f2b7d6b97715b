// SPDX-License-Identifier: MIT

//! Shared contracts of the scrub ecosystem.
//!
//! Everything a host, an erasure method or a filesystem driver agree on lives
//! here: stable identifiers, the randomness-source contract, the erasure-method
//! contract and the method registry used to resolve the host default.

// Core modules
pub mod entropy;
pub mod error;
pub mod id;
pub mod method;
pub mod registry;

// Prelude re-exports (central entrypoint)
pub mod prelude {
    pub use super::entropy::{EntropySource, ScriptedEntropy, XorShift64};
    pub use super::error::{MethodError, MethodResult, RegistryError};
    pub use super::id::{DriverId, MethodId, TargetKindId};
    pub use super::method::{ErasureMethod, ErasureSink, MethodCaps, PassProgressFn};
    pub use super::registry::MethodRegistry;
}

pub use prelude::*;
