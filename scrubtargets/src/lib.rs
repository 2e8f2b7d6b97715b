// SPDX-License-Identifier: MIT

//! Erasure targets.
//!
//! A target couples what to erase (a file, a folder, a volume's unused space)
//! with exactly one erasure method, validating method/target compatibility and
//! exposing the execution entry point. Execution resolves the volume's
//! filesystem driver and delegates to its primitives.

// Core modules
pub mod binding;
pub mod error;
pub mod methods;
pub mod target;
pub mod targets;

// Prelude re-exports (central entrypoint)
pub mod prelude {
    pub use super::binding::{MethodBinding, MethodSelection, SavedBinding};
    pub use super::error::TargetError;
    pub use super::methods::{builtin_registry, SinglePassRandom, SinglePassZero};
    pub use super::target::{ErasureContext, ErasureTarget, NullProgress, ProgressSink};
    pub use super::targets::{FileTarget, FolderTarget, UnusedSpaceTarget};
}

pub use prelude::*;
