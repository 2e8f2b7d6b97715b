// SPDX-License-Identifier: MIT

//! Erasure-method contract.
//!
//! A method defines the overwrite passes applied to a byte range. The concrete
//! pass patterns (single random pass, multi-pass standards...) are supplied by
//! the host or by `scrubtargets`' built-ins; this module only fixes the shape
//! every method and every consumer agree on.

use std::io::{Seek, Write};

use bitflags::bitflags;

use crate::entropy::EntropySource;
use crate::error::MethodResult;
use crate::id::MethodId;

bitflags! {
    /// Capabilities a method declares. Target kinds check them in
    /// `supports_method` before accepting a binding.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MethodCaps: u32 {
        /// The method seeks arbitrarily within a living stream.
        const RANDOM_ACCESS = 1 << 0;
        /// The method may be used to fill unallocated space.
        const UNUSED_SPACE = 1 << 1;
    }
}

/// Data sink an erasure method overwrites.
///
/// Blanket-implemented for anything that can write and seek, which covers
/// `std::fs::File` and in-memory cursors alike.
pub trait ErasureSink: Write + Seek {}

impl<T: Write + Seek + ?Sized> ErasureSink for T {}

/// Progress callback for a single overwrite job: `(bytes_written, total)`.
///
/// Invoked in-line on the job's thread; callbacks must not block unboundedly.
pub type PassProgressFn<'a> = &'a mut dyn FnMut(u64, u64);

/// A pluggable overwrite algorithm.
pub trait ErasureMethod: Send + Sync {
    /// Stable identifier, used for registry lookup and persistence.
    fn id(&self) -> MethodId;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Declared capabilities.
    fn caps(&self) -> MethodCaps;

    /// Overwrites `total` bytes of `sink`, starting at its current position.
    ///
    /// Implementations draw any random data they need from `entropy` and
    /// report progress through `progress`. Storage failures propagate.
    fn erase(
        &self,
        sink: &mut dyn ErasureSink,
        total: u64,
        entropy: &mut dyn EntropySource,
        progress: PassProgressFn<'_>,
    ) -> MethodResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caps_compose() {
        let caps = MethodCaps::RANDOM_ACCESS | MethodCaps::UNUSED_SPACE;
        assert!(caps.contains(MethodCaps::RANDOM_ACCESS));
        assert!(!MethodCaps::UNUSED_SPACE.contains(MethodCaps::RANDOM_ACCESS));
    }
}
