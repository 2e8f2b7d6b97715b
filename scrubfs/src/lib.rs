// SPDX-License-Identifier: MIT

//! Filesystem erasure layer.
//!
//! One driver per supported filesystem type, each exposing the structural
//! erasure primitives (cluster-tip erasure, resident-table erasure,
//! directory-structure erasure), generic object erasure, allocated-size
//! queries and secure entry removal. Shared helpers cover collision-free
//! random name generation and random file sampling.

// Core modules
pub mod core;
pub mod fs;

// Reusable types and traits
pub use core::traits::*;

// Utilities
pub use core::{naming, ops, sampling};
pub use core::error::{FsEraseError, FsEraseResult};
pub use core::registry::DriverRegistry;
pub use core::std_eraser::StdEraser;
pub use core::volume::{FsKind, StreamRef, VolumeInfo};

/// FAT32 erasure driver.
///
/// See [`fat32::Fat32Eraser`].
pub mod fat32 {
    pub use super::fs::fat32::*;
}

/// EXT4 erasure driver.
///
/// See [`ext4::Ext4Eraser`].
pub mod ext4 {
    pub use super::fs::ext4::*;
}
