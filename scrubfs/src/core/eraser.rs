// SPDX-License-Identifier: MIT

//! Unified trait representing a filesystem erasure driver.
//!
//! One implementation per supported filesystem type, stateless with respect to
//! erasure jobs: all job state travels through parameters. Every primitive is
//! synchronous and invokes its progress callbacks in-line on the calling
//! thread; callbacks must not block unboundedly. Nothing here is internally
//! thread-safe for concurrent erasure of the same subtree, and only one
//! free-space-filling primitive should run per volume at a time.

use std::path::Path;

use scrubcore::{DriverId, EntropySource, ErasureMethod, PassProgressFn};

use crate::core::error::FsEraseResult;
use crate::core::volume::{FsKind, StreamRef, VolumeInfo};

/// Times a directory-entry name is renamed to random names before removal,
/// overwriting the name slot in the metadata table.
pub const FILE_NAME_ERASE_PASSES: u32 = 7;

/// Attempts before a repeatedly failing entry operation (e.g. a locked file)
/// becomes a hard failure.
pub const FILE_NAME_ERASE_TRIES: u32 = 50;

/// Invoked with each path being scanned during a search phase.
pub type SearchProgress<'a> = &'a mut dyn FnMut(&Path);

/// Invoked as erasure proceeds: `(current_index, total_count, current_path)`.
/// Totals are best-effort estimates from the search phase.
pub type EraseProgress<'a> = &'a mut dyn FnMut(usize, usize, &Path);

/// Invoked as table/structure entries are processed: `(current, estimated_total)`.
pub type EntriesProgress<'a> = &'a mut dyn FnMut(usize, usize);

pub trait FsEraser: Send + Sync {
    /// Stable identifier for registry lookup and persistence.
    fn id(&self) -> DriverId;

    /// Name of the supported filesystem.
    fn name(&self) -> &str;

    fn supports(&self, kind: FsKind) -> bool;

    /// Overwrites the unused tail of each file's last allocated cluster on the
    /// volume, destroying residue of previously larger occupants.
    fn erase_cluster_tips(
        &self,
        volume: &VolumeInfo,
        method: &dyn ErasureMethod,
        entropy: &mut dyn EntropySource,
        search: SearchProgress<'_>,
        erase: EraseProgress<'_>,
    ) -> FsEraseResult;

    /// Destroys fragments of small files the filesystem stored inline in its
    /// metadata table, by churning small files in `temp_dir` until freed table
    /// slots have been reused, then removing them.
    fn erase_resident_metadata(
        &self,
        volume: &VolumeInfo,
        temp_dir: &Path,
        method: &dyn ErasureMethod,
        entropy: &mut dyn EntropySource,
        entries: EntriesProgress<'_>,
    ) -> FsEraseResult;

    /// Overwrites deleted-entry residue in directory structures by creating
    /// entries under `temp_dir` until the structures grow over freed regions.
    fn erase_directory_structures(
        &self,
        volume: &VolumeInfo,
        temp_dir: &Path,
        entropy: &mut dyn EntropySource,
        entries: EntriesProgress<'_>,
    ) -> FsEraseResult;

    /// Overwrites the content of one stream, slack space included, with the
    /// given method.
    fn erase_object(
        &self,
        volume: &VolumeInfo,
        stream: &StreamRef,
        method: &dyn ErasureMethod,
        entropy: &mut dyn EntropySource,
        progress: PassProgressFn<'_>,
    ) -> FsEraseResult;

    /// Bytes actually allocated on disk for the stream (cluster-rounded).
    /// Overwrites must cover this area, not just the logical length.
    fn file_area(&self, volume: &VolumeInfo, stream: &StreamRef) -> FsEraseResult<u64>;

    /// Resets creation/modification/access timestamps of a still-existing
    /// entry to a neutral value, so in-place overwrites leave no timestamp
    /// trail.
    fn reset_file_times(&self, path: &Path) -> FsEraseResult;

    /// Securely removes a file's directory entry: the name slot is overwritten
    /// through the rename cycle and timestamps are neutralized before removal.
    /// Content destruction is the caller's preceding [`FsEraser::erase_object`].
    fn delete_file(&self, path: &Path, entropy: &mut dyn EntropySource) -> FsEraseResult;

    /// Securely deletes a directory entry. With `recursive`, contained files
    /// and subdirectories are securely deleted depth-first before the
    /// directory entry itself.
    fn delete_folder(
        &self,
        path: &Path,
        recursive: bool,
        entropy: &mut dyn EntropySource,
    ) -> FsEraseResult;

    /// [`FsEraser::delete_folder`] with `recursive = true`.
    fn delete_folder_all(&self, path: &Path, entropy: &mut dyn EntropySource) -> FsEraseResult {
        self.delete_folder(path, true, entropy)
    }
}
