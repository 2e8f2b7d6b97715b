// SPDX-License-Identifier: MIT

//! FAT32 erasure driver.
//!
//! FAT directory tables are chains of 32-byte entry slots; a long file name
//! occupies one slot per 13 characters ahead of the short 8.3 entry. Deleted
//! entries are only flagged (first byte `0xE5`), leaving name and metadata
//! bytes intact until the slot is reused. The driver therefore leans on long
//! generated names: every rename and every churned entry rewrites a run of
//! slots.

use std::path::Path;

use scrubcore::{DriverId, EntropySource, ErasureMethod, PassProgressFn};

use crate::core::eraser::{EntriesProgress, EraseProgress, FsEraser, SearchProgress};
use crate::core::error::{FsEraseResult, IoResultExt};
use crate::core::ops::{self, FillTuning};
use crate::core::volume::{FsKind, StreamRef, VolumeInfo};

pub const FAT32_ERASER_ID: DriverId =
    DriverId::from_u128(0x1f32_aa04_7c19_4b5e_9d68_31e0_c4d2_8f07);

/// Bytes per directory-entry slot.
const DIR_ENTRY_SIZE: usize = 32;

/// Characters carried per long-file-name slot.
const LFN_CHARS_PER_SLOT: usize = 13;

/// Generated name length: eight full LFN slots plus the short entry, so one
/// churned entry rewrites nine slots (288 bytes) of the table.
const CHURN_NAME_LEN: usize = 8 * LFN_CHARS_PER_SLOT - 8;

#[derive(Debug, Clone)]
pub struct Fat32Eraser {
    tuning: FillTuning,
}

impl Fat32Eraser {
    pub fn new() -> Self {
        Self {
            tuning: FillTuning {
                // one cluster of a freshly grown directory, in entry slots
                structure_entries: 4096 / DIR_ENTRY_SIZE * 8,
                entry_name_len: CHURN_NAME_LEN,
                ..FillTuning::default()
            },
        }
    }

    pub fn with_tuning(tuning: FillTuning) -> Self {
        Self { tuning }
    }
}

impl Default for Fat32Eraser {
    fn default() -> Self {
        Self::new()
    }
}

impl FsEraser for Fat32Eraser {
    fn id(&self) -> DriverId {
        FAT32_ERASER_ID
    }

    fn name(&self) -> &str {
        "FAT32"
    }

    fn supports(&self, kind: FsKind) -> bool {
        kind == FsKind::Fat32
    }

    fn erase_cluster_tips(
        &self,
        volume: &VolumeInfo,
        method: &dyn ErasureMethod,
        entropy: &mut dyn EntropySource,
        search: SearchProgress<'_>,
        erase: EraseProgress<'_>,
    ) -> FsEraseResult {
        ops::erase_cluster_tips_walk(volume, method, entropy, search, erase)
    }

    /// FAT stores no file content inside its tables, so there are no resident
    /// files to destroy. What lingers in the table region are deleted-entry
    /// records; a directory churn reuses those slots instead of filling the
    /// volume.
    fn erase_resident_metadata(
        &self,
        _volume: &VolumeInfo,
        temp_dir: &Path,
        _method: &dyn ErasureMethod,
        entropy: &mut dyn EntropySource,
        entries: EntriesProgress<'_>,
    ) -> FsEraseResult {
        ops::directory_churn(temp_dir, &self.tuning, entropy, entries)
    }

    fn erase_directory_structures(
        &self,
        _volume: &VolumeInfo,
        temp_dir: &Path,
        entropy: &mut dyn EntropySource,
        entries: EntriesProgress<'_>,
    ) -> FsEraseResult {
        ops::directory_churn(temp_dir, &self.tuning, entropy, entries)
    }

    fn erase_object(
        &self,
        volume: &VolumeInfo,
        stream: &StreamRef,
        method: &dyn ErasureMethod,
        entropy: &mut dyn EntropySource,
        progress: PassProgressFn<'_>,
    ) -> FsEraseResult {
        ops::erase_object_impl(volume, stream, method, entropy, progress)
    }

    fn file_area(&self, volume: &VolumeInfo, stream: &StreamRef) -> FsEraseResult<u64> {
        let path = stream.effective_path();
        let logical = std::fs::metadata(&path).at(&path)?.len();
        Ok(volume.allocated_size(logical))
    }

    fn reset_file_times(&self, path: &Path) -> FsEraseResult {
        ops::reset_times(path)
    }

    fn delete_file(&self, path: &Path, entropy: &mut dyn EntropySource) -> FsEraseResult {
        ops::delete_file_impl(path, entropy)
    }

    fn delete_folder(
        &self,
        path: &Path,
        recursive: bool,
        entropy: &mut dyn EntropySource,
    ) -> FsEraseResult {
        ops::delete_folder_impl(self, path, recursive, entropy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrubcore::XorShift64;
    use std::fs;

    #[test]
    fn test_identity_and_kind() {
        let eraser = Fat32Eraser::new();
        assert_eq!(eraser.id(), FAT32_ERASER_ID);
        assert!(eraser.supports(FsKind::Fat32));
        assert!(!eraser.supports(FsKind::Ext4));
        assert!(!eraser.supports(FsKind::Other));
    }

    #[test]
    fn test_churn_names_span_lfn_slots() {
        // 96 characters -> 8 LFN slots + the short entry
        assert_eq!(CHURN_NAME_LEN, 96);
        assert_eq!(Fat32Eraser::new().tuning.entry_name_len, 96);
    }

    #[test]
    fn test_directory_structures_churn_runs_clean() {
        let dir = tempfile::tempdir().unwrap();
        let eraser = Fat32Eraser::with_tuning(FillTuning {
            structure_entries: 6,
            entry_name_len: CHURN_NAME_LEN,
            ..FillTuning::default()
        });
        let vol = VolumeInfo::new(dir.path(), FsKind::Fat32, 4096);
        let mut rng = XorShift64::new(21);

        eraser
            .erase_directory_structures(&vol, dir.path(), &mut rng, &mut |_, _| {})
            .unwrap();
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
