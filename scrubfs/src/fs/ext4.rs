// SPDX-License-Identifier: MIT

//! EXT4 erasure driver.
//!
//! Two table-resident surfaces matter here. Files up to 60 bytes can live
//! entirely in the inode's block array (`inline_data`), so freed inodes keep
//! old content until the inode slot is reallocated; the resident pass churns
//! 60-byte files to recycle those slots. Directory blocks hold variable-length
//! `ext4_dir_entry_2` records whose name bytes survive deletion (removal just
//! widens the previous record), so the structure pass churns long-named
//! entries to rewrite the freed ranges.

use std::path::Path;

use scrubcore::{DriverId, EntropySource, ErasureMethod, PassProgressFn};

use crate::core::eraser::{EntriesProgress, EraseProgress, FsEraser, SearchProgress};
use crate::core::error::{FsEraseResult, IoResultExt};
use crate::core::ops::{self, FillTuning};
use crate::core::volume::{FsKind, StreamRef, VolumeInfo};

pub const EXT4_ERASER_ID: DriverId =
    DriverId::from_u128(0xe4_11c6_20b8_4f73_a9d1_55f2_803c_6b9e);

/// Largest payload an inode stores inline (the 60-byte `i_block` array).
const INLINE_DATA_MAX: u64 = 60;

/// Fixed part of an `ext4_dir_entry_2` record ahead of the name bytes.
const DIRENT_HEADER: usize = 8;

/// Name length used for churned entries; with the header this makes each
/// record 48 bytes after 4-byte alignment, a divisor of the 4096-byte
/// directory block.
const CHURN_NAME_LEN: usize = 48 - DIRENT_HEADER;

#[derive(Debug, Clone)]
pub struct Ext4Eraser {
    tuning: FillTuning,
}

impl Ext4Eraser {
    pub fn new() -> Self {
        Self {
            tuning: FillTuning {
                resident_file_size: INLINE_DATA_MAX,
                // two directory blocks' worth of churned records
                structure_entries: 2 * 4096 / 48,
                entry_name_len: CHURN_NAME_LEN,
                ..FillTuning::default()
            },
        }
    }

    pub fn with_tuning(tuning: FillTuning) -> Self {
        Self { tuning }
    }
}

impl Default for Ext4Eraser {
    fn default() -> Self {
        Self::new()
    }
}

impl FsEraser for Ext4Eraser {
    fn id(&self) -> DriverId {
        EXT4_ERASER_ID
    }

    fn name(&self) -> &str {
        "EXT4"
    }

    fn supports(&self, kind: FsKind) -> bool {
        kind == FsKind::Ext4
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

    fn erase_resident_metadata(
        &self,
        volume: &VolumeInfo,
        temp_dir: &Path,
        method: &dyn ErasureMethod,
        entropy: &mut dyn EntropySource,
        entries: EntriesProgress<'_>,
    ) -> FsEraseResult {
        ops::resident_fill(volume, temp_dir, &self.tuning, method, entropy, entries)
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

    /// Inline files occupy no data block at all, so there is no allocated
    /// cluster area to size a tip pass from. Their content lives in the inode
    /// and is destroyed by [`FsEraser::erase_object`]'s in-place rewrite and
    /// recycled by the resident pass, never by an area-sized overwrite.
    /// Everything else rounds up to whole clusters.
    fn file_area(&self, volume: &VolumeInfo, stream: &StreamRef) -> FsEraseResult<u64> {
        let path = stream.effective_path();
        let logical = std::fs::metadata(&path).at(&path)?.len();
        if logical <= INLINE_DATA_MAX {
            return Ok(0);
        }
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
    use std::fs::{self, File};
    use std::io::Write;

    struct Zeroes;
    impl ErasureMethod for Zeroes {
        fn id(&self) -> scrubcore::MethodId {
            scrubcore::MethodId::from_u128(0x2E20)
        }
        fn name(&self) -> &str {
            "zero"
        }
        fn caps(&self) -> scrubcore::MethodCaps {
            scrubcore::MethodCaps::all()
        }
        fn erase(
            &self,
            sink: &mut dyn scrubcore::ErasureSink,
            total: u64,
            _entropy: &mut dyn EntropySource,
            _progress: scrubcore::PassProgressFn<'_>,
        ) -> Result<(), scrubcore::MethodError> {
            sink.write_all(&vec![0u8; total as usize])?;
            Ok(())
        }
    }

    #[test]
    fn test_identity_and_kind() {
        let eraser = Ext4Eraser::new();
        assert_eq!(eraser.id(), EXT4_ERASER_ID);
        assert!(eraser.supports(FsKind::Ext4));
        assert!(!eraser.supports(FsKind::Fat32));
    }

    #[test]
    fn test_inline_files_have_no_allocated_area() {
        let dir = tempfile::tempdir().unwrap();
        let small = dir.path().join("inline.txt");
        File::create(&small).unwrap().write_all(&[1u8; 60]).unwrap();
        let big = dir.path().join("extent.txt");
        File::create(&big).unwrap().write_all(&[1u8; 61]).unwrap();

        let eraser = Ext4Eraser::new();
        let vol = VolumeInfo::new(dir.path(), FsKind::Ext4, 4096);
        assert_eq!(eraser.file_area(&vol, &StreamRef::file(&small)).unwrap(), 0);
        assert_eq!(
            eraser.file_area(&vol, &StreamRef::file(&big)).unwrap(),
            4096
        );
    }

    #[test]
    fn test_resident_fill_uses_inline_sized_files() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Ext4Eraser::new().tuning.resident_file_size, 60);

        let eraser = Ext4Eraser::with_tuning(FillTuning {
            resident_file_size: INLINE_DATA_MAX,
            entry_name_len: CHURN_NAME_LEN,
            fill_cap: 5,
            ..FillTuning::default()
        });
        let vol = VolumeInfo::new(dir.path(), FsKind::Ext4, 4096);
        let mut rng = XorShift64::new(31);

        eraser
            .erase_resident_metadata(&vol, dir.path(), &Zeroes, &mut rng, &mut |_, _| {})
            .unwrap();
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_erase_object_destroys_inline_sized_content() {
        // file_area reports 0 for inline files; the overwrite path must not
        // size itself from that and skip them.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inline.bin");
        File::create(&path).unwrap().write_all(&[9u8; 60]).unwrap();

        let eraser = Ext4Eraser::new();
        let vol = VolumeInfo::new(dir.path(), FsKind::Ext4, 4096);
        assert_eq!(eraser.file_area(&vol, &StreamRef::file(&path)).unwrap(), 0);

        let mut rng = XorShift64::new(17);
        eraser
            .erase_object(&vol, &StreamRef::file(&path), &Zeroes, &mut rng, &mut |_, _| {})
            .unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
    }
}
