// SPDX-License-Identifier: MIT

//! Generic erasure driver.
//!
//! Serves any mounted filesystem through `std::fs` plus the volume's cluster
//! geometry. Filesystem-specific drivers under [`crate::fs`] reuse the same
//! mechanics with tuned parameters and table-specific behavior.

use std::path::Path;

use scrubcore::{DriverId, EntropySource, ErasureMethod, PassProgressFn};

use crate::core::eraser::{EntriesProgress, EraseProgress, FsEraser, SearchProgress};
use crate::core::error::{FsEraseResult, IoResultExt};
use crate::core::ops::{self, FillTuning};
use crate::core::volume::{FsKind, StreamRef, VolumeInfo};

pub const STD_ERASER_ID: DriverId =
    DriverId::from_u128(0x6f56_1b8c_93d4_4e0a_8a3f_02c1_d7be_55a1);

/// Driver of last resort: accepts every [`FsKind`] and assumes nothing about
/// table layout beyond what the volume handle declares. Register it after the
/// specific drivers so they win their kinds.
#[derive(Debug, Clone, Default)]
pub struct StdEraser {
    tuning: FillTuning,
}

impl StdEraser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tuning(tuning: FillTuning) -> Self {
        Self { tuning }
    }

    pub fn tuning(&self) -> &FillTuning {
        &self.tuning
    }
}

impl FsEraser for StdEraser {
    fn id(&self) -> DriverId {
        STD_ERASER_ID
    }

    fn name(&self) -> &str {
        "Generic"
    }

    fn supports(&self, _kind: FsKind) -> bool {
        true
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
