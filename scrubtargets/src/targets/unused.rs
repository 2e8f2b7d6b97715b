// SPDX-License-Identifier: MIT

//! Unused-space erasure target.
//!
//! Reclaims what deletion left behind on a whole volume: file cluster tips,
//! free data clusters, table-resident fragments and deleted directory-entry
//! records. Filling primitives transiently consume all free space; hosts must
//! run at most one such job per volume at a time.

use std::fs::{self, File};
use std::path::Path;

use scrubcore::{
    EntropySource, ErasureMethod, MethodCaps, MethodError, MethodRegistry, TargetKindId,
};
use scrubfs::naming::generate_random_name;
use scrubfs::ops::is_disk_full;
use scrubfs::{FsEraseError, VolumeInfo};

use crate::binding::{MethodBinding, SavedBinding};
use crate::error::TargetError;
use crate::target::{ErasureContext, ErasureTarget, ProgressSink};

pub const UNUSED_SPACE_TARGET_KIND: TargetKindId =
    TargetKindId::from_u128(0x05ed_91b3_ff60_4a2c_a1e7_7d3b_24c8_f056);

const TEMP_DIR_NAME_LEN: usize = 18;
const FILL_FILE_NAME_LEN: usize = 18;

/// Erases the unused space of one volume end-to-end.
pub struct UnusedSpaceTarget {
    pub volume: VolumeInfo,
    /// Whether file cluster tips are erased ahead of the free-space fill.
    pub erase_cluster_tips: bool,
    /// Bytes written per fill file before rolling to the next one.
    pub fill_chunk: u64,
    /// Bound on fill files. `usize::MAX` means "until the volume is full".
    pub fill_cap: usize,
    binding: MethodBinding,
}

impl UnusedSpaceTarget {
    pub fn new(volume: VolumeInfo) -> Self {
        Self {
            volume,
            erase_cluster_tips: true,
            fill_chunk: 16 * 1024 * 1024,
            fill_cap: usize::MAX,
            binding: MethodBinding::new(),
        }
    }

    /// Reconstructs a persisted target, re-resolving its method identifier.
    pub fn restore(
        volume: VolumeInfo,
        saved: &SavedBinding,
        registry: &MethodRegistry,
    ) -> Result<Self, TargetError> {
        Ok(Self {
            binding: MethodBinding::restore(saved, registry)?,
            ..Self::new(volume)
        })
    }

    /// Fills free data clusters with the method's pattern until the volume
    /// (or the cap) is exhausted. Files stay in place until teardown so the
    /// space remains claimed while the table passes run.
    fn fill_free_space(
        &self,
        temp_dir: &Path,
        method: &dyn ErasureMethod,
        entropy: &mut dyn EntropySource,
        progress: &mut dyn ProgressSink,
    ) -> Result<(), TargetError> {
        let estimated = self
            .volume
            .free_bytes_hint
            .map(|free| (free / self.fill_chunk.max(1)) as usize)
            .unwrap_or(0);

        for created in 0..self.fill_cap {
            let path = generate_random_name(Some(temp_dir), FILL_FILE_NAME_LEN, entropy)
                .map_err(TargetError::Fs)?;
            let mut file = match File::create_new(&path) {
                Ok(file) => file,
                Err(e) if is_disk_full(&e) => return Ok(()),
                Err(source) => return Err(FsEraseError::Io { path, source }.into()),
            };
            match method.erase(&mut file, self.fill_chunk, &mut *entropy, &mut |w, t| {
                progress.pass(w, t)
            }) {
                Ok(()) => {}
                Err(MethodError::Io(e)) if is_disk_full(&e) => return Ok(()),
                Err(e) => return Err(TargetError::Fs(e.into())),
            }
            progress.entries(created + 1, estimated.max(created + 1));
        }
        Ok(())
    }
}

impl ErasureTarget for UnusedSpaceTarget {
    fn kind_id(&self) -> TargetKindId {
        UNUSED_SPACE_TARGET_KIND
    }

    fn name(&self) -> String {
        format!("unused space on {}", self.volume.root.display())
    }

    /// Free space has no living stream to seek within; the method must
    /// declare unused-space capability.
    fn supports_method(&self, method: &dyn ErasureMethod) -> bool {
        method.caps().contains(MethodCaps::UNUSED_SPACE)
    }

    fn binding(&self) -> &MethodBinding {
        &self.binding
    }

    fn binding_mut(&mut self) -> &mut MethodBinding {
        &mut self.binding
    }

    fn execute(&self, ctx: &mut ErasureContext<'_>) -> Result<(), TargetError> {
        let driver = ctx.drivers.for_volume(&self.volume)?;
        let method = self.effective_method(ctx.methods)?;
        let entropy = &mut *ctx.entropy;
        let progress = &mut *ctx.progress;
        log::info!("erasing {} with {}", self.name(), method.name());

        if self.erase_cluster_tips {
            // both callbacks feed the same sink; calls are in-line and never
            // reentrant, so the RefCell cannot be borrowed twice at once
            let sink = std::cell::RefCell::new(&mut *progress);
            driver.erase_cluster_tips(
                &self.volume,
                method.as_ref(),
                &mut *entropy,
                &mut |path| sink.borrow_mut().searching(path),
                &mut |index, total, path| sink.borrow_mut().erasing(index, total, path),
            )?;
        }

        let temp_dir =
            generate_random_name(Some(&self.volume.root), TEMP_DIR_NAME_LEN, &mut *entropy)
                .map_err(TargetError::Fs)?;
        fs::create_dir(&temp_dir).map_err(|source| FsEraseError::Io {
            path: temp_dir.clone(),
            source,
        })?;

        let passes = (|| -> Result<(), TargetError> {
            self.fill_free_space(&temp_dir, method.as_ref(), &mut *entropy, &mut *progress)?;
            driver.erase_resident_metadata(
                &self.volume,
                &temp_dir,
                method.as_ref(),
                &mut *entropy,
                &mut |done, total| progress.entries(done, total),
            )?;
            driver.erase_directory_structures(
                &self.volume,
                &temp_dir,
                &mut *entropy,
                &mut |done, total| progress.entries(done, total),
            )?;
            Ok(())
        })();

        // teardown releases the claimed space even when a pass failed
        let teardown = driver
            .delete_folder_all(&temp_dir, &mut *entropy)
            .map_err(TargetError::Fs);
        passes.and(teardown)
    }
}
