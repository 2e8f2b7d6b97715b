// SPDX-License-Identifier: MIT

//! Single-file erasure target.

use std::path::PathBuf;

use scrubcore::{ErasureMethod, MethodCaps, MethodRegistry, TargetKindId};
use scrubfs::{StreamRef, VolumeInfo};

use crate::binding::{MethodBinding, SavedBinding};
use crate::error::TargetError;
use crate::target::{ErasureContext, ErasureTarget};

pub const FILE_TARGET_KIND: TargetKindId =
    TargetKindId::from_u128(0xf11e_6a27_90cd_4b18_8453_da60_1e9b_c572);

/// Erases one file: content first (slack space included), then the directory
/// entry through the driver's secure removal.
pub struct FileTarget {
    pub volume: VolumeInfo,
    pub path: PathBuf,
    binding: MethodBinding,
}

impl FileTarget {
    pub fn new(volume: VolumeInfo, path: impl Into<PathBuf>) -> Self {
        Self {
            volume,
            path: path.into(),
            binding: MethodBinding::new(),
        }
    }

    /// Reconstructs a persisted target, re-resolving its method identifier.
    pub fn restore(
        volume: VolumeInfo,
        path: impl Into<PathBuf>,
        saved: &SavedBinding,
        registry: &MethodRegistry,
    ) -> Result<Self, TargetError> {
        Ok(Self {
            volume,
            path: path.into(),
            binding: MethodBinding::restore(saved, registry)?,
        })
    }
}

impl ErasureTarget for FileTarget {
    fn kind_id(&self) -> TargetKindId {
        FILE_TARGET_KIND
    }

    fn name(&self) -> String {
        self.path.display().to_string()
    }

    /// In-place overwriting of a living file needs random access within it.
    fn supports_method(&self, method: &dyn ErasureMethod) -> bool {
        method.caps().contains(MethodCaps::RANDOM_ACCESS)
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
        log::info!(
            "erasing file {} with {} via {}",
            self.path.display(),
            method.name(),
            driver.name()
        );

        let entropy = &mut *ctx.entropy;
        let progress = &mut *ctx.progress;
        progress.erasing(0, 1, &self.path);

        let stream = StreamRef::file(&self.path);
        driver.erase_object(
            &self.volume,
            &stream,
            method.as_ref(),
            &mut *entropy,
            &mut |written, total| progress.pass(written, total),
        )?;
        driver.delete_file(&self.path, &mut *entropy)?;
        Ok(())
    }
}
