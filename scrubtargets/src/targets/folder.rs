// SPDX-License-Identifier: MIT

//! Folder erasure target.

use std::fs;
use std::path::{Path, PathBuf};

use scrubcore::{ErasureMethod, MethodCaps, MethodRegistry, TargetKindId};
use scrubfs::{StreamRef, VolumeInfo};

use crate::binding::{MethodBinding, SavedBinding};
use crate::error::TargetError;
use crate::target::{ErasureContext, ErasureTarget, ProgressSink};

pub const FOLDER_TARGET_KIND: TargetKindId =
    TargetKindId::from_u128(0xf01d_3c58_1ab2_46e9_b7c4_0f88_52d6_e913);

/// Erases a directory tree: every contained file's content and entry go
/// first, depth-first, then the directory entries themselves.
pub struct FolderTarget {
    pub volume: VolumeInfo,
    pub path: PathBuf,
    /// Whether the folder entry itself is removed once emptied. With `false`
    /// the emptied tree is left in place.
    pub delete_folder: bool,
    binding: MethodBinding,
}

impl FolderTarget {
    pub fn new(volume: VolumeInfo, path: impl Into<PathBuf>) -> Self {
        Self {
            volume,
            path: path.into(),
            delete_folder: true,
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
            delete_folder: true,
            binding: MethodBinding::restore(saved, registry)?,
        })
    }
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>, progress: &mut dyn ProgressSink) {
    progress.searching(dir);
    let Ok(read) = fs::read_dir(dir) else {
        return;
    };
    for entry in read.flatten() {
        let path = entry.path();
        match entry.file_type() {
            Ok(t) if t.is_dir() => collect_files(&path, out, progress),
            Ok(t) if t.is_file() => out.push(path),
            _ => {}
        }
    }
}

impl ErasureTarget for FolderTarget {
    fn kind_id(&self) -> TargetKindId {
        FOLDER_TARGET_KIND
    }

    fn name(&self) -> String {
        self.path.display().to_string()
    }

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
        let entropy = &mut *ctx.entropy;
        let progress = &mut *ctx.progress;

        let mut files = Vec::new();
        collect_files(&self.path, &mut files, &mut *progress);
        let total = files.len();
        log::info!(
            "erasing folder {} ({total} files) with {}",
            self.path.display(),
            method.name()
        );

        for (index, file) in files.iter().enumerate() {
            progress.erasing(index, total, file);
            let stream = StreamRef::file(file);
            driver.erase_object(
                &self.volume,
                &stream,
                method.as_ref(),
                &mut *entropy,
                &mut |written, pass_total| progress.pass(written, pass_total),
            )?;
            driver.delete_file(file, &mut *entropy)?;
        }

        if self.delete_folder {
            // contents are gone; this clears the remaining directory entries
            driver.delete_folder_all(&self.path, &mut *entropy)?;
        }
        Ok(())
    }
}
