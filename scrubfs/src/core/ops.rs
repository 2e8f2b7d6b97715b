// SPDX-License-Identifier: MIT

//! Shared erasure routines.
//!
//! The concrete drivers differ in tuning (entry-slot widths, resident-file
//! sizes), not in mechanics; the mechanics live here. Loop bodies are kept
//! per-entry so an external abort mechanism can interpose between iterations.

use std::fs::{self, File, FileTimes, OpenOptions};
use std::io::{self, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, SystemTime};

use time::OffsetDateTime;
use time::macros::datetime;

use scrubcore::{EntropySource, ErasureMethod, MethodError, PassProgressFn};

use crate::core::eraser::{
    EntriesProgress, EraseProgress, FsEraser, SearchProgress, FILE_NAME_ERASE_PASSES,
    FILE_NAME_ERASE_TRIES,
};
use crate::core::error::{FsEraseError, FsEraseResult, IoResultExt};
use crate::core::naming::generate_random_name;
use crate::core::volume::{StreamRef, VolumeInfo};

/// Timestamp value entries are reset to. The FAT epoch is the oldest instant
/// every supported filesystem accepts.
pub const NEUTRAL_TIME: OffsetDateTime = datetime!(1980-01-01 0:00 UTC);

const RETRY_BACKOFF: Duration = Duration::from_millis(100);

/// Per-driver tuning of the fill and churn loops.
#[derive(Debug, Clone)]
pub struct FillTuning {
    /// Size of the temporary files used to churn table-resident storage.
    pub resident_file_size: u64,
    /// Entries created by one directory-structure pass.
    pub structure_entries: usize,
    /// Generated entry-name length, matched to the slot width of the target
    /// table.
    pub entry_name_len: usize,
    /// Bound on files created by a resident fill. `usize::MAX` means "until
    /// the volume is full".
    pub fill_cap: usize,
}

impl Default for FillTuning {
    fn default() -> Self {
        Self {
            resident_file_size: 1024,
            structure_entries: 4096,
            entry_name_len: 18,
            fill_cap: usize::MAX,
        }
    }
}

/// Whether an I/O failure signals an exhausted volume, which ends a fill loop
/// normally instead of erroring.
pub fn is_disk_full(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::StorageFull | io::ErrorKind::QuotaExceeded
    )
}

fn neutral_system_time() -> SystemTime {
    SystemTime::from(NEUTRAL_TIME)
}

fn apply_times(file: &File, accessed: SystemTime, modified: SystemTime) -> io::Result<()> {
    let times = FileTimes::new().set_accessed(accessed).set_modified(modified);
    #[cfg(windows)]
    let times = {
        use std::os::windows::fs::FileTimesExt;
        times.set_created(modified)
    };
    file.set_times(times)
}

/// Resets the entry's timestamps to [`NEUTRAL_TIME`].
///
/// Directories that cannot be opened for timestamp updates on this platform
/// are left alone; their entry is about to be renamed away anyway.
pub fn reset_times(path: &Path) -> FsEraseResult {
    let neutral = neutral_system_time();
    match File::open(path) {
        Ok(file) => apply_times(&file, neutral, neutral).at(path),
        Err(_) if path.is_dir() => Ok(()),
        Err(source) => Err(FsEraseError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Renames the entry through [`FILE_NAME_ERASE_PASSES`] random names, so the
/// name slot in the metadata table is overwritten, and returns the final path.
///
/// Failing renames (locked entries) are retried, each pass with its own
/// [`FILE_NAME_ERASE_TRIES`] budget; exhausting a pass's budget is a hard
/// failure.
pub fn erase_entry_name(path: &Path, entropy: &mut dyn EntropySource) -> FsEraseResult<PathBuf> {
    let mut current = path.to_path_buf();
    let Some(parent) = path.parent().map(Path::to_path_buf) else {
        return Ok(current);
    };
    let name_len = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.chars().count())
        .ok_or(FsEraseError::Other("entry has no usable file name"))?;

    for _ in 0..FILE_NAME_ERASE_PASSES {
        let mut tries = 0u32;
        loop {
            let next = generate_random_name(Some(&parent), name_len, entropy)?;
            match fs::rename(&current, &next) {
                Ok(()) => {
                    current = next;
                    break;
                }
                Err(e) => {
                    tries += 1;
                    if tries >= FILE_NAME_ERASE_TRIES {
                        return Err(FsEraseError::EntryBusy {
                            path: current,
                            tries,
                        });
                    }
                    log::debug!("rename of {} failed ({e}), retrying", current.display());
                    thread::sleep(RETRY_BACKOFF);
                }
            }
        }
    }
    Ok(current)
}

fn remove_with_retry(
    path: &Path,
    mut remove: impl FnMut(&Path) -> io::Result<()>,
) -> FsEraseResult {
    let mut tries = 0u32;
    loop {
        match remove(path) {
            Ok(()) => return Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                tries += 1;
                if tries >= FILE_NAME_ERASE_TRIES {
                    return Err(FsEraseError::EntryBusy {
                        path: path.to_path_buf(),
                        tries,
                    });
                }
                log::debug!("removal of {} failed ({e}), retrying", path.display());
                thread::sleep(RETRY_BACKOFF);
            }
        }
    }
}

/// Entry removal with name-slot erasure and timestamp neutralization.
pub fn delete_file_impl(path: &Path, entropy: &mut dyn EntropySource) -> FsEraseResult {
    let current = erase_entry_name(path, entropy)?;
    reset_times(&current)?;
    remove_with_retry(&current, |p| fs::remove_file(p))
}

/// Secure folder deletion; with `recursive`, contents go first, depth-first.
///
/// Dispatches contained entries back through `eraser` so driver-specific
/// overrides of [`FsEraser::delete_file`] apply.
pub fn delete_folder_impl(
    eraser: &dyn FsEraser,
    path: &Path,
    recursive: bool,
    entropy: &mut dyn EntropySource,
) -> FsEraseResult {
    if recursive {
        for entry in fs::read_dir(path).at(path)? {
            let entry = entry.at(path)?;
            let child = entry.path();
            let is_dir = entry.file_type().at(&child)?.is_dir();
            if is_dir {
                eraser.delete_folder(&child, true, entropy)?;
            } else {
                eraser.delete_file(&child, entropy)?;
            }
        }
    }
    let current = erase_entry_name(path, entropy)?;
    reset_times(&current)?;
    remove_with_retry(&current, |p| fs::remove_dir(p))
}

/// Overwrites the full allocated area of one stream and truncates it away.
pub fn erase_object_impl(
    volume: &VolumeInfo,
    stream: &StreamRef,
    method: &dyn ErasureMethod,
    entropy: &mut dyn EntropySource,
    progress: PassProgressFn<'_>,
) -> FsEraseResult {
    let path = stream.effective_path();
    let logical = fs::metadata(&path).at(&path)?.len();
    let area = volume.allocated_size(logical);

    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(&path)
        .at(&path)?;
    if area > logical {
        // cover the slack bytes of the final cluster too
        file.set_len(area).at(&path)?;
    }
    if area > 0 {
        file.seek(SeekFrom::Start(0)).at(&path)?;
        method.erase(&mut file, area, entropy, progress)?;
        file.sync_all().at(&path)?;
    }
    file.set_len(0).at(&path)?;
    Ok(())
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>, search: SearchProgress<'_>) {
    search(dir);
    let Ok(read) = fs::read_dir(dir) else {
        // vanished or unreadable directory: skip the branch
        return;
    };
    for entry in read.flatten() {
        let path = entry.path();
        let Ok(meta) = fs::symlink_metadata(&path) else {
            continue;
        };
        if meta.is_dir() {
            collect_files(&path, out, &mut *search);
        } else if meta.is_file() {
            out.push(path);
        }
    }
}

/// Returns false when the file could not be opened (locked, gone, read-only);
/// such files are skipped, not fatal. Failures past the open propagate.
fn erase_one_tip(
    volume: &VolumeInfo,
    path: &Path,
    method: &dyn ErasureMethod,
    entropy: &mut dyn EntropySource,
) -> FsEraseResult<bool> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_file() => meta,
        _ => return Ok(false),
    };
    let logical = meta.len();
    let area = volume.allocated_size(logical);
    if area <= logical {
        return Ok(true);
    }

    let mut file = match OpenOptions::new().read(true).write(true).open(path) {
        Ok(file) => file,
        Err(e) => {
            log::warn!("skipping cluster tip of {} ({e})", path.display());
            return Ok(false);
        }
    };
    let accessed = meta.accessed().at(path)?;
    let modified = meta.modified().at(path)?;

    file.set_len(area).at(path)?;
    file.seek(SeekFrom::Start(logical)).at(path)?;
    method.erase(&mut file, area - logical, entropy, &mut |_, _| {})?;
    file.set_len(logical).at(path)?;
    // the pass itself must not leave a timestamp trail
    apply_times(&file, accessed, modified).at(path)?;
    Ok(true)
}

/// Walks the volume and overwrites every file's cluster tip.
pub fn erase_cluster_tips_walk(
    volume: &VolumeInfo,
    method: &dyn ErasureMethod,
    entropy: &mut dyn EntropySource,
    search: SearchProgress<'_>,
    erase: EraseProgress<'_>,
) -> FsEraseResult {
    let mut files = Vec::new();
    collect_files(&volume.root, &mut files, search);

    let total = files.len();
    log::info!(
        "erasing cluster tips of {total} files under {}",
        volume.root.display()
    );
    for (index, path) in files.iter().enumerate() {
        erase(index, total, path);
        erase_one_tip(volume, path, method, entropy)?;
    }
    Ok(())
}

/// Creates pattern-filled files of `tuning.resident_file_size` bytes until the
/// volume (or the `fill_cap`) is exhausted, then removes them, forcing reuse
/// of freed table slots.
pub fn resident_fill(
    volume: &VolumeInfo,
    temp_dir: &Path,
    tuning: &FillTuning,
    method: &dyn ErasureMethod,
    entropy: &mut dyn EntropySource,
    entries: EntriesProgress<'_>,
) -> FsEraseResult {
    let estimated = volume
        .free_bytes_hint
        .map(|free| (free / tuning.resident_file_size.max(1)) as usize)
        .unwrap_or(0);
    let mut created: Vec<PathBuf> = Vec::new();

    let filled: FsEraseResult = loop {
        if created.len() >= tuning.fill_cap {
            break Ok(());
        }
        let path = generate_random_name(Some(temp_dir), tuning.entry_name_len, entropy)?;
        let mut file = match File::create_new(&path) {
            Ok(file) => file,
            Err(e) if is_disk_full(&e) => break Ok(()),
            Err(source) => {
                break Err(FsEraseError::Io {
                    path,
                    source,
                })
            }
        };
        match method.erase(
            &mut file,
            tuning.resident_file_size,
            entropy,
            &mut |_, _| {},
        ) {
            Ok(()) => {}
            Err(MethodError::Io(e)) if is_disk_full(&e) => {
                created.push(path);
                break Ok(());
            }
            Err(e) => break Err(e.into()),
        }
        created.push(path);
        entries(created.len(), estimated.max(created.len()));
    };

    log::debug!(
        "resident fill created {} files in {}",
        created.len(),
        temp_dir.display()
    );
    // teardown happens even when the fill failed midway
    for path in &created {
        if let Err(e) = fs::remove_file(path) {
            log::warn!("leftover fill file {} ({e})", path.display());
        }
    }
    filled
}

/// Creates randomly named entries until directory structures grow over freed
/// regions. The random names themselves overwrite deleted-entry slots, so the
/// entries can be removed plainly afterwards.
pub fn directory_churn(
    temp_dir: &Path,
    tuning: &FillTuning,
    entropy: &mut dyn EntropySource,
    entries: EntriesProgress<'_>,
) -> FsEraseResult {
    let mut created: Vec<PathBuf> = Vec::new();
    let estimated = tuning.structure_entries * 2;

    for index in 0..tuning.structure_entries {
        let path = generate_random_name(Some(temp_dir), tuning.entry_name_len, entropy)?;
        match File::create_new(&path) {
            Ok(_) => created.push(path),
            Err(e) if is_disk_full(&e) => break,
            Err(source) => return Err(FsEraseError::Io { path, source }),
        }
        entries(index + 1, estimated);
    }

    let total = tuning.structure_entries + created.len();
    for (index, path) in created.iter().enumerate() {
        remove_with_retry(path, |p| fs::remove_file(p))?;
        entries(tuning.structure_entries + index + 1, total);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrubcore::XorShift64;
    use std::fs::File;
    use std::io::Write;

    #[test]
    fn test_reset_times_applies_neutral_stamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stamped.txt");
        File::create(&path).unwrap().write_all(b"x").unwrap();

        reset_times(&path).unwrap();
        let meta = fs::metadata(&path).unwrap();
        assert_eq!(meta.modified().unwrap(), SystemTime::from(NEUTRAL_TIME));
    }

    #[test]
    fn test_erase_entry_name_keeps_length_and_location() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("original.bin");
        File::create(&path).unwrap();

        let mut rng = XorShift64::new(11);
        let last = erase_entry_name(&path, &mut rng).unwrap();

        assert!(!path.exists());
        assert!(last.exists());
        assert_eq!(last.parent(), path.parent());
        assert_eq!(
            last.file_name().unwrap().to_str().unwrap().chars().count(),
            "original.bin".chars().count()
        );
    }

    #[test]
    fn test_remove_retry_budget_exhaustion_is_hard_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("busy.bin");

        let err = remove_with_retry(&path, |_| {
            Err(io::Error::from(io::ErrorKind::PermissionDenied))
        })
        .unwrap_err();

        assert!(matches!(
            err,
            FsEraseError::EntryBusy { tries, .. } if tries == FILE_NAME_ERASE_TRIES
        ));
    }

    #[test]
    fn test_rename_budget_is_per_pass() {
        // A missing source fails every rename, so the first pass must burn
        // exactly its own budget, not an accumulated one.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.bin");
        let mut rng = XorShift64::new(13);

        let err = erase_entry_name(&path, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            FsEraseError::EntryBusy { tries, .. } if tries == FILE_NAME_ERASE_TRIES
        ));
    }

    #[test]
    fn test_delete_file_impl_removes_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("victim.dat");
        File::create(&path).unwrap().write_all(b"abc").unwrap();

        let mut rng = XorShift64::new(3);
        delete_file_impl(&path, &mut rng).unwrap();

        assert!(!path.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_directory_churn_leaves_directory_empty() {
        let dir = tempfile::tempdir().unwrap();
        let tuning = FillTuning {
            structure_entries: 12,
            entry_name_len: 10,
            ..FillTuning::default()
        };
        let mut rng = XorShift64::new(77);
        let mut last_seen = (0usize, 0usize);

        directory_churn(dir.path(), &tuning, &mut rng, &mut |done, total| {
            last_seen = (done, total);
        })
        .unwrap();

        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
        assert_eq!(last_seen, (24, 24));
    }
}
