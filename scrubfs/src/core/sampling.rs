// SPDX-License-Identifier: MIT

//! Random file sampling.
//!
//! Picks one arbitrary file reachable from a starting directory, used by
//! consumers that need "some file on this volume" cheaply (e.g. to probe
//! cluster geometry or to exercise plausible-deniability decoys).

use std::fs;
use std::path::{Path, PathBuf};

use scrubcore::EntropySource;

/// Bound on retries at one directory level when chosen subdirectories keep
/// coming up empty. A directory of nothing but empty subtrees yields `None`
/// once exhausted.
const SAMPLING_RETRY_CAP: usize = 64;

/// Returns the path of one randomly chosen file under `dir`, or `None` when
/// the directory is absent, unreadable or contains nothing.
///
/// Every immediate entry of a directory is drawn with equal probability, so a
/// file in a sparsely populated subtree is more likely to be picked than a
/// uniform draw over all leaf files would make it. Callers rely only on
/// "an arbitrary file", not on the exact distribution.
///
/// A directory that vanishes between listing and descent yields `None` for
/// that branch, not an error.
pub fn random_file_in(dir: &Path, entropy: &mut dyn EntropySource) -> Option<PathBuf> {
    let entries: Vec<PathBuf> = match fs::read_dir(dir) {
        Ok(read) => read.filter_map(|e| e.ok().map(|e| e.path())).collect(),
        Err(_) => return None,
    };
    if entries.is_empty() {
        return None;
    }

    for _ in 0..SAMPLING_RETRY_CAP {
        let pick = &entries[entropy.next_below(entries.len())];
        if pick.is_dir() {
            if let Some(found) = random_file_in(pick, entropy) {
                return Some(found);
            }
            // empty subtree: retry at this level
        } else {
            return Some(pick.clone());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrubcore::XorShift64;
    use std::fs::File;

    #[test]
    fn test_missing_or_empty_directory_yields_none() {
        let mut rng = XorShift64::new(5);
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(random_file_in(dir.path(), &mut rng), None);
        assert_eq!(random_file_in(&dir.path().join("gone"), &mut rng), None);
    }

    #[test]
    fn test_single_file_is_always_found() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("only.bin");
        File::create(&file).unwrap();

        let mut rng = XorShift64::new(5);
        for _ in 0..20 {
            assert_eq!(random_file_in(dir.path(), &mut rng), Some(file.clone()));
        }
    }

    #[test]
    fn test_descends_into_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        let file = dir.path().join("a/b/leaf.txt");
        File::create(&file).unwrap();

        let mut rng = XorShift64::new(5);
        for _ in 0..20 {
            assert_eq!(random_file_in(dir.path(), &mut rng), Some(file.clone()));
        }
    }

    #[test]
    fn test_only_empty_subtrees_yield_none() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("x/y")).unwrap();
        fs::create_dir_all(dir.path().join("z")).unwrap();

        let mut rng = XorShift64::new(5);
        assert_eq!(random_file_in(dir.path(), &mut rng), None);
    }
}
