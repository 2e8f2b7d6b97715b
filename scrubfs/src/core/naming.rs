// SPDX-License-Identifier: MIT

//! Collision-free random name generation.
//!
//! Names generated here overwrite directory-entry slots during rename cycles,
//! so they must never match an existing entry nor a device name the host
//! operating environment reserves regardless of extension.

use std::fs;
use std::path::{Path, PathBuf};

use scrubcore::EntropySource;

use crate::core::error::{FsEraseError, FsEraseResult};

/// Characters a generated name may contain. Digits, letters and a fixed
/// punctuation set; the space is the only whitespace and is never allowed in
/// first or last position.
pub const NAME_ALPHABET: &str =
    "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ _+=-()[]{}',`~!";

/// Names reserved by the host environment, matched case-insensitively against
/// the extension-stripped form.
pub const RESERVED_NAMES: [&str; 22] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Defensive bound on full-name draws. The collision space is astronomically
/// larger than any practical directory, so hitting this means the entropy
/// source stopped producing fresh bytes.
pub const NAME_GENERATION_CAP: u32 = 100_000;

/// Generates a random name of exactly `length` characters.
///
/// With a containing directory the result is its full path and is guaranteed,
/// at the moment of return, not to collide with any existing entry there.
/// Without one, the bare name is returned. Reserved device names are skipped
/// in either case.
pub fn generate_random_name(
    dir: Option<&Path>,
    length: usize,
    entropy: &mut dyn EntropySource,
) -> FsEraseResult<PathBuf> {
    let alphabet = NAME_ALPHABET.as_bytes();
    let mut raw = vec![0u8; length];

    for _ in 0..NAME_GENERATION_CAP {
        entropy.fill_bytes(&mut raw);
        for i in 0..raw.len() {
            raw[i] = alphabet[raw[i] as usize % alphabet.len()];
            if i == 0 || i == raw.len() - 1 {
                // First and last characters must not be whitespace. The current
                // alphabet maps the space back onto a letter in one step, but
                // the check must survive alphabet changes.
                while raw[i].is_ascii_whitespace() {
                    raw[i] = alphabet[raw[i] as usize % alphabet.len()];
                }
            }
        }
        // The alphabet is pure ASCII, so the bytes decode losslessly.
        let name = String::from_utf8_lossy(&raw).into_owned();

        if is_reserved_name(&name) {
            continue;
        }
        match dir {
            None => return Ok(PathBuf::from(name)),
            Some(dir) => {
                let candidate = dir.join(&name);
                // symlink_metadata also sees dangling symlinks, which still
                // occupy the entry slot
                if fs::symlink_metadata(&candidate).is_err() {
                    return Ok(candidate);
                }
            }
        }
    }
    Err(FsEraseError::NameGeneration(NAME_GENERATION_CAP))
}

/// Whether `name`, stripped of its last extension, matches a reserved device
/// name.
pub fn is_reserved_name(name: &str) -> bool {
    let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
    RESERVED_NAMES.iter().any(|r| r.eq_ignore_ascii_case(stem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrubcore::{ScriptedEntropy, XorShift64};
    use std::fs::File;

    #[test]
    fn test_reserved_names_strip_extension() {
        assert!(is_reserved_name("CON"));
        assert!(is_reserved_name("con"));
        assert!(is_reserved_name("Aux.txt"));
        assert!(is_reserved_name("lpt9.dat"));
        assert!(!is_reserved_name("CONSOLE"));
        assert!(!is_reserved_name("COM10"));
    }

    #[test]
    fn test_name_shape_for_all_lengths() {
        let mut rng = XorShift64::new(1234);
        for length in [2usize, 3, 8, 64, 255] {
            for _ in 0..50 {
                let name = generate_random_name(None, length, &mut rng).unwrap();
                let name = name.to_str().unwrap();
                assert_eq!(name.chars().count(), length);
                assert!(name.chars().all(|c| NAME_ALPHABET.contains(c)));
                assert!(!name.chars().next().unwrap().is_whitespace());
                assert!(!name.chars().last().unwrap().is_whitespace());
            }
        }
    }

    #[test]
    fn test_generated_name_avoids_existing_entries() {
        let dir = tempfile::tempdir().unwrap();
        // Bytes 1,2,3 map to "123"; the script forces that draw first, so the
        // pre-created "123" entry must push generation to the next draw (4,5,6
        // -> "456").
        File::create(dir.path().join("123")).unwrap();
        let mut rng = ScriptedEntropy::new(vec![1, 2, 3, 4, 5, 6]);

        let name = generate_random_name(Some(dir.path()), 3, &mut rng).unwrap();
        assert_eq!(name, dir.path().join("456"));
    }

    #[test]
    fn test_generated_name_skips_reserved_device_names() {
        let dir = tempfile::tempdir().unwrap();
        // 36, 56, 59 map to "AUX"; 1, 2, 3 map to "123".
        let mut rng = ScriptedEntropy::new(vec![36, 56, 59, 1, 2, 3]);

        let name = generate_random_name(Some(dir.path()), 3, &mut rng).unwrap();
        assert_eq!(name, dir.path().join("123"));
    }

    #[test]
    fn test_collision_loop_terminates_once_free_combination_appears() {
        // Pre-populate every 3-character combination of a 2-symbol alphabet
        // subset ('a' = byte 10, 'b' = byte 11), then script the draws through
        // all of them before offering a byte outside the subset.
        let dir = tempfile::tempdir().unwrap();
        let symbols = [b'a', b'b'];
        let mut script = Vec::new();
        for &a in &symbols {
            for &b in &symbols {
                for &c in &symbols {
                    let name: String = [a, b, c].iter().map(|&x| x as char).collect();
                    File::create(dir.path().join(&name)).unwrap();
                    // 'a' and 'b' sit at alphabet indices 10 and 11
                    script.extend_from_slice(&[a - b'a' + 10, b - b'a' + 10, c - b'a' + 10]);
                }
            }
        }
        script.extend_from_slice(&[12, 10, 10]); // "caa", outside the set

        let mut rng = ScriptedEntropy::new(script);
        let name = generate_random_name(Some(dir.path()), 3, &mut rng).unwrap();
        assert_eq!(name, dir.path().join("caa"));
    }

    #[test]
    fn test_broken_entropy_source_fails_instead_of_hanging() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("000")).unwrap();
        // A stuck source keeps producing the same colliding draw.
        let mut rng = ScriptedEntropy::new(vec![0]);

        let err = generate_random_name(Some(dir.path()), 3, &mut rng).unwrap_err();
        assert!(matches!(err, FsEraseError::NameGeneration(_)));
    }
}
