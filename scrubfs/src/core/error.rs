// SPDX-License-Identifier: MIT

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use scrubcore::MethodError;

use crate::core::volume::FsKind;

#[derive(Debug, Error)]
pub enum FsEraseError {
    #[error("I/O failure at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Method(#[from] MethodError),
    #[error("entry {path} still busy after {tries} attempts")]
    EntryBusy { path: PathBuf, tries: u32 },
    #[error("random name generation exhausted {0} draws, entropy source looks broken")]
    NameGeneration(u32),
    #[error("no filesystem driver registered for {0:?}")]
    NoDriver(FsKind),
    #[error("{0}")]
    Other(&'static str),
}

pub type FsEraseResult<T = ()> = Result<T, FsEraseError>;

/// Attaches the offending path to a raw I/O result.
pub trait IoResultExt<T> {
    fn at(self, path: &Path) -> FsEraseResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn at(self, path: &Path) -> FsEraseResult<T> {
        self.map_err(|source| FsEraseError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
