// SPDX-License-Identifier: MIT

//! Volume and stream handles.
//!
//! Caller-constructed value types identifying what an erasure primitive
//! operates on. A [`VolumeInfo`] pins the mount point and cluster geometry of
//! one mounted filesystem; a [`StreamRef`] names one data stream of a file,
//! which on single-stream filesystems is just the file itself.

use std::path::{Path, PathBuf};

/// Filesystem families with a dedicated driver. `Other` is served by the
/// generic [`crate::StdEraser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FsKind {
    Fat32,
    Ext4,
    Other,
}

/// A mounted filesystem instance.
#[derive(Debug, Clone)]
pub struct VolumeInfo {
    /// Mount point; fill loops and tip walks start here.
    pub root: PathBuf,
    pub kind: FsKind,
    /// Allocation-unit size in bytes. Non-zero.
    pub cluster_size: u64,
    /// Best-effort free-space estimate, used only to size progress totals.
    pub free_bytes_hint: Option<u64>,
}

impl VolumeInfo {
    pub fn new(root: impl Into<PathBuf>, kind: FsKind, cluster_size: u64) -> Self {
        debug_assert!(cluster_size > 0);
        Self {
            root: root.into(),
            kind,
            cluster_size: cluster_size.max(1),
            free_bytes_hint: None,
        }
    }

    pub fn with_free_hint(mut self, bytes: u64) -> Self {
        self.free_bytes_hint = Some(bytes);
        self
    }

    /// Bytes actually allocated for a stream of `logical` length, rounded up
    /// to whole clusters. Empty streams occupy no data cluster.
    pub fn allocated_size(&self, logical: u64) -> u64 {
        if logical == 0 {
            0
        } else {
            logical.div_ceil(self.cluster_size) * self.cluster_size
        }
    }
}

/// One data stream within a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRef {
    pub path: PathBuf,
    /// Alternate stream name on multi-stream filesystems, `None` for the
    /// unnamed (default) stream.
    pub stream: Option<String>,
}

impl StreamRef {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            stream: None,
        }
    }

    pub fn stream(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            stream: Some(name.into()),
        }
    }

    /// The path used to open this stream. Alternate streams use the
    /// `path:stream` addressing of hosts that support them.
    pub fn effective_path(&self) -> PathBuf {
        match &self.stream {
            None => self.path.clone(),
            Some(name) => {
                let mut s = self.path.as_os_str().to_os_string();
                s.push(":");
                s.push(name);
                PathBuf::from(s)
            }
        }
    }

    pub fn parent(&self) -> Option<&Path> {
        self.path.parent()
    }
}
