// SPDX-License-Identifier: MIT

use thiserror::Error;

use scrubcore::MethodId;
use scrubfs::FsEraseError;

#[derive(Debug, Error)]
pub enum TargetError {
    /// Invalid-argument condition: the assignment is rejected and the
    /// previously bound method stays in place.
    #[error("the selected erasure method {method} is not supported for the erasure target {target}")]
    UnsupportedMethod { target: String, method: String },

    /// Invalid-operation condition: a host is misconfigured if the default
    /// sentinel cannot resolve to a concrete method.
    #[error("the effective method of an erasure target cannot be the default sentinel")]
    NoDefaultMethod,

    /// A persisted method identifier no longer resolves.
    #[error("no erasure method registered under {0}")]
    UnknownMethod(MethodId),

    #[error(transparent)]
    Fs(#[from] FsEraseError),
}
