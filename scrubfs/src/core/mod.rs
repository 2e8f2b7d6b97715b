// SPDX-License-Identifier: MIT

// === Sub-modules ===
pub mod eraser;
pub mod error;
pub mod naming;
pub mod ops;
pub mod registry;
pub mod sampling;
pub mod std_eraser;
pub mod volume;

// === Core Traits ===
pub mod traits {
    pub use super::eraser::{
        EntriesProgress, EraseProgress, FsEraser, SearchProgress, FILE_NAME_ERASE_PASSES,
        FILE_NAME_ERASE_TRIES,
    };
}

// === Error types ===
pub use error::*;

// === Standard driver ===
pub use std_eraser::StdEraser;
