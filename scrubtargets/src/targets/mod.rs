// SPDX-License-Identifier: MIT

pub mod file;
pub mod folder;
pub mod unused;

pub use file::{FileTarget, FILE_TARGET_KIND};
pub use folder::{FolderTarget, FOLDER_TARGET_KIND};
pub use unused::{UnusedSpaceTarget, UNUSED_SPACE_TARGET_KIND};
