// SPDX-License-Identifier: MIT

pub mod ext4;
pub mod fat32;
