// SPDX-License-Identifier: MIT

//! Driver registry.
//!
//! Process-wide driver instances are registered once by the host and looked up
//! per volume. First registered supporter of a kind wins, so specific drivers
//! go in before the generic fallback.

use std::sync::Arc;

use scrubcore::DriverId;

use crate::core::eraser::FsEraser;
use crate::core::error::{FsEraseError, FsEraseResult};
use crate::core::std_eraser::StdEraser;
use crate::core::volume::VolumeInfo;
use crate::fs::ext4::Ext4Eraser;
use crate::fs::fat32::Fat32Eraser;

#[derive(Default)]
pub struct DriverRegistry {
    drivers: Vec<Arc<dyn FsEraser>>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in drivers: FAT32, ext4, generic fallback.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(Fat32Eraser::new()));
        registry.register(Arc::new(Ext4Eraser::new()));
        registry.register(Arc::new(StdEraser::new()));
        registry
    }

    pub fn register(&mut self, driver: Arc<dyn FsEraser>) {
        log::debug!("registering filesystem driver {} ({})", driver.name(), driver.id());
        self.drivers.push(driver);
    }

    pub fn get(&self, id: DriverId) -> Option<Arc<dyn FsEraser>> {
        self.drivers.iter().find(|d| d.id() == id).cloned()
    }

    /// Selects the driver serving the volume's filesystem kind.
    pub fn for_volume(&self, volume: &VolumeInfo) -> FsEraseResult<Arc<dyn FsEraser>> {
        self.drivers
            .iter()
            .find(|d| d.supports(volume.kind))
            .cloned()
            .ok_or(FsEraseError::NoDriver(volume.kind))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn FsEraser>> {
        self.drivers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::std_eraser::STD_ERASER_ID;
    use crate::core::volume::FsKind;
    use crate::fs::ext4::EXT4_ERASER_ID;
    use crate::fs::fat32::FAT32_ERASER_ID;

    #[test]
    fn test_specific_drivers_win_their_kind() {
        let registry = DriverRegistry::with_builtins();

        let fat = VolumeInfo::new("/mnt/usb", FsKind::Fat32, 4096);
        assert_eq!(registry.for_volume(&fat).unwrap().id(), FAT32_ERASER_ID);

        let ext = VolumeInfo::new("/", FsKind::Ext4, 4096);
        assert_eq!(registry.for_volume(&ext).unwrap().id(), EXT4_ERASER_ID);

        let other = VolumeInfo::new("/mnt/net", FsKind::Other, 4096);
        assert_eq!(registry.for_volume(&other).unwrap().id(), STD_ERASER_ID);
    }

    #[test]
    fn test_lookup_by_id() {
        let registry = DriverRegistry::with_builtins();
        assert!(registry.get(FAT32_ERASER_ID).is_some());
        assert!(registry.get(DriverId::from_u128(0xBAD)).is_none());
    }

    #[test]
    fn test_empty_registry_has_no_driver() {
        let registry = DriverRegistry::new();
        let vol = VolumeInfo::new("/", FsKind::Ext4, 4096);
        assert!(matches!(
            registry.for_volume(&vol),
            Err(FsEraseError::NoDriver(FsKind::Ext4))
        ));
    }
}
