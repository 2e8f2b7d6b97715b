// SPDX-License-Identifier: MIT

//! Stable 128-bit identifiers.
//!
//! Methods, filesystem drivers and target kinds are registrable components:
//! each carries an identifier that is unique per *kind*, not per instance, and
//! survives persistence round-trips.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// The reserved all-zero identifier.
            pub const NIL: Self = Self(Uuid::nil());

            pub const fn from_u128(v: u128) -> Self {
                Self(Uuid::from_u128(v))
            }

            pub fn new_random() -> Self {
                Self(Uuid::new_v4())
            }

            pub const fn is_nil(&self) -> bool {
                self.0.is_nil()
            }

            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<Uuid> for $name {
            fn from(v: Uuid) -> Self {
                Self(v)
            }
        }
    };
}

define_id! {
    /// Identifies an erasure method. `MethodId::NIL` is the persisted
    /// representation of "use the host default".
    MethodId
}

define_id! {
    /// Identifies a filesystem driver.
    DriverId
}

define_id! {
    /// Identifies an erasure-target kind (file, folder, unused space...).
    TargetKindId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nil_roundtrip() {
        assert!(MethodId::NIL.is_nil());
        assert!(!MethodId::from_u128(1).is_nil());
        assert_eq!(MethodId::from_u128(42), MethodId::from_u128(42));
    }

    #[test]
    fn test_random_ids_differ() {
        assert_ne!(DriverId::new_random(), DriverId::new_random());
    }

    #[test]
    fn test_display_is_uuid_form() {
        let id = TargetKindId::from_u128(0xDEAD_BEEF);
        assert_eq!(id.to_string(), id.as_uuid().to_string());
    }
}
