// SPDX-License-Identifier: MIT

//! Method selection and persistence.
//!
//! A binding is either the default sentinel, resolved lazily against the
//! host's registry, or a concrete method. The persisted form stores only the
//! method identifier; the reserved all-zero identifier means "use default".

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use scrubcore::{ErasureMethod, MethodId, MethodRegistry};

use crate::error::TargetError;

/// The bound method, possibly still the default sentinel.
#[derive(Clone, Default)]
pub enum MethodSelection {
    #[default]
    Default,
    Concrete(Arc<dyn ErasureMethod>),
}

impl fmt::Debug for MethodSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("Default"),
            Self::Concrete(m) => write!(f, "Concrete({} {})", m.name(), m.id()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MethodBinding {
    selection: MethodSelection,
}

impl MethodBinding {
    /// Fresh binding on the default sentinel.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &MethodSelection {
        &self.selection
    }

    /// Binds a concrete method. Compatibility validation is the target's job,
    /// see [`crate::target::ErasureTarget::set_method`].
    pub fn set(&mut self, method: Arc<dyn ErasureMethod>) {
        self.selection = MethodSelection::Concrete(method);
    }

    /// Resolves to a concrete method; never returns the sentinel.
    ///
    /// An unresolvable default is a host-configuration defect surfaced as
    /// [`TargetError::NoDefaultMethod`], not a state to recover from.
    pub fn effective(&self, registry: &MethodRegistry) -> Result<Arc<dyn ErasureMethod>, TargetError> {
        match &self.selection {
            MethodSelection::Concrete(method) => Ok(method.clone()),
            MethodSelection::Default => registry
                .default_method()
                .map_err(|_| TargetError::NoDefaultMethod),
        }
    }

    /// Persisted form of this binding.
    pub fn saved(&self) -> SavedBinding {
        SavedBinding {
            method: match &self.selection {
                MethodSelection::Default => MethodId::NIL,
                MethodSelection::Concrete(method) => method.id(),
            },
        }
    }

    /// Reconstructs a binding from persisted state. The all-zero identifier is
    /// the only recognized sentinel; any other identifier must resolve.
    pub fn restore(saved: &SavedBinding, registry: &MethodRegistry) -> Result<Self, TargetError> {
        if saved.method.is_nil() {
            return Ok(Self::new());
        }
        let method = registry
            .resolve(saved.method)
            .map_err(|_| TargetError::UnknownMethod(saved.method))?;
        Ok(Self {
            selection: MethodSelection::Concrete(method),
        })
    }
}

/// Minimal persisted representation of an erasure target's binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedBinding {
    pub method: MethodId,
}
