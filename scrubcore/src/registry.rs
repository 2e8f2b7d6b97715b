// SPDX-License-Identifier: MIT

//! Method registry.
//!
//! The host's view of the registered erasure methods plus the distinguished
//! default. There is deliberately no process-wide instance: the registry is
//! passed explicitly into every operation that resolves methods, which keeps
//! the layer testable without a live host.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::RegistryError;
use crate::id::MethodId;
use crate::method::ErasureMethod;

#[derive(Default)]
pub struct MethodRegistry {
    methods: BTreeMap<MethodId, Arc<dyn ErasureMethod>>,
    default: Option<MethodId>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a method, replacing any previous entry with the same id.
    pub fn register(&mut self, method: Arc<dyn ErasureMethod>) {
        log::debug!("registering erasure method {} ({})", method.name(), method.id());
        self.methods.insert(method.id(), method);
    }

    pub fn get(&self, id: MethodId) -> Option<Arc<dyn ErasureMethod>> {
        self.methods.get(&id).cloned()
    }

    /// Looks up a method, failing on unknown identifiers.
    pub fn resolve(&self, id: MethodId) -> Result<Arc<dyn ErasureMethod>, RegistryError> {
        self.get(id).ok_or(RegistryError::UnknownMethod(id))
    }

    /// Marks a registered method as the host default.
    pub fn set_default(&mut self, id: MethodId) -> Result<(), RegistryError> {
        if !self.methods.contains_key(&id) {
            return Err(RegistryError::UnknownMethod(id));
        }
        self.default = Some(id);
        Ok(())
    }

    /// Resolves the current default method to a concrete value.
    pub fn default_method(&self) -> Result<Arc<dyn ErasureMethod>, RegistryError> {
        let id = self.default.ok_or(RegistryError::NoDefault)?;
        self.resolve(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn ErasureMethod>> {
        self.methods.values()
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::EntropySource;
    use crate::error::MethodResult;
    use crate::method::{ErasureSink, MethodCaps, PassProgressFn};

    struct NullMethod(MethodId);

    impl ErasureMethod for NullMethod {
        fn id(&self) -> MethodId {
            self.0
        }
        fn name(&self) -> &str {
            "null"
        }
        fn caps(&self) -> MethodCaps {
            MethodCaps::RANDOM_ACCESS
        }
        fn erase(
            &self,
            _sink: &mut dyn ErasureSink,
            _total: u64,
            _entropy: &mut dyn EntropySource,
            _progress: PassProgressFn<'_>,
        ) -> MethodResult {
            Ok(())
        }
    }

    #[test]
    fn test_register_and_resolve() {
        let id = MethodId::from_u128(1);
        let mut reg = MethodRegistry::new();
        reg.register(Arc::new(NullMethod(id)));
        assert_eq!(reg.resolve(id).unwrap().id(), id);
        assert!(matches!(
            reg.resolve(MethodId::from_u128(2)),
            Err(RegistryError::UnknownMethod(_))
        ));
    }

    #[test]
    fn test_default_requires_registration() {
        let id = MethodId::from_u128(1);
        let mut reg = MethodRegistry::new();
        assert!(matches!(reg.default_method(), Err(RegistryError::NoDefault)));
        assert!(reg.set_default(id).is_err());

        reg.register(Arc::new(NullMethod(id)));
        reg.set_default(id).unwrap();
        assert_eq!(reg.default_method().unwrap().id(), id);
    }
}
