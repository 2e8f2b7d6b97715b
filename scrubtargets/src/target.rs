// SPDX-License-Identifier: MIT

//! The erasure-target contract.

use std::path::Path;
use std::sync::Arc;

use scrubcore::{EntropySource, ErasureMethod, MethodRegistry, TargetKindId};
use scrubfs::DriverRegistry;

use crate::binding::{MethodBinding, MethodSelection};
use crate::error::TargetError;

/// Progress listener for a target execution. Hooks default to no-ops; they are
/// invoked in-line on the job's thread and must not block unboundedly.
pub trait ProgressSink {
    /// A path is being scanned during a search phase.
    fn searching(&mut self, _path: &Path) {}
    /// An object is being erased: `(index, estimated_total, path)`.
    fn erasing(&mut self, _index: usize, _total: usize, _path: &Path) {}
    /// Table/structure entries processed: `(done, estimated_total)`.
    fn entries(&mut self, _done: usize, _total: usize) {}
    /// Overwrite-pass progress: `(bytes_written, total)`.
    fn pass(&mut self, _written: u64, _total: u64) {}
}

/// Discards all progress.
pub struct NullProgress;

impl ProgressSink for NullProgress {}

/// Everything an execution needs from the host, passed explicitly so the
/// layer stays testable without a live host.
pub struct ErasureContext<'a> {
    pub methods: &'a MethodRegistry,
    pub drivers: &'a DriverRegistry,
    pub entropy: &'a mut dyn EntropySource,
    pub progress: &'a mut dyn ProgressSink,
}

impl<'a> ErasureContext<'a> {
    pub fn new(
        methods: &'a MethodRegistry,
        drivers: &'a DriverRegistry,
        entropy: &'a mut dyn EntropySource,
        progress: &'a mut dyn ProgressSink,
    ) -> Self {
        Self {
            methods,
            drivers,
            entropy,
            progress,
        }
    }
}

/// A named, identified erasure job bound to exactly one erasure method.
pub trait ErasureTarget {
    /// Stable identifier of this target *kind*, not of the instance.
    fn kind_id(&self) -> TargetKindId;

    /// Human-readable description of what will be erased.
    fn name(&self) -> String;

    /// Whether this target kind accepts the method's capabilities.
    fn supports_method(&self, method: &dyn ErasureMethod) -> bool;

    fn binding(&self) -> &MethodBinding;

    fn binding_mut(&mut self) -> &mut MethodBinding;

    /// The currently bound method, possibly still the default sentinel.
    fn method(&self) -> &MethodSelection {
        self.binding().selection()
    }

    /// Binds a concrete method, rejecting unsupported ones with an
    /// invalid-argument failure and leaving the binding unchanged.
    fn set_method(&mut self, method: Arc<dyn ErasureMethod>) -> Result<(), TargetError> {
        if !self.supports_method(method.as_ref()) {
            return Err(TargetError::UnsupportedMethod {
                target: self.name(),
                method: method.name().to_string(),
            });
        }
        self.binding_mut().set(method);
        Ok(())
    }

    /// Resolves the bound method against the host registry; never the
    /// sentinel.
    fn effective_method(
        &self,
        registry: &MethodRegistry,
    ) -> Result<Arc<dyn ErasureMethod>, TargetError> {
        self.binding().effective(registry)
    }

    /// Performs the erasure job end-to-end.
    fn execute(&self, ctx: &mut ErasureContext<'_>) -> Result<(), TargetError>;
}
