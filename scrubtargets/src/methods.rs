// SPDX-License-Identifier: MIT

//! Built-in erasure methods.
//!
//! Two minimal single-pass methods so a host works out of the box; multi-pass
//! standards plug in through the same [`ErasureMethod`] contract.

use std::sync::Arc;

use scrubcore::{
    EntropySource, ErasureMethod, ErasureSink, MethodCaps, MethodId, MethodRegistry,
    MethodResult, PassProgressFn,
};

pub const SINGLE_PASS_RANDOM_ID: MethodId =
    MethodId::from_u128(0x51a9_0cf6_2be4_47d3_b6a7_9e15_c038_d24f);

pub const SINGLE_PASS_ZERO_ID: MethodId =
    MethodId::from_u128(0x0b3e_77d2_5a81_4c96_8fd0_1264_a5c9_e380);

const PASS_BLOCK: usize = 64 * 1024;

fn run_pass(
    sink: &mut dyn ErasureSink,
    total: u64,
    mut fill: impl FnMut(&mut [u8]),
    progress: PassProgressFn<'_>,
) -> MethodResult {
    let mut block = vec![0u8; PASS_BLOCK];
    let mut left = total;
    while left > 0 {
        let n = left.min(PASS_BLOCK as u64) as usize;
        fill(&mut block[..n]);
        std::io::Write::write_all(sink, &block[..n])?;
        left -= n as u64;
        progress(total - left, total);
    }
    std::io::Write::flush(sink)?;
    Ok(())
}

/// One pass of bytes drawn from the job's entropy source.
pub struct SinglePassRandom;

impl ErasureMethod for SinglePassRandom {
    fn id(&self) -> MethodId {
        SINGLE_PASS_RANDOM_ID
    }

    fn name(&self) -> &str {
        "Single pass (random)"
    }

    fn caps(&self) -> MethodCaps {
        MethodCaps::RANDOM_ACCESS | MethodCaps::UNUSED_SPACE
    }

    fn erase(
        &self,
        sink: &mut dyn ErasureSink,
        total: u64,
        entropy: &mut dyn EntropySource,
        progress: PassProgressFn<'_>,
    ) -> MethodResult {
        run_pass(sink, total, |block| entropy.fill_bytes(block), progress)
    }
}

/// One pass of zeros.
pub struct SinglePassZero;

impl ErasureMethod for SinglePassZero {
    fn id(&self) -> MethodId {
        SINGLE_PASS_ZERO_ID
    }

    fn name(&self) -> &str {
        "Single pass (zeros)"
    }

    fn caps(&self) -> MethodCaps {
        MethodCaps::RANDOM_ACCESS | MethodCaps::UNUSED_SPACE
    }

    fn erase(
        &self,
        sink: &mut dyn ErasureSink,
        total: u64,
        _entropy: &mut dyn EntropySource,
        progress: PassProgressFn<'_>,
    ) -> MethodResult {
        run_pass(sink, total, |block| block.fill(0), progress)
    }
}

/// Registry preloaded with the built-ins; the random pass is the default.
pub fn builtin_registry() -> MethodRegistry {
    let mut registry = MethodRegistry::new();
    registry.register(Arc::new(SinglePassRandom));
    registry.register(Arc::new(SinglePassZero));
    // both just registered, cannot fail
    let _ = registry.set_default(SINGLE_PASS_RANDOM_ID);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrubcore::XorShift64;
    use std::io::Cursor;

    #[test]
    fn test_zero_pass_writes_exact_length() {
        let mut sink = Cursor::new(vec![0xFFu8; 100]);
        let mut rng = XorShift64::new(1);
        let mut last = (0u64, 0u64);

        SinglePassZero
            .erase(&mut sink, 100, &mut rng, &mut |w, t| last = (w, t))
            .unwrap();

        assert_eq!(last, (100, 100));
        assert!(sink.get_ref().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_random_pass_overwrites_with_entropy() {
        let mut sink = Cursor::new(vec![0u8; 4096]);
        let mut rng = XorShift64::new(42);

        SinglePassRandom
            .erase(&mut sink, 4096, &mut rng, &mut |_, _| {})
            .unwrap();

        assert!(sink.get_ref().iter().any(|&b| b != 0));
    }

    #[test]
    fn test_builtin_registry_default_is_random_pass() {
        let registry = builtin_registry();
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.default_method().unwrap().id(),
            SINGLE_PASS_RANDOM_ID
        );
    }
}
