// SPDX-License-Identifier: MIT

//! Randomness-source contract.
//!
//! The erasure layer never picks its own generator: every operation that needs
//! random bytes or a bounded random integer takes an [`EntropySource`]
//! supplied by the host. Cryptographic generators are the host's business;
//! this crate only ships two deterministic sources for tests and tooling.

/// Uniform random bytes plus bounded random integers.
pub trait EntropySource {
    /// Fills `buf` with random bytes.
    fn fill_bytes(&mut self, buf: &mut [u8]);

    /// Returns a random integer in `0..max`.
    ///
    /// `max` must be non-zero. The default implementation reduces eight random
    /// bytes modulo `max`; the residual bias is negligible for the directory
    /// and entry counts this layer draws over.
    fn next_below(&mut self, max: usize) -> usize {
        debug_assert!(max > 0);
        let mut raw = [0u8; 8];
        self.fill_bytes(&mut raw);
        (u64::from_le_bytes(raw) % max as u64) as usize
    }
}

/// Deterministic xorshift generator.
///
/// Not cryptographic. Intended for tests and reproducible tooling runs only.
#[derive(Debug, Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    pub fn new(seed: u64) -> Self {
        Self {
            // xorshift has a single absorbing state at zero
            state: if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl EntropySource for XorShift64 {
    fn fill_bytes(&mut self, buf: &mut [u8]) {
        for chunk in buf.chunks_mut(8) {
            let raw = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&raw[..chunk.len()]);
        }
    }
}

/// Replays a fixed byte script, cycling when exhausted.
///
/// Lets tests drive name generation and sampling towards exact outcomes.
/// [`EntropySource::next_below`] consumes a single script byte per draw so
/// scripts stay readable.
#[derive(Debug, Clone)]
pub struct ScriptedEntropy {
    script: Vec<u8>,
    pos: usize,
}

impl ScriptedEntropy {
    pub fn new(script: impl Into<Vec<u8>>) -> Self {
        let script = script.into();
        debug_assert!(!script.is_empty());
        Self { script, pos: 0 }
    }

    fn next_byte(&mut self) -> u8 {
        let b = self.script[self.pos % self.script.len()];
        self.pos += 1;
        b
    }
}

impl EntropySource for ScriptedEntropy {
    fn fill_bytes(&mut self, buf: &mut [u8]) {
        for b in buf.iter_mut() {
            *b = self.next_byte();
        }
    }

    fn next_below(&mut self, max: usize) -> usize {
        debug_assert!(max > 0);
        self.next_byte() as usize % max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xorshift_deterministic() {
        let mut a = XorShift64::new(7);
        let mut b = XorShift64::new(7);
        let mut buf_a = [0u8; 32];
        let mut buf_b = [0u8; 32];
        a.fill_bytes(&mut buf_a);
        b.fill_bytes(&mut buf_b);
        assert_eq!(buf_a, buf_b);
        assert_ne!(buf_a, [0u8; 32]);
    }

    #[test]
    fn test_xorshift_zero_seed_is_remapped() {
        let mut rng = XorShift64::new(0);
        let mut buf = [0u8; 16];
        rng.fill_bytes(&mut buf);
        assert_ne!(buf, [0u8; 16]);
    }

    #[test]
    fn test_next_below_stays_in_range() {
        let mut rng = XorShift64::new(99);
        for max in [1usize, 2, 3, 17, 1000] {
            for _ in 0..200 {
                assert!(rng.next_below(max) < max);
            }
        }
    }

    #[test]
    fn test_scripted_entropy_replays_and_cycles() {
        let mut rng = ScriptedEntropy::new(vec![1, 2, 3]);
        let mut buf = [0u8; 5];
        rng.fill_bytes(&mut buf);
        assert_eq!(buf, [1, 2, 3, 1, 2]);
        assert_eq!(rng.next_below(10), 3);
    }
}
