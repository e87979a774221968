//! RNG module - seeded randomness for spawns and level layout
//!
//! A small LCG keeps every game reproducible from its seed: the same seed,
//! level and move sequence always yield the same spawns.

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Uniform value in `[0, bound)`.
    ///
    /// Uses the high bits (multiply-shift) since the low bits of an LCG cycle
    /// with short periods.
    pub fn next_below(&mut self, bound: u32) -> u32 {
        assert!(bound > 0, "next_below called with an empty range");
        ((self.next_u32() as u64 * bound as u64) >> 32) as u32
    }

    /// Pick one element uniformly, `None` for an empty slice
    pub fn pick<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.next_below(items.len() as u32) as usize;
        Some(items[idx])
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_below((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Current generator state (feeding it back into `new` resumes the sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_zero_seed_is_not_degenerate() {
        let mut rng = SimpleRng::new(0);
        assert_ne!(rng.next_u32(), rng.next_u32());
    }

    #[test]
    fn test_next_below_stays_in_range() {
        let mut rng = SimpleRng::new(99);
        let mut seen = [false; 5];
        for _ in 0..500 {
            let v = rng.next_below(5) as usize;
            assert!(v < 5);
            seen[v] = true;
        }
        assert!(seen.iter().all(|&s| s), "every bucket should be hit: {:?}", seen);
    }

    #[test]
    #[should_panic(expected = "empty range")]
    fn test_next_below_zero_panics() {
        SimpleRng::new(1).next_below(0);
    }

    #[test]
    fn test_pick_empty_is_none() {
        let mut rng = SimpleRng::new(3);
        let empty: [u8; 0] = [];
        assert_eq!(rng.pick(&empty), None);
        assert_eq!(rng.pick(&[42u8]), Some(42));
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = SimpleRng::new(7);
        let mut items = [0, 1, 2, 3, 4, 5, 6, 7];
        rng.shuffle(&mut items);
        let mut sorted = items;
        sorted.sort();
        assert_eq!(sorted, [0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_state_resumes_sequence() {
        let mut rng = SimpleRng::new(11);
        rng.next_u32();
        let mut resumed = SimpleRng::new(rng.state());
        assert_eq!(rng.next_u32(), resumed.next_u32());
    }
}
