//! Tiny pseudo-random source for cosmetic jitter (not crypto secure).

#[derive(Clone, Debug)]
pub struct FxRng {
    state: u64,
}

impl FxRng {
    pub fn seeded(seed: u64) -> Self {
        // Zero is a fixed point of the xorshift step.
        Self { state: seed.max(1) }
    }

    /// Seed from the host: crypto source with the `rng` feature, clock otherwise.
    pub fn from_host() -> Self {
        #[cfg(feature = "rng")]
        {
            let mut buf = [0u8; 8];
            if getrandom::getrandom(&mut buf).is_ok() {
                return Self::seeded(u64::from_le_bytes(buf));
            }
        }
        let now = crate::performance_now();
        Self::seeded((now * 1_000.0) as u64 ^ 0x9E37_79B9_7F4A_7C15)
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        min + self.unit() * (max - min)
    }

    pub fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        (self.next_u64() % len as u64) as usize
    }

    pub fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_stays_in_half_open_range() {
        let mut rng = FxRng::seeded(42);
        for _ in 0..10_000 {
            let v = rng.unit();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn index_handles_empty_and_bounds() {
        let mut rng = FxRng::seeded(7);
        assert_eq!(rng.index(0), 0);
        for _ in 0..1_000 {
            assert!(rng.index(5) < 5);
        }
    }

    #[test]
    fn zero_seed_still_advances() {
        let mut rng = FxRng::seeded(0);
        assert_ne!(rng.next_u64(), 0);
    }
}
