//! Seedable xorshift64 generator for scramble glyphs and rain.
//! Visual noise only; nothing here needs cryptographic quality.

#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng {
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

    /// Random integer in [0, upper_bound). Returns 0 for an empty range.
    pub fn next_int(&mut self, upper_bound: u32) -> u32 {
        if upper_bound == 0 {
            return 0;
        }
        (self.next_u64() % u64::from(upper_bound)) as u32
    }

    /// Random float in [0, 1).
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Uniform pick from a slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = (self.next_u64() % items.len() as u64) as usize;
        items.get(index)
    }

    /// Derive an independent generator, e.g. one per mounted phase.
    pub fn fork(&mut self) -> Rng {
        Rng::new(self.next_u64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_seed() {
        let mut a = Rng::new(42);
        let mut b = Rng::new(42);
        for _ in 0..10 {
            assert_eq!(a.next_int(1000), b.next_int(1000));
        }
    }

    #[test]
    fn zero_seed_and_empty_ranges_are_safe() {
        let mut rng = Rng::new(0);
        assert_eq!(rng.next_int(0), 0);
        assert!(rng.pick::<char>(&[]).is_none());
    }

    #[test]
    fn floats_stay_in_unit_range() {
        let mut rng = Rng::new(7);
        for _ in 0..1000 {
            let f = rng.next_f32();
            assert!((0.0..1.0).contains(&f), "got {f}");
        }
    }

    #[test]
    fn pick_returns_member() {
        let mut rng = Rng::new(3);
        let glyphs = ['a', 'b', 'c'];
        for _ in 0..50 {
            assert!(glyphs.contains(rng.pick(&glyphs).unwrap()));
        }
    }
}
