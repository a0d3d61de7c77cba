/// Deterministic PRNG with 256-bit state, suitable for replays.
///
/// This is `xoshiro256**` seeded via SplitMix64. Every piece of AI,
/// spawn-placement and team-assignment randomness routes through this type
/// so that two clients with the same seed draw identical sequences.
#[derive(Clone, Copy, Debug)]
pub struct PseudoRandom {
    state: [u64; 4],
}

impl PseudoRandom {
    pub fn seed_from_u64(seed: u64) -> Self {
        let mut sm = SplitMix64 { state: seed };
        Self {
            state: [sm.next(), sm.next(), sm.next(), sm.next()],
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        // xoshiro256**
        let result = self.state[1].wrapping_mul(5).rotate_left(7).wrapping_mul(9);

        let t = self.state[1] << 17;

        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];

        self.state[2] ^= t;

        self.state[3] = self.state[3].rotate_left(45);

        result
    }

    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Random f64 in [0.0, 1.0). Uses the top 53 bits for the mantissa.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Random integer in the half-open range [min, max).
    ///
    /// Rejection-sampled so every value is equally likely.
    pub fn next_int(&mut self, min: i64, max: i64) -> i64 {
        assert!(min < max, "empty range");
        let span = (max - min) as u64;
        let threshold = u64::MAX - (u64::MAX % span);
        loop {
            let x = self.next_u64();
            if x < threshold {
                return min + (x % span) as i64;
            }
        }
    }

    /// True with probability 1-in-`odds`.
    pub fn chance(&mut self, odds: u32) -> bool {
        assert!(odds > 0, "odds must be positive");
        self.next_int(0, i64::from(odds)) == 0
    }

    /// Pick a uniformly random element of a non-empty slice.
    pub fn rand_element<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        assert!(!items.is_empty(), "rand_element on empty slice");
        &items[self.next_int(0, items.len() as i64) as usize]
    }

    /// Fisher-Yates shuffle in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_int(0, (i + 1) as i64) as usize;
            items.swap(i, j);
        }
    }

    /// Mint a non-zero 32-bit id for AI players.
    pub fn next_id(&mut self) -> u32 {
        loop {
            let id = self.next_u32();
            if id != 0 {
                return id;
            }
        }
    }
}

struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn next(&mut self) -> u64 {
        let mut z = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        self.state = z;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = PseudoRandom::seed_from_u64(42);
        let mut b = PseudoRandom::seed_from_u64(42);
        for _ in 0..1000 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = PseudoRandom::seed_from_u64(1);
        let mut b = PseudoRandom::seed_from_u64(2);
        let same = (0..100).filter(|_| a.next_u64() == b.next_u64()).count();
        assert_eq!(same, 0);
    }

    #[test]
    fn next_int_stays_in_range() {
        let mut rng = PseudoRandom::seed_from_u64(7);
        for _ in 0..10_000 {
            let v = rng.next_int(5, 15);
            assert!((5..15).contains(&v));
        }
    }

    #[test]
    fn next_f64_stays_in_unit_interval() {
        let mut rng = PseudoRandom::seed_from_u64(9);
        for _ in 0..10_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn chance_one_is_certain() {
        let mut rng = PseudoRandom::seed_from_u64(3);
        for _ in 0..100 {
            assert!(rng.chance(1));
        }
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = PseudoRandom::seed_from_u64(11);
        let mut items: Vec<u32> = (0..50).collect();
        rng.shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn shuffle_is_deterministic() {
        let mut a = PseudoRandom::seed_from_u64(13);
        let mut b = PseudoRandom::seed_from_u64(13);
        let mut xs: Vec<u32> = (0..20).collect();
        let mut ys: Vec<u32> = (0..20).collect();
        a.shuffle(&mut xs);
        b.shuffle(&mut ys);
        assert_eq!(xs, ys);
    }
}
