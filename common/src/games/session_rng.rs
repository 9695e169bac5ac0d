use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

/// Seedable random source handed to whoever needs randomness, so games can be
/// replayed deterministically from a seed.
pub struct SessionRng {
    rng: StdRng,
    seed: u64,
}

impl SessionRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn from_random() -> Self {
        let seed: u64 = rand::rng().random();
        Self::new(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SessionRng::new(7);
        let mut b = SessionRng::new(7);
        let items = [1, 2, 3, 4, 5, 6, 7, 8, 9];

        for _ in 0..20 {
            assert_eq!(a.choose(&items), b.choose(&items));
        }
        assert_eq!(a.seed(), 7);
    }

    #[test]
    fn test_choose_empty_slice() {
        let mut rng = SessionRng::new(1);
        let items: [u8; 0] = [];
        assert_eq!(rng.choose(&items), None);
    }
}
