use std::hash::{Hash, Hasher};

use rand::prelude::*;
use rand_xorshift::XorShiftRng;

/// Construct a throwaway random number generator seeded by a noise value.
///
/// Good for short-term use in immutable contexts given a varying source of
/// noise like map position coordinates, or for turning a user-provided seed
/// string into a numeric seed.
pub fn srng(seed: &(impl Hash + ?Sized)) -> XorShiftRng {
    let mut h = crate::FastHasher::default();
    seed.hash(&mut h);
    XorShiftRng::seed_from_u64(h.finish())
}

pub trait RngExt {
    /// Return true with probability `p`.
    ///
    /// Out of range probabilities are clamped instead of panicking like
    /// `gen_bool` does.
    fn chance(&mut self, p: f32) -> bool;
}

impl<T: Rng + ?Sized> RngExt for T {
    fn chance(&mut self, p: f32) -> bool {
        if !(p > 0.0) {
            return false;
        }
        if p >= 1.0 {
            return true;
        }
        self.gen::<f32>() < p
    }
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::*;

    #[test]
    fn stable_seeds() {
        assert_eq!(
            srng("seed").gen_range(0..1000),
            srng("seed").gen_range(0..1000)
        );
        assert_ne!(srng("seed").next_u64(), srng("other seed").next_u64());
    }

    #[test]
    fn degenerate_odds() {
        let mut rng = srng(&1);
        assert!(!rng.chance(0.0));
        assert!(!rng.chance(f32::NAN));
        assert!(rng.chance(1.0));
    }

    #[quickcheck]
    fn clamped_chance(seed: u64, p: f32) -> bool {
        let mut rng = XorShiftRng::seed_from_u64(seed);
        let hit = rng.chance(p);
        if p >= 1.0 {
            hit
        } else if !(p > 0.0) {
            !hit
        } else {
            true
        }
    }
}
