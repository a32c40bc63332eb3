// Ranking engine: ordering and selection policies for offers and smartphones.

pub mod offers;
pub mod smartphones;

pub use offers::{RankingPolicy, rank_offers, select_offer};
pub use smartphones::{select_smartphone, smartphone_pool};

use rand::Rng;
use rand::seq::IndexedRandom;

/// Uniform pick from a policy-chosen pool. The randomness source is supplied
/// by the caller so tests can seed it.
pub fn pick_uniform<'a, T, R: Rng + ?Sized>(pool: &'a [T], rng: &mut R) -> Option<&'a T> {
    pool.choose(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn pick_uniform_handles_empty_and_single() {
        let mut rng = StdRng::seed_from_u64(7);
        let empty: [u8; 0] = [];
        assert_eq!(pick_uniform(&empty, &mut rng), None);
        assert_eq!(pick_uniform(&[42], &mut rng), Some(&42));
    }

    #[test]
    fn pick_uniform_reaches_every_member() {
        let mut rng = StdRng::seed_from_u64(11);
        let pool: [usize; 3] = [1, 2, 3];
        let mut seen = [false; 3];
        for _ in 0..200 {
            let v = pick_uniform(&pool, &mut rng).unwrap();
            seen[v - 1] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
