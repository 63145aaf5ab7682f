//! Randomness helpers with auditable draw counts.
//!
//! Reproducing the original Proximity Forest random-draw sequence requires
//! knowing exactly how many draws each operation consumes. Every draw in
//! this crate goes through one of these helpers, each with a fixed draw
//! count stated in its contract.

use rand::Rng;

/// Draw a uniform index in `[0, bound)`. Always consumes exactly one draw,
/// including for `bound == 1`.
///
/// # Panics
///
/// Panics if `bound` is zero.
pub fn uniform_index<R: Rng + ?Sized>(rng: &mut R, bound: usize) -> usize {
    assert!(bound > 0, "uniform_index requires a non-zero bound");
    rng.gen_range(0..bound)
}

/// Choose one element uniformly at random.
///
/// Consumes exactly one draw when `items.len() > 1` and none otherwise —
/// matching the list-choice helper whose draw sequence this crate
/// reproduces. Call sites that need a draw even for singletons issue it
/// explicitly via [`burn_draw`].
pub fn choose<'a, R: Rng + ?Sized, T>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    match items.len() {
        0 => None,
        1 => Some(&items[0]),
        n => Some(&items[uniform_index(rng, n)]),
    }
}

/// Consume one uniform draw in `[0, bound)` and discard the result.
///
/// A deliberate no-op: the original Proximity Forest draws at certain sites
/// even when the result cannot affect the outcome, and subsequent draws only
/// line up if those draws still happen.
pub fn burn_draw<R: Rng + ?Sized>(rng: &mut R, bound: usize) {
    let _ = uniform_index(rng, bound);
}

#[cfg(test)]
mod tests {
    use rand::RngCore;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn uniform_index_within_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for bound in 1..20 {
            for _ in 0..50 {
                assert!(uniform_index(&mut rng, bound) < bound);
            }
        }
    }

    #[test]
    fn choose_empty_is_none() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let items: [u8; 0] = [];
        assert!(choose(&mut rng, &items).is_none());
    }

    #[test]
    fn choose_singleton_consumes_no_draw() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut untouched = rng.clone();
        assert_eq!(choose(&mut rng, &[5]), Some(&5));
        // the rng state is unchanged: next outputs agree
        assert_eq!(rng.next_u64(), untouched.next_u64());
    }

    #[test]
    fn choose_multi_consumes_one_draw() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut scripted = rng.clone();
        let picked = *choose(&mut rng, &[10, 20, 30]).unwrap();
        let expected = [10, 20, 30][uniform_index(&mut scripted, 3)];
        assert_eq!(picked, expected);
        assert_eq!(rng.next_u64(), scripted.next_u64());
    }

    #[test]
    fn burn_draw_advances_state() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut scripted = rng.clone();
        burn_draw(&mut rng, 1);
        let _ = uniform_index(&mut scripted, 1);
        assert_eq!(rng.next_u64(), scripted.next_u64());
    }
}
