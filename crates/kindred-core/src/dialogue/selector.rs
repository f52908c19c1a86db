//! Template selection strategies.
//!
//! Production picks uniformly at random; tests pin the choice with a seed or
//! an explicit index.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Chooses one template out of a non-empty candidate set.
pub trait TemplateSelector: Send {
    /// Returns an index in `0..candidates`. `candidates` is never zero.
    fn select(&mut self, candidates: usize) -> usize;
}

/// Uniform choice from the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSelector;

impl TemplateSelector for RandomSelector {
    fn select(&mut self, candidates: usize) -> usize {
        rand::thread_rng().gen_range(0..candidates)
    }
}

/// Uniform choice from a seeded RNG; the same seed yields the same sequence.
#[derive(Debug, Clone)]
pub struct SeededSelector {
    rng: StdRng,
}

impl SeededSelector {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl TemplateSelector for SeededSelector {
    fn select(&mut self, candidates: usize) -> usize {
        self.rng.gen_range(0..candidates)
    }
}

/// Always picks the same index, wrapped into range.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedSelector(pub usize);

impl TemplateSelector for FixedSelector {
    fn select(&mut self, candidates: usize) -> usize {
        self.0 % candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_selector_wraps() {
        let mut selector = FixedSelector(5);
        assert_eq!(selector.select(3), 2);
        assert_eq!(selector.select(10), 5);
    }

    #[test]
    fn test_seeded_selector_is_reproducible() {
        let mut a = SeededSelector::new(11);
        let mut b = SeededSelector::new(11);
        let first: Vec<usize> = (0..20).map(|_| a.select(7)).collect();
        let second: Vec<usize> = (0..20).map(|_| b.select(7)).collect();
        assert_eq!(first, second);
        assert!(first.iter().all(|i| *i < 7));
    }

    #[test]
    fn test_random_selector_in_range() {
        let mut selector = RandomSelector;
        for _ in 0..50 {
            assert!(selector.select(4) < 4);
        }
        assert_eq!(selector.select(1), 0);
    }
}
