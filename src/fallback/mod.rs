//! Terminal fallback for failed live fetches.
//!
//! # Responsibilities
//! - Pick a curated item for a category when the live path is unavailable
//! - Prefer items not sent before
//! - Never fail
//!
//! # Design Decisions
//! - Item choice is random (seedable for tests); commentary is deterministic
//! - Any internal failure degrades to the first curated item

pub mod catalog;

use std::sync::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::observability::metrics;
use crate::recommendation::{Category, FallbackReason, Recommendation, RunContext, Source};

pub struct FallbackProvider {
    rng: Mutex<StdRng>,
}

impl Default for FallbackProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackProvider {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic item selection, for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// A uniformly chosen curated recommendation for `category`.
    pub fn get_fallback(&self, category: Category, ctx: &RunContext, reason: FallbackReason) -> Recommendation {
        let candidates: Vec<usize> = (0..catalog::len(category)).collect();
        let index = self.choose(&candidates);
        self.build(category, index, ctx, reason)
    }

    /// Like `get_fallback`, but skips items for which `already_sent` returns true.
    ///
    /// When every item was sent before, picks from the whole set.
    pub fn pick_avoiding<F>(
        &self,
        category: Category,
        ctx: &RunContext,
        reason: FallbackReason,
        already_sent: F,
    ) -> Recommendation
    where
        F: Fn(&str) -> bool,
    {
        let all: Vec<usize> = (0..catalog::len(category)).collect();
        let fresh: Vec<usize> = all
            .iter()
            .copied()
            .filter(|&i| !already_sent(catalog::name(category, i)))
            .collect();

        let index = if fresh.is_empty() {
            tracing::info!(category = %category, "Every backup item was sent before, repeating one");
            self.choose(&all)
        } else {
            self.choose(&fresh)
        };
        self.build(category, index, ctx, reason)
    }

    fn choose(&self, candidates: &[usize]) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
        candidates.choose(&mut *rng).copied().unwrap_or(0)
    }

    fn build(&self, category: Category, index: usize, ctx: &RunContext, reason: FallbackReason) -> Recommendation {
        let name = catalog::name(category, index);
        tracing::warn!(
            category = %category,
            reason = reason.as_str(),
            item = name,
            "Using fallback recommendation"
        );
        metrics::record_fallback(category, reason);

        Recommendation {
            category,
            name: name.to_string(),
            text: catalog::render(category, index, ctx),
            source: Source::Fallback { reason },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendation::{Season, TimeOfDay};

    fn ctx() -> RunContext {
        RunContext::new(Season::Spring, TimeOfDay::Evening)
    }

    #[test]
    fn test_fallback_is_category_correct() {
        let provider = FallbackProvider::with_seed(7);
        for category in Category::ALL {
            let rec = provider.get_fallback(category, &ctx(), FallbackReason::CircuitOpen);
            assert_eq!(rec.category, category);
            assert!(!rec.text.is_empty());
            assert!(rec.text.contains(&rec.name));
            assert_eq!(rec.source, Source::Fallback { reason: FallbackReason::CircuitOpen });
        }
    }

    #[test]
    fn test_seeded_selection_is_reproducible() {
        let a = FallbackProvider::with_seed(42);
        let b = FallbackProvider::with_seed(42);
        for _ in 0..10 {
            assert_eq!(
                a.get_fallback(Category::Movie, &ctx(), FallbackReason::RetryExhausted).name,
                b.get_fallback(Category::Movie, &ctx(), FallbackReason::RetryExhausted).name
            );
        }
    }

    #[test]
    fn test_pick_avoiding_skips_sent_items() {
        let provider = FallbackProvider::with_seed(1);
        for _ in 0..20 {
            let rec = provider.pick_avoiding(Category::Restaurant, &ctx(), FallbackReason::Fatal, |name| {
                name != "Chef" && name != "Hominy Grill"
            });
            assert_eq!(rec.name, "Hominy Grill");
        }
    }

    #[test]
    fn test_pick_avoiding_repeats_when_everything_was_sent() {
        let provider = FallbackProvider::with_seed(3);
        let rec = provider.pick_avoiding(Category::PointOfInterest, &ctx(), FallbackReason::Duplicate, |_| true);
        assert!((0..catalog::len(Category::PointOfInterest))
            .any(|i| catalog::name(Category::PointOfInterest, i) == rec.name));
    }
}
