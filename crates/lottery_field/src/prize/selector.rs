//! Catalog-backed prize drawing.
use rand::Rng;
use tracing::{info, warn};

use crate::pool::WeightedPool;
use crate::prize::{Prize, PrizeCatalog};

/// Draws prizes from a [`PrizeCatalog`] using each prize's probability as its weight.
///
/// The weighted pool is built lazily on the first draw and reused afterwards; the
/// catalog is treated as immutable until [`PrizeSelector::reload`] or
/// [`PrizeSelector::invalidate`] is called.
#[derive(Debug, Clone)]
pub struct PrizeSelector {
    catalog: PrizeCatalog,
    pool: WeightedPool<Prize>,
    initialized: bool,
}

impl PrizeSelector {
    pub fn new(catalog: PrizeCatalog) -> Self {
        Self {
            catalog,
            pool: WeightedPool::new(),
            initialized: false,
        }
    }

    pub fn catalog(&self) -> &PrizeCatalog {
        &self.catalog
    }

    /// Replace the catalog; the pool is rebuilt on the next draw.
    pub fn reload(&mut self, catalog: PrizeCatalog) {
        self.catalog = catalog;
        self.invalidate();
    }

    /// Force the pool to be rebuilt from the current catalog on the next draw.
    pub fn invalidate(&mut self) {
        self.initialized = false;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Draw `count` prizes with replacement. An empty catalog yields an empty list.
    pub fn draw(&mut self, count: usize, rng: &mut dyn Rng) -> Vec<Prize> {
        if self.catalog.is_empty() {
            warn!("No prizes available in catalog.");
            return Vec::new();
        }

        self.ensure_pool();
        self.pool.select_multiple(count, rng)
    }

    pub fn draw_one(&mut self, rng: &mut dyn Rng) -> Option<Prize> {
        self.draw(1, rng).into_iter().next()
    }

    /// Total weight of the pool built from the catalog.
    pub fn total_weight(&mut self) -> f32 {
        self.ensure_pool();
        self.pool.total_weight()
    }

    fn ensure_pool(&mut self) {
        if self.initialized {
            return;
        }

        self.pool.clear();
        for prize in self.catalog.prizes() {
            self.pool.add(prize.clone(), prize.probability);
        }
        self.initialized = true;

        info!(
            "Initialized prize pool: {} prize(s), total weight {}.",
            self.catalog.len(),
            self.pool.total_weight()
        );
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::prize::PrizeId;

    fn catalog() -> PrizeCatalog {
        PrizeCatalog::new(vec![
            Prize::new(1, "Candy", 70.0),
            Prize::new(2, "Plush", 30.0),
        ])
    }

    #[test]
    fn empty_catalog_draws_nothing() {
        let mut selector = PrizeSelector::new(PrizeCatalog::default());
        let mut rng = StdRng::seed_from_u64(1);
        assert!(selector.draw(5, &mut rng).is_empty());
        assert!(selector.draw_one(&mut rng).is_none());
        assert!(!selector.is_initialized());
    }

    #[test]
    fn pool_is_built_once_on_first_draw() {
        let mut selector = PrizeSelector::new(catalog());
        assert!(!selector.is_initialized());

        let mut rng = StdRng::seed_from_u64(2);
        let prizes = selector.draw(3, &mut rng);
        assert_eq!(prizes.len(), 3);
        assert!(selector.is_initialized());
        assert_eq!(selector.total_weight(), 100.0);
    }

    #[test]
    fn non_positive_probabilities_are_skipped() {
        let catalog = catalog().with_prize(Prize::new(3, "Broken", 0.0));
        let mut selector = PrizeSelector::new(catalog);
        let mut rng = StdRng::seed_from_u64(3);

        let drawn = selector.draw(2_000, &mut rng);
        assert!(drawn.iter().all(|p| p.id != PrizeId(3)));
        assert_eq!(selector.total_weight(), 100.0);
    }

    #[test]
    fn reload_rebuilds_pool() {
        let mut selector = PrizeSelector::new(catalog());
        let mut rng = StdRng::seed_from_u64(4);
        selector.draw(1, &mut rng);

        selector.reload(PrizeCatalog::new(vec![Prize::new(9, "Only", 1.0)]));
        assert!(!selector.is_initialized());
        let drawn = selector.draw(10, &mut rng);
        assert!(drawn.iter().all(|p| p.id == PrizeId(9)));
        assert_eq!(selector.total_weight(), 1.0);
    }
}
