//! Weighted item reservoir with cumulative-weight sampling.
//!
//! [`WeightedPool`] keeps items in insertion order together with a positive weight
//! and draws them with probability `weight / total_weight`. The total is cached and
//! only recomputed after the pool was modified.
use rand::Rng;
use tracing::{error, warn};

use crate::error::{Error, Result};
use crate::sampling::rand01;

/// An item together with its selection weight.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedItem<T> {
    pub item: T,
    pub weight: f32,
}

/// Ordered collection of weighted items supporting sampling with replacement.
#[derive(Debug, Clone)]
pub struct WeightedPool<T> {
    items: Vec<WeightedItem<T>>,
    total_weight: f32,
    dirty: bool,
}

impl<T> Default for WeightedPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> WeightedPool<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            total_weight: 0.0,
            dirty: true,
        }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            items: Vec::with_capacity(cap),
            total_weight: 0.0,
            dirty: true,
        }
    }

    /// Append an item, failing for weights that are not finite and strictly positive.
    pub fn try_add(&mut self, item: T, weight: f32) -> Result<()> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(Error::InvalidWeight { weight });
        }

        self.items.push(WeightedItem { item, weight });
        self.dirty = true;
        Ok(())
    }

    /// Append an item; invalid weights are logged and ignored. Returns whether it was added.
    pub fn add(&mut self, item: T, weight: f32) -> bool {
        match self.try_add(item, weight) {
            Ok(()) => true,
            Err(e) => {
                warn!("Ignoring pool item: {}.", e);
                false
            }
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.total_weight = 0.0;
        self.dirty = true;
    }

    /// Sum of all weights, recomputed only when the pool changed since the last call.
    pub fn total_weight(&mut self) -> f32 {
        if self.dirty {
            self.total_weight = self.items.iter().map(|i| i.weight).sum();
            self.dirty = false;
        }
        self.total_weight
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeightedItem<T>> {
        self.items.iter()
    }
}

impl<T: Clone> WeightedPool<T> {
    /// Draw one item proportionally to its weight.
    ///
    /// Rolls `r` in `[0, total)` and returns the first item whose running weight sum
    /// reaches `r`. If rounding leaves `r` above every partial sum, the last inserted
    /// item is returned. Returns `None` (and logs) for an empty pool.
    pub fn select_random(&mut self, rng: &mut dyn Rng) -> Option<T> {
        if self.items.is_empty() {
            error!("No items available for selection.");
            return None;
        }

        let total = self.total_weight();
        let roll = rand01(rng) * total;

        let mut running = 0.0f32;
        for entry in &self.items {
            running += entry.weight;
            if roll <= running {
                return Some(entry.item.clone());
            }
        }

        // Last item absorbs rounding error; intentionally not re-normalized.
        self.items.last().map(|e| e.item.clone())
    }

    /// Draw `count` independent items (with replacement).
    pub fn select_multiple(&mut self, count: usize, rng: &mut dyn Rng) -> Vec<T> {
        if self.items.is_empty() {
            error!("No items available for selection of {} item(s).", count);
            return Vec::new();
        }

        (0..count).filter_map(|_| self.select_random(rng)).collect()
    }

    /// Each item's share of the total weight in percent, in insertion order.
    pub fn probabilities(&mut self) -> Vec<(T, f32)> {
        let total = self.total_weight();
        if total <= 0.0 {
            return Vec::new();
        }
        self.items
            .iter()
            .map(|e| (e.item.clone(), e.weight / total * 100.0))
            .collect()
    }
}
