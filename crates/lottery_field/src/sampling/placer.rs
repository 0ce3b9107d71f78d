//! Rejection-sampling placement with a minimum inter-object distance.
//!
//! Candidates are drawn uniformly from the spawn area and accepted once they are at
//! least `min_distance` away from every occupied position. The search is bounded by
//! `max_attempts`, so dense fields can fail to place an object; callers treat that
//! as "one fewer object", never as an error.
use glam::Vec2;
use rand::Rng;
use tracing::trace;

use crate::sampling::{PointSampling, SpawnArea, UniformPointSampling};

/// Finds free positions inside a [`SpawnArea`] using a [`PointSampling`] strategy.
#[derive(Debug, Clone)]
pub struct SpatialPlacer<S = UniformPointSampling> {
    /// Minimum Euclidean distance to every existing position.
    pub min_distance: f32,
    /// Number of candidates tried before giving up.
    pub max_attempts: usize,
    sampling: S,
}

impl SpatialPlacer {
    /// Create a placer that draws candidates uniformly.
    pub fn new(min_distance: f32, max_attempts: usize) -> Self {
        Self {
            min_distance,
            max_attempts,
            sampling: UniformPointSampling,
        }
    }
}

impl<S: PointSampling> SpatialPlacer<S> {
    /// Replace the candidate sampling strategy.
    pub fn with_sampling<T: PointSampling>(self, sampling: T) -> SpatialPlacer<T> {
        SpatialPlacer {
            min_distance: self.min_distance,
            max_attempts: self.max_attempts,
            sampling,
        }
    }

    /// Returns the first sampled point that keeps `min_distance` to all of `existing`,
    /// or `None` once `max_attempts` candidates were rejected.
    pub fn find_position(
        &self,
        existing: &[Vec2],
        area: &SpawnArea,
        rng: &mut dyn Rng,
    ) -> Option<Vec2> {
        for attempt in 0..self.max_attempts {
            let local = self.sampling.sample(area.extent.into(), rng)?;
            let candidate = Vec2::from(local) + area.center;

            if self.is_clear(candidate, existing) {
                trace!(
                    "Placed candidate ({:.2}, {:.2}) after {} attempt(s).",
                    candidate.x,
                    candidate.y,
                    attempt + 1
                );
                return Some(candidate);
            }
        }

        None
    }

    /// Whether `candidate` is at least `min_distance` away from every point in `existing`.
    pub fn is_clear(&self, candidate: Vec2, existing: &[Vec2]) -> bool {
        if self.min_distance <= 0.0 {
            return true;
        }
        let min_sq = self.min_distance * self.min_distance;
        existing
            .iter()
            .all(|p| p.distance_squared(candidate) >= min_sq)
    }
}

/// Free-function form of [`SpatialPlacer::find_position`] with uniform candidates.
pub fn find_position(
    existing: &[Vec2],
    area: &SpawnArea,
    min_distance: f32,
    max_attempts: usize,
    rng: &mut dyn Rng,
) -> Option<Vec2> {
    SpatialPlacer::new(min_distance, max_attempts).find_position(existing, area, rng)
}
