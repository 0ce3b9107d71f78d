//! Point sampling over rectangular spawn areas and minimum-distance placement.
//!
//! A [`PointSampling`] strategy proposes candidate points inside a [`SpawnArea`];
//! [`SpatialPlacer`] rejects candidates that land too close to objects already on
//! the field and gives up after a bounded number of attempts.
use glam::Vec2;
use mint::Vector2;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub mod placer;
pub mod uniform;

pub use placer::{find_position, SpatialPlacer};
pub use uniform::UniformPointSampling;

/// Axis-aligned rectangle, given by its extent and world-space center, that objects spawn in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnArea {
    /// Width and height in world units.
    pub extent: Vec2,
    /// World-space center of the rectangle.
    pub center: Vec2,
}

impl SpawnArea {
    /// Create an area of the given extent centered on the origin.
    pub fn new(extent: Vec2) -> Self {
        Self {
            extent,
            center: Vec2::ZERO,
        }
    }

    /// Sets the world-space center.
    pub fn with_center(mut self, center: Vec2) -> Self {
        self.center = center;
        self
    }

    /// Half of the extent in each axis.
    pub fn half_extent(&self) -> Vec2 {
        self.extent * 0.5
    }

    /// Whether the area has no interior (a non-positive or non-finite side).
    pub fn is_degenerate(&self) -> bool {
        !(self.extent.x.is_finite() && self.extent.y.is_finite())
            || self.extent.x <= 0.0
            || self.extent.y <= 0.0
    }

    /// Half-open containment test: left/bottom edges inclusive, right/top edges exclusive.
    pub fn contains(&self, point: Vec2) -> bool {
        let local = point - self.center;
        let half = self.half_extent();
        local.x >= -half.x && local.x < half.x && local.y >= -half.y && local.y < half.y
    }
}

/// Trait for candidate point generation inside a spawn area.
pub trait PointSampling: Send + Sync {
    /// Returns a candidate relative to the area center, or `None` if the extent is empty.
    fn sample(&self, extent: Vector2<f32>, rng: &mut dyn Rng) -> Option<Vector2<f32>>;
}

/// Generate a random float in the range [0, 1].
///
/// Large inputs can round up to exactly `1.0` in `f32`.
#[inline]
pub fn rand01(rng: &mut dyn Rng) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}

/// Draw a value in `[min, max)`; the upper edge is clamped to the next float below `max`.
#[inline]
pub fn rand_range(rng: &mut dyn Rng, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    (min + rand01(rng) * (max - min)).clamp(min, next_down(max))
}

/// Compute the next smaller representable float value.
#[inline]
pub(crate) fn next_down(val: f32) -> f32 {
    if val.is_nan() || val == f32::NEG_INFINITY {
        return val;
    }
    if val == f32::INFINITY {
        return f32::MAX;
    }
    if val == 0.0 {
        return -f32::MIN_POSITIVE;
    }

    let bits = val.to_bits();
    if val > 0.0 {
        f32::from_bits(bits - 1)
    } else {
        f32::from_bits(bits + 1)
    }
}


#[cfg(test)]
mod tests {
    use super::test_rng::FixedRng;
    use super::*;

    #[test]
    fn rand01_spans_unit_interval() {
        assert_eq!(rand01(&mut FixedRng { value: 0 }), 0.0);
        let half = rand01(&mut FixedRng {
            value: u32::MAX / 2,
        });
        assert!((half - 0.5).abs() < 0.001);
        let top = rand01(&mut FixedRng { value: u32::MAX });
        assert!((0.0..=1.0).contains(&top));
    }

    #[test]
    fn rand_range_stays_below_upper_edge() {
        let value = rand_range(&mut FixedRng { value: u32::MAX }, 0.0, 360.0);
        assert!(value < 360.0);
        assert!(value > 359.0);
        assert_eq!(rand_range(&mut FixedRng { value: 0 }, 0.0, 360.0), 0.0);
        assert_eq!(rand_range(&mut FixedRng { value: 7 }, 2.0, 2.0), 2.0);
    }

    #[test]
    fn next_down_handles_edge_cases() {
        assert!(next_down(1.0) < 1.0);
        assert!(next_down(-1.0) < -1.0);
        assert_eq!(next_down(0.0), -f32::MIN_POSITIVE);
        assert_eq!(next_down(f32::INFINITY), f32::MAX);
        assert_eq!(next_down(f32::NEG_INFINITY), f32::NEG_INFINITY);
        assert!(next_down(f32::NAN).is_nan());
    }

    #[test]
    fn spawn_area_containment_is_half_open() {
        let area = SpawnArea::new(Vec2::new(8.0, 4.0)).with_center(Vec2::new(1.0, 0.0));
        assert!(area.contains(Vec2::new(-3.0, -2.0)));
        assert!(!area.contains(Vec2::new(5.0, 0.0)));
        assert!(!area.contains(Vec2::new(1.0, 2.0)));
        assert!(area.contains(Vec2::new(1.0, 0.0)));
    }

    #[test]
    fn spawn_area_degenerate_extents() {
        assert!(SpawnArea::new(Vec2::new(0.0, 4.0)).is_degenerate());
        assert!(SpawnArea::new(Vec2::new(4.0, -1.0)).is_degenerate());
        assert!(SpawnArea::new(Vec2::new(f32::NAN, 1.0)).is_degenerate());
        assert!(!SpawnArea::new(Vec2::new(8.0, 4.0)).is_degenerate());
    }
}
