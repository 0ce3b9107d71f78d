//! Uniform random point sampling strategy.
use mint::Vector2;
use rand::Rng;

use crate::sampling::{next_down, rand01, PointSampling};

/// Uniform i.i.d. point over a rectangle centered on the origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformPointSampling;

impl PointSampling for UniformPointSampling {
    fn sample(&self, extent: Vector2<f32>, rng: &mut dyn Rng) -> Option<Vector2<f32>> {
        let w = extent.x;
        let h = extent.y;

        if !(w > 0.0 && h > 0.0) || !w.is_finite() || !h.is_finite() {
            return None;
        }

        let half_w = w * 0.5;
        let half_h = h * 0.5;

        let x = (rand01(rng) * w - half_w).clamp(-half_w, next_down(half_w));
        let y = (rand01(rng) * h - half_h).clamp(-half_h, next_down(half_h));

        Some(Vector2 { x, y })
    }
}
