//! Shared fixtures for the lottery field benches.
#![allow(dead_code)]

use std::time::Duration;

use criterion::{Criterion, Throughput};
use glam::Vec2;
use lottery_field::prelude::{Prize, PrizeCatalog};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Draws are cheap and stable, so a short run is enough.
pub fn draw_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(30)
        .warm_up_time(Duration::from_millis(500))
        .measurement_time(Duration::from_secs(2))
}

/// Placement cost depends on how crowded the field gets, so runs are longer.
pub fn placement_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(15)
        .warm_up_time(Duration::from_secs(1))
        .measurement_time(Duration::from_secs(4))
}

pub fn per_object(objects: usize) -> Throughput {
    Throughput::Elements(objects.max(1) as u64)
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// `n` prizes with weights cycling through 1..=10.
pub fn uniform_catalog(n: usize) -> PrizeCatalog {
    PrizeCatalog::new(
        (0..n)
            .map(|i| Prize::new(i as u32 + 1, format!("prize_{i}"), 1.0 + (i % 10) as f32))
            .collect(),
    )
}

/// The usual common / rare / legendary split.
pub fn tiered_catalog() -> PrizeCatalog {
    PrizeCatalog::new(vec![
        Prize::new(1, "Common", 70.0),
        Prize::new(2, "Rare", 25.0),
        Prize::new(3, "Legendary", 5.0),
    ])
}

/// Cell centres of an `nx` by `ny` grid covering a field of `extent` centred on the origin.
pub fn occupied_grid(extent: Vec2, nx: usize, ny: usize) -> Vec<Vec2> {
    let half = extent * 0.5;
    let cell = Vec2::new(extent.x / nx.max(1) as f32, extent.y / ny.max(1) as f32);

    (0..ny)
        .flat_map(|j| (0..nx).map(move |i| (i, j)))
        .map(|(i, j)| -half + Vec2::new(i as f32 + 0.5, j as f32 + 0.5) * cell)
        .collect()
}
