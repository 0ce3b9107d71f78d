//! Field configuration with boundary validation.
use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sampling::SpawnArea;

/// Configuration for populating and replenishing a lottery field.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Objects placed by the initial population.
    pub object_count: usize,
    /// Size of the spawn rectangle in world units.
    pub spawn_extent: Vec2,
    /// World-space center of the spawn rectangle.
    pub spawn_center: Vec2,
    /// Minimum distance between any two objects.
    pub min_distance: f32,
    /// Candidate positions tried per object before giving up.
    pub max_placement_attempts: usize,
    /// Upper bound on objects present at once.
    pub max_capacity: usize,
    /// Period of the auto-add task.
    pub auto_add_interval: Duration,
    /// Whether [`initialize`](crate::field::controller::FieldPopulationController::initialize)
    /// starts the auto-add task.
    pub auto_add_enabled: bool,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            object_count: 10,
            spawn_extent: Vec2::new(8.0, 4.0),
            spawn_center: Vec2::ZERO,
            min_distance: 0.8,
            max_placement_attempts: 50,
            max_capacity: 50,
            auto_add_interval: Duration::from_secs(5),
            auto_add_enabled: true,
        }
    }
}

impl FieldConfig {
    /// Creates a new [`FieldConfig`] with the given spawn extent and default values otherwise.
    pub fn new(spawn_extent: Vec2) -> Self {
        Self {
            spawn_extent,
            ..Default::default()
        }
    }

    pub fn with_object_count(mut self, object_count: usize) -> Self {
        self.object_count = object_count;
        self
    }

    pub fn with_spawn_center(mut self, spawn_center: Vec2) -> Self {
        self.spawn_center = spawn_center;
        self
    }

    pub fn with_min_distance(mut self, min_distance: f32) -> Self {
        self.min_distance = min_distance;
        self
    }

    pub fn with_max_placement_attempts(mut self, max_placement_attempts: usize) -> Self {
        self.max_placement_attempts = max_placement_attempts;
        self
    }

    pub fn with_max_capacity(mut self, max_capacity: usize) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    pub fn with_auto_add_interval(mut self, auto_add_interval: Duration) -> Self {
        self.auto_add_interval = auto_add_interval;
        self
    }

    pub fn with_auto_add_enabled(mut self, auto_add_enabled: bool) -> Self {
        self.auto_add_enabled = auto_add_enabled;
        self
    }

    pub fn spawn_area(&self) -> SpawnArea {
        SpawnArea::new(self.spawn_extent).with_center(self.spawn_center)
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.object_count == 0 {
            return Err(Error::InvalidConfig("object_count must be > 0".into()));
        }
        if self.spawn_area().is_degenerate() {
            return Err(Error::InvalidConfig(
                "spawn_extent must be finite and > 0 in both components".into(),
            ));
        }
        if !self.spawn_center.is_finite() {
            return Err(Error::InvalidConfig("spawn_center must be finite".into()));
        }
        if !self.min_distance.is_finite() || self.min_distance <= 0.0 {
            return Err(Error::InvalidConfig("min_distance must be > 0".into()));
        }
        if self.max_placement_attempts == 0 {
            return Err(Error::InvalidConfig(
                "max_placement_attempts must be > 0".into(),
            ));
        }
        if self.max_capacity == 0 {
            return Err(Error::InvalidConfig("max_capacity must be > 0".into()));
        }
        if self.object_count > self.max_capacity {
            return Err(Error::InvalidConfig(format!(
                "object_count ({}) must not exceed max_capacity ({})",
                self.object_count, self.max_capacity
            )));
        }
        if self.auto_add_interval.is_zero() {
            return Err(Error::InvalidConfig("auto_add_interval must be > 0".into()));
        }

        Ok(())
    }
}
