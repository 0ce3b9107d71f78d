//! Field population: placed lottery objects, their configuration and lifecycle.
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::prize::Prize;

pub mod config;
pub mod controller;
pub mod events;

/// Per-field identifier of a placed object, independent of the prize it carries.
/// Starts at 1 and increases monotonically until the field is repopulated.
pub type UniqueId = u64;

/// A lottery object sitting on the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedObject {
    pub unique_id: UniqueId,
    /// World-space position.
    pub position: Vec2,
    /// Presentation rotation in degrees, in `[0, 360)`.
    pub rotation_degrees: f32,
    pub prize: Prize,
}

/// Lifecycle state of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldState {
    #[default]
    Empty,
    Populated,
}
