#![forbid(unsafe_code)]
//! lottery_field: weighted prize draws and field population for lottery claw-machine games.
//!
//! Modules:
//! - pool: weighted item reservoir with cumulative-weight sampling
//! - prize: prize records, catalogs, the catalog-backed selector and catalog validation
//! - sampling: uniform point sampling over spawn areas and minimum-distance placement
//! - field: placed objects, configuration, events and the population controller
//! - schedule: cancellation tokens and periodic tasks driven by frame deltas
//! - session: the selection/result loop built on top of the controller
//! - persistence: key-value stores, the acquisition log and audio settings
pub mod error;
pub mod field;
pub mod persistence;
pub mod pool;
pub mod prize;
pub mod sampling;
pub mod schedule;
pub mod session;

/// Convenient re-exports for common types. Import with `use lottery_field::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::field::config::FieldConfig;
    pub use crate::field::controller::FieldPopulationController;
    pub use crate::field::events::{
        EventSink, FieldEvent, FieldEventKind, FnSink, MultiSink, VecSink,
    };
    pub use crate::field::{FieldState, PlacedObject, UniqueId};
    pub use crate::persistence::{
        AcquisitionEntry, AcquisitionLog, AudioSettings, AudioVolume, FileStore, KeyValueStore,
        MemoryStore,
    };
    pub use crate::pool::{WeightedItem, WeightedPool};
    pub use crate::prize::validation::{
        normalize_probabilities, validate_catalog, RarityProbabilityInfo, ValidationReport,
    };
    pub use crate::prize::{Prize, PrizeCatalog, PrizeId, PrizeRarity, PrizeSelector};
    pub use crate::sampling::{
        find_position, PointSampling, SpatialPlacer, SpawnArea, UniformPointSampling,
    };
    pub use crate::schedule::{CancellationToken, PeriodicTask};
    pub use crate::session::{LotterySession, PickOutcome, SessionPhase};
}
