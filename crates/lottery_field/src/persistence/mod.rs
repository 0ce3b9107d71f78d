//! Persisted player state: the key-value store abstraction, the acquisition log
//! and audio volume settings.
mod acquisition;
mod audio;
mod store;

pub use acquisition::{AcquisitionEntry, AcquisitionLog, ACQUISITION_KEY};
pub use audio::{AudioSettings, AudioVolume, BGM_VOLUME_KEY, SE_VOLUME_KEY};
pub use store::{FileStore, KeyValueStore, MemoryStore};
