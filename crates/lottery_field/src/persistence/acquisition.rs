//! Acquisition log: per-prize win counts, stored as one JSON blob under
//! [`ACQUISITION_KEY`] in the shape `{"prizes":[{"prizeId":1,"count":2}]}`.
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::persistence::KeyValueStore;
use crate::prize::PrizeId;

/// Store key holding the serialized acquisition log.
pub const ACQUISITION_KEY: &str = "AcquiredPrizes";

/// How many times a prize has been won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionEntry {
    #[serde(rename = "prizeId")]
    pub prize_id: PrizeId,
    pub count: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct AcquisitionData {
    #[serde(default)]
    prizes: Vec<AcquisitionEntry>,
}

/// Record of every prize the player has won, persisted on each change.
///
/// Entries keep first-acquisition order.
#[derive(Debug)]
pub struct AcquisitionLog<S> {
    store: S,
    entries: Vec<AcquisitionEntry>,
}

impl<S: KeyValueStore> AcquisitionLog<S> {
    /// Loads the log from `store`. A missing blob starts empty; an unreadable one
    /// is logged and also starts empty.
    pub fn load(store: S) -> Self {
        let entries = match store.get(ACQUISITION_KEY) {
            Ok(Some(blob)) => match serde_json::from_str::<AcquisitionData>(&blob) {
                Ok(data) => data.prizes,
                Err(e) => {
                    warn!("Discarding unreadable acquisition data: {}.", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read acquisition data: {}.", e);
                Vec::new()
            }
        };

        debug!("Loaded {} acquired prize(s).", entries.len());
        Self { store, entries }
    }

    /// Counts one acquisition of `prize_id`. Returns `true` if it was the first.
    ///
    /// Save failures are logged; the in-memory log stays updated.
    pub fn record(&mut self, prize_id: PrizeId) -> bool {
        let first = match self.entries.iter_mut().find(|e| e.prize_id == prize_id) {
            Some(entry) => {
                entry.count = entry.count.saturating_add(1);
                false
            }
            None => {
                self.entries.push(AcquisitionEntry { prize_id, count: 1 });
                true
            }
        };

        if let Err(e) = self.save() {
            warn!("Failed to save acquisition of prize {}: {}.", prize_id, e);
        }
        first
    }

    pub fn is_acquired(&self, prize_id: PrizeId) -> bool {
        self.count_of(prize_id) > 0
    }

    pub fn count_of(&self, prize_id: PrizeId) -> u32 {
        self.entries
            .iter()
            .find(|e| e.prize_id == prize_id)
            .map_or(0, |e| e.count)
    }

    pub fn acquired_ids(&self) -> impl Iterator<Item = PrizeId> + '_ {
        self.entries.iter().map(|e| e.prize_id)
    }

    pub fn entries(&self) -> &[AcquisitionEntry] {
        &self.entries
    }

    /// Number of distinct prizes won.
    pub fn unique_count(&self) -> usize {
        self.entries.len()
    }

    /// Total number of wins across all prizes.
    pub fn total_count(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.count)).sum()
    }

    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.store.remove(ACQUISITION_KEY)
    }

    pub fn save(&mut self) -> Result<()> {
        let data = AcquisitionData {
            prizes: self.entries.clone(),
        };
        let blob = serde_json::to_string(&data).map_err(|e| Error::Serialization(e.to_string()))?;
        self.store.set(ACQUISITION_KEY, &blob)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
