//! Prize records, catalogs and the catalog-backed weighted selector.
//!
//! A [`PrizeCatalog`] is the read-only list of prizes for a session. Each prize's
//! `probability` doubles as its weight in the [`PrizeSelector`] pool; the values do
//! not need to sum to 100.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub mod selector;
pub mod validation;

pub use selector::PrizeSelector;

/// Stable identifier of a prize within a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrizeId(pub u32);

impl fmt::Display for PrizeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Rarity tier of a prize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum PrizeRarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl PrizeRarity {
    pub const ALL: [PrizeRarity; 5] = [
        PrizeRarity::Common,
        PrizeRarity::Uncommon,
        PrizeRarity::Rare,
        PrizeRarity::Epic,
        PrizeRarity::Legendary,
    ];
}

pub const DEFAULT_PROBABILITY: f32 = 10.0;

fn default_probability() -> f32 {
    DEFAULT_PROBABILITY
}

/// A prize that can be won from a lottery object.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prize {
    pub id: PrizeId,
    pub name: String,
    /// Relative selection weight.
    #[serde(default = "default_probability")]
    pub probability: f32,
    #[serde(default)]
    pub rarity: PrizeRarity,
    /// Sort key for collection listings; ties are broken by id.
    #[serde(default)]
    pub display_order: i32,
}

impl Prize {
    pub fn new(id: u32, name: impl Into<String>, probability: f32) -> Self {
        Self {
            id: PrizeId(id),
            name: name.into(),
            probability,
            rarity: PrizeRarity::Common,
            display_order: 0,
        }
    }

    pub fn with_rarity(mut self, rarity: PrizeRarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_display_order(mut self, display_order: i32) -> Self {
        self.display_order = display_order;
        self
    }

    pub fn set_probability(&mut self, probability: f32) {
        self.probability = probability;
    }
}

/// Ordered, read-only list of prizes for a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrizeCatalog {
    prizes: Vec<Prize>,
}

impl PrizeCatalog {
    pub fn new(prizes: Vec<Prize>) -> Self {
        Self { prizes }
    }

    pub fn with_prize(mut self, prize: Prize) -> Self {
        self.prizes.push(prize);
        self
    }

    /// Parse a catalog from RON, e.g. `(prizes: [(id: 1, name: "Candy", probability: 50.0)])`.
    pub fn from_ron_str(source: &str) -> Result<Self> {
        ron::from_str(source).map_err(|e| Error::Serialization(e.to_string()))
    }

    pub fn to_ron_string(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    pub fn prizes(&self) -> &[Prize] {
        &self.prizes
    }

    /// Mutable access for balancing tools such as
    /// [`normalize_probabilities`](crate::prize::validation::normalize_probabilities).
    pub fn prizes_mut(&mut self) -> &mut [Prize] {
        &mut self.prizes
    }

    pub fn len(&self) -> usize {
        self.prizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prizes.is_empty()
    }

    pub fn get(&self, id: PrizeId) -> Option<&Prize> {
        self.prizes.iter().find(|p| p.id == id)
    }

    pub fn try_get(&self, id: PrizeId) -> Result<&Prize> {
        self.get(id).ok_or(Error::UnknownPrize { id })
    }

    /// Prizes ordered by display order, then id.
    pub fn display_sorted(&self) -> Vec<&Prize> {
        let mut sorted: Vec<&Prize> = self.prizes.iter().collect();
        sorted.sort_by_key(|p| (p.display_order, p.id));
        sorted
    }

    /// Reorder the catalog in place by display order, then id.
    pub fn sort_for_display(&mut self) {
        self.prizes.sort_by_key(|p| (p.display_order, p.id));
    }
}

impl From<Vec<Prize>> for PrizeCatalog {
    fn from(prizes: Vec<Prize>) -> Self {
        Self::new(prizes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG_RON: &str = r#"(
        prizes: [
            (id: 3, name: "Golden Ticket", probability: 0.5, rarity: Legendary, display_order: 9),
            (id: 1, name: "Candy", probability: 50.0),
            (id: 2, name: "Plush", rarity: Rare, display_order: 1),
        ],
    )"#;

    #[test]
    fn parses_ron_with_defaults() {
        let catalog = PrizeCatalog::from_ron_str(CATALOG_RON).unwrap();
        assert_eq!(catalog.len(), 3);

        let plush = catalog.get(PrizeId(2)).unwrap();
        assert_eq!(plush.probability, DEFAULT_PROBABILITY);
        assert_eq!(plush.rarity, PrizeRarity::Rare);

        let candy = catalog.get(PrizeId(1)).unwrap();
        assert_eq!(candy.rarity, PrizeRarity::Common);
        assert_eq!(candy.display_order, 0);
    }

    #[test]
    fn malformed_ron_is_a_serialization_error() {
        let err = PrizeCatalog::from_ron_str("(prizes: [(id: )])").unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn ron_output_parses_back() {
        let catalog = PrizeCatalog::from_ron_str(CATALOG_RON).unwrap();
        let text = catalog.to_ron_string().unwrap();
        assert_eq!(PrizeCatalog::from_ron_str(&text).unwrap(), catalog);
    }

    #[test]
    fn try_get_reports_unknown_ids() {
        let catalog = PrizeCatalog::default().with_prize(Prize::new(1, "Candy", 5.0));
        assert!(catalog.try_get(PrizeId(1)).is_ok());
        assert!(matches!(
            catalog.try_get(PrizeId(42)),
            Err(Error::UnknownPrize { id: PrizeId(42) })
        ));
    }

    #[test]
    fn display_order_then_id() {
        let catalog = PrizeCatalog::new(vec![
            Prize::new(5, "e", 1.0).with_display_order(2),
            Prize::new(4, "d", 1.0).with_display_order(1),
            Prize::new(2, "b", 1.0).with_display_order(1),
            Prize::new(9, "z", 1.0),
        ]);
        let ids: Vec<u32> = catalog.display_sorted().iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![9, 2, 4, 5]);

        let mut sorted = catalog.clone();
        sorted.sort_for_display();
        let ids: Vec<u32> = sorted.prizes().iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![9, 2, 4, 5]);
    }

    #[test]
    fn setter_replaces_probability() {
        let mut prize = Prize::new(1, "Candy", 5.0);
        prize.set_probability(12.5);
        assert_eq!(prize.probability, 12.5);
    }
}
