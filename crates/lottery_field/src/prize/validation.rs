//! Catalog balance checks and probability normalization.
//!
//! These are authoring aids: [`validate_catalog`] reports problems without changing
//! anything, and [`normalize_probabilities`] rescales weights to a target total.
use tracing::info;

use crate::prize::{Prize, PrizeRarity};

/// Smallest probability left after normalization.
pub const MIN_NORMALIZED_PROBABILITY: f32 = 0.1;
/// Max/min probability ratio above which the catalog is flagged as extreme.
pub const EXTREME_RATIO: f32 = 1000.0;
/// Share of the total above which a single prize is flagged as dominant.
pub const DOMINANT_SHARE: f32 = 0.8;

/// Aggregate statistics for one rarity tier.
#[derive(Debug, Clone, PartialEq)]
pub struct RarityProbabilityInfo {
    pub rarity: PrizeRarity,
    pub item_count: usize,
    pub total_probability: f32,
    pub average_probability: f32,
}

/// Outcome of [`validate_catalog`].
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub total_probability: f32,
    pub prize_count: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub rarity_info: Vec<RarityProbabilityInfo>,
}

impl ValidationReport {
    pub fn has_issues(&self) -> bool {
        !self.errors.is_empty() || !self.warnings.is_empty()
    }
}

/// Recommended average probability range (in percent) for each rarity.
pub fn recommended_range(rarity: PrizeRarity) -> (f32, f32) {
    match rarity {
        PrizeRarity::Common => (30.0, 70.0),
        PrizeRarity::Uncommon => (10.0, 30.0),
        PrizeRarity::Rare => (3.0, 10.0),
        PrizeRarity::Epic => (0.5, 3.0),
        PrizeRarity::Legendary => (0.1, 1.0),
    }
}

pub fn validate_catalog(prizes: &[Prize]) -> ValidationReport {
    let mut report = ValidationReport::default();

    if prizes.is_empty() {
        report.warnings.push("catalog contains no prizes".into());
        return report;
    }

    report.prize_count = prizes.len();
    report.total_probability = prizes.iter().map(|p| p.probability).sum();

    for prize in prizes {
        if prize.probability <= 0.0 {
            report.errors.push(format!(
                "prize '{}' has non-positive probability {}",
                prize.name, prize.probability
            ));
        } else if prize.probability > 100.0 {
            report.warnings.push(format!(
                "prize '{}' exceeds 100% ({}%)",
                prize.name, prize.probability
            ));
        }
    }

    check_rarity_balance(prizes, &mut report);
    check_extreme_proportions(prizes, &mut report);

    report.is_valid = report.errors.is_empty();
    report
}

fn check_rarity_balance(prizes: &[Prize], report: &mut ValidationReport) {
    for rarity in PrizeRarity::ALL {
        let (count, total) = prizes
            .iter()
            .filter(|p| p.rarity == rarity)
            .fold((0usize, 0.0f32), |(n, sum), p| (n + 1, sum + p.probability));
        if count == 0 {
            continue;
        }

        let average = total / count as f32;
        report.rarity_info.push(RarityProbabilityInfo {
            rarity,
            item_count: count,
            total_probability: total,
            average_probability: average,
        });

        let (min, max) = recommended_range(rarity);
        if average < min || average > max {
            report.warnings.push(format!(
                "average probability of {rarity:?} ({average:.2}%) is outside the recommended range ({min:.2}%-{max:.2}%)"
            ));
        }
    }
}

fn check_extreme_proportions(prizes: &[Prize], report: &mut ValidationReport) {
    let max = prizes
        .iter()
        .map(|p| p.probability)
        .fold(f32::NEG_INFINITY, f32::max);
    let min = prizes
        .iter()
        .map(|p| p.probability)
        .fold(f32::INFINITY, f32::min);

    if min > 0.0 {
        let ratio = max / min;
        if ratio > EXTREME_RATIO {
            report.warnings.push(format!(
                "probability spread is extreme (max/min ratio {ratio:.1})"
            ));
        }
    }

    let total = report.total_probability;
    if total > 0.0 {
        if let Some(dominant) = prizes
            .iter()
            .find(|p| p.probability / total > DOMINANT_SHARE)
        {
            report.warnings.push(format!(
                "prize '{}' accounts for more than 80% of the total",
                dominant.name
            ));
        }
    }
}

/// Rescale probabilities so they sum to `target_total`, flooring each at
/// [`MIN_NORMALIZED_PROBABILITY`]. Catalogs with a non-positive total are left untouched.
pub fn normalize_probabilities(prizes: &mut [Prize], target_total: f32) {
    let current: f32 = prizes.iter().map(|p| p.probability).sum();
    if prizes.is_empty() || current <= 0.0 {
        return;
    }

    let ratio = target_total / current;
    info!(
        "Normalizing probabilities: {:.2} -> {:.2} (x{:.3}).",
        current, target_total, ratio
    );

    for prize in prizes.iter_mut() {
        let scaled = (prize.probability * ratio).max(MIN_NORMALIZED_PROBABILITY);
        prize.set_probability(scaled);
    }
}
