//! Recommendation scoring
//!
//! Each priority dimension scores an option relative to the best option on
//! that dimension:
//!
//! ```text
//! component = pts(level) · (1 - (value - min) / min)
//! ```
//!
//! | Dimension      | Value      | High | Medium | Zero-min fallback |
//! |----------------|------------|------|--------|-------------------|
//! | Cost           | $/CY       | 40   | 20     | 20 / 10           |
//! | Speed          | days       | 30   | 15     | 15 / 7            |
//! | Sustainability | tons CO₂   | 30   | 15     | 15 / 7            |
//!
//! Low priority contributes nothing. With high sustainability priority,
//! treatment strategies (Onsite, Surface) get a flat bonus.

use crate::{Priorities, PriorityLevel, Recommendation, StrategyEstimate, StrategyKind};
use std::collections::BTreeMap;
use tracing::{debug, info};

pub const COST_HIGH_POINTS: f64 = 40.0;
pub const COST_MEDIUM_POINTS: f64 = 20.0;
pub const SPEED_HIGH_POINTS: f64 = 30.0;
pub const SPEED_MEDIUM_POINTS: f64 = 15.0;
pub const SUSTAINABILITY_HIGH_POINTS: f64 = 30.0;
pub const SUSTAINABILITY_MEDIUM_POINTS: f64 = 15.0;
pub const TREATMENT_BONUS: f64 = 10.0;

/// Points and zero-minimum fallback for one dimension
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionWeights {
    pub high_points: f64,
    pub medium_points: f64,
    /// Used instead of the ratio when the minimum value is zero
    pub high_fallback: f64,
    pub medium_fallback: f64,
}

impl DimensionWeights {
    fn points(&self, level: PriorityLevel) -> Option<(f64, f64)> {
        match level {
            PriorityLevel::High => Some((self.high_points, self.high_fallback)),
            PriorityLevel::Medium => Some((self.medium_points, self.medium_fallback)),
            PriorityLevel::Low => None,
        }
    }

    /// Component score of `value` against the dimension minimum
    pub fn component(&self, level: PriorityLevel, value: f64, min: f64) -> f64 {
        match self.points(level) {
            None => 0.0,
            Some((_, fallback)) if min <= 0.0 => fallback,
            Some((points, _)) => points * (1.0 - (value - min) / min),
        }
    }
}

/// Scorer configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    pub cost: DimensionWeights,
    pub speed: DimensionWeights,
    pub sustainability: DimensionWeights,
    /// Flat bonus for treatment strategies under high sustainability priority
    pub treatment_bonus: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            cost: DimensionWeights {
                high_points: COST_HIGH_POINTS,
                medium_points: COST_MEDIUM_POINTS,
                high_fallback: 20.0,
                medium_fallback: 10.0,
            },
            speed: DimensionWeights {
                high_points: SPEED_HIGH_POINTS,
                medium_points: SPEED_MEDIUM_POINTS,
                high_fallback: 15.0,
                medium_fallback: 7.0,
            },
            sustainability: DimensionWeights {
                high_points: SUSTAINABILITY_HIGH_POINTS,
                medium_points: SUSTAINABILITY_MEDIUM_POINTS,
                high_fallback: 15.0,
                medium_fallback: 7.0,
            },
            treatment_bonus: TREATMENT_BONUS,
        }
    }
}

/// Minimum of a metric across options; callers guarantee a non-empty slice
fn min_of(estimates: &[StrategyEstimate], metric: impl Fn(&StrategyEstimate) -> f64) -> f64 {
    estimates.iter().map(metric).fold(f64::INFINITY, f64::min)
}

/// Score every estimate and pick the best. `None` when there is nothing to
/// compare. Equal scores keep the earlier estimate.
pub fn recommend(
    estimates: &[StrategyEstimate],
    priorities: &Priorities,
    config: &ScoringConfig,
) -> Option<Recommendation> {
    if estimates.is_empty() {
        return None;
    }

    let min_cost = min_of(estimates, |e| e.cost_per_cy);
    let min_days = min_of(estimates, |e| e.project_days as f64);
    let min_co2 = min_of(estimates, |e| e.co2_tons);

    let mut scores = BTreeMap::new();
    let mut best: Option<(StrategyKind, f64)> = None;

    for estimate in estimates {
        let cost = config.cost.component(priorities.cost, estimate.cost_per_cy, min_cost);
        let speed = config
            .speed
            .component(priorities.speed, estimate.project_days as f64, min_days);
        let mut sustainability =
            config
                .sustainability
                .component(priorities.sustainability, estimate.co2_tons, min_co2);
        if priorities.sustainability == PriorityLevel::High && estimate.kind.is_treatment() {
            sustainability += config.treatment_bonus;
        }

        let score = cost + speed + sustainability;
        debug!(
            "Scored {:?}: {:.2} (cost={:.2}, speed={:.2}, sustainability={:.2})",
            estimate.kind, score, cost, speed, sustainability
        );

        scores.insert(estimate.kind, score);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((estimate.kind, score));
        }
    }

    let (recommended, score) = best?;
    info!("Recommended {} (score {:.2})", recommended.display_name(), score);

    Some(Recommendation { recommended, scores })
}
