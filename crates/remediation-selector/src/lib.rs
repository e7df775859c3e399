//! Soil Remediation Selector
//!
//! Compares three remediation strategies for a contaminated Permian Basin
//! site and recommends one against the requester's priorities.
//!
//! # Strategies
//!
//! | Strategy | Facility                       | Duration source            |
//! |----------|--------------------------------|----------------------------|
//! | Haul     | Nearest qualified landfill     | Simulated truck throughput |
//! | Onsite   | None (treated in place)        | Permeability + contaminant |
//! | Surface  | Nearest treatment facility     | Facility turnaround        |
//!
//! # Scoring Model
//!
//! ```text
//! Score(s) = Σ_d pts(d) · (1 - (v_d(s) - min_d) / min_d)  [+ treatment bonus]
//! ```
//!
//! where `d` ranges over cost ($/CY), speed (days) and sustainability
//! (tons CO₂). See [`scorer`] for the point ceilings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::f64::consts::PI;
use thiserror::Error;

pub mod engine;
pub mod loader;
pub mod params;
pub mod region;
pub mod registry;
pub mod scorer;
pub mod simulator;

pub use engine::{analyze, Analysis};
pub use params::OperationalParams;
pub use region::{Jurisdiction, RegionInfo};
pub use registry::{FacilityMatch, FacilityRegistry, LandfillRecord, TreatmentFacilityRecord};
pub use scorer::ScoringConfig;

/// Earth radius in statute miles (9 decimal precision)
pub const EARTH_RADIUS_MILES: f64 = 3959.000000000;

/// Cubic feet per cubic yard
pub const CUBIC_FEET_PER_CUBIC_YARD: f64 = 27.0;

#[derive(Error, Debug)]
pub enum RemediationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Site volume must be positive, got {0} CY")]
    NonPositiveVolume(f64),
    #[error("Invalid facility database: {0}")]
    InvalidFacilityDatabase(String),
    #[error("Override {0} must be a finite positive number, got {1}")]
    InvalidOverride(&'static str, f64),
}

pub type Result<T> = std::result::Result<T, RemediationError>;

/// A point in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to another point in miles
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        haversine_miles(self, other)
    }
}

/// Haversine distance between two points in miles (9 decimal precision)
pub fn haversine_miles(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1_rad = a.latitude * PI / 180.000000000;
    let lat2_rad = b.latitude * PI / 180.000000000;
    let dlat = (b.latitude - a.latitude) * PI / 180.000000000;
    let dlon = (b.longitude - a.longitude) * PI / 180.000000000;

    let h = (dlat / 2.000000000).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.000000000).sin().powi(2);
    let c = 2.000000000 * h.sqrt().atan2((1.000000000 - h).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Excavated volume in cubic yards from surface area (sq ft) and depth (ft)
pub fn volume_cy(surface_area_sqft: f64, depth_ft: f64) -> f64 {
    surface_area_sqft * depth_ft / CUBIC_FEET_PER_CUBIC_YARD
}

/// Soil permeability class, drives onsite treatment time and amendments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permeability {
    High,
    #[default]
    Medium,
    Low,
}

/// Importance the requester assigns to one scoring dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityLevel {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Priorities {
    pub cost: PriorityLevel,
    pub speed: PriorityLevel,
    /// ESG / CO₂ footprint
    #[serde(alias = "esg")]
    pub sustainability: PriorityLevel,
}

/// Caller-supplied operational parameters. Anything left `None` falls back
/// to the defaults in [`params`] or to the matched facility's own pricing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationalOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truck_capacity_cy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_trucks: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truck_hourly_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excavator_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loader_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_hours_per_day: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disposal_cost_cy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backfill_cost_cy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onsite_processing_cost_cy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surface_processing_cost_cy: Option<f64>,
}

/// One analysis request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteInput {
    pub coordinate: Coordinate,
    /// Total petroleum hydrocarbons (mg/kg), 0 when not a concern
    #[serde(default)]
    pub tph_mgkg: f64,
    /// Chloride (mg/kg), 0 when not a concern
    #[serde(default)]
    pub chloride_mgkg: f64,
    pub surface_area_sqft: f64,
    pub depth_ft: f64,
    #[serde(default)]
    pub needs_backfill: bool,
    #[serde(default)]
    pub permeability: Permeability,
    #[serde(default)]
    pub priorities: Priorities,
    #[serde(default)]
    pub overrides: OperationalOverrides,
}

impl SiteInput {
    pub fn volume_cy(&self) -> f64 {
        volume_cy(self.surface_area_sqft, self.depth_ft)
    }
}

/// Remediation strategies, declared in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Haul,
    Onsite,
    Surface,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::Haul,
        StrategyKind::Onsite,
        StrategyKind::Surface,
    ];

    /// Treatment strategies return usable soil instead of landfilling it
    pub fn is_treatment(&self) -> bool {
        matches!(self, StrategyKind::Onsite | StrategyKind::Surface)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            StrategyKind::Haul => "Dig & Haul to Landfill",
            StrategyKind::Onsite => "Onsite Remediation",
            StrategyKind::Surface => "Surface Facility Treatment",
        }
    }
}

/// A named sub-cost of a strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostItem {
    pub category: String,
    pub amount: f64,
}

impl CostItem {
    pub fn new(category: impl Into<String>, amount: f64) -> Self {
        Self {
            category: category.into(),
            amount,
        }
    }
}

/// Facility a strategy was matched against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilitySummary {
    pub name: String,
    pub distance_miles: f64,
}

/// Simulated cost, duration and emissions of one strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyEstimate {
    pub kind: StrategyKind,
    pub total_cost: f64,
    pub cost_per_cy: f64,
    pub project_days: u32,
    pub fuel_gallons: f64,
    pub co2_tons: f64,
    pub cost_breakdown: Vec<CostItem>,
    pub includes_backfill: bool,
    pub soil_returned_clean: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility: Option<FacilitySummary>,
    /// Whether the matched landfill sells backfill itself (haul only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backfill_available_at_facility: Option<bool>,
}

impl StrategyEstimate {
    /// Sum of the cost breakdown, equal to `total_cost`
    pub fn breakdown_total(&self) -> f64 {
        self.cost_breakdown.iter().map(|item| item.amount).sum()
    }
}

/// Ranked outcome over the strategies that could be evaluated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub recommended: StrategyKind,
    pub scores: BTreeMap<StrategyKind, f64>,
}
