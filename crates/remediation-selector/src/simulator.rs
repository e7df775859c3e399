//! Strategy simulators
//!
//! Each simulator turns a site plus resolved operational parameters into a
//! [`StrategyEstimate`]. Haul and Surface need a facility match and return
//! `None` when the registry has no suitable facility; Onsite always runs.
//!
//! ```text
//! round_trip = load + d/45 + unload + d/45 + load
//! trips      = ⌈V / capacity⌉
//! days(haul) = ⌈trips / (hours/round_trip · trucks)⌉
//! ```

use crate::params::{
    co2_tons, OperationalParams, EXCAVATOR_FUEL_GPH, LOADER_FUEL_GPH, TRUCK_FUEL_GPH,
};
use crate::{CostItem, FacilityRegistry, Permeability, SiteInput, StrategyEstimate, StrategyKind};
use tracing::debug;

/// Onsite base treatment time (days) at medium permeability
pub const ONSITE_BASE_TREATMENT_DAYS: f64 = 45.0;
/// Onsite time multiplier applied per contaminant above its high level
pub const HIGH_CONCENTRATION_FACTOR: f64 = 1.2;
pub const HIGH_TPH_MGKG: f64 = 3000.0;
pub const HIGH_CHLORIDE_MGKG: f64 = 7000.0;

/// Onsite mobilization step ($), small jobs below the volume cut
pub const SMALL_JOB_VOLUME_CY: f64 = 1000.0;
pub const SMALL_JOB_MOBILIZATION: f64 = 5000.0;
pub const LARGE_JOB_MOBILIZATION: f64 = 10000.0;

/// Onsite fuel proxy (gal/CY), minimal trucking
pub const ONSITE_FUEL_GAL_PER_CY: f64 = 0.1;

impl Permeability {
    /// Onsite treatment time multiplier
    pub fn duration_factor(&self) -> f64 {
        match self {
            Permeability::High => 0.7,
            Permeability::Medium => 1.0,
            Permeability::Low => 1.5,
        }
    }

    /// Amendment cost per CY, poorly draining soil needs more
    pub fn amendment_cost_cy(&self) -> f64 {
        match self {
            Permeability::Low => 3.0,
            Permeability::Medium | Permeability::High => 1.0,
        }
    }
}

impl StrategyKind {
    /// Simulate this strategy. `volume_cy` must be positive.
    pub fn simulate(
        &self,
        site: &SiteInput,
        volume_cy: f64,
        registry: &FacilityRegistry,
        params: &OperationalParams,
    ) -> Option<StrategyEstimate> {
        match self {
            StrategyKind::Haul => simulate_haul(site, volume_cy, registry, params),
            StrategyKind::Onsite => Some(simulate_onsite(site, volume_cy, params)),
            StrategyKind::Surface => simulate_surface(site, volume_cy, registry, params),
        }
    }
}

/// Dig & haul to the nearest qualified landfill
pub fn simulate_haul(
    site: &SiteInput,
    volume_cy: f64,
    registry: &FacilityRegistry,
    params: &OperationalParams,
) -> Option<StrategyEstimate> {
    let matched = registry.nearest_eligible_landfill(
        &site.coordinate,
        site.tph_mgkg,
        site.chloride_mgkg,
        site.needs_backfill,
    )?;
    let landfill = matched.facility;
    let hauling = &params.hauling;

    let disposal_cost_cy = params.disposal_cost_cy.unwrap_or(landfill.disposal_cost_cy);
    let backfill_cost_cy = params.backfill_cost_cy.unwrap_or(landfill.backfill_cost_cy);

    let round_trip = hauling.round_trip_hours(matched.distance_miles);
    let num_trips = hauling.required_trips(volume_cy);
    let trips_per_day = hauling.work_hours_per_day / round_trip * hauling.num_trucks as f64;
    debug_assert!(trips_per_day.is_finite() && trips_per_day > 0.0);
    let project_days = (num_trips as f64 / trips_per_day).ceil() as u32;
    let project_hours = project_days as f64 * hauling.work_hours_per_day;
    let truck_hours = num_trips as f64 * round_trip;

    let equipment = (hauling.excavator_rate + hauling.loader_rate) * project_hours;
    let trucking = truck_hours * hauling.truck_hourly_rate;
    let disposal = volume_cy * disposal_cost_cy;
    let backfill = if site.needs_backfill {
        volume_cy * backfill_cost_cy
    } else {
        0.0
    };

    let fuel_gallons = EXCAVATOR_FUEL_GPH * project_hours
        + LOADER_FUEL_GPH * project_hours
        + TRUCK_FUEL_GPH * truck_hours;

    debug!(
        "Haul via {} ({:.1} mi): {} trips, {:.2} h/trip, {} days",
        landfill.display_name(),
        matched.distance_miles,
        num_trips,
        round_trip,
        project_days
    );

    let mut estimate = build_estimate(
        StrategyKind::Haul,
        volume_cy,
        project_days,
        fuel_gallons,
        vec![
            CostItem::new("Equipment", equipment),
            CostItem::new("Trucking", trucking),
            CostItem::new("Disposal", disposal),
            CostItem::new("Backfill", backfill),
        ],
    );
    estimate.includes_backfill = site.needs_backfill;
    estimate.facility = Some(matched.summary());
    estimate.backfill_available_at_facility = Some(landfill.backfill_available);
    Some(estimate)
}

/// In-place treatment; no facility needed
pub fn simulate_onsite(
    site: &SiteInput,
    volume_cy: f64,
    params: &OperationalParams,
) -> StrategyEstimate {
    let mut treatment_days = ONSITE_BASE_TREATMENT_DAYS * site.permeability.duration_factor();
    if site.tph_mgkg > HIGH_TPH_MGKG {
        treatment_days *= HIGH_CONCENTRATION_FACTOR;
    }
    if site.chloride_mgkg > HIGH_CHLORIDE_MGKG {
        treatment_days *= HIGH_CONCENTRATION_FACTOR;
    }
    let project_days = treatment_days as u32;

    let processing = volume_cy * params.onsite_processing_cost_cy;
    let mobilization = if volume_cy < SMALL_JOB_VOLUME_CY {
        SMALL_JOB_MOBILIZATION
    } else {
        LARGE_JOB_MOBILIZATION
    };
    let amendments = volume_cy * site.permeability.amendment_cost_cy();

    debug!(
        "Onsite: {:?} permeability, {} days",
        site.permeability, project_days
    );

    let mut estimate = build_estimate(
        StrategyKind::Onsite,
        volume_cy,
        project_days,
        volume_cy * ONSITE_FUEL_GAL_PER_CY,
        vec![
            CostItem::new("Processing", processing),
            CostItem::new("Mobilization", mobilization),
            CostItem::new("Amendments", amendments),
        ],
    );
    estimate.includes_backfill = true;
    estimate.soil_returned_clean = true;
    estimate
}

/// Haul to the nearest surface treatment facility and back
pub fn simulate_surface(
    site: &SiteInput,
    volume_cy: f64,
    registry: &FacilityRegistry,
    params: &OperationalParams,
) -> Option<StrategyEstimate> {
    let matched = registry.nearest_treatment_facility(&site.coordinate)?;
    let facility = matched.facility;
    let hauling = &params.hauling;

    let processing_cost_cy = params
        .surface_processing_cost_cy
        .unwrap_or(facility.processing_cost_cy);

    let round_trip = hauling.round_trip_hours(matched.distance_miles);
    let num_trips = hauling.required_trips(volume_cy);
    let truck_hours = num_trips as f64 * round_trip;

    let trucking = truck_hours * hauling.truck_hourly_rate;
    let processing = volume_cy * processing_cost_cy;

    debug!(
        "Surface via {} ({:.1} mi): {} trips, {} day turnaround",
        facility.facility_name, matched.distance_miles, num_trips, facility.typical_turnaround_days
    );

    let mut estimate = build_estimate(
        StrategyKind::Surface,
        volume_cy,
        facility.typical_turnaround_days,
        TRUCK_FUEL_GPH * truck_hours,
        vec![
            CostItem::new("Trucking", trucking),
            CostItem::new("Processing", processing),
        ],
    );
    estimate.includes_backfill = true;
    estimate.soil_returned_clean = true;
    estimate.facility = Some(matched.summary());
    Some(estimate)
}

/// Common estimate shape; total is the breakdown sum
fn build_estimate(
    kind: StrategyKind,
    volume_cy: f64,
    project_days: u32,
    fuel_gallons: f64,
    cost_breakdown: Vec<CostItem>,
) -> StrategyEstimate {
    let total_cost: f64 = cost_breakdown.iter().map(|item| item.amount).sum();
    StrategyEstimate {
        kind,
        total_cost,
        cost_per_cy: total_cost / volume_cy,
        project_days,
        fuel_gallons,
        co2_tons: co2_tons(fuel_gallons),
        cost_breakdown,
        includes_backfill: false,
        soil_returned_clean: false,
        facility: None,
        backfill_available_at_facility: None,
    }
}
