//! Operational parameter resolution
//!
//! Overrides from the request are merged with fixed defaults once, before
//! any simulator runs. Per-facility prices (disposal, backfill, surface
//! processing) stay optional here and are filled in by the simulator that
//! matched the facility.

use crate::{OperationalOverrides, RemediationError, Result};
use serde::{Deserialize, Serialize};

/// Default truck payload (CY)
pub const DEFAULT_TRUCK_CAPACITY_CY: f64 = 18.0;
pub const DEFAULT_NUM_TRUCKS: u32 = 3;
/// $/hr
pub const DEFAULT_TRUCK_HOURLY_RATE: f64 = 85.0;
pub const DEFAULT_EXCAVATOR_RATE: f64 = 150.0;
pub const DEFAULT_LOADER_RATE: f64 = 125.0;
pub const DEFAULT_WORK_HOURS_PER_DAY: f64 = 10.0;
/// $/CY
pub const DEFAULT_ONSITE_PROCESSING_COST_CY: f64 = 25.0;

/// Average loaded/empty truck speed (mph)
pub const AVG_TRUCK_SPEED_MPH: f64 = 45.0;
/// Loading time per trip (hr), counted at both ends of the round trip
pub const LOADING_TIME_HOURS: f64 = 0.25;
pub const UNLOADING_TIME_HOURS: f64 = 0.5;

/// Fuel burn (gal/hr)
pub const EXCAVATOR_FUEL_GPH: f64 = 6.0;
pub const LOADER_FUEL_GPH: f64 = 5.0;
pub const TRUCK_FUEL_GPH: f64 = 4.0;

/// Diesel CO₂ (lb/gal)
pub const CO2_LBS_PER_GALLON: f64 = 22.38;
pub const LBS_PER_TON: f64 = 2000.0;

/// CO₂ in short tons for a diesel volume in gallons
pub fn co2_tons(fuel_gallons: f64) -> f64 {
    fuel_gallons * CO2_LBS_PER_GALLON / LBS_PER_TON
}

/// Truck fleet and equipment parameters shared by Haul and Surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HaulingParams {
    pub truck_capacity_cy: f64,
    pub num_trucks: u32,
    pub truck_hourly_rate: f64,
    pub excavator_rate: f64,
    pub loader_rate: f64,
    pub work_hours_per_day: f64,
}

impl Default for HaulingParams {
    fn default() -> Self {
        Self {
            truck_capacity_cy: DEFAULT_TRUCK_CAPACITY_CY,
            num_trucks: DEFAULT_NUM_TRUCKS,
            truck_hourly_rate: DEFAULT_TRUCK_HOURLY_RATE,
            excavator_rate: DEFAULT_EXCAVATOR_RATE,
            loader_rate: DEFAULT_LOADER_RATE,
            work_hours_per_day: DEFAULT_WORK_HOURS_PER_DAY,
        }
    }
}

impl HaulingParams {
    /// Hours for one truck to load, drive out, unload, drive back and stage
    /// the next load.
    pub fn round_trip_hours(&self, distance_miles: f64) -> f64 {
        let travel = distance_miles / AVG_TRUCK_SPEED_MPH;
        LOADING_TIME_HOURS + travel + UNLOADING_TIME_HOURS + travel + LOADING_TIME_HOURS
    }

    pub fn required_trips(&self, volume_cy: f64) -> u32 {
        debug_assert!(self.truck_capacity_cy.is_finite() && self.truck_capacity_cy > 0.0);
        (volume_cy / self.truck_capacity_cy).ceil() as u32
    }
}

/// Fully resolved parameters for one analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperationalParams {
    pub hauling: HaulingParams,
    /// Landfill disposal price override ($/CY)
    pub disposal_cost_cy: Option<f64>,
    /// Backfill price override ($/CY)
    pub backfill_cost_cy: Option<f64>,
    pub onsite_processing_cost_cy: f64,
    /// Surface facility processing price override ($/CY)
    pub surface_processing_cost_cy: Option<f64>,
}

impl Default for OperationalParams {
    fn default() -> Self {
        Self {
            hauling: HaulingParams::default(),
            disposal_cost_cy: None,
            backfill_cost_cy: None,
            onsite_processing_cost_cy: DEFAULT_ONSITE_PROCESSING_COST_CY,
            surface_processing_cost_cy: None,
        }
    }
}

/// Accepts a finite positive override, passes `None` through
fn positive(name: &'static str, value: Option<f64>) -> Result<Option<f64>> {
    match value {
        Some(v) if !(v.is_finite() && v > 0.0) => Err(RemediationError::InvalidOverride(name, v)),
        other => Ok(other),
    }
}

impl OperationalParams {
    /// Merge request overrides with the defaults. Every override present
    /// must be finite and positive.
    pub fn resolve(overrides: &OperationalOverrides) -> Result<Self> {
        let defaults = Self::default();
        let hauling = defaults.hauling;

        let num_trucks = match overrides.num_trucks {
            Some(0) => return Err(RemediationError::InvalidOverride("num_trucks", 0.0)),
            Some(n) => n,
            None => hauling.num_trucks,
        };

        Ok(Self {
            hauling: HaulingParams {
                truck_capacity_cy: positive("truck_capacity_cy", overrides.truck_capacity_cy)?
                    .unwrap_or(hauling.truck_capacity_cy),
                num_trucks,
                truck_hourly_rate: positive("truck_hourly_rate", overrides.truck_hourly_rate)?
                    .unwrap_or(hauling.truck_hourly_rate),
                excavator_rate: positive("excavator_rate", overrides.excavator_rate)?
                    .unwrap_or(hauling.excavator_rate),
                loader_rate: positive("loader_rate", overrides.loader_rate)?
                    .unwrap_or(hauling.loader_rate),
                work_hours_per_day: positive("work_hours_per_day", overrides.work_hours_per_day)?
                    .unwrap_or(hauling.work_hours_per_day),
            },
            disposal_cost_cy: positive("disposal_cost_cy", overrides.disposal_cost_cy)?,
            backfill_cost_cy: positive("backfill_cost_cy", overrides.backfill_cost_cy)?,
            onsite_processing_cost_cy: positive(
                "onsite_processing_cost_cy",
                overrides.onsite_processing_cost_cy,
            )?
            .unwrap_or(defaults.onsite_processing_cost_cy),
            surface_processing_cost_cy: positive(
                "surface_processing_cost_cy",
                overrides.surface_processing_cost_cy,
            )?,
        })
    }
}
