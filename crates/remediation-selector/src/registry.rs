//! Facility registry: landfills and treatment facilities with eligibility
//! filtering and nearest-facility queries.
//!
//! The registry is built once (see [`crate::loader`]) and only read
//! afterwards, so it can be shared across concurrent analyses by reference.

use crate::{haversine_miles, Coordinate, FacilitySummary};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Disposal landfill accepting contaminated soil
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandfillRecord {
    pub company: String,
    pub site_name: String,
    pub coordinate: Coordinate,
    pub county: String,
    pub disposal_cost_cy: f64,
    pub backfill_cost_cy: f64,
    pub backfill_available: bool,
    pub tph_max_mgkg: f64,
    pub chloride_max_mgkg: f64,
}

impl LandfillRecord {
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.company, self.site_name)
    }

    /// Contaminant limits check. A zero site level is not a concern and
    /// passes regardless of the landfill's limit.
    pub fn accepts(&self, tph_mgkg: f64, chloride_mgkg: f64) -> bool {
        let accepts_tph = tph_mgkg <= 0.0 || tph_mgkg <= self.tph_max_mgkg;
        let accepts_chloride = chloride_mgkg <= 0.0 || chloride_mgkg <= self.chloride_max_mgkg;
        accepts_tph && accepts_chloride
    }

    /// Full eligibility: contaminant limits plus backfill availability
    pub fn is_eligible(&self, tph_mgkg: f64, chloride_mgkg: f64, needs_backfill: bool) -> bool {
        self.accepts(tph_mgkg, chloride_mgkg) && (!needs_backfill || self.backfill_available)
    }
}

/// Treatment facility that processes soil and returns it clean
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentFacilityRecord {
    pub facility_name: String,
    pub coordinate: Coordinate,
    pub processing_cost_cy: f64,
    pub typical_turnaround_days: u32,
}

/// A facility together with its distance from the query origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacilityMatch<'a, T> {
    pub facility: &'a T,
    pub distance_miles: f64,
}

impl FacilityMatch<'_, LandfillRecord> {
    pub fn summary(&self) -> FacilitySummary {
        FacilitySummary {
            name: self.facility.display_name(),
            distance_miles: self.distance_miles,
        }
    }
}

impl FacilityMatch<'_, TreatmentFacilityRecord> {
    pub fn summary(&self) -> FacilitySummary {
        FacilitySummary {
            name: self.facility.facility_name.clone(),
            distance_miles: self.distance_miles,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacilityRegistry {
    landfills: Vec<LandfillRecord>,
    treatment_facilities: Vec<TreatmentFacilityRecord>,
}

impl FacilityRegistry {
    pub fn new(
        landfills: Vec<LandfillRecord>,
        treatment_facilities: Vec<TreatmentFacilityRecord>,
    ) -> Self {
        Self {
            landfills,
            treatment_facilities,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn landfills(&self) -> &[LandfillRecord] {
        &self.landfills
    }

    pub fn treatment_facilities(&self) -> &[TreatmentFacilityRecord] {
        &self.treatment_facilities
    }

    /// Nearest landfill that accepts the site's contamination and, when
    /// required, sells backfill. `None` when nothing qualifies.
    pub fn nearest_eligible_landfill(
        &self,
        origin: &Coordinate,
        tph_mgkg: f64,
        chloride_mgkg: f64,
        needs_backfill: bool,
    ) -> Option<FacilityMatch<'_, LandfillRecord>> {
        let nearest = nearest_by_distance(
            origin,
            self.landfills
                .iter()
                .filter(|lf| lf.is_eligible(tph_mgkg, chloride_mgkg, needs_backfill)),
            |lf| &lf.coordinate,
        );

        if nearest.is_none() {
            debug!(
                "No landfill qualifies for TPH={} chloride={} backfill={}",
                tph_mgkg, chloride_mgkg, needs_backfill
            );
        }
        nearest
    }

    /// Nearest treatment facility. Treatment facilities accept any input.
    pub fn nearest_treatment_facility(
        &self,
        origin: &Coordinate,
    ) -> Option<FacilityMatch<'_, TreatmentFacilityRecord>> {
        nearest_by_distance(origin, self.treatment_facilities.iter(), |f| &f.coordinate)
    }

    /// Distance to the nearest qualified disposal site, for display
    pub fn nearest_qualified_disposal_distance(
        &self,
        origin: &Coordinate,
        tph_mgkg: f64,
        chloride_mgkg: f64,
        needs_backfill: bool,
    ) -> Option<f64> {
        self.nearest_eligible_landfill(origin, tph_mgkg, chloride_mgkg, needs_backfill)
            .map(|m| m.distance_miles)
    }
}

/// Minimum-distance pick; equal distances keep the earlier candidate
fn nearest_by_distance<'a, T, I, F>(
    origin: &Coordinate,
    candidates: I,
    coordinate: F,
) -> Option<FacilityMatch<'a, T>>
where
    I: Iterator<Item = &'a T>,
    F: Fn(&T) -> &Coordinate,
{
    let mut best: Option<FacilityMatch<'a, T>> = None;

    for facility in candidates {
        let distance_miles = haversine_miles(origin, coordinate(facility));
        let closer = best.as_ref().map_or(true, |b| distance_miles < b.distance_miles);
        if closer {
            best = Some(FacilityMatch {
                facility,
                distance_miles,
            });
        }
    }

    best
}
