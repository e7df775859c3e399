//! Data loading from JSON files

use crate::{
    Coordinate, FacilityRegistry, LandfillRecord, RemediationError, Result, SiteInput,
    TreatmentFacilityRecord,
};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

/// Validate latitude is in valid range
fn is_valid_latitude(lat: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && lat.is_finite()
}

/// Validate longitude is in valid range
fn is_valid_longitude(lon: f64) -> bool {
    (-180.0..=180.0).contains(&lon) && lon.is_finite()
}

fn coordinate(latitude: Option<f64>, longitude: Option<f64>) -> Option<Coordinate> {
    match (latitude, longitude) {
        (Some(lat), Some(lon)) if is_valid_latitude(lat) && is_valid_longitude(lon) => {
            Some(Coordinate::new(lat, lon))
        }
        _ => None,
    }
}

/// Raw landfill from JSON
#[derive(Debug, Deserialize)]
struct RawLandfill {
    company: Option<String>,
    site_name: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    county: Option<String>,
    disposal_cost_cy: Option<f64>,
    backfill_cost_cy: Option<f64>,
    backfill_available: Option<bool>,
    tph_max_mgkg: Option<f64>,
    chloride_max_mgkg: Option<f64>,
}

impl RawLandfill {
    fn into_record(self, index: usize) -> Option<LandfillRecord> {
        let coordinate = coordinate(self.latitude, self.longitude)?;
        Some(LandfillRecord {
            company: self.company.unwrap_or_else(|| "Unknown".to_string()),
            site_name: self.site_name.unwrap_or_else(|| format!("landfill-{}", index)),
            coordinate,
            county: self.county.unwrap_or_else(|| "Unknown".to_string()),
            disposal_cost_cy: self.disposal_cost_cy?,
            // Landfills without backfill usually omit the price
            backfill_cost_cy: self.backfill_cost_cy.unwrap_or(0.0),
            backfill_available: self.backfill_available.unwrap_or(false),
            tph_max_mgkg: self.tph_max_mgkg?,
            chloride_max_mgkg: self.chloride_max_mgkg?,
        })
    }
}

/// Raw treatment facility from JSON
#[derive(Debug, Deserialize)]
struct RawTreatmentFacility {
    facility_name: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    processing_cost_cy: Option<f64>,
    typical_turnaround_days: Option<u32>,
}

impl RawTreatmentFacility {
    fn into_record(self, index: usize) -> Option<TreatmentFacilityRecord> {
        let coordinate = coordinate(self.latitude, self.longitude)?;
        Some(TreatmentFacilityRecord {
            facility_name: self
                .facility_name
                .unwrap_or_else(|| format!("facility-{}", index)),
            coordinate,
            processing_cost_cy: self.processing_cost_cy?,
            typical_turnaround_days: self.typical_turnaround_days?,
        })
    }
}

/// Container for the facility database JSON
#[derive(Debug, Deserialize)]
struct FacilityDatabaseFile {
    #[serde(default)]
    landfills: Vec<RawLandfill>,
    #[serde(default, alias = "clean_futures_facilities")]
    treatment_facilities: Vec<RawTreatmentFacility>,
}

/// Build a registry from the facility database JSON text
pub fn parse_registry(json: &str) -> Result<FacilityRegistry> {
    let raw: serde_json::Value = serde_json::from_str(json)?;
    if !raw.is_object() {
        return Err(RemediationError::InvalidFacilityDatabase(
            "expected an object with landfill and treatment facility lists".to_string(),
        ));
    }
    let file: FacilityDatabaseFile = serde_json::from_value(raw)?;

    let total_landfills = file.landfills.len();
    let landfills: Vec<LandfillRecord> = file
        .landfills
        .into_iter()
        .enumerate()
        .filter_map(|(i, lf)| lf.into_record(i))
        .collect();

    let total_facilities = file.treatment_facilities.len();
    let treatment: Vec<TreatmentFacilityRecord> = file
        .treatment_facilities
        .into_iter()
        .enumerate()
        .filter_map(|(i, f)| f.into_record(i))
        .collect();

    info!(
        "Loaded {} landfills ({} skipped), {} treatment facilities ({} skipped)",
        landfills.len(),
        total_landfills - landfills.len(),
        treatment.len(),
        total_facilities - treatment.len()
    );

    Ok(FacilityRegistry::new(landfills, treatment))
}

/// Load the facility database from a JSON file
pub fn load_registry(path: impl AsRef<Path>) -> Result<FacilityRegistry> {
    let path = path.as_ref();
    info!("Loading facility database from {:?}", path);
    let json = std::fs::read_to_string(path)?;
    parse_registry(&json)
}

/// Load an analysis request from a JSON file
pub fn load_site(path: impl AsRef<Path>) -> Result<SiteInput> {
    let path = path.as_ref();
    debug!("Loading site request from {:?}", path);

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let site: SiteInput = serde_json::from_reader(reader)?;
    Ok(site)
}
