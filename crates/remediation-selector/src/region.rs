//! Site region profile: jurisdiction, county, soil type and regulatory
//! thresholds derived from a coordinate.
//!
//! All classifications are coarse longitude cuts over the Permian Basin,
//! not polygon lookups.

use crate::{haversine_miles, Coordinate, FacilityRegistry};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Texas / New Mexico split (degrees longitude, 9 decimal precision)
pub const STATE_BOUNDARY_LON: f64 = -103.000000000;

/// Soil band edges (degrees longitude, 9 decimal precision)
pub const EASTERN_SOIL_LON: f64 = -102.000000000;
pub const CENTRAL_SOIL_LON: f64 = -103.500000000;

pub const UNKNOWN_COUNTY: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Jurisdiction {
    Texas,
    NewMexico,
}

impl Jurisdiction {
    /// Assign jurisdiction based on longitude
    pub fn from_longitude(lon: f64) -> Self {
        if lon > STATE_BOUNDARY_LON {
            Jurisdiction::Texas
        } else {
            Jurisdiction::NewMexico
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Jurisdiction::Texas => "Texas",
            Jurisdiction::NewMexico => "New Mexico",
        }
    }

    /// Soil cleanup screening levels (TCEQ PCLs / NMED SSLs)
    pub fn thresholds(&self) -> RegulatoryThresholds {
        match self {
            Jurisdiction::Texas => RegulatoryThresholds {
                tph_residential_mgkg: 100.0,
                tph_industrial_mgkg: 500.0,
                chloride_guidance: "Not directly regulated in soil; groundwater standard: 300 mg/L",
                regulatory_agency: "TCEQ (Texas Commission on Environmental Quality)",
                notes: "Risk-based, site-specific cleanup levels may vary",
            },
            Jurisdiction::NewMexico => RegulatoryThresholds {
                tph_residential_mgkg: 100.0,
                tph_industrial_mgkg: 1000.0,
                chloride_guidance: "Not directly regulated in soil; groundwater standard: 250 mg/L",
                regulatory_agency: "NMED (New Mexico Environment Department)",
                notes: "Risk-based corrective action (RBCA) standards apply",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThresholdStatus {
    BelowIndustrial,
    ExceedsIndustrial,
}

impl ThresholdStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ThresholdStatus::BelowIndustrial => "Below industrial threshold",
            ThresholdStatus::ExceedsIndustrial => "Exceeds industrial threshold",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegulatoryThresholds {
    pub tph_residential_mgkg: f64,
    pub tph_industrial_mgkg: f64,
    pub chloride_guidance: &'static str,
    pub regulatory_agency: &'static str,
    pub notes: &'static str,
}

impl RegulatoryThresholds {
    pub fn tph_status(&self, tph_mgkg: f64) -> ThresholdStatus {
        if tph_mgkg < self.tph_industrial_mgkg {
            ThresholdStatus::BelowIndustrial
        } else {
            ThresholdStatus::ExceedsIndustrial
        }
    }
}

/// Estimated surface soil class. East of the basin is more clay-rich,
/// the west is sandier.
pub fn soil_type(coordinate: &Coordinate) -> &'static str {
    if coordinate.longitude > EASTERN_SOIL_LON {
        "Clay Loam / Silty Clay"
    } else if coordinate.longitude > CENTRAL_SOIL_LON {
        "Sandy Clay Loam / Caliche"
    } else {
        "Sandy Loam / Desert Soils"
    }
}

/// Nearest county, using the first landfill listed in each county as that
/// county's representative point.
pub fn nearest_county(coordinate: &Coordinate, registry: &FacilityRegistry) -> String {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut best: Option<(&str, f64)> = None;

    for lf in registry.landfills() {
        if !seen.insert(lf.county.as_str()) {
            continue;
        }
        let distance = haversine_miles(coordinate, &lf.coordinate);
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((lf.county.as_str(), distance));
        }
    }

    best.map(|(county, _)| county.to_string())
        .unwrap_or_else(|| UNKNOWN_COUNTY.to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionInfo {
    pub jurisdiction: Jurisdiction,
    pub county: String,
    pub soil_type: &'static str,
    pub thresholds: RegulatoryThresholds,
    /// Site TPH against the jurisdiction's industrial level
    pub tph_status: ThresholdStatus,
}

pub fn classify(coordinate: &Coordinate, tph_mgkg: f64, registry: &FacilityRegistry) -> RegionInfo {
    let jurisdiction = Jurisdiction::from_longitude(coordinate.longitude);
    let thresholds = jurisdiction.thresholds();
    RegionInfo {
        jurisdiction,
        county: nearest_county(coordinate, registry),
        soil_type: soil_type(coordinate),
        tph_status: thresholds.tph_status(tph_mgkg),
        thresholds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::tests::{make_landfill, permian_registry};

    #[test]
    fn test_jurisdiction_from_longitude() {
        assert_eq!(Jurisdiction::from_longitude(-102.0), Jurisdiction::Texas); // Midland
        assert_eq!(Jurisdiction::from_longitude(-104.2), Jurisdiction::NewMexico); // Carlsbad
        // The meridian itself belongs to New Mexico
        assert_eq!(Jurisdiction::from_longitude(-103.0), Jurisdiction::NewMexico);
    }

    #[test]
    fn test_soil_bands() {
        assert_eq!(soil_type(&Coordinate::new(32.0, -101.5)), "Clay Loam / Silty Clay");
        assert_eq!(soil_type(&Coordinate::new(32.0, -102.0)), "Sandy Clay Loam / Caliche");
        assert_eq!(soil_type(&Coordinate::new(32.0, -103.0)), "Sandy Clay Loam / Caliche");
        assert_eq!(soil_type(&Coordinate::new(32.0, -103.5)), "Sandy Loam / Desert Soils");
        assert_eq!(soil_type(&Coordinate::new(32.0, -104.5)), "Sandy Loam / Desert Soils");
    }

    #[test]
    fn test_thresholds_by_jurisdiction() {
        let tx = Jurisdiction::Texas.thresholds();
        let nm = Jurisdiction::NewMexico.thresholds();
        assert_eq!(tx.tph_industrial_mgkg, 500.0);
        assert_eq!(nm.tph_industrial_mgkg, 1000.0);
        assert_eq!(tx.tph_residential_mgkg, nm.tph_residential_mgkg);
        assert!(tx.regulatory_agency.starts_with("TCEQ"));
        assert!(nm.regulatory_agency.starts_with("NMED"));
    }

    #[test]
    fn test_tph_status() {
        let tx = Jurisdiction::Texas.thresholds();
        assert_eq!(tx.tph_status(499.0), ThresholdStatus::BelowIndustrial);
        assert_eq!(tx.tph_status(500.0), ThresholdStatus::ExceedsIndustrial);
        assert_eq!(
            Jurisdiction::NewMexico.thresholds().tph_status(800.0),
            ThresholdStatus::BelowIndustrial
        );
        assert_eq!(ThresholdStatus::ExceedsIndustrial.label(), "Exceeds industrial threshold");
    }

    #[test]
    fn test_classify_carries_tph_status() {
        let registry = permian_registry();
        let site = Coordinate::new(31.9, -102.0);
        // Same TPH, different verdict on each side of the state line
        let tx = classify(&site, 800.0, &registry);
        assert_eq!(tx.jurisdiction, Jurisdiction::Texas);
        assert_eq!(tx.tph_status, ThresholdStatus::ExceedsIndustrial);

        let nm = classify(&Coordinate::new(32.4, -104.0), 800.0, &registry);
        assert_eq!(nm.tph_status, ThresholdStatus::BelowIndustrial);
    }

    #[test]
    fn test_nearest_county() {
        let registry = permian_registry();
        assert_eq!(nearest_county(&Coordinate::new(31.9, -102.35), &registry), "Ector");
        assert_eq!(nearest_county(&Coordinate::new(31.4, -103.4), &registry), "Reeves");
    }

    #[test]
    fn test_nearest_county_uses_first_landfill_per_county() {
        // The second Midland landfill sits right on the site but Midland is
        // represented by the first one, far to the east.
        let registry = FacilityRegistry::new(
            vec![
                make_landfill("Far", "Midland", 32.0, -101.0, 1.0, 1.0, true),
                make_landfill("Ector", "Ector", 31.9, -102.4, 1.0, 1.0, true),
                make_landfill("Near", "Midland", 31.9, -102.8, 1.0, 1.0, true),
            ],
            vec![],
        );
        assert_eq!(nearest_county(&Coordinate::new(31.9, -102.8), &registry), "Ector");
    }

    #[test]
    fn test_classify_empty_registry() {
        let info = classify(&Coordinate::new(32.3, -104.0), 800.0, &FacilityRegistry::empty());
        assert_eq!(info.county, UNKNOWN_COUNTY);
        assert_eq!(info.tph_status, ThresholdStatus::BelowIndustrial);
        assert_eq!(info.jurisdiction, Jurisdiction::NewMexico);
        assert_eq!(info.thresholds.tph_industrial_mgkg, 1000.0);
        assert_eq!(info.soil_type, "Sandy Loam / Desert Soils");
    }
}
