//! Analysis pipeline: site → region profile + facility matching →
//! strategy simulation → recommendation.

use crate::region::{classify, RegionInfo};
use crate::scorer::{recommend, ScoringConfig};
use crate::{
    FacilityRegistry, FacilitySummary, OperationalParams, Recommendation, RemediationError, Result,
    SiteInput, StrategyEstimate, StrategyKind,
};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Full result of one analysis
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub site: SiteInput,
    pub volume_cy: f64,
    pub region: RegionInfo,
    /// Nearest landfill that would take this soil, for display
    pub nearest_disposal: Option<FacilitySummary>,
    pub params: OperationalParams,
    /// Strategies that could be evaluated, in evaluation order
    pub estimates: Vec<StrategyEstimate>,
    /// `None` when no strategy could be evaluated
    pub recommendation: Option<Recommendation>,
    pub generated_at: String,
}

impl Analysis {
    pub fn estimate(&self, kind: StrategyKind) -> Option<&StrategyEstimate> {
        self.estimates.iter().find(|e| e.kind == kind)
    }

    pub fn recommended_estimate(&self) -> Option<&StrategyEstimate> {
        self.recommendation
            .as_ref()
            .and_then(|rec| self.estimate(rec.recommended))
    }
}

/// Run every strategy for `site` against `registry` and rank the results
pub fn analyze(
    site: &SiteInput,
    registry: &FacilityRegistry,
    config: &ScoringConfig,
) -> Result<Analysis> {
    let volume_cy = site.volume_cy();
    if !(volume_cy.is_finite() && volume_cy > 0.0) {
        return Err(RemediationError::NonPositiveVolume(volume_cy));
    }

    let params = OperationalParams::resolve(&site.overrides)?;
    let region = classify(&site.coordinate, site.tph_mgkg, registry);
    debug!(
        "Site in {} / {} county, {}",
        region.jurisdiction.name(),
        region.county,
        region.soil_type
    );

    let nearest_disposal = registry
        .nearest_eligible_landfill(
            &site.coordinate,
            site.tph_mgkg,
            site.chloride_mgkg,
            site.needs_backfill,
        )
        .map(|m| m.summary());

    let mut estimates = Vec::with_capacity(StrategyKind::ALL.len());
    for kind in StrategyKind::ALL {
        match kind.simulate(site, volume_cy, registry, &params) {
            Some(estimate) => {
                debug!(
                    "{}: ${:.0} (${:.2}/CY), {} days, {:.2} t CO2",
                    kind.display_name(),
                    estimate.total_cost,
                    estimate.cost_per_cy,
                    estimate.project_days,
                    estimate.co2_tons
                );
                estimates.push(estimate);
            }
            None => info!("{} not available: no suitable facility", kind.display_name()),
        }
    }

    let recommendation = recommend(&estimates, &site.priorities, config);
    if recommendation.is_none() {
        warn!("No remediation strategy could be evaluated for this site");
    }

    Ok(Analysis {
        site: site.clone(),
        volume_cy,
        region,
        nearest_disposal,
        params,
        estimates,
        recommendation,
        generated_at: chrono::Utc::now().to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::tests::{make_landfill, permian_registry};
    use crate::region::ThresholdStatus;
    use crate::{Coordinate, OperationalOverrides, Permeability, Priorities, PriorityLevel};

    fn scenario_site() -> SiteInput {
        SiteInput {
            coordinate: Coordinate::new(31.9, -102.0),
            tph_mgkg: 1000.0,
            chloride_mgkg: 5000.0,
            surface_area_sqft: 5000.0,
            depth_ft: 5.0,
            needs_backfill: true,
            permeability: Permeability::Medium,
            priorities: Priorities::default(),
            overrides: OperationalOverrides::default(),
        }
    }

    #[test]
    fn test_scenario_all_strategies_medium_priorities() {
        let analysis =
            analyze(&scenario_site(), &permian_registry(), &ScoringConfig::default()).unwrap();

        assert!((analysis.volume_cy - 925.925925926).abs() < 1e-6);
        assert_eq!(analysis.estimates.len(), 3);
        let rec = analysis.recommendation.as_ref().unwrap();
        assert_eq!(rec.scores.len(), 3);
        for kind in StrategyKind::ALL {
            assert!(rec.scores.contains_key(&kind));
            let estimate = analysis.estimate(kind).unwrap();
            assert!((estimate.breakdown_total() - estimate.total_cost).abs() < 1e-6);
        }
        assert!(analysis.recommended_estimate().is_some());
        assert_eq!(
            analysis.nearest_disposal.as_ref().unwrap().name,
            "Permian Disposal - Midland East"
        );
        assert_eq!(analysis.region.county, "Midland");
        // 1000 mg/kg in Texas is over the 500 mg/kg industrial level
        assert_eq!(analysis.region.tph_status, ThresholdStatus::ExceedsIndustrial);
    }

    #[test]
    fn test_scenario_sustainability_high() {
        let mut site = scenario_site();
        site.priorities = Priorities {
            cost: PriorityLevel::Low,
            speed: PriorityLevel::Low,
            sustainability: PriorityLevel::High,
        };
        let analysis = analyze(&site, &permian_registry(), &ScoringConfig::default()).unwrap();
        let rec = analysis.recommendation.as_ref().unwrap();

        let min_co2 = analysis
            .estimates
            .iter()
            .map(|e| e.co2_tons)
            .fold(f64::INFINITY, f64::min);
        let winner = analysis.recommended_estimate().unwrap();
        assert!(winner.kind.is_treatment() || winner.co2_tons == min_co2);
        // Onsite burns the least fuel here and also gets the treatment bonus
        assert_eq!(rec.recommended, StrategyKind::Onsite);

        // Bonus applies to treatment strategies only
        let haul = rec.scores[&StrategyKind::Haul];
        let haul_co2 = analysis.estimate(StrategyKind::Haul).unwrap().co2_tons;
        assert!((haul - 30.0 * (1.0 - (haul_co2 - min_co2) / min_co2)).abs() < 1e-9);
        let onsite = rec.scores[&StrategyKind::Onsite];
        assert!((onsite - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_bonus_without_high_sustainability() {
        let mut site = scenario_site();
        site.priorities = Priorities {
            cost: PriorityLevel::Low,
            speed: PriorityLevel::Low,
            sustainability: PriorityLevel::Medium,
        };
        let analysis = analyze(&site, &permian_registry(), &ScoringConfig::default()).unwrap();
        let rec = analysis.recommendation.unwrap();
        assert!((rec.scores[&StrategyKind::Onsite] - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_scenario_no_landfill_accepts_tph() {
        let mut site = scenario_site();
        site.tph_mgkg = 99999.0;
        let analysis = analyze(&site, &permian_registry(), &ScoringConfig::default()).unwrap();

        assert!(analysis.estimate(StrategyKind::Haul).is_none());
        assert!(analysis.estimate(StrategyKind::Onsite).is_some());
        assert!(analysis.estimate(StrategyKind::Surface).is_some());
        assert!(analysis.nearest_disposal.is_none());
        let rec = analysis.recommendation.unwrap();
        assert!(!rec.scores.contains_key(&StrategyKind::Haul));
        assert_eq!(rec.scores.len(), 2);
    }

    #[test]
    fn test_scenario_no_treatment_facilities() {
        let registry = FacilityRegistry::new(
            vec![make_landfill("Midland East", "Midland", 31.95, -101.95, 5000.0, 10000.0, true)],
            vec![],
        );
        let analysis = analyze(&scenario_site(), &registry, &ScoringConfig::default()).unwrap();

        assert!(analysis.estimate(StrategyKind::Surface).is_none());
        assert!(analysis.estimate(StrategyKind::Haul).is_some());
        assert!(analysis.estimate(StrategyKind::Onsite).is_some());
        assert_eq!(analysis.recommendation.unwrap().scores.len(), 2);
    }

    #[test]
    fn test_empty_registry_still_recommends_onsite() {
        let analysis = analyze(
            &scenario_site(),
            &FacilityRegistry::empty(),
            &ScoringConfig::default(),
        )
        .unwrap();
        assert_eq!(analysis.estimates.len(), 1);
        assert_eq!(analysis.recommendation.unwrap().recommended, StrategyKind::Onsite);
        assert_eq!(analysis.region.county, "Unknown");
    }

    #[test]
    fn test_rejects_non_positive_volume() {
        let mut site = scenario_site();
        site.depth_ft = 0.0;
        let err = analyze(&site, &permian_registry(), &ScoringConfig::default()).unwrap_err();
        assert!(matches!(err, RemediationError::NonPositiveVolume(v) if v == 0.0));

        site.depth_ft = -2.0;
        assert!(analyze(&site, &permian_registry(), &ScoringConfig::default()).is_err());
    }

    #[test]
    fn test_rejects_degenerate_overrides() {
        let registry = permian_registry();
        let config = ScoringConfig::default();

        let mut site = scenario_site();
        site.overrides.num_trucks = Some(0);
        let err = analyze(&site, &registry, &config).unwrap_err();
        assert!(matches!(err, RemediationError::InvalidOverride("num_trucks", _)));

        let mut site = scenario_site();
        site.overrides.work_hours_per_day = Some(0.0);
        let err = analyze(&site, &registry, &config).unwrap_err();
        assert!(matches!(err, RemediationError::InvalidOverride("work_hours_per_day", _)));

        let mut site = scenario_site();
        site.overrides.truck_capacity_cy = Some(-18.0);
        let err = analyze(&site, &registry, &config).unwrap_err();
        assert!(matches!(
            err,
            RemediationError::InvalidOverride("truck_capacity_cy", v) if v == -18.0
        ));
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let registry = permian_registry();
        let config = ScoringConfig::default();
        let a = analyze(&scenario_site(), &registry, &config).unwrap();
        let b = analyze(&scenario_site(), &registry, &config).unwrap();
        assert_eq!(a.estimates, b.estimates);
        assert_eq!(a.recommendation, b.recommendation);
    }

    #[test]
    fn test_analysis_serializes() {
        let analysis =
            analyze(&scenario_site(), &permian_registry(), &ScoringConfig::default()).unwrap();
        let json = serde_json::to_value(&analysis).unwrap();
        assert!(json["recommendation"]["scores"]["onsite"].is_number());
        assert_eq!(json["region"]["jurisdiction"], "Texas");
        assert_eq!(json["region"]["tph_status"], "ExceedsIndustrial");
        assert_eq!(json["estimates"].as_array().unwrap().len(), 3);
    }
}
