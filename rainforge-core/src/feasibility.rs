use rainforge_schemas::{
    climate::ClimateProfile,
    feasibility::{Criterion, FeasibilityAdvice, FeasibilityScore, FeasibilityTier},
    property::{PropertyProfile, UsageProfile},
    soil::SoilProfile,
    tuning::{BandDirection, BandedCriterion, FeasibilityRubric, SoilCriterion, TierThresholds},
};
use std::collections::BTreeMap;

pub fn score(
    climate: &ClimateProfile,
    property: &PropertyProfile,
    soil: &SoilProfile,
    usage: &UsageProfile,
    rubric: &FeasibilityRubric,
) -> FeasibilityScore {
    let monthly_demand = usage.daily_consumption_liters * rubric.demand_days_per_month;

    let component_scores: BTreeMap<Criterion, u32> = [
        (Criterion::Rainfall, banded(climate.annual_rainfall_mm, &rubric.rainfall)),
        (Criterion::RoofArea, banded(property.roof_area_sqft, &rubric.roof_area)),
        (Criterion::SoilSuitability, soil_points(&soil.soil_type, &rubric.soil_suitability)),
        (Criterion::WaterDemand, banded(monthly_demand, &rubric.water_demand)),
    ]
    .into_iter()
    .collect();
    let component_caps = caps(rubric);

    let total_score: u32 = component_scores.values().sum();
    let level = tier(total_score, &rubric.tiers);

    FeasibilityScore {
        component_scores,
        component_caps,
        total_score,
        max_score: rubric.caps_total(),
        feasibility_level: level,
        recommendation: level.recommendation().to_string(),
    }
}

/// Interpretation of a score plus one suggestion per weak criterion.
pub fn advice(score: &FeasibilityScore, rubric: &FeasibilityRubric) -> FeasibilityAdvice {
    let mut improvement_suggestions: Vec<String> = score
        .component_scores
        .iter()
        .filter(|(criterion, points)| {
            let cap = score.component_caps.get(*criterion).copied().unwrap_or(0) as f64;
            (**points as f64) < cap * rubric.improvement_threshold_fraction
        })
        .map(|(criterion, _)| improvement_for(*criterion).to_string())
        .collect();
    if improvement_suggestions.is_empty() {
        improvement_suggestions.push("Excellent conditions - proceed with confidence".to_string());
    }
    FeasibilityAdvice {
        score_interpretation: score.feasibility_level,
        key_recommendations: score.recommendation.clone(),
        improvement_suggestions,
    }
}

fn improvement_for(criterion: Criterion) -> &'static str {
    match criterion {
        Criterion::Rainfall => "Consider water-efficient appliances to maximize limited rainfall",
        Criterion::RoofArea => "Explore community or neighborhood-level harvesting",
        Criterion::SoilSuitability => "Focus on storage systems rather than recharge",
        Criterion::WaterDemand => "Implement water conservation measures before RTRWH",
    }
}

fn caps(rubric: &FeasibilityRubric) -> BTreeMap<Criterion, u32> {
    [
        (Criterion::Rainfall, rubric.rainfall.cap),
        (Criterion::RoofArea, rubric.roof_area.cap),
        (Criterion::SoilSuitability, rubric.soil_suitability.cap),
        (Criterion::WaterDemand, rubric.water_demand.cap),
    ]
    .into_iter()
    .collect()
}

/// First band the value qualifies for, else the floor. Bands are ordered
/// best-first.
fn banded(value: f64, criterion: &BandedCriterion) -> u32 {
    let points = criterion
        .bands
        .iter()
        .find(|b| match criterion.direction {
            BandDirection::AtLeast => value >= b.threshold,
            BandDirection::AtMost => value <= b.threshold,
        })
        .map_or(criterion.floor_points, |b| b.points);
    points.min(criterion.cap)
}

fn soil_points(soil_type: &str, criterion: &SoilCriterion) -> u32 {
    let soil = soil_type.to_lowercase();
    criterion
        .matches
        .iter()
        .find(|m| soil.contains(&m.soil_match.to_lowercase()))
        .map_or(criterion.default_points, |m| m.points)
        .min(criterion.cap)
}

/// Integer comparison, so a score is never nudged over a boundary.
fn tier(total: u32, thresholds: &TierThresholds) -> FeasibilityTier {
    if total >= thresholds.highly_feasible {
        FeasibilityTier::HighlyFeasible
    } else if total >= thresholds.feasible {
        FeasibilityTier::Feasible
    } else if total >= thresholds.moderately_feasible {
        FeasibilityTier::ModeratelyFeasible
    } else {
        FeasibilityTier::LimitedFeasibility
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge_base::KnowledgeBase;
    use crate::resolver::sources::SoilZoneTable;
    use rainforge_schemas::climate::{MonthlySeries, Provenance};
    use rainforge_schemas::environment::Coordinates;
    use rainforge_schemas::property::RoofMaterial;
    use rstest::rstest;
    use std::sync::Arc;

    fn climate(annual_mm: f64) -> ClimateProfile {
        ClimateProfile::from_monthly(
            MonthlySeries::from_fn(|_| annual_mm / 12.0),
            Provenance::Fallback,
            "flat",
        )
    }

    fn property(sqft: f64) -> PropertyProfile {
        PropertyProfile {
            property_type: "residential".into(),
            roof_area_sqft: sqft,
            roof_material: RoofMaterial::Concrete,
            floors: 1,
            plot_area_sqft: None,
        }
    }

    fn usage(household: u32) -> UsageProfile {
        UsageProfile {
            household_size: household,
            daily_consumption_liters: household as f64 * 150.0,
            current_sources: Default::default(),
            intended_use: Default::default(),
        }
    }

    fn soil_at(kb: &Arc<KnowledgeBase>, lat: f64, lng: f64) -> SoilProfile {
        SoilZoneTable::new(kb.clone()).locate(&Coordinates::new(lat, lng)).unwrap()
    }

    #[test]
    fn delhi_reference_is_highly_feasible() {
        let kb = Arc::new(KnowledgeBase::builtin().unwrap());
        let rubric = &kb.tuning().feasibility;
        let s = score(
            &climate(797.0),
            &property(1200.0),
            &soil_at(&kb, 28.6139, 77.2090),
            &usage(4),
            rubric,
        );
        assert_eq!(s.component_scores[&Criterion::Rainfall], 16);
        assert_eq!(s.component_scores[&Criterion::RoofArea], 20);
        assert_eq!(s.component_scores[&Criterion::SoilSuitability], 25);
        assert_eq!(s.component_scores[&Criterion::WaterDemand], 24);
        assert_eq!(s.total_score, 85);
        assert_eq!(s.max_score, 100);
        assert_eq!(s.feasibility_level, FeasibilityTier::HighlyFeasible);

        let a = advice(&s, rubric);
        assert_eq!(
            a.improvement_suggestions,
            vec!["Excellent conditions - proceed with confidence"]
        );
    }

    #[rstest]
    #[case(1500.0, 20)]
    #[case(1200.0, 20)]
    #[case(1199.9, 18)]
    #[case(750.0, 16)]
    #[case(299.0, 4)]
    #[case(0.0, 4)]
    fn rainfall_bands(#[case] mm: f64, #[case] expected: u32) {
        let kb = KnowledgeBase::builtin().unwrap();
        assert_eq!(banded(mm, &kb.tuning().feasibility.rainfall), expected);
    }

    #[rstest]
    #[case(1, 30)]
    #[case(2, 30)]
    #[case(4, 24)]
    #[case(6, 18)]
    #[case(12, 12)]
    fn demand_bands_reward_small_households(#[case] household: u32, #[case] expected: u32) {
        let kb = KnowledgeBase::builtin().unwrap();
        let f = &kb.tuning().feasibility;
        let monthly = household as f64 * 150.0 * f.demand_days_per_month;
        assert_eq!(banded(monthly, &f.water_demand), expected);
    }

    #[rstest]
    #[case(80, FeasibilityTier::HighlyFeasible)]
    #[case(79, FeasibilityTier::Feasible)]
    #[case(60, FeasibilityTier::Feasible)]
    #[case(59, FeasibilityTier::ModeratelyFeasible)]
    #[case(40, FeasibilityTier::ModeratelyFeasible)]
    #[case(39, FeasibilityTier::LimitedFeasibility)]
    fn tier_boundaries(#[case] total: u32, #[case] expected: FeasibilityTier) {
        let kb = KnowledgeBase::builtin().unwrap();
        assert_eq!(tier(total, &kb.tuning().feasibility.tiers), expected);
    }

    #[test]
    fn weak_site_gets_targeted_suggestions_and_stays_in_range() {
        let kb = Arc::new(KnowledgeBase::builtin().unwrap());
        let rubric = &kb.tuning().feasibility;
        let s = score(
            &climate(200.0),
            &property(150.0),
            &soil_at(&kb, 34.0, 75.0),
            &usage(12),
            rubric,
        );
        assert_eq!(s.total_score, s.component_scores.values().sum::<u32>());
        assert!(s.total_score <= 100);
        assert_eq!(s.feasibility_level, FeasibilityTier::LimitedFeasibility);
        for (criterion, points) in &s.component_scores {
            assert!(*points <= s.component_caps[criterion]);
        }
        let a = advice(&s, rubric);
        assert_eq!(a.improvement_suggestions.len(), 4);
    }
}
