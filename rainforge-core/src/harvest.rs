use rainforge_schemas::{
    climate::{ClimateProfile, Month},
    potential::{HarvestingPotential, PeakRunoff, StorageRecommendation},
    property::{PropertyProfile, SystemType},
    tuning::EngineTuning,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Monthly and annual collectible volume for a roof under a climate.
///
/// One millimetre of rain on one square metre is one liter. Each month is
/// rounded to whole liters and the annual figure is the sum of those rounded
/// months.
pub fn compute(
    property: &PropertyProfile,
    system_type: SystemType,
    climate: &ClimateProfile,
    tuning: &EngineTuning,
) -> HarvestingPotential {
    let h = &tuning.harvest;
    let roof_area_sqm = property.roof_area_sqft * h.sqft_to_sqm;
    let runoff_coefficient = h.material_factors.for_material(property.roof_material);
    let system_efficiency = h.system_efficiency.for_system(system_type);
    let collection_efficiency = (system_efficiency * runoff_coefficient).clamp(0.0, 1.0);

    let monthly_potential: BTreeMap<Month, u64> = Month::ALL
        .iter()
        .map(|&m| {
            let liters =
                roof_area_sqm * climate.monthly_distribution.get(m) * collection_efficiency;
            (m, liters.round().max(0.0) as u64)
        })
        .collect();
    let annual_harvestable_liters = monthly_potential
        .values()
        .fold(0u64, |total, liters| total.saturating_add(*liters));

    let (peak_month, peak_monthly_liters) = monthly_potential
        .iter()
        .fold((Month::Jan, 0u64), |best, (m, v)| if *v > best.1 { (*m, *v) } else { best });
    let estimated_peak_daily_liters =
        (peak_monthly_liters as f64 * h.peak_day_fraction).round() as u64;

    let storage_recommendations = size_storage(
        annual_harvestable_liters,
        peak_monthly_liters,
        tuning,
    );
    debug!(
        annual = annual_harvestable_liters,
        optimal = storage_recommendations.optimal_liters,
        "Computed harvesting potential"
    );

    HarvestingPotential {
        roof_area_sqft: property.roof_area_sqft,
        roof_area_sqm: (roof_area_sqm * 100.0).round() / 100.0,
        runoff_coefficient,
        system_efficiency,
        collection_efficiency,
        monthly_potential,
        annual_harvestable_liters,
        peak_runoff: PeakRunoff {
            peak_month,
            peak_monthly_liters,
            estimated_peak_daily_liters,
        },
        storage_recommendations,
    }
}

/// `optimal` blends the monthly average with the wettest month and is then
/// clamped into `[minimum, maximum]`.
fn size_storage(annual: u64, peak_month: u64, tuning: &EngineTuning) -> StorageRecommendation {
    let s = &tuning.storage;
    let annual = annual as f64;
    let peak = peak_month as f64;

    let minimum = (peak * s.minimum_peak_fraction).max(0.0).round();
    let maximum = (annual * s.maximum_annual_fraction)
        .min(s.largest_tank_liters)
        .round()
        .max(minimum);
    let blended = s.monthly_average_weight * annual / 12.0 + s.peak_month_weight * peak;
    let optimal = blended.round().clamp(minimum, maximum);

    StorageRecommendation {
        minimum_liters: minimum as u64,
        optimal_liters: optimal as u64,
        maximum_beneficial_liters: maximum as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge_base::KnowledgeBase;
    use rainforge_schemas::climate::{MonthlySeries, Provenance};
    use rainforge_schemas::property::RoofMaterial;
    use rstest::rstest;

    fn roof(sqft: f64, material: RoofMaterial) -> PropertyProfile {
        PropertyProfile {
            property_type: "residential".into(),
            roof_area_sqft: sqft,
            roof_material: material,
            floors: 1,
            plot_area_sqft: None,
        }
    }

    fn city(kb: &KnowledgeBase, id: &str) -> ClimateProfile {
        let c = kb.climate.cities.iter().find(|c| c.city_id == id).unwrap();
        ClimateProfile::from_monthly(c.monthly_rainfall_mm.clone(), Provenance::Fallback, id)
    }

    #[test]
    fn delhi_reference_roof() {
        let kb = KnowledgeBase::builtin().unwrap();
        let p = compute(
            &roof(1200.0, RoofMaterial::Concrete),
            SystemType::Standard,
            &city(&kb, "delhi"),
            kb.tuning(),
        );
        assert!((p.annual_harvestable_liters as i64 - 25_849).abs() <= 1);
        assert_eq!(p.peak_runoff.peak_month, Month::Jul);
        assert_eq!(p.monthly_potential[&Month::Jul], 7_304);
        assert!((p.storage_recommendations.optimal_liters as i64 - 15_020).abs() <= 50);
        assert_eq!(p.storage_recommendations.minimum_liters, 3_652);
        assert_eq!(p.storage_recommendations.maximum_beneficial_liters, 23_264);
        assert_eq!(p.roof_area_sqm, 111.48);
    }

    #[rstest]
    #[case("mumbai", 300.0, RoofMaterial::Thatch)]
    #[case("jaipur", 4000.0, RoofMaterial::Metal)]
    #[case("kochi", 12000.0, RoofMaterial::Tile)]
    #[case("chennai", 45.0, RoofMaterial::Other)]
    fn annual_is_sum_and_storage_is_ordered(
        #[case] id: &str,
        #[case] sqft: f64,
        #[case] material: RoofMaterial,
    ) {
        let kb = KnowledgeBase::builtin().unwrap();
        let p = compute(&roof(sqft, material), SystemType::Premium, &city(&kb, id), kb.tuning());
        assert_eq!(p.annual_harvestable_liters, p.monthly_potential.values().sum::<u64>());
        assert_eq!(p.monthly_potential.len(), 12);
        let s = &p.storage_recommendations;
        assert!(s.minimum_liters <= s.optimal_liters);
        assert!(s.optimal_liters <= s.maximum_beneficial_liters);
    }

    #[test]
    fn dry_climate_yields_zero_everywhere() {
        let kb = KnowledgeBase::builtin().unwrap();
        let dry = ClimateProfile::from_monthly(
            MonthlySeries::from_fn(|_| 0.0),
            Provenance::Live,
            "dry",
        );
        let p = compute(
            &roof(1000.0, RoofMaterial::Concrete),
            SystemType::Basic,
            &dry,
            kb.tuning(),
        );
        assert_eq!(p.annual_harvestable_liters, 0);
        assert_eq!(p.storage_recommendations.optimal_liters, 0);
        assert_eq!(p.peak_runoff.estimated_peak_daily_liters, 0);
    }

    #[test]
    fn efficiency_is_clamped_to_one() {
        let kb = KnowledgeBase::builtin().unwrap();
        let mut tuning = kb.tuning().clone();
        tuning.harvest.system_efficiency.standard = 1.0;
        tuning.harvest.material_factors.concrete = 1.0;
        let p = compute(
            &roof(100.0, RoofMaterial::Concrete),
            SystemType::Standard,
            &city(&kb, "delhi"),
            &tuning,
        );
        assert_eq!(p.collection_efficiency, 1.0);
    }

    #[test]
    fn enormous_roof_saturates_instead_of_overflowing() {
        let kb = KnowledgeBase::builtin().unwrap();
        let p = compute(
            &roof(1e18, RoofMaterial::Concrete),
            SystemType::Standard,
            &city(&kb, "mumbai"),
            kb.tuning(),
        );
        assert_eq!(p.annual_harvestable_liters, u64::MAX);
        assert!(p.peak_runoff.peak_monthly_liters <= p.annual_harvestable_liters);
    }
}
