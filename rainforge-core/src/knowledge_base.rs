//! Static tables and tunables, loaded once and shared read-only.

use crate::error::RainforgeError;
use rainforge_schemas::{
    file_formats::{CalibrationFile, CityRainfallFile, SoilZoneFile, UnitCostFile},
    soil::SoilTypeEntry,
    tuning::{BandDirection, BandedCriterion, EngineTuning},
};
use serde::de::DeserializeOwned;

pub const CLIMATE_FILE: &str = "1_climate/city_rainfall.yaml";
pub const SOIL_FILE: &str = "2_soil/soil_zones.yaml";
pub const COSTS_FILE: &str = "3_costs/unit_costs.yaml";
pub const CALIBRATION_FILE: &str = "4_calibration/engine.yaml";

const BUILTIN_CLIMATE: &str =
    include_str!("../../data/knowledge_base/1_climate/city_rainfall.yaml");
const BUILTIN_SOIL: &str = include_str!("../../data/knowledge_base/2_soil/soil_zones.yaml");
const BUILTIN_COSTS: &str = include_str!("../../data/knowledge_base/3_costs/unit_costs.yaml");
const BUILTIN_CALIBRATION: &str =
    include_str!("../../data/knowledge_base/4_calibration/engine.yaml");

const FRACTION_TOLERANCE: f64 = 1e-6;

/// Everything the pipeline reads that is not part of the request.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    pub climate: CityRainfallFile,
    pub geology: SoilZoneFile,
    pub costs: UnitCostFile,
    pub calibration: CalibrationFile,
}

impl KnowledgeBase {
    /// The shipped tables, compiled into the binary.
    pub fn builtin() -> Result<Self, RainforgeError> {
        let kb = Self {
            climate: parse_yaml(CLIMATE_FILE, BUILTIN_CLIMATE)?,
            geology: parse_yaml(SOIL_FILE, BUILTIN_SOIL)?,
            costs: parse_yaml(COSTS_FILE, BUILTIN_COSTS)?,
            calibration: parse_yaml(CALIBRATION_FILE, BUILTIN_CALIBRATION)?,
        };
        kb.validate()?;
        Ok(kb)
    }

    pub fn tuning(&self) -> &EngineTuning {
        &self.calibration.tuning
    }

    pub fn soil_type(&self, soil_id: &str) -> Option<&SoilTypeEntry> {
        self.geology.soil_types.iter().find(|s| s.soil_id == soil_id)
    }

    /// Checks the cross-field rules that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns `RainforgeError::ConfigError` naming the first rule broken.
    pub fn validate(&self) -> Result<(), RainforgeError> {
        self.validate_climate()?;
        self.validate_geology()?;
        self.validate_costs()?;
        self.validate_tuning()
    }

    fn validate_climate(&self) -> Result<(), RainforgeError> {
        let c = &self.climate;
        ensure(c.max_match_distance_deg >= 0.0, "max_match_distance_deg must be non-negative")?;
        ensure(
            c.country_default.monthly_rainfall_mm.is_complete(),
            "country default rainfall must list 12 non-negative months",
        )?;
        for city in &c.cities {
            ensure(
                city.monthly_rainfall_mm.is_complete(),
                &format!("city '{}' must list 12 non-negative months", city.city_id),
            )?;
        }
        Ok(())
    }

    fn validate_geology(&self) -> Result<(), RainforgeError> {
        let g = &self.geology;
        for soil in &g.soil_types {
            ensure(
                soil.design_infiltration_mm_hr >= 0.0,
                &format!("soil '{}' has a negative infiltration rate", soil.soil_id),
            )?;
        }
        for zone in &g.soil_zones {
            ensure(
                zone.bounds.is_well_formed(),
                &format!("soil zone '{}' has inverted bounds", zone.zone_id),
            )?;
            ensure(
                self.soil_type(&zone.soil_id).is_some(),
                &format!("soil zone '{}' references unknown soil '{}'", zone.zone_id, zone.soil_id),
            )?;
        }
        for zone in &g.groundwater_zones {
            ensure(
                zone.bounds.is_well_formed(),
                &format!("groundwater zone '{}' has inverted bounds", zone.zone_id),
            )?;
            ensure(
                zone.depth.min_m >= 0.0 && zone.depth.min_m <= zone.depth.max_m,
                &format!("groundwater zone '{}' has an invalid depth range", zone.zone_id),
            )?;
        }
        for zone in &g.aquifer_zones {
            ensure(
                zone.bounds.is_well_formed(),
                &format!("aquifer zone '{}' has inverted bounds", zone.zone_id),
            )?;
        }
        for zone in &g.administrative_regions {
            ensure(
                zone.bounds.is_well_formed(),
                &format!("administrative region '{}' has inverted bounds", zone.state),
            )?;
        }
        ensure(
            self.soil_type(&g.country_default.soil_id).is_some(),
            "country default references an unknown soil type",
        )
    }

    fn validate_costs(&self) -> Result<(), RainforgeError> {
        let t = &self.costs.cost_table;
        let rates = [
            t.tank.rate_per_liter,
            t.tank.discounted_rate_per_liter,
            t.filtration.basic,
            t.filtration.standard,
            t.filtration.premium,
            t.installation_base,
            t.recharge.pit_rate_per_m3,
            t.recharge.trench_rate_per_m,
            t.recharge.well_base,
            t.recharge.well_drilling_rate_per_m,
            t.recharge.filter_chamber,
            t.recharge.installation,
            self.costs.tariffs.urban,
            self.costs.tariffs.semi_urban,
            self.costs.tariffs.rural,
        ];
        ensure(
            rates.iter().all(|r| r.is_finite() && *r >= 0.0),
            "unit costs and tariffs must be non-negative",
        )?;
        ensure(
            (0.0..=1.0).contains(&t.contingency_rate),
            "contingency_rate must be within [0, 1]",
        )?;
        ensure(!t.pump_tiers.is_empty(), "at least one pump tier is required")?;
        ensure(
            t.pump_tiers.last().map_or(false, |tier| tier.max_capacity_liters.is_none()),
            "the last pump tier must have no upper capacity bound",
        )?;
        ensure(t.pump_tiers.iter().all(|tier| tier.cost >= 0.0), "pump costs must be non-negative")
    }

    fn validate_tuning(&self) -> Result<(), RainforgeError> {
        let t = self.tuning();

        let efficiencies = [
            t.harvest.system_efficiency.basic,
            t.harvest.system_efficiency.standard,
            t.harvest.system_efficiency.premium,
        ];
        ensure(
            efficiencies
                .iter()
                .chain(t.harvest.material_factors.all().iter())
                .all(|e| (0.0..=1.0).contains(e)),
            "efficiency factors must be within [0, 1]",
        )?;
        ensure(t.harvest.sqft_to_sqm > 0.0, "sqft_to_sqm must be positive")?;
        ensure(
            (0.0..=1.0).contains(&t.harvest.peak_day_fraction),
            "peak_day_fraction must be within [0, 1]",
        )?;

        let s = &t.storage;
        ensure(
            s.monthly_average_weight >= 0.0
                && s.peak_month_weight >= 0.0
                && s.largest_tank_liters >= 0.0,
            "storage weights must be non-negative",
        )?;
        ensure(
            (0.0..=1.0).contains(&s.minimum_peak_fraction)
                && (0.0..=1.0).contains(&s.maximum_annual_fraction),
            "storage fractions must be within [0, 1]",
        )?;

        let f = &t.feasibility;
        ensure(f.caps_total() == 100, "feasibility caps must sum to 100")?;
        validate_banded("rainfall", &f.rainfall)?;
        validate_banded("roof_area", &f.roof_area)?;
        validate_banded("water_demand", &f.water_demand)?;
        ensure(
            f.soil_suitability.default_points <= f.soil_suitability.cap
                && f.soil_suitability.matches.iter().all(|m| m.points <= f.soil_suitability.cap),
            "soil_suitability points exceed the cap",
        )?;
        ensure(
            f.tiers.highly_feasible <= 100
                && f.tiers.highly_feasible > f.tiers.feasible
                && f.tiers.feasible > f.tiers.moderately_feasible,
            "feasibility tier thresholds must be strictly descending and at most 100",
        )?;
        ensure(f.demand_days_per_month > 0.0, "demand_days_per_month must be positive")?;

        let z = &t.sizing;
        let dims = [
            z.tank_height_m,
            z.pit.length_m,
            z.pit.width_m,
            z.pit.depth_m,
            z.trench.width_m,
            z.trench.depth_m,
            z.trench.min_length_m,
            z.well.bore_diameter_mm,
            z.well.min_depth_m,
        ];
        ensure(dims.iter().all(|d| *d > 0.0), "structure dimensions must be positive")?;
        ensure(
            z.trench.min_length_m <= z.trench.max_length_m,
            "trench length bounds are inverted",
        )?;
        ensure(z.well.min_depth_m <= z.well.max_depth_m, "well depth bounds are inverted")?;
        ensure(
            (0.0..=1.0).contains(&z.well.recharge_fraction),
            "well recharge_fraction must be within [0, 1]",
        )?;

        let fin = &t.finance;
        ensure(fin.horizon_years >= 1, "horizon_years must be at least 1")?;
        ensure(fin.discount_rate >= 0.0, "discount_rate must be non-negative")?;
        ensure(fin.days_per_year > 0.0, "days_per_year must be positive")?;
        ensure(
            fin.payback_sentinel_years.is_finite()
                && fin.payback_sentinel_years > fin.horizon_years as f64,
            "payback_sentinel_years must be finite and beyond the horizon",
        )?;
        ensure(
            (0.0..1.0).contains(&fin.sensitivity.rainfall_delta)
                && (0.0..1.0).contains(&fin.sensitivity.cost_delta),
            "sensitivity deltas must be within [0, 1)",
        )?;

        let e = &t.environment;
        ensure(
            (0.0..=1.0).contains(&e.recharge_fraction)
                && e.co2_kg_per_liter >= 0.0
                && e.water_security_inr_per_liter >= 0.0,
            "environmental factors must be non-negative fractions",
        )?;

        ensure(
            t.defaults.household_size >= 1 && t.defaults.floors >= 1,
            "request defaults must be at least 1",
        )?;
        ensure(
            t.defaults.per_capita_liters_per_day >= 0.0,
            "per_capita_liters_per_day must be non-negative",
        )?;
        ensure(
            t.defaults.max_roof_area_sqft.is_finite() && t.defaults.max_roof_area_sqft > 0.0,
            "max_roof_area_sqft must be a positive number",
        )?;
        ensure(
            t.region_inference.urban_radius_deg >= 0.0
                && t.region_inference.urban_radius_deg <= t.region_inference.semi_urban_radius_deg,
            "region inference radii must satisfy 0 <= urban <= semi_urban",
        )?;

        let phases = &t.implementation.phases;
        ensure(!phases.is_empty(), "at least one implementation phase is required")?;
        ensure(
            phases.iter().all(|p| p.cost_fraction >= 0.0),
            "phase cost fractions must be non-negative",
        )?;
        let fraction_sum: f64 = phases.iter().map(|p| p.cost_fraction).sum();
        ensure(
            (fraction_sum - 1.0).abs() <= FRACTION_TOLERANCE,
            "phase cost fractions must sum to 1",
        )
    }
}

fn validate_banded(name: &str, c: &BandedCriterion) -> Result<(), RainforgeError> {
    ensure(c.floor_points <= c.cap, &format!("{} floor_points exceed the cap", name))?;
    ensure(
        c.bands.iter().all(|b| b.points <= c.cap),
        &format!("{} band points exceed the cap", name),
    )?;
    let ordered = c.bands.windows(2).all(|w| match c.direction {
        BandDirection::AtLeast => w[0].threshold > w[1].threshold,
        BandDirection::AtMost => w[0].threshold < w[1].threshold,
    });
    ensure(ordered, &format!("{} band thresholds are out of order", name))
}

fn ensure(condition: bool, message: &str) -> Result<(), RainforgeError> {
    if condition {
        Ok(())
    } else {
        Err(RainforgeError::ConfigError(message.to_string()))
    }
}

/// Parses one knowledge-base file. `label` names the file in errors.
pub fn parse_yaml<T: DeserializeOwned>(label: &str, content: &str) -> Result<T, RainforgeError> {
    serde_yaml::from_str(content).map_err(|e| RainforgeError::YamlParsing(label.to_string(), e))
}
