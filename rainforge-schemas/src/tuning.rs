use crate::property::{RoofMaterial, SystemType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemEfficiency {
    pub basic: f64,
    pub standard: f64,
    pub premium: f64,
}

impl SystemEfficiency {
    pub fn for_system(&self, system: SystemType) -> f64 {
        match system {
            SystemType::Basic => self.basic,
            SystemType::Standard => self.standard,
            SystemType::Premium => self.premium,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialFactors {
    pub concrete: f64,
    pub metal: f64,
    pub tile: f64,
    pub asbestos: f64,
    pub thatch: f64,
    pub other: f64,
}

impl MaterialFactors {
    pub fn for_material(&self, material: RoofMaterial) -> f64 {
        match material {
            RoofMaterial::Concrete => self.concrete,
            RoofMaterial::Metal => self.metal,
            RoofMaterial::Tile => self.tile,
            RoofMaterial::Asbestos => self.asbestos,
            RoofMaterial::Thatch => self.thatch,
            RoofMaterial::Other => self.other,
        }
    }

    pub fn all(&self) -> [f64; 6] {
        [
            self.concrete,
            self.metal,
            self.tile,
            self.asbestos,
            self.thatch,
            self.other,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarvestTuning {
    pub sqft_to_sqm: f64,
    pub system_efficiency: SystemEfficiency,
    pub material_factors: MaterialFactors,
    pub peak_day_fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageTuning {
    pub minimum_peak_fraction: f64,
    pub monthly_average_weight: f64,
    pub peak_month_weight: f64,
    pub maximum_annual_fraction: f64,
    pub largest_tank_liters: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandDirection {
    /// Points awarded when the raw value is at or above the threshold.
    AtLeast,
    /// Points awarded when the raw value is at or below the threshold.
    AtMost,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBand {
    pub threshold: f64,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandedCriterion {
    pub cap: u32,
    pub direction: BandDirection,
    pub bands: Vec<ScoreBand>,
    pub floor_points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilMatch {
    pub soil_match: String,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilCriterion {
    pub cap: u32,
    pub matches: Vec<SoilMatch>,
    pub default_points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub highly_feasible: u32,
    pub feasible: u32,
    pub moderately_feasible: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityRubric {
    pub rainfall: BandedCriterion,
    pub roof_area: BandedCriterion,
    pub water_demand: BandedCriterion,
    pub soil_suitability: SoilCriterion,
    pub tiers: TierThresholds,
    pub demand_days_per_month: f64,
    pub improvement_threshold_fraction: f64,
}

impl FeasibilityRubric {
    pub fn caps_total(&self) -> u32 {
        self.rainfall.cap + self.roof_area.cap + self.water_demand.cap + self.soil_suitability.cap
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitSizing {
    pub length_m: f64,
    pub width_m: f64,
    pub depth_m: f64,
    pub event_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrenchSizing {
    pub width_m: f64,
    pub depth_m: f64,
    pub min_length_m: f64,
    pub max_length_m: f64,
    pub min_open_area_sqft: f64,
    pub max_water_table_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellSizing {
    pub bore_diameter_mm: f64,
    pub depth_margin_m: f64,
    pub min_depth_m: f64,
    pub max_depth_m: f64,
    pub recharge_fraction: f64,
    pub max_open_area_sqft: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingTuning {
    pub tank_height_m: f64,
    pub underground_threshold_liters: f64,
    pub default_open_area_sqft: f64,
    pub pit: PitSizing,
    pub trench: TrenchSizing,
    pub well: WellSizing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityTuning {
    pub rainfall_delta: f64,
    pub cost_delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub long_payback_years: f64,
    pub low_yield_liters: u64,
    pub high_investment_inr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceTuning {
    pub horizon_years: u32,
    pub discount_rate: f64,
    pub days_per_year: f64,
    pub payback_sentinel_years: f64,
    pub sensitivity: SensitivityTuning,
    pub risk: RiskThresholds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentTuning {
    pub recharge_fraction: f64,
    pub co2_kg_per_liter: f64,
    pub water_security_inr_per_liter: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDefaults {
    pub household_size: u32,
    pub per_capita_liters_per_day: f64,
    pub floors: u32,
    /// Largest roof accepted by validation.
    pub max_roof_area_sqft: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionInference {
    pub urban_radius_deg: f64,
    pub semi_urban_radius_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseTemplate {
    pub name: String,
    pub duration: String,
    pub cost_fraction: f64,
    pub activities: Vec<String>,
    pub deliverables: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplementationTemplate {
    pub total_duration: String,
    pub phases: Vec<PhaseTemplate>,
}

/// Every tunable the pipeline reads. Loaded from the calibration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineTuning {
    pub harvest: HarvestTuning,
    pub storage: StorageTuning,
    pub feasibility: FeasibilityRubric,
    pub sizing: SizingTuning,
    pub finance: FinanceTuning,
    pub environment: EnvironmentTuning,
    pub defaults: RequestDefaults,
    pub region_inference: RegionInference,
    pub implementation: ImplementationTemplate,
}
