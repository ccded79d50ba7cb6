use crate::{
    climate::{CityRainfall, ClimateDefault},
    soil::{
        AdministrativeZone, AquiferZone, GroundwaterZone, SoilCountryDefault, SoilTypeEntry,
        SoilZone,
    },
    tea_lca::{CostTable, WaterTariffs},
    tuning::EngineTuning,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityRainfallFile {
    pub schema_version: String,
    pub max_match_distance_deg: f64,
    pub country_default: ClimateDefault,
    pub cities: Vec<CityRainfall>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoilZoneFile {
    pub schema_version: String,
    pub soil_types: Vec<SoilTypeEntry>,
    pub soil_zones: Vec<SoilZone>,
    pub groundwater_zones: Vec<GroundwaterZone>,
    pub aquifer_zones: Vec<AquiferZone>,
    pub administrative_regions: Vec<AdministrativeZone>,
    pub country_default: SoilCountryDefault,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitCostFile {
    pub schema_version: String,
    pub cost_table: CostTable,
    pub tariffs: WaterTariffs,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationFile {
    pub schema_version: String,
    #[serde(flatten)]
    pub tuning: EngineTuning,
}
