use crate::climate::Provenance;
use crate::environment::GeoBox;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfiltrationBand {
    Low,
    Medium,
    MediumHigh,
    High,
    VeryHigh,
    Variable,
}

impl InfiltrationBand {
    /// Soils that take water fast enough to make recharge the primary structure.
    pub fn favours_infiltration(&self) -> bool {
        matches!(self, InfiltrationBand::High | InfiltrationBand::VeryHigh)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RechargeSuitability {
    Excellent,
    Good,
    StorageFavoured,
    SiteSpecific,
}

impl RechargeSuitability {
    pub fn is_favorable(&self) -> bool {
        matches!(self, RechargeSuitability::Excellent | RechargeSuitability::Good)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthRange {
    pub min_m: f64,
    pub max_m: f64,
}

impl DepthRange {
    pub fn label(&self) -> String {
        format!("{}-{} meters", self.min_m, self.max_m)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AquiferInfo {
    pub principal_aquifer: String,
    pub aquifer_type: String,
    pub lithology: String,
    pub water_quality: String,
    pub yield_characteristics: String,
    pub sustainability: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilProfile {
    pub soil_type: String,
    pub infiltration_rate: InfiltrationBand,
    pub infiltration_label: String,
    pub design_infiltration_mm_hr: f64,
    pub recharge_suitability: RechargeSuitability,
    pub suitability_label: String,
    pub groundwater_depth: DepthRange,
    pub aquifer_prospects: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_aquifer_info: Option<AquiferInfo>,
    pub recharge_potential: String,
    pub enhancement_options: Vec<String>,
    pub source: Provenance,
    pub source_name: String,
}

/// Catalogue entry describing a soil class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilTypeEntry {
    pub soil_id: String,
    pub display_name: String,
    pub infiltration_band: InfiltrationBand,
    pub infiltration_label: String,
    pub design_infiltration_mm_hr: f64,
    pub recharge_suitability: RechargeSuitability,
    pub suitability_label: String,
    pub aquifer_prospects: String,
    pub recharge_potential: String,
    #[serde(default)]
    pub enhancement_options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilZone {
    pub zone_id: String,
    pub soil_id: String,
    pub bounds: GeoBox,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundwaterZone {
    pub zone_id: String,
    pub depth: DepthRange,
    pub bounds: GeoBox,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AquiferZone {
    pub zone_id: String,
    pub bounds: GeoBox,
    pub aquifer: AquiferInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdministrativeRegion {
    pub state: String,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdministrativeZone {
    pub state: String,
    pub region: String,
    pub bounds: GeoBox,
}

impl AdministrativeZone {
    pub fn to_region(&self) -> AdministrativeRegion {
        AdministrativeRegion {
            state: self.state.clone(),
            region: self.region.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilCountryDefault {
    pub name: String,
    pub soil_id: String,
    pub groundwater_depth: DepthRange,
    pub administrative_region: AdministrativeRegion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RechargeAssessment {
    pub overall_suitability: String,
    pub recommended_methods: Vec<String>,
    pub limitations: Vec<String>,
    pub enhancement_options: Vec<String>,
    pub recommended_approach: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suitability_and_band_predicates() {
        assert!(RechargeSuitability::Good.is_favorable());
        assert!(!RechargeSuitability::StorageFavoured.is_favorable());
        assert!(InfiltrationBand::VeryHigh.favours_infiltration());
        assert!(!InfiltrationBand::MediumHigh.favours_infiltration());
    }

    #[test]
    fn depth_label_formats_whole_metres() {
        let d = DepthRange { min_m: 10.0, max_m: 25.0 };
        assert_eq!(d.label(), "10-25 meters");
    }
}
