use crate::property::{BudgetRange, Priority, RegionType, RoofMaterial, SystemType};
use serde::{Deserialize, Serialize};

/// Inbound request as submitted. Every field is optional so that missing
/// values surface as validation errors rather than parse failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisRequest {
    pub location: LocationInput,
    pub property: PropertyInput,
    pub usage: UsageInput,
    pub preferences: PreferencesInput,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationInput {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub address: Option<String>,
    pub region_type: Option<RegionType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyInput {
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub roof_area_sqft: Option<f64>,
    pub roof_material: Option<RoofMaterial>,
    pub floors: Option<u32>,
    pub plot_area_sqft: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageInput {
    pub household_size: Option<u32>,
    pub daily_consumption_liters: Option<f64>,
    pub current_sources: Vec<String>,
    pub intended_use: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferencesInput {
    pub budget_range: Option<BudgetRange>,
    pub system_type: Option<SystemType>,
    pub region_type: Option<RegionType>,
    pub priority: Option<Priority>,
}

impl AnalysisRequest {
    /// Minimal request: a coordinate and a roof, everything else defaulted.
    pub fn for_roof(lat: f64, lng: f64, roof_area_sqft: f64) -> Self {
        Self {
            location: LocationInput {
                lat: Some(lat),
                lng: Some(lng),
                ..Default::default()
            },
            property: PropertyInput {
                roof_area_sqft: Some(roof_area_sqft),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}
