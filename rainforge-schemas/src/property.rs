use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionType {
    #[serde(rename = "urban")]
    Urban,
    #[serde(rename = "semi-urban", alias = "semi_urban", alias = "suburban")]
    SemiUrban,
    #[serde(rename = "rural")]
    Rural,
}

impl fmt::Display for RegionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RegionType::Urban => "urban",
            RegionType::SemiUrban => "semi-urban",
            RegionType::Rural => "rural",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoofMaterial {
    Concrete,
    Metal,
    Tile,
    Asbestos,
    Thatch,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemType {
    Basic,
    Standard,
    #[serde(alias = "advanced")]
    Premium,
}

impl fmt::Display for SystemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SystemType::Basic => "basic",
            SystemType::Standard => "standard",
            SystemType::Premium => "premium",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    WaterSecurity,
    CostSaving,
    GroundwaterRecharge,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetRange {
    #[serde(default)]
    pub min_inr: Option<f64>,
    #[serde(default)]
    pub max_inr: Option<f64>,
}

impl BudgetRange {
    pub fn admits(&self, cost_inr: f64) -> bool {
        self.max_inr.map_or(true, |max| cost_inr <= max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
    pub region_type: RegionType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyProfile {
    #[serde(rename = "type")]
    pub property_type: String,
    pub roof_area_sqft: f64,
    pub roof_material: RoofMaterial,
    pub floors: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_area_sqft: Option<f64>,
}

impl PropertyProfile {
    /// Ground area not covered by the building, when the plot is known.
    pub fn open_area_sqft(&self) -> Option<f64> {
        self.plot_area_sqft
            .map(|plot| (plot - self.roof_area_sqft).max(0.0))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageProfile {
    pub household_size: u32,
    pub daily_consumption_liters: f64,
    pub current_sources: BTreeSet<String>,
    pub intended_use: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_range: Option<BudgetRange>,
    pub system_type: SystemType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

/// A request after validation and defaulting; every field the pipeline reads
/// is present and in range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteAssessment {
    pub location: Location,
    pub property: PropertyProfile,
    pub usage: UsageProfile,
    pub preferences: Preferences,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_aliases_deserialize() {
        let r: RegionType = serde_yaml::from_str("suburban").unwrap();
        assert_eq!(r, RegionType::SemiUrban);
        let r: RegionType = serde_yaml::from_str("semi-urban").unwrap();
        assert_eq!(r, RegionType::SemiUrban);
        assert_eq!(serde_json::to_string(&r).unwrap(), "\"semi-urban\"");
    }

    #[test]
    fn unknown_roof_material_maps_to_other() {
        let m: RoofMaterial = serde_yaml::from_str("fibreglass").unwrap();
        assert_eq!(m, RoofMaterial::Other);
        let s: SystemType = serde_yaml::from_str("advanced").unwrap();
        assert_eq!(s, SystemType::Premium);
    }

    #[test]
    fn open_area_never_negative() {
        let p = PropertyProfile {
            property_type: "residential".into(),
            roof_area_sqft: 1200.0,
            roof_material: RoofMaterial::Concrete,
            floors: 1,
            plot_area_sqft: Some(2000.0),
        };
        assert_eq!(p.open_area_sqft(), Some(800.0));
        let none = PropertyProfile { plot_area_sqft: None, ..p };
        assert_eq!(none.open_area_sqft(), None);
    }
}
