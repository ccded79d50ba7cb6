use crate::climate::Month;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakRunoff {
    pub peak_month: Month,
    pub peak_monthly_liters: u64,
    pub estimated_peak_daily_liters: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageRecommendation {
    pub minimum_liters: u64,
    pub optimal_liters: u64,
    pub maximum_beneficial_liters: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarvestingPotential {
    pub roof_area_sqft: f64,
    pub roof_area_sqm: f64,
    pub runoff_coefficient: f64,
    pub system_efficiency: f64,
    pub collection_efficiency: f64,
    pub monthly_potential: BTreeMap<Month, u64>,
    pub annual_harvestable_liters: u64,
    pub peak_runoff: PeakRunoff,
    pub storage_recommendations: StorageRecommendation,
}
