use crate::property::{RegionType, SystemType};
use serde::{Deserialize, Serialize};

/// Upfront cost of one structure, INR. `total` is always the exact sum of the
/// five components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub tank_cost: f64,
    pub filtration_cost: f64,
    pub pump_cost: f64,
    pub installation_cost: f64,
    pub contingency: f64,
    pub total_cost: f64,
}

impl CostBreakdown {
    pub fn zero() -> Self {
        Self {
            tank_cost: 0.0,
            filtration_cost: 0.0,
            pump_cost: 0.0,
            installation_cost: 0.0,
            contingency: 0.0,
            total_cost: 0.0,
        }
    }

    pub fn component_sum(&self) -> f64 {
        self.tank_cost
            + self.filtration_cost
            + self.pump_cost
            + self.installation_cost
            + self.contingency
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankRates {
    pub rate_per_liter: f64,
    pub discount_threshold_liters: u64,
    pub discounted_rate_per_liter: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiltrationCosts {
    pub basic: f64,
    pub standard: f64,
    pub premium: f64,
}

impl FiltrationCosts {
    pub fn for_system(&self, system: SystemType) -> f64 {
        match system {
            SystemType::Basic => self.basic,
            SystemType::Standard => self.standard,
            SystemType::Premium => self.premium,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PumpTier {
    pub label: String,
    #[serde(default)]
    pub max_capacity_liters: Option<u64>,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RechargeRates {
    pub pit_rate_per_m3: f64,
    pub trench_rate_per_m: f64,
    pub well_base: f64,
    pub well_drilling_rate_per_m: f64,
    pub filter_chamber: f64,
    pub installation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostTable {
    pub tank: TankRates,
    pub filtration: FiltrationCosts,
    pub pump_tiers: Vec<PumpTier>,
    pub installation_base: f64,
    pub recharge: RechargeRates,
    pub contingency_rate: f64,
}

/// Municipal tariff per 1000 liters, INR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterTariffs {
    pub urban: f64,
    pub semi_urban: f64,
    pub rural: f64,
}

impl WaterTariffs {
    pub fn per_kiloliter(&self, region: RegionType) -> f64 {
        match region {
            RegionType::Urban => self.urban,
            RegionType::SemiUrban => self.semi_urban,
            RegionType::Rural => self.rural,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaybackStatus {
    WithinHorizon,
    BeyondHorizon,
    NotRecoverable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialAnalysis {
    pub annual_water_savings_liters: u64,
    pub annual_demand_liters: u64,
    pub tariff_inr_per_kl: f64,
    pub annual_cost_savings_inr: f64,
    pub payback_period_years: f64,
    pub payback_status: PaybackStatus,
    pub horizon_years: u32,
    pub total_20_year_savings: f64,
    pub net_20_year_benefit: f64,
    pub roi_percentage: f64,
    pub npv_inr: f64,
    pub benefit_cost_ratio: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_rate_of_return_percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub condition: String,
    pub rainfall_multiplier: f64,
    pub cost_multiplier: f64,
    pub annual_harvestable_liters: u64,
    pub total_cost: f64,
    pub annual_cost_savings_inr: f64,
    pub payback_period_years: f64,
    pub payback_status: PaybackStatus,
    pub npv_inr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityAnalysis {
    pub optimistic_scenario: Scenario,
    pub pessimistic_scenario: Scenario,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    pub risk_factors: Vec<String>,
    pub mitigation_strategies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowYear {
    pub year: u32,
    pub cumulative_savings_inr: f64,
    pub cumulative_discounted_savings_inr: f64,
    pub net_position_inr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBenefitAnalysis {
    pub sensitivity_analysis: SensitivityAnalysis,
    pub risk_assessment: RiskAssessment,
    pub cash_flow: Vec<CashFlowYear>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalImpact {
    pub annual_recharge_liters: u64,
    pub annual_co2_savings_kg: f64,
    pub water_security_value_inr: f64,
    pub ecosystem_benefits: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tariff_lookup_is_total() {
        let t = WaterTariffs {
            urban: 15.0,
            semi_urban: 12.0,
            rural: 8.0,
        };
        assert_eq!(t.per_kiloliter(RegionType::SemiUrban), 12.0);
        assert_eq!(t.per_kiloliter(RegionType::Rural), 8.0);
    }

    #[test]
    fn payback_status_wire_names() {
        let s = serde_json::to_string(&PaybackStatus::NotRecoverable).unwrap();
        assert_eq!(s, "\"not_recoverable\"");
    }
}
