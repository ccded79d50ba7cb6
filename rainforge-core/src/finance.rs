//! Financial and environmental projections for a priced system.

use crate::harvest;
use rainforge_schemas::{
    climate::ClimateProfile,
    potential::HarvestingPotential,
    property::{RegionType, SiteAssessment, UsageProfile},
    tea_lca::{
        CashFlowYear, CostBenefitAnalysis, CostBreakdown, EnvironmentalImpact, FinancialAnalysis,
        PaybackStatus, RiskAssessment, RiskLevel, Scenario, SensitivityAnalysis, WaterTariffs,
    },
    tuning::{EngineTuning, EnvironmentTuning, FinanceTuning},
};
use tracing::debug;

const IRR_ITERATIONS: usize = 100;
const IRR_UPPER_BOUND: f64 = 1.0;

/// The figures every scenario shares. Computed by one function so the base
/// case and the sensitivity scenarios cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Economics {
    savings_liters: u64,
    savings_inr: f64,
    payback_years: f64,
    status: PaybackStatus,
    npv: f64,
}

fn economics(
    annual_harvest: u64,
    total_cost: f64,
    annual_demand: u64,
    tariff: f64,
    f: &FinanceTuning,
) -> Economics {
    let savings_liters = annual_harvest.min(annual_demand);
    let savings_inr = round_to(savings_liters as f64 * tariff / 1000.0, 2);
    let (payback_years, status) = payback(total_cost, savings_inr, f);
    Economics {
        savings_liters,
        savings_inr,
        payback_years,
        status,
        npv: discounted_benefits(savings_inr, f) - total_cost,
    }
}

/// Always finite. Zero savings map to the sentinel.
fn payback(total_cost: f64, savings_inr: f64, f: &FinanceTuning) -> (f64, PaybackStatus) {
    if savings_inr <= 0.0 {
        return (f.payback_sentinel_years, PaybackStatus::NotRecoverable);
    }
    let years = round_to(total_cost / savings_inr, 1).min(f.payback_sentinel_years);
    let status = if years <= f.horizon_years as f64 {
        PaybackStatus::WithinHorizon
    } else {
        PaybackStatus::BeyondHorizon
    };
    (years, status)
}

fn discounted_benefits(annual: f64, f: &FinanceTuning) -> f64 {
    discounted_sum(annual, f.discount_rate, f.horizon_years)
}

fn discounted_sum(annual: f64, rate: f64, years: u32) -> f64 {
    (1..=years).map(|t| annual / (1.0 + rate).powi(t as i32)).sum()
}

/// Rate at which discounted savings repay the cost, searched in `[0, 1]`.
/// `None` when the savings never repay the cost within the horizon or the
/// rate lies above the bracket.
fn internal_rate_of_return(total_cost: f64, annual: f64, years: u32) -> Option<f64> {
    if total_cost <= 0.0 || annual <= 0.0 {
        return None;
    }
    let npv = |r: f64| discounted_sum(annual, r, years) - total_cost;
    let (mut lo, mut hi) = (0.0, IRR_UPPER_BOUND);
    if npv(lo) < 0.0 || npv(hi) > 0.0 {
        return None;
    }
    for _ in 0..IRR_ITERATIONS {
        let mid = (lo + hi) / 2.0;
        if npv(mid) > 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Some(round_to((lo + hi) / 2.0 * 100.0, 2))
}

fn annual_demand(usage: &UsageProfile, f: &FinanceTuning) -> u64 {
    (usage.daily_consumption_liters * f.days_per_year).round().max(0.0) as u64
}

pub fn analyze(
    potential: &HarvestingPotential,
    cost: &CostBreakdown,
    usage: &UsageProfile,
    region: RegionType,
    tariffs: &WaterTariffs,
    f: &FinanceTuning,
) -> FinancialAnalysis {
    let total_cost = cost.total_cost;
    let tariff = tariffs.per_kiloliter(region);
    let demand = annual_demand(usage, f);
    let e = economics(potential.annual_harvestable_liters, total_cost, demand, tariff, f);

    let total_savings = round_to(e.savings_inr * f.horizon_years as f64, 2);
    let net_benefit = round_to(total_savings - total_cost, 2);
    let roi = if total_cost > 0.0 {
        round_to(net_benefit / total_cost * 100.0, 2)
    } else {
        0.0
    };
    let benefits = discounted_benefits(e.savings_inr, f);
    let bcr = if total_cost > 0.0 {
        round_to(benefits / total_cost, 3)
    } else {
        0.0
    };
    debug!(
        savings = e.savings_inr,
        payback = e.payback_years,
        status = ?e.status,
        "Computed financials"
    );

    FinancialAnalysis {
        annual_water_savings_liters: e.savings_liters,
        annual_demand_liters: demand,
        tariff_inr_per_kl: tariff,
        annual_cost_savings_inr: e.savings_inr,
        payback_period_years: e.payback_years,
        payback_status: e.status,
        horizon_years: f.horizon_years,
        total_20_year_savings: total_savings,
        net_20_year_benefit: net_benefit,
        roi_percentage: roi,
        npv_inr: round_to(e.npv, 2),
        benefit_cost_ratio: bcr,
        internal_rate_of_return_percent: internal_rate_of_return(
            total_cost,
            e.savings_inr,
            f.horizon_years,
        ),
    }
}

/// Re-runs harvest and finance with scaled rainfall and cost. The structure
/// stays the one recommended for the base case.
#[allow(clippy::too_many_arguments)]
fn run_scenario(
    condition: &str,
    rainfall_multiplier: f64,
    cost_multiplier: f64,
    site: &SiteAssessment,
    climate: &ClimateProfile,
    base_cost: f64,
    tariffs: &WaterTariffs,
    tuning: &EngineTuning,
) -> Scenario {
    let f = &tuning.finance;
    let scaled = climate.with_rainfall_scaled(rainfall_multiplier);
    let potential = harvest::compute(&site.property, site.preferences.system_type, &scaled, tuning);
    let total_cost = (base_cost * cost_multiplier).round();
    let e = economics(
        potential.annual_harvestable_liters,
        total_cost,
        annual_demand(&site.usage, f),
        tariffs.per_kiloliter(site.location.region_type),
        f,
    );
    Scenario {
        condition: condition.to_string(),
        rainfall_multiplier,
        cost_multiplier,
        annual_harvestable_liters: potential.annual_harvestable_liters,
        total_cost,
        annual_cost_savings_inr: e.savings_inr,
        payback_period_years: e.payback_years,
        payback_status: e.status,
        npv_inr: round_to(e.npv, 2),
    }
}

pub fn sensitivity(
    site: &SiteAssessment,
    climate: &ClimateProfile,
    base_cost: f64,
    tariffs: &WaterTariffs,
    tuning: &EngineTuning,
) -> SensitivityAnalysis {
    let s = &tuning.finance.sensitivity;
    SensitivityAnalysis {
        optimistic_scenario: run_scenario(
            &format!(
                "{:.0}% higher rainfall, {:.0}% lower costs",
                s.rainfall_delta * 100.0,
                s.cost_delta * 100.0
            ),
            1.0 + s.rainfall_delta,
            1.0 - s.cost_delta,
            site,
            climate,
            base_cost,
            tariffs,
            tuning,
        ),
        pessimistic_scenario: run_scenario(
            &format!(
                "{:.0}% lower rainfall, {:.0}% higher costs",
                s.rainfall_delta * 100.0,
                s.cost_delta * 100.0
            ),
            1.0 - s.rainfall_delta,
            1.0 + s.cost_delta,
            site,
            climate,
            base_cost,
            tariffs,
            tuning,
        ),
    }
}

pub fn risk(
    financial: &FinancialAnalysis,
    potential: &HarvestingPotential,
    total_cost: f64,
    f: &FinanceTuning,
) -> RiskAssessment {
    let r = &f.risk;
    let mut risk_factors = Vec::new();
    if financial.payback_period_years > r.long_payback_years {
        risk_factors.push("Long payback period".to_string());
    }
    if potential.annual_harvestable_liters < r.low_yield_liters {
        risk_factors.push("Low water yield potential".to_string());
    }
    if total_cost > r.high_investment_inr {
        risk_factors.push("High initial investment".to_string());
    }
    let risk_level = match risk_factors.len() {
        0 => RiskLevel::Low,
        1 | 2 => RiskLevel::Medium,
        _ => RiskLevel::High,
    };
    RiskAssessment {
        risk_level,
        risk_factors,
        mitigation_strategies: [
            "Phased implementation to reduce initial investment",
            "Regular maintenance to ensure optimal performance",
            "Water quality monitoring for health safety",
            "Community-level systems for cost sharing",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    }
}

/// Year 0 carries the upfront cost; every later year adds one year of savings.
pub fn cash_flow(annual_savings: f64, total_cost: f64, f: &FinanceTuning) -> Vec<CashFlowYear> {
    let mut cumulative = 0.0;
    let mut discounted = 0.0;
    (0..=f.horizon_years)
        .map(|year| {
            if year > 0 {
                cumulative += annual_savings;
                discounted += annual_savings / (1.0 + f.discount_rate).powi(year as i32);
            }
            CashFlowYear {
                year,
                cumulative_savings_inr: round_to(cumulative, 2),
                cumulative_discounted_savings_inr: round_to(discounted, 2),
                net_position_inr: round_to(cumulative - total_cost, 2),
            }
        })
        .collect()
}

pub fn cost_benefit(
    site: &SiteAssessment,
    climate: &ClimateProfile,
    potential: &HarvestingPotential,
    financial: &FinancialAnalysis,
    total_cost: f64,
    tariffs: &WaterTariffs,
    tuning: &EngineTuning,
) -> CostBenefitAnalysis {
    let f = &tuning.finance;
    CostBenefitAnalysis {
        sensitivity_analysis: sensitivity(site, climate, total_cost, tariffs, tuning),
        risk_assessment: risk(financial, potential, total_cost, f),
        cash_flow: cash_flow(financial.annual_cost_savings_inr, total_cost, f),
    }
}

pub fn environmental_impact(
    potential: &HarvestingPotential,
    env: &EnvironmentTuning,
) -> EnvironmentalImpact {
    let annual = potential.annual_harvestable_liters as f64;
    EnvironmentalImpact {
        annual_recharge_liters: (annual * env.recharge_fraction).round() as u64,
        annual_co2_savings_kg: round_to(annual * env.co2_kg_per_liter, 1),
        water_security_value_inr: round_to(annual * env.water_security_inr_per_liter, 2),
        ecosystem_benefits: [
            "Reduced urban flooding and storm water runoff",
            "Groundwater table recharge",
            "Reduced pressure on municipal water supply",
            "Lower energy use for water pumping and treatment",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge_base::KnowledgeBase;
    use rainforge_schemas::potential::{PeakRunoff, StorageRecommendation};
    use rstest::rstest;
    use std::collections::BTreeMap;

    fn potential(annual: u64) -> HarvestingPotential {
        HarvestingPotential {
            roof_area_sqft: 1200.0,
            roof_area_sqm: 111.48,
            runoff_coefficient: 0.85,
            system_efficiency: 0.34227,
            collection_efficiency: 0.29,
            monthly_potential: BTreeMap::new(),
            annual_harvestable_liters: annual,
            peak_runoff: PeakRunoff {
                peak_month: rainforge_schemas::climate::Month::Jul,
                peak_monthly_liters: 0,
                estimated_peak_daily_liters: 0,
            },
            storage_recommendations: StorageRecommendation {
                minimum_liters: 0,
                optimal_liters: 0,
                maximum_beneficial_liters: 0,
            },
        }
    }

    fn cost(total: f64) -> CostBreakdown {
        CostBreakdown {
            total_cost: total,
            ..CostBreakdown::zero()
        }
    }

    fn usage(daily: f64) -> UsageProfile {
        UsageProfile {
            household_size: 4,
            daily_consumption_liters: daily,
            current_sources: Default::default(),
            intended_use: Default::default(),
        }
    }

    fn kb() -> KnowledgeBase {
        KnowledgeBase::builtin().unwrap()
    }

    #[test]
    fn delhi_tank_is_beyond_horizon() {
        let kb = kb();
        let a = analyze(
            &potential(25_849),
            &cost(1_362_873.0),
            &usage(600.0),
            RegionType::Urban,
            &kb.costs.tariffs,
            &kb.tuning().finance,
        );
        assert_eq!(a.annual_water_savings_liters, 25_849);
        assert!((a.annual_cost_savings_inr - 387.74).abs() < 0.011);
        assert_eq!(a.payback_status, PaybackStatus::BeyondHorizon);
        assert!((a.payback_period_years - 3_515.0).abs() < 1.0);
        assert!(a.npv_inr < 0.0);
        assert!(a.roi_percentage < 0.0);
        assert_eq!(a.internal_rate_of_return_percent, None);
    }

    #[test]
    fn savings_capped_by_demand() {
        let kb = kb();
        let a = analyze(
            &potential(100_000),
            &cost(50_000.0),
            &usage(100.0),
            RegionType::Rural,
            &kb.costs.tariffs,
            &kb.tuning().finance,
        );
        assert_eq!(a.annual_demand_liters, 36_500);
        assert_eq!(a.annual_water_savings_liters, 36_500);
        assert_eq!(a.annual_cost_savings_inr, 292.0);
    }

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(10_000.0, 0.0)]
    #[case(10_000.0, 0.004)]
    fn zero_savings_use_sentinel(#[case] total_cost: f64, #[case] savings: f64) {
        let f = kb().tuning().finance.clone();
        let (years, status) = payback(total_cost, round_to(savings, 2), &f);
        assert_eq!(years, 9999.0);
        assert!(years.is_finite());
        assert_eq!(status, PaybackStatus::NotRecoverable);
    }

    #[rstest]
    #[case(10_000.0, 1_000.0, 10.0, PaybackStatus::WithinHorizon)]
    #[case(20_000.0, 1_000.0, 20.0, PaybackStatus::WithinHorizon)]
    #[case(21_000.0, 1_000.0, 21.0, PaybackStatus::BeyondHorizon)]
    #[case(1e9, 1.0, 9999.0, PaybackStatus::BeyondHorizon)]
    fn payback_status_by_horizon(
        #[case] total_cost: f64,
        #[case] savings: f64,
        #[case] expected_years: f64,
        #[case] expected: PaybackStatus,
    ) {
        let f = kb().tuning().finance.clone();
        assert_eq!(payback(total_cost, savings, &f), (expected_years, expected));
    }

    #[test]
    fn irr_recovers_known_rate() {
        // Annuity factor at 10% over 20 years is 8.5136.
        let irr = internal_rate_of_return(85_136.0, 10_000.0, 20).unwrap();
        assert!((irr - 10.0).abs() < 0.01);
        assert_eq!(internal_rate_of_return(300_000.0, 10_000.0, 20), None);
        assert_eq!(internal_rate_of_return(0.0, 10_000.0, 20), None);
    }

    #[test]
    fn cash_flow_starts_at_cost_and_accumulates() {
        let f = kb().tuning().finance.clone();
        let flow = cash_flow(1_000.0, 5_000.0, &f);
        assert_eq!(flow.len(), 21);
        assert_eq!(flow[0].net_position_inr, -5_000.0);
        assert_eq!(flow[5].net_position_inr, 0.0);
        assert_eq!(flow[20].cumulative_savings_inr, 20_000.0);
        assert!(flow[20].cumulative_discounted_savings_inr < 20_000.0);
    }

    #[rstest]
    #[case(10.0, 50_000, 10_000.0, RiskLevel::Low)]
    #[case(30.0, 50_000, 10_000.0, RiskLevel::Medium)]
    #[case(30.0, 1_000, 200_000.0, RiskLevel::High)]
    fn risk_levels(
        #[case] payback: f64,
        #[case] annual: u64,
        #[case] total_cost: f64,
        #[case] expected: RiskLevel,
    ) {
        let kb = kb();
        let mut a = analyze(
            &potential(annual),
            &cost(total_cost),
            &usage(600.0),
            RegionType::Urban,
            &kb.costs.tariffs,
            &kb.tuning().finance,
        );
        a.payback_period_years = payback;
        let r = risk(&a, &potential(annual), total_cost, &kb.tuning().finance);
        assert_eq!(r.risk_level, expected);
        assert_eq!(r.mitigation_strategies.len(), 4);
    }

    #[test]
    fn environment_uses_configured_factors() {
        let kb = kb();
        let e = environmental_impact(&potential(25_849), &kb.tuning().environment);
        assert_eq!(e.annual_recharge_liters, 7_755);
        assert_eq!(e.annual_co2_savings_kg, 155.1);
        assert_eq!(e.water_security_value_inr, 51_698.0);
    }
}
