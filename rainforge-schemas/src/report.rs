use crate::climate::{ClimateProfile, CollectionWindow, MonsoonAnalysis};
use crate::feasibility::FeasibilityScore;
use crate::potential::HarvestingPotential;
use crate::property::RegionType;
use crate::soil::{AdministrativeRegion, AquiferInfo, DepthRange, RechargeAssessment, SoilProfile};
use crate::structure::SystemRecommendations;
use crate::tea_lca::{CostBenefitAnalysis, CostBreakdown, EnvironmentalImpact, FinancialAnalysis};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationReport {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
    pub region_type: RegionType,
    pub administrative_info: AdministrativeRegion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainfallReport {
    #[serde(flatten)]
    pub profile: ClimateProfile,
    pub monsoon_analysis: MonsoonAnalysis,
    pub collection_window: CollectionWindow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilGeologyReport {
    #[serde(flatten)]
    pub profile: SoilProfile,
    pub recharge_assessment: RechargeAssessment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundwaterReport {
    pub depth_range: DepthRange,
    pub depth_to_groundwater: String,
    pub aquifer_prospects: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_aquifer: Option<AquiferInfo>,
    pub recharge_potential: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplementationPhase {
    pub phase: u32,
    pub name: String,
    pub duration: String,
    pub activities: Vec<String>,
    pub estimated_cost_inr: f64,
    pub deliverables: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplementationPlan {
    pub total_duration: String,
    pub project_phases: Vec<ImplementationPhase>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceCostEstimates {
    pub routine_monthly_cost: String,
    pub quarterly_maintenance: String,
    pub annual_major_service: String,
    pub total_annual_budget: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceSchedule {
    pub weekly_during_monsoon: Vec<String>,
    pub monthly_throughout_year: Vec<String>,
    pub quarterly_maintenance: Vec<String>,
    pub annual_major_maintenance: Vec<String>,
    pub cost_estimates: MaintenanceCostEstimates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceIndicators {
    pub water_quantity: Vec<String>,
    pub water_quality: Vec<String>,
    pub system_performance: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringSchedule {
    pub daily: Vec<String>,
    pub weekly: Vec<String>,
    pub monthly: Vec<String>,
    pub quarterly: Vec<String>,
    pub annually: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceTargets {
    pub collection_efficiency: String,
    pub system_uptime: String,
    pub water_quality: String,
    pub cost_savings: String,
}

/// What to measure once the system is running, how often, and against which
/// targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMonitoring {
    pub key_performance_indicators: PerformanceIndicators,
    pub monitoring_schedule: MonitoringSchedule,
    pub monitoring_tools: Vec<String>,
    pub performance_targets: PerformanceTargets,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subsidy {
    pub scheme: String,
    pub amount: String,
    pub eligibility: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulatoryInfo {
    pub local_mandate: String,
    pub authority: String,
    pub required_permits: Vec<String>,
    pub available_subsidies: Vec<Subsidy>,
    pub compliance_timeline: String,
    pub technical_standards: String,
    pub inspection_requirements: String,
}

/// The complete analysis for one request. Holds no timestamps, so identical
/// inputs serialize to identical bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub location: LocationReport,
    pub feasibility_analysis: FeasibilityScore,
    pub rainfall_data: RainfallReport,
    pub soil_and_geology: SoilGeologyReport,
    pub groundwater_and_aquifer: GroundwaterReport,
    pub harvesting_potential: HarvestingPotential,
    pub system_recommendations: SystemRecommendations,
    pub cost_analysis: CostBreakdown,
    pub financial_analysis: FinancialAnalysis,
    pub cost_benefit_analysis: CostBenefitAnalysis,
    pub environmental_impact: EnvironmentalImpact,
    pub implementation_plan: ImplementationPlan,
    pub maintenance_schedule: MaintenanceSchedule,
    pub performance_monitoring: PerformanceMonitoring,
    pub regulatory_info: RegulatoryInfo,
}
