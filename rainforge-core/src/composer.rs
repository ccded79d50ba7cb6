//! Descriptive sections of the report: rainfall character, soil recharge
//! assessment, groundwater summary, implementation plan, maintenance,
//! performance monitoring and regulatory guidance.

use rainforge_schemas::{
    climate::{ClimateProfile, CollectionWindow, Month, MonsoonAnalysis, RainfallPattern},
    report::{
        GroundwaterReport, ImplementationPhase, ImplementationPlan, MaintenanceCostEstimates,
        MaintenanceSchedule, MonitoringSchedule, PerformanceIndicators, PerformanceMonitoring,
        PerformanceTargets, RegulatoryInfo, Subsidy,
    },
    soil::{
        AdministrativeRegion, InfiltrationBand, RechargeAssessment, RechargeSuitability,
        SoilProfile,
    },
    tuning::ImplementationTemplate,
};

const MONSOON: [Month; 4] = [Month::Jun, Month::Jul, Month::Aug, Month::Sep];
const PRE_MONSOON: [Month; 3] = [Month::Mar, Month::Apr, Month::May];
const POST_MONSOON: [Month; 3] = [Month::Oct, Month::Nov, Month::Dec];
const WINTER: [Month; 2] = [Month::Jan, Month::Feb];

const PRIMARY_MONTH_PERCENT: f64 = 10.0;
const EFFECTIVE_MONTH_PERCENT: f64 = 5.0;

fn share_percent(climate: &ClimateProfile, months: &[Month]) -> f64 {
    let annual = climate.monthly_distribution.total();
    if annual <= 0.0 {
        return 0.0;
    }
    let season: f64 = months.iter().map(|m| climate.monthly_distribution.get(*m)).sum();
    (season / annual * 1000.0).round() / 10.0
}

pub fn monsoon_analysis(climate: &ClimateProfile) -> MonsoonAnalysis {
    let monsoon = share_percent(climate, &MONSOON);
    let post_monsoon = share_percent(climate, &POST_MONSOON);
    let pattern_type = if monsoon > 70.0 {
        RainfallPattern::MonsoonDominated
    } else if post_monsoon > 25.0 {
        RainfallPattern::BiModal
    } else if monsoon < 50.0 {
        RainfallPattern::Distributed
    } else {
        RainfallPattern::MonsoonWithExtendedSeason
    };
    MonsoonAnalysis {
        monsoon_concentration_percent: monsoon,
        pre_monsoon_percent: share_percent(climate, &PRE_MONSOON),
        post_monsoon_percent: post_monsoon,
        winter_percent: share_percent(climate, &WINTER),
        pattern_type,
    }
}

pub fn collection_window(climate: &ClimateProfile) -> CollectionWindow {
    let months_above = |threshold: f64| -> Vec<Month> {
        Month::ALL
            .iter()
            .copied()
            .filter(|m| share_percent(climate, &[*m]) > threshold)
            .collect()
    };
    let effective = months_above(EFFECTIVE_MONTH_PERCENT).len();
    let collection_season_type = match effective {
        n if n >= 4 => "Extended (4+ months)",
        n if n >= 2 => "Moderate (2-3 months)",
        _ => "Short (1-2 months)",
    };
    let storage_strategy = match effective {
        0..=2 => "Large storage capacity needed for dry season supply",
        3 | 4 => "Moderate storage with seasonal usage planning",
        _ => "Smaller storage with continuous harvesting approach",
    };
    CollectionWindow {
        primary_collection_months: months_above(PRIMARY_MONTH_PERCENT),
        collection_season_type: collection_season_type.to_string(),
        effective_collection_months: effective,
        storage_strategy: storage_strategy.to_string(),
    }
}

pub fn recharge_assessment(soil: &SoilProfile) -> RechargeAssessment {
    let band = soil.infiltration_rate;
    let excellent = soil.recharge_suitability == RechargeSuitability::Excellent;
    let (overall, methods, limitation): (&str, &[&str], &str) =
        if band.favours_infiltration() || excellent {
            (
                "Excellent",
                &["Recharge pits", "Percolation tanks", "Trenches"],
                "Minimal - regular maintenance needed",
            )
        } else if matches!(band, InfiltrationBand::Medium | InfiltrationBand::MediumHigh) {
            (
                "Good",
                &["Recharge trenches", "Modified pits", "Injection wells"],
                "May need filter media enhancement",
            )
        } else {
            (
                "Moderate",
                &["Injection wells", "Deep recharge shafts"],
                "Requires specialized design for low permeability",
            )
        };
    let recommended_approach = match band {
        InfiltrationBand::High | InfiltrationBand::VeryHigh => {
            "Primary focus on artificial recharge with supplementary storage"
        }
        InfiltrationBand::Medium | InfiltrationBand::MediumHigh => {
            "Balanced approach - combine storage and recharge systems"
        }
        InfiltrationBand::Low | InfiltrationBand::Variable => {
            "Storage-focused approach with limited recharge options"
        }
    };
    RechargeAssessment {
        overall_suitability: overall.to_string(),
        recommended_methods: methods.iter().map(|s| s.to_string()).collect(),
        limitations: vec![limitation.to_string()],
        enhancement_options: soil.enhancement_options.clone(),
        recommended_approach: recommended_approach.to_string(),
    }
}

pub fn groundwater_report(soil: &SoilProfile) -> GroundwaterReport {
    GroundwaterReport {
        depth_range: soil.groundwater_depth,
        depth_to_groundwater: soil.groundwater_depth.label(),
        aquifer_prospects: soil.aquifer_prospects.clone(),
        principal_aquifer: soil.principal_aquifer_info.clone(),
        recharge_potential: soil.recharge_potential.clone(),
    }
}

/// Splits the total cost across the configured phases. The last phase takes
/// the remainder so the phase costs add up to the total exactly.
pub fn implementation_plan(
    total_cost: f64,
    template: &ImplementationTemplate,
) -> ImplementationPlan {
    let mut allocated = 0.0;
    let last = template.phases.len().saturating_sub(1);
    let project_phases = template
        .phases
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let estimated_cost_inr = if i == last {
                total_cost - allocated
            } else {
                (total_cost * p.cost_fraction).round()
            };
            allocated += estimated_cost_inr;
            ImplementationPhase {
                phase: i as u32 + 1,
                name: p.name.clone(),
                duration: p.duration.clone(),
                activities: p.activities.clone(),
                estimated_cost_inr,
                deliverables: p.deliverables.clone(),
            }
        })
        .collect();
    ImplementationPlan {
        total_duration: template.total_duration.clone(),
        project_phases,
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn maintenance_schedule() -> MaintenanceSchedule {
    MaintenanceSchedule {
        weekly_during_monsoon: strings(&[
            "Clean gutters and remove debris",
            "Check first flush diverter operation",
            "Inspect roof surface for damage",
            "Monitor water levels and quality",
        ]),
        monthly_throughout_year: strings(&[
            "Clean mesh filters and leaf guards",
            "Test pump operation and pressure",
            "Check pipe joints for leaks",
            "Inspect storage tank exterior",
        ]),
        quarterly_maintenance: strings(&[
            "Replace/clean filter media",
            "Comprehensive system performance check",
            "Water quality testing (pH, TDS, bacteria)",
            "Electrical connections inspection",
        ]),
        annual_major_maintenance: strings(&[
            "Complete tank cleaning and disinfection",
            "Professional system audit and optimization",
            "Pump servicing and electrical safety check",
            "Structural inspection of all components",
            "Performance evaluation and upgrade recommendations",
        ]),
        cost_estimates: MaintenanceCostEstimates {
            routine_monthly_cost: "₹500-800".to_string(),
            quarterly_maintenance: "₹1,500-2,500".to_string(),
            annual_major_service: "₹8,000-12,000".to_string(),
            total_annual_budget: "₹15,000-20,000".to_string(),
        },
    }
}

pub fn performance_monitoring() -> PerformanceMonitoring {
    PerformanceMonitoring {
        key_performance_indicators: PerformanceIndicators {
            water_quantity: strings(&[
                "Monthly water harvested (liters)",
                "System efficiency percentage",
                "Storage utilization rate",
                "Overflow frequency and volume",
            ]),
            water_quality: strings(&[
                "pH levels (6.5-8.5 range)",
                "Turbidity (< 5 NTU)",
                "Total dissolved solids",
                "Bacterial contamination levels",
            ]),
            system_performance: strings(&[
                "Pump operational hours",
                "Filter replacement frequency",
                "Energy consumption",
                "Maintenance cost per month",
            ]),
        },
        monitoring_schedule: MonitoringSchedule {
            daily: strings(&["Visual inspection", "Basic system checks"]),
            weekly: strings(&["Water level monitoring", "Quality assessment"]),
            monthly: strings(&["Performance data analysis", "Preventive maintenance"]),
            quarterly: strings(&["Comprehensive system audit", "Water quality testing"]),
            annually: strings(&["System upgrade assessment", "Cost-benefit review"]),
        },
        monitoring_tools: strings(&[
            "Water level sensors with alerts",
            "Flow meters for harvest measurement",
            "Basic water quality test kits",
            "Mobile app for data logging",
        ]),
        performance_targets: PerformanceTargets {
            collection_efficiency: ">75% of theoretical potential".to_string(),
            system_uptime: ">95% during monsoon season".to_string(),
            water_quality: "Meet IS 10500 standards for intended use".to_string(),
            cost_savings: "Achieve projected savings within 10% variance".to_string(),
        },
    }
}

fn subsidy(scheme: &str, amount: &str, eligibility: &str) -> Subsidy {
    Subsidy {
        scheme: scheme.to_string(),
        amount: amount.to_string(),
        eligibility: eligibility.to_string(),
    }
}

pub fn regulatory_info(region: &AdministrativeRegion) -> RegulatoryInfo {
    match region.state.as_str() {
        "Delhi" => RegulatoryInfo {
            local_mandate: "Mandatory for plots >100 sq m under Delhi Building Bye-laws"
                .to_string(),
            authority: "Delhi Jal Board and DDA".to_string(),
            required_permits: strings(&[
                "Building plan approval",
                "DJB NoC",
                "Electrical safety clearance",
            ]),
            available_subsidies: vec![
                subsidy("DJB RTRWH Subsidy", "₹15,000", "Residential properties"),
                subsidy("Delhi Solar Policy", "₹5,000", "With solar integration"),
            ],
            compliance_timeline: "Must be completed before occupancy certificate".to_string(),
            technical_standards: "As per CPWD guidelines and IS codes".to_string(),
            inspection_requirements: "Pre-monsoon system check mandatory".to_string(),
        },
        "Maharashtra" => RegulatoryInfo {
            local_mandate: "Compulsory for plots >300 sq m in Mumbai, >500 sq m in other cities"
                .to_string(),
            authority: "Maharashtra Water Resources Department".to_string(),
            required_permits: strings(&["Municipal building approval", "Water supply NOC"]),
            available_subsidies: vec![subsidy(
                "Jal Yukt Shivar",
                "₹10,000-25,000",
                "Rural and semi-urban",
            )],
            compliance_timeline: "Within 6 months of building construction".to_string(),
            technical_standards: "Maharashtra RTRWH guidelines 2019".to_string(),
            inspection_requirements: "Annual compliance certificate".to_string(),
        },
        _ => RegulatoryInfo {
            local_mandate: "Check with local municipal corporation/panchayat".to_string(),
            authority: "State Water Resources Department".to_string(),
            required_permits: strings(&["Building plan approval", "Local body NOC"]),
            available_subsidies: Vec::new(),
            compliance_timeline: "Usually before occupancy certificate".to_string(),
            technical_standards: "Follow BIS and CPWD guidelines".to_string(),
            inspection_requirements: "As per local regulations".to_string(),
        },
    }
}
