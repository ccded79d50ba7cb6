use crate::plotting;
use anyhow::{Context, Result};
use rainforge_core::{export, pipeline::AnalysisEngine};
use rainforge_schemas::{report::AnalysisResult, request::AnalysisRequest};
use serde::Serialize;
use std::{fs, path::Path};
use tracing::info;

/// `report.json` layout. The run timestamp lives here, outside the analysis
/// result, so results stay byte-for-byte reproducible.
#[derive(Serialize)]
struct ReportEnvelope<'a> {
    generated_at: String,
    request: &'a AnalysisRequest,
    analysis: &'a AnalysisResult,
}

/// Runs one request and writes every artifact into `output_dir`.
pub async fn run(
    engine: &AnalysisEngine,
    request: &AnalysisRequest,
    output_dir: &Path,
) -> Result<AnalysisResult> {
    let result = engine.analyze(request).await.context("Analysis failed")?;
    write_report_and_tables(request, &result, output_dir)?;
    plotting::generate_all_plots(output_dir, &result).context("Failed to render charts")?;
    info!(dir = %output_dir.display(), "Artifacts written");
    print_summary(&result);
    Ok(result)
}

pub fn write_report_and_tables(
    request: &AnalysisRequest,
    result: &AnalysisResult,
    output_dir: &Path,
) -> Result<()> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    let envelope = ReportEnvelope {
        generated_at: chrono::Utc::now().to_rfc3339(),
        request,
        analysis: result,
    };
    let report_path = output_dir.join("report.json");
    let json = serde_json::to_string_pretty(&envelope).context("Failed to serialize report")?;
    fs::write(&report_path, json).with_context(|| format!("Failed to write {:?}", report_path))?;

    export::write_monthly_potential(&output_dir.join("monthly_potential.csv"), result)
        .context("Failed to write monthly potential table")?;
    export::write_cash_flow(&output_dir.join("cash_flow.csv"), result)
        .context("Failed to write cash flow table")?;
    Ok(())
}

fn print_summary(r: &AnalysisResult) {
    let primary = &r.system_recommendations.primary_recommendation;
    let cost = &r.cost_analysis;
    let fin = &r.financial_analysis;

    println!("\n\n--- [Final Summary Report] ---");
    println!("========================================");
    println!("Site: {} ({:.4}, {:.4})", r.location.address, r.location.lat, r.location.lng);
    println!(
        "  - Region: {} | State: {}",
        r.location.region_type, r.location.administrative_info.state
    );
    println!(
        "  - Rainfall: {:.1} mm/yr ({}) | Soil: {}",
        r.rainfall_data.profile.annual_rainfall_mm,
        r.rainfall_data.profile.source_name,
        r.soil_and_geology.profile.soil_type
    );
    println!("----------------------------------------");

    println!("\nFeasibility:");
    println!(
        "  - Score: {}/{} ({})",
        r.feasibility_analysis.total_score,
        r.feasibility_analysis.max_score,
        r.feasibility_analysis.feasibility_level
    );
    for (criterion, points) in &r.feasibility_analysis.component_scores {
        let cap = r.feasibility_analysis.component_caps.get(criterion).copied().unwrap_or(0);
        println!("    - {:<18} {:>3}/{}", format!("{:?}", criterion), points, cap);
    }

    println!("\nHarvest Potential:");
    println!(
        "  - Annual Harvest:           {:>10} L",
        r.harvesting_potential.annual_harvestable_liters
    );
    let s = &r.harvesting_potential.storage_recommendations;
    println!(
        "  - Storage (min/opt/max):    {} / {} / {} L",
        s.minimum_liters, s.optimal_liters, s.maximum_beneficial_liters
    );

    println!("\nRecommended System: {}", primary.title);
    for alt in &r.system_recommendations.alternative_options {
        println!("  - Alternative: {:<40} INR {:>12.0}", alt.title, alt.estimated_cost_inr);
    }

    println!("\nCost Breakdown:");
    println!("  - Tank / Civil Works:       INR {:>12.0}", cost.tank_cost);
    println!("  - Filtration:               INR {:>12.0}", cost.filtration_cost);
    println!("  - Pump:                     INR {:>12.0}", cost.pump_cost);
    println!("  - Installation:             INR {:>12.0}", cost.installation_cost);
    println!("  - Contingency:              INR {:>12.0}", cost.contingency);
    println!("  --------------------------------------");
    println!("  - Total:                    INR {:>12.0}", cost.total_cost);

    println!("\nFinancials ({} years):", fin.horizon_years);
    println!("  - Annual Savings:           INR {:>12.2}", fin.annual_cost_savings_inr);
    println!(
        "  - Payback:                  {:>12.1} years ({:?})",
        fin.payback_period_years, fin.payback_status
    );
    println!("  - NPV:                      INR {:>12.2}", fin.npv_inr);
    println!("  - ROI:                      {:>12.2} %", fin.roi_percentage);
    println!(
        "  - Risk Level:               {:?}",
        r.cost_benefit_analysis.risk_assessment.risk_level
    );

    println!("\nEnvironmental Impact:");
    println!(
        "  - Groundwater Recharge:     {:>10} L/yr",
        r.environmental_impact.annual_recharge_liters
    );
    println!(
        "  - CO2 Avoided:              {:>10.1} kg/yr",
        r.environmental_impact.annual_co2_savings_kg
    );
    println!("========================================");
}
