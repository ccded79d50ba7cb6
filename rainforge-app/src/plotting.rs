use anyhow::Result;
use plotters::prelude::*;
use rainforge_schemas::{climate::Month, report::AnalysisResult};
use std::path::Path;

pub fn generate_all_plots(output_dir: &Path, result: &AnalysisResult) -> Result<()> {
    plot_monthly_harvest(output_dir, result)?;
    plot_cash_flow(output_dir, result)?;
    Ok(())
}

/// Rainfall on the left axis, harvestable liters on the right.
fn plot_monthly_harvest(output_dir: &Path, result: &AnalysisResult) -> Result<()> {
    let path = output_dir.join("1_monthly_harvest.png");
    let root = BitMapBackend::new(&path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let rainfall = &result.rainfall_data.profile.monthly_distribution;
    let harvest = &result.harvesting_potential.monthly_potential;
    let max_rain = rainfall.iter().map(|(_, mm)| mm).fold(1.0, f64::max);
    let max_harvest = harvest.values().copied().max().unwrap_or(0).max(1) as f64;

    let mut chart = ChartBuilder::on(&root)
        .caption("Monthly Rainfall and Harvest Potential", ("sans-serif", 50).into_font())
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .right_y_label_area_size(60)
        .build_cartesian_2d(1u32..12u32, 0f64..max_rain * 1.1)?
        .set_secondary_coord(1u32..12u32, 0f64..max_harvest * 1.1);

    chart
        .configure_mesh()
        .x_desc("Month")
        .y_desc("Rainfall (mm)")
        .x_label_formatter(&|m| {
            Month::from_number(*m).map_or(String::new(), |m| m.abbrev().to_string())
        })
        .draw()?;
    chart.configure_secondary_axes().y_desc("Harvest (L)").draw()?;

    chart
        .draw_series(LineSeries::new(
            rainfall.iter().map(|(m, mm)| (m.number(), mm)),
            BLUE.stroke_width(2),
        ))?
        .label("Rainfall (mm)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.filled()));

    chart
        .draw_secondary_series(LineSeries::new(
            harvest.iter().map(|(m, l)| (m.number(), *l as f64)),
            GREEN.stroke_width(2),
        ))?
        .label("Harvest (L)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN.filled()));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

/// Cumulative savings against the upfront cost over the horizon.
fn plot_cash_flow(output_dir: &Path, result: &AnalysisResult) -> Result<()> {
    let path = output_dir.join("2_cash_flow.png");
    let root = BitMapBackend::new(&path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let flow = &result.cost_benefit_analysis.cash_flow;
    let total_cost = result.cost_analysis.total_cost;
    let horizon = flow.last().map_or(1, |y| y.year.max(1));
    let max_value = flow
        .iter()
        .map(|y| y.cumulative_savings_inr)
        .fold(total_cost, f64::max)
        .max(1.0);

    let mut chart = ChartBuilder::on(&root)
        .caption("Cumulative Savings vs Investment", ("sans-serif", 50).into_font())
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(80)
        .build_cartesian_2d(0u32..horizon, 0f64..max_value * 1.1)?;

    chart.configure_mesh().x_desc("Year").y_desc("INR").draw()?;

    chart
        .draw_series(LineSeries::new(
            flow.iter().map(|y| (y.year, y.cumulative_savings_inr)),
            GREEN.stroke_width(2),
        ))?
        .label("Cumulative savings")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN.filled()));

    chart
        .draw_series(LineSeries::new(
            flow.iter().map(|y| (y.year, y.cumulative_discounted_savings_inr)),
            BLUE.stroke_width(2),
        ))?
        .label("Discounted savings")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.filled()));

    chart
        .draw_series(DashedLineSeries::new(
            [(0, total_cost), (horizon, total_cost)],
            5,
            5,
            RED.stroke_width(2),
        ))?
        .label("Upfront cost")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.filled()));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}
