use crate::error::RainforgeError;
use csv::Writer;
use rainforge_schemas::{climate::Month, report::AnalysisResult};
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize)]
struct MonthlyRow {
    month: Month,
    rainfall_mm: f64,
    harvest_liters: u64,
}

#[derive(Debug, Serialize)]
struct CashFlowRow {
    year: u32,
    cumulative_savings_inr: f64,
    cumulative_discounted_savings_inr: f64,
    net_position_inr: f64,
}

/// Writes the tabular parts of a report as CSV.
pub struct ReportTableWriter {
    path: String,
    writer: Writer<fs::File>,
}

impl ReportTableWriter {
    pub fn new(path: &Path) -> Result<Self, RainforgeError> {
        let path = path.display().to_string();
        let writer =
            Writer::from_path(&path).map_err(|e| RainforgeError::CsvError(path.clone(), e))?;
        Ok(Self { path, writer })
    }

    fn row<T: Serialize>(&mut self, row: T) -> Result<(), RainforgeError> {
        self.writer
            .serialize(row)
            .map_err(|e| RainforgeError::CsvError(self.path.clone(), e))
    }

    fn finish(mut self) -> Result<(), RainforgeError> {
        self.writer
            .flush()
            .map_err(|e| RainforgeError::FileIO(self.path.clone(), e))
    }
}

/// One row per calendar month: rainfall and harvestable liters.
pub fn write_monthly_potential(path: &Path, result: &AnalysisResult) -> Result<(), RainforgeError> {
    let mut w = ReportTableWriter::new(path)?;
    let rainfall = &result.rainfall_data.profile.monthly_distribution;
    for month in Month::ALL {
        w.row(MonthlyRow {
            month,
            rainfall_mm: rainfall.get(month),
            harvest_liters: result
                .harvesting_potential
                .monthly_potential
                .get(&month)
                .copied()
                .unwrap_or(0),
        })?;
    }
    w.finish()
}

pub fn write_cash_flow(path: &Path, result: &AnalysisResult) -> Result<(), RainforgeError> {
    let mut w = ReportTableWriter::new(path)?;
    for year in &result.cost_benefit_analysis.cash_flow {
        w.row(CashFlowRow {
            year: year.year,
            cumulative_savings_inr: year.cumulative_savings_inr,
            cumulative_discounted_savings_inr: year.cumulative_discounted_savings_inr,
            net_position_inr: year.net_position_inr,
        })?;
    }
    w.finish()
}
