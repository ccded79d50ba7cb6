//! Live climate from a daily historical-weather archive.
//!
//! The payload follows the Open-Meteo archive shape: parallel `daily.time`
//! and `daily.precipitation_sum` arrays. Daily totals are summed per calendar
//! month and divided by the number of distinct years observed.

use crate::error::SourceError;
use crate::resolver::sources::ClimateSource;
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use rainforge_schemas::{
    climate::{ClimateProfile, Month, MonthlySeries, Provenance},
    environment::Coordinates,
};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Grid snapping in the archive can move the reported point slightly; anything
/// further away is data for somewhere else.
const MAX_GRID_OFFSET_DEG: f64 = 0.5;

/// Retrieves the raw archive payload for a coordinate.
#[async_trait]
pub trait ArchiveFetcher: Send + Sync {
    async fn fetch(&self, coords: Coordinates) -> Result<String, SourceError>;
}

#[derive(Debug, Deserialize)]
struct ArchivePayload {
    latitude: Option<f64>,
    longitude: Option<f64>,
    daily: DailySeries,
}

#[derive(Debug, Deserialize)]
struct DailySeries {
    time: Vec<String>,
    precipitation_sum: Vec<Option<f64>>,
}

pub struct HistoricalArchiveSource<F: ArchiveFetcher> {
    fetcher: F,
}

impl<F: ArchiveFetcher> HistoricalArchiveSource<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl<F: ArchiveFetcher> ClimateSource for HistoricalArchiveSource<F> {
    fn name(&self) -> &str {
        "historical_archive"
    }

    async fn fetch_historical(&self, coords: Coordinates) -> Result<ClimateProfile, SourceError> {
        let raw = self.fetcher.fetch(coords).await?;
        parse_archive(&raw, &coords)
    }
}

/// Turns an archive payload into a mean-year climate profile.
///
/// # Errors
///
/// `Malformed` for unparseable JSON or dates, mismatched arrays, negative or
/// non-finite totals, or a payload with no observations. `OutOfRange` when the
/// payload describes a point far from the one requested.
pub fn parse_archive(raw: &str, requested: &Coordinates) -> Result<ClimateProfile, SourceError> {
    let payload: ArchivePayload =
        serde_json::from_str(raw).map_err(|e| SourceError::Malformed(e.to_string()))?;

    if let (Some(lat), Some(lng)) = (payload.latitude, payload.longitude) {
        let offset = Coordinates::new(lat, lng).distance_deg(requested);
        if offset > MAX_GRID_OFFSET_DEG {
            return Err(SourceError::OutOfRange(format!(
                "payload is for ({}, {}), {:.2} deg from the request",
                lat, lng, offset
            )));
        }
    }

    let daily = payload.daily;
    if daily.time.len() != daily.precipitation_sum.len() {
        return Err(SourceError::Malformed(format!(
            "{} dates but {} precipitation values",
            daily.time.len(),
            daily.precipitation_sum.len()
        )));
    }

    let mut totals: BTreeMap<Month, f64> = BTreeMap::new();
    let mut years = BTreeSet::new();
    for (day, value) in daily.time.iter().zip(daily.precipitation_sum.iter()) {
        let date = NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .map_err(|e| SourceError::Malformed(format!("bad date '{}': {}", day, e)))?;
        let Some(mm) = value else { continue };
        if !mm.is_finite() || *mm < 0.0 {
            return Err(SourceError::Malformed(format!("precipitation {} on {}", mm, day)));
        }
        let month = Month::from_number(date.month())
            .ok_or_else(|| SourceError::Malformed(format!("bad month in '{}'", day)))?;
        *totals.entry(month).or_insert(0.0) += mm;
        years.insert(date.year());
    }

    if years.is_empty() {
        return Err(SourceError::Malformed("payload holds no observations".into()));
    }

    let year_count = years.len() as f64;
    debug!(years = years.len(), "Aggregated archive observations");
    let monthly = MonthlySeries::from_fn(|m| {
        let mean = totals.get(&m).copied().unwrap_or(0.0) / year_count;
        (mean * 10.0).round() / 10.0
    });
    Ok(ClimateProfile::from_monthly(monthly, Provenance::Live, "historical_archive"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn here() -> Coordinates {
        Coordinates::new(28.6, 77.2)
    }

    #[test]
    fn two_years_average_into_one_profile() {
        let raw = r#"{
            "latitude": 28.625, "longitude": 77.25,
            "daily": {
                "time": ["2022-07-01", "2022-07-02", "2023-07-01", "2023-01-15", "2023-02-01"],
                "precipitation_sum": [100.0, 50.0, 150.0, 20.0, null]
            }
        }"#;
        let p = parse_archive(raw, &here()).unwrap();
        assert_eq!(p.source, Provenance::Live);
        assert_eq!(p.monthly_distribution.get(Month::Jul), 150.0);
        assert_eq!(p.monthly_distribution.get(Month::Jan), 10.0);
        assert_eq!(p.monthly_distribution.get(Month::Feb), 0.0);
        assert_eq!(p.annual_rainfall_mm, 160.0);
        assert_eq!(p.peak_months[0], Month::Jul);
        assert!(p.monthly_distribution.is_complete());
    }

    #[test]
    fn mismatched_arrays_are_malformed() {
        let raw = r#"{"daily": {"time": ["2022-07-01"], "precipitation_sum": [1.0, 2.0]}}"#;
        assert!(matches!(parse_archive(raw, &here()), Err(SourceError::Malformed(_))));
    }

    #[test]
    fn negative_rain_is_malformed() {
        let raw = r#"{"daily": {"time": ["2022-07-01"], "precipitation_sum": [-3.0]}}"#;
        assert!(matches!(parse_archive(raw, &here()), Err(SourceError::Malformed(_))));
    }

    #[test]
    fn bad_dates_and_empty_payloads_are_malformed() {
        let raw = r#"{"daily": {"time": ["07/01/2022"], "precipitation_sum": [3.0]}}"#;
        assert!(matches!(parse_archive(raw, &here()), Err(SourceError::Malformed(_))));
        let raw = r#"{"daily": {"time": [], "precipitation_sum": []}}"#;
        assert!(matches!(parse_archive(raw, &here()), Err(SourceError::Malformed(_))));
    }

    #[test]
    fn payload_for_another_place_is_out_of_range() {
        let raw = r#"{"latitude": 19.0, "longitude": 72.8,
            "daily": {"time": ["2022-07-01"], "precipitation_sum": [3.0]}}"#;
        assert!(matches!(parse_archive(raw, &here()), Err(SourceError::OutOfRange(_))));
    }
}
