use crate::environment::Coordinates;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    /// Calendar month from 1-based number.
    pub fn from_number(n: u32) -> Option<Month> {
        Month::ALL.get(n.checked_sub(1)? as usize).copied()
    }

    pub fn number(&self) -> u32 {
        *self as u32 + 1
    }

    pub fn abbrev(&self) -> &'static str {
        match self {
            Month::Jan => "Jan",
            Month::Feb => "Feb",
            Month::Mar => "Mar",
            Month::Apr => "Apr",
            Month::May => "May",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Aug => "Aug",
            Month::Sep => "Sep",
            Month::Oct => "Oct",
            Month::Nov => "Nov",
            Month::Dec => "Dec",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbrev())
    }
}

/// Month to value map. Missing months read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthlySeries(pub BTreeMap<Month, f64>);

impl MonthlySeries {
    pub fn from_fn<F: Fn(Month) -> f64>(f: F) -> Self {
        Self(Month::ALL.iter().map(|&m| (m, f(m))).collect())
    }

    pub fn get(&self, month: Month) -> f64 {
        self.0.get(&month).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// True when all twelve months are present, finite and non-negative.
    pub fn is_complete(&self) -> bool {
        Month::ALL.iter().all(|m| {
            self.0
                .get(m)
                .map_or(false, |v| v.is_finite() && *v >= 0.0)
        })
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self(self.0.iter().map(|(m, v)| (*m, v * factor)).collect())
    }

    /// The `n` wettest months, wettest first. Ties keep calendar order.
    pub fn top_months(&self, n: usize) -> Vec<Month> {
        let mut ranked: Vec<(Month, f64)> = self.0.iter().map(|(m, v)| (*m, *v)).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.into_iter().take(n).map(|(m, _)| m).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Month, f64)> + '_ {
        self.0.iter().map(|(m, v)| (*m, *v))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Live,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateProfile {
    pub annual_rainfall_mm: f64,
    pub monthly_distribution: MonthlySeries,
    pub peak_months: Vec<Month>,
    pub source: Provenance,
    pub source_name: String,
}

impl ClimateProfile {
    /// Builds a profile whose annual total and peak months are derived from
    /// the monthly series, so the two can never disagree.
    pub fn from_monthly(
        monthly: MonthlySeries,
        source: Provenance,
        source_name: impl Into<String>,
    ) -> Self {
        let annual = (monthly.total() * 10.0).round() / 10.0;
        let peak_months = monthly.top_months(3);
        Self {
            annual_rainfall_mm: annual,
            monthly_distribution: monthly,
            peak_months,
            source,
            source_name: source_name.into(),
        }
    }

    pub fn with_rainfall_scaled(&self, factor: f64) -> Self {
        Self::from_monthly(
            self.monthly_distribution.scaled(factor),
            self.source,
            self.source_name.clone(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRainfall {
    pub city_id: String,
    pub centroid: Coordinates,
    pub monthly_rainfall_mm: MonthlySeries,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateDefault {
    pub name: String,
    pub monthly_rainfall_mm: MonthlySeries,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RainfallPattern {
    #[serde(rename = "Monsoon Dominated")]
    MonsoonDominated,
    #[serde(rename = "Bi-modal (Monsoon + Post-Monsoon)")]
    BiModal,
    #[serde(rename = "Distributed Pattern")]
    Distributed,
    #[serde(rename = "Monsoon with Extended Season")]
    MonsoonWithExtendedSeason,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsoonAnalysis {
    pub monsoon_concentration_percent: f64,
    pub pre_monsoon_percent: f64,
    pub post_monsoon_percent: f64,
    pub winter_percent: f64,
    pub pattern_type: RainfallPattern,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionWindow {
    pub primary_collection_months: Vec<Month>,
    pub collection_season_type: String,
    pub effective_collection_months: usize,
    pub storage_strategy: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_numbers_round_trip() {
        for m in Month::ALL {
            assert_eq!(Month::from_number(m.number()), Some(m));
        }
        assert_eq!(Month::from_number(0), None);
        assert_eq!(Month::from_number(13), None);
    }

    #[test]
    fn top_months_breaks_ties_by_calendar_order() {
        let series = MonthlySeries::from_fn(|m| match m {
            Month::Jul | Month::Aug => 200.0,
            Month::Sep => 150.0,
            _ => 10.0,
        });
        assert_eq!(series.top_months(3), vec![Month::Jul, Month::Aug, Month::Sep]);
    }

    #[test]
    fn incomplete_series_is_detected() {
        let mut series = MonthlySeries::from_fn(|_| 10.0);
        assert!(series.is_complete());
        series.0.remove(&Month::Feb);
        assert!(!series.is_complete());
        series.0.insert(Month::Feb, -1.0);
        assert!(!series.is_complete());
    }

    #[test]
    fn series_serializes_with_lowercase_month_keys() {
        let series = MonthlySeries::from_fn(|m| m.number() as f64);
        let json = serde_json::to_value(&series).unwrap();
        assert_eq!(json["jan"], 1.0);
        assert_eq!(json["dec"], 12.0);
    }
}
