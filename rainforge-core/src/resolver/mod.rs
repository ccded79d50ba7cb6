//! Tiered lookup of climate and soil facts for a coordinate.
//!
//! Sources are tried in order; the first one that answers in time with a
//! sane profile wins. The country default closes every chain, so resolution
//! itself never fails.

pub mod archive;
pub mod sources;

use crate::error::{RainforgeError, SourceError};
use crate::knowledge_base::KnowledgeBase;
use rainforge_schemas::{
    climate::{ClimateProfile, Provenance},
    environment::Coordinates,
    soil::{AdministrativeRegion, SoilProfile},
};
use sources::{ClimateSource, SoilSource};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Wettest long-term station averages are far below this.
const MAX_PLAUSIBLE_ANNUAL_MM: f64 = 15_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct GeoContext {
    pub climate: ClimateProfile,
    pub soil: SoilProfile,
    pub administrative_region: AdministrativeRegion,
}

pub struct GeoResolver {
    kb: Arc<KnowledgeBase>,
    climate_sources: Vec<Arc<dyn ClimateSource>>,
    soil_sources: Vec<Arc<dyn SoilSource>>,
    source_timeout: Duration,
    default_climate: ClimateProfile,
    default_soil: SoilProfile,
}

impl GeoResolver {
    /// # Errors
    ///
    /// `ConfigError` when the country default references an unknown soil type.
    pub fn new(
        kb: Arc<KnowledgeBase>,
        climate_sources: Vec<Arc<dyn ClimateSource>>,
        soil_sources: Vec<Arc<dyn SoilSource>>,
        source_timeout: Duration,
    ) -> Result<Self, RainforgeError> {
        let climate_default = &kb.climate.country_default;
        let default_climate = ClimateProfile::from_monthly(
            climate_default.monthly_rainfall_mm.clone(),
            Provenance::Fallback,
            format!("country_default:{}", climate_default.name),
        );

        let soil_default = &kb.geology.country_default;
        let entry = kb.soil_type(&soil_default.soil_id).ok_or_else(|| {
            RainforgeError::ConfigError(format!(
                "country default soil '{}' is not in the soil catalogue",
                soil_default.soil_id
            ))
        })?;
        let default_soil = sources::soil_profile_from_entry(
            entry,
            soil_default.groundwater_depth,
            None,
            Provenance::Fallback,
            format!("country_default:{}", soil_default.name),
        );

        Ok(Self {
            kb,
            climate_sources,
            soil_sources,
            source_timeout,
            default_climate,
            default_soil,
        })
    }

    pub async fn resolve(&self, coords: Coordinates) -> GeoContext {
        let climate = self.resolve_climate(coords).await;
        let soil = self.resolve_soil(coords).await;
        let administrative_region = self.administrative_region(&coords);
        info!(
            climate_source = %climate.source_name,
            soil_source = %soil.source_name,
            state = %administrative_region.state,
            "Resolved site data"
        );
        GeoContext {
            climate,
            soil,
            administrative_region,
        }
    }

    async fn resolve_climate(&self, coords: Coordinates) -> ClimateProfile {
        for source in &self.climate_sources {
            let answer = timeout(self.source_timeout, source.fetch_historical(coords)).await;
            let outcome = match answer {
                Ok(result) => result.and_then(check_climate),
                Err(_) => Err(SourceError::Timeout(self.source_timeout.as_millis())),
            };
            match outcome {
                Ok(profile) => return profile,
                Err(e) => warn!(
                    source = source.name(),
                    error = %e,
                    "Climate source failed, trying next tier"
                ),
            }
        }
        debug!("Using country default climate");
        self.default_climate.clone()
    }

    async fn resolve_soil(&self, coords: Coordinates) -> SoilProfile {
        for source in &self.soil_sources {
            let outcome = match timeout(self.source_timeout, source.lookup(coords)).await {
                Ok(result) => result.and_then(check_soil),
                Err(_) => Err(SourceError::Timeout(self.source_timeout.as_millis())),
            };
            match outcome {
                Ok(profile) => return profile,
                Err(e) => warn!(
                    source = source.name(),
                    error = %e,
                    "Soil source failed, trying next tier"
                ),
            }
        }
        debug!("Using country default soil");
        self.default_soil.clone()
    }

    fn administrative_region(&self, coords: &Coordinates) -> AdministrativeRegion {
        self.kb
            .geology
            .administrative_regions
            .iter()
            .find(|z| z.bounds.contains(coords))
            .map(|z| z.to_region())
            .unwrap_or_else(|| self.kb.geology.country_default.administrative_region.clone())
    }
}

/// Re-derives annual total and peak months from the monthly series so a
/// source cannot hand over an inconsistent profile.
fn check_climate(profile: ClimateProfile) -> Result<ClimateProfile, SourceError> {
    if !profile.monthly_distribution.is_complete() {
        return Err(SourceError::OutOfRange(
            "monthly rainfall must list 12 finite, non-negative months".into(),
        ));
    }
    let normalised = ClimateProfile::from_monthly(
        profile.monthly_distribution,
        profile.source,
        profile.source_name,
    );
    if normalised.annual_rainfall_mm > MAX_PLAUSIBLE_ANNUAL_MM {
        return Err(SourceError::OutOfRange(format!(
            "annual rainfall {} mm",
            normalised.annual_rainfall_mm
        )));
    }
    Ok(normalised)
}

fn check_soil(profile: SoilProfile) -> Result<SoilProfile, SourceError> {
    let depth = profile.groundwater_depth;
    if !profile.design_infiltration_mm_hr.is_finite() || profile.design_infiltration_mm_hr < 0.0 {
        return Err(SourceError::OutOfRange(format!(
            "infiltration {} mm/hr",
            profile.design_infiltration_mm_hr
        )));
    }
    if !(depth.min_m >= 0.0 && depth.min_m <= depth.max_m) {
        return Err(SourceError::OutOfRange(format!(
            "groundwater depth {}-{} m",
            depth.min_m, depth.max_m
        )));
    }
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rainforge_schemas::climate::MonthlySeries;
    use rainforge_schemas::soil::DepthRange;
    use rstest::rstest;
    use sources::{soil_profile_from_entry, CityRainfallTable, SoilZoneTable};

    struct Failing;

    #[async_trait]
    impl ClimateSource for Failing {
        fn name(&self) -> &str {
            "failing"
        }
        async fn fetch_historical(&self, _: Coordinates) -> Result<ClimateProfile, SourceError> {
            Err(SourceError::Unavailable("offline".into()))
        }
    }

    struct Absurd;

    #[async_trait]
    impl ClimateSource for Absurd {
        fn name(&self) -> &str {
            "absurd"
        }
        async fn fetch_historical(&self, _: Coordinates) -> Result<ClimateProfile, SourceError> {
            Ok(ClimateProfile::from_monthly(
                MonthlySeries::from_fn(|_| 5_000.0),
                Provenance::Live,
                "absurd",
            ))
        }
    }

    struct Survey(SoilProfile);

    #[async_trait]
    impl SoilSource for Survey {
        fn name(&self) -> &str {
            "survey"
        }
        async fn lookup(&self, _: Coordinates) -> Result<SoilProfile, SourceError> {
            Ok(self.0.clone())
        }
    }

    fn survey(infiltration_mm_hr: f64, min_m: f64, max_m: f64) -> SoilProfile {
        let kb = KnowledgeBase::builtin().unwrap();
        let mut profile = soil_profile_from_entry(
            kb.soil_type("alluvial").unwrap(),
            DepthRange { min_m, max_m },
            None,
            Provenance::Live,
            "survey".to_string(),
        );
        profile.design_infiltration_mm_hr = infiltration_mm_hr;
        profile
    }

    fn resolver(climate: Vec<Arc<dyn ClimateSource>>) -> GeoResolver {
        resolver_with_soil(climate, vec![])
    }

    fn resolver_with_soil(
        climate: Vec<Arc<dyn ClimateSource>>,
        soil: Vec<Arc<dyn SoilSource>>,
    ) -> GeoResolver {
        let kb = Arc::new(KnowledgeBase::builtin().unwrap());
        let mut climate_sources = climate;
        climate_sources.push(Arc::new(CityRainfallTable::new(kb.clone())));
        let mut soil_sources = soil;
        soil_sources.push(Arc::new(SoilZoneTable::new(kb.clone())));
        GeoResolver::new(kb, climate_sources, soil_sources, Duration::from_millis(200)).unwrap()
    }

    #[rstest]
    #[case::negative_infiltration(-3.0, 10.0, 25.0)]
    #[case::non_finite_infiltration(f64::NAN, 10.0, 25.0)]
    #[case::inverted_depth(20.0, 30.0, 10.0)]
    #[case::negative_depth(20.0, -1.0, 10.0)]
    fn implausible_soil_is_rejected(
        #[case] infiltration: f64,
        #[case] min_m: f64,
        #[case] max_m: f64,
    ) {
        let err = check_soil(survey(infiltration, min_m, max_m)).unwrap_err();
        assert!(matches!(err, SourceError::OutOfRange(_)));
    }

    #[tokio::test]
    async fn implausible_live_soil_falls_through_to_zone_table() {
        let r = resolver_with_soil(
            vec![],
            vec![
                Arc::new(Survey(survey(-3.0, 10.0, 25.0))),
                Arc::new(Survey(survey(20.0, 30.0, 10.0))),
            ],
        );
        let ctx = r.resolve(Coordinates::new(28.6139, 77.2090)).await;
        assert!(ctx.soil.source_name.starts_with("soil_zone_table:"));
        assert_eq!(ctx.soil.source, Provenance::Fallback);
    }

    #[tokio::test]
    async fn plausible_live_soil_is_used() {
        let r = resolver_with_soil(vec![], vec![Arc::new(Survey(survey(20.0, 5.0, 12.0)))]);
        let ctx = r.resolve(Coordinates::new(28.6139, 77.2090)).await;
        assert_eq!(ctx.soil.source_name, "survey");
        assert_eq!(ctx.soil.groundwater_depth, DepthRange { min_m: 5.0, max_m: 12.0 });
    }

    #[tokio::test]
    async fn failing_and_implausible_sources_fall_through_to_table() {
        let r = resolver(vec![Arc::new(Failing), Arc::new(Absurd)]);
        let ctx = r.resolve(Coordinates::new(28.6139, 77.2090)).await;
        assert_eq!(ctx.climate.source_name, "city_rainfall_table:delhi");
        assert_eq!(ctx.administrative_region.state, "Delhi");
    }

    #[tokio::test]
    async fn nothing_matches_far_away_so_country_default_is_used() {
        let r = resolver(vec![]);
        let ctx = r.resolve(Coordinates::new(-33.87, 151.21)).await;
        assert_eq!(ctx.climate.source_name, "country_default:india_national_normal");
        assert_eq!(ctx.climate.source, Provenance::Fallback);
        assert_eq!(ctx.soil.source_name, "country_default:india_national_default");
        assert!(ctx.soil.principal_aquifer_info.is_none());
        assert_eq!(ctx.administrative_region.state, "Unmapped");
    }
}
