use crate::error::SourceError;
use crate::knowledge_base::KnowledgeBase;
use async_trait::async_trait;
use rainforge_schemas::{
    climate::{ClimateProfile, Provenance},
    environment::Coordinates,
    soil::{AquiferInfo, DepthRange, SoilProfile, SoilTypeEntry},
};
use std::sync::Arc;

/// Anything that can produce a climate profile for a coordinate.
#[async_trait]
pub trait ClimateSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_historical(&self, coords: Coordinates) -> Result<ClimateProfile, SourceError>;
}

/// Anything that can produce a soil profile for a coordinate.
#[async_trait]
pub trait SoilSource: Send + Sync {
    fn name(&self) -> &str;

    async fn lookup(&self, coords: Coordinates) -> Result<SoilProfile, SourceError>;
}

/// Nearest-centroid match against the city rainfall table.
pub struct CityRainfallTable {
    kb: Arc<KnowledgeBase>,
}

impl CityRainfallTable {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self { kb }
    }

    pub fn nearest(&self, coords: &Coordinates) -> Result<ClimateProfile, SourceError> {
        let table = &self.kb.climate;
        let (city, distance) = table
            .cities
            .iter()
            .map(|c| (c, c.centroid.distance_deg(coords)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .ok_or(SourceError::NoCoverage)?;
        if distance > table.max_match_distance_deg {
            return Err(SourceError::NoCoverage);
        }
        Ok(ClimateProfile::from_monthly(
            city.monthly_rainfall_mm.clone(),
            Provenance::Fallback,
            format!("city_rainfall_table:{}", city.city_id),
        ))
    }
}

#[async_trait]
impl ClimateSource for CityRainfallTable {
    fn name(&self) -> &str {
        "city_rainfall_table"
    }

    async fn fetch_historical(&self, coords: Coordinates) -> Result<ClimateProfile, SourceError> {
        self.nearest(&coords)
    }
}

/// First-match bounding-box lookup against the soil, groundwater and aquifer zones.
pub struct SoilZoneTable {
    kb: Arc<KnowledgeBase>,
}

impl SoilZoneTable {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self { kb }
    }

    pub fn locate(&self, coords: &Coordinates) -> Result<SoilProfile, SourceError> {
        let geology = &self.kb.geology;
        let zone = geology
            .soil_zones
            .iter()
            .find(|z| z.bounds.contains(coords))
            .ok_or(SourceError::NoCoverage)?;
        let entry = self
            .kb
            .soil_type(&zone.soil_id)
            .ok_or_else(|| SourceError::Unavailable(format!("unknown soil '{}'", zone.soil_id)))?;
        let depth = geology
            .groundwater_zones
            .iter()
            .find(|z| z.bounds.contains(coords))
            .map(|z| z.depth)
            .unwrap_or(geology.country_default.groundwater_depth);
        let aquifer = geology
            .aquifer_zones
            .iter()
            .find(|z| z.bounds.contains(coords))
            .map(|z| z.aquifer.clone());

        Ok(soil_profile_from_entry(
            entry,
            depth,
            aquifer,
            Provenance::Fallback,
            format!("soil_zone_table:{}", zone.zone_id),
        ))
    }
}

#[async_trait]
impl SoilSource for SoilZoneTable {
    fn name(&self) -> &str {
        "soil_zone_table"
    }

    async fn lookup(&self, coords: Coordinates) -> Result<SoilProfile, SourceError> {
        self.locate(&coords)
    }
}

pub fn soil_profile_from_entry(
    entry: &SoilTypeEntry,
    groundwater_depth: DepthRange,
    principal_aquifer_info: Option<AquiferInfo>,
    source: Provenance,
    source_name: String,
) -> SoilProfile {
    SoilProfile {
        soil_type: entry.display_name.clone(),
        infiltration_rate: entry.infiltration_band,
        infiltration_label: entry.infiltration_label.clone(),
        design_infiltration_mm_hr: entry.design_infiltration_mm_hr,
        recharge_suitability: entry.recharge_suitability,
        suitability_label: entry.suitability_label.clone(),
        groundwater_depth,
        aquifer_prospects: entry.aquifer_prospects.clone(),
        principal_aquifer_info,
        recharge_potential: entry.recharge_potential.clone(),
        enhancement_options: entry.enhancement_options.clone(),
        source,
        source_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rainforge_schemas::soil::RechargeSuitability;
    use rstest::rstest;

    fn kb() -> Arc<KnowledgeBase> {
        Arc::new(KnowledgeBase::builtin().unwrap())
    }

    #[test]
    fn delhi_matches_its_own_centroid() {
        let p = CityRainfallTable::new(kb()).nearest(&Coordinates::new(28.6139, 77.2090)).unwrap();
        assert_eq!(p.annual_rainfall_mm, 797.0);
        assert_eq!(p.source, Provenance::Fallback);
        assert_eq!(p.source_name, "city_rainfall_table:delhi");
        assert_eq!(p.peak_months.len(), 3);
    }

    #[test]
    fn distant_point_has_no_city_match() {
        let err = CityRainfallTable::new(kb())
            .nearest(&Coordinates::new(-33.87, 151.21))
            .unwrap_err();
        assert_eq!(err, SourceError::NoCoverage);
    }

    #[rstest]
    #[case(28.6139, 77.2090, "Alluvial", RechargeSuitability::Good)]
    #[case(26.9, 71.0, "Desert", RechargeSuitability::Excellent)]
    #[case(19.07, 72.87, "Black", RechargeSuitability::StorageFavoured)]
    #[case(12.97, 77.59, "Red", RechargeSuitability::Excellent)]
    #[case(34.0, 75.0, "Mountain", RechargeSuitability::SiteSpecific)]
    fn soil_zones_resolve_in_order(
        #[case] lat: f64,
        #[case] lng: f64,
        #[case] soil: &str,
        #[case] suitability: RechargeSuitability,
    ) {
        let p = SoilZoneTable::new(kb()).locate(&Coordinates::new(lat, lng)).unwrap();
        assert_eq!(p.soil_type, soil);
        assert_eq!(p.recharge_suitability, suitability);
    }

    #[test]
    fn delhi_soil_carries_groundwater_and_aquifer() {
        let p = SoilZoneTable::new(kb()).locate(&Coordinates::new(28.6139, 77.2090)).unwrap();
        assert_eq!(p.groundwater_depth, DepthRange { min_m: 10.0, max_m: 25.0 });
        let aquifer = p.principal_aquifer_info.unwrap();
        assert_eq!(aquifer.principal_aquifer, "Indo-Gangetic Alluvial Aquifer");
    }

    #[test]
    fn soil_table_misses_outside_country() {
        let err = SoilZoneTable::new(kb()).locate(&Coordinates::new(51.5, -0.12)).unwrap_err();
        assert_eq!(err, SourceError::NoCoverage);
    }
}
