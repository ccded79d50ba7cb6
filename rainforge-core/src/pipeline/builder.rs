use crate::{
    error::RainforgeError,
    knowledge_base::KnowledgeBase,
    pipeline::engine::AnalysisEngine,
    resolver::{
        sources::{CityRainfallTable, ClimateSource, SoilSource, SoilZoneTable},
        GeoResolver,
    },
};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(3);

/// A fluent builder for constructing an `AnalysisEngine`.
///
/// Live sources are tried in the order they are added. The static city and
/// soil tables are always appended after them, and the country defaults close
/// the chain.
#[derive(Default)]
pub struct AnalysisBuilder {
    knowledge_base: Option<Arc<KnowledgeBase>>,
    climate_sources: Vec<Arc<dyn ClimateSource>>,
    soil_sources: Vec<Arc<dyn SoilSource>>,
    source_timeout: Option<Duration>,
}

impl AnalysisBuilder {
    /// Creates a builder that will use the built-in knowledge base.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the built-in tables and tunables.
    pub fn with_knowledge_base(mut self, kb: Arc<KnowledgeBase>) -> Self {
        self.knowledge_base = Some(kb);
        self
    }

    /// Adds a live climate source ahead of the static rainfall table.
    pub fn with_climate_source(mut self, source: Arc<dyn ClimateSource>) -> Self {
        self.climate_sources.push(source);
        self
    }

    /// Adds a live soil source ahead of the static soil zones.
    pub fn with_soil_source(mut self, source: Arc<dyn SoilSource>) -> Self {
        self.soil_sources.push(source);
        self
    }

    /// Upper bound on each individual source call.
    pub fn with_source_timeout(mut self, timeout: Duration) -> Self {
        self.source_timeout = Some(timeout);
        self
    }

    /// Consumes the builder and returns a ready `AnalysisEngine`.
    ///
    /// # Errors
    ///
    /// Returns `RainforgeError::ConfigError` if the knowledge base fails
    /// validation, or a parsing error if the built-in tables cannot be read.
    pub fn build(self) -> Result<AnalysisEngine, RainforgeError> {
        let kb = match self.knowledge_base {
            Some(kb) => {
                kb.validate()?;
                kb
            }
            None => Arc::new(KnowledgeBase::builtin()?),
        };

        let mut climate_sources = self.climate_sources;
        climate_sources.push(Arc::new(CityRainfallTable::new(kb.clone())));
        let mut soil_sources = self.soil_sources;
        soil_sources.push(Arc::new(SoilZoneTable::new(kb.clone())));

        let resolver = GeoResolver::new(
            kb.clone(),
            climate_sources,
            soil_sources,
            self.source_timeout.unwrap_or(DEFAULT_SOURCE_TIMEOUT),
        )?;

        Ok(AnalysisEngine { kb, resolver })
    }
}
