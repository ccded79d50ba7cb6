use crate::{
    composer,
    error::RainforgeError,
    feasibility, finance, harvest,
    knowledge_base::KnowledgeBase,
    resolver::{GeoContext, GeoResolver},
    structures, validation,
};
use rainforge_schemas::{
    environment::Coordinates,
    property::SiteAssessment,
    report::{AnalysisResult, LocationReport, RainfallReport, SoilGeologyReport},
    request::AnalysisRequest,
};
use std::sync::Arc;
use tracing::info;

/// Runs requests through validation, site resolution and the pure analysis
/// stages. Holds only shared read-only state, so one engine serves many
/// concurrent requests.
pub struct AnalysisEngine {
    pub(super) kb: Arc<KnowledgeBase>,
    pub(super) resolver: GeoResolver,
}

impl AnalysisEngine {
    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    /// # Errors
    ///
    /// Only `RainforgeError::Validation`. Source failures degrade to the next
    /// tier and never surface here.
    pub async fn analyze(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, RainforgeError> {
        let site = validation::validate(request, &self.kb)?;
        info!(
            lat = site.location.lat,
            lng = site.location.lng,
            region = %site.location.region_type,
            "Request validated"
        );

        let geo = self
            .resolver
            .resolve(Coordinates::new(site.location.lat, site.location.lng))
            .await;

        let result = analyze_resolved(&site, &geo, &self.kb);
        info!(
            annual_liters = result.harvesting_potential.annual_harvestable_liters,
            feasibility = %result.feasibility_analysis.feasibility_level,
            primary = %result.system_recommendations.primary_recommendation.title,
            total_cost = result.cost_analysis.total_cost,
            "Analysis complete"
        );
        Ok(result)
    }
}

/// The deterministic part of the pipeline. Identical inputs give identical
/// results.
pub fn analyze_resolved(
    site: &SiteAssessment,
    geo: &GeoContext,
    kb: &KnowledgeBase,
) -> AnalysisResult {
    let tuning = kb.tuning();
    let tariffs = &kb.costs.tariffs;

    let potential = harvest::compute(
        &site.property,
        site.preferences.system_type,
        &geo.climate,
        tuning,
    );
    info!(annual_liters = potential.annual_harvestable_liters, "Harvest potential computed");

    let score = feasibility::score(
        &geo.climate,
        &site.property,
        &geo.soil,
        &site.usage,
        &tuning.feasibility,
    );
    let advice = feasibility::advice(&score, &tuning.feasibility);
    info!(total = score.total_score, level = %score.feasibility_level, "Feasibility scored");

    let recommendations = structures::recommend(&potential, &geo.soil, site, &score, advice, kb);
    let cost = recommendations.primary_recommendation.cost_breakdown.clone();
    info!(
        structure = %recommendations.primary_recommendation.structure.kind(),
        total_cost = cost.total_cost,
        "Structures selected and priced"
    );

    let financial = finance::analyze(
        &potential,
        &cost,
        &site.usage,
        site.location.region_type,
        tariffs,
        &tuning.finance,
    );
    let cost_benefit = finance::cost_benefit(
        site,
        &geo.climate,
        &potential,
        &financial,
        cost.total_cost,
        tariffs,
        tuning,
    );
    let environmental_impact = finance::environmental_impact(&potential, &tuning.environment);
    info!(payback_years = financial.payback_period_years, "Financial projection complete");

    AnalysisResult {
        location: LocationReport {
            lat: site.location.lat,
            lng: site.location.lng,
            address: site.location.address.clone(),
            region_type: site.location.region_type,
            administrative_info: geo.administrative_region.clone(),
        },
        feasibility_analysis: score,
        rainfall_data: RainfallReport {
            profile: geo.climate.clone(),
            monsoon_analysis: composer::monsoon_analysis(&geo.climate),
            collection_window: composer::collection_window(&geo.climate),
        },
        soil_and_geology: SoilGeologyReport {
            profile: geo.soil.clone(),
            recharge_assessment: composer::recharge_assessment(&geo.soil),
        },
        groundwater_and_aquifer: composer::groundwater_report(&geo.soil),
        harvesting_potential: potential,
        implementation_plan: composer::implementation_plan(cost.total_cost, &tuning.implementation),
        maintenance_schedule: composer::maintenance_schedule(),
        performance_monitoring: composer::performance_monitoring(),
        regulatory_info: composer::regulatory_info(&geo.administrative_region),
        system_recommendations: recommendations,
        cost_analysis: cost,
        financial_analysis: financial,
        cost_benefit_analysis: cost_benefit,
        environmental_impact,
    }
}
