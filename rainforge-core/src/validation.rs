use crate::error::ValidationError;
use crate::knowledge_base::KnowledgeBase;
use rainforge_schemas::{
    climate::CityRainfall,
    environment::Coordinates,
    property::{
        Location, Preferences, PropertyProfile, RegionType, RoofMaterial, SiteAssessment,
        SystemType, UsageProfile,
    },
    request::AnalysisRequest,
    tuning::RegionInference,
};
use tracing::debug;

const DEFAULT_PROPERTY_TYPE: &str = "residential";

/// Checks a raw request and fills defaults from the knowledge base.
///
/// # Errors
///
/// Returns the first `ValidationError` found; nothing downstream runs on a
/// rejected request.
pub fn validate(
    request: &AnalysisRequest,
    kb: &KnowledgeBase,
) -> Result<SiteAssessment, ValidationError> {
    let defaults = &kb.tuning().defaults;

    let lat = request.location.lat.ok_or(ValidationError::MissingLatitude)?;
    let lng = request.location.lng.ok_or(ValidationError::MissingLongitude)?;
    if !(-90.0..=90.0).contains(&lat) {
        return Err(ValidationError::LatitudeOutOfRange(lat));
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(ValidationError::LongitudeOutOfRange(lng));
    }

    let roof = request.property.roof_area_sqft.ok_or(ValidationError::MissingRoofArea)?;
    if !roof.is_finite() || roof <= 0.0 {
        return Err(ValidationError::NonPositiveRoofArea(roof));
    }
    if roof > defaults.max_roof_area_sqft {
        return Err(ValidationError::RoofAreaTooLarge {
            roof,
            max: defaults.max_roof_area_sqft,
        });
    }
    let floors = request.property.floors.unwrap_or(defaults.floors);
    if floors == 0 {
        return Err(ValidationError::ZeroFloors);
    }
    if let Some(plot) = request.property.plot_area_sqft {
        if !(plot >= roof) {
            return Err(ValidationError::PlotSmallerThanRoof { plot, roof });
        }
    }

    let household_size = request.usage.household_size.unwrap_or(defaults.household_size);
    if household_size == 0 {
        return Err(ValidationError::ZeroHouseholdSize);
    }
    let daily_consumption_liters = request
        .usage
        .daily_consumption_liters
        .unwrap_or(household_size as f64 * defaults.per_capita_liters_per_day);
    if !(daily_consumption_liters >= 0.0) || !daily_consumption_liters.is_finite() {
        return Err(ValidationError::NegativeConsumption(daily_consumption_liters));
    }

    let coords = Coordinates::new(lat, lng);
    let region_type = request
        .location
        .region_type
        .or(request.preferences.region_type)
        .unwrap_or_else(|| {
            infer_region_type(&coords, &kb.climate.cities, &kb.tuning().region_inference)
        });

    let address = request
        .location
        .address
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Location {:.4}, {:.4}", lat, lng));

    Ok(SiteAssessment {
        location: Location {
            lat,
            lng,
            address,
            region_type,
        },
        property: PropertyProfile {
            property_type: request
                .property
                .property_type
                .clone()
                .unwrap_or_else(|| DEFAULT_PROPERTY_TYPE.to_string()),
            roof_area_sqft: roof,
            roof_material: request.property.roof_material.unwrap_or(RoofMaterial::Concrete),
            floors,
            plot_area_sqft: request.property.plot_area_sqft,
        },
        usage: UsageProfile {
            household_size,
            daily_consumption_liters,
            current_sources: request.usage.current_sources.iter().cloned().collect(),
            intended_use: request.usage.intended_use.iter().cloned().collect(),
        },
        preferences: Preferences {
            budget_range: request.preferences.budget_range,
            system_type: request.preferences.system_type.unwrap_or(SystemType::Standard),
            priority: request.preferences.priority,
        },
    })
}

/// Classifies a coordinate by its distance to the nearest tabulated city.
pub fn infer_region_type(
    coords: &Coordinates,
    cities: &[CityRainfall],
    radii: &RegionInference,
) -> RegionType {
    let nearest = cities
        .iter()
        .map(|c| c.centroid.distance_deg(coords))
        .fold(f64::INFINITY, f64::min);
    let region = if nearest <= radii.urban_radius_deg {
        RegionType::Urban
    } else if nearest <= radii.semi_urban_radius_deg {
        RegionType::SemiUrban
    } else {
        RegionType::Rural
    };
    debug!(nearest_city_deg = nearest, ?region, "Inferred region type");
    region
}
