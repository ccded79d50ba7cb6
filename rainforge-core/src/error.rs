use thiserror::Error;

#[derive(Debug, Error)]
pub enum RainforgeError {
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error for file '{0}': {1}")]
    FileIO(String, #[source] std::io::Error),

    #[error("Failed to parse YAML from '{0}': {1}")]
    YamlParsing(String, #[source] serde_yaml::Error),

    #[error("Failed to process CSV file '{0}': {1}")]
    CsvError(String, #[source] csv::Error),
}

/// Rejected request fields. Raised before any stage of the pipeline runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("latitude is required")]
    MissingLatitude,

    #[error("longitude is required")]
    MissingLongitude,

    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("roof_area_sqft is required")]
    MissingRoofArea,

    #[error("roof_area_sqft must be a positive number, got {0}")]
    NonPositiveRoofArea(f64),

    #[error("roof_area_sqft {roof} exceeds the supported maximum of {max}")]
    RoofAreaTooLarge { roof: f64, max: f64 },

    #[error("floors must be at least 1")]
    ZeroFloors,

    #[error("household_size must be at least 1")]
    ZeroHouseholdSize,

    #[error("daily_consumption_liters must be non-negative, got {0}")]
    NegativeConsumption(f64),

    #[error("plot_area_sqft ({plot}) is smaller than roof_area_sqft ({roof})")]
    PlotSmallerThanRoof { plot: f64, roof: f64 },
}

/// Why a live data source did not produce a profile. Never leaves the resolver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    #[error("source did not answer within {0} ms")]
    Timeout(u128),

    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("value out of range: {0}")]
    OutOfRange(String),

    #[error("no data for this location")]
    NoCoverage,

    #[error("source unavailable: {0}")]
    Unavailable(String),
}
