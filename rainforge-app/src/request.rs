use anyhow::{Context, Result};
use rainforge_schemas::request::AnalysisRequest;
use std::{fs, path::Path};

/// Reads a request file. `.json` is parsed as JSON, anything else as YAML.
pub fn load(path: &Path) -> Result<AnalysisRequest> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read request file {:?}", path))?;
    let is_json = path.extension().map_or(false, |e| e == "json");
    if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON from {:?}", path))
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML from {:?}", path))
    }
}
