use anyhow::{Context, Result};
use rainforge_core::knowledge_base::{
    KnowledgeBase, CALIBRATION_FILE, CLIMATE_FILE, COSTS_FILE, SOIL_FILE,
};
use serde::de::DeserializeOwned;
use std::{fs, path::Path};
use tracing::info;

/// Starts from the built-in knowledge base and replaces each section whose
/// file exists under `base_path`. The merged result is validated as a whole.
pub fn load_knowledge_base(base_path: Option<&Path>) -> Result<KnowledgeBase> {
    let mut kb = KnowledgeBase::builtin().context("Built-in knowledge base is invalid")?;
    let Some(base) = base_path else {
        return Ok(kb);
    };
    info!(path = %base.display(), "Loading knowledge base overrides");

    if let Some(climate) = load_override(base, CLIMATE_FILE)? {
        kb.climate = climate;
    }
    if let Some(geology) = load_override(base, SOIL_FILE)? {
        kb.geology = geology;
    }
    if let Some(costs) = load_override(base, COSTS_FILE)? {
        kb.costs = costs;
    }
    if let Some(calibration) = load_override(base, CALIBRATION_FILE)? {
        kb.calibration = calibration;
    }

    kb.validate()
        .with_context(|| format!("Knowledge base in {:?} failed validation", base))?;
    Ok(kb)
}

/// Parses one YAML section if present. A missing file is not an error.
fn load_override<T: DeserializeOwned>(base: &Path, relative: &str) -> Result<Option<T>> {
    let path = base.join(relative);
    if !path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path).with_context(|| format!("Failed to read {:?}", path))?;
    let section = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse YAML from {:?}", path))?;
    info!(file = relative, "Overrode knowledge base section");
    Ok(Some(section))
}
