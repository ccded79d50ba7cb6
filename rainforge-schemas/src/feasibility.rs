use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Rainfall,
    RoofArea,
    SoilSuitability,
    WaterDemand,
}

impl Criterion {
    pub const ALL: [Criterion; 4] = [
        Criterion::Rainfall,
        Criterion::RoofArea,
        Criterion::SoilSuitability,
        Criterion::WaterDemand,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeasibilityTier {
    #[serde(rename = "Highly Feasible")]
    HighlyFeasible,
    #[serde(rename = "Feasible")]
    Feasible,
    #[serde(rename = "Moderately Feasible")]
    ModeratelyFeasible,
    #[serde(rename = "Limited Feasibility")]
    LimitedFeasibility,
}

impl FeasibilityTier {
    pub fn label(&self) -> &'static str {
        match self {
            FeasibilityTier::HighlyFeasible => "Highly Feasible",
            FeasibilityTier::Feasible => "Feasible",
            FeasibilityTier::ModeratelyFeasible => "Moderately Feasible",
            FeasibilityTier::LimitedFeasibility => "Limited Feasibility",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            FeasibilityTier::HighlyFeasible => "Excellent conditions for RTRWH implementation",
            FeasibilityTier::Feasible => "Good conditions with minor considerations",
            FeasibilityTier::ModeratelyFeasible => "Feasible with proper planning and design",
            FeasibilityTier::LimitedFeasibility => {
                "Consider alternative water sources or hybrid systems"
            }
        }
    }
}

impl fmt::Display for FeasibilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityScore {
    pub component_scores: BTreeMap<Criterion, u32>,
    pub component_caps: BTreeMap<Criterion, u32>,
    pub total_score: u32,
    pub max_score: u32,
    pub feasibility_level: FeasibilityTier,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityAdvice {
    pub score_interpretation: FeasibilityTier,
    pub key_recommendations: String,
    pub improvement_suggestions: Vec<String>,
}
