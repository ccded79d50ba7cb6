use crate::environment::Measurement;
use crate::feasibility::FeasibilityAdvice;
use crate::property::SystemType;
use crate::tea_lca::CostBreakdown;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TankPlacement {
    Underground,
    Overhead,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageTank {
    pub capacity_liters: u64,
    pub diameter: Measurement<f64>,
    pub height: Measurement<f64>,
    pub placement: TankPlacement,
    pub filtration: SystemType,
    pub pump: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RechargePit {
    pub count: u32,
    pub length: Measurement<f64>,
    pub width: Measurement<f64>,
    pub depth: Measurement<f64>,
    pub total_volume: Measurement<f64>,
    pub design_inflow_liters: u64,
    pub filter_media: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RechargeTrench {
    pub length: Measurement<f64>,
    pub width: Measurement<f64>,
    pub depth: Measurement<f64>,
    pub storage_volume: Measurement<f64>,
    pub design_inflow_liters: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjectionWell {
    pub bore_diameter: Measurement<f64>,
    pub depth: Measurement<f64>,
    pub annual_recharge_liters: u64,
}

/// Smaller tank whose overflow is routed into a recharge pit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridSystem {
    pub tank: StorageTank,
    pub overflow_pit: RechargePit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "structure_type", rename_all = "snake_case")]
pub enum Structure {
    StorageTank(StorageTank),
    RechargePit(RechargePit),
    RechargeTrench(RechargeTrench),
    InjectionWell(InjectionWell),
    HybridSystem(HybridSystem),
}

impl Structure {
    pub fn kind(&self) -> StructureKind {
        match self {
            Structure::StorageTank(_) => StructureKind::StorageTank,
            Structure::RechargePit(_) => StructureKind::RechargePit,
            Structure::RechargeTrench(_) => StructureKind::RechargeTrench,
            Structure::InjectionWell(_) => StructureKind::InjectionWell,
            Structure::HybridSystem(_) => StructureKind::HybridSystem,
        }
    }
}

/// Structure archetype without dimensions; the output of the selection table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    StorageTank,
    RechargePit,
    RechargeTrench,
    InjectionWell,
    HybridSystem,
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StructureKind::StorageTank => "Storage Tank",
            StructureKind::RechargePit => "Recharge Pit",
            StructureKind::RechargeTrench => "Recharge Trench",
            StructureKind::InjectionWell => "Injection Well",
            StructureKind::HybridSystem => "Hybrid Storage + Recharge",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureRecommendation {
    pub title: String,
    pub rationale: String,
    pub structure: Structure,
    pub cost_breakdown: CostBreakdown,
    pub estimated_cost_inr: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub within_budget: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemRecommendations {
    pub primary_recommendation: StructureRecommendation,
    pub alternative_options: Vec<StructureRecommendation>,
    pub suitability_score: u32,
    pub feasibility_based_advice: FeasibilityAdvice,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structure_serializes_with_type_tag() {
        let s = Structure::InjectionWell(InjectionWell {
            bore_diameter: Measurement::new(150.0, "mm"),
            depth: Measurement::meters(30.0),
            annual_recharge_liters: 1000,
        });
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["structure_type"], "injection_well");
        assert_eq!(v["depth"]["unit"], "m");
        assert_eq!(s.kind(), StructureKind::InjectionWell);
    }
}
