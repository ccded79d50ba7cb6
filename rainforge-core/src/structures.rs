//! Structure selection and sizing.
//!
//! Selection is a pure decision table over site conditions and returns
//! archetypes only. Sizing turns an archetype into dimensions using the
//! harvesting potential and soil, and pricing is left to the cost engine.

use crate::cost;
use crate::knowledge_base::KnowledgeBase;
use rainforge_schemas::{
    environment::Measurement,
    feasibility::{FeasibilityAdvice, FeasibilityScore},
    potential::HarvestingPotential,
    property::{Priority, RegionType, SiteAssessment, SystemType},
    soil::{InfiltrationBand, RechargeSuitability, SoilProfile},
    structure::{
        HybridSystem, InjectionWell, RechargePit, RechargeTrench, StorageTank, Structure,
        StructureKind, StructureRecommendation, SystemRecommendations, TankPlacement,
    },
    tea_lca::CostTable,
    tuning::SizingTuning,
};
use std::f64::consts::PI;
use tracing::debug;

const PIT_FILTER_MEDIA: &str = "60cm gravel (20-40mm) + 30cm coarse sand";

/// The inputs the decision table looks at, and nothing else.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteConditions {
    pub recharge_suitability: RechargeSuitability,
    pub infiltration: InfiltrationBand,
    pub region_type: RegionType,
    pub priority: Option<Priority>,
    pub open_area_sqft: f64,
    pub water_table_max_m: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub primary: StructureKind,
    pub alternatives: Vec<StructureKind>,
    pub rationale: &'static str,
}

impl SiteConditions {
    pub fn from_site(site: &SiteAssessment, soil: &SoilProfile, sizing: &SizingTuning) -> Self {
        Self {
            recharge_suitability: soil.recharge_suitability,
            infiltration: soil.infiltration_rate,
            region_type: site.location.region_type,
            priority: site.preferences.priority,
            open_area_sqft: site
                .property
                .open_area_sqft()
                .unwrap_or(sizing.default_open_area_sqft),
            water_table_max_m: soil.groundwater_depth.max_m,
        }
    }
}

/// Chooses the primary structure and two alternatives. The hybrid system is
/// always the last alternative.
pub fn select(site: &SiteConditions, sizing: &SizingTuning) -> Selection {
    let favorable = site.recharge_suitability.is_favorable();
    let wants_recharge = site.priority == Some(Priority::GroundwaterRecharge);

    if favorable && site.region_type == RegionType::Urban && !wants_recharge {
        return Selection {
            primary: StructureKind::StorageTank,
            alternatives: vec![StructureKind::RechargePit, StructureKind::HybridSystem],
            rationale: "Urban site with recharge-capable soil: store roof water for household use \
                        and route overflow to recharge",
        };
    }

    if site.infiltration.favours_infiltration() || (favorable && wants_recharge) {
        return Selection {
            primary: recharge_structure(site, sizing),
            alternatives: vec![StructureKind::StorageTank, StructureKind::HybridSystem],
            rationale: "Soil accepts water readily: prioritise groundwater recharge",
        };
    }

    let recharge_alternative =
        if site.recharge_suitability == RechargeSuitability::StorageFavoured {
            StructureKind::InjectionWell
        } else {
            StructureKind::RechargePit
        };
    Selection {
        primary: StructureKind::StorageTank,
        alternatives: vec![recharge_alternative, StructureKind::HybridSystem],
        rationale: "Slow or uncertain infiltration: storage gives the most dependable supply",
    }
}

/// Small plots get a well, large plots over shallow groundwater a trench,
/// everything else a pit.
fn recharge_structure(site: &SiteConditions, sizing: &SizingTuning) -> StructureKind {
    if site.open_area_sqft < sizing.well.max_open_area_sqft {
        StructureKind::InjectionWell
    } else if site.open_area_sqft >= sizing.trench.min_open_area_sqft
        && site.water_table_max_m <= sizing.trench.max_water_table_m
    {
        StructureKind::RechargeTrench
    } else {
        StructureKind::RechargePit
    }
}

pub struct SizingContext<'a> {
    pub potential: &'a HarvestingPotential,
    pub soil: &'a SoilProfile,
    pub system_type: SystemType,
    pub sizing: &'a SizingTuning,
    pub cost_table: &'a CostTable,
}

pub fn size(kind: StructureKind, ctx: &SizingContext<'_>) -> Structure {
    let storage = &ctx.potential.storage_recommendations;
    let peak_day = ctx.potential.peak_runoff.estimated_peak_daily_liters;
    match kind {
        StructureKind::StorageTank => {
            Structure::StorageTank(size_tank(storage.optimal_liters, ctx))
        }
        StructureKind::RechargePit => Structure::RechargePit(size_pit(peak_day, ctx)),
        StructureKind::RechargeTrench => Structure::RechargeTrench(size_trench(peak_day, ctx)),
        StructureKind::InjectionWell => Structure::InjectionWell(size_well(ctx)),
        StructureKind::HybridSystem => Structure::HybridSystem(HybridSystem {
            tank: size_tank(storage.minimum_liters, ctx),
            overflow_pit: size_pit(peak_day, ctx),
        }),
    }
}

/// Cylinder of fixed height holding the requested volume.
fn size_tank(capacity_liters: u64, ctx: &SizingContext<'_>) -> StorageTank {
    let height = ctx.sizing.tank_height_m;
    let volume_m3 = capacity_liters as f64 / 1000.0;
    let diameter = (4.0 * volume_m3 / (PI * height)).sqrt();
    let placement = if capacity_liters as f64 > ctx.sizing.underground_threshold_liters {
        TankPlacement::Underground
    } else {
        TankPlacement::Overhead
    };
    let pump = cost::pump_tier(capacity_liters, ctx.cost_table)
        .map(|t| t.label.clone())
        .unwrap_or_default();
    StorageTank {
        capacity_liters,
        diameter: Measurement::meters(round_to(diameter, 2)),
        height: Measurement::meters(height),
        placement,
        filtration: ctx.system_type,
        pump,
    }
}

/// Enough pits that their volume plus base infiltration over one storm
/// absorbs the design inflow.
fn size_pit(inflow_liters: u64, ctx: &SizingContext<'_>) -> RechargePit {
    let p = &ctx.sizing.pit;
    let base_m2 = p.length_m * p.width_m;
    let volume_m3 = base_m2 * p.depth_m;
    let per_pit_liters =
        volume_m3 * 1000.0 + base_m2 * ctx.soil.design_infiltration_mm_hr * p.event_hours;
    let count = if inflow_liters == 0 {
        0
    } else {
        ((inflow_liters as f64 / per_pit_liters).ceil() as u32).max(1)
    };
    debug!(count, per_pit_liters, inflow_liters, "Sized recharge pits");
    RechargePit {
        count,
        length: Measurement::meters(p.length_m),
        width: Measurement::meters(p.width_m),
        depth: Measurement::meters(p.depth_m),
        total_volume: Measurement::cubic_meters(round_to(volume_m3 * count as f64, 2)),
        design_inflow_liters: inflow_liters,
        filter_media: PIT_FILTER_MEDIA.to_string(),
    }
}

/// Length gives the infiltration area the storm needs at the soil's design
/// rate, within the configured bounds.
fn size_trench(inflow_liters: u64, ctx: &SizingContext<'_>) -> RechargeTrench {
    let t = &ctx.sizing.trench;
    let liters_per_m2 = ctx.soil.design_infiltration_mm_hr * ctx.sizing.pit.event_hours;
    let length = if inflow_liters == 0 {
        0.0
    } else if liters_per_m2 <= 0.0 {
        t.max_length_m
    } else {
        let area_m2 = inflow_liters as f64 / liters_per_m2;
        (area_m2 / t.width_m).clamp(t.min_length_m, t.max_length_m)
    };
    let length = round_to(length, 1);
    RechargeTrench {
        length: Measurement::meters(length),
        width: Measurement::meters(t.width_m),
        depth: Measurement::meters(t.depth_m),
        storage_volume: Measurement::cubic_meters(round_to(length * t.width_m * t.depth_m, 2)),
        design_inflow_liters: inflow_liters,
    }
}

/// Bore reaches past the deepest expected water table.
fn size_well(ctx: &SizingContext<'_>) -> InjectionWell {
    let w = &ctx.sizing.well;
    let depth = (ctx.soil.groundwater_depth.max_m + w.depth_margin_m)
        .clamp(w.min_depth_m, w.max_depth_m);
    let recharge = ctx.potential.annual_harvestable_liters as f64 * w.recharge_fraction;
    InjectionWell {
        bore_diameter: Measurement::new(w.bore_diameter_mm, "mm"),
        depth: Measurement::meters(depth),
        annual_recharge_liters: recharge.round() as u64,
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn title(structure: &Structure) -> String {
    match structure {
        Structure::StorageTank(t) => match t.placement {
            TankPlacement::Underground => {
                format!("Underground Storage Tank ({} L)", t.capacity_liters)
            }
            TankPlacement::Overhead => {
                format!("Overhead Storage Tank ({} L)", t.capacity_liters)
            }
        },
        Structure::RechargePit(p) => format!("Recharge Pit x{}", p.count),
        Structure::RechargeTrench(t) => format!("Recharge Trench ({} m)", t.length.value),
        Structure::InjectionWell(w) => format!("Injection Well ({} m bore)", w.depth.value),
        Structure::HybridSystem(h) => {
            format!("Storage + Recharge Combination ({} L tank)", h.tank.capacity_liters)
        }
    }
}

fn alternative_rationale(kind: StructureKind) -> &'static str {
    match kind {
        StructureKind::StorageTank => "Reliable household supply through the dry months",
        StructureKind::RechargePit => "Low-cost recharge of roof overflow into shallow aquifers",
        StructureKind::RechargeTrench => {
            "Spreads recharge along open ground with a shallow water table"
        }
        StructureKind::InjectionWell => {
            "Bypasses slow surface soils and recharges the aquifer directly"
        }
        StructureKind::HybridSystem => {
            "Smaller tank for daily use with overflow routed to recharge"
        }
    }
}

/// Builds priced recommendations for a site.
pub fn recommend(
    potential: &HarvestingPotential,
    soil: &SoilProfile,
    site: &SiteAssessment,
    feasibility: &FeasibilityScore,
    advice: FeasibilityAdvice,
    kb: &KnowledgeBase,
) -> SystemRecommendations {
    let sizing = &kb.tuning().sizing;
    let cost_table = &kb.costs.cost_table;
    let conditions = SiteConditions::from_site(site, soil, sizing);
    let selection = select(&conditions, sizing);
    debug!(
        primary = ?selection.primary,
        alternatives = ?selection.alternatives,
        "Selected structures"
    );

    let ctx = SizingContext {
        potential,
        soil,
        system_type: site.preferences.system_type,
        sizing,
        cost_table,
    };
    let build = |kind: StructureKind, rationale: &str| {
        let structure = size(kind, &ctx);
        let cost_breakdown = cost::price(&structure, cost_table);
        let estimated_cost_inr = cost_breakdown.total_cost;
        StructureRecommendation {
            title: title(&structure),
            rationale: rationale.to_string(),
            structure,
            cost_breakdown,
            estimated_cost_inr,
            within_budget: site.preferences.budget_range.map(|b| b.admits(estimated_cost_inr)),
        }
    };

    SystemRecommendations {
        primary_recommendation: build(selection.primary, selection.rationale),
        alternative_options: selection
            .alternatives
            .iter()
            .map(|k| build(*k, alternative_rationale(*k)))
            .collect(),
        suitability_score: feasibility.total_score,
        feasibility_based_advice: advice,
    }
}
