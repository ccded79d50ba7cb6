use rainforge_schemas::{
    structure::{InjectionWell, RechargePit, RechargeTrench, StorageTank, Structure},
    tea_lca::{CostBreakdown, CostTable, PumpTier, TankRates},
};

/// Upfront cost of one structure.
///
/// Components are rounded to whole rupees, contingency is the configured rate
/// applied to the four rounded components, and the total is their exact sum.
/// A structure with no capacity costs nothing.
pub fn price(structure: &Structure, table: &CostTable) -> CostBreakdown {
    let parts = match structure {
        Structure::StorageTank(tank) => tank_parts(tank, table),
        Structure::RechargePit(pit) => pit_parts(pit, table),
        Structure::RechargeTrench(trench) => trench_parts(trench, table),
        Structure::InjectionWell(well) => well_parts(well, table),
        Structure::HybridSystem(hybrid) => {
            let tank = tank_parts(&hybrid.tank, table);
            let pit = pit_parts(&hybrid.overflow_pit, table);
            Parts {
                civil: tank.civil + pit.civil,
                filtration: tank.filtration,
                pump: tank.pump,
                installation: tank.installation + pit.installation,
            }
        }
    };
    assemble(parts, table.contingency_rate)
}

/// Tier whose capacity bound covers the tank. The last tier is unbounded.
pub fn pump_tier(capacity_liters: u64, table: &CostTable) -> Option<&PumpTier> {
    table
        .pump_tiers
        .iter()
        .find(|tier| tier.max_capacity_liters.map_or(true, |max| capacity_liters <= max))
}

/// Per-liter rate up to the threshold, discounted rate beyond it.
pub fn tank_material_cost(capacity_liters: u64, rates: &TankRates) -> f64 {
    let full_rate = capacity_liters.min(rates.discount_threshold_liters) as f64;
    let discounted = capacity_liters.saturating_sub(rates.discount_threshold_liters) as f64;
    full_rate * rates.rate_per_liter + discounted * rates.discounted_rate_per_liter
}

#[derive(Debug, Default, Clone, Copy)]
struct Parts {
    civil: f64,
    filtration: f64,
    pump: f64,
    installation: f64,
}

fn tank_parts(tank: &StorageTank, table: &CostTable) -> Parts {
    if tank.capacity_liters == 0 {
        return Parts::default();
    }
    Parts {
        civil: tank_material_cost(tank.capacity_liters, &table.tank),
        filtration: table.filtration.for_system(tank.filtration),
        pump: pump_tier(tank.capacity_liters, table).map_or(0.0, |t| t.cost),
        installation: table.installation_base,
    }
}

fn pit_parts(pit: &RechargePit, table: &CostTable) -> Parts {
    if pit.count == 0 || pit.total_volume.value <= 0.0 {
        return Parts::default();
    }
    Parts {
        civil: pit.total_volume.value * table.recharge.pit_rate_per_m3,
        filtration: table.recharge.filter_chamber,
        pump: 0.0,
        installation: table.recharge.installation,
    }
}

fn trench_parts(trench: &RechargeTrench, table: &CostTable) -> Parts {
    if trench.length.value <= 0.0 {
        return Parts::default();
    }
    Parts {
        civil: trench.length.value * table.recharge.trench_rate_per_m,
        filtration: table.recharge.filter_chamber,
        pump: 0.0,
        installation: table.recharge.installation,
    }
}

fn well_parts(well: &InjectionWell, table: &CostTable) -> Parts {
    if well.annual_recharge_liters == 0 {
        return Parts::default();
    }
    Parts {
        civil: table.recharge.well_base
            + well.depth.value * table.recharge.well_drilling_rate_per_m,
        filtration: table.recharge.filter_chamber,
        pump: 0.0,
        installation: table.recharge.installation,
    }
}

fn assemble(parts: Parts, contingency_rate: f64) -> CostBreakdown {
    let tank_cost = parts.civil.max(0.0).round();
    let filtration_cost = parts.filtration.max(0.0).round();
    let pump_cost = parts.pump.max(0.0).round();
    let installation_cost = parts.installation.max(0.0).round();
    let base = tank_cost + filtration_cost + pump_cost + installation_cost;
    let contingency = (base * contingency_rate).round();
    CostBreakdown {
        tank_cost,
        filtration_cost,
        pump_cost,
        installation_cost,
        contingency,
        total_cost: base + contingency,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge_base::KnowledgeBase;
    use rainforge_schemas::environment::Measurement;
    use rainforge_schemas::property::SystemType;
    use rainforge_schemas::structure::{HybridSystem, TankPlacement};
    use rstest::rstest;

    fn table() -> CostTable {
        KnowledgeBase::builtin().unwrap().costs.cost_table
    }

    fn tank(capacity: u64, filtration: SystemType) -> StorageTank {
        StorageTank {
            capacity_liters: capacity,
            diameter: Measurement::meters(1.0),
            height: Measurement::meters(2.5),
            placement: TankPlacement::Overhead,
            filtration,
            pump: String::new(),
        }
    }

    fn pit(count: u32) -> RechargePit {
        RechargePit {
            count,
            length: Measurement::meters(2.0),
            width: Measurement::meters(2.0),
            depth: Measurement::meters(3.0),
            total_volume: Measurement::cubic_meters(12.0 * count as f64),
            design_inflow_liters: 1000,
            filter_media: String::new(),
        }
    }

    #[test]
    fn delhi_optimal_tank() {
        let c = price(&Structure::StorageTank(tank(15_015, SystemType::Standard)), &table());
        assert_eq!(c.tank_cost, 1_175_975.0);
        assert_eq!(c.filtration_cost, 25_000.0);
        assert_eq!(c.pump_cost, 18_000.0);
        assert_eq!(c.installation_cost, 20_000.0);
        assert!((c.contingency - 123_897.5).abs() <= 0.5);
        assert_eq!(c.total_cost, c.component_sum());
    }

    #[rstest]
    #[case(5_000, 425_000.0)]
    #[case(10_000, 850_000.0)]
    #[case(10_001, 850_065.0)]
    fn tank_rate_is_tiered(#[case] capacity: u64, #[case] expected: f64) {
        assert_eq!(tank_material_cost(capacity, &table().tank), expected);
    }

    #[rstest]
    #[case(8_000, 12_000.0)]
    #[case(10_000, 12_000.0)]
    #[case(25_000, 18_000.0)]
    #[case(80_000, 25_000.0)]
    fn pump_tier_by_capacity(#[case] capacity: u64, #[case] expected: f64) {
        let t = table();
        assert_eq!(pump_tier(capacity, &t).unwrap().cost, expected);
    }

    #[test]
    fn zero_capacity_costs_nothing() {
        let t = table();
        assert_eq!(
            price(&Structure::StorageTank(tank(0, SystemType::Premium)), &t),
            CostBreakdown::zero()
        );
        assert_eq!(price(&Structure::RechargePit(pit(0)), &t), CostBreakdown::zero());
        let hybrid = Structure::HybridSystem(HybridSystem {
            tank: tank(0, SystemType::Basic),
            overflow_pit: pit(0),
        });
        assert_eq!(price(&hybrid, &t), CostBreakdown::zero());
    }

    #[test]
    fn recharge_pit_priced_by_volume() {
        let c = price(&Structure::RechargePit(pit(2)), &table());
        assert_eq!(c.tank_cost, 60_000.0);
        assert_eq!(c.filtration_cost, 8_000.0);
        assert_eq!(c.pump_cost, 0.0);
        assert_eq!(c.installation_cost, 10_000.0);
        assert_eq!(c.contingency, 7_800.0);
        assert_eq!(c.total_cost, 85_800.0);
    }

    #[test]
    fn hybrid_adds_tank_and_pit() {
        let t = table();
        let hybrid = price(
            &Structure::HybridSystem(HybridSystem {
                tank: tank(3_000, SystemType::Basic),
                overflow_pit: pit(1),
            }),
            &t,
        );
        assert_eq!(hybrid.tank_cost, 3_000.0 * 85.0 + 30_000.0);
        assert_eq!(hybrid.filtration_cost, 15_000.0);
        assert_eq!(hybrid.installation_cost, 30_000.0);
        assert_eq!(hybrid.total_cost, hybrid.component_sum());
    }
}
