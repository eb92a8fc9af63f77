//! Strike probability and severity formulas.
//!
//! Everything here is a pure function of catalog data and the current world.

use crate::catalog::HazardDefinition;
use crate::world::{RegionState, WorldState};

/// Population per extra severity point within the struck region.
pub const REGIONAL_OVERLOAD_STEP: u32 = 5;
/// Population per extra severity point across the whole world.
pub const GLOBAL_PRESSURE_STEP: u32 = 20;

/// Percent chance in `0..=100` that `hazard` qualifies on `turn`.
///
/// Rises by one point every two turns and saturates at 100.
pub fn strike_probability(hazard: &HazardDefinition, turn: u32) -> u32 {
    let ramp = turn.saturating_sub(1) / 2;
    (hazard.base_probability_percent + ramp).min(100)
}

/// A roll in `[0, 100)` qualifies when it falls below the probability.
pub fn qualifies(probability: u32, roll: f64) -> bool {
    roll < f64::from(probability)
}

pub fn severity(hazard: &HazardDefinition, region: &RegionState, world: &WorldState) -> u32 {
    severity_for_populations(hazard, region.population, world.total_population())
}

/// Severity in `base_severity..=max_severity` given regional and global load.
pub fn severity_for_populations(
    hazard: &HazardDefinition,
    regional_population: u32,
    global_population: u32,
) -> u32 {
    let regional_overload = regional_population / REGIONAL_OVERLOAD_STEP;
    let global_pressure = global_population / GLOBAL_PRESSURE_STEP;
    (hazard.base_severity + regional_overload + global_pressure).min(hazard.max_severity)
}
