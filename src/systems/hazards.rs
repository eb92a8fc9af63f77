use std::collections::HashSet;

use tracing::debug;

use crate::{
    engine::{HazardEvent, TurnContext, TurnReport, TurnSystem},
    hazard::{qualifies, severity, strike_probability},
    rng::RandomSource,
    world::WorldState,
};

/// Fewest and most regions drawn for hazard checks each turn.
const MIN_TARGETS: u32 = 2;
const MAX_TARGETS: u32 = 3;

/// Keeps the first occurrence of each valid index so a region is never struck
/// twice in one turn, whatever the source hands back.
fn distinct_in_range(indices: Vec<usize>, len: usize) -> Vec<usize> {
    let mut seen = HashSet::with_capacity(indices.len());
    indices
        .into_iter()
        .filter(|&idx| idx < len && seen.insert(idx))
        .collect()
}

/// Draws a handful of regions and resolves at most one hazard in each.
pub struct HazardSystem;

impl HazardSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HazardSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnSystem for HazardSystem {
    fn name(&self) -> &str {
        "hazards"
    }

    fn run(
        &mut self,
        ctx: &TurnContext<'_>,
        world: &mut WorldState,
        rng: &mut dyn RandomSource,
        report: &mut TurnReport,
    ) {
        let region_count = world.region_count();
        let draw = rng
            .uniform_int(MIN_TARGETS, MAX_TARGETS)
            .clamp(MIN_TARGETS, MAX_TARGETS) as usize;
        let draw = draw.min(region_count);
        let mut targets =
            distinct_in_range(rng.sample_without_replacement(region_count, draw), region_count);
        targets.truncate(draw);
        debug!(turn = ctx.turn, targets = targets.len(), "hazard regions drawn");

        let world: &WorldState = world;
        for idx in targets {
            let definition = &ctx.catalog.regions()[idx];
            let region = &world.regions()[idx];

            // Each hazard gets its own Bernoulli trial.
            let qualifying: Vec<_> = definition
                .hazards
                .iter()
                .filter_map(|hazard| {
                    let probability = strike_probability(hazard, ctx.turn);
                    qualifies(probability, rng.uniform_percent()).then_some((hazard, probability))
                })
                .collect();

            if qualifying.is_empty() {
                debug!(turn = ctx.turn, region = %region.name, "no hazard qualified");
                report.quiet_regions.push(region.name.clone());
                continue;
            }

            let last = qualifying.len() - 1;
            let pick = (rng.uniform_int(0, last as u32) as usize).min(last);
            let (hazard, probability) = qualifying[pick];
            let event = HazardEvent {
                region: region.name.clone(),
                hazard: hazard.name.clone(),
                category: hazard.category,
                probability,
                severity: severity(hazard, region, world),
            };
            debug!(
                turn = ctx.turn,
                region = %event.region,
                hazard = %event.hazard,
                severity = event.severity,
                "hazard struck"
            );
            report.events.push(event);
        }
    }
}
