use crate::{
    engine::{TurnContext, TurnReport, TurnSystem},
    rng::RandomSource,
    world::WorldState,
};

/// Every region gains one habitation per turn, unconditionally.
pub struct GrowthSystem;

impl GrowthSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GrowthSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnSystem for GrowthSystem {
    fn name(&self) -> &str {
        "growth"
    }

    fn run(
        &mut self,
        _ctx: &TurnContext<'_>,
        world: &mut WorldState,
        _rng: &mut dyn RandomSource,
        _report: &mut TurnReport,
    ) {
        world.grow_all();
    }
}
