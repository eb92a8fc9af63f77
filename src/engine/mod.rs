mod report;

use thiserror::Error;
use tracing::{debug, info};

pub use report::{HazardEvent, TurnReport};

use crate::{
    catalog::Catalog,
    rng::{RandomSource, SeededRandom},
    systems::{GrowthSystem, HazardSystem},
    world::{WorldSnapshot, WorldState},
};

pub const DEFAULT_TOTAL_TURNS: u32 = 24;

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub total_turns: u32,
    pub seed: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            total_turns: DEFAULT_TOTAL_TURNS,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    NotStarted,
    Running,
    Finished,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("simulation already finished after turn {turn} of {total_turns}")]
    InvalidState { turn: u32, total_turns: u32 },
}

pub struct TurnContext<'a> {
    pub turn: u32,
    pub month: u32,
    pub catalog: &'a Catalog,
}

/// One step of the per-turn pipeline. Systems run in registration order and
/// record what happened into the report being built. Catalog data is validated
/// up front, so a system has no failure path: a turn either runs in full or is
/// refused before the world is touched.
pub trait TurnSystem {
    fn name(&self) -> &str;
    fn run(
        &mut self,
        ctx: &TurnContext<'_>,
        world: &mut WorldState,
        rng: &mut dyn RandomSource,
        report: &mut TurnReport,
    );
}

pub struct Engine<R: RandomSource = SeededRandom> {
    catalog: Catalog,
    world: WorldState,
    rng: R,
    systems: Vec<Box<dyn TurnSystem>>,
    total_turns: u32,
    state: EngineState,
}

impl Engine<SeededRandom> {
    pub fn with_settings(catalog: Catalog, settings: EngineSettings) -> Self {
        Engine::with_total_turns(catalog, SeededRandom::new(settings.seed), settings.total_turns)
    }
}

impl<R: RandomSource> Engine<R> {
    pub fn new(catalog: Catalog, rng: R) -> Self {
        Self::with_total_turns(catalog, rng, DEFAULT_TOTAL_TURNS)
    }

    /// A run always has at least one turn.
    pub fn with_total_turns(catalog: Catalog, rng: R, total_turns: u32) -> Self {
        let world = WorldState::new(&catalog);
        Self {
            catalog,
            world,
            rng,
            systems: vec![Box::new(GrowthSystem::new()), Box::new(HazardSystem::new())],
            total_turns: total_turns.max(1),
            state: EngineState::NotStarted,
        }
    }

    /// Appends a system that runs after growth and hazard resolution.
    pub fn with_system(mut self, system: impl TurnSystem + 'static) -> Self {
        self.push_system(system);
        self
    }

    pub fn push_system(&mut self, system: impl TurnSystem + 'static) {
        self.systems.push(Box::new(system));
    }

    /// Plays one turn. Fails without touching the world once the run is over.
    pub fn advance_turn(&mut self) -> Result<TurnReport, EngineError> {
        if self.state == EngineState::Finished {
            return Err(EngineError::InvalidState {
                turn: self.world.turn(),
                total_turns: self.total_turns,
            });
        }

        self.world.advance_time();
        let ctx = TurnContext {
            turn: self.world.turn(),
            month: self.world.month(),
            catalog: &self.catalog,
        };
        let mut report = TurnReport::new(ctx.turn, ctx.month);
        for system in &mut self.systems {
            debug!(turn = ctx.turn, system = system.name(), "running turn system");
            system.run(&ctx, &mut self.world, &mut self.rng, &mut report);
        }
        report.regions = self.world.region_snapshots();

        self.state = if ctx.turn >= self.total_turns {
            info!(
                turns = ctx.turn,
                total_population = self.world.total_population(),
                "simulation finished"
            );
            EngineState::Finished
        } else {
            EngineState::Running
        };
        Ok(report)
    }

    pub fn is_finished(&self) -> bool {
        self.state == EngineState::Finished
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn current_turn(&self) -> u32 {
        self.world.turn()
    }

    pub fn total_turns(&self) -> u32 {
        self.total_turns
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        self.world.snapshot()
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}
