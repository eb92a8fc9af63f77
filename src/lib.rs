pub mod catalog;
pub mod engine;
pub mod hazard;
pub mod presenter;
pub mod rng;
pub mod systems;
pub mod world;

pub use catalog::{Catalog, CatalogError};
pub use engine::{Engine, EngineError, EngineSettings, EngineState, TurnReport};
pub use rng::{FixedRandom, RandomSource, SeededRandom};
