mod growth;
mod hazards;

pub use growth::GrowthSystem;
pub use hazards::HazardSystem;
