use serde::{Deserialize, Serialize};

use crate::{catalog::HazardCategory, world::RegionSnapshot};

/// A hazard that struck a region this turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardEvent {
    pub region: String,
    pub hazard: String,
    pub category: HazardCategory,
    /// Strike probability, in percent, the hazard qualified under.
    pub probability: u32,
    pub severity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    pub turn: u32,
    pub month: u32,
    /// Populations after growth, in catalog order.
    pub regions: Vec<RegionSnapshot>,
    pub events: Vec<HazardEvent>,
    /// Regions drawn this turn where no hazard qualified.
    pub quiet_regions: Vec<String>,
}

impl TurnReport {
    pub fn new(turn: u32, month: u32) -> Self {
        Self {
            turn,
            month,
            regions: Vec::new(),
            events: Vec::new(),
            quiet_regions: Vec::new(),
        }
    }

    /// Every region drawn this turn, struck or quiet.
    pub fn targeted_regions(&self) -> Vec<&str> {
        self.events
            .iter()
            .map(|event| event.region.as_str())
            .chain(self.quiet_regions.iter().map(String::as_str))
            .collect()
    }

    pub fn event_for(&self, region: &str) -> Option<&HazardEvent> {
        self.events.iter().find(|event| event.region == region)
    }
}
