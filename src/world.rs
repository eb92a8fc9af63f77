use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionState {
    pub name: String,
    pub population: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSnapshot {
    pub name: String,
    pub population: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub turn: u32,
    pub month: u32,
    pub total_population: u32,
    pub regions: Vec<RegionSnapshot>,
}

/// Two turns make a month. Before the first turn the calendar sits in month 1.
pub fn month_for_turn(turn: u32) -> u32 {
    turn.saturating_sub(1) / 2 + 1
}

/// Mutable per-run state. Regions keep catalog order so seeded runs replay
/// identically; the set is fixed at construction.
#[derive(Debug, Clone)]
pub struct WorldState {
    turn: u32,
    regions: Vec<RegionState>,
    index: HashMap<String, usize>,
}

impl WorldState {
    pub fn new(catalog: &Catalog) -> Self {
        let regions: Vec<RegionState> = catalog
            .regions()
            .iter()
            .map(|region| RegionState {
                name: region.name.clone(),
                population: 0,
            })
            .collect();
        let index = regions
            .iter()
            .enumerate()
            .map(|(idx, region)| (region.name.clone(), idx))
            .collect();
        Self {
            turn: 0,
            regions,
            index,
        }
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn month(&self) -> u32 {
        month_for_turn(self.turn)
    }

    pub(crate) fn advance_time(&mut self) {
        self.turn += 1;
    }

    /// Adds one habitation to every region.
    pub(crate) fn grow_all(&mut self) {
        for region in &mut self.regions {
            region.population += 1;
        }
    }

    pub fn regions(&self) -> &[RegionState] {
        &self.regions
    }

    pub fn region(&self, name: &str) -> Option<&RegionState> {
        self.index.get(name).map(|&idx| &self.regions[idx])
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn total_population(&self) -> u32 {
        self.regions.iter().map(|region| region.population).sum()
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            turn: self.turn,
            month: self.month(),
            total_population: self.total_population(),
            regions: self.region_snapshots(),
        }
    }

    pub fn region_snapshots(&self) -> Vec<RegionSnapshot> {
        self.regions
            .iter()
            .map(|region| RegionSnapshot {
                name: region.name.clone(),
                population: region.population,
            })
            .collect()
    }
}
