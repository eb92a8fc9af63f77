//! Static region, hazard and mitigation tables.
//!
//! The tables are parsed from YAML and validated once. After construction a
//! [`Catalog`] is never mutated, so every bound checked here holds for the
//! whole run.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.yaml");

fn default_base_probability() -> u32 {
    20
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardCategory {
    Flood,
    Wind,
    Fire,
    Earthquake,
    Insect,
    Other,
}

impl fmt::Display for HazardCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Flood => "flood",
            Self::Wind => "wind",
            Self::Fire => "fire",
            Self::Earthquake => "earthquake",
            Self::Insect => "insect",
            Self::Other => "other",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HazardDefinition {
    pub name: String,
    pub base_severity: u32,
    pub max_severity: u32,
    pub category: HazardCategory,
    /// Name of the owning region.
    pub region: String,
    pub base_probability_percent: u32,
}

/// Protective measure. Present in the tables, not consulted by any formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mitigation {
    pub name: String,
    pub resistance: u32,
    pub category: HazardCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionDefinition {
    pub name: String,
    pub hazards: Vec<HazardDefinition>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("catalog must define at least one region")]
    NoRegions,
    #[error("region '{0}' defined more than once")]
    DuplicateRegion(String),
    #[error("hazard '{hazard}' has base severity {base} above max severity {max}")]
    SeverityBounds { hazard: String, base: u32, max: u32 },
    #[error("hazard '{0}' must have a positive base severity")]
    ZeroSeverity(String),
    #[error("hazard '{hazard}' has probability {percent}% outside 0..=100")]
    ProbabilityOutOfRange { hazard: String, percent: u32 },
    #[error("hazard '{hazard}' references region '{referenced}' but is listed under '{owner}'")]
    RegionMismatch {
        hazard: String,
        referenced: String,
        owner: String,
    },
    #[error("mitigation '{0}' must have a positive resistance")]
    ZeroResistance(String),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    regions: Vec<RegionEntry>,
    #[serde(default)]
    mitigations: Vec<Mitigation>,
}

#[derive(Debug, Deserialize)]
struct RegionEntry {
    name: String,
    #[serde(default)]
    hazards: Vec<HazardEntry>,
}

#[derive(Debug, Deserialize)]
struct HazardEntry {
    name: String,
    base_severity: u32,
    max_severity: u32,
    category: HazardCategory,
    #[serde(default)]
    region: Option<String>,
    #[serde(default = "default_base_probability")]
    base_probability_percent: u32,
}

impl RegionEntry {
    fn into_definition(self) -> RegionDefinition {
        let hazards = self
            .hazards
            .into_iter()
            .map(|hazard| HazardDefinition {
                region: hazard.region.unwrap_or_else(|| self.name.clone()),
                name: hazard.name,
                base_severity: hazard.base_severity,
                max_severity: hazard.max_severity,
                category: hazard.category,
                base_probability_percent: hazard.base_probability_percent,
            })
            .collect();
        RegionDefinition {
            name: self.name,
            hazards,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    regions: Vec<RegionDefinition>,
    mitigations: Vec<Mitigation>,
}

impl Catalog {
    /// Builds a catalog, rejecting bad data before any turn can run.
    pub fn new(
        regions: Vec<RegionDefinition>,
        mitigations: Vec<Mitigation>,
    ) -> Result<Self, CatalogError> {
        let catalog = Self {
            regions,
            mitigations,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The six-region tables shipped with the simulation.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_yaml_str(BUILTIN_CATALOG)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yaml::from_str(text)?;
        let regions = file
            .regions
            .into_iter()
            .map(RegionEntry::into_definition)
            .collect();
        Self::new(regions, file.mitigations)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.regions.is_empty() {
            return Err(CatalogError::NoRegions);
        }

        let mut known = HashSet::new();
        for region in &self.regions {
            if !known.insert(region.name.as_str()) {
                return Err(CatalogError::DuplicateRegion(region.name.clone()));
            }
            for hazard in &region.hazards {
                validate_hazard(hazard, &region.name)?;
            }
        }

        for mitigation in &self.mitigations {
            if mitigation.resistance == 0 {
                return Err(CatalogError::ZeroResistance(mitigation.name.clone()));
            }
        }
        Ok(())
    }

    pub fn regions(&self) -> &[RegionDefinition] {
        &self.regions
    }

    pub fn region(&self, name: &str) -> Option<&RegionDefinition> {
        self.regions.iter().find(|region| region.name == name)
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn mitigations(&self) -> &[Mitigation] {
        &self.mitigations
    }

    pub fn hazard_count(&self) -> usize {
        self.regions.iter().map(|region| region.hazards.len()).sum()
    }
}

fn validate_hazard(hazard: &HazardDefinition, owner: &str) -> Result<(), CatalogError> {
    if hazard.base_severity == 0 {
        return Err(CatalogError::ZeroSeverity(hazard.name.clone()));
    }
    if hazard.base_severity > hazard.max_severity {
        return Err(CatalogError::SeverityBounds {
            hazard: hazard.name.clone(),
            base: hazard.base_severity,
            max: hazard.max_severity,
        });
    }
    if hazard.base_probability_percent > 100 {
        return Err(CatalogError::ProbabilityOutOfRange {
            hazard: hazard.name.clone(),
            percent: hazard.base_probability_percent,
        });
    }
    if hazard.region != owner {
        return Err(CatalogError::RegionMismatch {
            hazard: hazard.name.clone(),
            referenced: hazard.region.clone(),
            owner: owner.to_string(),
        });
    }
    Ok(())
}
