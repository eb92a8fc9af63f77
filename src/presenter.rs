//! Text and JSON rendering of turn reports.
//!
//! Nothing here reads input or sleeps; pacing belongs to the runner.

use std::io::{self, Write};

use serde::Serialize;

use crate::{engine::TurnReport, world::WorldSnapshot};

const RULE_WIDTH: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub struct Presenter<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> Presenter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn welcome(&mut self, total_turns: u32) -> io::Result<()> {
        if self.format == OutputFormat::Text {
            writeln!(self.out, "Welcome to the hazard simulation!")?;
            writeln!(
                self.out,
                "{total_turns} turns, two per month. Regions grow every turn."
            )?;
        }
        Ok(())
    }

    pub fn status(&mut self, snapshot: &WorldSnapshot, total_turns: u32) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                writeln!(
                    self.out,
                    "\nTurn {}/{} (Month {})",
                    snapshot.turn, total_turns, snapshot.month
                )?;
                writeln!(self.out, "\nRegion status:")?;
                self.rule()?;
                for region in &snapshot.regions {
                    writeln!(self.out, "{}: {} habitations", region.name, region.population)?;
                }
                self.rule()
            }
            OutputFormat::Json => self.json_line(snapshot),
        }
    }

    pub fn turn(&mut self, report: &TurnReport, total_turns: u32) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                writeln!(
                    self.out,
                    "\n=== Turn {}/{} (Month {}) ===",
                    report.turn, total_turns, report.month
                )?;
                self.rule()?;
                for region in &report.regions {
                    writeln!(self.out, "{}: {} habitations", region.name, region.population)?;
                }
                self.rule()?;
                writeln!(self.out, "\nHazard events this turn:")?;
                for event in &report.events {
                    writeln!(
                        self.out,
                        "{} is struck by {} ({}, {}% chance) with severity {}",
                        event.region, event.hazard, event.category, event.probability, event.severity
                    )?;
                }
                for region in &report.quiet_regions {
                    writeln!(self.out, "{region} stays quiet")?;
                }
                Ok(())
            }
            OutputFormat::Json => self.json_line(report),
        }
    }

    pub fn farewell(&mut self) -> io::Result<()> {
        if self.format == OutputFormat::Text {
            writeln!(self.out, "\nSimulation over. Thanks for playing!")?;
        }
        self.out.flush()
    }

    fn rule(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", "-".repeat(RULE_WIDTH))
    }

    fn json_line<T: Serialize>(&mut self, value: &T) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, value)?;
        writeln!(self.out)
    }
}
