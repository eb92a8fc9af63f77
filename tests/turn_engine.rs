use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use hazard_sim::{
    catalog::{HazardCategory, HazardDefinition, RegionDefinition},
    engine::{TurnContext, TurnSystem},
    world::WorldState,
    Catalog, Engine, EngineError, EngineSettings, EngineState, FixedRandom, RandomSource,
    TurnReport,
};

fn builtin() -> Catalog {
    Catalog::builtin().expect("builtin catalog is valid")
}

fn run_to_end<R: hazard_sim::RandomSource>(engine: &mut Engine<R>) -> Vec<TurnReport> {
    let mut reports = Vec::new();
    while !engine.is_finished() {
        reports.push(engine.advance_turn().expect("turn succeeds"));
    }
    reports
}

fn hazard(region: &str, name: &str, max: u32, probability: u32) -> HazardDefinition {
    HazardDefinition {
        name: name.into(),
        base_severity: 1,
        max_severity: max,
        category: HazardCategory::Other,
        region: region.into(),
        base_probability_percent: probability,
    }
}

#[test]
fn engine_starts_at_turn_zero() {
    let engine = Engine::new(builtin(), FixedRandom::new());
    assert_eq!(engine.state(), EngineState::NotStarted);
    assert!(!engine.is_finished());
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.turn, 0);
    assert_eq!(snapshot.month, 1);
    assert_eq!(snapshot.total_population, 0);
    assert_eq!(snapshot.regions.len(), 6);
}

#[test]
fn month_follows_turn() {
    let mut engine = Engine::new(builtin(), FixedRandom::new());
    for turn in 1..=24 {
        let report = engine.advance_turn().unwrap();
        assert_eq!(report.turn, turn);
        assert_eq!(report.month, (turn - 1) / 2 + 1);
    }
    assert_eq!(engine.snapshot().month, 12);
}

#[test]
fn population_grows_by_one_every_turn() {
    let mut engine = Engine::with_settings(builtin(), EngineSettings::default());
    let mut previous = engine.snapshot();
    while !engine.is_finished() {
        engine.advance_turn().unwrap();
        let current = engine.snapshot();
        for (before, after) in previous.regions.iter().zip(&current.regions) {
            assert_eq!(before.name, after.name);
            assert_eq!(after.population, before.population + 1);
        }
        assert_ne!(previous, current, "every turn must change the world");
        previous = current;
    }
    assert!(previous.regions.iter().all(|r| r.population == 24));
    assert_eq!(previous.total_population, 144);
}

#[test]
fn state_moves_through_lifecycle() {
    let mut engine = Engine::new(builtin(), FixedRandom::new());
    engine.advance_turn().unwrap();
    assert_eq!(engine.state(), EngineState::Running);
    let reports = run_to_end(&mut engine);
    assert_eq!(reports.len(), 23);
    assert_eq!(engine.state(), EngineState::Finished);
    assert_eq!(engine.current_turn(), 24);
}

#[test]
fn final_turn_report_is_complete() {
    let mut engine = Engine::new(builtin(), FixedRandom::new());
    let last = run_to_end(&mut engine).pop().unwrap();
    assert_eq!(last.turn, 24);
    assert_eq!(last.month, 12);
    assert_eq!(last.regions.len(), 6);
    assert_eq!(last.events.len(), 2);
}

#[test]
fn advancing_after_finish_fails_without_mutation() {
    let mut engine = Engine::new(builtin(), FixedRandom::new());
    run_to_end(&mut engine);
    let before = engine.snapshot();

    let err = engine.advance_turn().unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidState {
            turn: 24,
            total_turns: 24
        }
    );
    assert_eq!(engine.snapshot(), before);
    assert!(engine.advance_turn().is_err());
}

#[test]
fn fixed_source_picks_first_regions_and_hazards() {
    let mut engine = Engine::new(builtin(), FixedRandom::new());
    let report = engine.advance_turn().unwrap();

    assert_eq!(report.targeted_regions(), vec!["Europe", "Asia"]);
    assert!(report.quiet_regions.is_empty());

    let europe = report.event_for("Europe").unwrap();
    assert_eq!(europe.hazard, "European Flood");
    assert_eq!(europe.category, HazardCategory::Flood);
    assert_eq!(europe.probability, 25);
    assert_eq!(europe.severity, 1);

    let asia = report.event_for("Asia").unwrap();
    assert_eq!(asia.hazard, "Asian Typhoon");
    assert_eq!(asia.probability, 30);
}

#[test]
fn fixed_source_replays_identically() {
    let mut first = Engine::new(builtin(), FixedRandom::new());
    let mut second = Engine::new(builtin(), FixedRandom::new());
    assert_eq!(run_to_end(&mut first), run_to_end(&mut second));
}

#[test]
fn high_rolls_leave_regions_quiet() {
    let mut engine = Engine::new(builtin(), FixedRandom::new().with_percent(99.9));
    let report = engine.advance_turn().unwrap();
    assert!(report.events.is_empty());
    assert_eq!(report.quiet_regions, vec!["Europe", "Asia"]);
}

#[test]
fn max_picks_draw_three_regions_and_last_hazard() {
    let mut engine = Engine::new(builtin(), FixedRandom::new().picking_max());
    let report = engine.advance_turn().unwrap();
    assert_eq!(report.targeted_regions(), vec!["Europe", "Asia", "Africa"]);
    assert_eq!(report.event_for("Europe").unwrap().hazard, "Alpine Flash Flood");
    assert_eq!(report.event_for("Asia").unwrap().hazard, "Industrial Smog");
    assert_eq!(
        report.event_for("Africa").unwrap().hazard,
        "Mozambique Channel Cyclone"
    );
}

#[test]
fn late_severity_is_clamped() {
    let mut engine = Engine::new(builtin(), FixedRandom::new());
    let last = run_to_end(&mut engine).pop().unwrap();
    // 1 + 24/5 + 144/20 = 12, capped at the flood's max of 4.
    assert_eq!(last.event_for("Europe").unwrap().severity, 4);
    // 1 + 24/5 + 144/20 = 12, capped at the typhoon's max of 5.
    assert_eq!(last.event_for("Asia").unwrap().severity, 5);
}

#[test]
fn seeded_runs_replay_identically() {
    let settings = EngineSettings {
        total_turns: 24,
        seed: 2024,
    };
    let mut first = Engine::with_settings(builtin(), settings.clone());
    let mut second = Engine::with_settings(builtin(), settings);
    assert_eq!(run_to_end(&mut first), run_to_end(&mut second));
}

#[test]
fn seeded_turns_draw_two_or_three_distinct_regions() {
    for seed in 0..40 {
        let settings = EngineSettings {
            total_turns: 24,
            seed,
        };
        let mut engine = Engine::with_settings(builtin(), settings);
        for report in run_to_end(&mut engine) {
            let targeted = report.targeted_regions();
            assert!((2..=3).contains(&targeted.len()), "seed {seed}: {targeted:?}");
            let unique: HashSet<_> = targeted.iter().collect();
            assert_eq!(unique.len(), targeted.len(), "seed {seed}: duplicate region");
        }
    }
}

#[test]
fn seeded_events_respect_catalog_bounds() {
    let catalog = builtin();
    let mut engine = Engine::with_settings(catalog.clone(), EngineSettings::default());
    for report in run_to_end(&mut engine) {
        for event in &report.events {
            let region = catalog.region(&event.region).unwrap();
            let hazard = region
                .hazards
                .iter()
                .find(|h| h.name == event.hazard)
                .expect("event names a hazard of its region");
            assert!(event.severity >= hazard.base_severity);
            assert!(event.severity <= hazard.max_severity);
            assert!(event.probability >= hazard.base_probability_percent);
            assert!(event.probability <= 100);
        }
    }
}

#[test]
fn region_without_hazards_is_always_quiet() {
    let catalog = Catalog::new(
        vec![
            RegionDefinition {
                name: "Barren".into(),
                hazards: Vec::new(),
            },
            RegionDefinition {
                name: "Stormy".into(),
                hazards: vec![hazard("Stormy", "Gale", 3, 100)],
            },
        ],
        Vec::new(),
    )
    .unwrap();
    let mut engine = Engine::new(catalog, FixedRandom::new());
    let report = engine.advance_turn().unwrap();
    assert_eq!(report.quiet_regions, vec!["Barren"]);
    assert_eq!(report.event_for("Stormy").unwrap().hazard, "Gale");
}

#[test]
fn draw_is_capped_by_region_count() {
    let catalog = Catalog::new(
        vec![RegionDefinition {
            name: "Island".into(),
            hazards: vec![hazard("Island", "Swell", 2, 50)],
        }],
        Vec::new(),
    )
    .unwrap();
    let mut engine = Engine::with_total_turns(catalog, FixedRandom::new().picking_max(), 3);
    let reports = run_to_end(&mut engine);
    assert_eq!(reports.len(), 3);
    for report in reports {
        assert_eq!(report.targeted_regions(), vec!["Island"]);
    }
}

/// Hands back the same region for every slot of the draw.
struct DuplicatingSource;

impl RandomSource for DuplicatingSource {
    fn sample_without_replacement(&mut self, _population: usize, count: usize) -> Vec<usize> {
        vec![0; count]
    }

    fn uniform_int(&mut self, min: u32, _max: u32) -> u32 {
        min
    }

    fn uniform_percent(&mut self) -> f64 {
        0.0
    }
}

/// Returns indices past the region list and integers past every range.
struct OutOfRangeSource;

impl RandomSource for OutOfRangeSource {
    fn sample_without_replacement(&mut self, population: usize, _count: usize) -> Vec<usize> {
        vec![population, population + 7, 1, 1]
    }

    fn uniform_int(&mut self, _min: u32, _max: u32) -> u32 {
        u32::MAX
    }

    fn uniform_percent(&mut self) -> f64 {
        0.0
    }
}

#[test]
fn duplicate_draws_strike_a_region_once() {
    let mut engine = Engine::new(builtin(), DuplicatingSource);
    for report in run_to_end(&mut engine) {
        assert_eq!(report.targeted_regions(), vec!["Europe"]);
        assert_eq!(report.events.len(), 1);
    }
}

#[test]
fn out_of_range_draws_are_dropped_not_fatal() {
    let mut engine = Engine::new(builtin(), OutOfRangeSource);
    let report = engine.advance_turn().unwrap();
    assert_eq!(report.targeted_regions(), vec!["Asia"]);
    assert_eq!(report.event_for("Asia").unwrap().hazard, "Industrial Smog");

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.turn, 1);
    assert!(snapshot.regions.iter().all(|r| r.population == 1));

    let reports = run_to_end(&mut engine);
    assert_eq!(reports.len(), 23);
    assert!(engine.snapshot().regions.iter().all(|r| r.population == 24));
}

#[test]
fn severity_uses_post_growth_populations() {
    let regions = ["North", "South", "East", "West", "Upper", "Lower"]
        .into_iter()
        .map(|name| RegionDefinition {
            name: name.into(),
            hazards: vec![hazard(name, "Overload", 100, 100)],
        })
        .collect();
    let catalog = Catalog::new(regions, Vec::new()).unwrap();
    let mut engine = Engine::new(catalog, FixedRandom::new());

    let reports: Vec<_> = (0..10).map(|_| engine.advance_turn().unwrap()).collect();
    let tenth = reports.last().unwrap();
    assert_eq!(tenth.turn, 10);
    assert_eq!(engine.snapshot().total_population, 60);
    // 1 + 10/5 + 60/20
    assert_eq!(tenth.event_for("North").unwrap().severity, 6);
    assert_eq!(tenth.event_for("South").unwrap().severity, 6);

    // 1 + 3/5 + 18/20 at turn 3: both bonus terms still zero.
    assert_eq!(reports[2].event_for("North").unwrap().severity, 1);
    // 1 + 5/5 + 30/20 at turn 5.
    assert_eq!(reports[4].event_for("North").unwrap().severity, 3);
}

struct PopulationLog {
    seen: Rc<RefCell<Vec<(u32, u32)>>>,
}

impl TurnSystem for PopulationLog {
    fn name(&self) -> &str {
        "population-log"
    }

    fn run(
        &mut self,
        ctx: &TurnContext<'_>,
        world: &mut WorldState,
        _rng: &mut dyn RandomSource,
        _report: &mut TurnReport,
    ) {
        self.seen
            .borrow_mut()
            .push((ctx.turn, world.total_population()));
    }
}

#[test]
fn extra_systems_run_after_builtin_ones() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let later = Rc::new(RefCell::new(Vec::new()));
    let mut engine = Engine::with_total_turns(builtin(), FixedRandom::new(), 3).with_system(
        PopulationLog {
            seen: Rc::clone(&seen),
        },
    );
    engine.push_system(PopulationLog {
        seen: Rc::clone(&later),
    });

    run_to_end(&mut engine);
    assert_eq!(*seen.borrow(), vec![(1, 6), (2, 12), (3, 18)]);
    assert_eq!(*later.borrow(), *seen.borrow());
}
