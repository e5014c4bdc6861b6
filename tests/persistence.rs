//! Save files on disk

use std::path::PathBuf;

use civsim::{SimError, Simulation, SimulationConfig};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("civsim_{}_{}.json", name, std::process::id()))
}

fn config() -> SimulationConfig {
    SimulationConfig {
        seed: 1234,
        world_width: 60,
        world_height: 60,
        auto_pause_on_events: false,
        ..SimulationConfig::default()
    }
}

#[test]
fn test_save_and_load_round_trip_on_disk() {
    let path = temp_path("round_trip");
    let mut sim = Simulation::new(config()).unwrap();
    sim.initialize(4);
    sim.run(30);
    sim.save_state(&path).unwrap();

    let mut loaded = Simulation::new(config()).unwrap();
    loaded.load_state(&path).unwrap();

    assert_eq!(loaded.year(), sim.year());
    assert_eq!(loaded.current_tick(), sim.current_tick());
    assert_eq!(loaded.civilization_count(), sim.civilization_count());
    assert_eq!(loaded.event_log().len(), sim.event_log().len());
    assert_eq!(loaded.civilization_history().len(), sim.civilization_history().len());
    let a: Vec<_> = sim.active_civilizations().cloned().collect();
    let b: Vec<_> = loaded.active_civilizations().cloned().collect();
    assert_eq!(a, b);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_loaded_run_matches_uninterrupted_run() {
    let path = temp_path("continue");
    let mut sim = Simulation::new(config()).unwrap();
    sim.initialize(5);
    sim.run(25);
    sim.save_state(&path).unwrap();

    let mut loaded = Simulation::new(config()).unwrap();
    loaded.load_state(&path).unwrap();
    sim.run(40);
    loaded.run(40);

    let a: Vec<_> = sim.active_civilizations().cloned().collect();
    let b: Vec<_> = loaded.active_civilizations().cloned().collect();
    assert_eq!(a, b);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_missing_file_is_an_io_error() {
    let mut sim = Simulation::new(config()).unwrap();
    sim.initialize(2);
    let before = sim.roster_ids();

    let result = sim.load_state(&temp_path("does_not_exist"));

    assert!(matches!(result, Err(SimError::Io(_))));
    assert_eq!(sim.roster_ids(), before);
}

#[test]
fn test_load_into_differently_sized_world_fails() {
    let path = temp_path("mismatch");
    let mut sim = Simulation::new(config()).unwrap();
    sim.initialize(2);
    sim.save_state(&path).unwrap();

    let mut other = Simulation::new(SimulationConfig {
        world_width: 50,
        ..config()
    })
    .unwrap();

    assert!(matches!(
        other.load_state(&path),
        Err(SimError::DimensionMismatch { .. })
    ));
    assert_eq!(other.civilization_count(), 0);

    let _ = std::fs::remove_file(&path);
}
