use seat_projection::apportion::Method;
use seat_projection::beliefs::BeliefSet;
use seat_projection::commands::{self, DataArgs, ModelArgs, SimulationArgs};
use seat_projection::config::Config;
use seat_projection::congress::Congress;
use seat_projection::model::Chamber;
use seat_projection::projection::{project, ProjectionParams};
use seat_projection::simulation::{self, SimulationParams};
use std::fs;
use std::path::{Path, PathBuf};

fn shipped_config() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("seatsim.yaml")
}

fn shipped_beliefs() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data/beliefs_2025.yaml")
}

fn load() -> (Config, Congress, BeliefSet) {
    let config = Config::from_file(&shipped_config()).unwrap();
    let files = config.resolve_data_files(None).unwrap();
    let congress = Congress::load(&files.structure, &files.composition).unwrap();
    let beliefs = BeliefSet::from_file(&shipped_beliefs()).unwrap();
    (config, congress, beliefs)
}

#[test]
fn projection_fills_every_seat_up() {
    let (config, congress, beliefs) = load();
    for method in [Method::Hare, Method::DHondt] {
        let params = ProjectionParams {
            method,
            ..config.projection_params()
        };
        let projection = project(&congress, &beliefs, params).unwrap();
        for chamber in Chamber::ALL {
            let outcome = projection.chamber(chamber);
            for (section, &seats) in congress.seats_up(chamber) {
                let elected: i64 = outcome.elected.0[section].values().sum();
                assert_eq!(elected, seats as i64, "{} {} {}", method, chamber, section);
            }
            let sitting: i64 = congress.current_composition(chamber).totals().values().sum();
            let total: i64 = outcome.totals.values().sum();
            assert_eq!(total, sitting, "chamber size is preserved");
            assert_eq!(outcome.change.values().sum::<i64>(), 0);
        }
    }
}

#[test]
fn regional_party_only_wins_at_home() {
    let (config, congress, beliefs) = load();
    let projection = project(&congress, &beliefs, config.projection_params()).unwrap();
    let deputies = &projection.deputies.elected;
    for section in deputies.sections() {
        if section != "Sierra" {
            assert_eq!(deputies.get(section, "Partido Serrano"), 0);
        }
    }
    assert!(deputies.get("Sierra", "Partido Serrano") > 0);
}

#[test]
fn seeded_simulation_is_stable() {
    let (config, congress, beliefs) = load();
    let visible = config.visible_alliances.clone();
    let params = SimulationParams {
        draws: 200,
        seed: Some(11),
        ..config.simulation_params()
    };
    let a = simulation::run(&congress, &beliefs.global, &visible, params).unwrap();
    let b = simulation::run(&congress, &beliefs.global, &visible, params).unwrap();
    assert_eq!(a.deputies.matrix, b.deputies.matrix);
    assert_eq!(a.deputies.summary, b.deputies.summary);

    let up: i64 = congress.seats_up(Chamber::Deputies).values().map(|&s| s as i64).sum();
    assert!(a.deputies.matrix.rows.iter().all(|row| row.iter().sum::<i64>() == up));
}

#[test]
fn commands_write_reports() {
    let dir = tempfile::tempdir().unwrap();
    let data = DataArgs {
        config: Some(shipped_config()),
        ..DataArgs::default()
    };
    let model = ModelArgs {
        beliefs: Some(shipped_beliefs()),
        shares: vec![],
        output: Some(dir.path().join("projection.json")),
        ..ModelArgs::default()
    };
    commands::project(&data, &model).unwrap();

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("projection.json")).unwrap()).unwrap();
    assert_eq!(report["mode"], "projection");
    assert_eq!(report["info"]["year"], 2025);
    assert_eq!(report["info"]["inputs"].as_object().unwrap().len(), 2);

    let model = ModelArgs {
        output: Some(dir.path().join("simulation.json.gz")),
        ..model
    };
    let sim = SimulationArgs {
        draws: Some(20),
        seed: Some(3),
        no_phi: true,
        draws_output: Some(dir.path().join("draws.json")),
        ..SimulationArgs::default()
    };
    commands::simulate(&data, &model, &sim).unwrap();
    assert!(dir.path().join("simulation.json.gz").exists());

    let draws: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("draws.json")).unwrap()).unwrap();
    assert_eq!(draws["deputies"]["rows"].as_array().unwrap().len(), 20);
}

#[test]
fn missing_year_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("seatsim.yaml");
    fs::write(&config, "active_year: 1999\n").unwrap();
    let data = DataArgs {
        config: Some(config),
        ..DataArgs::default()
    };
    assert!(commands::info(&data).is_err());
}
