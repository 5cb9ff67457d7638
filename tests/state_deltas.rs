use std::time::Duration;

use vrdb_terminal::provider::{load_games, load_issues};
use vrdb_terminal::sample_data::{sample_games, sample_issues};
use vrdb_terminal::state::{
    apply_delta, AppState, Delta, EnginePerf, GameRecord, PerfReport, VrStatus, BANNER_TTL,
};

fn games_named(names: &[&str]) -> Vec<GameRecord> {
    names
        .iter()
        .map(|name| GameRecord {
            name: name.to_string(),
            engine: "Test Engine".to_string(),
            vr_status: VrStatus::Testing,
            performance: "TBD".to_string(),
            last_tested: "N/A".to_string(),
        })
        .collect()
}

#[test]
fn games_payload_replaces_working_set_wholesale() {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::SetGames {
            seq: 1,
            games: games_named(&["A", "B"]),
        },
    );
    apply_delta(
        &mut state,
        Delta::SetGames {
            seq: 2,
            games: games_named(&["C"]),
        },
    );
    assert_eq!(state.games.len(), 1);
    assert_eq!(state.games[0].name, "C");
    assert!(state.last_loaded.is_some());
}

#[test]
fn stale_games_payload_is_discarded() {
    let mut state = AppState::new();

    // The slow response from tick 1 resolves after the fast response from
    // tick 2; only the latest-issued payload may win.
    apply_delta(
        &mut state,
        Delta::SetGames {
            seq: 2,
            games: games_named(&["fresh"]),
        },
    );
    apply_delta(
        &mut state,
        Delta::SetGames {
            seq: 1,
            games: games_named(&["stale"]),
        },
    );

    assert_eq!(state.games.len(), 1);
    assert_eq!(state.games[0].name, "fresh");
    assert!(
        state.logs.iter().any(|line| line.contains("stale")),
        "dropping a payload should leave a console trace"
    );
}

#[test]
fn stale_performance_payload_is_discarded() {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::SetPerformance {
            seq: 5,
            report: PerfReport::default(),
        },
    );
    let mut report = PerfReport::default();
    report.engines.push(EnginePerf {
        engine: "Old Engine".to_string(),
        avg_fps: 1.0,
    });
    apply_delta(&mut state, Delta::SetPerformance { seq: 3, report });
    assert!(state.performance.engines.is_empty());
}

#[test]
fn selection_is_clamped_when_the_working_set_shrinks() {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::SetGames {
            seq: 1,
            games: games_named(&["A", "B", "C", "D"]),
        },
    );
    state.selected = 3;
    apply_delta(
        &mut state,
        Delta::SetGames {
            seq: 2,
            games: games_named(&["A", "B"]),
        },
    );
    assert_eq!(state.selected, 1);
}

#[test]
fn missing_reports_dir_falls_back_to_the_sample_set() {
    let (games, warning) = load_games("/definitely/not/a/reports/dir");
    assert_eq!(games, sample_games());
    assert_eq!(games.len(), 5);
    let warning = warning.expect("fallback should carry a warning");
    assert!(warning.contains("sample data"));

    let (issues, warning) = load_issues("/definitely/not/a/reports/dir");
    assert_eq!(issues.len(), sample_issues().len());
    assert!(warning.is_some());
}

#[test]
fn error_delta_raises_banner_and_log() {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::Error {
            context: "game data load".to_string(),
            message: "http 404".to_string(),
        },
    );
    let banner = state.active_banner().expect("banner should be active");
    assert_eq!(banner, "Error in game data load: http 404");
    assert!(state.logs.iter().any(|line| line.contains("http 404")));
}

#[test]
fn banner_expires_after_its_ttl() {
    let mut state = AppState::new();
    state.report_error("API check", "timed out");

    let shown_at = state.banner.as_ref().expect("banner set").shown_at;
    assert!(state.banner_at(shown_at).is_some());
    assert!(
        state
            .banner_at(shown_at + BANNER_TTL - Duration::from_millis(1))
            .is_some()
    );
    assert!(state.banner_at(shown_at + BANNER_TTL).is_none());

    // And clearing on the live clock keeps an unexpired banner around.
    state.clear_expired_banner();
    assert!(state.banner.is_some());
}

#[test]
fn log_ring_is_bounded() {
    let mut state = AppState::new();
    for idx in 0..500 {
        state.push_log(format!("line {idx}"));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.front().map(String::as_str), Some("line 300"));
}
