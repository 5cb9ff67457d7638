use chrono::{Duration, Utc};

use crate::state::{EnginePerf, GameRecord, IssueRecord, LiveTest, PerfReport, Severity, VrStatus};

/// Fixed five-record demonstration set substituted whenever `games.json`
/// cannot be loaded.
pub fn sample_games() -> Vec<GameRecord> {
    vec![
        game(
            "Monster Hunter: World",
            "MT Framework",
            VrStatus::Complete,
            "90+ FPS",
            "2024-01-15",
        ),
        game(
            "Resident Evil 7",
            "RE Engine",
            VrStatus::InProgress,
            "75+ FPS",
            "2024-01-14",
        ),
        game(
            "Cyberpunk 2077",
            "REDengine 4",
            VrStatus::Planned,
            "TBD",
            "N/A",
        ),
        game(
            "Fortnite",
            "Unreal Engine",
            VrStatus::Complete,
            "95+ FPS",
            "2024-01-13",
        ),
        game(
            "Among Us",
            "Unity Engine",
            VrStatus::InProgress,
            "80+ FPS",
            "2024-01-12",
        ),
    ]
}

pub fn sample_issues() -> Vec<IssueRecord> {
    let now = Utc::now();
    vec![
        issue(
            Severity::Low,
            "Minor visual artifact in RE Engine games",
            now - Duration::minutes(30),
        ),
        issue(
            Severity::Medium,
            "Performance drop in open-world areas",
            now - Duration::hours(1),
        ),
        issue(
            Severity::High,
            "Crash when switching VR modes",
            now - Duration::hours(2),
        ),
    ]
}

pub fn sample_performance() -> PerfReport {
    PerfReport {
        engines: vec![
            perf("MT Framework", 90.0),
            perf("RE Engine", 75.0),
            perf("REDengine 4", 70.0),
            perf("Unreal Engine", 95.0),
            perf("Unity Engine", 80.0),
        ],
    }
}

pub fn sample_live_tests() -> Vec<LiveTest> {
    vec![
        LiveTest {
            name: "RE Engine adapter".to_string(),
            status: "running".to_string(),
            detail: "stereo pass".to_string(),
        },
        LiveTest {
            name: "Unreal Engine adapter".to_string(),
            status: "passing".to_string(),
            detail: String::new(),
        },
        LiveTest {
            name: "Unity Engine adapter".to_string(),
            status: "queued".to_string(),
            detail: String::new(),
        },
    ]
}

fn game(
    name: &str,
    engine: &str,
    vr_status: VrStatus,
    performance: &str,
    last_tested: &str,
) -> GameRecord {
    GameRecord {
        name: name.to_string(),
        engine: engine.to_string(),
        vr_status,
        performance: performance.to_string(),
        last_tested: last_tested.to_string(),
    }
}

fn issue(severity: Severity, title: &str, at: chrono::DateTime<Utc>) -> IssueRecord {
    IssueRecord {
        severity,
        title: title.to_string(),
        timestamp: at.to_rfc3339(),
    }
}

fn perf(engine: &str, avg_fps: f64) -> EnginePerf {
    EnginePerf {
        engine: engine.to_string(),
        avg_fps,
    }
}
