use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crate::api::ApiClient;
use crate::config::Config;
use crate::reports_fetch;
use crate::sample_data;
use crate::state::{Delta, GameRecord, IssueRecord, ProviderCommand};

const IDLE_SLEEP: Duration = Duration::from_millis(200);

/// Spawn the report provider thread: one immediate load-and-publish cycle,
/// then one per poll interval until the process ends. Each cycle is
/// independent; a failed tick neither retries nor cancels future ticks.
pub fn spawn_report_provider(cfg: Config, tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        let api = cfg.api_base_url.as_deref().map(ApiClient::new);

        let mut seq: u64 = 1;
        refresh_reports(&cfg, seq, &tx, false);
        let mut last_poll = Instant::now();

        loop {
            thread::sleep(IDLE_SLEEP);

            while let Ok(cmd) = cmd_rx.try_recv() {
                match cmd {
                    ProviderCommand::RefreshReports => {
                        seq += 1;
                        refresh_reports(&cfg, seq, &tx, true);
                        last_poll = Instant::now();
                    }
                    ProviderCommand::CheckApi => check_api(api.as_ref(), &tx),
                }
            }

            if last_poll.elapsed() >= cfg.poll_interval {
                seq += 1;
                refresh_reports(&cfg, seq, &tx, false);
                last_poll = Instant::now();
            }
        }
    });
}

/// Games with the sample fallback applied. The warning, when present, is the
/// reason live data was unavailable.
pub fn load_games(base: &str) -> (Vec<GameRecord>, Option<String>) {
    match reports_fetch::fetch_games(base) {
        Ok(games) => (games, None),
        Err(err) => (
            sample_data::sample_games(),
            Some(format!("could not load game data, using sample data: {err:#}")),
        ),
    }
}

pub fn load_issues(base: &str) -> (Vec<IssueRecord>, Option<String>) {
    match reports_fetch::fetch_issues(base) {
        Ok(issues) => (issues, None),
        Err(err) => (
            sample_data::sample_issues(),
            Some(format!("could not load issues, using sample data: {err:#}")),
        ),
    }
}

/// One load cycle over all four report resources. `announce` routes
/// failures to the banner instead of just the console, for user-triggered
/// refreshes.
fn refresh_reports(cfg: &Config, seq: u64, tx: &Sender<Delta>, announce: bool) {
    let base = cfg.reports_base.as_str();

    let (games, warn) = load_games(base);
    publish_warning(tx, "game data load", warn, announce);
    let _ = tx.send(Delta::SetGames { seq, games });

    let (issues, warn) = load_issues(base);
    publish_warning(tx, "issues load", warn, announce);
    let _ = tx.send(Delta::SetIssues { seq, issues });

    // Performance and live tests degrade in place: a failed fetch keeps
    // whatever the chart and panel currently show.
    match reports_fetch::fetch_performance(base) {
        Ok(report) if !report.engines.is_empty() => {
            let _ = tx.send(Delta::SetPerformance { seq, report });
        }
        Ok(_) => {
            let _ = tx.send(Delta::Log(
                "[INFO] Performance report empty, chart unchanged".to_string(),
            ));
        }
        Err(err) => {
            let _ = tx.send(Delta::Log(format!(
                "[WARN] Could not load performance data: {err:#}"
            )));
        }
    }

    match reports_fetch::fetch_live_tests(base) {
        Ok(tests) if !tests.is_empty() => {
            let _ = tx.send(Delta::SetLiveTests { seq, tests });
        }
        _ => {
            let _ = tx.send(Delta::Log(
                "[INFO] Live test status update skipped".to_string(),
            ));
        }
    }

    let _ = tx.send(Delta::Log(format!("[INFO] Report refresh complete (#{seq})")));
}

fn publish_warning(tx: &Sender<Delta>, context: &str, warn: Option<String>, announce: bool) {
    let Some(message) = warn else {
        return;
    };
    if announce {
        let _ = tx.send(Delta::Error {
            context: context.to_string(),
            message,
        });
    } else {
        let _ = tx.send(Delta::Log(format!("[WARN] {message}")));
    }
}

fn check_api(api: Option<&ApiClient>, tx: &Sender<Delta>) {
    let Some(api) = api else {
        let _ = tx.send(Delta::Log(
            "[INFO] API check skipped, no API base configured".to_string(),
        ));
        return;
    };
    match api.get("/status") {
        Ok(_) => {
            let _ = tx.send(Delta::Log(format!("[INFO] API reachable: {}", api.base_url())));
        }
        Err(err) => {
            let _ = tx.send(Delta::Error {
                context: "API check".to_string(),
                message: format!("{err:#}"),
            });
        }
    }
}
