use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::http_client::http_client;
use crate::state::{EnginePerf, GameRecord, IssueRecord, LiveTest, PerfReport};

pub const GAMES_RESOURCE: &str = "games.json";
pub const PERFORMANCE_RESOURCE: &str = "performance.json";
pub const ISSUES_RESOURCE: &str = "issues.json";
pub const LIVE_TESTS_RESOURCE: &str = "live-tests.json";

pub fn fetch_games(base: &str) -> Result<Vec<GameRecord>> {
    let body = fetch_resource(base, GAMES_RESOURCE)?;
    parse_games_json(&body)
}

pub fn fetch_issues(base: &str) -> Result<Vec<IssueRecord>> {
    let body = fetch_resource(base, ISSUES_RESOURCE)?;
    parse_issues_json(&body)
}

pub fn fetch_performance(base: &str) -> Result<PerfReport> {
    let body = fetch_resource(base, PERFORMANCE_RESOURCE)?;
    parse_performance_json(&body)
}

pub fn fetch_live_tests(base: &str) -> Result<Vec<LiveTest>> {
    let body = fetch_resource(base, LIVE_TESTS_RESOURCE)?;
    parse_live_tests_json(&body)
}

/// Read one report resource. An `http(s)://` base goes through the shared
/// client with non-2xx mapped to an error; anything else is a local path.
fn fetch_resource(base: &str, name: &str) -> Result<String> {
    let base = base.trim_end_matches('/');
    if base.starts_with("http://") || base.starts_with("https://") {
        let url = format!("{base}/{name}");
        let resp = http_client()?
            .get(&url)
            .send()
            .with_context(|| format!("request failed: {url}"))?;
        let status = resp.status();
        let body = resp.text().context("failed reading body")?;
        if !status.is_success() {
            return Err(anyhow::anyhow!("http {status} fetching {url}"));
        }
        Ok(body)
    } else {
        let path = Path::new(base).join(name);
        fs::read_to_string(&path).with_context(|| format!("read failed: {}", path.display()))
    }
}

pub fn parse_games_json(raw: &str) -> Result<Vec<GameRecord>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed).context("invalid games json")
}

pub fn parse_issues_json(raw: &str) -> Result<Vec<IssueRecord>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed).context("invalid issues json")
}

/// The performance report is an opaque aggregate with no fixed schema, so
/// this walks the JSON leniently. Accepted shapes, in order:
/// an `engines` array of objects, a chart-style `labels`/`datasets` pair,
/// or a flat object of engine name to FPS.
pub fn parse_performance_json(raw: &str) -> Result<PerfReport> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(PerfReport::default());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid performance json")?;

    let mut engines = parse_engine_entries(root.get("engines"));
    if engines.is_empty() {
        engines = parse_chart_shape(&root);
    }
    if engines.is_empty()
        && let Some(map) = root.as_object()
    {
        for (name, value) in map {
            if let Some(fps) = value.as_f64() {
                engines.push(EnginePerf {
                    engine: name.clone(),
                    avg_fps: fps,
                });
            }
        }
    }

    Ok(PerfReport { engines })
}

fn parse_engine_entries(value: Option<&Value>) -> Vec<EnginePerf> {
    let mut out = Vec::new();
    let Some(list) = value.and_then(|v| v.as_array()) else {
        return out;
    };
    for entry in list {
        let name = pick_string(entry, &["engine", "name", "label"]).unwrap_or_default();
        if name.is_empty() {
            continue;
        }
        let Some(fps) = pick_f64(entry, &["avgFps", "averageFps", "fps", "value"]) else {
            continue;
        };
        out.push(EnginePerf {
            engine: name,
            avg_fps: fps,
        });
    }
    out
}

fn parse_chart_shape(root: &Value) -> Vec<EnginePerf> {
    let Some(labels) = root.get("labels").and_then(|v| v.as_array()) else {
        return Vec::new();
    };
    let Some(data) = root
        .get("datasets")
        .and_then(|v| v.as_array())
        .and_then(|sets| sets.first())
        .and_then(|set| set.get("data"))
        .and_then(|v| v.as_array())
    else {
        return Vec::new();
    };

    labels
        .iter()
        .zip(data)
        .filter_map(|(label, value)| {
            let engine = label.as_str()?.trim().to_string();
            let avg_fps = value.as_f64()?;
            if engine.is_empty() {
                return None;
            }
            Some(EnginePerf { engine, avg_fps })
        })
        .collect()
}

/// Live-test status is another opaque aggregate: an array of test objects,
/// or a `tests` wrapper around one.
pub fn parse_live_tests_json(raw: &str) -> Result<Vec<LiveTest>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid live-tests json")?;
    let list = root
        .as_array()
        .or_else(|| root.get("tests").and_then(|v| v.as_array()));
    let Some(list) = list else {
        return Ok(Vec::new());
    };

    let mut out = Vec::new();
    for entry in list {
        let name = pick_string(entry, &["name", "test", "title"]).unwrap_or_default();
        if name.is_empty() {
            continue;
        }
        let status = pick_string(entry, &["status", "state", "result"])
            .unwrap_or_else(|| "unknown".to_string());
        let detail = pick_string(entry, &["detail", "message", "note"]).unwrap_or_default();
        out.push(LiveTest {
            name,
            status,
            detail,
        });
    }
    Ok(out)
}

fn pick_string(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(Value::String(s)) = value.get(*key) {
            let trimmed = s.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

fn pick_f64(value: &Value, keys: &[&str]) -> Option<f64> {
    for key in keys {
        if let Some(v) = value.get(*key) {
            if let Some(num) = v.as_f64() {
                return Some(num);
            }
            if let Some(s) = v.as_str()
                && let Ok(num) = s.trim().parse::<f64>()
            {
                return Some(num);
            }
        }
    }
    None
}
