use std::cmp::Ordering;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::state::{AppState, GameRecord, IssueRecord, LiveTest, VrStatus};

pub const GAME_HEADERS: [&str; 5] = ["Game", "Engine", "VR Status", "Performance", "Last Tested"];

pub const NO_RESULTS_TEXT: &str = "No games found matching your search.";
const MAX_ISSUE_ROWS: usize = 5;

/// One displayable table row: cell text in column order plus the derived
/// engine links shown on the detail screen.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRow {
    pub cells: [String; 5],
    pub status: VrStatus,
    pub engine_page: String,
    pub adapter_download: String,
    pub placeholder: bool,
}

impl GameRow {
    fn placeholder() -> Self {
        Self {
            cells: [
                NO_RESULTS_TEXT.to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
            ],
            status: VrStatus::Unknown,
            engine_page: String::new(),
            adapter_download: String::new(),
            placeholder: true,
        }
    }
}

/// Convert a record collection into table rows. Idempotent; an empty
/// collection yields exactly one placeholder row, never an empty body.
pub fn game_rows(games: &[&GameRecord]) -> Vec<GameRow> {
    if games.is_empty() {
        return vec![GameRow::placeholder()];
    }
    games
        .iter()
        .map(|game| {
            let slug = slugify(&game.engine);
            GameRow {
                cells: [
                    game.name.clone(),
                    game.engine.clone(),
                    format!("{} {}", game.vr_status.icon(), game.vr_status.label()),
                    game.performance.clone(),
                    game.last_tested.clone(),
                ],
                status: game.vr_status,
                engine_page: format!("engines/{slug}.html"),
                adapter_download: format!("downloads/{slug}-adapter.zip"),
                placeholder: false,
            }
        })
        .collect()
}

/// The rows the table actually shows: active view, then the current column
/// sort if one is selected.
pub fn display_rows(state: &AppState) -> Vec<GameRow> {
    let mut rows = game_rows(&state.visible_games());
    if let Some(column) = state.sort_column {
        sort_rows(&mut rows, column.index());
    }
    rows
}

/// Reorder rows in place, ascending by the given column. Cells that both
/// parse as leading numbers compare numerically, everything else falls back
/// to lexicographic comparison. Out-of-range columns leave the order as is.
pub fn sort_rows(rows: &mut [GameRow], column: usize) {
    if column >= GAME_HEADERS.len() {
        return;
    }
    rows.sort_by(|a, b| compare_cells(&a.cells[column], &b.cells[column]));
}

pub fn compare_cells(a: &str, b: &str) -> Ordering {
    let a = a.trim();
    let b = b.trim();
    if let (Some(x), Some(y)) = (leading_number(a), leading_number(b)) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    a.cmp(b)
}

/// Longest numeric prefix of the cell text, so "90+ FPS" orders as 90 and
/// "2024-01-15" as 2024. Returns None when the text has no numeric prefix.
pub fn leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (idx, ch) in text.char_indices() {
        match ch {
            '+' | '-' if idx == 0 => end = idx + 1,
            '0'..='9' => {
                seen_digit = true;
                end = idx + 1;
            }
            '.' if !seen_dot => {
                seen_dot = true;
                end = idx + 1;
            }
            _ => break,
        }
    }
    if !seen_digit {
        return None;
    }
    text[..end].trim_end_matches('.').parse::<f64>().ok()
}

/// URL-safe identifier derived from an engine name: lower-case, whitespace
/// runs collapsed to single hyphens, everything else non-alphanumeric
/// (except `-` `_` `.`) dropped.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.trim().chars() {
        if ch.is_whitespace() {
            if !slug.ends_with('-') {
                slug.push('-');
            }
        } else if ch.is_alphanumeric() || matches!(ch, '-' | '_' | '.') {
            for lower in ch.to_lowercase() {
                slug.push(lower);
            }
        }
    }
    slug.trim_matches('-').to_string()
}

/// Issue panel lines: at most the first five entries, most recent first as
/// supplied by the feed.
pub fn issue_lines(issues: &[IssueRecord], now: DateTime<Utc>) -> Vec<String> {
    if issues.is_empty() {
        return vec!["No recent issues reported.".to_string()];
    }
    issues
        .iter()
        .take(MAX_ISSUE_ROWS)
        .map(|issue| {
            format!(
                "[{}] {} ({})",
                issue.severity.label(),
                issue.title,
                format_relative_time(&issue.timestamp, now)
            )
        })
        .collect()
}

pub fn live_test_lines(tests: &[LiveTest]) -> Vec<String> {
    if tests.is_empty() {
        return vec!["No live tests running.".to_string()];
    }
    tests
        .iter()
        .map(|test| {
            if test.detail.is_empty() {
                format!("{} — {}", test.name, test.status)
            } else {
                format!("{} — {} ({})", test.name, test.status, test.detail)
            }
        })
        .collect()
}

/// Human-readable age of an ISO-8601 timestamp. Unparseable input falls back
/// to the raw string, trimmed down like the other timestamp columns.
pub fn format_relative_time(raw: &str, now: DateTime<Utc>) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return "unknown".to_string();
    }
    let Some(parsed) = parse_instant(raw) else {
        if raw.len() >= 16 {
            return raw[..16].replace('T', " ");
        }
        return raw.replace('T', " ");
    };

    let secs = now.signed_duration_since(parsed).num_seconds();
    if secs < 60 {
        return "Just now".to_string();
    }
    if secs < 3600 {
        return format!("{}m ago", secs / 60);
    }
    if secs < 86_400 {
        return format!("{}h ago", secs / 3600);
    }
    parsed.format("%Y-%m-%d").to_string()
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.and_utc());
        }
    }
    None
}
