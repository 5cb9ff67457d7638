use std::collections::VecDeque;
use std::time::{Duration, Instant, SystemTime};

use serde::Deserialize;

/// How long the transient error banner stays visible.
pub const BANNER_TTL: Duration = Duration::from_secs(5);

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Database,
    Detail,
}

/// VR compatibility status of a game. Anything the reports feed that we do
/// not recognize collapses to `Unknown` rather than failing the whole load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum VrStatus {
    Complete,
    InProgress,
    Planned,
    Testing,
    #[default]
    Unknown,
}

impl VrStatus {
    pub fn label(self) -> &'static str {
        match self {
            VrStatus::Complete => "Complete",
            VrStatus::InProgress => "In Progress",
            VrStatus::Planned => "Planned",
            VrStatus::Testing => "Testing",
            VrStatus::Unknown => "Unknown",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            VrStatus::Complete => "✅",
            VrStatus::InProgress => "🔄",
            VrStatus::Planned => "📋",
            VrStatus::Testing => "🧪",
            VrStatus::Unknown => "❓",
        }
    }
}

impl From<String> for VrStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "complete" => VrStatus::Complete,
            "in progress" | "in-progress" => VrStatus::InProgress,
            "planned" => VrStatus::Planned,
            "testing" => VrStatus::Testing,
            _ => VrStatus::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MED",
            Severity::High => "HIGH",
        }
    }
}

impl From<String> for Severity {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "medium" => Severity::Medium,
            "high" => Severity::High,
            _ => Severity::Low,
        }
    }
}

/// One game row from `games.json`. The working set is replaced wholesale on
/// every load; records are never patched in place. Duplicate names are legal.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub engine: String,
    #[serde(default)]
    pub vr_status: VrStatus,
    #[serde(default = "default_performance")]
    pub performance: String,
    #[serde(default = "default_last_tested")]
    pub last_tested: String,
}

fn default_performance() -> String {
    "TBD".to_string()
}

fn default_last_tested() -> String {
    "N/A".to_string()
}

/// One entry from `issues.json`. The feed supplies these most-recent-first;
/// the timestamp stays a raw ISO-8601 string and is parsed at display time.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IssueRecord {
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnginePerf {
    pub engine: String,
    pub avg_fps: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerfReport {
    pub engines: Vec<EnginePerf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiveTest {
    pub name: String,
    pub status: String,
    pub detail: String,
}

#[derive(Debug, Clone)]
pub struct Banner {
    pub message: String,
    pub shown_at: Instant,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub games: Vec<GameRecord>,
    pub performance: PerfReport,
    pub issues: Vec<IssueRecord>,
    pub live_tests: Vec<LiveTest>,
    pub search_query: String,
    pub search_active: bool,
    pub sort_column: Option<SortColumn>,
    pub selected: usize,
    pub logs: VecDeque<String>,
    pub banner: Option<Banner>,
    pub help_overlay: bool,
    pub last_loaded: Option<SystemTime>,
    games_seq: u64,
    performance_seq: u64,
    issues_seq: u64,
    live_tests_seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Name,
    Engine,
    Status,
    Performance,
    LastTested,
}

impl SortColumn {
    pub fn index(self) -> usize {
        match self {
            SortColumn::Name => 0,
            SortColumn::Engine => 1,
            SortColumn::Status => 2,
            SortColumn::Performance => 3,
            SortColumn::LastTested => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortColumn::Name => "Name",
            SortColumn::Engine => "Engine",
            SortColumn::Status => "Status",
            SortColumn::Performance => "Perf",
            SortColumn::LastTested => "Tested",
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Database,
            games: Vec::new(),
            performance: PerfReport::default(),
            issues: Vec::new(),
            live_tests: Vec::new(),
            search_query: String::new(),
            search_active: false,
            sort_column: None,
            selected: 0,
            logs: VecDeque::new(),
            banner: None,
            help_overlay: false,
            last_loaded: None,
            games_seq: 0,
            performance_seq: 0,
            issues_seq: 0,
            live_tests_seq: 0,
        }
    }

    /// The active view: the full set, or the latest filter result. Stable
    /// relative order, pure inclusion, no scoring.
    pub fn visible_games(&self) -> Vec<&GameRecord> {
        filter_games(&self.games, &self.search_query)
    }

    pub fn cycle_sort_column(&mut self) {
        self.sort_column = match self.sort_column {
            None => Some(SortColumn::Name),
            Some(SortColumn::Name) => Some(SortColumn::Engine),
            Some(SortColumn::Engine) => Some(SortColumn::Status),
            Some(SortColumn::Status) => Some(SortColumn::Performance),
            Some(SortColumn::Performance) => Some(SortColumn::LastTested),
            Some(SortColumn::LastTested) => None,
        };
    }

    pub fn select_next(&mut self) {
        let total = self.visible_games().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % total;
    }

    pub fn select_prev(&mut self) {
        let total = self.visible_games().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        if self.selected == 0 {
            self.selected = total - 1;
        } else {
            self.selected -= 1;
        }
    }

    pub fn clamp_selection(&mut self) {
        let total = self.visible_games().len();
        if total == 0 {
            self.selected = 0;
        } else if self.selected >= total {
            self.selected = total - 1;
        }
    }

    pub fn push_search_char(&mut self, ch: char) {
        self.search_query.push(ch);
        self.clamp_selection();
    }

    pub fn pop_search_char(&mut self) {
        self.search_query.pop();
        self.clamp_selection();
    }

    pub fn clear_search(&mut self) {
        self.search_query.clear();
        self.search_active = false;
        self.clamp_selection();
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    /// Surface an error to the user: transient banner plus a console entry.
    /// Never interrupts anything in flight.
    pub fn report_error(&mut self, context: &str, message: &str) {
        self.banner = Some(Banner {
            message: format!("Error in {context}: {message}"),
            shown_at: Instant::now(),
        });
        self.push_log(format!("[WARN] {context}: {message}"));
    }

    pub fn active_banner(&self) -> Option<&str> {
        self.banner_at(Instant::now())
    }

    pub fn banner_at(&self, now: Instant) -> Option<&str> {
        self.banner
            .as_ref()
            .filter(|b| now.duration_since(b.shown_at) < BANNER_TTL)
            .map(|b| b.message.as_str())
    }

    pub fn clear_expired_banner(&mut self) {
        let expired = self
            .banner
            .as_ref()
            .is_some_and(|b| b.shown_at.elapsed() >= BANNER_TTL);
        if expired {
            self.banner = None;
        }
    }
}

/// Case-insensitive substring filter over name, engine and status label.
/// A blank query returns the collection unchanged.
pub fn filter_games<'a>(games: &'a [GameRecord], query: &str) -> Vec<&'a GameRecord> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return games.iter().collect();
    }
    games
        .iter()
        .filter(|game| {
            game.name.to_lowercase().contains(&query)
                || game.engine.to_lowercase().contains(&query)
                || game.vr_status.label().to_lowercase().contains(&query)
        })
        .collect()
}

/// State mutations sent from the provider thread. Every report payload
/// carries the sequence token issued when its load began; stale tokens are
/// discarded in `apply_delta` so an out-of-order completion can never
/// overwrite a newer one.
#[derive(Debug, Clone)]
pub enum Delta {
    SetGames { seq: u64, games: Vec<GameRecord> },
    SetPerformance { seq: u64, report: PerfReport },
    SetIssues { seq: u64, issues: Vec<IssueRecord> },
    SetLiveTests { seq: u64, tests: Vec<LiveTest> },
    Error { context: String, message: String },
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    RefreshReports,
    CheckApi,
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetGames { seq, games } => {
            if seq < state.games_seq {
                state.push_log(format!(
                    "[INFO] Dropped stale games payload (seq {seq} < {})",
                    state.games_seq
                ));
                return;
            }
            state.games_seq = seq;
            state.games = games;
            state.last_loaded = Some(SystemTime::now());
            state.clamp_selection();
        }
        Delta::SetPerformance { seq, report } => {
            if seq < state.performance_seq {
                state.push_log(format!(
                    "[INFO] Dropped stale performance payload (seq {seq} < {})",
                    state.performance_seq
                ));
                return;
            }
            state.performance_seq = seq;
            state.performance = report;
        }
        Delta::SetIssues { seq, issues } => {
            if seq < state.issues_seq {
                state.push_log(format!(
                    "[INFO] Dropped stale issues payload (seq {seq} < {})",
                    state.issues_seq
                ));
                return;
            }
            state.issues_seq = seq;
            state.issues = issues;
        }
        Delta::SetLiveTests { seq, tests } => {
            if seq < state.live_tests_seq {
                state.push_log(format!(
                    "[INFO] Dropped stale live-tests payload (seq {seq} < {})",
                    state.live_tests_seq
                ));
                return;
            }
            state.live_tests_seq = seq;
            state.live_tests = tests;
        }
        Delta::Error { context, message } => state.report_error(&context, &message),
        Delta::Log(msg) => state.push_log(msg),
    }
}
