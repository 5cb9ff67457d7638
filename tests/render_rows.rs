use chrono::{TimeZone, Utc};

use vrdb_terminal::render::{
    compare_cells, format_relative_time, game_rows, issue_lines, leading_number, slugify,
    sort_rows, GameRow, NO_RESULTS_TEXT,
};
use vrdb_terminal::sample_data::{sample_games, sample_issues};
use vrdb_terminal::state::{GameRecord, IssueRecord, Severity, VrStatus};

fn rows_from(games: &[GameRecord]) -> Vec<GameRow> {
    let refs: Vec<&GameRecord> = games.iter().collect();
    game_rows(&refs)
}

#[test]
fn empty_collection_renders_exactly_one_placeholder_row() {
    let rows = game_rows(&[]);
    assert_eq!(rows.len(), 1);
    assert!(rows[0].placeholder);
    assert_eq!(rows[0].cells[0], NO_RESULTS_TEXT);
}

#[test]
fn rows_carry_cell_text_and_engine_links() {
    let games = sample_games();
    let rows = rows_from(&games);
    assert_eq!(rows.len(), games.len());

    let first = &rows[0];
    assert!(!first.placeholder);
    assert_eq!(first.cells[0], "Monster Hunter: World");
    assert_eq!(first.cells[1], "MT Framework");
    assert_eq!(first.cells[2], "✅ Complete");
    assert_eq!(first.cells[3], "90+ FPS");
    assert_eq!(first.cells[4], "2024-01-15");
    assert_eq!(first.engine_page, "engines/mt-framework.html");
    assert_eq!(first.adapter_download, "downloads/mt-framework-adapter.zip");
}

#[test]
fn rendering_is_idempotent() {
    let games = sample_games();
    assert_eq!(rows_from(&games), rows_from(&games));
}

#[test]
fn unknown_status_renders_the_default_icon() {
    let games = vec![GameRecord {
        name: "Mystery".to_string(),
        engine: "Custom".to_string(),
        vr_status: VrStatus::Unknown,
        performance: "TBD".to_string(),
        last_tested: "N/A".to_string(),
    }];
    let rows = rows_from(&games);
    assert_eq!(rows[0].cells[2], "❓ Unknown");
}

#[test]
fn slugify_collapses_whitespace_and_strips_unsafe_chars() {
    assert_eq!(slugify("MT Framework"), "mt-framework");
    assert_eq!(slugify("REDengine 4"), "redengine-4");
    assert_eq!(slugify("Unreal   Engine"), "unreal-engine");
    assert_eq!(slugify("  Source 2  "), "source-2");
    assert_eq!(slugify("Engine: Next!"), "engine-next");
    assert_eq!(slugify("in-house_v2.5"), "in-house_v2.5");
}

#[test]
fn sort_is_a_permutation_of_the_input_rows() {
    let games = sample_games();
    for column in 0..5 {
        let mut rows = rows_from(&games);
        sort_rows(&mut rows, column);

        let mut expected: Vec<String> = rows_from(&games)
            .iter()
            .map(|r| r.cells[0].clone())
            .collect();
        let mut actual: Vec<String> = rows.iter().map(|r| r.cells[0].clone()).collect();
        expected.sort();
        actual.sort();
        assert_eq!(actual, expected, "column {column} dropped or duplicated rows");
    }
}

#[test]
fn numeric_cells_sort_numerically_not_lexicographically() {
    let games = vec![
        game_with_performance("A", "10"),
        game_with_performance("B", "2"),
        game_with_performance("C", "33"),
    ];
    let mut rows = rows_from(&games);
    sort_rows(&mut rows, 3);
    let order: Vec<&str> = rows.iter().map(|r| r.cells[3].as_str()).collect();
    assert_eq!(order, ["2", "10", "33"]);
}

#[test]
fn fps_strings_sort_by_their_leading_number() {
    let games = vec![
        game_with_performance("A", "95+ FPS"),
        game_with_performance("B", "75+ FPS"),
        game_with_performance("C", "90+ FPS"),
    ];
    let mut rows = rows_from(&games);
    sort_rows(&mut rows, 3);
    let order: Vec<&str> = rows.iter().map(|r| r.cells[0].as_str()).collect();
    assert_eq!(order, ["B", "C", "A"]);
}

#[test]
fn mixed_cells_fall_back_to_string_comparison() {
    // "TBD" has no numeric prefix, so the column compares as text.
    assert_eq!(compare_cells("TBD", "90+ FPS"), std::cmp::Ordering::Greater);
    assert_eq!(compare_cells("N/A", "TBD"), std::cmp::Ordering::Less);
}

#[test]
fn out_of_range_column_leaves_order_unchanged() {
    let games = sample_games();
    let mut rows = rows_from(&games);
    let before = rows.clone();
    sort_rows(&mut rows, 99);
    assert_eq!(rows, before);
}

#[test]
fn leading_number_matches_loose_numeric_prefixes() {
    assert_eq!(leading_number("90+ FPS"), Some(90.0));
    assert_eq!(leading_number("  2024-01-15"), Some(2024.0));
    assert_eq!(leading_number("-5"), Some(-5.0));
    assert_eq!(leading_number("1.5x"), Some(1.5));
    assert_eq!(leading_number("TBD"), None);
    assert_eq!(leading_number(""), None);
}

#[test]
fn issue_panel_shows_at_most_five_entries() {
    let issues: Vec<IssueRecord> = (0..8)
        .map(|idx| IssueRecord {
            severity: Severity::Low,
            title: format!("Issue {idx}"),
            timestamp: "2024-03-01T12:00:00Z".to_string(),
        })
        .collect();
    let lines = issue_lines(&issues, Utc::now());
    assert_eq!(lines.len(), 5);
    assert!(lines[0].contains("Issue 0"));
    assert!(lines[4].contains("Issue 4"));
}

#[test]
fn empty_issue_list_renders_placeholder_line() {
    let lines = issue_lines(&[], Utc::now());
    assert_eq!(lines, ["No recent issues reported."]);
}

#[test]
fn issue_lines_carry_severity_and_relative_age() {
    let issues = sample_issues();
    let lines = issue_lines(&issues, Utc::now());
    assert!(lines[0].starts_with("[LOW]"));
    assert!(lines[0].contains("30m ago"));
    assert!(lines[2].starts_with("[HIGH]"));
    assert!(lines[2].contains("2h ago"));
}

#[test]
fn relative_time_buckets() {
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    assert_eq!(format_relative_time("2024-03-01T11:59:30Z", now), "Just now");
    assert_eq!(format_relative_time("2024-03-01T11:15:00Z", now), "45m ago");
    assert_eq!(format_relative_time("2024-03-01T06:00:00Z", now), "6h ago");
    assert_eq!(format_relative_time("2024-02-20T06:00:00Z", now), "2024-02-20");
}

#[test]
fn unparseable_timestamp_falls_back_to_trimmed_raw_text() {
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    assert_eq!(format_relative_time("not a date", now), "not a date");
    assert_eq!(format_relative_time("", now), "unknown");
}

fn game_with_performance(name: &str, performance: &str) -> GameRecord {
    GameRecord {
        name: name.to_string(),
        engine: "Test Engine".to_string(),
        vr_status: VrStatus::Testing,
        performance: performance.to_string(),
        last_tested: "N/A".to_string(),
    }
}
