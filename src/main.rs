use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use chrono::Utc;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph};

use vrdb_terminal::config::Config;
use vrdb_terminal::provider::spawn_report_provider;
use vrdb_terminal::render::{self, GameRow, GAME_HEADERS};
use vrdb_terminal::sample_data;
use vrdb_terminal::state::{apply_delta, AppState, Delta, ProviderCommand, Screen};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
}

impl App {
    fn new(cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        let mut state = AppState::new();
        // The chart and live-test panel start on sample data, exactly what
        // they keep showing if the report files never become reachable.
        state.performance = sample_data::sample_performance();
        state.live_tests = sample_data::sample_live_tests();
        Self {
            state,
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.search_active {
            self.on_search_key(key);
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.screen = Screen::Database,
            KeyCode::Char('/') | KeyCode::Char('f') => {
                self.state.screen = Screen::Database;
                self.state.search_active = true;
            }
            KeyCode::Char('d') | KeyCode::Enter => {
                if selected_row(&self.state).is_some_and(|row| !row.placeholder) {
                    self.state.screen = Screen::Detail;
                }
            }
            KeyCode::Char('b') => self.state.screen = Screen::Database,
            KeyCode::Esc => match self.state.screen {
                Screen::Detail => self.state.screen = Screen::Database,
                Screen::Database => self.state.clear_search(),
            },
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('s') => self.state.cycle_sort_column(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.request_refresh(),
            KeyCode::Char('p') => self.request_api_check(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.state.search_active = false,
            KeyCode::Backspace => self.state.pop_search_char(),
            KeyCode::Char(ch) => self.state.push_search_char(ch),
            _ => {}
        }
    }

    fn request_refresh(&mut self) {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Refresh unavailable");
            return;
        };
        if tx.send(ProviderCommand::RefreshReports).is_err() {
            self.state.push_log("[WARN] Refresh request failed");
        } else {
            self.state.push_log("[INFO] Refresh requested");
        }
    }

    fn request_api_check(&mut self) {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] API check unavailable");
            return;
        };
        if tx.send(ProviderCommand::CheckApi).is_err() {
            self.state.push_log("[WARN] API check request failed");
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_report_provider(Config::from_env(), tx, cmd_rx);

    let mut app = App::new(Some(cmd_tx));
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }
        app.state.clear_expired_banner();

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(&app.state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_banner(frame, chunks[1], &app.state);

    match app.state.screen {
        Screen::Database => render_database(frame, chunks[2], &app.state),
        Screen::Detail => render_detail(frame, chunks[2], &app.state),
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[3]);

    let footer =
        Paragraph::new(footer_text(&app.state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[4]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let shown = state.visible_games().len();
    let total = state.games.len();
    let sort = state
        .sort_column
        .map(|col| col.label())
        .unwrap_or("None");
    let filter = if state.search_query.trim().is_empty() {
        "-".to_string()
    } else {
        format!("\"{}\"", state.search_query)
    };
    let title = match state.screen {
        Screen::Database => format!(
            "VRDB TERMINAL | {shown}/{total} games | Sort: {sort} | Filter: {filter}"
        ),
        Screen::Detail => "VRDB TERMINAL | GAME DETAIL".to_string(),
    };
    let line1 = format!(" .___.  {title}");
    let line2 = " |o_o|".to_string();
    let line3 = " '---'".to_string();
    format!("{line1}\n{line2}\n{line3}")
}

fn footer_text(state: &AppState) -> String {
    if state.search_active {
        return format!(
            "Search: {}_  | Enter/Esc Done | Backspace Delete",
            state.search_query
        );
    }
    match state.screen {
        Screen::Database => {
            "/ Search | j/k/↑/↓ Move | Enter/d Detail | s Sort | r Refresh | p API | ? Help | q Quit"
                .to_string()
        }
        Screen::Detail => "b/Esc Back | r Refresh | ? Help | q Quit".to_string(),
    }
}

fn render_banner(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(message) = state.active_banner() else {
        return;
    };
    let banner = Paragraph::new(message)
        .style(Style::default().fg(Color::White).bg(Color::Red));
    frame.render_widget(banner, area);
}

fn render_database(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(46), Constraint::Length(42)])
        .split(area);

    render_game_table(frame, columns[0], state);
    render_side_panels(frame, columns[1], state);
}

fn game_columns() -> [Constraint; 5] {
    [
        Constraint::Min(22),
        Constraint::Length(14),
        Constraint::Length(15),
        Constraint::Length(12),
        Constraint::Length(12),
    ]
}

fn render_game_table(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let widths = game_columns();
    render_table_header(frame, sections[0], &widths);

    let list_area = sections[1];
    if list_area.height == 0 {
        return;
    }

    let rows = render::display_rows(state);
    let visible = list_area.height as usize;
    let (start, end) = visible_range(state.selected, rows.len(), visible);

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };

        let row = &rows[idx];
        if row.placeholder {
            let empty = Paragraph::new(row.cells[0].as_str())
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(empty, row_area);
            continue;
        }

        let selected = idx == state.selected;
        let row_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);
        for (cell, col_area) in row.cells.iter().zip(cols.iter()) {
            let text = Paragraph::new(cell.as_str()).style(row_style);
            frame.render_widget(text, *col_area);
        }
    }
}

fn render_table_header(frame: &mut Frame, area: Rect, widths: &[Constraint]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(area);
    let style = Style::default().add_modifier(Modifier::BOLD);
    for (title, col_area) in GAME_HEADERS.iter().zip(cols.iter()) {
        let text = Paragraph::new(*title).style(style);
        frame.render_widget(text, *col_area);
    }
}

fn render_side_panels(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(10),
            Constraint::Min(5),
            Constraint::Length(5),
        ])
        .split(area);

    render_perf_chart(frame, sections[0], state);

    let issues = Paragraph::new(render::issue_lines(&state.issues, Utc::now()).join("\n"))
        .block(Block::default().title("Recent Issues").borders(Borders::ALL));
    frame.render_widget(issues, sections[1]);

    let tests = Paragraph::new(render::live_test_lines(&state.live_tests).join("\n"))
        .block(Block::default().title("Live Tests").borders(Borders::ALL));
    frame.render_widget(tests, sections[2]);
}

const CHART_COLORS: [Color; 5] = [
    Color::Green,
    Color::Yellow,
    Color::Red,
    Color::Cyan,
    Color::Magenta,
];

fn render_perf_chart(frame: &mut Frame, area: Rect, state: &AppState) {
    let bars: Vec<Bar> = state
        .performance
        .engines
        .iter()
        .enumerate()
        .map(|(idx, perf)| {
            Bar::default()
                .value(perf.avg_fps.round() as u64)
                .label(Line::from(abbreviate_engine(&perf.engine)))
                .style(Style::default().fg(CHART_COLORS[idx % CHART_COLORS.len()]))
        })
        .collect();

    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(5)
        .bar_gap(2)
        .max(100)
        .block(
            Block::default()
                .title("Engine FPS (avg)")
                .borders(Borders::ALL),
        );
    frame.render_widget(chart, area);
}

fn render_detail(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(row) = selected_row(state).filter(|row| !row.placeholder) else {
        let empty = Paragraph::new("No game selected")
            .block(Block::default().title("Game Detail").borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    };

    let lines = [
        format!("Game:        {}", row.cells[0]),
        format!("Engine:      {}", row.cells[1]),
        format!("VR Status:   {}", row.cells[2]),
        format!("Performance: {}", row.cells[3]),
        format!("Last tested: {}", row.cells[4]),
        String::new(),
        format!("Engine page: {}", row.engine_page),
        format!("Adapter:     {}", row.adapter_download),
    ];
    let detail = Paragraph::new(lines.join("\n"))
        .block(Block::default().title("Game Detail").borders(Borders::ALL));
    frame.render_widget(detail, area);
}

fn selected_row(state: &AppState) -> Option<GameRow> {
    let rows = render::display_rows(state);
    rows.into_iter().nth(state.selected)
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No activity yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn abbreviate_engine(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.len() <= 5 {
        return trimmed.to_uppercase();
    }
    let mut abbr = String::new();
    for part in trimmed.split_whitespace() {
        if let Some(ch) = part.chars().next() {
            abbr.push(ch);
        }
        if abbr.len() >= 3 {
            break;
        }
    }
    if abbr.len() >= 2 {
        return abbr.to_uppercase();
    }
    trimmed.chars().take(5).collect::<String>().to_uppercase()
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 || visible == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "VRDB Terminal - Help",
        "",
        "Global:",
        "  1            Database",
        "  Enter / d    Game detail",
        "  b / Esc      Back / clear search",
        "  /            Search games",
        "  s            Cycle sort column",
        "  r            Refresh reports now",
        "  p            Check API status",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Database:",
        "  j/k or ↑/↓   Move selection",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
