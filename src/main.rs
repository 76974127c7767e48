use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap};

use tipfeed_terminal::feed_fetch::api_base_from_env;
use tipfeed_terminal::mock_feed::spawn_mock_provider;
use tipfeed_terminal::pagination::{LoadGates, ScrollPager, SentinelSample};
use tipfeed_terminal::provider::spawn_provider;
use tipfeed_terminal::pull_refresh::{PullConfig, PullGesture, Release};
use tipfeed_terminal::state::{
    apply_delta, detail_tab_label, filter_label, tab_label, AppState, Delta, DetailTab,
    ProviderCommand, Screen,
};

/// One terminal row of mouse travel counts as this many gesture points.
const ROW_POINTS: f32 = 24.0;
const FEED_ROW_HEIGHT: u16 = 4;
const HEADER_ROWS: u16 = 3;
const EXPERTS_ROWS: u16 = 3;
const TABS_ROWS: u16 = 1;
const STATUS_ROWS: u16 = 1;
const FOOTER_ROWS: u16 = 1;

struct App {
    state: AppState,
    pager: ScrollPager,
    pull: PullGesture,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
    feed_at_top: bool,
}

impl App {
    fn new(cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        Self {
            state: AppState::new(),
            pager: ScrollPager::default(),
            pull: PullGesture::new(PullConfig::default()),
            should_quit: false,
            cmd_tx,
            feed_at_top: true,
        }
    }

    fn send(&mut self, cmd: ProviderCommand) -> bool {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[WARN] No data provider attached");
            return false;
        };
        if tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Provider channel closed");
            return false;
        }
        true
    }

    fn request_first_page(&mut self) {
        let (filter, tab) = (self.state.filter, self.state.tab);
        if self.send(ProviderCommand::LoadFeedPage {
            page: 1,
            filter,
            tab,
        }) {
            self.state.feed_loading = true;
        }
    }

    fn request_next_page(&mut self) {
        let page = self.state.feed_page + 1;
        let (filter, tab) = (self.state.filter, self.state.tab);
        if self.send(ProviderCommand::LoadFeedPage { page, filter, tab }) {
            self.state.feed_loading = true;
        }
    }

    fn request_refresh(&mut self, announce: bool) {
        let (filter, tab) = (self.state.filter, self.state.tab);
        if self.send(ProviderCommand::RefreshFeed { filter, tab }) {
            self.state.feed_loading = true;
            if announce {
                self.state.push_log("[INFO] Refreshing feed");
            }
        }
    }

    fn request_generate(&mut self) {
        let Some(fixture) = self.state.selected_fixture() else {
            self.state.push_log("[INFO] No fixture selected");
            return;
        };
        let fixture_id = fixture.fixture_id;
        if self.state.betting.contains_key(&fixture_id)
            || self.state.generating.contains(&fixture_id)
        {
            self.state.screen = Screen::Detail { fixture_id };
            self.state.detail_tab = DetailTab::Recommendation;
            self.state.detail_scroll = 0;
            return;
        }
        if self.send(ProviderCommand::GeneratePrediction { fixture_id }) {
            self.state.generating.insert(fixture_id);
            self.state.screen = Screen::Detail { fixture_id };
            self.state.detail_tab = DetailTab::Recommendation;
            self.state.detail_scroll = 0;
            self.state.push_log(format!(
                "[INFO] Generating prediction for fixture {fixture_id}"
            ));
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Char('1') => self.state.screen = Screen::Feed,
            KeyCode::Char('2') => {
                self.state.screen = Screen::Fixtures;
                self.send(ProviderCommand::FetchFixtures);
            }
            KeyCode::Char('b') | KeyCode::Esc => {
                self.state.screen = match self.state.screen {
                    Screen::Detail { .. } => Screen::Fixtures,
                    _ => Screen::Feed,
                };
            }
            KeyCode::Char('j') | KeyCode::Down => match self.state.screen {
                Screen::Feed => self.state.select_feed_next(),
                Screen::Fixtures => self.state.select_fixture_next(),
                Screen::Detail { .. } => {
                    self.state.detail_scroll = self.state.detail_scroll.saturating_add(1);
                }
            },
            KeyCode::Char('k') | KeyCode::Up => match self.state.screen {
                Screen::Feed => self.state.select_feed_prev(),
                Screen::Fixtures => self.state.select_fixture_prev(),
                Screen::Detail { .. } => {
                    self.state.detail_scroll = self.state.detail_scroll.saturating_sub(1);
                }
            },
            KeyCode::Char('l') | KeyCode::Right => match self.state.screen {
                Screen::Feed => self.state.select_expert_next(),
                Screen::Detail { .. } => self.state.cycle_detail_tab(),
                Screen::Fixtures => {}
            },
            KeyCode::Char('h') | KeyCode::Left => match self.state.screen {
                Screen::Feed => self.state.select_expert_prev(),
                Screen::Detail { .. } => self.state.cycle_detail_tab(),
                Screen::Fixtures => {}
            },
            KeyCode::Char('f') => {
                if self.state.screen == Screen::Feed {
                    self.state.cycle_filter();
                    self.request_first_page();
                }
            }
            KeyCode::Char('t') => {
                if self.state.screen == Screen::Feed {
                    self.state.cycle_tab();
                    self.request_first_page();
                }
            }
            KeyCode::Char('r') => {
                if !self.state.feed_loading && !self.pull.is_refreshing() {
                    self.request_refresh(true);
                }
            }
            KeyCode::Char('g') | KeyCode::Enter => {
                if matches!(self.state.screen, Screen::Fixtures) {
                    self.request_generate();
                }
            }
            _ => {}
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollDown => match self.state.screen {
                Screen::Feed => self.state.select_feed_next(),
                Screen::Fixtures => self.state.select_fixture_next(),
                Screen::Detail { .. } => {
                    self.state.detail_scroll = self.state.detail_scroll.saturating_add(1);
                }
            },
            MouseEventKind::ScrollUp => match self.state.screen {
                Screen::Feed => self.state.select_feed_prev(),
                Screen::Fixtures => self.state.select_fixture_prev(),
                Screen::Detail { .. } => {
                    self.state.detail_scroll = self.state.detail_scroll.saturating_sub(1);
                }
            },
            MouseEventKind::Down(MouseButton::Left) => {
                if self.state.screen == Screen::Feed {
                    let scroll_offset = if self.feed_at_top { 0.0 } else { 1.0 };
                    self.pull.press(mouse.row as f32 * ROW_POINTS, scroll_offset);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.pull.drag(mouse.row as f32 * ROW_POINTS);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.pull.release(Instant::now()) == Release::Refresh {
                    self.request_refresh(false);
                }
            }
            _ => {}
        }
    }

    /// Per-frame sentinel observation for the feed list. Geometry mirrors
    /// what `render_feed` draws for the same state.
    fn drive_pagination(&mut self, size: Rect) {
        if self.state.screen != Screen::Feed {
            return;
        }
        let list_rows = feed_list_rows(size, self.pull.pull_distance());
        let visible = (list_rows / FEED_ROW_HEIGHT).max(1) as usize;
        let len = self.state.feed.len();
        let (start, _end) = visible_range(self.state.feed_selected, len, visible);
        self.feed_at_top = start == 0;

        // Sentinel identity: a refresh or an append moves the marker.
        self.pager
            .attach(((self.state.feed_page as u64) << 32) | len as u64);
        let sample = SentinelSample {
            sentinel_top: ((len - start) as f32) * FEED_ROW_HEIGHT as f32 * ROW_POINTS,
            viewport_bottom: (visible as f32) * FEED_ROW_HEIGHT as f32 * ROW_POINTS,
        };
        let gates = LoadGates {
            has_more: self.state.feed_has_more,
            is_loading: self.state.feed_loading || self.pull.is_refreshing(),
        };
        if self.pager.observe(sample, gates) {
            self.request_next_page();
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
    let source = std::env::var("FEED_SOURCE")
        .unwrap_or_default()
        .to_lowercase();
    match api_base_from_env() {
        Some(base) if source != "mock" => spawn_provider(base, tx, cmd_rx),
        _ => spawn_mock_provider(tx, cmd_rx),
    }

    let mut app = App::new(Some(cmd_tx));
    app.send(ProviderCommand::FetchExperts);
    app.send(ProviderCommand::FetchFixtures);
    app.request_first_page();

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
            let refresh_settled =
                matches!(&delta, Delta::FeedRefreshed { .. } | Delta::FeedError(_));
            apply_delta(&mut app.state, delta);
            // The gesture must leave Refreshing on success and failure alike.
            if refresh_settled && app.pull.is_refreshing() {
                app.pull.finish_refresh();
            }
        }

        app.pull.settle(Instant::now());
        let size = terminal.size()?;
        app.drive_pagination(size);

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.on_key(key),
                Event::Mouse(mouse) => app.on_mouse(mouse),
                _ => {}
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

fn feed_list_rows(size: Rect, pull_distance: f32) -> u16 {
    let fixed = HEADER_ROWS + EXPERTS_ROWS + TABS_ROWS + STATUS_ROWS + FOOTER_ROWS;
    let body = size.height.saturating_sub(fixed);
    body.saturating_sub(pull_rows(pull_distance))
}

fn pull_rows(pull_distance: f32) -> u16 {
    (pull_distance / ROW_POINTS).round() as u16
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_ROWS),
            Constraint::Min(1),
            Constraint::Length(STATUS_ROWS),
            Constraint::Length(FOOTER_ROWS),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(&app.state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Feed => render_feed(frame, chunks[1], app),
        Screen::Fixtures => render_fixtures(frame, chunks[1], &app.state),
        Screen::Detail { fixture_id } => render_detail(frame, chunks[1], &app.state, fixture_id),
    }

    let status = Paragraph::new(status_text(app)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(status, chunks[2]);

    let footer =
        Paragraph::new(footer_text(&app.state)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let title = match &state.screen {
        Screen::Feed => format!(
            "TIPFEED | {} | {} | {} picks",
            tab_label(state.tab),
            filter_label(state.filter),
            state.feed.len()
        ),
        Screen::Fixtures => format!(
            "TIPFEED FIXTURES | {} today / {} tomorrow",
            state.fixtures_today.len(),
            state.fixtures_tomorrow.len()
        ),
        Screen::Detail { fixture_id } => format!("TIPFEED BETTING | fixture {fixture_id}"),
    };
    let line1 = format!("  .--.  {title}");
    let line2 = " /.__.\\".to_string();
    format!("{line1}\n{line2}")
}

fn status_text(app: &App) -> String {
    if app.pull.is_refreshing() {
        return "refreshing...".to_string();
    }
    if app.state.feed_loading {
        return "loading...".to_string();
    }
    if let Some(err) = &app.state.feed_error {
        return format!("error: {err} (r to retry)");
    }
    app.state
        .logs
        .back()
        .cloned()
        .unwrap_or_else(|| "ready".to_string())
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Feed => {
            "1 Feed | 2 Fixtures | j/k Move | h/l Experts | f Filter | t Tab | r Refresh | drag down Refresh | ? Help | q Quit"
                .to_string()
        }
        Screen::Fixtures => {
            "1 Feed | Enter/g Prediction | j/k Move | b/Esc Back | ? Help | q Quit".to_string()
        }
        Screen::Detail { .. } => "h/l Tabs | j/k Scroll | b/Esc Back | ? Help | q Quit".to_string(),
    }
}

fn render_feed(frame: &mut Frame, area: Rect, app: &App) {
    let state = &app.state;
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(EXPERTS_ROWS),
            Constraint::Length(TABS_ROWS),
            Constraint::Min(1),
        ])
        .split(area);

    render_experts_strip(frame, sections[0], state);
    render_filter_line(frame, sections[1], state);

    let mut list_area = sections[2];

    // The pull indicator occupies the rows the list is dragged down by.
    let offset = pull_rows(app.pull.pull_distance()).min(list_area.height);
    if offset > 0 || app.pull.is_refreshing() {
        let indicator_area = Rect {
            height: offset.max(1).min(list_area.height),
            ..list_area
        };
        let label = if app.pull.is_refreshing() {
            "~ refreshing...".to_string()
        } else if app.pull.pull_distance() >= app.pull.threshold() {
            "v release to refresh".to_string()
        } else {
            format!(
                "v pull to refresh ({:.0}/{:.0})",
                app.pull.pull_distance(),
                app.pull.threshold()
            )
        };
        let indicator = Paragraph::new(label).style(Style::default().fg(Color::Cyan));
        frame.render_widget(indicator, indicator_area);
        list_area.y += offset;
        list_area.height = list_area.height.saturating_sub(offset);
    }

    if state.feed.is_empty() {
        let text = if state.feed_loading {
            "Loading predictions..."
        } else if state.feed_error.is_some() {
            "Feed unavailable. Press r to retry."
        } else {
            "No predictions for this tab/filter"
        };
        let empty = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }

    if list_area.height < FEED_ROW_HEIGHT {
        return;
    }

    let visible = (list_area.height / FEED_ROW_HEIGHT) as usize;
    let len = state.feed.len();
    let (start, end) = visible_range(state.feed_selected, len, visible);

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + (i as u16) * FEED_ROW_HEIGHT,
            width: list_area.width,
            height: FEED_ROW_HEIGHT,
        };
        render_prediction_card(frame, row_area, state, idx, idx == state.feed_selected);
    }

    // End-of-list marker, visible only when the tail is on screen.
    if end == len {
        let used = ((end - start) as u16) * FEED_ROW_HEIGHT;
        if used < list_area.height {
            let marker_area = Rect {
                x: list_area.x,
                y: list_area.y + used,
                width: list_area.width,
                height: 1,
            };
            let marker = if state.feed_loading {
                "loading more..."
            } else if state.feed_has_more {
                ""
            } else {
                "- end of picks -"
            };
            let widget = Paragraph::new(marker).style(Style::default().fg(Color::DarkGray));
            frame.render_widget(widget, marker_area);
        }
    }
}

fn render_prediction_card(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    idx: usize,
    selected: bool,
) {
    let Some(prediction) = state.feed.get(idx) else {
        return;
    };
    let row_style = if selected {
        Style::default().fg(Color::White).bg(Color::DarkGray)
    } else {
        Style::default()
    };
    if selected {
        frame.render_widget(Block::default().style(row_style), area);
    }

    let expert = &prediction.expert;
    let verified = if expert.verified { " *" } else { "" };
    let badge = expert
        .badges
        .first()
        .map(|b| format!(" | {}", b.label))
        .unwrap_or_default();
    let line1 = format!("{}{} {:.1}%{}", expert.name, verified, expert.win_rate, badge);
    let line2 = format!(
        "{} vs {} | {} | {}",
        prediction.fixture.home,
        prediction.fixture.away,
        prediction.fixture.league,
        prediction.fixture.kickoff
    );
    let line3 = prediction.title.clone();
    let line4 = format!(
        "confidence {}% | {} views | {}",
        prediction.confidence, prediction.view_count, prediction.predicted_outcome
    );

    let lines = [line1, line2, line3, line4];
    for (offset, text) in lines.iter().enumerate() {
        if (offset as u16) >= area.height {
            break;
        }
        let line_area = Rect {
            x: area.x,
            y: area.y + offset as u16,
            width: area.width,
            height: 1,
        };
        let style = if offset == 0 {
            row_style.add_modifier(Modifier::BOLD)
        } else {
            row_style
        };
        frame.render_widget(Paragraph::new(text.as_str()).style(style), line_area);
    }
}

fn render_experts_strip(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Experts").borders(Borders::BOTTOM);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if state.experts.is_empty() {
        let empty = Paragraph::new("No experts yet").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let mut spans = Vec::new();
    for (idx, expert) in state.experts.iter().enumerate() {
        let chip = format!(" {} {:.0}% ", expert.name, expert.win_rate);
        let style = if idx == state.experts_selected {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default()
        };
        spans.push(Span::styled(chip, style));
        spans.push(Span::raw(" "));
    }
    let strip = Paragraph::new(Line::from(spans));
    frame.render_widget(strip, inner);
}

fn render_filter_line(frame: &mut Frame, area: Rect, state: &AppState) {
    let text = format!(
        "Tab: {}   Filter: {}",
        tab_label(state.tab),
        filter_label(state.filter)
    );
    let line = Paragraph::new(text).style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(line, area);
}

fn render_fixtures(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = state.fixture_rows();
    if rows.is_empty() {
        let empty =
            Paragraph::new("No fixtures loaded").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let today_len = state.fixtures_today.len();
    let mut y = area.y;
    let mut render_line = |frame: &mut Frame, text: String, style: Style, y: &mut u16| {
        if *y >= area.y + area.height {
            return;
        }
        let line_area = Rect {
            x: area.x,
            y: *y,
            width: area.width,
            height: 1,
        };
        frame.render_widget(Paragraph::new(text).style(style), line_area);
        *y += 1;
    };

    let heading = Style::default()
        .add_modifier(Modifier::BOLD)
        .fg(Color::Cyan);
    render_line(frame, "TODAY".to_string(), heading, &mut y);
    for (idx, fixture) in rows.iter().enumerate() {
        if idx == today_len {
            render_line(frame, "TOMORROW".to_string(), heading, &mut y);
        }
        let selected = idx == state.fixtures_selected;
        let style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        let pred = match &fixture.prediction {
            Some(p) => format!("pick {} ({}%)", p.predicted_score, p.confidence),
            None if state.generating.contains(&fixture.fixture_id) => "generating...".to_string(),
            None => "no pick".to_string(),
        };
        let text = format!(
            "{:<17} {} vs {} | {} | {}",
            fixture.kickoff, fixture.home.name, fixture.away.name, fixture.league, pred
        );
        render_line(frame, text, style, &mut y);
    }
}

fn render_detail(frame: &mut Frame, area: Rect, state: &AppState, fixture_id: u64) {
    let Some(detail) = state.betting.get(&fixture_id) else {
        let text = if state.generating.contains(&fixture_id) {
            "Generating prediction..."
        } else {
            "No prediction for this fixture yet. Press b, then g on a fixture."
        };
        let empty = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    };

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(area);

    let title =
        Paragraph::new(detail.title.as_str()).style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(title, sections[0]);

    let tabs = [
        DetailTab::Recommendation,
        DetailTab::Stats,
        DetailTab::Analysis,
    ]
    .iter()
    .map(|tab| {
        if *tab == state.detail_tab {
            format!("[{}]", detail_tab_label(*tab))
        } else {
            format!(" {} ", detail_tab_label(*tab))
        }
    })
    .collect::<Vec<_>>()
    .join(" ");
    frame.render_widget(Paragraph::new(tabs), sections[1]);

    match state.detail_tab {
        DetailTab::Recommendation => render_recommendation(frame, sections[2], state, fixture_id),
        DetailTab::Stats => {
            let body = if detail.stats.is_empty() {
                "No stats for this fixture".to_string()
            } else {
                detail
                    .stats
                    .iter()
                    .map(|row| format!("{:<20} {:>8} {:>8}", row.name, row.home, row.away))
                    .collect::<Vec<_>>()
                    .join("\n")
            };
            let widget = Paragraph::new(body).scroll((state.detail_scroll, 0));
            frame.render_widget(widget, sections[2]);
        }
        DetailTab::Analysis => {
            let body = detail
                .analysis
                .iter()
                .map(|section| format!("{}\n{}", section.title, section.body))
                .collect::<Vec<_>>()
                .join("\n\n");
            let widget = Paragraph::new(body)
                .wrap(Wrap { trim: false })
                .scroll((state.detail_scroll, 0));
            frame.render_widget(widget, sections[2]);
        }
    }
}

fn render_recommendation(frame: &mut Frame, area: Rect, state: &AppState, fixture_id: u64) {
    let Some(detail) = state.betting.get(&fixture_id) else {
        return;
    };
    let rec = &detail.recommendation;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(area);

    let odds = rec
        .odds
        .map(|o| format!("{o:.2}"))
        .unwrap_or_else(|| "-".to_string());
    let text = format!(
        "Pick:   {}\nOdds:   {}\nWhy:    {}",
        rec.pick, odds, rec.reasoning
    );
    let pick =
        Paragraph::new(text).block(Block::default().title("Recommendation").borders(Borders::ALL));
    frame.render_widget(pick, rows[0]);

    let gauge = Gauge::default()
        .block(Block::default().title("Confidence").borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Green))
        .percent(rec.confidence.min(100) as u16);
    frame.render_widget(gauge, rows[1]);

    let expert_text = match &detail.expert {
        Some(expert) => format!(
            "{}{}\nwin rate {:.1}% | {} followers | {} picks",
            expert.name,
            expert
                .nickname
                .as_ref()
                .map(|n| format!(" \"{n}\""))
                .unwrap_or_default(),
            expert.win_rate,
            expert.followers,
            expert.prediction_count
        ),
        None => "No expert attributed".to_string(),
    };
    let expert =
        Paragraph::new(expert_text).block(Block::default().title("Expert").borders(Borders::ALL));
    frame.render_widget(expert, rows[2]);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
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
        "Tipfeed Terminal - Help",
        "",
        "Global:",
        "  1            Prediction feed",
        "  2            Today/tomorrow fixtures",
        "  b / Esc      Back",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Feed:",
        "  j/k or wheel Move through picks",
        "  h/l          Experts carousel",
        "  f / t        Cycle filter / tab",
        "  r            Refresh",
        "  drag down    Pull to refresh (at top)",
        "",
        "Fixtures:",
        "  Enter / g    Open or generate the betting view",
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
