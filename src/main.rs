use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph, Row,
    Table, TableState, Tabs,
};

use ligue1_terminal::api_football::{fetch_next_fixtures, fetch_squad_stats, fetch_standings};
use ligue1_terminal::config::AppConfig;
use ligue1_terminal::http_cache;
use ligue1_terminal::scores::ScoreVector;
use ligue1_terminal::state::{AppState, Tab};
use ligue1_terminal::tables::Tabular;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    League,
    Squad,
}

struct App {
    cfg: AppConfig,
    state: AppState,
    pending: Option<Pending>,
    should_quit: bool,
}

impl App {
    fn new(cfg: AppConfig) -> Self {
        Self {
            cfg,
            state: AppState::new(),
            pending: Some(Pending::League),
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => self.switch_tab(self.state.tab.next()),
            KeyCode::Char('1') => self.switch_tab(Tab::Standings),
            KeyCode::Char('2') => self.switch_tab(Tab::Chart),
            KeyCode::Char('3') => self.switch_tab(Tab::Fixtures),
            KeyCode::Char('4') => self.switch_tab(Tab::Club),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Enter => self.switch_tab(Tab::Club),
            KeyCode::Char('s') => self.state.cycle_player_sort(),
            KeyCode::Char('r') => {
                if let Err(err) = http_cache::clear() {
                    self.state.push_log(format!("[WARN] Cache clear failed: {err:#}"));
                }
                self.pending = Some(Pending::League);
            }
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        self.state.tab = tab;
        if tab == Tab::Club && self.state.squad_for_selected().is_none() {
            self.pending = Some(Pending::Squad);
        }
    }

    fn run_pending(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        match pending {
            Pending::League => {
                self.state.apply_standings(fetch_standings(&self.cfg));
                self.state.apply_fixtures(fetch_next_fixtures(&self.cfg));
                if self.state.tab == Tab::Club {
                    self.pending = Some(Pending::Squad);
                }
            }
            Pending::Squad => {
                let Some(team) = self.state.selected_team() else {
                    self.state.push_log("[INFO] No club selected");
                    return;
                };
                let team_id = team.team_id;
                let result = fetch_squad_stats(&self.cfg, team_id, self.state.player_sort);
                self.state.apply_squad(team_id, result);
            }
        }
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    // Missing credentials stop us before the terminal is touched.
    let cfg = AppConfig::from_env()?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(cfg);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);

    loop {
        terminal.draw(|f| ui(f, app))?;

        // Fetches block; draw the loading hint first.
        if app.pending.is_some() {
            app.run_pending();
            continue;
        }

        if event::poll(tick_rate)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.on_key(key);
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
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let titles = Tab::ALL.iter().map(|t| t.label()).collect::<Vec<_>>();
    let tabs = Tabs::new(titles)
        .select(app.state.tab.index())
        .block(Block::default().title(header_text(app)).borders(Borders::ALL))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, chunks[0]);

    match app.state.tab {
        Tab::Standings => render_standings(frame, chunks[1], &app.state),
        Tab::Chart => render_chart(frame, chunks[1], &app.state),
        Tab::Fixtures => render_fixtures(frame, chunks[1], &app.state),
        Tab::Club => render_club(frame, chunks[1], &app.state),
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(app)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(app: &App) -> String {
    format!(
        " League {} | Season {}/{} ",
        app.cfg.league_id,
        app.cfg.season,
        app.cfg.season + 1
    )
}

fn footer_text(app: &App) -> String {
    match app.pending {
        Some(Pending::League) => "Loading league...".to_string(),
        Some(Pending::Squad) => "Loading squad...".to_string(),
        None => format!(
            "Tab/1-4 Tabs | j/k/↑/↓ Club | Enter Club view | s Sort ({}) | r Reload | ? Help | q Quit",
            app.state.player_sort.label()
        ),
    }
}

fn render_standings(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(1)])
        .split(area);

    let podium_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(34),
            Constraint::Percentage(33),
        ])
        .split(sections[0]);
    const PODIUM_TITLES: [&str; 3] = ["Leader", "Chaser", "Podium"];
    for (idx, team) in state.standings.podium().iter().enumerate() {
        let text = format!("{}. {}\n{} pts", team.rank, team.name, team.points);
        let card = Paragraph::new(text)
            .block(Block::default().title(PODIUM_TITLES[idx]).borders(Borders::ALL));
        frame.render_widget(card, podium_cols[idx]);
    }

    if state.standings.is_empty() {
        let empty = Paragraph::new("Standings unavailable. Check the API key.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title("Table").borders(Borders::ALL));
        frame.render_widget(empty, sections[1]);
        return;
    }

    render_table(
        frame,
        sections[1],
        "Table",
        state.standings.columns,
        state.standings.cell_rows(),
        &standings_widths(),
        Some(state.selected),
    );
}

fn render_chart(frame: &mut Frame, area: Rect, state: &AppState) {
    if state.standings.is_empty() {
        let empty = Paragraph::new("No standings to plot")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(28)])
        .split(area);

    // Goals against runs right-to-left so the best defenses sit on the right.
    let max_ga = state
        .standings
        .rows
        .iter()
        .map(|r| r.goals_against)
        .max()
        .unwrap_or(0) as f64;
    let max_gf = state
        .standings
        .rows
        .iter()
        .map(|r| r.goals_for)
        .max()
        .unwrap_or(0) as f64;

    let league_points = state
        .standings
        .rows
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != state.selected)
        .map(|(_, r)| (max_ga - r.goals_against as f64, r.goals_for as f64))
        .collect::<Vec<_>>();
    let selected_points = state
        .selected_team()
        .map(|r| vec![(max_ga - r.goals_against as f64, r.goals_for as f64)])
        .unwrap_or_default();
    let selected_name = state
        .selected_team()
        .map(|r| r.name.clone())
        .unwrap_or_default();

    let datasets = vec![
        Dataset::default()
            .name("League")
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::Cyan))
            .data(&league_points),
        Dataset::default()
            .name(selected_name)
            .marker(symbols::Marker::Block)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::Yellow))
            .data(&selected_points),
    ];

    let x_top = max_ga.max(1.0);
    let y_top = max_gf.max(1.0);
    let chart = Chart::new(datasets)
        .block(Block::default().title("Goals for vs goals against").borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .title("Goals against (fewer →)")
                .bounds([0.0, x_top])
                .labels(vec![
                    Span::raw(format!("{max_ga:.0}")),
                    Span::raw(format!("{:.0}", max_ga / 2.0)),
                    Span::raw("0"),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("Goals for")
                .bounds([0.0, y_top])
                .labels(vec![
                    Span::raw("0"),
                    Span::raw(format!("{:.0}", y_top / 2.0)),
                    Span::raw(format!("{y_top:.0}")),
                ]),
        );
    frame.render_widget(chart, cols[0]);

    let legend = state
        .standings
        .rows
        .iter()
        .enumerate()
        .map(|(idx, r)| {
            let prefix = if idx == state.selected { "> " } else { "  " };
            format!("{prefix}{:>2} {} {}-{}", r.rank, r.name, r.goals_for, r.goals_against)
        })
        .collect::<Vec<_>>()
        .join("\n");
    let legend = Paragraph::new(legend)
        .block(Block::default().title("GF-GA").borders(Borders::ALL));
    frame.render_widget(legend, cols[1]);
}

fn render_fixtures(frame: &mut Frame, area: Rect, state: &AppState) {
    if state.fixtures.is_empty() {
        let empty = Paragraph::new("No upcoming fixtures")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title("Next fixtures").borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    }
    render_table(
        frame,
        area,
        "Next fixtures",
        state.fixtures.columns,
        state.fixtures.cell_rows(),
        &fixture_widths(),
        None,
    );
}

fn render_club(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(team) = state.selected_team() else {
        let empty = Paragraph::new("No club selected")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let kpis = format!(
        "Rank {} | {} pts | Attack {} goals | Defense {} conceded | Form {}",
        team.rank,
        team.points,
        team.goals_for,
        team.goals_against,
        if team.form.is_empty() { "-" } else { team.form.as_str() }
    );
    let header = Paragraph::new(kpis)
        .block(Block::default().title(team.name.as_str()).borders(Borders::ALL));
    frame.render_widget(header, rows[0]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(30)])
        .split(rows[1]);

    let scores = state.selected_scores().copied().unwrap_or_default();
    frame.render_widget(radar_chart(&scores, &state.league_avg), cols[0]);

    let title = format!("Key players (by {})", state.player_sort.label().to_lowercase());
    match state.squad_for_selected() {
        Some(squad) if !squad.is_empty() => render_table(
            frame,
            cols[1],
            &title,
            squad.columns,
            squad.cell_rows(),
            &player_widths(),
            None,
        ),
        Some(_) => {
            let empty = Paragraph::new("Player data unavailable for this club")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().title(title).borders(Borders::ALL));
            frame.render_widget(empty, cols[1]);
        }
        None => {
            let empty = Paragraph::new("Press Enter to load the squad")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().title(title).borders(Borders::ALL));
            frame.render_widget(empty, cols[1]);
        }
    }
}

fn radar_chart(team: &ScoreVector, league: &ScoreVector) -> BarChart<'static> {
    let team_style = Style::default().fg(Color::Green);
    let league_style = Style::default().fg(Color::DarkGray);

    let mut chart = BarChart::default()
        .block(Block::default().title("Profile vs league avg").borders(Borders::ALL))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .group_gap(1)
        .max(100);

    for ((label, value), (_, avg)) in team.axes().into_iter().zip(league.axes()) {
        let bars = [
            Bar::default()
                .value(value.round() as u64)
                .text_value(format!("{value:.0}"))
                .style(team_style),
            Bar::default()
                .value(avg.round() as u64)
                .text_value(format!("{avg:.0}"))
                .style(league_style),
        ];
        chart = chart.data(BarGroup::default().label(Line::from(label)).bars(&bars));
    }
    chart
}

fn render_table(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    columns: &[&str],
    rows: Vec<Vec<String>>,
    widths: &[Constraint],
    selected: Option<usize>,
) {
    let header = Row::new(columns.iter().map(|c| c.to_string()))
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = rows.into_iter().map(Row::new).collect::<Vec<_>>();
    let table = Table::new(rows, widths.to_vec())
        .header(header)
        .block(Block::default().title(title.to_string()).borders(Borders::ALL))
        .highlight_style(Style::default().fg(Color::White).bg(Color::DarkGray));
    let mut table_state = TableState::default().with_selected(selected);
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn standings_widths() -> Vec<Constraint> {
    let mut widths = vec![Constraint::Length(3), Constraint::Min(18)];
    widths.extend([Constraint::Length(4); 8]);
    widths.push(Constraint::Length(6));
    debug_assert_eq!(widths.len(), ligue1_terminal::state::StandingsRow::COLUMNS.len());
    widths
}

fn fixture_widths() -> Vec<Constraint> {
    vec![
        Constraint::Length(12),
        Constraint::Min(16),
        Constraint::Min(16),
        Constraint::Min(16),
        Constraint::Length(22),
    ]
}

fn player_widths() -> Vec<Constraint> {
    let mut widths = vec![Constraint::Min(18), Constraint::Length(11)];
    widths.extend([Constraint::Length(5); 7]);
    widths.push(Constraint::Length(6));
    widths
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    let start = state.logs.len().saturating_sub(2);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Ligue 1 Terminal - Help",
        "",
        "  Tab / 1-4    Switch tab",
        "  j/k or ↑/↓   Select club",
        "  Enter        Club view (loads squad)",
        "  s            Cycle player sort",
        "  r            Clear cache and reload",
        "  ?            Toggle help",
        "  q            Quit",
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
