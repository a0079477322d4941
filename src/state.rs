use std::collections::VecDeque;

use anyhow::Result;

use crate::api_football::Fetched;
use crate::scores::{ScoreVector, league_average, score_table};
use crate::tables::{PlayerSort, Table, Tabular, resort_players};

const MAX_LOGS: usize = 200;

/// One team's aggregated season record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StandingsRow {
    pub team_id: u32,
    pub rank: u32,
    pub name: String,
    pub logo: String,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_diff: i32,
    pub points: u32,
    /// `W`/`D`/`L` codes, most recent last.
    pub form: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FixtureRow {
    /// Display text (`dd/mm HH:MM` local), or the raw timestamp if it did not parse.
    pub kickoff: String,
    pub kickoff_ts: i64,
    pub round: String,
    pub home_name: String,
    pub home_logo: String,
    pub away_name: String,
    pub away_logo: String,
    pub venue: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlayerRow {
    pub photo: String,
    pub name: String,
    pub age: u32,
    pub position: String,
    pub appearances: u32,
    pub minutes: u32,
    pub rating: f64,
    pub goals: u32,
    pub assists: u32,
    pub yellow_cards: u32,
    pub red_cards: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Standings,
    Chart,
    Fixtures,
    Club,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Standings, Tab::Chart, Tab::Fixtures, Tab::Club];

    pub fn index(self) -> usize {
        match self {
            Tab::Standings => 0,
            Tab::Chart => 1,
            Tab::Fixtures => 2,
            Tab::Club => 3,
        }
    }

    pub fn next(self) -> Self {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Standings => "Standings",
            Tab::Chart => "Attack/Defense",
            Tab::Fixtures => "Fixtures",
            Tab::Club => "Club",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub tab: Tab,
    pub standings: Table<StandingsRow>,
    /// Parallel to `standings.rows`.
    pub scores: Vec<ScoreVector>,
    pub league_avg: ScoreVector,
    pub fixtures: Table<FixtureRow>,
    pub squad: Table<PlayerRow>,
    pub squad_team_id: Option<u32>,
    pub player_sort: PlayerSort,
    pub selected: usize,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            tab: Tab::default(),
            standings: Table::empty(),
            scores: Vec::new(),
            league_avg: ScoreVector::default(),
            fixtures: Table::empty(),
            squad: Table::empty(),
            squad_team_id: None,
            player_sort: PlayerSort::default(),
            selected: 0,
            logs: VecDeque::new(),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    /// Replace the standings and rescore every team in one extrema pass.
    ///
    /// The selection follows the same club across a re-ranked table, and any
    /// loaded squad is dropped so the club view refetches it.
    pub fn set_standings(&mut self, table: Table<StandingsRow>) {
        let selected_team_id = self.selected_team().map(|t| t.team_id);
        self.scores = score_table(&table.rows);
        self.league_avg = league_average(&self.scores);
        self.standings = table;
        self.selected = selected_team_id
            .and_then(|id| self.standings.rows.iter().position(|r| r.team_id == id))
            .unwrap_or_else(|| self.selected.min(self.standings.len().saturating_sub(1)));
        self.squad = Table::empty();
        self.squad_team_id = None;
    }

    pub fn apply_standings(&mut self, result: Result<Fetched<StandingsRow>>) {
        let table = self.take_fetched("Standings", result);
        if table.is_empty() {
            self.push_log("[WARN] Standings unavailable; check API_FOOTBALL_KEY and quota");
        }
        self.set_standings(table);
    }

    pub fn apply_fixtures(&mut self, result: Result<Fetched<FixtureRow>>) {
        self.fixtures = self.take_fetched("Fixtures", result);
    }

    pub fn apply_squad(&mut self, team_id: u32, result: Result<Fetched<PlayerRow>>) {
        let table = self.take_fetched("Squad", result);
        if table.is_empty() {
            self.push_log("[INFO] No player data for this club (free plan limit?)");
        }
        self.squad = table;
        self.squad_team_id = Some(team_id);
    }

    // Failures degrade to an empty table and a console line.
    fn take_fetched<R: Tabular>(&mut self, what: &str, result: Result<Fetched<R>>) -> Table<R> {
        match result {
            Ok(fetched) => {
                for err in &fetched.api_errors {
                    self.push_log(format!("[WARN] {what}: api error {err}"));
                }
                for warning in &fetched.warnings {
                    self.push_log(format!("[WARN] {what}: {warning}"));
                }
                let source = if fetched.from_cache { "cache" } else { "network" };
                self.push_log(format!(
                    "[INFO] {what}: {} rows ({source})",
                    fetched.table.len()
                ));
                fetched.table
            }
            Err(err) => {
                self.push_log(format!("[WARN] {what}: {err:#}"));
                Table::empty()
            }
        }
    }

    pub fn selected_team(&self) -> Option<&StandingsRow> {
        self.standings.rows.get(self.selected)
    }

    pub fn selected_scores(&self) -> Option<&ScoreVector> {
        self.scores.get(self.selected)
    }

    /// Squad rows only count when they belong to the selected club.
    pub fn squad_for_selected(&self) -> Option<&Table<PlayerRow>> {
        let team = self.selected_team()?;
        (self.squad_team_id == Some(team.team_id)).then_some(&self.squad)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.standings.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn cycle_player_sort(&mut self) {
        self.player_sort = self.player_sort.next();
        resort_players(&mut self.squad, self.player_sort);
    }
}
