use std::cmp::Ordering;

use crate::state::{FixtureRow, PlayerRow, StandingsRow};

/// Plain string cells in column order; formatting beyond that is the
/// renderer's business.
pub trait Tabular {
    const COLUMNS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerSort {
    #[default]
    Rating,
    Minutes,
    Goals,
}

impl PlayerSort {
    pub fn next(self) -> Self {
        match self {
            PlayerSort::Rating => PlayerSort::Minutes,
            PlayerSort::Minutes => PlayerSort::Goals,
            PlayerSort::Goals => PlayerSort::Rating,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlayerSort::Rating => "RATING",
            PlayerSort::Minutes => "MINUTES",
            PlayerSort::Goals => "GOALS",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table<R> {
    pub columns: &'static [&'static str],
    pub rows: Vec<R>,
}

impl<R: Tabular> Table<R> {
    pub fn empty() -> Self {
        Self {
            columns: R::COLUMNS,
            rows: Vec::new(),
        }
    }

    fn from_rows(rows: Vec<R>) -> Self {
        Self {
            columns: R::COLUMNS,
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn cell_rows(&self) -> Vec<Vec<String>> {
        self.rows.iter().map(Tabular::cells).collect()
    }
}

impl<R: Tabular> Default for Table<R> {
    fn default() -> Self {
        Self::empty()
    }
}

pub fn assemble_standings(mut rows: Vec<StandingsRow>) -> Table<StandingsRow> {
    rows.sort_by_key(|r| r.rank);
    Table::from_rows(rows)
}

pub fn assemble_fixtures(mut rows: Vec<FixtureRow>) -> Table<FixtureRow> {
    rows.sort_by_key(|r| r.kickoff_ts);
    Table::from_rows(rows)
}

pub fn assemble_players(mut rows: Vec<PlayerRow>, sort: PlayerSort) -> Table<PlayerRow> {
    sort_players(&mut rows, sort);
    Table::from_rows(rows)
}

/// Re-sort an already assembled squad table in place.
pub fn resort_players(table: &mut Table<PlayerRow>, sort: PlayerSort) {
    sort_players(&mut table.rows, sort);
}

fn sort_players(rows: &mut [PlayerRow], sort: PlayerSort) {
    // `sort_by` is stable; ties keep API order.
    match sort {
        PlayerSort::Rating => rows.sort_by(|a, b| desc_f64(a.rating, b.rating)),
        PlayerSort::Minutes => rows.sort_by(|a, b| b.minutes.cmp(&a.minutes)),
        PlayerSort::Goals => rows.sort_by(|a, b| {
            b.goals
                .cmp(&a.goals)
                .then_with(|| b.assists.cmp(&a.assists))
        }),
    }
}

fn desc_f64(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

impl Table<StandingsRow> {
    /// Top three of the table, fewer if the league is smaller.
    pub fn podium(&self) -> &[StandingsRow] {
        &self.rows[..self.rows.len().min(3)]
    }

    pub fn find_team(&self, team_id: u32) -> Option<&StandingsRow> {
        self.rows.iter().find(|r| r.team_id == team_id)
    }

    pub fn team_ids(&self) -> Vec<(u32, String)> {
        self.rows
            .iter()
            .map(|r| (r.team_id, r.name.clone()))
            .collect()
    }
}

impl Tabular for StandingsRow {
    const COLUMNS: &'static [&'static str] = &[
        "#", "Team", "P", "W", "D", "L", "GF", "GA", "GD", "Pts", "Form",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.rank.to_string(),
            self.name.clone(),
            self.played.to_string(),
            self.wins.to_string(),
            self.draws.to_string(),
            self.losses.to_string(),
            self.goals_for.to_string(),
            self.goals_against.to_string(),
            format!("{:+}", self.goal_diff),
            self.points.to_string(),
            self.form.clone(),
        ]
    }
}

impl Tabular for FixtureRow {
    const COLUMNS: &'static [&'static str] = &["Kickoff", "Home", "Away", "Venue", "Round"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.kickoff.clone(),
            self.home_name.clone(),
            self.away_name.clone(),
            self.venue.clone(),
            self.round.clone(),
        ]
    }
}

impl Tabular for PlayerRow {
    const COLUMNS: &'static [&'static str] = &[
        "Name", "Pos", "Age", "Apps", "Min", "G", "A", "YC", "RC", "Rating",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.position.clone(),
            self.age.to_string(),
            self.appearances.to_string(),
            self.minutes.to_string(),
            self.goals.to_string(),
            self.assists.to_string(),
            self.yellow_cards.to_string(),
            self.red_cards.to_string(),
            format!("{:.1}", self.rating),
        ]
    }
}
