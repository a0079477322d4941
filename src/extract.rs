use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone};
use serde_json::Value;

use crate::state::{FixtureRow, PlayerRow, StandingsRow};

const KICKOFF_FORMAT: &str = "%d/%m %H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub current: u32,
    pub total: u32,
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            current: 1,
            total: 1,
        }
    }
}

/// Parse a raw response body. Empty bodies and `null` become `Value::Null`
/// so every extractor downstream yields an empty table.
pub fn parse_payload(raw: &str) -> Result<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Value::Null);
    }
    serde_json::from_str(trimmed).context("invalid api-football json")
}

pub fn parse_standings_json(raw: &str) -> Result<Vec<StandingsRow>> {
    Ok(extract_standings(&parse_payload(raw)?))
}

pub fn parse_fixtures_json(raw: &str) -> Result<Vec<FixtureRow>> {
    Ok(extract_fixtures(&parse_payload(raw)?))
}

pub fn parse_players_json(raw: &str) -> Result<Vec<PlayerRow>> {
    Ok(extract_players(&parse_payload(raw)?))
}

/// Standings live at `response[0].league.standings[0]`; the API nests groups
/// there, and league competitions only ever have the first one.
pub fn extract_standings(payload: &Value) -> Vec<StandingsRow> {
    let Some(table) = payload
        .get("response")
        .and_then(|r| r.get(0))
        .and_then(|r| r.get("league"))
        .and_then(|l| l.get("standings"))
        .and_then(|s| s.get(0))
        .and_then(|s| s.as_array())
    else {
        return Vec::new();
    };
    table.iter().map(standings_row).collect()
}

pub fn extract_fixtures(payload: &Value) -> Vec<FixtureRow> {
    response_items(payload)
        .iter()
        .map(|item| fixture_row(item, &Local))
        .collect()
}

pub fn extract_players(payload: &Value) -> Vec<PlayerRow> {
    response_items(payload).iter().map(player_row).collect()
}

pub fn standings_row(v: &Value) -> StandingsRow {
    let team = v.get("team").unwrap_or(&Value::Null);
    let all = v.get("all").unwrap_or(&Value::Null);
    let goals = all.get("goals").unwrap_or(&Value::Null);
    StandingsRow {
        team_id: count(team.get("id")),
        rank: count(v.get("rank")),
        name: text(team.get("name")),
        logo: text(team.get("logo")),
        played: count(all.get("played")),
        wins: count(all.get("win")),
        draws: count(all.get("draw")),
        losses: count(all.get("lose")),
        goals_for: count(goals.get("for")),
        goals_against: count(goals.get("against")),
        goal_diff: signed(v.get("goalsDiff")),
        points: count(v.get("points")),
        form: form(v.get("form")),
    }
}

/// Build a fixture row, rendering the kickoff in `tz`.
pub fn fixture_row<Tz: TimeZone>(v: &Value, tz: &Tz) -> FixtureRow
where
    Tz::Offset: std::fmt::Display,
{
    let fixture = v.get("fixture").unwrap_or(&Value::Null);
    let teams = v.get("teams").unwrap_or(&Value::Null);
    let home = teams.get("home").unwrap_or(&Value::Null);
    let away = teams.get("away").unwrap_or(&Value::Null);

    let raw_date = text(fixture.get("date"));
    let (kickoff, parsed_ts) = kickoff_display(&raw_date, tz);
    let kickoff_ts = parsed_ts.unwrap_or_else(|| i64::from(count(fixture.get("timestamp"))));

    FixtureRow {
        kickoff,
        kickoff_ts,
        round: text(v.get("league").and_then(|l| l.get("round"))),
        home_name: text(home.get("name")),
        home_logo: text(home.get("logo")),
        away_name: text(away.get("name")),
        away_logo: text(away.get("logo")),
        venue: text(fixture.get("venue").and_then(|x| x.get("name"))),
    }
}

pub fn player_row(v: &Value) -> PlayerRow {
    let player = v.get("player").unwrap_or(&Value::Null);
    let stats = v
        .get("statistics")
        .and_then(|s| s.get(0))
        .unwrap_or(&Value::Null);
    let games = stats.get("games").unwrap_or(&Value::Null);
    let goals = stats.get("goals").unwrap_or(&Value::Null);
    let cards = stats.get("cards").unwrap_or(&Value::Null);

    PlayerRow {
        photo: text(player.get("photo")),
        name: text(player.get("name")),
        age: count(player.get("age")),
        position: text(games.get("position")),
        // The API spells it this way.
        appearances: count(games.get("appearences")),
        minutes: count(games.get("minutes")),
        rating: rating(games.get("rating")),
        goals: count(goals.get("total")),
        assists: count(goals.get("assists")),
        yellow_cards: count(cards.get("yellow")),
        red_cards: count(cards.get("red")),
    }
}

/// Convert an RFC 3339 kickoff into `dd/mm HH:MM` in `tz`, plus its Unix
/// timestamp. Unparsable text is passed through unchanged.
pub fn kickoff_display<Tz: TimeZone>(raw: &str, tz: &Tz) -> (String, Option<i64>)
where
    Tz::Offset: std::fmt::Display,
{
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(dt) => {
            let local = dt.with_timezone(tz);
            (local.format(KICKOFF_FORMAT).to_string(), Some(dt.timestamp()))
        }
        Err(_) => (raw.to_string(), None),
    }
}

/// API-Football reports auth and quota problems in `errors` with HTTP 200.
/// It is an empty array when all is well and an object keyed by error kind
/// otherwise.
pub fn api_errors(payload: &Value) -> Vec<String> {
    match payload.get("errors") {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(key, value)| format!("{key}: {}", value_text(value)))
            .collect(),
        Some(Value::Array(list)) => list
            .iter()
            .map(value_text)
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

pub fn paging(payload: &Value) -> Paging {
    let Some(p) = payload.get("paging") else {
        return Paging::default();
    };
    Paging {
        current: count(p.get("current")).max(1),
        total: count(p.get("total")).max(1),
    }
}

fn response_items(payload: &Value) -> &[Value] {
    payload
        .get("response")
        .and_then(|r| r.as_array())
        .map(Vec::as_slice)
        .unwrap_or_default()
}

// Coalescing: absent, null, empty or unparsable → typed zero.

fn count(v: Option<&Value>) -> u32 {
    match v {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f > 0.0)
                    .map(|f| f as u64)
            })
            .map(|x| x.min(u64::from(u32::MAX)) as u32)
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<u32>().unwrap_or(0),
        _ => 0,
    }
}

fn signed(v: Option<&Value>) -> i32 {
    match v {
        Some(Value::Number(n)) => n
            .as_i64()
            .map(|x| x.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<i32>().unwrap_or(0),
        _ => 0,
    }
}

fn rating(v: Option<&Value>) -> f64 {
    let parsed = match v {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(r) if r.is_finite() => r.clamp(0.0, 10.0),
        _ => 0.0,
    }
}

fn text(v: Option<&Value>) -> String {
    match v {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn form(v: Option<&Value>) -> String {
    text(v)
        .chars()
        .filter(|c| matches!(c, 'W' | 'D' | 'L'))
        .collect()
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
