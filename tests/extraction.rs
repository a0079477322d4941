use std::fs;
use std::path::PathBuf;

use chrono::{FixedOffset, Utc};
use serde_json::{Value, json};

use ligue1_terminal::extract::{
    api_errors, extract_standings, fixture_row, kickoff_display, paging, parse_fixtures_json,
    parse_payload, parse_players_json, parse_standings_json, player_row,
};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_standings_fixture() {
    let rows = parse_standings_json(&read_fixture("standings.json")).expect("fixture should parse");
    assert_eq!(rows.len(), 4);

    let om = &rows[0];
    assert_eq!(om.team_id, 81);
    assert_eq!(om.rank, 2);
    assert_eq!(om.name, "Marseille");
    assert_eq!(om.played, 9);
    assert_eq!(om.wins + om.draws + om.losses, om.played);
    assert_eq!(om.goal_diff, om.goals_for as i32 - om.goals_against as i32);
    assert_eq!(om.form, "WWLWD");
}

#[test]
fn standings_missing_fields_become_zero() {
    let rows = parse_standings_json(&read_fixture("standings.json")).expect("fixture should parse");

    let monaco = rows.iter().find(|r| r.team_id == 91).expect("monaco row");
    assert_eq!(monaco.goal_diff, 5);
    assert_eq!(monaco.form, "");

    let strasbourg = rows.iter().find(|r| r.team_id == 95).expect("strasbourg row");
    assert_eq!(strasbourg.played, 0);
    assert_eq!(strasbourg.wins, 0);
    assert_eq!(strasbourg.goals_for, 0);
    assert_eq!(strasbourg.goals_against, 14);
    assert_eq!(strasbourg.goal_diff, -1);
    assert_eq!(strasbourg.logo, "");
}

#[test]
fn standings_without_response_is_empty() {
    assert!(extract_standings(&json!({"errors": []})).is_empty());
    assert!(extract_standings(&json!({"response": []})).is_empty());
    assert!(extract_standings(&json!({"response": [{"league": {}}]})).is_empty());
    assert!(extract_standings(&json!({"response": [{"league": {"standings": []}}]})).is_empty());
    assert!(extract_standings(&Value::Null).is_empty());
}

#[test]
fn null_and_empty_bodies_are_empty() {
    assert!(parse_standings_json("null").expect("null should parse").is_empty());
    assert!(parse_fixtures_json("  ").expect("blank should parse").is_empty());
    assert!(parse_players_json("{}").expect("object should parse").is_empty());
}

#[test]
fn garbage_body_is_an_error() {
    assert!(parse_payload("<html>502 Bad Gateway</html>").is_err());
}

#[test]
fn player_nulls_coalesce_to_zero() {
    let rows = parse_players_json(&read_fixture("players.json")).expect("fixture should parse");
    assert_eq!(rows.len(), 3);

    let prospect = &rows[1];
    assert_eq!(prospect.name, "Young Prospect");
    assert_eq!(prospect.rating, 0.0);
    assert_eq!(prospect.goals, 0);
    assert_eq!(prospect.assists, 0);
    assert_eq!(prospect.appearances, 0);
    assert_eq!(prospect.minutes, 0);
    assert_eq!(prospect.yellow_cards, 0);
    assert_eq!(prospect.position, "Midfielder");
}

#[test]
fn player_fields_map_from_statistics() {
    let rows = parse_players_json(&read_fixture("players.json")).expect("fixture should parse");
    let dembele = &rows[0];
    assert_eq!(dembele.age, 28);
    assert_eq!(dembele.appearances, 8);
    assert_eq!(dembele.minutes, 612);
    assert!((dembele.rating - 7.433333).abs() < 1e-9);
    assert_eq!(dembele.goals, 6);
    assert_eq!(dembele.assists, 3);

    let keeper = &rows[2];
    assert_eq!(keeper.photo, "");
    assert_eq!(keeper.red_cards, 1);
    assert_eq!(keeper.yellow_cards, 2);
}

#[test]
fn player_without_statistics_is_all_zero() {
    let row = player_row(&json!({"player": {"name": "Trialist"}}));
    assert_eq!(row.name, "Trialist");
    assert_eq!(row.rating, 0.0);
    assert_eq!(row.goals, 0);
    assert_eq!(row.position, "");
}

#[test]
fn fixture_kickoff_renders_in_zone() {
    let raw = read_fixture("fixtures.json");
    let payload = parse_payload(&raw).expect("fixture should parse");
    let first = &payload["response"][0];

    let utc = fixture_row(first, &Utc);
    assert_eq!(utc.kickoff, "25/10 19:05");
    assert_eq!(utc.kickoff_ts, 1_761_419_100);
    assert_eq!(utc.home_name, "Paris Saint Germain");
    assert_eq!(utc.away_logo, "om.png");
    assert_eq!(utc.venue, "Parc des Princes");
    assert_eq!(utc.round, "Regular Season - 10");

    let paris = FixedOffset::east_opt(2 * 3600).expect("valid offset");
    assert_eq!(fixture_row(first, &paris).kickoff, "25/10 21:05");
}

#[test]
fn fixture_missing_pieces_default() {
    let raw = read_fixture("fixtures.json");
    let payload = parse_payload(&raw).expect("fixture should parse");
    let row = fixture_row(&payload["response"][1], &Utc);
    assert_eq!(row.venue, "");
    assert_eq!(row.round, "");
    assert_eq!(row.away_logo, "");
}

#[test]
fn malformed_kickoff_passes_through() {
    let (text, ts) = kickoff_display("soon", &Utc);
    assert_eq!(text, "soon");
    assert_eq!(ts, None);

    let raw = read_fixture("fixtures.json");
    let payload = parse_payload(&raw).expect("fixture should parse");
    let row = fixture_row(&payload["response"][2], &Utc);
    assert_eq!(row.kickoff, "soon");
    // Falls back to the API's own unix timestamp for ordering.
    assert_eq!(row.kickoff_ts, 1_761_505_500);
}

#[test]
fn reports_api_errors() {
    let payload = parse_payload(&read_fixture("quota_error.json")).expect("fixture should parse");
    let errors = api_errors(&payload);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("requests: You have reached"));
    assert!(extract_standings(&payload).is_empty());

    let ok = parse_payload(&read_fixture("standings.json")).expect("fixture should parse");
    assert!(api_errors(&ok).is_empty());
}

#[test]
fn reads_paging() {
    let payload = parse_payload(&read_fixture("players.json")).expect("fixture should parse");
    let p = paging(&payload);
    assert_eq!(p.current, 1);
    assert_eq!(p.total, 3);

    let missing = paging(&json!({}));
    assert_eq!((missing.current, missing.total), (1, 1));
}
