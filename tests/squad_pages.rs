use anyhow::anyhow;
use serde_json::{Value, json};

use ligue1_terminal::api_football::{collect_squad_pages, next_squad_page};
use ligue1_terminal::state::AppState;
use ligue1_terminal::tables::PlayerSort;

fn page(current: u32, total: u32, name: &str, goals: u32) -> Value {
    json!({
        "errors": [],
        "paging": {"current": current, "total": total},
        "response": [{
            "player": {"name": name, "age": 24},
            "statistics": [{
                "games": {"appearences": 5, "minutes": 400, "position": "Attacker", "rating": "7.0"},
                "goals": {"total": goals, "assists": 0},
                "cards": {"yellow": 0, "red": 0}
            }]
        }]
    })
}

#[test]
fn next_page_stops_at_api_total_or_cap() {
    assert_eq!(next_squad_page(1, 3, 5), Some(2));
    assert_eq!(next_squad_page(3, 3, 5), None);
    assert_eq!(next_squad_page(2, 4, 2), None);
    assert_eq!(next_squad_page(1, 1, 1), None);
    // Missing paging defaults to total 1.
    assert_eq!(next_squad_page(1, 1, 10), None);
}

#[test]
fn walks_every_page_under_the_cap() {
    let mut requested = Vec::new();
    let fetched = collect_squad_pages(5, PlayerSort::Goals, |p| {
        requested.push(p);
        Ok((page(p, 3, &format!("Player {p}"), p), true))
    })
    .expect("all pages succeed");

    assert_eq!(requested, vec![1, 2, 3]);
    assert_eq!(fetched.table.len(), 3);
    assert_eq!(fetched.table.rows[0].name, "Player 3");
    assert!(fetched.from_cache);
    assert!(fetched.warnings.is_empty());
}

#[test]
fn cap_limits_requests() {
    let mut requested = Vec::new();
    let fetched = collect_squad_pages(1, PlayerSort::Rating, |p| {
        requested.push(p);
        Ok((page(p, 3, "Only", 1), false))
    })
    .expect("first page succeeds");

    assert_eq!(requested, vec![1]);
    assert_eq!(fetched.table.len(), 1);
    assert!(!fetched.from_cache);
}

#[test]
fn later_page_failure_keeps_earlier_rows() {
    let fetched = collect_squad_pages(3, PlayerSort::Rating, |p| match p {
        1 => Ok((page(1, 3, "Starter", 2), false)),
        _ => Err(anyhow!("quota exhausted")),
    })
    .expect("partial squad is still a result");

    assert_eq!(fetched.table.len(), 1);
    assert_eq!(fetched.table.rows[0].name, "Starter");
    assert_eq!(fetched.warnings.len(), 1);
    assert!(fetched.warnings[0].contains("page 2"));
    assert!(fetched.warnings[0].contains("quota exhausted"));

    let mut state = AppState::new();
    state.apply_squad(85, Ok(fetched));
    assert!(
        state
            .logs
            .iter()
            .any(|l| l.starts_with("[WARN] Squad:") && l.contains("quota exhausted"))
    );
}

#[test]
fn first_page_failure_is_an_error() {
    let result = collect_squad_pages(3, PlayerSort::Rating, |_| Err(anyhow!("connection refused")));
    let err = result.expect_err("nothing collected");
    assert!(format!("{err:#}").contains("connection refused"));
}
