use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use ligue1_terminal::extract::{parse_players_json, parse_standings_json};
use ligue1_terminal::scores::score_table;
use ligue1_terminal::state::StandingsRow;
use ligue1_terminal::tables::{PlayerSort, assemble_players, assemble_standings};

fn league_json(teams: u32) -> String {
    let rows = (1..=teams)
        .map(|i| {
            format!(
                r#"{{"rank":{i},"team":{{"id":{id},"name":"Team {i}","logo":"l{i}.png"}},"points":{pts},"goalsDiff":{gd},"form":"WDLWW","all":{{"played":34,"win":{w},"draw":6,"lose":{l},"goals":{{"for":{gf},"against":{ga}}}}}}}"#,
                id = 1000 + i,
                pts = 90 - i * 3,
                gd = 40 - i as i32 * 4,
                w = 28 - i,
                l = i,
                gf = 80 - i * 2,
                ga = 20 + i * 2,
            )
        })
        .collect::<Vec<_>>()
        .join(",");
    format!(r#"{{"errors":[],"response":[{{"league":{{"standings":[[{rows}]]}}}}]}}"#)
}

fn squad_json(players: u32) -> String {
    let rows = (1..=players)
        .map(|i| {
            format!(
                r#"{{"player":{{"name":"Player {i}","age":{age},"photo":null}},"statistics":[{{"games":{{"appearences":{i},"minutes":{min},"position":"Midfielder","rating":"{rating}"}},"goals":{{"total":{g},"assists":null}},"cards":{{"yellow":1,"red":null}}}}]}}"#,
                age = 18 + i % 15,
                min = i * 73,
                rating = 6.0 + (i % 20) as f64 / 10.0,
                g = i % 7,
            )
        })
        .collect::<Vec<_>>()
        .join(",");
    format!(r#"{{"errors":[],"paging":{{"current":1,"total":1}},"response":[{rows}]}}"#)
}

fn bench_standings_extract(c: &mut Criterion) {
    let raw = league_json(18);
    c.bench_function("standings_extract", |b| {
        b.iter(|| {
            let rows = parse_standings_json(black_box(&raw)).unwrap();
            black_box(assemble_standings(rows).len());
        })
    });
}

fn bench_score_table(c: &mut Criterion) {
    let rows: Vec<StandingsRow> = parse_standings_json(&league_json(20)).unwrap();
    c.bench_function("score_table", |b| {
        b.iter(|| {
            let scores = score_table(black_box(&rows));
            black_box(scores.len());
        })
    });
}

fn bench_squad_extract(c: &mut Criterion) {
    let raw = squad_json(30);
    c.bench_function("squad_extract_sort", |b| {
        b.iter(|| {
            let rows = parse_players_json(black_box(&raw)).unwrap();
            black_box(assemble_players(rows, PlayerSort::Rating).len());
        })
    });
}

criterion_group!(benches, bench_standings_extract, bench_score_table, bench_squad_extract);
criterion_main!(benches);
