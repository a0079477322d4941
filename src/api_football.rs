use anyhow::{Context, Result};
use serde_json::Value;

use crate::config::AppConfig;
use crate::extract::{api_errors, extract_fixtures, extract_players, extract_standings, paging, parse_payload};
use crate::http_cache::fetch_json_cached;
use crate::http_client::api_client;
use crate::state::{FixtureRow, PlayerRow, StandingsRow};
use crate::tables::{PlayerSort, Table, assemble_fixtures, assemble_players, assemble_standings};

/// A table plus whatever the API complained about in its `errors` field.
#[derive(Debug, Clone)]
pub struct Fetched<R> {
    pub table: Table<R>,
    pub api_errors: Vec<String>,
    /// Non-fatal fetch problems, e.g. a later squad page that failed.
    pub warnings: Vec<String>,
    pub from_cache: bool,
}

pub fn standings_url(cfg: &AppConfig) -> String {
    format!(
        "https://{}/v3/standings?league={}&season={}",
        cfg.api_host, cfg.league_id, cfg.season
    )
}

pub fn fixtures_url(cfg: &AppConfig) -> String {
    format!(
        "https://{}/v3/fixtures?league={}&season={}&next={}",
        cfg.api_host, cfg.league_id, cfg.season, cfg.fixtures_next
    )
}

pub fn players_url(cfg: &AppConfig, team_id: u32, page: u32) -> String {
    format!(
        "https://{}/v3/players?league={}&season={}&team={}&page={}",
        cfg.api_host, cfg.league_id, cfg.season, team_id, page
    )
}

pub fn fetch_standings(cfg: &AppConfig) -> Result<Fetched<StandingsRow>> {
    let (payload, from_cache) =
        get_payload(cfg, &standings_url(cfg)).context("standings request failed")?;
    Ok(Fetched {
        table: assemble_standings(extract_standings(&payload)),
        api_errors: api_errors(&payload),
        warnings: Vec::new(),
        from_cache,
    })
}

pub fn fetch_next_fixtures(cfg: &AppConfig) -> Result<Fetched<FixtureRow>> {
    let (payload, from_cache) =
        get_payload(cfg, &fixtures_url(cfg)).context("fixtures request failed")?;
    Ok(Fetched {
        table: assemble_fixtures(extract_fixtures(&payload)),
        api_errors: api_errors(&payload),
        warnings: Vec::new(),
        from_cache,
    })
}

/// Player statistics for one club, following `paging` up to
/// `cfg.squad_max_pages`.
pub fn fetch_squad_stats(
    cfg: &AppConfig,
    team_id: u32,
    sort: PlayerSort,
) -> Result<Fetched<PlayerRow>> {
    collect_squad_pages(cfg.squad_max_pages, sort, |page| {
        get_payload(cfg, &players_url(cfg, team_id, page))
            .with_context(|| format!("squad request failed (team {team_id}, page {page})"))
    })
}

/// Page to request after `page`, or `None` once the API's page count or the
/// configured cap is reached.
pub fn next_squad_page(page: u32, total: u32, max_pages: u32) -> Option<u32> {
    (page < total && page < max_pages).then(|| page + 1)
}

/// Walk squad pages through `fetch_page`.
///
/// A failing first page is an error; a later failure keeps the rows already
/// collected and records a warning.
pub fn collect_squad_pages<F>(
    max_pages: u32,
    sort: PlayerSort,
    mut fetch_page: F,
) -> Result<Fetched<PlayerRow>>
where
    F: FnMut(u32) -> Result<(Value, bool)>,
{
    let mut rows = Vec::new();
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut all_cached = true;

    let mut page = 1u32;
    loop {
        let (payload, from_cache) = match fetch_page(page) {
            Ok(got) => got,
            Err(err) if page > 1 => {
                warnings.push(format!("partial squad, stopped at page {page}: {err:#}"));
                break;
            }
            Err(err) => return Err(err),
        };
        all_cached &= from_cache;
        rows.extend(extract_players(&payload));
        errors.extend(api_errors(&payload));

        match next_squad_page(page, paging(&payload).total, max_pages) {
            Some(next) => page = next,
            None => break,
        }
    }

    Ok(Fetched {
        table: assemble_players(rows, sort),
        api_errors: errors,
        warnings,
        from_cache: all_cached,
    })
}

fn get_payload(cfg: &AppConfig, url: &str) -> Result<(Value, bool)> {
    let client = api_client()?;
    let headers = [
        ("x-rapidapi-host", cfg.api_host.as_str()),
        ("x-rapidapi-key", cfg.api_key.as_str()),
    ];
    let cached = fetch_json_cached(client, url, &headers, cfg.cache_ttl)?;
    Ok((parse_payload(&cached.body)?, cached.from_cache))
}
