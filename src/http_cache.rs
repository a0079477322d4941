use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, anyhow};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::extract::{api_errors, parse_payload};

const CACHE_VERSION: u32 = 1;
const CACHE_DIR: &str = "ligue1_terminal";
const CACHE_FILE: &str = "http_cache.json";

static CACHE: Mutex<Option<HttpCacheFile>> = Mutex::new(None);

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct HttpCacheFile {
    version: u32,
    entries: HashMap<String, CacheEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    body: String,
    fetched_at: u64,
}

#[derive(Debug, Clone)]
pub struct CachedBody {
    pub body: String,
    pub from_cache: bool,
}

/// GET `url`, serving the stored body while it is younger than `ttl`.
///
/// The key is the full URL, so each (endpoint, query) pair is cached on its
/// own. Header values (credentials) are never stored.
pub fn fetch_json_cached(
    client: &Client,
    url: &str,
    headers: &[(&str, &str)],
    ttl: Duration,
) -> Result<CachedBody> {
    let now = now_secs();
    let cached = {
        let mut guard = lock_cache();
        let cache = guard.get_or_insert_with(load_cache_file);
        cache.entries.get(url).cloned()
    };
    if let Some(entry) = cached
        && is_fresh(entry.fetched_at, now, ttl)
    {
        return Ok(CachedBody {
            body: entry.body,
            from_cache: true,
        });
    }

    let mut req = client.get(url);
    for (name, value) in headers {
        req = req.header(*name, *value);
    }
    let resp = req.send().context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow!("http {}: {}", status, body));
    }

    if should_store(&body) {
        store_entry(
            url,
            CacheEntry {
                body: body.clone(),
                fetched_at: now,
            },
        );
    }
    Ok(CachedBody {
        body,
        from_cache: false,
    })
}

/// Drop every stored response so the next fetches hit the network.
pub fn clear() -> Result<()> {
    let mut guard = lock_cache();
    let cache = guard.get_or_insert_with(HttpCacheFile::default);
    cache.version = CACHE_VERSION;
    cache.entries.clear();
    save_cache_file(cache)
}

pub fn is_fresh(fetched_at: u64, now: u64, ttl: Duration) -> bool {
    if fetched_at > now {
        // Clock went backwards; refetch.
        return false;
    }
    now - fetched_at < ttl.as_secs()
}

/// Only clean JSON is cached. The API reports quota and key problems with
/// HTTP 200 and a non-empty `errors` field; those must not outlive the TTL.
fn should_store(body: &str) -> bool {
    parse_payload(body).is_ok_and(|payload| api_errors(&payload).is_empty())
}

fn lock_cache() -> MutexGuard<'static, Option<HttpCacheFile>> {
    CACHE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn store_entry(key: &str, entry: CacheEntry) {
    let mut guard = lock_cache();
    let cache = guard.get_or_insert_with(load_cache_file);
    cache.version = CACHE_VERSION;
    cache.entries.insert(key.to_string(), entry);
    let _ = save_cache_file(cache);
}

fn load_cache_file() -> HttpCacheFile {
    let Some(path) = cache_path() else {
        return HttpCacheFile::default();
    };
    let Ok(raw) = fs::read_to_string(path) else {
        return HttpCacheFile::default();
    };
    let cache = serde_json::from_str::<HttpCacheFile>(&raw).unwrap_or_default();
    if cache.version != CACHE_VERSION {
        return HttpCacheFile::default();
    }
    cache
}

fn save_cache_file(cache: &HttpCacheFile) -> Result<()> {
    let Some(path) = cache_path() else {
        return Ok(());
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).ok();
    }
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(cache).context("serialize http cache")?;
    fs::write(&tmp, json).context("write http cache")?;
    fs::rename(&tmp, &path).context("swap http cache")?;
    Ok(())
}

pub fn app_cache_dir() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(CACHE_DIR));
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}

fn cache_path() -> Option<PathBuf> {
    app_cache_dir().map(|dir| dir.join(CACHE_FILE))
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
