use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

const CACHE_VERSION: u32 = 1;
const CACHE_DIR: &str = "tipfeed_terminal";
const CACHE_FILE: &str = "http_cache.json";

/// Entries younger than this are served without touching the network, which
/// keeps feed polling from hammering the prediction service.
const FRESH_SECS: u64 = 30;

static CACHE: Mutex<Option<CacheFile>> = Mutex::new(None);

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct CacheFile {
    version: u32,
    entries: HashMap<String, CacheEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    body: String,
    etag: Option<String>,
    last_modified: Option<String>,
    fetched_at: u64,
}

impl CacheEntry {
    fn is_fresh(&self, now_secs: u64) -> bool {
        now_secs.saturating_sub(self.fetched_at) < FRESH_SECS
    }
}

/// GET `url` through the conditional-request cache: fresh entries short-cut
/// the network entirely, stale ones revalidate with ETag/Last-Modified.
pub fn get_json_cached(client: &Client, url: &str) -> Result<String> {
    let now_secs = unix_secs();
    let cached = {
        let mut guard = CACHE.lock().expect("http cache lock poisoned");
        let cache = guard.get_or_insert_with(load_cache_file);
        cache.entries.get(url).cloned()
    };

    if let Some(entry) = cached.as_ref() {
        if entry.is_fresh(now_secs) {
            return Ok(entry.body.clone());
        }
    }

    let mut req = client.get(url);
    if let Some(entry) = cached.as_ref() {
        if let Some(etag) = entry.etag.as_ref() {
            req = req.header(IF_NONE_MATCH, etag);
        }
        if let Some(last_modified) = entry.last_modified.as_ref() {
            req = req.header(IF_MODIFIED_SINCE, last_modified);
        }
    }

    let resp = req.send().context("request failed")?;
    let status = resp.status();
    if status == StatusCode::NOT_MODIFIED {
        let Some(mut entry) = cached else {
            anyhow::bail!("received 304 without cache body");
        };
        entry.fetched_at = now_secs;
        let body = entry.body.clone();
        store_entry(url, entry);
        return Ok(body);
    }

    let etag = header_string(resp.headers().get(ETAG));
    let last_modified = header_string(resp.headers().get(LAST_MODIFIED));
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        anyhow::bail!("http {status}: {body}");
    }

    store_entry(
        url,
        CacheEntry {
            body: body.clone(),
            etag,
            last_modified,
            fetched_at: now_secs,
        },
    );
    Ok(body)
}

fn header_string(value: Option<&reqwest::header::HeaderValue>) -> Option<String> {
    value.and_then(|v| v.to_str().ok()).map(|v| v.to_string())
}

fn store_entry(url: &str, entry: CacheEntry) {
    let mut guard = CACHE.lock().expect("http cache lock poisoned");
    let cache = guard.get_or_insert_with(load_cache_file);
    cache.version = CACHE_VERSION;
    cache.entries.insert(url.to_string(), entry);
    let _ = persist(cache);
}

fn load_cache_file() -> CacheFile {
    let Some(path) = cache_path() else {
        return CacheFile::default();
    };
    let Ok(raw) = fs::read_to_string(path) else {
        return CacheFile::default();
    };
    let cache = serde_json::from_str::<CacheFile>(&raw).unwrap_or_default();
    if cache.version != CACHE_VERSION {
        return CacheFile::default();
    }
    cache
}

fn persist(cache: &CacheFile) -> Result<()> {
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

fn cache_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR).join(CACHE_FILE));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".cache")
            .join(CACHE_DIR)
            .join(CACHE_FILE),
    )
}

fn unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
