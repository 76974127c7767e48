use anyhow::{Context, Result};
use serde_json::Value;

use crate::http_cache::get_json_cached;
use crate::http_client::http_client;
use crate::state::{
    BadgeKind, Expert, ExpertBadge, FixtureMatch, FixturePrediction, MatchInfo, Prediction,
    TeamRef,
};

/// Base URL of the prediction service, e.g.
/// `https://host/api/v1/real-matches`. Unset means the mock provider runs.
pub fn api_base_from_env() -> Option<String> {
    let base = std::env::var("TIPFEED_API_BASE").ok()?;
    let trimmed = base.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn fetch_feed_page(base: &str, page: u32, size: u32) -> Result<Vec<Prediction>> {
    let client = http_client()?;
    let url = format!("{base}/predictions?page={page}&size={size}");
    let body = get_json_cached(client, &url).context("predictions request failed")?;
    parse_feed_page_json(&body)
}

pub fn fetch_experts(base: &str) -> Result<Vec<Expert>> {
    let client = http_client()?;
    let url = format!("{base}/experts");
    let body = get_json_cached(client, &url).context("experts request failed")?;
    parse_experts_json(&body)
}

pub fn fetch_today_tomorrow(base: &str) -> Result<(Vec<FixtureMatch>, Vec<FixtureMatch>)> {
    let client = http_client()?;
    let url = format!("{base}/today-tomorrow");
    let body = get_json_cached(client, &url).context("fixtures request failed")?;
    parse_today_tomorrow_json(&body)
}

/// POST, never cached: the service writes a new prediction for the fixture.
pub fn generate_prediction(base: &str, fixture_id: u64) -> Result<Prediction> {
    let client = http_client()?;
    let url = format!("{base}/generate-prediction/{fixture_id}");
    let resp = client
        .post(&url)
        .send()
        .context("generate-prediction request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        anyhow::bail!("http {status}: {body}");
    }
    parse_prediction_json(&body)
}

pub fn parse_feed_page_json(raw: &str) -> Result<Vec<Prediction>> {
    let data = envelope_data(raw)?;
    let Some(list) = data.as_array() else {
        return Ok(Vec::new());
    };
    Ok(list.iter().filter_map(parse_prediction).collect())
}

pub fn parse_experts_json(raw: &str) -> Result<Vec<Expert>> {
    let data = envelope_data(raw)?;
    let Some(list) = data.as_array() else {
        return Ok(Vec::new());
    };
    Ok(list.iter().filter_map(parse_expert).collect())
}

pub fn parse_today_tomorrow_json(raw: &str) -> Result<(Vec<FixtureMatch>, Vec<FixtureMatch>)> {
    let data = envelope_data(raw)?;
    let today = parse_fixture_list(data.get("today"));
    let tomorrow = parse_fixture_list(data.get("tomorrow"));
    Ok((today, tomorrow))
}

pub fn parse_prediction_json(raw: &str) -> Result<Prediction> {
    let data = envelope_data(raw)?;
    parse_prediction(&data).context("prediction payload missing required fields")
}

/// Unwrap the `{status, data}` envelope every endpoint speaks. A non-success
/// status is an error even on HTTP 200.
fn envelope_data(raw: &str) -> Result<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        anyhow::bail!("empty response body");
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid response json")?;
    let status = root.get("status").and_then(|v| v.as_str()).unwrap_or("");
    if status != "success" {
        let detail = pick_string(&root, &["message", "detail", "error"])
            .unwrap_or_else(|| format!("status {status:?}"));
        anyhow::bail!("service error: {detail}");
    }
    Ok(root.get("data").cloned().unwrap_or(Value::Null))
}

fn parse_expert(value: &Value) -> Option<Expert> {
    let name = pick_string(value, &["name", "expert_name", "nickname"])?;
    let id = pick_string(value, &["id", "expert_id"]).unwrap_or_else(|| name.clone());
    // The service is inconsistent about casing here; accept both.
    let win_rate = pick_f64(value, &["win_rate", "winRate", "success_rate", "successRate"])
        .map(normalize_rate)
        .unwrap_or(0.0);
    Some(Expert {
        id,
        name,
        nickname: pick_string(value, &["nickname", "alias"]),
        avatar: pick_string(value, &["avatar_url", "avatar", "avatarUrl"]).unwrap_or_default(),
        verified: pick_bool(value, &["verified", "is_verified", "isVerified"]).unwrap_or(false),
        win_rate,
        win_streak: pick_u64(value, &["win_streak", "winStreak"]).unwrap_or(0) as u32,
        followers: pick_u64(value, &["followers", "follower_count", "followerCount"]).unwrap_or(0),
        prediction_count: pick_u64(value, &["prediction_count", "predictionCount"]).unwrap_or(0)
            as u32,
        badges: parse_badges(value.get("badges")),
    })
}

fn parse_badges(value: Option<&Value>) -> Vec<ExpertBadge> {
    let Some(list) = value.and_then(|v| v.as_array()) else {
        return Vec::new();
    };
    let mut badges = Vec::new();
    for entry in list {
        let Some(kind) = badge_kind(pick_string(entry, &["type", "kind"]).as_deref()) else {
            continue;
        };
        let label = pick_string(entry, &["label", "value"]).unwrap_or_default();
        badges.push(ExpertBadge { kind, label });
    }
    badges
}

fn badge_kind(raw: Option<&str>) -> Option<BadgeKind> {
    let lowered = raw?.to_lowercase();
    if lowered.contains("streak") {
        Some(BadgeKind::WinStreak)
    } else if lowered.contains("hit") {
        Some(BadgeKind::HitRate)
    } else if lowered.contains("return") {
        Some(BadgeKind::ReturnRate)
    } else {
        None
    }
}

fn parse_prediction(value: &Value) -> Option<Prediction> {
    let id = pick_string(value, &["prediction_id", "id"])?;
    let expert = value
        .get("expert")
        .and_then(parse_expert)
        .unwrap_or_else(|| Expert {
            id: String::new(),
            name: "Unknown expert".to_string(),
            nickname: None,
            avatar: String::new(),
            verified: false,
            win_rate: 0.0,
            win_streak: 0,
            followers: 0,
            prediction_count: 0,
            badges: Vec::new(),
        });
    let fixture = value
        .get("match")
        .or_else(|| value.get("fixture"))
        .map(parse_match_info)
        .unwrap_or_else(|| MatchInfo {
            id: String::new(),
            home: String::new(),
            away: String::new(),
            league: String::new(),
            kickoff: String::new(),
            odds: None,
        });
    Some(Prediction {
        id,
        expert,
        fixture,
        title: pick_string(value, &["title"]).unwrap_or_default(),
        content: pick_string(value, &["content", "analysis", "body"]).unwrap_or_default(),
        confidence: pick_f64(value, &["confidence"])
            .map(normalize_rate)
            .unwrap_or(0.0)
            .round() as u8,
        predicted_outcome: pick_string(
            value,
            &["predicted_outcome", "predictedOutcome", "predicted_score"],
        )
        .unwrap_or_default(),
        view_count: pick_u64(value, &["view_count", "viewCount", "views"]).unwrap_or(0),
        posted_at: pick_string(value, &["posted_at", "postedAt", "created_at"])
            .unwrap_or_default(),
        tags: value
            .get("tags")
            .and_then(|v| v.as_array())
            .map(|list| list.iter().filter_map(as_string).collect())
            .unwrap_or_default(),
    })
}

fn parse_match_info(value: &Value) -> MatchInfo {
    MatchInfo {
        id: pick_string(value, &["id", "match_id", "fixture_id"]).unwrap_or_default(),
        home: pick_string(value, &["home_team", "homeTeam", "home"]).unwrap_or_default(),
        away: pick_string(value, &["away_team", "awayTeam", "away"]).unwrap_or_default(),
        league: pick_string(value, &["league", "league_name"]).unwrap_or_default(),
        kickoff: pick_string(value, &["start_time", "startTime", "kickoff", "date"])
            .unwrap_or_default(),
        odds: pick_f64(value, &["odds"]).map(|v| v as f32),
    }
}

fn parse_fixture_list(value: Option<&Value>) -> Vec<FixtureMatch> {
    let Some(list) = value.and_then(|v| v.as_array()) else {
        return Vec::new();
    };
    list.iter().filter_map(parse_fixture).collect()
}

fn parse_fixture(value: &Value) -> Option<FixtureMatch> {
    let fixture_id = pick_u64(value, &["fixture_id", "fixtureId", "id"])?;
    let home = parse_team(value.get("home_team").or_else(|| value.get("home")))?;
    let away = parse_team(value.get("away_team").or_else(|| value.get("away")))?;
    let league = value.get("league");
    Some(FixtureMatch {
        fixture_id,
        kickoff: pick_string(value, &["date", "kickoff", "start_time"]).unwrap_or_default(),
        venue: pick_string(value, &["venue"]).unwrap_or_default(),
        home,
        away,
        league: league
            .and_then(|v| pick_string(v, &["name"]).or_else(|| as_string(v)))
            .unwrap_or_default(),
        country: league
            .and_then(|v| pick_string(v, &["country"]))
            .unwrap_or_default(),
        prediction: value.get("prediction").and_then(parse_fixture_prediction),
    })
}

fn parse_team(value: Option<&Value>) -> Option<TeamRef> {
    let value = value?;
    let name = pick_string(value, &["name"]).or_else(|| as_string(value))?;
    Some(TeamRef {
        id: pick_u64(value, &["id", "team_id"]).unwrap_or(0) as u32,
        name,
    })
}

fn parse_fixture_prediction(value: &Value) -> Option<FixturePrediction> {
    let id = pick_string(value, &["id", "prediction_id"])?;
    Some(FixturePrediction {
        id,
        confidence: pick_f64(value, &["confidence"])
            .map(normalize_rate)
            .unwrap_or(0.0)
            .round() as u8,
        predicted_score: pick_string(value, &["predicted_score", "predictedScore", "score"])
            .unwrap_or_default(),
    })
}

/// Rates arrive either as fractions (0.785) or percentages (78.5).
fn normalize_rate(raw: f64) -> f32 {
    let pct = if raw <= 1.0 { raw * 100.0 } else { raw };
    pct.clamp(0.0, 100.0) as f32
}

fn pick_string(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(v) = value.get(*key) {
            if let Some(s) = as_string(v) {
                return Some(s);
            }
        }
    }
    None
}

fn pick_f64(value: &Value, keys: &[&str]) -> Option<f64> {
    for key in keys {
        if let Some(v) = value.get(*key) {
            if let Some(num) = v.as_f64() {
                return Some(num);
            }
            if let Some(s) = v.as_str() {
                if let Ok(num) = s.trim().trim_end_matches('%').parse::<f64>() {
                    return Some(num);
                }
            }
        }
    }
    None
}

fn pick_u64(value: &Value, keys: &[&str]) -> Option<u64> {
    for key in keys {
        if let Some(v) = value.get(*key) {
            if let Some(num) = v.as_u64() {
                return Some(num);
            }
            if let Some(s) = v.as_str() {
                if let Ok(num) = s.trim().parse::<u64>() {
                    return Some(num);
                }
            }
        }
    }
    None
}

fn pick_bool(value: &Value, keys: &[&str]) -> Option<bool> {
    for key in keys {
        if let Some(v) = value.get(*key) {
            if let Some(b) = v.as_bool() {
                return Some(b);
            }
        }
    }
    None
}

fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
