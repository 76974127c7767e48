use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::time::Instant;

use tipfeed_terminal::feed_fetch::parse_feed_page_json;
use tipfeed_terminal::pagination::{LoadGates, ScrollPager, SentinelSample};
use tipfeed_terminal::pull_refresh::PullGesture;

const FEED_JSON: &str = r#"{
  "status": "success",
  "data": [
    {
      "prediction_id": "prediction-501",
      "title": "Arsenal vs Chelsea: value on the home side",
      "content": "Arsenal are unbeaten at home this season.\n\nChelsea travel poorly.",
      "confidence": 88,
      "predicted_outcome": "2-1",
      "view_count": 3200,
      "posted_at": "2026-08-07T08:30",
      "tags": ["Premier League"],
      "expert": {
        "id": "1",
        "name": "Dr. Michael Chen",
        "nickname": "The Data Wizard",
        "win_rate": 0.72,
        "win_streak": 7,
        "followers": 12340
      },
      "match": {
        "id": "match-501",
        "home_team": "Arsenal",
        "away_team": "Chelsea",
        "league": "Premier League",
        "start_time": "2026-08-08T19:00",
        "odds": 2.05
      }
    },
    {
      "id": "prediction-502",
      "title": "Lakers to cover at home",
      "content": "Back-to-back fatigue angle.",
      "confidence": "75",
      "predictedOutcome": "Lakers win",
      "expert": { "id": "2", "name": "Coach Roberto Silva", "winRate": "74.2%" },
      "fixture": {
        "id": "match-502",
        "homeTeam": "Lakers",
        "awayTeam": "Warriors",
        "league": "NBA",
        "startTime": "2026-08-08T02:00"
      }
    }
  ]
}"#;

fn bench_feed_page_parse(c: &mut Criterion) {
    c.bench_function("feed_page_parse", |b| {
        b.iter(|| {
            let items = parse_feed_page_json(black_box(FEED_JSON)).unwrap();
            black_box(items.len());
        })
    });
}

fn bench_pager_observe(c: &mut Criterion) {
    c.bench_function("pager_observe", |b| {
        b.iter(|| {
            let mut pager = ScrollPager::default();
            pager.attach(1);
            let gates = LoadGates {
                has_more: true,
                is_loading: false,
            };
            let mut fired = 0u32;
            for frame in 0..1_000u32 {
                let sentinel_top = if frame % 2 == 0 { 2_000.0 } else { 400.0 };
                let sample = SentinelSample {
                    sentinel_top,
                    viewport_bottom: 600.0,
                };
                if pager.observe(sample, gates) {
                    fired += 1;
                }
            }
            black_box(fired);
        })
    });
}

fn bench_pull_gesture(c: &mut Criterion) {
    c.bench_function("pull_gesture_drag", |b| {
        b.iter(|| {
            let mut gesture = PullGesture::default();
            gesture.press(0.0, 0.0);
            for y in 0..500u32 {
                black_box(gesture.drag(y as f32));
            }
            black_box(gesture.release(Instant::now()));
            gesture.finish_refresh();
        })
    });
}

criterion_group!(
    benches,
    bench_feed_page_parse,
    bench_pager_observe,
    bench_pull_gesture
);
criterion_main!(benches);
