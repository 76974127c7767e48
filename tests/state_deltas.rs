use tipfeed_terminal::provider::apply_feed_filters;
use tipfeed_terminal::state::{
    apply_delta, AppState, BadgeKind, Delta, Expert, ExpertBadge, FeedFilter, FeedTab,
    FixtureMatch, MatchInfo, Prediction, TeamRef,
};

fn expert(win_streak: u32, return_badge: bool) -> Expert {
    let mut badges = Vec::new();
    if return_badge {
        badges.push(ExpertBadge {
            kind: BadgeKind::ReturnRate,
            label: "430% return over 10".to_string(),
        });
    }
    Expert {
        id: "expert-1".to_string(),
        name: "Dr. Michael Chen".to_string(),
        nickname: None,
        avatar: String::new(),
        verified: true,
        win_rate: 78.5,
        win_streak,
        followers: 12_340,
        prediction_count: 412,
        badges,
    }
}

fn prediction(id: &str, league: &str, win_streak: u32, return_badge: bool) -> Prediction {
    Prediction {
        id: id.to_string(),
        expert: expert(win_streak, return_badge),
        fixture: MatchInfo {
            id: format!("match-{id}"),
            home: "Arsenal".to_string(),
            away: "Chelsea".to_string(),
            league: league.to_string(),
            kickoff: "2026-08-08T19:00".to_string(),
            odds: Some(2.1),
        },
        title: format!("pick {id}"),
        content: "Solid angle.\n\nSecond angle.".to_string(),
        confidence: 85,
        predicted_outcome: "2-1".to_string(),
        view_count: 100,
        posted_at: "2026-08-07T10:00".to_string(),
        tags: Vec::new(),
    }
}

fn fixture(fixture_id: u64) -> FixtureMatch {
    FixtureMatch {
        fixture_id,
        kickoff: "2026-08-07T19:00".to_string(),
        venue: "Emirates".to_string(),
        home: TeamRef {
            id: 1,
            name: "Arsenal".to_string(),
        },
        away: TeamRef {
            id: 2,
            name: "Chelsea".to_string(),
        },
        league: "Premier League".to_string(),
        country: "England".to_string(),
        prediction: None,
    }
}

#[test]
fn feed_pages_append_in_order_and_clear_loading() {
    let mut state = AppState::new();
    state.feed_loading = true;

    apply_delta(
        &mut state,
        Delta::FeedPage {
            page: 1,
            items: vec![prediction("a", "Premier League", 3, false)],
            has_more: true,
        },
    );
    assert_eq!(state.feed_page, 1);
    assert!(!state.feed_loading);
    assert!(state.feed_has_more);

    state.feed_loading = true;
    apply_delta(
        &mut state,
        Delta::FeedPage {
            page: 2,
            items: vec![
                prediction("b", "La Liga", 6, false),
                prediction("c", "NBA", 1, true),
            ],
            has_more: false,
        },
    );

    let ids: Vec<&str> = state.feed.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(state.feed_page, 2);
    assert!(!state.feed_has_more);
    assert!(!state.feed_loading);
}

#[test]
fn out_of_order_page_is_dropped() {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::FeedPage {
            page: 1,
            items: vec![prediction("a", "Premier League", 3, false)],
            has_more: true,
        },
    );

    state.feed_loading = true;
    apply_delta(
        &mut state,
        Delta::FeedPage {
            page: 3,
            items: vec![prediction("x", "Premier League", 3, false)],
            has_more: true,
        },
    );

    assert_eq!(state.feed.len(), 1);
    assert_eq!(state.feed_page, 1);
    assert!(!state.feed_loading);
}

#[test]
fn refresh_replaces_the_feed_wholesale() {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::FeedPage {
            page: 1,
            items: vec![
                prediction("a", "Premier League", 3, false),
                prediction("b", "La Liga", 6, false),
            ],
            has_more: true,
        },
    );
    state.feed_selected = 1;
    state.feed_loading = true;

    apply_delta(
        &mut state,
        Delta::FeedRefreshed {
            items: vec![prediction("z", "Serie A", 9, true)],
            has_more: true,
        },
    );

    let ids: Vec<&str> = state.feed.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["z"]);
    assert_eq!(state.feed_page, 1);
    assert_eq!(state.feed_selected, 0);
    assert!(!state.feed_loading);
    assert!(state.feed_error.is_none());
}

#[test]
fn feed_error_clears_loading_and_is_recorded() {
    let mut state = AppState::new();
    state.feed_loading = true;

    apply_delta(&mut state, Delta::FeedError("http 502".to_string()));

    assert!(!state.feed_loading);
    assert_eq!(state.feed_error.as_deref(), Some("http 502"));
    assert!(state.logs.iter().any(|line| line.contains("http 502")));
}

#[test]
fn generated_prediction_attaches_to_its_fixture() {
    let mut state = AppState::new();
    state.fixtures_today = vec![fixture(1001)];
    state.generating.insert(1001);

    apply_delta(
        &mut state,
        Delta::PredictionGenerated {
            fixture_id: 1001,
            prediction: prediction("gen", "Premier League", 3, false),
        },
    );

    assert!(state.generating.is_empty());
    let attached = state.fixtures_today[0].prediction.as_ref().unwrap();
    assert_eq!(attached.predicted_score, "2-1");
    assert_eq!(attached.confidence, 85);

    let detail = state.betting.get(&1001).unwrap();
    assert_eq!(detail.recommendation.pick, "2-1");
    assert_eq!(detail.analysis.len(), 2);
    assert_eq!(detail.analysis[0].title, "Overview");
    assert!(detail.expert.is_some());
}

#[test]
fn failed_generation_clears_the_pending_marker() {
    let mut state = AppState::new();
    state.generating.insert(1002);

    apply_delta(
        &mut state,
        Delta::GenerateFailed {
            fixture_id: 1002,
            message: "timeout".to_string(),
        },
    );

    assert!(state.generating.is_empty());
    assert!(state.logs.iter().any(|line| line.contains("timeout")));
}

#[test]
fn cycling_filter_resets_pagination() {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::FeedPage {
            page: 1,
            items: vec![prediction("a", "Premier League", 3, false)],
            has_more: false,
        },
    );

    state.cycle_filter();

    assert!(state.feed.is_empty());
    assert_eq!(state.feed_page, 0);
    assert!(state.feed_has_more);
    assert_eq!(state.filter, FeedFilter::WinningStreak);
}

#[test]
fn filters_narrow_by_streak_badge_and_league() {
    let items = vec![
        prediction("streaky", "Premier League", 8, false),
        prediction("cold", "Premier League", 1, false),
        prediction("returns", "NBA", 2, true),
    ];

    let streak = apply_feed_filters(items.clone(), FeedFilter::WinningStreak, FeedTab::Following);
    assert_eq!(streak.len(), 1);
    assert_eq!(streak[0].id, "streaky");

    let returns = apply_feed_filters(items.clone(), FeedFilter::Returns, FeedTab::Following);
    assert_eq!(returns.len(), 1);
    assert_eq!(returns[0].id, "returns");

    let basketball = apply_feed_filters(items.clone(), FeedFilter::Hot, FeedTab::Basketball);
    assert_eq!(basketball.len(), 1);
    assert_eq!(basketball[0].fixture.league, "NBA");

    let football = apply_feed_filters(items, FeedFilter::Hot, FeedTab::Football);
    assert_eq!(football.len(), 2);
}

#[test]
fn selection_wraps_and_clamps() {
    let mut state = AppState::new();
    state.feed = vec![
        prediction("a", "Premier League", 3, false),
        prediction("b", "La Liga", 6, false),
    ];

    state.select_feed_prev();
    assert_eq!(state.feed_selected, 1);
    state.select_feed_next();
    assert_eq!(state.feed_selected, 0);

    state.feed_selected = 5;
    state.clamp_feed_selection();
    assert_eq!(state.feed_selected, 1);
}
