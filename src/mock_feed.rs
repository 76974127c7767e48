use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use rand::Rng;

use crate::provider::apply_feed_filters;
use crate::state::{
    BadgeKind, Delta, Expert, ExpertBadge, FixtureMatch, MatchInfo, Prediction, ProviderCommand,
    TeamRef,
};

/// The sample feed runs dry after this many pages so infinite scroll has an
/// end to hit offline.
const PAGE_CAP: u32 = 5;
const PAGE_SIZE: usize = 10;
const NETWORK_DELAY: Duration = Duration::from_millis(350);

const EXPERT_NAMES: &[(&str, &str)] = &[
    ("Dr. Michael Chen", "The Data Wizard"),
    ("Coach Roberto Silva", "The Tactician"),
    ("Elena Petrova", "Streak Hunter"),
    ("Sam Okafor", "Value Finder"),
    ("Luca Moretti", "Derby Specialist"),
    ("Aki Tanaka", "Night Shift"),
    ("Marta Reyes", "The Contrarian"),
    ("Jonas Berg", "Cold Numbers"),
];

const FOOTBALL_TEAMS: &[&str] = &[
    "Arsenal",
    "Chelsea",
    "Liverpool",
    "Man City",
    "Real Madrid",
    "Barcelona",
    "Bayern",
    "Dortmund",
    "Inter",
    "Juventus",
    "PSG",
    "Atletico",
];

const BASKETBALL_TEAMS: &[&str] = &[
    "Lakers", "Warriors", "Celtics", "Heat", "Bucks", "Nuggets",
];

const FOOTBALL_LEAGUES: &[&str] = &["Premier League", "La Liga", "Bundesliga", "Serie A"];
const BASKETBALL_LEAGUES: &[&str] = &["NBA", "CBA"];

/// Offline stand-in for the prediction service: same channel protocol as the
/// real provider, randomized content.
pub fn spawn_mock_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        let mut rng = rand::thread_rng();
        let experts = seed_experts(&mut rng);
        let (today, tomorrow) = seed_fixtures();
        let fixtures: Vec<FixtureMatch> = today.iter().chain(tomorrow.iter()).cloned().collect();

        let _ = tx.send(Delta::Log(
            "[INFO] Mock feed active (set TIPFEED_API_BASE for live data)".to_string(),
        ));

        loop {
            let cmd = match cmd_rx.recv_timeout(Duration::from_millis(250)) {
                Ok(cmd) => cmd,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return,
            };

            match cmd {
                ProviderCommand::LoadFeedPage { page, filter, tab } => {
                    thread::sleep(NETWORK_DELAY);
                    if page > PAGE_CAP {
                        let _ = tx.send(Delta::FeedPage {
                            page,
                            items: Vec::new(),
                            has_more: false,
                        });
                        continue;
                    }
                    let items = sample_predictions(&mut rng, &experts, PAGE_SIZE);
                    let items = apply_feed_filters(items, filter, tab);
                    let _ = tx.send(Delta::FeedPage {
                        page,
                        items,
                        has_more: page < PAGE_CAP,
                    });
                }
                ProviderCommand::RefreshFeed { filter, tab } => {
                    thread::sleep(NETWORK_DELAY);
                    let items = sample_predictions(&mut rng, &experts, PAGE_SIZE);
                    let items = apply_feed_filters(items, filter, tab);
                    let _ = tx.send(Delta::FeedRefreshed {
                        items,
                        has_more: true,
                    });
                }
                ProviderCommand::FetchExperts => {
                    let _ = tx.send(Delta::SetExperts(experts.clone()));
                }
                ProviderCommand::FetchFixtures => {
                    let _ = tx.send(Delta::SetFixtures {
                        today: today.clone(),
                        tomorrow: tomorrow.clone(),
                    });
                }
                ProviderCommand::GeneratePrediction { fixture_id } => {
                    thread::sleep(NETWORK_DELAY);
                    let Some(fixture) = fixtures.iter().find(|f| f.fixture_id == fixture_id) else {
                        let _ = tx.send(Delta::GenerateFailed {
                            fixture_id,
                            message: "unknown fixture".to_string(),
                        });
                        continue;
                    };
                    let prediction = sample_fixture_prediction(&mut rng, &experts, fixture);
                    let _ = tx.send(Delta::PredictionGenerated {
                        fixture_id,
                        prediction,
                    });
                }
            }
        }
    });
}

fn seed_experts(rng: &mut impl Rng) -> Vec<Expert> {
    EXPERT_NAMES
        .iter()
        .enumerate()
        .map(|(idx, (name, nickname))| {
            let win_streak = rng.gen_range(0..15);
            let win_rate = rng.gen_range(60.0..92.0);
            let mut expert = Expert {
                id: format!("expert-{}", idx + 1),
                name: (*name).to_string(),
                nickname: Some((*nickname).to_string()),
                avatar: format!("https://api.dicebear.com/7.x/avataaars/svg?seed={idx}"),
                verified: rng.gen_bool(0.7),
                win_rate,
                win_streak,
                followers: rng.gen_range(1_000..50_000),
                prediction_count: rng.gen_range(50..1_000),
                badges: Vec::new(),
            };
            expert.badges = sample_badges(rng, &expert);
            expert
        })
        .collect()
}

fn sample_badges(rng: &mut impl Rng, expert: &Expert) -> Vec<ExpertBadge> {
    let mut badges = Vec::new();
    if expert.win_streak > 0 {
        badges.push(ExpertBadge {
            kind: BadgeKind::WinStreak,
            label: format!("{}-win streak", expert.win_streak),
        });
    }
    if expert.win_rate > 70.0 {
        let recent = rng.gen_range(10..20);
        let hits = (recent as f32 * expert.win_rate / 100.0) as u32;
        badges.push(ExpertBadge {
            kind: BadgeKind::HitRate,
            label: format!("{hits}/{recent} recent"),
        });
    }
    if rng.gen_bool(0.5) {
        let rate = rng.gen_range(200..700);
        badges.push(ExpertBadge {
            kind: BadgeKind::ReturnRate,
            label: format!("{rate}% return over 10"),
        });
    }
    badges
}

fn sample_predictions(rng: &mut impl Rng, experts: &[Expert], count: usize) -> Vec<Prediction> {
    (0..count)
        .map(|_| sample_prediction(rng, experts))
        .collect()
}

fn sample_prediction(rng: &mut impl Rng, experts: &[Expert]) -> Prediction {
    let football = rng.gen_bool(0.7);
    let (teams, leagues): (&[&str], &[&str]) = if football {
        (FOOTBALL_TEAMS, FOOTBALL_LEAGUES)
    } else {
        (BASKETBALL_TEAMS, BASKETBALL_LEAGUES)
    };
    let home = teams[rng.gen_range(0..teams.len())];
    let mut away = teams[rng.gen_range(0..teams.len())];
    while away == home {
        away = teams[rng.gen_range(0..teams.len())];
    }
    let league = leagues[rng.gen_range(0..leagues.len())];
    let expert = experts[rng.gen_range(0..experts.len())].clone();
    let confidence = rng.gen_range(70..100);
    let kickoff = Utc::now() + ChronoDuration::hours(rng.gen_range(2..96));
    let posted = Utc::now() - ChronoDuration::minutes(rng.gen_range(5..1_200));
    let id: u32 = rng.gen_range(10_000..100_000);

    let outcome = if football {
        format!("{}-{}", rng.gen_range(0..4u8), rng.gen_range(0..3u8))
    } else {
        format!("{} win", home)
    };

    Prediction {
        id: format!("prediction-{id}"),
        title: format!("{home} vs {away}: value on the {league} board"),
        content: format!(
            "{home} come into this one off a strong run and the market has \
             not caught up.\n\nThe matchup against {away} favours the hosts in \
             midfield, and {confidence}% of comparable fixtures landed this \
             side of the line."
        ),
        confidence,
        predicted_outcome: outcome,
        view_count: rng.gen_range(100..20_000),
        posted_at: posted.format("%Y-%m-%dT%H:%M").to_string(),
        tags: vec![league.to_string()],
        expert,
        fixture: MatchInfo {
            id: format!("match-{id}"),
            home: home.to_string(),
            away: away.to_string(),
            league: league.to_string(),
            kickoff: kickoff.format("%Y-%m-%dT%H:%M").to_string(),
            odds: Some(rng.gen_range(1.5..4.5)),
        },
    }
}

fn sample_fixture_prediction(
    rng: &mut impl Rng,
    experts: &[Expert],
    fixture: &FixtureMatch,
) -> Prediction {
    let mut prediction = sample_prediction(rng, experts);
    prediction.fixture = MatchInfo {
        id: fixture.fixture_id.to_string(),
        home: fixture.home.name.clone(),
        away: fixture.away.name.clone(),
        league: fixture.league.clone(),
        kickoff: fixture.kickoff.clone(),
        odds: prediction.fixture.odds,
    };
    prediction.title = format!(
        "{} vs {}: generated pick",
        fixture.home.name, fixture.away.name
    );
    prediction.predicted_outcome = format!("{}-{}", rng.gen_range(0..4u8), rng.gen_range(0..3u8));
    prediction
}

fn seed_fixtures() -> (Vec<FixtureMatch>, Vec<FixtureMatch>) {
    let today = Utc::now();
    let tomorrow = today + ChronoDuration::days(1);
    let make = |fixture_id: u64,
                day: chrono::DateTime<Utc>,
                hour: i64,
                home: (u32, &str),
                away: (u32, &str),
                venue: &str,
                league: &str,
                country: &str| FixtureMatch {
        fixture_id,
        kickoff: (day + ChronoDuration::hours(hour))
            .format("%Y-%m-%dT%H:%M")
            .to_string(),
        venue: venue.to_string(),
        home: TeamRef {
            id: home.0,
            name: home.1.to_string(),
        },
        away: TeamRef {
            id: away.0,
            name: away.1.to_string(),
        },
        league: league.to_string(),
        country: country.to_string(),
        prediction: None,
    };

    let today_list = vec![
        make(
            1001,
            today,
            2,
            (2750, "FC Seoul"),
            (2749, "Ulsan Hyundai"),
            "Seoul World Cup Stadium",
            "K League 1",
            "South Korea",
        ),
        make(
            1002,
            today,
            4,
            (302, "Urawa Reds"),
            (303, "Yokohama Marinos"),
            "Saitama Stadium 2002",
            "J1 League",
            "Japan",
        ),
    ];
    let tomorrow_list = vec![
        make(
            1003,
            tomorrow,
            1,
            (2751, "Jeonbuk Motors"),
            (2748, "Pohang Steelers"),
            "Jeonju World Cup Stadium",
            "K League 1",
            "South Korea",
        ),
        make(
            1004,
            tomorrow,
            3,
            (279, "Kawasaki Frontale"),
            (285, "Kashima Antlers"),
            "Nissan Stadium",
            "J1 League",
            "Japan",
        ),
    ];
    (today_list, tomorrow_list)
}
