use std::collections::{HashMap, HashSet, VecDeque};
use std::env;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Feed,
    Fixtures,
    Detail { fixture_id: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFilter {
    Hot,
    WinningStreak,
    Returns,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedTab {
    Following,
    Football,
    Basketball,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailTab {
    Recommendation,
    Stats,
    Analysis,
}

const BASKETBALL_LEAGUES: &[&str] = &["nba", "cba", "euroleague"];

impl FeedFilter {
    /// Whether a prediction survives this filter, mirroring the feed's
    /// client-side filtering.
    pub fn keeps(&self, prediction: &Prediction) -> bool {
        match self {
            FeedFilter::Hot => true,
            FeedFilter::WinningStreak => prediction.expert.win_streak >= 5,
            FeedFilter::Returns => prediction
                .expert
                .badges
                .iter()
                .any(|b| b.kind == BadgeKind::ReturnRate),
        }
    }
}

impl FeedTab {
    pub fn keeps(&self, prediction: &Prediction) -> bool {
        let league = prediction.fixture.league.to_lowercase();
        let basketball = BASKETBALL_LEAGUES.iter().any(|l| league.contains(l));
        match self {
            // Following has no server-side notion here; it shows everything.
            FeedTab::Following => true,
            FeedTab::Football => !basketball,
            FeedTab::Basketball => basketball,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BadgeKind {
    WinStreak,
    HitRate,
    ReturnRate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpertBadge {
    pub kind: BadgeKind,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expert {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub verified: bool,
    pub win_rate: f32,
    #[serde(default)]
    pub win_streak: u32,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub prediction_count: u32,
    #[serde(default)]
    pub badges: Vec<ExpertBadge>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchInfo {
    pub id: String,
    pub home: String,
    pub away: String,
    pub league: String,
    pub kickoff: String,
    #[serde(default)]
    pub odds: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub expert: Expert,
    pub fixture: MatchInfo,
    pub title: String,
    pub content: String,
    pub confidence: u8,
    #[serde(default)]
    pub predicted_outcome: String,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub posted_at: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixturePrediction {
    pub id: String,
    pub confidence: u8,
    pub predicted_score: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureMatch {
    pub fixture_id: u64,
    pub kickoff: String,
    #[serde(default)]
    pub venue: String,
    pub home: TeamRef,
    pub away: TeamRef,
    pub league: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub prediction: Option<FixturePrediction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatRow {
    pub name: String,
    pub home: String,
    pub away: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSection {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BettingRecommendation {
    pub pick: String,
    pub confidence: u8,
    #[serde(default)]
    pub odds: Option<f32>,
    #[serde(default)]
    pub reasoning: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BettingDetail {
    pub fixture_id: u64,
    pub title: String,
    pub recommendation: BettingRecommendation,
    #[serde(default)]
    pub stats: Vec<StatRow>,
    #[serde(default)]
    pub analysis: Vec<AnalysisSection>,
    #[serde(default)]
    pub expert: Option<Expert>,
}

impl BettingDetail {
    /// Assemble the betting-detail view for a fixture from a generated
    /// prediction. The analysis body is split on blank lines so the detail
    /// tabs have sections to page through.
    pub fn from_prediction(fixture: &FixtureMatch, prediction: &Prediction) -> Self {
        let mut analysis = Vec::new();
        for (idx, chunk) in prediction
            .content
            .split("\n\n")
            .filter(|chunk| !chunk.trim().is_empty())
            .enumerate()
        {
            let title = if idx == 0 {
                "Overview".to_string()
            } else {
                format!("Angle {idx}")
            };
            analysis.push(AnalysisSection {
                title,
                body: chunk.trim().to_string(),
            });
        }

        Self {
            fixture_id: fixture.fixture_id,
            title: if prediction.title.is_empty() {
                format!("{} vs {}", fixture.home.name, fixture.away.name)
            } else {
                prediction.title.clone()
            },
            recommendation: BettingRecommendation {
                pick: if prediction.predicted_outcome.is_empty() {
                    "No pick".to_string()
                } else {
                    prediction.predicted_outcome.clone()
                },
                confidence: prediction.confidence,
                odds: prediction.fixture.odds,
                reasoning: prediction
                    .content
                    .lines()
                    .find(|line| !line.trim().is_empty())
                    .unwrap_or_default()
                    .to_string(),
            },
            stats: Vec::new(),
            analysis,
            expert: Some(prediction.expert.clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub filter: FeedFilter,
    pub tab: FeedTab,
    pub feed: Vec<Prediction>,
    pub feed_page: u32,
    pub feed_has_more: bool,
    pub feed_loading: bool,
    pub feed_error: Option<String>,
    pub feed_selected: usize,
    pub page_size: u32,
    pub experts: Vec<Expert>,
    pub experts_selected: usize,
    pub fixtures_today: Vec<FixtureMatch>,
    pub fixtures_tomorrow: Vec<FixtureMatch>,
    pub fixtures_selected: usize,
    pub betting: HashMap<u64, BettingDetail>,
    pub generating: HashSet<u64>,
    pub detail_tab: DetailTab,
    pub detail_scroll: u16,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        let page_size = env::var("FEED_PAGE_SIZE")
            .ok()
            .and_then(|val| val.parse::<u32>().ok())
            .unwrap_or(10)
            .clamp(1, 50);
        Self {
            screen: Screen::Feed,
            filter: FeedFilter::Hot,
            tab: FeedTab::Football,
            feed: Vec::with_capacity(32),
            feed_page: 0,
            feed_has_more: true,
            feed_loading: false,
            feed_error: None,
            feed_selected: 0,
            page_size,
            experts: Vec::new(),
            experts_selected: 0,
            fixtures_today: Vec::new(),
            fixtures_tomorrow: Vec::new(),
            fixtures_selected: 0,
            betting: HashMap::with_capacity(8),
            generating: HashSet::new(),
            detail_tab: DetailTab::Recommendation,
            detail_scroll: 0,
            logs: VecDeque::with_capacity(200),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    /// Drop the current feed ahead of a reload. Loading stays false; the
    /// caller flips it when it actually issues the request.
    pub fn reset_feed(&mut self) {
        self.feed.clear();
        self.feed_page = 0;
        self.feed_has_more = true;
        self.feed_loading = false;
        self.feed_error = None;
        self.feed_selected = 0;
        self.detail_scroll = 0;
    }

    pub fn cycle_filter(&mut self) {
        self.filter = match self.filter {
            FeedFilter::Hot => FeedFilter::WinningStreak,
            FeedFilter::WinningStreak => FeedFilter::Returns,
            FeedFilter::Returns => FeedFilter::Hot,
        };
        self.reset_feed();
        self.push_log(format!("[INFO] Filter: {}", filter_label(self.filter)));
    }

    pub fn cycle_tab(&mut self) {
        self.tab = match self.tab {
            FeedTab::Following => FeedTab::Football,
            FeedTab::Football => FeedTab::Basketball,
            FeedTab::Basketball => FeedTab::Following,
        };
        self.reset_feed();
        self.push_log(format!("[INFO] Tab: {}", tab_label(self.tab)));
    }

    pub fn cycle_detail_tab(&mut self) {
        self.detail_tab = match self.detail_tab {
            DetailTab::Recommendation => DetailTab::Stats,
            DetailTab::Stats => DetailTab::Analysis,
            DetailTab::Analysis => DetailTab::Recommendation,
        };
        self.detail_scroll = 0;
    }

    pub fn select_feed_next(&mut self) {
        let total = self.feed.len();
        if total == 0 {
            self.feed_selected = 0;
            return;
        }
        self.feed_selected = (self.feed_selected + 1) % total;
    }

    pub fn select_feed_prev(&mut self) {
        let total = self.feed.len();
        if total == 0 {
            self.feed_selected = 0;
            return;
        }
        if self.feed_selected == 0 {
            self.feed_selected = total - 1;
        } else {
            self.feed_selected -= 1;
        }
    }

    pub fn clamp_feed_selection(&mut self) {
        let total = self.feed.len();
        if total == 0 {
            self.feed_selected = 0;
        } else if self.feed_selected >= total {
            self.feed_selected = total - 1;
        }
    }

    pub fn select_expert_next(&mut self) {
        let total = self.experts.len();
        if total == 0 {
            self.experts_selected = 0;
            return;
        }
        self.experts_selected = (self.experts_selected + 1) % total;
    }

    pub fn select_expert_prev(&mut self) {
        let total = self.experts.len();
        if total == 0 {
            self.experts_selected = 0;
            return;
        }
        if self.experts_selected == 0 {
            self.experts_selected = total - 1;
        } else {
            self.experts_selected -= 1;
        }
    }

    /// Today's fixtures followed by tomorrow's, the order the fixtures screen
    /// lists them in.
    pub fn fixture_rows(&self) -> Vec<&FixtureMatch> {
        self.fixtures_today
            .iter()
            .chain(self.fixtures_tomorrow.iter())
            .collect()
    }

    pub fn select_fixture_next(&mut self) {
        let total = self.fixture_rows().len();
        if total == 0 {
            self.fixtures_selected = 0;
            return;
        }
        self.fixtures_selected = (self.fixtures_selected + 1) % total;
    }

    pub fn select_fixture_prev(&mut self) {
        let total = self.fixture_rows().len();
        if total == 0 {
            self.fixtures_selected = 0;
            return;
        }
        if self.fixtures_selected == 0 {
            self.fixtures_selected = total - 1;
        } else {
            self.fixtures_selected -= 1;
        }
    }

    pub fn selected_fixture(&self) -> Option<&FixtureMatch> {
        self.fixture_rows().get(self.fixtures_selected).copied()
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    FeedPage {
        page: u32,
        items: Vec<Prediction>,
        has_more: bool,
    },
    FeedRefreshed {
        items: Vec<Prediction>,
        has_more: bool,
    },
    FeedError(String),
    SetExperts(Vec<Expert>),
    SetFixtures {
        today: Vec<FixtureMatch>,
        tomorrow: Vec<FixtureMatch>,
    },
    PredictionGenerated {
        fixture_id: u64,
        prediction: Prediction,
    },
    GenerateFailed {
        fixture_id: u64,
        message: String,
    },
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    LoadFeedPage {
        page: u32,
        filter: FeedFilter,
        tab: FeedTab,
    },
    RefreshFeed {
        filter: FeedFilter,
        tab: FeedTab,
    },
    FetchExperts,
    FetchFixtures,
    GeneratePrediction {
        fixture_id: u64,
    },
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::FeedPage {
            page,
            items,
            has_more,
        } => {
            // Pages must arrive in order; anything else is a stale response
            // from before a refresh or filter change.
            if page != state.feed_page + 1 {
                state.feed_loading = false;
                state.push_log(format!(
                    "[INFO] Dropped stale feed page {page} (at {})",
                    state.feed_page
                ));
                return;
            }
            let count = items.len();
            state.feed.extend(items);
            state.feed_page = page;
            state.feed_has_more = has_more;
            state.feed_loading = false;
            state.feed_error = None;
            state.clamp_feed_selection();
            state.push_log(format!("[INFO] Feed page {page}: {count} predictions"));
        }
        Delta::FeedRefreshed { items, has_more } => {
            let count = items.len();
            state.feed = items;
            state.feed_page = 1;
            state.feed_has_more = has_more;
            state.feed_loading = false;
            state.feed_error = None;
            state.feed_selected = 0;
            state.push_log(format!("[INFO] Feed refreshed: {count} predictions"));
        }
        Delta::FeedError(message) => {
            state.feed_loading = false;
            state.feed_error = Some(message.clone());
            state.push_log(format!("[WARN] Feed error: {message}"));
        }
        Delta::SetExperts(experts) => {
            state.experts = experts;
            if state.experts_selected >= state.experts.len() {
                state.experts_selected = 0;
            }
        }
        Delta::SetFixtures { today, tomorrow } => {
            state.push_log(format!(
                "[INFO] Fixtures: {} today, {} tomorrow",
                today.len(),
                tomorrow.len()
            ));
            state.fixtures_today = today;
            state.fixtures_tomorrow = tomorrow;
            let total = state.fixture_rows().len();
            if total == 0 {
                state.fixtures_selected = 0;
            } else if state.fixtures_selected >= total {
                state.fixtures_selected = total - 1;
            }
        }
        Delta::PredictionGenerated {
            fixture_id,
            prediction,
        } => {
            state.generating.remove(&fixture_id);
            let summary = FixturePrediction {
                id: prediction.id.clone(),
                confidence: prediction.confidence,
                predicted_score: prediction.predicted_outcome.clone(),
            };
            let ready = state
                .fixtures_today
                .iter_mut()
                .chain(state.fixtures_tomorrow.iter_mut())
                .find(|f| f.fixture_id == fixture_id)
                .map(|fixture| {
                    fixture.prediction = Some(summary);
                    let detail = BettingDetail::from_prediction(fixture, &prediction);
                    let label = format!("{} vs {}", fixture.home.name, fixture.away.name);
                    (detail, label)
                });
            if let Some((detail, label)) = ready {
                state.betting.insert(fixture_id, detail);
                state.push_log(format!("[INFO] Prediction ready for {label}"));
            } else {
                state.push_log(format!(
                    "[INFO] Prediction ready for unknown fixture {fixture_id}"
                ));
            }
        }
        Delta::GenerateFailed {
            fixture_id,
            message,
        } => {
            state.generating.remove(&fixture_id);
            state.push_log(format!(
                "[WARN] Prediction for fixture {fixture_id} failed: {message}"
            ));
        }
        Delta::Log(message) => state.push_log(message),
    }
}

pub fn filter_label(filter: FeedFilter) -> &'static str {
    match filter {
        FeedFilter::Hot => "HOT",
        FeedFilter::WinningStreak => "STREAK",
        FeedFilter::Returns => "RETURNS",
    }
}

pub fn tab_label(tab: FeedTab) -> &'static str {
    match tab {
        FeedTab::Following => "FOLLOWING",
        FeedTab::Football => "FOOTBALL",
        FeedTab::Basketball => "BASKETBALL",
    }
}

pub fn detail_tab_label(tab: DetailTab) -> &'static str {
    match tab {
        DetailTab::Recommendation => "PICK",
        DetailTab::Stats => "STATS",
        DetailTab::Analysis => "ANALYSIS",
    }
}
