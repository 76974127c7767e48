use std::env;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crate::feed_fetch;
use crate::state::{Delta, FeedFilter, FeedTab, Prediction, ProviderCommand};

/// Fetch worker against the real prediction service. Owns the command
/// receiver; every outcome goes back to the UI thread as a [`Delta`], network
/// failures included.
pub fn spawn_provider(base: String, tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        let fixtures_throttle = Duration::from_secs(
            env::var("FIXTURES_POLL_SECS")
                .ok()
                .and_then(|val| val.parse::<u64>().ok())
                .unwrap_or(120)
                .max(30),
        );
        let mut last_fixtures: Option<Instant> = None;

        loop {
            let cmd = match cmd_rx.recv_timeout(Duration::from_millis(250)) {
                Ok(cmd) => cmd,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return,
            };

            match cmd {
                ProviderCommand::LoadFeedPage { page, filter, tab } => {
                    let size = page_size();
                    match feed_fetch::fetch_feed_page(&base, page, size) {
                        Ok(items) => {
                            let has_more = (items.len() as u32) >= size;
                            let items = apply_feed_filters(items, filter, tab);
                            let _ = tx.send(Delta::FeedPage {
                                page,
                                items,
                                has_more,
                            });
                        }
                        Err(err) => {
                            let _ = tx.send(Delta::FeedError(err.to_string()));
                        }
                    }
                }
                ProviderCommand::RefreshFeed { filter, tab } => {
                    // Rapid re-pulls land inside the cache freshness window,
                    // so the service sees at most one request. Every refresh
                    // must answer with a delta or the gesture never settles.
                    match feed_fetch::fetch_feed_page(&base, 1, page_size()) {
                        Ok(items) => {
                            let has_more = (items.len() as u32) >= page_size();
                            let items = apply_feed_filters(items, filter, tab);
                            let _ = tx.send(Delta::FeedRefreshed { items, has_more });
                        }
                        Err(err) => {
                            let _ = tx.send(Delta::FeedError(err.to_string()));
                        }
                    }
                }
                ProviderCommand::FetchExperts => match feed_fetch::fetch_experts(&base) {
                    Ok(experts) => {
                        let _ = tx.send(Delta::SetExperts(experts));
                    }
                    Err(err) => {
                        let _ = tx.send(Delta::Log(format!("[WARN] Experts fetch error: {err}")));
                    }
                },
                ProviderCommand::FetchFixtures => {
                    if let Some(last) = last_fixtures {
                        if last.elapsed() < fixtures_throttle {
                            continue;
                        }
                    }
                    match feed_fetch::fetch_today_tomorrow(&base) {
                        Ok((today, tomorrow)) => {
                            let _ = tx.send(Delta::SetFixtures { today, tomorrow });
                            last_fixtures = Some(Instant::now());
                        }
                        Err(err) => {
                            let _ =
                                tx.send(Delta::Log(format!("[WARN] Fixtures fetch error: {err}")));
                        }
                    }
                }
                ProviderCommand::GeneratePrediction { fixture_id } => {
                    match feed_fetch::generate_prediction(&base, fixture_id) {
                        Ok(prediction) => {
                            let _ = tx.send(Delta::PredictionGenerated {
                                fixture_id,
                                prediction,
                            });
                        }
                        Err(err) => {
                            let _ = tx.send(Delta::GenerateFailed {
                                fixture_id,
                                message: err.to_string(),
                            });
                        }
                    }
                }
            }
        }
    });
}

/// Client-side narrowing the service does not offer as query params.
pub fn apply_feed_filters(
    items: Vec<Prediction>,
    filter: FeedFilter,
    tab: FeedTab,
) -> Vec<Prediction> {
    items
        .into_iter()
        .filter(|p| filter.keeps(p) && tab.keeps(p))
        .collect()
}

fn page_size() -> u32 {
    env::var("FEED_PAGE_SIZE")
        .ok()
        .and_then(|val| val.parse::<u32>().ok())
        .unwrap_or(10)
        .clamp(1, 50)
}
