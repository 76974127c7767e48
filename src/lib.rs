pub mod feed_fetch;
pub mod http_cache;
pub mod http_client;
pub mod mock_feed;
pub mod pagination;
pub mod provider;
pub mod pull_refresh;
pub mod state;
