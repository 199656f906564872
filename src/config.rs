use crate::track_scoring::{MatchWeights, RankingWeights};
use std::time::Duration;

/// Tunables for the resolution core. Every constant the algorithms rely on
/// lives here with its production default; tests and embedders override
/// fields as needed.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Search marker of the playback catalog, prepended to rewritten
    /// queries (and stripped before rewriting).
    pub search_prefix: String,

    /// A track retried within this window is not retried again.
    pub retry_window: Duration,
    /// Retry records older than this are dropped by the sweeper.
    pub retry_entry_ttl: Duration,
    /// How often the background sweep runs.
    pub sweep_interval: Duration,

    /// Flat duration slack allowed on a same-catalog replacement.
    pub replacement_duration_slack: Duration,
    /// Fractional slack of the failed track's own duration; the larger of
    /// the two bounds applies.
    pub replacement_duration_ratio: f64,

    /// Rebuilt title+author queries shorter than this carry too little
    /// signal to retry.
    pub min_rebuilt_query_len: usize,

    pub ranking: RankingWeights,
    pub matching: MatchWeights,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            search_prefix: "ytsearch:".to_string(),
            retry_window: Duration::from_secs(5 * 60),
            retry_entry_ttl: Duration::from_secs(10 * 60),
            sweep_interval: Duration::from_secs(10 * 60),
            replacement_duration_slack: Duration::from_secs(60),
            replacement_duration_ratio: 0.3,
            min_rebuilt_query_len: 3,
            ranking: RankingWeights::default(),
            matching: MatchWeights::default(),
        }
    }
}
