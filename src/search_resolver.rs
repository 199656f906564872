use crate::config::ResolverConfig;
use crate::query_expansion::{expand, is_cross_catalog_query};
use crate::retry_ledger::RetryLedger;
use crate::search_provider::{LoadKind, RequestContext, SearchProvider, SearchReply};
use crate::track_metadata::{SourceAnnotation, Track, TrackKey};
use crate::track_scoring::{best_cross_catalog_match, rank_best};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of resolving a fresh user query.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// One chosen track.
    Single(Track),
    /// A playlist load, passed through unscored.
    Multi(Vec<Track>),
    /// Every candidate query was exhausted without a match.
    NotFound,
    /// The backend answered but reported a load failure; distinct from
    /// NotFound so the caller can word a different message.
    ProviderError(String),
}

/// Outcome of the error-recovery path for an already-enqueued track.
#[derive(Debug, Clone)]
pub enum RecoveryOutcome {
    /// A different, duration-compatible track to enqueue instead.
    Replacement(Track),
    /// The track was already retried recently; skip it and move on.
    GiveUp,
    /// No usable replacement anywhere.
    NotFound,
}

/// Turns one query into one playable track (or a defined failure) by trying
/// progressively looser rewrites against the search capability.
pub struct SearchResolver {
    provider: Arc<dyn SearchProvider>,
    ledger: Arc<RetryLedger>,
    config: ResolverConfig,
}

impl SearchResolver {
    pub fn new(
        provider: Arc<dyn SearchProvider>,
        ledger: Arc<RetryLedger>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            provider,
            ledger,
            config,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a user-supplied query. Cross-catalog links take the
    /// two-phase path; everything else walks the expansion ladder.
    pub async fn resolve(&self, query: &str, ctx: &RequestContext) -> Resolution {
        if is_cross_catalog_query(query) {
            info!("Cross-catalog link detected, resolving via reference track");
            self.resolve_cross_catalog(query, ctx).await
        } else {
            self.resolve_with_fallbacks(query, ctx).await
        }
    }

    /// Two-phase resolve: load the reference on its own catalog, then look
    /// the same logical item up on the playback catalog. Substitution
    /// failing is never an error; the reference result stands.
    async fn resolve_cross_catalog(&self, query: &str, ctx: &RequestContext) -> Resolution {
        let reply = match self.provider.search(query, ctx).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!("Cross-catalog lookup failed: {}", err);
                return Resolution::NotFound;
            }
        };

        let (kind, tracks) = match reply {
            SearchReply::Failed { message } => return Resolution::ProviderError(message),
            SearchReply::Loaded { kind, tracks } => (kind, tracks),
        };

        let Some(reference) = tracks.first().cloned() else {
            info!("No results on the source catalog for {}", query);
            return Resolution::NotFound;
        };

        info!(
            "Found reference track \"{}\" by \"{}\"",
            reference.title, reference.author
        );

        // Prefer the reference's own URI; the backend maps it directly.
        // Otherwise fall back to a title+artist search on the playback
        // catalog.
        let secondary_query = reference.uri.clone().unwrap_or_else(|| {
            format!(
                "{}{} {}",
                self.config.search_prefix, reference.title, reference.author
            )
        });

        let substituted = match self.provider.search(&secondary_query, ctx).await {
            Ok(SearchReply::Loaded { tracks: found, .. }) if !found.is_empty() => {
                // The playback catalog may return several uploads; keep the
                // one closest to the reference.
                Some(
                    best_cross_catalog_match(
                        &found,
                        &reference.title,
                        &reference.author,
                        reference.duration,
                        &self.config.matching,
                    )
                    .clone(),
                )
            }
            Ok(SearchReply::Loaded { .. }) => None,
            Ok(SearchReply::Failed { message }) => {
                info!("Playback catalog reported a failure: {}", message);
                None
            }
            Err(err) => {
                warn!("Playback-catalog substitution failed: {}", err);
                None
            }
        };

        if let Some(mut track) = substituted {
            track.source = Some(SourceAnnotation {
                title: reference.title.clone(),
                artist: reference.author.clone(),
                album: reference.album.clone(),
                external_id: reference.external_id.clone(),
                source_id: Some(reference.identifier.clone()),
                uri: reference.uri.clone(),
            });
            info!(
                "Substituted \"{}\" by \"{}\" from the playback catalog",
                track.title, track.author
            );
            return Resolution::Single(track);
        }

        info!("Keeping the original reference result for {}", query);
        match kind {
            LoadKind::Playlist => Resolution::Multi(tracks),
            LoadKind::Single => match tracks.into_iter().next() {
                Some(track) => Resolution::Single(track),
                None => Resolution::NotFound,
            },
        }
    }

    /// Walk the expansion ladder in order and return the first usable
    /// result. A backend-reported failure is remembered and surfaced only
    /// if the whole ladder comes up empty.
    async fn resolve_with_fallbacks(&self, query: &str, ctx: &RequestContext) -> Resolution {
        let mut reported_failure: Option<String> = None;

        for (attempt, candidate) in expand(query, &self.config.search_prefix)
            .iter()
            .enumerate()
        {
            debug!("Search attempt {}: \"{}\"", attempt + 1, candidate);

            let reply = match self.provider.search(candidate, ctx).await {
                Ok(reply) => reply,
                Err(err) => {
                    warn!("Search attempt {} failed: {}", attempt + 1, err);
                    continue;
                }
            };

            let (kind, mut tracks) = match reply {
                SearchReply::Failed { message } => {
                    warn!("Backend reported load failure: {}", message);
                    reported_failure = Some(message);
                    continue;
                }
                SearchReply::Loaded { kind, tracks } => (kind, tracks),
            };

            if tracks.is_empty() {
                debug!("No matches for \"{}\"", candidate);
                continue;
            }

            if kind == LoadKind::Playlist {
                return Resolution::Multi(tracks);
            }

            // The first, most faithful query is trusted as-is; rewritten
            // queries with several hits get disambiguated by score.
            let chosen = if attempt > 0 && tracks.len() > 1 {
                rank_best(&tracks, &self.config.ranking).clone()
            } else {
                tracks.remove(0)
            };
            return Resolution::Single(chosen);
        }

        match reported_failure {
            Some(message) => Resolution::ProviderError(message),
            None => Resolution::NotFound,
        }
    }

    /// Error-recovery resolve for a track that failed during playback.
    /// Rebuilds a query from the track's own metadata and looks for a
    /// *different*, duration-compatible upload of the same song.
    pub async fn recover(&self, failed: &Track, ctx: &RequestContext) -> RecoveryOutcome {
        let key = TrackKey::of(failed);
        if self.ledger.was_recently_retried(&key) {
            info!("Track {} retried recently, giving up to avoid a loop", key);
            return RecoveryOutcome::GiveUp;
        }
        self.ledger.mark_retried(&key);

        let terms = failed.search_terms();
        if terms.chars().count() < self.config.min_rebuilt_query_len {
            warn!(
                "Cannot rebuild a search query for \"{}\", too little metadata",
                failed.title
            );
            return RecoveryOutcome::NotFound;
        }

        let rebuilt = format!("{}{}", self.config.search_prefix, terms);
        info!("Searching for an alternative to \"{}\"", terms);

        for candidate_query in expand(&rebuilt, &self.config.search_prefix) {
            let reply = match self.provider.search(&candidate_query, ctx).await {
                Ok(reply) => reply,
                Err(err) => {
                    warn!("Alternative search \"{}\" failed: {}", candidate_query, err);
                    continue;
                }
            };

            let SearchReply::Loaded { tracks, .. } = reply else {
                warn!("Backend failure during alternative search, moving on");
                continue;
            };

            for candidate in tracks {
                if candidate.identifier == failed.identifier {
                    debug!("Skipping the same upload {}", candidate.identifier);
                    continue;
                }
                if !self.duration_compatible(failed, &candidate) {
                    debug!(
                        "Skipping \"{}\", duration too far from the original",
                        candidate.title
                    );
                    continue;
                }
                info!(
                    "Found alternative \"{}\" by \"{}\"",
                    candidate.title, candidate.author
                );
                return RecoveryOutcome::Replacement(candidate);
            }
        }

        info!("No suitable alternative for \"{}\"", failed.title);
        RecoveryOutcome::NotFound
    }

    /// A replacement may differ from the failed track by at most 60 seconds
    /// or 30% of the original length, whichever is larger. Unknown
    /// durations pass.
    fn duration_compatible(&self, failed: &Track, candidate: &Track) -> bool {
        let (Some(original), Some(found)) = (failed.duration, candidate.duration) else {
            return true;
        };
        let ratio_bound = original.mul_f64(self.config.replacement_duration_ratio);
        let allowed = ratio_bound.max(self.config.replacement_duration_slack);
        original.abs_diff(found) <= allowed
    }
}
