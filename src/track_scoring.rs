use crate::track_metadata::Track;
use std::time::Duration;
use tracing::debug;

/// Weights for ranking several candidates returned by one search query.
/// All fields are additive points on case-insensitive substring hits.
#[derive(Debug, Clone)]
pub struct RankingWeights {
    pub official: i32,
    pub audio: i32,
    pub music: i32,
    pub topic: i32,
    pub lyrics: i32,
    pub live: i32,
    pub stream: i32,
    pub radio: i32,
    pub unofficial_remix: i32,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            official: 3,
            audio: 2,
            music: 2,
            topic: 2,
            lyrics: 1,
            live: -2,
            stream: -2,
            radio: -1,
            unofficial_remix: -1,
        }
    }
}

/// Weights and thresholds for matching a specific reference track across
/// catalogs. A best score at or below `confidence_floor` is not trusted and
/// the first candidate wins instead.
#[derive(Debug, Clone)]
pub struct MatchWeights {
    pub title_overlap: i32,
    pub artist_overlap: i32,
    pub duration_close: i32,
    pub duration_near: i32,
    pub duration_far_penalty: i32,
    pub official: i32,
    pub audio: i32,
    pub topic: i32,
    pub live: i32,
    pub cover: i32,
    pub unofficial_remix: i32,
    pub karaoke: i32,
    pub confidence_floor: i32,
    pub close_threshold: Duration,
    pub near_threshold: Duration,
    pub far_threshold: Duration,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            title_overlap: 50,
            artist_overlap: 30,
            duration_close: 20,
            duration_near: 10,
            duration_far_penalty: -20,
            official: 10,
            audio: 8,
            topic: 5,
            live: -15,
            cover: -15,
            unofficial_remix: -10,
            karaoke: -20,
            confidence_floor: 20,
            close_threshold: Duration::from_secs(10),
            near_threshold: Duration::from_secs(30),
            far_threshold: Duration::from_secs(120),
        }
    }
}

/// Preference score for one candidate track, higher is better. Pure
/// function of the lower-cased title and author.
pub fn ranking_score(track: &Track, weights: &RankingWeights) -> i32 {
    let title = track.title.to_lowercase();
    let author = track.author.to_lowercase();

    let rules = [
        (title.contains("official"), weights.official),
        (title.contains("audio"), weights.audio),
        (title.contains("music"), weights.music),
        (author.contains("topic"), weights.topic),
        (title.contains("lyrics"), weights.lyrics),
        (title.contains("live"), weights.live),
        (title.contains("stream"), weights.stream),
        (title.contains("radio"), weights.radio),
        (
            title.contains("remix") && !title.contains("official"),
            weights.unofficial_remix,
        ),
    ];

    rules
        .iter()
        .filter(|(hit, _)| *hit)
        .map(|(_, weight)| weight)
        .sum()
}

/// Pick the highest-scoring track from a non-empty slice, first-seen
/// winning ties.
pub fn rank_best<'a>(tracks: &'a [Track], weights: &RankingWeights) -> &'a Track {
    assert!(!tracks.is_empty(), "rank_best requires at least one track");

    let mut best = &tracks[0];
    let mut best_score = ranking_score(best, weights);
    for track in &tracks[1..] {
        let score = ranking_score(track, weights);
        if score > best_score {
            best = track;
            best_score = score;
        }
    }
    debug!("Selected track \"{}\" with score {}", best.title, best_score);
    best
}

/// Best-effort match of `candidates` against a reference track from another
/// catalog. Always returns one of the candidates.
///
/// Panics on an empty slice; callers check non-emptiness first.
pub fn best_cross_catalog_match<'a>(
    candidates: &'a [Track],
    reference_title: &str,
    reference_artist: &str,
    reference_duration: Option<Duration>,
    weights: &MatchWeights,
) -> &'a Track {
    assert!(
        !candidates.is_empty(),
        "best_cross_catalog_match requires at least one candidate"
    );

    let ref_title = normalize(reference_title);
    let ref_artist = normalize(reference_artist);

    let mut best = &candidates[0];
    let mut best_score = i32::MIN;
    for candidate in candidates {
        let score = match_score(candidate, &ref_title, &ref_artist, reference_duration, weights);
        if score > best_score {
            best = candidate;
            best_score = score;
        }
    }

    if best_score <= weights.confidence_floor {
        // Not enough signal to discriminate; trust the backend's ordering.
        debug!(
            "Best match score {} under floor {}, keeping first candidate",
            best_score, weights.confidence_floor
        );
        return &candidates[0];
    }

    debug!(
        "Cross-catalog match \"{}\" by \"{}\" scored {}",
        best.title, best.author, best_score
    );
    best
}

fn match_score(
    candidate: &Track,
    ref_title: &str,
    ref_artist: &str,
    ref_duration: Option<Duration>,
    weights: &MatchWeights,
) -> i32 {
    let title = normalize(&candidate.title);
    let author = normalize(&candidate.author);
    let mut score = 0;

    if overlaps(&title, ref_title) {
        score += weights.title_overlap;
    }
    if overlaps(&author, ref_artist) {
        score += weights.artist_overlap;
    }

    if let (Some(expected), Some(actual)) = (ref_duration, candidate.duration) {
        let diff = expected.abs_diff(actual);
        if diff <= weights.close_threshold {
            score += weights.duration_close;
        } else if diff <= weights.near_threshold {
            score += weights.duration_near;
        }
        if diff > weights.far_threshold {
            score += weights.duration_far_penalty;
        }
    }

    let quality = [
        (title.contains("official"), weights.official),
        (title.contains("audio"), weights.audio),
        (author.contains("topic"), weights.topic),
        (title.contains("live"), weights.live),
        (title.contains("cover"), weights.cover),
        (
            title.contains("remix") && !title.contains("official"),
            weights.unofficial_remix,
        ),
        (title.contains("karaoke"), weights.karaoke),
    ];
    score += quality
        .iter()
        .filter(|(hit, _)| *hit)
        .map(|(_, weight)| weight)
        .sum::<i32>();

    score
}

/// Lower-case and keep only alphanumeric and whitespace, so punctuation and
/// bracketed qualifiers do not defeat containment checks.
fn normalize(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect()
}

fn overlaps(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}
