use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Generic fallback search for a video link whose title we cannot read.
/// Real title extraction would need a metadata fetch; the constant keeps the
/// ladder moving instead.
const VIDEO_URL_FALLBACK_QUERY: &str = "music video";

/// Suffix terms appended to the stripped query, tried in this order after
/// the faithful variants. The richer terms go first.
const DISAMBIGUATION_SUFFIXES: [&str; 3] = ["official", "audio", "music"];
const TRAILING_SUFFIXES: [&str; 2] = ["topic", "lyrics"];

static VIDEO_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?:https?:)?//)?((?:www|m)\.)?((?:youtube\.com|youtu\.be))(/(?:[\w\-]+\?v=|embed/|v/)?)([\w\-]+)(\S+)?$").unwrap()
});

static CROSS_CATALOG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"((https?://)?(open\.)?spotify\.com/)|(^spotify:)").unwrap()
});

/// Check if a string parses as a URL at all
pub fn is_url(input: &str) -> bool {
    Url::parse(input).is_ok()
}

/// Check if a query is a link to the known video provider
pub fn is_video_url(query: &str) -> bool {
    VIDEO_URL_REGEX.is_match(query)
}

/// Check if a query names a track on the cross-catalog source rather than
/// the playback catalog
pub fn is_cross_catalog_query(query: &str) -> bool {
    CROSS_CATALOG_REGEX.is_match(query)
}

/// Produce the ordered list of candidate queries to try for one input,
/// most faithful first, progressively more permissive afterward.
///
/// The first element is always the input itself, unchanged. Deterministic
/// and side-effect free; duplicates are not removed.
pub fn expand(original: &str, search_prefix: &str) -> Vec<String> {
    let mut queries = vec![original.to_string()];

    if is_video_url(original) {
        queries.push(format!("{}{}", search_prefix, VIDEO_URL_FALLBACK_QUERY));
    }

    let base = original.strip_prefix(search_prefix).unwrap_or(original).trim();

    let mut push_variant = |candidate: String| {
        // Never emit a prefix-only query
        if !candidate.trim().is_empty() {
            queries.push(format!("{}{}", search_prefix, candidate));
        }
    };

    for suffix in DISAMBIGUATION_SUFFIXES {
        push_variant(suffixed(base, suffix));
    }
    push_variant(first_words(base, 4));
    for suffix in TRAILING_SUFFIXES {
        push_variant(suffixed(base, suffix));
    }

    queries
}

fn suffixed(base: &str, suffix: &str) -> String {
    if base.is_empty() {
        String::new()
    } else {
        format!("{} {}", base, suffix)
    }
}

fn first_words(base: &str, count: usize) -> String {
    base.split_whitespace()
        .take(count)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    const PREFIX: &str = "ytsearch:";

    #[test]
    fn first_element_is_always_the_input() {
        for input in ["plain song name", "ytsearch:already prefixed", "   ", "x"] {
            let expanded = expand(input, PREFIX);
            assert_eq!(expanded[0], input);
        }
    }

    #[test]
    fn expansion_is_deterministic() {
        let a = expand("ytsearch:imagine dragons believer", PREFIX);
        let b = expand("ytsearch:imagine dragons believer", PREFIX);
        assert_eq!(a, b);
    }

    #[test]
    fn expansion_order_matches_the_ladder() {
        let expanded = expand("ytsearch:never gonna give you up extended mix", PREFIX);
        assert_eq!(
            expanded,
            vec![
                "ytsearch:never gonna give you up extended mix".to_string(),
                "ytsearch:never gonna give you up extended mix official".to_string(),
                "ytsearch:never gonna give you up extended mix audio".to_string(),
                "ytsearch:never gonna give you up extended mix music".to_string(),
                "ytsearch:never gonna give you".to_string(),
                "ytsearch:never gonna give you up extended mix topic".to_string(),
                "ytsearch:never gonna give you up extended mix lyrics".to_string(),
            ]
        );
    }

    #[test]
    fn video_url_gets_generic_fallback_second() {
        let expanded = expand("https://youtu.be/dQw4w9WgXcQ", PREFIX);
        assert_eq!(expanded[1], "ytsearch:music video");
    }

    #[test]
    fn prefix_only_input_keeps_only_nonempty_variants() {
        let expanded = expand("ytsearch:", PREFIX);
        // Only the faithful first element survives; every variant would be
        // prefix-only.
        assert_eq!(expanded, vec!["ytsearch:".to_string()]);
    }

    #[test]
    fn never_empty() {
        assert!(!expand("", PREFIX).is_empty());
    }

    #[test_case("https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC", true)]
    #[test_case("spotify:track:4uLU6hMCjMI75M1A2tKUQC", true)]
    #[test_case("https://youtu.be/dQw4w9WgXcQ", false)]
    #[test_case("ytsearch:some song", false)]
    fn cross_catalog_detection(query: &str, expected: bool) {
        assert_eq!(is_cross_catalog_query(query), expected);
    }

    #[test_case("https://www.youtube.com/watch?v=dQw4w9WgXcQ", true)]
    #[test_case("https://youtu.be/dQw4w9WgXcQ", true)]
    #[test_case("https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC", false)]
    #[test_case("just words", false)]
    fn video_url_detection(query: &str, expected: bool) {
        assert_eq!(is_video_url(query), expected);
    }

    #[test]
    fn url_check_accepts_any_scheme() {
        assert!(is_url("https://example.com/stream.mp3"));
        assert!(!is_url("not a url"));
    }
}
