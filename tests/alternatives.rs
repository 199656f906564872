//! Alternative-version collection against a scripted search backend.

mod common;

use common::{ScriptedProvider, track};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use track_resolver::{AlternativeSearch, ProviderError, RequestContext, SearchReply};

#[tokio::test]
async fn collects_distinct_top_hits_in_variant_order() {
    common::init();
    let provider = Arc::new(ScriptedProvider::new(vec![
        Ok(SearchReply::tracks(vec![
            track("a", "Song (Official Video)", "Band"),
            track("x", "ignored second hit", "Band"),
        ])),
        Ok(SearchReply::tracks(vec![track("b", "Song (Audio)", "Band")])),
        // Same upload surfacing again under another variant.
        Ok(SearchReply::tracks(vec![track("a", "Song (Official Video)", "Band")])),
        Ok(SearchReply::empty()),
        Ok(SearchReply::tracks(vec![track("c", "Song lyrics", "Band")])),
    ]));
    let search = AlternativeSearch::new(provider.clone(), "ytsearch:");

    let results = search.collect("Song", &RequestContext::default()).await;

    let ids: Vec<&str> = results.iter().map(|t| t.identifier.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(
        provider.queries(),
        vec![
            "ytsearch:Song official".to_string(),
            "ytsearch:Song audio".to_string(),
            "ytsearch:Song music".to_string(),
            "ytsearch:Song topic".to_string(),
            "ytsearch:Song lyrics".to_string(),
        ]
    );
}

#[tokio::test]
async fn failing_variants_are_skipped() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        Err(ProviderError::Unreachable("node down".to_string())),
        Ok(SearchReply::Failed {
            message: "search disabled".to_string(),
        }),
        Ok(SearchReply::tracks(vec![track("a", "Song", "Band")])),
    ]));
    let search = AlternativeSearch::new(provider, "ytsearch:");

    let results = search.collect("Song", &RequestContext::default()).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].identifier, "a");
}

#[tokio::test]
async fn empty_everywhere_yields_no_alternatives() {
    let provider = Arc::new(ScriptedProvider::new(Vec::new()));
    let search = AlternativeSearch::new(provider.clone(), "ytsearch:");

    let results = search.collect("Song", &RequestContext::default()).await;

    assert!(results.is_empty());
    assert_eq!(provider.call_count(), 5);
}
