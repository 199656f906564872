//! Shared test utilities: canned search backends and track builders.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, Once};
use track_resolver::{
    ProviderResult, RawTrack, RequestContext, SearchProvider, SearchReply, Track,
};

static INIT: Once = Once::new();

/// Initialize tracing output for tests once per process.
pub fn init() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("track_resolver=debug")),
            )
            .with_test_writer()
            .init();
    });
}

/// Search backend that replays a scripted sequence of replies, one per
/// call, and records every query it was asked. Once the script runs out it
/// keeps answering with empty results.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<ProviderResult<SearchReply>>>,
    queries: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<ProviderResult<SearchReply>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl SearchProvider for ScriptedProvider {
    async fn search(&self, query: &str, _ctx: &RequestContext) -> ProviderResult<SearchReply> {
        self.queries.lock().unwrap().push(query.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(SearchReply::empty()))
    }
}

pub fn track(id: &str, title: &str, author: &str) -> Track {
    Track::from(RawTrack {
        identifier: Some(id.to_string()),
        title: Some(title.to_string()),
        author: Some(author.to_string()),
        ..Default::default()
    })
}

pub fn track_with_duration(id: &str, title: &str, author: &str, duration_ms: u64) -> Track {
    Track::from(RawTrack {
        identifier: Some(id.to_string()),
        title: Some(title.to_string()),
        author: Some(author.to_string()),
        duration_ms: Some(duration_ms),
        ..Default::default()
    })
}
