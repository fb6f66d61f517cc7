//! In-memory doubles shared by the unit tests.

use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use graph_client::{
    EpisodeRecord, GraphError, KnowledgeGraph, NewEpisode, Result, SearchResult,
};
use tracing_subscriber::fmt::MakeWriter;

// ─── CapturedLogs ─────────────────────────────────────────────────────────

/// A `MakeWriter` that appends formatted log lines to a shared buffer.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

// ─── RecordingGraph ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    BuildIndices,
    AddEpisode(NewEpisode),
    Search { query: String, num_results: usize },
    Close,
}

/// A `KnowledgeGraph` that records every call and fails on request.
///
/// Clones share the call log, so a test can hand one clone to the driver
/// and inspect the other afterwards.
#[derive(Clone, Default)]
pub struct RecordingGraph {
    calls: Arc<Mutex<Vec<Call>>>,
    fail_indices: bool,
    failing_episodes: Vec<String>,
    hits: Vec<SearchResult>,
    fail_search: bool,
    fail_close: bool,
}

impl RecordingGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_indices(mut self) -> Self {
        self.fail_indices = true;
        self
    }

    pub fn failing_episode(mut self, name: &str) -> Self {
        self.failing_episodes.push(name.to_string());
        self
    }

    pub fn with_hits(mut self, facts: &[&str]) -> Self {
        self.hits = facts
            .iter()
            .enumerate()
            .map(|(i, fact)| SearchResult {
                uuid: format!("hit-{i}"),
                name: "RELATES_TO".into(),
                fact: fact.to_string(),
                score: 1.0 / (i as f64 + 1.0),
            })
            .collect();
        self
    }

    pub fn failing_search(mut self) -> Self {
        self.fail_search = true;
        self
    }

    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(*c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn injected(what: &str) -> GraphError {
    GraphError::InvalidInput(format!("injected {what} failure"))
}

#[async_trait]
impl KnowledgeGraph for RecordingGraph {
    async fn build_indices_and_constraints(&self) -> Result<()> {
        self.record(Call::BuildIndices);
        if self.fail_indices {
            return Err(injected("schema"));
        }
        Ok(())
    }

    async fn add_episode(&self, episode: NewEpisode) -> Result<EpisodeRecord> {
        let name = episode.name.clone();
        self.record(Call::AddEpisode(episode));
        if self.failing_episodes.contains(&name) {
            return Err(injected("episode"));
        }
        Ok(EpisodeRecord {
            uuid: Default::default(),
            name,
            created_at: Utc::now(),
        })
    }

    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<SearchResult>> {
        self.record(Call::Search {
            query: query.to_string(),
            num_results,
        });
        if self.fail_search {
            return Err(injected("search"));
        }
        Ok(self.hits.iter().take(num_results).cloned().collect())
    }

    async fn close(&self) -> Result<()> {
        self.record(Call::Close);
        if self.fail_close {
            return Err(injected("close"));
        }
        Ok(())
    }
}
