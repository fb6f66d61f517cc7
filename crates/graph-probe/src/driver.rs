use std::error::Error as StdError;

use chrono::Utc;
use graph_client::{EpisodeRecord, KnowledgeGraph, SearchResult, DEFAULT_SEARCH_LIMIT};
use tracing::{debug, error, info};

use crate::episodes::{sample_episodes, EpisodeContent, SampleEpisode};

/// Query issued after ingestion unless the caller supplies one.
pub const DEFAULT_QUERY: &str = "JSON episodes debugging Brian";

// ---------------------------------------------------------------------------
// ProbePlan
// ---------------------------------------------------------------------------

/// What a run ingests and what it searches for afterwards.
#[derive(Debug, Clone)]
pub struct ProbePlan {
    pub episodes: Vec<SampleEpisode>,
    pub query: String,
    pub num_results: usize,
}

impl Default for ProbePlan {
    fn default() -> Self {
        ProbePlan {
            episodes: sample_episodes(),
            query: DEFAULT_QUERY.to_string(),
            num_results: DEFAULT_SEARCH_LIMIT,
        }
    }
}

// ---------------------------------------------------------------------------
// RunReport
// ---------------------------------------------------------------------------

/// One ingestion attempt. `index` is 1-based, matching the logs.
#[derive(Debug, Clone)]
pub struct EpisodeAttempt {
    pub index: usize,
    pub result: Result<EpisodeRecord, String>,
}

/// Every step's outcome. Failures are kept as their display string.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub schema: Result<(), String>,
    pub episodes: Vec<EpisodeAttempt>,
    /// `None` when the run never got as far as searching.
    pub search: Option<Result<Vec<SearchResult>, String>>,
    pub close: Result<(), String>,
}

impl RunReport {
    pub fn failure_count(&self) -> usize {
        let episodes = self.episodes.iter().filter(|e| e.result.is_err()).count();
        let search = matches!(self.search, Some(Err(_))) as usize;
        self.schema.is_err() as usize + episodes + search + self.close.is_err() as usize
    }

    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }

    /// Whether the process should exit non-zero.
    ///
    /// A failed close always counts. Other step failures only count in
    /// strict mode; otherwise they are visible in the logs alone.
    pub fn should_fail(&self, strict: bool) -> bool {
        self.close.is_err() || (strict && self.has_failures())
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Exercise `graph` according to `plan`, then close it.
///
/// Schema failure ends the exercise early; each episode and the search fail
/// independently. `close` is awaited exactly once whatever happened before,
/// and the graph is dropped before returning.
pub async fn run<G: KnowledgeGraph>(graph: G, plan: &ProbePlan) -> RunReport {
    let mut report = RunReport {
        schema: Ok(()),
        episodes: Vec::with_capacity(plan.episodes.len()),
        search: None,
        close: Ok(()),
    };

    if let Err(e) = exercise(&graph, plan, &mut report).await {
        log_failure("Test failed", &e);
        report.schema = Err(e.to_string());
    }

    info!("Closing graph connection...");
    report.close = match graph.close().await {
        Ok(()) => {
            info!("Connection closed");
            Ok(())
        }
        Err(e) => {
            log_failure("Failed to close connection", &e);
            Err(e.to_string())
        }
    };
    drop(graph);

    report
}

async fn exercise<G: KnowledgeGraph>(
    graph: &G,
    plan: &ProbePlan,
    report: &mut RunReport,
) -> graph_client::Result<()> {
    info!("Building indices and constraints...");
    graph.build_indices_and_constraints().await?;
    info!("Indices and constraints built successfully");

    for (i, sample) in plan.episodes.iter().enumerate() {
        let attempt = add_one(graph, i + 1, sample).await;
        report.episodes.push(attempt);
    }

    report.search = Some(search(graph, &plan.query, plan.num_results).await);
    Ok(())
}

async fn add_one<G: KnowledgeGraph>(
    graph: &G,
    index: usize,
    sample: &SampleEpisode,
) -> EpisodeAttempt {
    info!("=== ADDING EPISODE {index} ===");
    info!("Type: {}", sample.source);
    info!("Content: {}", describe(&sample.content));

    let result = match sample.to_new_episode(index, Utc::now()) {
        Ok(episode) => graph.add_episode(episode).await.map_err(|e| {
            log_failure(&format!("Failed to add episode {index}"), &e);
            e.to_string()
        }),
        Err(e) => {
            log_failure(&format!("Failed to add episode {index}"), &e);
            Err(e.to_string())
        }
    };

    if let Ok(record) = &result {
        info!("✅ Successfully added episode {index}");
        debug!(uuid = %record.uuid, name = %record.name, "episode stored");
    }

    EpisodeAttempt { index, result }
}

async fn search<G: KnowledgeGraph>(
    graph: &G,
    query: &str,
    num_results: usize,
) -> Result<Vec<SearchResult>, String> {
    info!("=== TESTING SEARCH ===");
    match graph.search(query, num_results).await {
        Ok(hits) => {
            info!("Search returned {} results", hits.len());
            for (j, hit) in hits.iter().enumerate() {
                info!("Result {}: {}", j + 1, hit.fact);
            }
            Ok(hits)
        }
        Err(e) => {
            log_failure("Search failed", &e);
            Err(e.to_string())
        }
    }
}

fn describe(content: &EpisodeContent) -> String {
    match content {
        EpisodeContent::Text(text) => text.clone(),
        EpisodeContent::Json(map) => serde_json::Value::Object(map.clone()).to_string(),
    }
}

/// One line with the error, then one with its whole source chain.
fn log_failure(context: &str, err: &(dyn StdError + 'static)) {
    error!("❌ {context}: {err}");
    let mut chain = format!("{err:?}");
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push_str(&format!("\n  caused by: {cause}"));
        source = cause.source();
    }
    error!("Full exception details: {chain}");
}
