use async_trait::async_trait;

use crate::types::{EpisodeRecord, NewEpisode, SearchResult};
use crate::Result;

/// Number of hits [`KnowledgeGraph::search`] callers ask for unless told otherwise.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// A connection-scoped handle to a knowledge graph.
///
/// Implementations own their connection. [`close`](KnowledgeGraph::close)
/// releases it; afterwards every other operation returns
/// [`GraphError::Closed`](crate::GraphError::Closed) and further `close`
/// calls are no-ops.
#[async_trait]
pub trait KnowledgeGraph: Send + Sync {
    /// Create the indices and constraints the graph relies on. Idempotent.
    async fn build_indices_and_constraints(&self) -> Result<()>;

    /// Store one episode and return the node that was created for it.
    async fn add_episode(&self, episode: NewEpisode) -> Result<EpisodeRecord>;

    /// Run a free-text query and return at most `num_results` hits, best first.
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<SearchResult>>;

    /// Release the underlying connection.
    async fn close(&self) -> Result<()>;
}
