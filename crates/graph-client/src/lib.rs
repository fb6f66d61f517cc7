//! `graph-client` — episode ingestion and fact search over a knowledge graph.
//!
//! Callers talk to the graph through the [`KnowledgeGraph`] trait; the
//! concrete [`Neo4jGraph`] speaks Bolt to a Neo4j server via `neo4rs`.
//!
//! # Architecture
//!
//! ```text
//! NewEpisode ──► KnowledgeGraph::add_episode ──► (:Episodic) node
//!
//! query text ──► lucene_sanitize ──► fulltext indices
//!                                      ├─ edge_name_and_fact  (RELATES_TO.fact)
//!                                      └─ episode_content     (Episodic.content)
//!                                   ──► rank ──► Vec<SearchResult>
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use graph_client::{KnowledgeGraph, Neo4jGraph, NewEpisode, EpisodeType};
//!
//! let graph = Neo4jGraph::connect("bolt://localhost:7687", "neo4j", "secret").await?;
//! graph.build_indices_and_constraints().await?;
//! graph
//!     .add_episode(NewEpisode::new("standup", "Ada fixed the parser", EpisodeType::Text, "notes", chrono::Utc::now()))
//!     .await?;
//! for hit in graph.search("parser", 10).await? {
//!     println!("{}", hit.fact);
//! }
//! graph.close().await?;
//! ```

pub mod error;
pub mod graph;
pub mod neo4j;
pub mod search;
pub mod types;

pub use error::GraphError;
pub use graph::{KnowledgeGraph, DEFAULT_SEARCH_LIMIT};
pub use neo4j::Neo4jGraph;
pub use types::{EpisodeRecord, EpisodeType, NewEpisode, SearchResult};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, GraphError>;
