use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use neo4rs::{query, Graph, Row};
use tracing::{debug, info};
use uuid::Uuid;

use crate::graph::KnowledgeGraph;
use crate::search::{lucene_sanitize, rank};
use crate::types::{EpisodeRecord, NewEpisode, SearchResult};
use crate::{GraphError, Result};

// ─── Schema ───────────────────────────────────────────────────────────────

/// Statements run by [`Neo4jGraph::build_indices_and_constraints`], in order.
///
/// Every statement is `IF NOT EXISTS`, so re-running against an initialised
/// database changes nothing.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    "CREATE CONSTRAINT episodic_uuid_unique IF NOT EXISTS \
     FOR (n:Episodic) REQUIRE n.uuid IS UNIQUE",
    "CREATE INDEX entity_uuid IF NOT EXISTS FOR (n:Entity) ON (n.uuid)",
    "CREATE INDEX episode_group_id IF NOT EXISTS FOR (n:Episodic) ON (n.group_id)",
    "CREATE INDEX created_at_episodic_index IF NOT EXISTS FOR (n:Episodic) ON (n.created_at)",
    "CREATE INDEX valid_at_episodic_index IF NOT EXISTS FOR (n:Episodic) ON (n.valid_at)",
    "CREATE FULLTEXT INDEX episode_content IF NOT EXISTS \
     FOR (e:Episodic) ON EACH [e.content, e.source, e.source_description, e.group_id]",
    "CREATE FULLTEXT INDEX edge_name_and_fact IF NOT EXISTS \
     FOR ()-[e:RELATES_TO]-() ON EACH [e.name, e.fact, e.group_id]",
];

const CREATE_EPISODE: &str = "CREATE (e:Episodic {
        uuid: $uuid,
        name: $name,
        content: $content,
        source: $source,
        source_description: $source_description,
        group_id: $group_id,
        created_at: datetime($created_at),
        valid_at: datetime($valid_at)
    })";

// Relationship facts and episode content share one result shape so the two
// fulltext indices can be merged with a single UNION.
const FULLTEXT_SEARCH: &str = "
    CALL db.index.fulltext.queryRelationships('edge_name_and_fact', $query, {limit: $limit})
    YIELD relationship AS rel, score
    RETURN coalesce(rel.uuid, elementId(rel)) AS uuid,
           coalesce(rel.name, '') AS name,
           coalesce(rel.fact, '') AS fact,
           score
    UNION ALL
    CALL db.index.fulltext.queryNodes('episode_content', $query, {limit: $limit})
    YIELD node AS ep, score
    RETURN coalesce(ep.uuid, elementId(ep)) AS uuid,
           coalesce(ep.name, '') AS name,
           coalesce(ep.content, '') AS fact,
           score";

// ─── Neo4jGraph ───────────────────────────────────────────────────────────

/// [`KnowledgeGraph`] backed by a Neo4j database over Bolt.
///
/// Holds the `neo4rs` connection pool until [`close`](KnowledgeGraph::close)
/// takes it out and drops it.
pub struct Neo4jGraph {
    graph: Mutex<Option<Graph>>,
}

impl Neo4jGraph {
    /// Build a connection pool for `uri` authenticated as `user`.
    pub async fn connect(uri: &str, user: &str, password: &str) -> Result<Self> {
        debug!(uri, user, "creating neo4j connection pool");
        let graph = Graph::new(uri, user, password).await?;
        Ok(Neo4jGraph {
            graph: Mutex::new(Some(graph)),
        })
    }

    /// A clone of the pool handle, or `Closed` once the pool is released.
    fn handle(&self) -> Result<Graph> {
        self.graph
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
            .ok_or(GraphError::Closed)
    }
}

#[async_trait]
impl KnowledgeGraph for Neo4jGraph {
    async fn build_indices_and_constraints(&self) -> Result<()> {
        let graph = self.handle()?;
        for statement in SCHEMA_STATEMENTS {
            debug!(statement, "applying schema statement");
            graph.run(query(statement)).await?;
        }
        info!(count = SCHEMA_STATEMENTS.len(), "schema statements applied");
        Ok(())
    }

    async fn add_episode(&self, episode: NewEpisode) -> Result<EpisodeRecord> {
        if episode.name.trim().is_empty() {
            return Err(GraphError::InvalidInput("episode name is empty".into()));
        }
        let graph = self.handle()?;

        let uuid = Uuid::new_v4();
        let created_at = Utc::now();
        debug!(
            %uuid,
            name = %episode.name,
            source = %episode.source,
            body_len = episode.body.len(),
            "creating episodic node"
        );

        let q = query(CREATE_EPISODE)
            .param("uuid", uuid.to_string())
            .param("name", episode.name.as_str())
            .param("content", episode.body.as_str())
            .param("source", episode.source.as_str())
            .param("source_description", episode.source_description.as_str())
            .param("group_id", episode.group_id.as_str())
            .param("created_at", format_datetime(&created_at))
            .param("valid_at", format_datetime(&episode.reference_time));
        graph.run(q).await?;

        Ok(EpisodeRecord {
            uuid,
            name: episode.name,
            created_at,
        })
    }

    async fn search(&self, query_text: &str, num_results: usize) -> Result<Vec<SearchResult>> {
        let graph = self.handle()?;
        let trimmed = query_text.trim();
        if trimmed.is_empty() || num_results == 0 {
            return Ok(Vec::new());
        }

        let sanitized = lucene_sanitize(trimmed);
        debug!(query = %sanitized, num_results, "running fulltext search");

        let q = query(FULLTEXT_SEARCH)
            .param("query", sanitized)
            .param("limit", i64::try_from(num_results).unwrap_or(i64::MAX));
        let mut stream = graph.execute(q).await?;

        let mut hits = Vec::new();
        while let Some(row) = stream.next().await? {
            hits.push(search_result_from_row(&row)?);
        }
        debug!(raw_hits = hits.len(), "fulltext search complete");

        Ok(rank(hits, num_results))
    }

    async fn close(&self) -> Result<()> {
        let released = self
            .graph
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        match released {
            Some(graph) => {
                drop(graph);
                debug!("neo4j connection pool released");
            }
            None => debug!("close called on an already closed graph"),
        }
        Ok(())
    }
}

// ─── Helpers ──────────────────────────────────────────────────────────────

fn search_result_from_row(row: &Row) -> Result<SearchResult> {
    Ok(SearchResult {
        uuid: column(row, "uuid")?,
        name: column(row, "name")?,
        fact: column(row, "fact")?,
        score: column(row, "score")?,
    })
}

fn column<T>(row: &Row, name: &'static str) -> Result<T>
where
    T: for<'de> serde::Deserialize<'de>,
{
    row.get::<T>(name).map_err(|source| GraphError::Row {
        column: name,
        source,
    })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}
