use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── EpisodeType ──────────────────────────────────────────────────────────

/// How the body of an episode should be interpreted by the graph.
///
/// Stored verbatim on the `Episodic` node's `source` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeType {
    /// Conversational turns, `speaker: text` per line.
    Message,
    /// A JSON document serialised to a string.
    Json,
    /// Free-form prose.
    Text,
}

impl EpisodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EpisodeType::Message => "message",
            EpisodeType::Json => "json",
            EpisodeType::Text => "text",
        }
    }
}

impl fmt::Display for EpisodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Ingestion ────────────────────────────────────────────────────────────

/// An episode ready to hand to [`crate::KnowledgeGraph::add_episode`].
///
/// `body` is always text: structured payloads are serialised by the caller
/// before submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEpisode {
    pub name: String,
    pub body: String,
    pub source: EpisodeType,
    pub source_description: String,
    /// When the content of the episode was true in the world.
    pub reference_time: DateTime<Utc>,
    /// Partition key; empty string is the default partition.
    #[serde(default)]
    pub group_id: String,
}

impl NewEpisode {
    pub fn new(
        name: impl Into<String>,
        body: impl Into<String>,
        source: EpisodeType,
        source_description: impl Into<String>,
        reference_time: DateTime<Utc>,
    ) -> Self {
        NewEpisode {
            name: name.into(),
            body: body.into(),
            source,
            source_description: source_description.into(),
            reference_time,
            group_id: String::new(),
        }
    }
}

/// The node created for an ingested episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub uuid: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

// ─── Search ───────────────────────────────────────────────────────────────

/// A single hit from [`crate::KnowledgeGraph::search`].
///
/// `fact` is the text the hit contributes: the fact of a relationship, or
/// the content of an episode when the hit is an episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub uuid: String,
    pub name: String,
    pub fact: String,
    pub score: f64,
}
