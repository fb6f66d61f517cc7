use std::io;

use chrono::{DateTime, Utc};
use graph_client::{EpisodeType, NewEpisode};
use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};
use serde_json::{Map, Value};

/// The payload of a sample episode before it is handed to the graph.
#[derive(Debug, Clone, PartialEq)]
pub enum EpisodeContent {
    Text(String),
    Json(Map<String, Value>),
}

impl EpisodeContent {
    /// The body string the graph receives: text as-is, JSON serialised.
    pub fn to_body(&self) -> Result<String, serde_json::Error> {
        match self {
            EpisodeContent::Text(text) => Ok(text.clone()),
            EpisodeContent::Json(map) => to_spaced_json(map),
        }
    }
}

/// Compact JSON with a space after `,` and `:`, keys in insertion order.
#[derive(Debug, Clone, Copy, Default)]
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

fn to_spaced_json(map: &Map<String, Value>) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, SpacedFormatter);
    map.serialize(&mut ser)?;
    // serde_json only ever writes valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[derive(Debug, Clone, PartialEq)]
pub struct SampleEpisode {
    pub content: EpisodeContent,
    pub source: EpisodeType,
    pub description: String,
}

impl SampleEpisode {
    /// Build the client-side episode for position `index` (1-based).
    pub fn to_new_episode(
        &self,
        index: usize,
        reference_time: DateTime<Utc>,
    ) -> Result<NewEpisode, serde_json::Error> {
        Ok(NewEpisode::new(
            format!("Test Episode {index}"),
            self.content.to_body()?,
            self.source,
            self.description.clone(),
            reference_time,
        ))
    }
}

/// The two demonstration records every run ingests: one prose, one structured.
pub fn sample_episodes() -> Vec<SampleEpisode> {
    let task: Map<String, Value> = [
        ("task", "Debug Graphiti MCP JSON episodes"),
        ("status", "in_progress"),
        ("developer", "Brian"),
        ("issue", "JSON episodes not processing correctly"),
        (
            "solution_approach",
            "Run locally with full logging to identify the problem",
        ),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
    .collect();

    vec![
        SampleEpisode {
            content: EpisodeContent::Text(
                "Brian is working on fixing the JSON episode issue in Graphiti MCP server. \
                 The text episodes work fine but JSON episodes have problems."
                    .to_string(),
            ),
            source: EpisodeType::Text,
            description: "development issue".to_string(),
        },
        SampleEpisode {
            content: EpisodeContent::Json(task),
            source: EpisodeType::Json,
            description: "structured task data".to_string(),
        },
    ]
}
