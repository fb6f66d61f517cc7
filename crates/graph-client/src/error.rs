use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Neo4j error: {0}")]
    Neo4j(#[from] neo4rs::Error),

    #[error("Failed to read column '{column}' from result row: {source}")]
    Row {
        column: &'static str,
        #[source]
        source: neo4rs::DeError,
    },

    #[error("Graph connection already closed")]
    Closed,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
