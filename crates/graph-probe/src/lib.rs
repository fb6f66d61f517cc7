//! `graph-probe` — a diagnostic run of [`graph_client`] against a live Neo4j.
//!
//! The binary connects, ensures the schema exists, ingests two sample
//! episodes, runs one search and always closes the connection, logging every
//! step to the console and to a file. Step failures are recorded in a
//! [`driver::RunReport`] instead of aborting the run.

pub mod config;
pub mod driver;
pub mod episodes;
pub mod logging;

#[cfg(test)]
mod test_support;

pub use config::{ConfigError, ConnectionConfig};
pub use driver::{run, ProbePlan, RunReport};
