use std::fmt;
use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::{DefaultFields, Writer};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Log file written in the working directory unless overridden.
pub const DEFAULT_LOG_FILE: &str = "graph_probe_debug.log";

/// Our own code and the Bolt driver at debug; pool and transport chatter at
/// info; everything else only when it warns.
pub const DEFAULT_DIRECTIVES: &str =
    "warn,graph_probe=debug,graph_client=debug,neo4rs=debug,deadpool=info,tokio=info";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct LogSettings {
    pub file: PathBuf,
    /// Overrides both `RUST_LOG` and [`DEFAULT_DIRECTIVES`] when set.
    pub directives: Option<String>,
}

impl Default for LogSettings {
    fn default() -> Self {
        LogSettings {
            file: PathBuf::from(DEFAULT_LOG_FILE),
            directives: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Line format
// ---------------------------------------------------------------------------

/// `2025-06-01 12:30:00 - graph_probe::driver - INFO - message key=value`
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        write!(
            writer,
            "{} - {} - {} - ",
            chrono::Local::now().format(TIMESTAMP_FORMAT),
            meta.target(),
            meta.level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// A `fmt` layer using [`LineFormat`] that writes to `make_writer`.
pub fn line_layer<S, W>(
    make_writer: W,
    ansi: bool,
) -> tracing_subscriber::fmt::Layer<S, DefaultFields, LineFormat, W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    tracing_subscriber::fmt::layer()
        .event_format(LineFormat)
        .with_ansi(ansi)
        .with_writer(make_writer)
}

fn filter(settings: &LogSettings) -> Result<EnvFilter> {
    match &settings.directives {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log directives '{directives}'")),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))),
    }
}

/// Install the process-wide subscriber: console plus an append-only file.
///
/// Call once, from `main`. A second call fails because a global subscriber
/// is already set.
pub fn init(settings: &LogSettings) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.file)
        .with_context(|| format!("failed to open log file {}", settings.file.display()))?;

    tracing_subscriber::registry()
        .with(filter(settings)?)
        .with(line_layer(std::io::stdout, std::io::stdout().is_terminal()))
        .with(line_layer(Mutex::new(file), false))
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(())
}
