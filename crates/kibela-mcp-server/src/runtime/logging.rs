//! Subscriber setup for the server binary

mod defaults;
mod format_style;
mod log_rotation_kind;
mod parsers;

use format_style::FormatStyle;
use log_rotation_kind::LogRotationKind;
use schemars::JsonSchema;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer as _, Registry};

/// Where and how the server logs
#[derive(Debug, Deserialize, JsonSchema)]
pub struct Logging {
    /// Minimum level; `RUST_LOG` directives are added on top
    #[serde(
        default = "defaults::log_level",
        deserialize_with = "parsers::from_str"
    )]
    #[schemars(schema_with = "level")]
    pub level: Level,

    /// Directory for rolling log files. Logs go to stderr when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// How often the log file rolls over when `path` is set
    #[serde(default = "defaults::default_rotation")]
    pub rotation: LogRotationKind,

    #[serde(default = "defaults::default_format")]
    pub format: FormatStyle,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
            path: None,
            rotation: defaults::default_rotation(),
            format: defaults::default_format(),
        }
    }
}

type BoxedLayer = Box<dyn tracing_subscriber::Layer<Registry> + Send + Sync>;

impl Logging {
    /// Install the global subscriber. The returned guard flushes file logs
    /// when dropped, so it must live as long as the process.
    pub fn setup(&self) -> Result<Option<WorkerGuard>, anyhow::Error> {
        let (writer, guard, ansi) = self.writer();
        tracing_subscriber::registry()
            .with(self.layer(writer, ansi))
            .with(self.env_filter()?)
            .try_init()?;
        Ok(guard)
    }

    fn env_filter(&self) -> Result<EnvFilter, anyhow::Error> {
        let filter = EnvFilter::from_default_env().add_directive(self.level.into());
        Ok(if self.level == Level::INFO {
            filter.add_directive("rmcp=warn".parse()?)
        } else {
            filter
        })
    }

    fn layer<W>(&self, writer: W, ansi: bool) -> BoxedLayer
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_target(false)
            .with_ansi(ansi && self.format != FormatStyle::Json);

        match self.format {
            FormatStyle::Full => layer.boxed(),
            FormatStyle::Compact => layer.compact().boxed(),
            FormatStyle::Json => layer.json().boxed(),
            FormatStyle::Pretty => layer.pretty().boxed(),
        }
    }

    /// Stdout carries the stdio transport, so console output goes to stderr.
    /// A log file that cannot be opened falls back to stderr as well.
    fn writer(&self) -> (BoxMakeWriter, Option<WorkerGuard>, bool) {
        let stderr = || (BoxMakeWriter::new(std::io::stderr), None, true);
        let Some(path) = &self.path else {
            return stderr();
        };

        let appender = std::fs::create_dir_all(path)
            .map_err(anyhow::Error::from)
            .and_then(|_| {
                RollingFileAppender::builder()
                    .rotation(self.rotation.clone().into())
                    .filename_prefix("kibela_mcp_server")
                    .filename_suffix("log")
                    .build(path)
                    .map_err(anyhow::Error::from)
            });

        match appender {
            Ok(appender) => {
                let (writer, guard) = tracing_appender::non_blocking(appender);
                (BoxMakeWriter::new(writer), Some(guard), false)
            }
            Err(e) => {
                eprintln!(
                    "Could not open log directory {}: {e}; logging to stderr",
                    path.display()
                );
                stderr()
            }
        }
    }
}

fn level(generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
    /// Log level
    #[derive(JsonSchema)]
    #[schemars(rename_all = "lowercase")]
    #[allow(dead_code)]
    enum Level {
        Trace,
        Debug,
        Info,
        Warn,
        Error,
    }

    Level::json_schema(generator)
}
