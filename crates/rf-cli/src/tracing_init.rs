use std::fmt::{self as stdfmt, Write as _};
use std::path::Path;

use anyhow::Result;
use rf_config::{LogFormat, LoggingConfig};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::{self, FmtContext, FormatEvent, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

// ---------------------------------------------------------------------------
// RuleEventFormat: `[domain] rule: message fields`
// ---------------------------------------------------------------------------

/// Plain-text event formatter that lifts the `domain` and `rule` fields out of
/// the key=value tail:
///
/// ```text
/// 2026-10-17T08:02:11Z DEBUG [eval] weather rule: rule triggered
/// 2026-10-17T08:02:11Z  INFO [exec] weather rule: rule applied facts="[rain=true]"
/// ```
///
/// Events without those fields are printed without the prefix.
pub struct RuleEventFormat {
    timer: SystemTime,
}

impl RuleEventFormat {
    pub fn new() -> Self {
        Self { timer: SystemTime }
    }
}

impl Default for RuleEventFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, N> FormatEvent<S, N> for RuleEventFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'writer> fmt::FormatFields<'writer> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: fmt::format::Writer<'_>,
        event: &Event<'_>,
    ) -> stdfmt::Result {
        let ansi = writer.has_ansi_escapes();

        if ansi {
            write!(writer, "\x1b[2m")?;
        }
        if self.timer.format_time(&mut writer).is_err() {
            write!(writer, "<unknown time>")?;
        }
        if ansi {
            write!(writer, "\x1b[0m")?;
        }

        let level = *event.metadata().level();
        if ansi {
            let color = match level {
                Level::ERROR => "31",
                Level::WARN => "33",
                Level::INFO => "32",
                Level::DEBUG => "34",
                Level::TRACE => "35",
            };
            write!(writer, " \x1b[{color}m{level:>5}\x1b[0m ")?;
        } else {
            write!(writer, " {level:>5} ")?;
        }

        let mut fields = PromotedFields::default();
        event.record(&mut fields);

        if let Some(domain) = &fields.domain {
            if ansi {
                write!(writer, "\x1b[1;36m[{domain}]\x1b[0m ")?;
            } else {
                write!(writer, "[{domain}] ")?;
            }
        }
        if let Some(rule) = &fields.rule {
            if ansi {
                write!(writer, "\x1b[1m{rule}\x1b[0m: ")?;
            } else {
                write!(writer, "{rule}: ")?;
            }
        }

        write!(writer, "{}", fields.message)?;

        if !fields.rest.is_empty() {
            if ansi {
                write!(writer, " \x1b[3m{}\x1b[0m", fields.rest)?;
            } else {
                write!(writer, " {}", fields.rest)?;
            }
        }

        writeln!(writer)
    }
}

// ---------------------------------------------------------------------------
// PromotedFields: splits domain/rule/message from the remaining fields
// ---------------------------------------------------------------------------

#[derive(Default)]
struct PromotedFields {
    domain: Option<String>,
    rule: Option<String>,
    message: String,
    rest: String,
}

impl PromotedFields {
    fn push_rest(&mut self, name: &str, value: impl stdfmt::Display) {
        if !self.rest.is_empty() {
            self.rest.push(' ');
        }
        write!(&mut self.rest, "{name}={value}").ok();
    }
}

impl Visit for PromotedFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "domain" => self.domain = Some(value.to_string()),
            "rule" => self.rule = Some(value.to_string()),
            "message" => self.message = value.to_string(),
            name => self.push_rest(name, format_args!("{value:?}")),
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn stdfmt::Debug) {
        match field.name() {
            "domain" => self.domain = Some(format!("{value:?}").trim_matches('"').to_string()),
            "rule" => self.rule = Some(format!("{value:?}").trim_matches('"').to_string()),
            "message" => {
                write!(&mut self.message, "{value:?}").ok();
            }
            name => self.push_rest(name, format_args!("{value:?}")),
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push_rest(field.name(), value);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push_rest(field.name(), value);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push_rest(field.name(), value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push_rest(field.name(), value);
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// `RUST_LOG` when set, else the directives from `config`.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if std::env::var("RUST_LOG").is_ok() {
        return Ok(EnvFilter::from_default_env());
    }
    let directives = config.filter_directives();
    EnvFilter::try_new(&directives)
        .map_err(|e| anyhow::anyhow!("invalid log filter '{directives}': {e}"))
}

pub(crate) fn layer_for<W>(format: LogFormat, writer: W, ansi: bool, filter: EnvFilter) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(false)
            .with_ansi(false)
            .with_writer(writer)
            .with_filter(filter)
            .boxed(),
        LogFormat::Plain => fmt::layer()
            .event_format(RuleEventFormat::new())
            .with_ansi(ansi)
            .with_writer(writer)
            .with_filter(filter)
            .boxed(),
    }
}

/// Install the global subscriber described by `config`: stderr always, plus
/// the optional log file resolved against `base_dir`.
///
/// The returned guard flushes the file writer when dropped and must live
/// until the process exits. Fails if a global subscriber is already set.
pub fn init_tracing(config: &LoggingConfig, base_dir: &Path) -> Result<Option<WorkerGuard>> {
    let mut layers: Vec<BoxedLayer> = vec![layer_for(
        config.format,
        std::io::stderr,
        true,
        build_filter(config)?,
    )];

    let mut guard = None;
    if let Some(file) = &config.file {
        let resolved = if file.is_relative() {
            base_dir.join(file)
        } else {
            file.clone()
        };
        let dir = resolved
            .parent()
            .ok_or_else(|| anyhow::anyhow!("log file path has no parent directory"))?;
        std::fs::create_dir_all(dir)?;
        let file_name = resolved
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("log file path has no file name"))?;

        let (writer, file_guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
        layers.push(layer_for(config.format, writer, false, build_filter(config)?));
        guard = Some(file_guard);
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;
    Ok(guard)
}
