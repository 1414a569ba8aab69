//! Structured JSON logger
//!
//! - One log line = one event
//! - `event` first, then `severity`, then fields sorted by key
//! - Synchronous, no buffering
//! - Events below the minimum severity are dropped
//! - Output goes to stdout (stderr for ERROR and FATAL) unless a sink is installed

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Per-statement detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
    /// Invariant violations surfaced to the caller
    Fatal = 4,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Receives every rendered log line (without the trailing newline).
///
/// The sink runs without any logger lock held, so it may log or
/// reconfigure the logger itself.
pub type LogSink = Box<dyn Fn(Severity, &str) + Send + Sync>;

struct LoggerState {
    min_severity: Severity,
    sink: Option<Arc<dyn Fn(Severity, &str) + Send + Sync>>,
}

static STATE: LazyLock<RwLock<LoggerState>> = LazyLock::new(|| {
    RwLock::new(LoggerState {
        min_severity: Severity::Warn,
        sink: None,
    })
});

/// A structured logger that outputs JSON lines
pub struct Logger;

impl Logger {
    /// Sets the lowest severity that is emitted. Defaults to WARN.
    pub fn set_min_severity(severity: Severity) {
        STATE
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .min_severity = severity;
    }

    /// Returns the current minimum severity
    pub fn min_severity() -> Severity {
        STATE
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .min_severity
    }

    /// Routes log lines to `sink` instead of stdout/stderr
    pub fn set_sink(sink: LogSink) {
        STATE.write().unwrap_or_else(PoisonError::into_inner).sink = Some(Arc::from(sink));
    }

    /// Restores the stdout/stderr output
    pub fn reset_sink() {
        STATE.write().unwrap_or_else(PoisonError::into_inner).sink = None;
    }

    /// Returns whether an event at `severity` would be emitted
    pub fn enabled(severity: Severity) -> bool {
        severity >= Self::min_severity()
    }

    /// Log an event with the given severity and fields
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        let sink = {
            let state = STATE.read().unwrap_or_else(PoisonError::into_inner);
            if severity < state.min_severity {
                return;
            }
            state.sink.clone()
        };

        let line = render(severity, event, fields);
        match sink {
            Some(sink) => sink(severity, &line),
            None if severity >= Severity::Error => write_line(&mut io::stderr(), &line),
            None => write_line(&mut io::stdout(), &line),
        }
    }

    /// Log at TRACE level
    pub fn trace(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Trace, event, fields);
    }

    /// Log at INFO level
    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Info, event, fields);
    }

    /// Log at WARN level
    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Warn, event, fields);
    }

    /// Log at ERROR level
    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Error, event, fields);
    }

    /// Log at FATAL level
    pub fn fatal(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Fatal, event, fields);
    }
}

fn write_line<W: Write>(writer: &mut W, line: &str) {
    // One write per line so concurrent events do not interleave
    let mut buf = String::with_capacity(line.len() + 1);
    buf.push_str(line);
    buf.push('\n');
    let _ = writer.write_all(buf.as_bytes());
    let _ = writer.flush();
}

/// Renders one event as a JSON object
pub(crate) fn render(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut output = String::with_capacity(256);

    output.push('{');

    output.push_str("\"event\":\"");
    escape_json_string(&mut output, event);
    output.push('"');

    output.push_str(",\"severity\":\"");
    output.push_str(severity.as_str());
    output.push('"');

    let mut sorted_fields: Vec<_> = fields.iter().collect();
    sorted_fields.sort_by_key(|(k, _)| *k);

    for (key, value) in sorted_fields {
        output.push_str(",\"");
        escape_json_string(&mut output, key);
        output.push_str("\":\"");
        escape_json_string(&mut output, value);
        output.push('"');
    }

    output.push('}');
    output
}

fn escape_json_string(output: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            c if c.is_control() => {
                output.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => output.push(c),
        }
    }
}
