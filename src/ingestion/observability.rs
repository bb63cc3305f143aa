//! Outcome reporting for parse attempts.
//!
//! Observers are attached through [`super::ParseOptions::observer`] and see one callback per
//! parse: `on_success` or `on_failure`, plus `on_alert` when a failure reaches the configured
//! severity threshold.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::json;

use crate::error::IngestionError;
use crate::types::DataKind;

use super::unified::IngestionFormat;

/// How serious a failed parse is. Ordered, so thresholds compare with `>=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    Info,
    /// The upload was readable but held nothing usable.
    Warning,
    /// The upload could not be parsed.
    Error,
    /// The file could not be read at all.
    Critical,
}

impl IngestionSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestionSeverity::Info => "info",
            IngestionSeverity::Warning => "warning",
            IngestionSeverity::Error => "error",
            IngestionSeverity::Critical => "critical",
        }
    }
}

impl fmt::Display for IngestionSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a parse attempt's input came from.
#[derive(Debug, Clone)]
pub struct IngestionContext {
    /// File path, `<bytes>.{ext}` for in-memory uploads, or `<text>` for direct text input.
    pub source: String,
    /// Format used for decoding; `None` when it could not be determined.
    pub format: Option<IngestionFormat>,
}

impl IngestionContext {
    fn format_label(&self) -> &'static str {
        self.format.map(|f| f.as_str()).unwrap_or("unknown")
    }
}

/// Counts reported for a successful parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionStats {
    pub kind: DataKind,
    /// Decoded data rows, before filtering.
    pub rows: usize,
    /// Records in the result.
    pub records: usize,
}

/// Receives parse outcomes. All methods default to no-ops.
pub trait IngestionObserver: Send + Sync {
    fn on_success(&self, _ctx: &IngestionContext, _stats: IngestionStats) {}

    fn on_failure(&self, _ctx: &IngestionContext, _severity: IngestionSeverity, _error: &IngestionError) {}

    /// Called in addition to `on_failure` once the severity reaches the alert threshold.
    ///
    /// Forwards to [`Self::on_failure`] unless overridden.
    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Fans every callback out to several observers, in order.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn IngestionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl IngestionObserver for CompositeObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.observers.iter().for_each(|o| o.on_success(ctx, stats));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.observers.iter().for_each(|o| o.on_failure(ctx, severity, error));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.observers.iter().for_each(|o| o.on_alert(ctx, severity, error));
    }
}

/// Prints one line per event to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl IngestionObserver for StdErrObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        eprintln!(
            "[ads-ingest] parsed {} ({}): {} {} records from {} rows",
            ctx.source,
            ctx.format_label(),
            stats.records,
            stats.kind,
            stats.rows
        );
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        eprintln!("[ads-ingest] {severity}: {} ({}): {error}", ctx.source, ctx.format_label());
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        eprintln!("[ads-ingest] ALERT {severity}: {} ({}): {error}", ctx.source, ctx.format_label());
    }
}

/// Emits `tracing` events: `info` on success, `warn`/`error` on failure by severity.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl IngestionObserver for TracingObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        tracing::info!(
            source = %ctx.source,
            format = ctx.format_label(),
            kind = %stats.kind,
            rows = stats.rows,
            records = stats.records,
            "parsed ads export"
        );
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        let format = ctx.format_label();
        match severity {
            IngestionSeverity::Info => {
                tracing::info!(source = %ctx.source, format, %error, "ads export parse failed")
            }
            IngestionSeverity::Warning => {
                tracing::warn!(source = %ctx.source, format, %error, "ads export parse failed")
            }
            IngestionSeverity::Error | IngestionSeverity::Critical => {
                tracing::error!(source = %ctx.source, format, %severity, %error, "ads export parse failed")
            }
        }
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        tracing::error!(
            alert = true,
            source = %ctx.source,
            format = ctx.format_label(),
            %severity,
            %error,
            "ads export parse alert"
        );
    }
}

/// Appends one JSON object per event to a log file (JSON Lines).
///
/// Writing is best effort: a log file that cannot be opened or written never fails a parse.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append(&self, event: serde_json::Value) {
        let _guard = self.lock.lock().ok();
        let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&self.path) else {
            return;
        };
        let _ = writeln!(file, "{event}");
    }

    fn failure_event(
        event: &str,
        ctx: &IngestionContext,
        severity: IngestionSeverity,
        error: &IngestionError,
    ) -> serde_json::Value {
        json!({
            "ts": unix_ts(),
            "event": event,
            "severity": severity.as_str(),
            "source": ctx.source,
            "format": ctx.format_label(),
            "error": error.to_string(),
        })
    }
}

impl IngestionObserver for FileObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.append(json!({
            "ts": unix_ts(),
            "event": "parsed",
            "source": ctx.source,
            "format": ctx.format_label(),
            "kind": stats.kind,
            "rows": stats.rows,
            "records": stats.records,
        }));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.append(Self::failure_event("failed", ctx, severity, error));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.append(Self::failure_event("alert", ctx, severity, error));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severities_order_for_thresholds() {
        assert!(IngestionSeverity::Critical > IngestionSeverity::Error);
        assert!(IngestionSeverity::Warning >= IngestionSeverity::Warning);
        assert!(IngestionSeverity::Info < IngestionSeverity::Warning);
        assert_eq!(IngestionSeverity::Warning.to_string(), "warning");
    }

    #[test]
    fn unknown_format_label() {
        let ctx = IngestionContext {
            source: "report.pdf".to_string(),
            format: None,
        };
        assert_eq!(ctx.format_label(), "unknown");
    }
}
