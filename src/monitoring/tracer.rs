/*!
 * Lifecycle Tracing
 * Structured tracing for lifecycle operations using the tracing crate
 *
 * Features:
 * - Trace ID generation for correlating one launch/terminate across log lines
 * - JSON-formatted logs for structured parsing
 * - Slow operation warnings
 */

use crate::core::limits::ENV_TRACE_JSON;
use std::time::{Duration, Instant};
use tracing::{debug, info, span, warn, Level, Span};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};
use uuid::Uuid;

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - DESKTOP_TRACE_JSON: Enable JSON output (default: false)
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(ENV_TRACE_JSON)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    // try_init: tests and embedders may already have installed a subscriber
    let result = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_line_number(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
    };

    if result.is_ok() {
        info!(json = use_json, "Structured tracing initialized");
    }
}

/// Generate a unique trace ID for request correlation
pub fn generate_trace_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span covering one lifecycle operation (launch, terminate, close_window...)
pub struct LifecycleSpan {
    span: Span,
    start: Instant,
    operation: &'static str,
    trace_id: String,
    slow_threshold: Duration,
}

impl LifecycleSpan {
    pub fn new(operation: &'static str, subject: &str, slow_threshold: Duration) -> Self {
        let trace_id = generate_trace_id();

        let span = span!(
            Level::DEBUG,
            "lifecycle",
            trace_id = %trace_id,
            operation = operation,
            subject = subject,
            pid = tracing::field::Empty,
            result = tracing::field::Empty,
            error = tracing::field::Empty,
        );

        span.in_scope(|| debug!(operation, subject, "lifecycle operation started"));

        Self {
            span,
            start: Instant::now(),
            operation,
            trace_id,
            slow_threshold,
        }
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    /// Span handle for `Instrument::instrument`
    pub fn span(&self) -> Span {
        self.span.clone()
    }

    pub fn record_pid(&self, pid: u32) {
        self.span.record("pid", pid);
    }

    pub fn record_result(&self, success: bool) {
        self.span
            .record("result", if success { "success" } else { "error" });
    }

    pub fn record_error(&self, error: &str) {
        self.span.record("error", error);
        self.span.record("result", "error");
    }
}

impl Drop for LifecycleSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        let _entered = self.span.enter();

        if duration > self.slow_threshold {
            warn!(
                trace_id = %self.trace_id,
                operation = self.operation,
                duration_ms = duration.as_millis() as u64,
                slow = true,
                "slow lifecycle operation"
            );
        } else {
            debug!(
                trace_id = %self.trace_id,
                operation = self.operation,
                duration_us = duration.as_micros() as u64,
                "lifecycle operation completed"
            );
        }
    }
}
