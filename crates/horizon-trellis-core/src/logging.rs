//! Logging facilities for Horizon Trellis.
//!
//! Horizon Trellis uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!     // Your application code...
//! }
//! ```
//!
//! Layout passes are wrapped in [`PerfSpan`]s so a profiler or a
//! span-aware subscriber can attribute time to them.

/// Span names used throughout Horizon Trellis for tracing.
pub mod span_names {
    /// A full grid layout pass (snapshot + placement).
    pub const LAYOUT_PASS: &str = "horizon_trellis::layout_pass";
    /// A minimum-size computation for one candidate size.
    pub const MIN_SIZE: &str = "horizon_trellis::min_size";
    /// Widget painting.
    pub const PAINT: &str = "horizon_trellis::paint";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_trellis_core::signal";
    /// Object model target.
    pub const OBJECT: &str = "horizon_trellis_core::object";
    /// Worker pool target.
    pub const THREADPOOL: &str = "horizon_trellis_core::threadpool";
    /// Layout engine target.
    pub const LAYOUT: &str = "horizon_trellis::layout";
    /// Widget target.
    pub const WIDGET: &str = "horizon_trellis::widget";
    /// Toolkit startup and configuration target.
    pub const TOOLKIT: &str = "horizon_trellis::toolkit";
}

/// A guard for timing a specific operation.
///
/// The span stays entered until the guard is dropped.
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_trellis::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);
        let _span = PerfSpan::new(span_names::LAYOUT_PASS);
        tracing::debug!(target: targets::LAYOUT, "inside perf span");
    }

    #[test]
    fn test_targets_are_namespaced() {
        assert!(targets::SIGNAL.starts_with("horizon_trellis_core::"));
        assert!(targets::OBJECT.starts_with("horizon_trellis_core::"));
        assert!(targets::LAYOUT.starts_with("horizon_trellis::"));
    }
}
