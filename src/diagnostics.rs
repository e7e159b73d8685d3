use std::sync::Arc;
use tracing::{info, warn};

/// Sink for the client's informational and warning messages.
///
/// Components take a handle at construction instead of logging to a global,
/// so tests can capture exactly what a call reported.
pub trait Diagnostics: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
}

pub type SharedDiagnostics = Arc<dyn Diagnostics>;

/// Forwards everything to the process-wide `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn info(&self, message: &str) {
        info!("{}", message);
    }

    fn warn(&self, message: &str) {
        warn!("{}", message);
    }
}

pub fn tracing_sink() -> SharedDiagnostics {
    Arc::new(TracingDiagnostics)
}
