use crate::ephemeris::Body;
use thiserror::Error;

/// Lunar phase needs both luminaries at the same instant.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhaseError {
    #[error("Phase calculation failed: {0} position unavailable")]
    MissingBody(Body),
}

/// Reasons a void window is not reported. None of these reach callers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VoidWindowError {
    #[error("Void window needs the {0} position")]
    MissingReference(Body),
    #[error("{0} is not moving forward; no sign exit to project")]
    NotProgressing(Body),
    #[error("Implausible void window of {hours:.1}h (allowed: 0 < d < {ceiling_hours}h)")]
    Implausible { hours: f64, ceiling_hours: f64 },
}

/// Request-level failures. Everything else degrades to a lower-confidence
/// or empty result.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Position source outage: no body resolved for any of {instants} instants")]
    SourceOutage { instants: usize },
    #[error("Day scan task failed: {0}")]
    ScanTask(#[from] tokio::task::JoinError),
}
