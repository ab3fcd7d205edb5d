use crate::ephemeris::types::{Body, CelestialPosition, RawPosition, SkySnapshot};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur while resolving a body position
#[derive(Error, Debug, Clone)]
pub enum EphemerisError {
    #[error("Ephemeris file not found at path: {path}. {message}")]
    FileNotFound { path: String, message: String },
    #[error("Failed to calculate position for {body} at {datetime}: {message}")]
    CalculationFailed {
        body: Body,
        datetime: DateTime<Utc>,
        message: String,
    },
}

/// Anything that can place a body on the ecliptic at an instant.
///
/// Implementations may be slow (file-backed or remote computation), so the
/// call is async. A failure only concerns the one body and instant asked for.
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn position(
        &self,
        instant: DateTime<Utc>,
        body: Body,
    ) -> Result<RawPosition, EphemerisError>;
}

/// Resolve every requested body at `instant`.
///
/// Per-body failures are logged and recorded in `missing`; the snapshot
/// itself never fails.
pub async fn snapshot(
    source: &dyn PositionSource,
    instant: DateTime<Utc>,
    bodies: &[Body],
) -> SkySnapshot {
    let mut sky = SkySnapshot::new(instant);
    for &body in bodies {
        match source.position(instant, body).await {
            Ok(raw) => sky.insert(CelestialPosition::from_raw(body, raw)),
            Err(e) => {
                log::warn!("Position unavailable for {} at {}: {}", body, instant, e);
                sky.missing.push(body);
            }
        }
    }
    sky
}
