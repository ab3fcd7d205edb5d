//! Deterministic position source built from an epoch and per-body motion.
//!
//! Each body advances linearly from its epoch longitude at a constant speed.
//! Good enough for replaying a recorded sky over a few weeks, and fully
//! reproducible, which is what tests and benches need.

use crate::ephemeris::source::{EphemerisError, PositionSource};
use crate::ephemeris::types::{normalize_degrees, Body, RawPosition};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

fn default_distance() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyMotion {
    /// Longitude at the epoch, degrees
    pub longitude: f64,
    /// Degrees per day; negative for retrograde
    pub speed: f64,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default = "default_distance")]
    pub distance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearMotionSource {
    pub epoch: DateTime<Utc>,
    pub bodies: BTreeMap<Body, BodyMotion>,
}

impl LinearMotionSource {
    pub fn new(epoch: DateTime<Utc>) -> Self {
        Self {
            epoch,
            bodies: BTreeMap::new(),
        }
    }

    pub fn with_body(mut self, body: Body, longitude: f64, speed: f64) -> Self {
        self.bodies.insert(
            body,
            BodyMotion {
                longitude,
                speed,
                latitude: 0.0,
                distance: default_distance(),
            },
        );
        self
    }

    /// Parse a recorded sky, e.g.
    /// `{"epoch": "2024-01-07T00:00:00Z", "bodies": {"moon": {"longitude": 2.0, "speed": 13.0}}}`
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    fn days_since_epoch(&self, instant: DateTime<Utc>) -> f64 {
        (instant - self.epoch).num_milliseconds() as f64 / MILLIS_PER_DAY
    }
}

#[async_trait]
impl PositionSource for LinearMotionSource {
    async fn position(
        &self,
        instant: DateTime<Utc>,
        body: Body,
    ) -> Result<RawPosition, EphemerisError> {
        let motion = self
            .bodies
            .get(&body)
            .ok_or_else(|| EphemerisError::CalculationFailed {
                body,
                datetime: instant,
                message: "body not present in recorded sky".to_string(),
            })?;

        let days = self.days_since_epoch(instant);
        Ok(RawPosition {
            longitude: normalize_degrees(motion.longitude + motion.speed * days),
            latitude: motion.latitude,
            distance: motion.distance,
            speed: motion.speed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[tokio::test]
    async fn test_linear_motion_advances_and_wraps() {
        let epoch = Utc.with_ymd_and_hms(2024, 1, 7, 0, 0, 0).unwrap();
        let source = LinearMotionSource::new(epoch).with_body(Body::Moon, 355.0, 12.0);

        let later = source.position(epoch + Duration::hours(12), Body::Moon).await.unwrap();
        assert!((later.longitude - 1.0).abs() < 1e-9);

        let missing = source.position(epoch, Body::Mars).await;
        assert!(matches!(missing, Err(EphemerisError::CalculationFailed { body: Body::Mars, .. })));
    }

    #[test]
    fn test_from_json_defaults() {
        let json = r#"{"epoch":"2024-01-07T00:00:00Z","bodies":{"mercury":{"longitude":190.0,"speed":-0.4}}}"#;
        let source = LinearMotionSource::from_json(json).unwrap();
        let mercury = source.bodies[&Body::Mercury];
        assert_eq!(mercury.distance, 1.0);
        assert_eq!(mercury.latitude, 0.0);
        assert!(mercury.speed < 0.0);
    }
}
