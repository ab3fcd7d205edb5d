#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use kairos::ephemeris::{Body, EphemerisError, LinearMotionSource, PositionSource, RawPosition};
use kairos::services::{Explanation, ExplanationError, ExplanationService};
use kairos::timing::{ActivityCategory, Recommendation};

/// 2024-01-07, a Sunday
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 7, 0, 0, 0).unwrap()
}

/// Moon early in Aries, waxing gibbous, with its next void starting around
/// 46h in (Saturn conjunction) and lasting until the Taurus ingress at ~52h.
pub fn business_sky(mercury_speed: f64) -> LinearMotionSource {
    LinearMotionSource::new(epoch())
        .with_body(Body::Sun, 200.0, 0.98)
        .with_body(Body::Moon, 2.0, 13.0)
        .with_body(Body::Mercury, 190.0, mercury_speed)
        .with_body(Body::Venus, 230.0, 1.1)
        .with_body(Body::Mars, 100.0, 0.6)
        .with_body(Body::Jupiter, 75.0, 0.1)
        .with_body(Body::Saturn, 27.0, 0.0)
}

/// A recorded sky that cannot place some bodies.
pub struct FlakySource {
    pub inner: LinearMotionSource,
    pub failing: Vec<Body>,
}

#[async_trait]
impl PositionSource for FlakySource {
    async fn position(&self, instant: DateTime<Utc>, body: Body) -> Result<RawPosition, EphemerisError> {
        if self.failing.contains(&body) {
            return Err(EphemerisError::CalculationFailed {
                body,
                datetime: instant,
                message: "simulated failure".to_string(),
            });
        }
        self.inner.position(instant, body).await
    }
}

pub struct DownSource;

#[async_trait]
impl PositionSource for DownSource {
    async fn position(&self, _instant: DateTime<Utc>, _body: Body) -> Result<RawPosition, EphemerisError> {
        Err(EphemerisError::FileNotFound {
            path: "/nonexistent".to_string(),
            message: "no ephemeris data".to_string(),
        })
    }
}

pub struct CannedExplainer;

#[async_trait]
impl ExplanationService for CannedExplainer {
    async fn explain(
        &self,
        activity: &str,
        _category: ActivityCategory,
        recommendation: &Recommendation,
    ) -> Result<Explanation, ExplanationError> {
        Ok(Explanation {
            summary: format!("Rank {} for {}", recommendation.rank, activity),
            reasoning: "canned".to_string(),
            advice: "canned".to_string(),
            templated: false,
        })
    }
}

pub struct BrokenExplainer;

#[async_trait]
impl ExplanationService for BrokenExplainer {
    async fn explain(
        &self,
        _activity: &str,
        _category: ActivityCategory,
        _recommendation: &Recommendation,
    ) -> Result<Explanation, ExplanationError> {
        Err(ExplanationError::Unavailable("timeout".to_string()))
    }
}
