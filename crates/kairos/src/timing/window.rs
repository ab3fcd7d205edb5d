use crate::cycles::{CyclicalPhase, VoidWindow};
use crate::ephemeris::Body;
use crate::services::Explanation;
use crate::timing::hours::PlanetaryHour;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Factor name -> signed contribution, in a stable order
pub type FactorMap = BTreeMap<String, f64>;

pub mod factor {
    pub const BASELINE: &str = "baseline";
    pub const RULING_HOUR: &str = "ruling_hour";
    pub const LUNAR_PHASE: &str = "lunar_phase";
    pub const PLANETARY_STRENGTH: &str = "planetary_strength";
    pub const VOID_MOON: &str = "void_moon";
    pub const PREFERRED_HOURS: &str = "preferred_hours";

    pub const WINDOW_SCORE: &str = "window_score";
    pub const RULING_MATCH: &str = "ruling_match";
    pub const PHASE_FAVOR: &str = "phase_favor";
    pub const RETROGRADE: &str = "retrograde";
    pub const VOID_DURATION: &str = "void_duration";
    pub const PERSONALIZATION: &str = "personalization";
    pub const URGENCY: &str = "urgency";
}

/// One scored hour of the horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Whole days after the request's local date
    pub day_offset: u32,
    /// Scanner score, 0-1
    pub score: f64,
    pub factors: FactorMap,
    pub phase: CyclicalPhase,
    pub planetary_hour: PlanetaryHour,
    /// Whether the ruling body's hour lists the requested activity
    pub ruling_match: bool,
    pub void_moon: Option<VoidWindow>,
    pub retrograde_impacts: Vec<Body>,
    /// Mean signed contact of favorable transits with the natal chart, -1..1
    pub personal_resonance: Option<f64>,
}

impl TimeWindow {
    pub fn ruling_body(&self) -> Body {
        self.planetary_hour.ruler
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// 1-based
    pub rank: usize,
    pub window: TimeWindow,
    pub final_score: f64,
    pub confidence: f64,
    pub breakdown: FactorMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Explanation>,
}

impl Recommendation {
    pub fn positive_factors(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.breakdown.iter().filter(|(_, v)| **v > 0.0)
    }

    pub fn negative_factors(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.breakdown.iter().filter(|(_, v)| **v < 0.0)
    }
}
