//! Lunar phase from the Sun-Moon elongation.
//!
//! The 360° cycle is cut into eight 45° buckets starting at the conjunction:
//! `[0,45)` new, `[45,90)` waxing crescent, ... `[315,360)` waning crescent.

use crate::ephemeris::{normalize_degrees, Body, SkySnapshot};
use crate::error::PhaseError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const BUCKET_WIDTH: f64 = 45.0;

/// Illumination reported when the phase cannot be computed
pub const NEUTRAL_ILLUMINATION: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LunarPhase {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
    Unknown,
}

impl LunarPhase {
    pub const CYCLE: [LunarPhase; 8] = [
        LunarPhase::New,
        LunarPhase::WaxingCrescent,
        LunarPhase::FirstQuarter,
        LunarPhase::WaxingGibbous,
        LunarPhase::Full,
        LunarPhase::WaningGibbous,
        LunarPhase::LastQuarter,
        LunarPhase::WaningCrescent,
    ];

    pub fn from_angle(angle: f64) -> Self {
        let bucket = (normalize_degrees(angle) / BUCKET_WIDTH).floor() as usize;
        Self::CYCLE[bucket.min(7)]
    }

    /// Half-open `[start, end)` range of phase angles, `None` for `Unknown`
    pub fn angle_range(&self) -> Option<(f64, f64)> {
        Self::CYCLE
            .iter()
            .position(|p| p == self)
            .map(|i| (i as f64 * BUCKET_WIDTH, (i + 1) as f64 * BUCKET_WIDTH))
    }

    pub fn is_waxing(&self) -> bool {
        matches!(
            self,
            LunarPhase::WaxingCrescent | LunarPhase::FirstQuarter | LunarPhase::WaxingGibbous
        )
    }

    pub fn is_waning(&self) -> bool {
        matches!(
            self,
            LunarPhase::WaningGibbous | LunarPhase::LastQuarter | LunarPhase::WaningCrescent
        )
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LunarPhase::New => "New Moon",
            LunarPhase::WaxingCrescent => "Waxing Crescent",
            LunarPhase::FirstQuarter => "First Quarter",
            LunarPhase::WaxingGibbous => "Waxing Gibbous",
            LunarPhase::Full => "Full Moon",
            LunarPhase::WaningGibbous => "Waning Gibbous",
            LunarPhase::LastQuarter => "Last Quarter",
            LunarPhase::WaningCrescent => "Waning Crescent",
            LunarPhase::Unknown => "an unknown lunar phase",
        }
    }
}

impl fmt::Display for LunarPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CyclicalPhase {
    pub phase: LunarPhase,
    /// Moon minus Sun longitude, 0-360
    pub angle: f64,
    /// Illuminated fraction of the disc, 0-1
    pub illumination: f64,
}

impl CyclicalPhase {
    pub fn from_angle(angle: f64) -> Self {
        let angle = normalize_degrees(angle);
        Self {
            phase: LunarPhase::from_angle(angle),
            angle,
            illumination: illumination(angle),
        }
    }

    pub fn unknown() -> Self {
        Self {
            phase: LunarPhase::Unknown,
            angle: 0.0,
            illumination: NEUTRAL_ILLUMINATION,
        }
    }
}

pub fn phase_angle(sun_longitude: f64, moon_longitude: f64) -> f64 {
    normalize_degrees(moon_longitude - sun_longitude + 360.0)
}

/// Same formula for every bucket: 0 at new, 1 at full.
pub fn illumination(angle: f64) -> f64 {
    ((1.0 - angle.to_radians().cos()) / 2.0).clamp(0.0, 1.0)
}

pub fn lunar_phase(sky: &SkySnapshot) -> Result<CyclicalPhase, PhaseError> {
    let sun = sky.get(Body::Sun).ok_or(PhaseError::MissingBody(Body::Sun))?;
    let moon = sky.get(Body::Moon).ok_or(PhaseError::MissingBody(Body::Moon))?;
    Ok(CyclicalPhase::from_angle(phase_angle(sun.longitude, moon.longitude)))
}

/// Lunar phase, or the neutral `Unknown` phase when a luminary is missing.
pub fn phase_or_fallback(sky: &SkySnapshot) -> CyclicalPhase {
    lunar_phase(sky).unwrap_or_else(|e| {
        log::warn!("{} at {}; using neutral phase", e, sky.instant);
        CyclicalPhase::unknown()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_edges() {
        assert_eq!(LunarPhase::from_angle(0.0), LunarPhase::New);
        assert_eq!(LunarPhase::from_angle(44.999), LunarPhase::New);
        assert_eq!(LunarPhase::from_angle(45.0), LunarPhase::WaxingCrescent);
        assert_eq!(LunarPhase::from_angle(180.0), LunarPhase::Full);
        assert_eq!(LunarPhase::from_angle(359.999), LunarPhase::WaningCrescent);
        assert_eq!(LunarPhase::from_angle(360.0), LunarPhase::New);
    }

    #[test]
    fn test_illumination_extremes() {
        assert!(illumination(0.0).abs() < 1e-12);
        assert!((illumination(180.0) - 1.0).abs() < 1e-12);
        assert!((illumination(90.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_phase_angle_wraps() {
        assert!((phase_angle(350.0, 10.0) - 20.0).abs() < 1e-9);
        assert!((phase_angle(10.0, 350.0) - 340.0).abs() < 1e-9);
    }

    #[test]
    fn test_serde_names_are_kebab_case() {
        let json = serde_json::to_string(&LunarPhase::WaxingCrescent).unwrap();
        assert_eq!(json, "\"waxing-crescent\"");
    }
}
