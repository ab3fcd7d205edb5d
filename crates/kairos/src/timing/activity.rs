//! Activity categories and their static scoring profiles.

use crate::cycles::LunarPhase;
use crate::ephemeris::Body;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityCategory {
    Business,
    Relationships,
    Health,
    Travel,
    Finance,
    Creative,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown activity category: {0}")]
pub struct UnknownCategory(pub String);

/// Health activities that follow the waning Moon (release rather than build)
const WANING_HEALTH_ACTIVITIES: &[&str] = &["detox", "diet", "surgery"];

impl ActivityCategory {
    pub const ALL: [ActivityCategory; 6] = [
        ActivityCategory::Business,
        ActivityCategory::Relationships,
        ActivityCategory::Health,
        ActivityCategory::Travel,
        ActivityCategory::Finance,
        ActivityCategory::Creative,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ActivityCategory::Business => "business",
            ActivityCategory::Relationships => "relationships",
            ActivityCategory::Health => "health",
            ActivityCategory::Travel => "travel",
            ActivityCategory::Finance => "finance",
            ActivityCategory::Creative => "creative",
        }
    }

    /// Whether the Moon's phase suits `activity` in this category.
    pub fn phase_favors(&self, profile: &ActivityProfile, phase: LunarPhase, activity: &str) -> bool {
        if phase == LunarPhase::Unknown {
            return false;
        }
        match self {
            ActivityCategory::Health if WANING_HEALTH_ACTIVITIES.contains(&activity) => {
                phase.is_waning() || phase == LunarPhase::New
            }
            _ => profile.favors_phase(phase),
        }
    }

    /// 0-1 suitability of the lunar phase; neutral when the phase is unknown.
    pub fn phase_suitability(&self, profile: &ActivityProfile, phase: LunarPhase, activity: &str) -> f64 {
        if phase == LunarPhase::Unknown {
            0.5
        } else if self.phase_favors(profile, phase, activity) {
            1.0
        } else {
            0.4
        }
    }
}

impl fmt::Display for ActivityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ActivityCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ActivityCategory::ALL
            .iter()
            .copied()
            .find(|c| c.key() == lower)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    #[default]
    Normal,
    Urgent,
    Flexible,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown urgency: {0}")]
pub struct UnknownUrgency(pub String);

impl FromStr for Urgency {
    type Err = UnknownUrgency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(Urgency::Normal),
            "urgent" => Ok(Urgency::Urgent),
            "flexible" => Ok(Urgency::Flexible),
            _ => Err(UnknownUrgency(s.to_string())),
        }
    }
}

/// Local hour range `[start, end)`; wraps past midnight when `start > end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourRange {
    pub start: u32,
    pub end: u32,
}

impl HourRange {
    pub fn contains(&self, hour: u32) -> bool {
        if self.start <= self.end {
            self.start <= hour && hour < self.end
        } else {
            hour >= self.start || hour < self.end
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityProfile {
    pub category: ActivityCategory,
    /// Activity keys accepted for this category
    pub activities: Vec<String>,
    pub favorable_bodies: Vec<Body>,
    /// Bodies whose retrograde motion penalizes this category
    pub avoid_retrograde: Vec<Body>,
    pub favorable_phases: Vec<LunarPhase>,
    pub baseline_confidence: f64,
    pub preferred_hours: HourRange,
    /// Weight of each zodiacal segment (Aries..Pisces) for strength scoring
    pub segment_weights: [f64; 12],
}

impl ActivityProfile {
    pub fn supports_activity(&self, activity: &str) -> bool {
        self.activities.iter().any(|a| a == activity)
    }

    pub fn favors_phase(&self, phase: LunarPhase) -> bool {
        self.favorable_phases.contains(&phase)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileTable {
    pub profiles: Vec<ActivityProfile>,
}

impl ProfileTable {
    pub fn get(&self, category: ActivityCategory) -> Option<&ActivityProfile> {
        self.profiles.iter().find(|p| p.category == category)
    }

    pub fn standard() -> Self {
        use LunarPhase::*;

        let names = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        Self {
            profiles: vec![
                ActivityProfile {
                    category: ActivityCategory::Business,
                    activities: names(&["meeting", "negotiation", "contract", "launch", "presentation", "hiring", "networking", "planning"]),
                    favorable_bodies: vec![Body::Mercury, Body::Jupiter, Body::Sun, Body::Saturn],
                    avoid_retrograde: vec![Body::Mercury],
                    favorable_phases: vec![New, WaxingCrescent, FirstQuarter, WaxingGibbous],
                    baseline_confidence: 0.7,
                    preferred_hours: HourRange { start: 9, end: 17 },
                    segment_weights: [0.6, 0.8, 0.7, 0.4, 0.7, 0.9, 0.7, 0.5, 0.6, 1.0, 0.6, 0.3],
                },
                ActivityProfile {
                    category: ActivityCategory::Relationships,
                    activities: names(&["date", "proposal", "wedding", "reconciliation", "social", "family"]),
                    favorable_bodies: vec![Body::Venus, Body::Moon, Body::Jupiter],
                    avoid_retrograde: vec![Body::Venus],
                    favorable_phases: vec![WaxingCrescent, FirstQuarter, WaxingGibbous, Full],
                    baseline_confidence: 0.65,
                    preferred_hours: HourRange { start: 18, end: 23 },
                    segment_weights: [0.4, 0.9, 0.6, 0.8, 0.7, 0.4, 1.0, 0.6, 0.5, 0.3, 0.5, 0.8],
                },
                ActivityProfile {
                    category: ActivityCategory::Health,
                    activities: names(&["exercise", "surgery", "diet", "checkup", "detox"]),
                    favorable_bodies: vec![Body::Sun, Body::Mars, Body::Moon],
                    avoid_retrograde: vec![Body::Mars],
                    favorable_phases: vec![New, WaxingCrescent, FirstQuarter, WaxingGibbous],
                    baseline_confidence: 0.6,
                    preferred_hours: HourRange { start: 6, end: 12 },
                    segment_weights: [0.8, 0.6, 0.5, 0.6, 0.7, 1.0, 0.5, 0.6, 0.6, 0.7, 0.5, 0.5],
                },
                ActivityProfile {
                    category: ActivityCategory::Travel,
                    activities: names(&["journey", "flight", "relocation", "road_trip"]),
                    favorable_bodies: vec![Body::Mercury, Body::Jupiter, Body::Moon],
                    avoid_retrograde: vec![Body::Mercury, Body::Jupiter],
                    favorable_phases: vec![WaxingCrescent, FirstQuarter, WaxingGibbous],
                    baseline_confidence: 0.65,
                    preferred_hours: HourRange { start: 6, end: 14 },
                    segment_weights: [0.7, 0.5, 0.9, 0.6, 0.6, 0.6, 0.7, 0.4, 1.0, 0.5, 0.6, 0.7],
                },
                ActivityProfile {
                    category: ActivityCategory::Finance,
                    activities: names(&["investment", "purchase", "loan", "savings", "trading"]),
                    favorable_bodies: vec![Body::Jupiter, Body::Venus, Body::Saturn],
                    avoid_retrograde: vec![Body::Mercury, Body::Venus],
                    favorable_phases: vec![New, WaxingCrescent, FirstQuarter],
                    baseline_confidence: 0.6,
                    preferred_hours: HourRange { start: 9, end: 16 },
                    segment_weights: [0.5, 1.0, 0.6, 0.6, 0.6, 0.7, 0.6, 0.8, 0.7, 0.9, 0.6, 0.4],
                },
                ActivityProfile {
                    category: ActivityCategory::Creative,
                    activities: names(&["writing", "art", "music", "design", "brainstorm"]),
                    favorable_bodies: vec![Body::Venus, Body::Mercury, Body::Moon, Body::Neptune],
                    avoid_retrograde: vec![Body::Venus, Body::Mercury],
                    favorable_phases: vec![FirstQuarter, WaxingGibbous, Full],
                    baseline_confidence: 0.6,
                    preferred_hours: HourRange { start: 10, end: 22 },
                    segment_weights: [0.6, 0.7, 0.8, 0.7, 1.0, 0.5, 0.8, 0.6, 0.7, 0.4, 0.8, 1.0],
                },
            ],
        }
    }
}

impl Default for ProfileTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_a_profile() {
        let table = ProfileTable::standard();
        for category in ActivityCategory::ALL {
            let profile = table.get(category).unwrap();
            assert_eq!(profile.category, category);
            assert!(!profile.activities.is_empty());
        }
    }

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!("Business".parse::<ActivityCategory>().unwrap(), ActivityCategory::Business);
        assert_eq!(
            "astrology".parse::<ActivityCategory>(),
            Err(UnknownCategory("astrology".to_string()))
        );
    }

    #[test]
    fn test_urgency_parse() {
        assert_eq!(" Urgent".parse::<Urgency>(), Ok(Urgency::Urgent));
        assert_eq!(
            "asap".parse::<Urgency>(),
            Err(UnknownUrgency("asap".to_string()))
        );
        assert_eq!(UnknownUrgency("asap".to_string()).to_string(), "Unknown urgency: asap");
    }

    #[test]
    fn test_hour_range_wraps_midnight() {
        let late = HourRange { start: 22, end: 2 };
        assert!(late.contains(23));
        assert!(late.contains(1));
        assert!(!late.contains(2));
        assert!(!late.contains(12));
    }

    #[test]
    fn test_health_detox_prefers_waning_moon() {
        let table = ProfileTable::standard();
        let health = table.get(ActivityCategory::Health).unwrap();
        let cat = ActivityCategory::Health;
        assert_eq!(cat.phase_suitability(health, LunarPhase::LastQuarter, "detox"), 1.0);
        assert_eq!(cat.phase_suitability(health, LunarPhase::LastQuarter, "exercise"), 0.4);
        assert_eq!(cat.phase_suitability(health, LunarPhase::FirstQuarter, "exercise"), 1.0);
        assert_eq!(cat.phase_suitability(health, LunarPhase::Unknown, "exercise"), 0.5);
    }
}
