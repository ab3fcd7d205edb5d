use crate::ephemeris::Body;
use crate::timing::DaylightModel;
use serde::{Deserialize, Serialize};

/// Runtime knobs of the engine. Every field has a default so partial
/// configuration files stay valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Minimum scanner score for a window to be kept
    pub confidence_threshold: f64,
    pub max_recommendations: usize,
    pub max_horizon_days: u32,
    /// Void windows this long or longer are treated as calculation failures
    pub void_ceiling_hours: f64,
    /// Void windows longer than this are penalized during ranking
    pub void_penalty_hours: f64,
    /// How many of the top recommendations get an explanation
    pub explain_top_k: usize,
    pub cache_ttl_secs: u64,
    pub daylight: DaylightModel,
    pub tracked_bodies: Vec<Body>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.6,
            max_recommendations: 10,
            max_horizon_days: 30,
            void_ceiling_hours: 48.0,
            void_penalty_hours: 12.0,
            explain_top_k: 3,
            cache_ttl_secs: 1800,
            daylight: DaylightModel::default(),
            tracked_bodies: Body::ALL.to_vec(),
        }
    }
}

impl EngineSettings {
    pub fn clamp_horizon(&self, requested: u32) -> u32 {
        requested.clamp(1, self.max_horizon_days.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings: EngineSettings =
            serde_json::from_str(r#"{"max_recommendations": 5}"#).unwrap();
        assert_eq!(settings.max_recommendations, 5);
        assert_eq!(settings.confidence_threshold, 0.6);
        assert_eq!(settings.tracked_bodies.len(), 10);
    }

    #[test]
    fn test_horizon_is_clamped() {
        let settings = EngineSettings::default();
        assert_eq!(settings.clamp_horizon(0), 1);
        assert_eq!(settings.clamp_horizon(7), 7);
        assert_eq!(settings.clamp_horizon(90), 30);
    }
}
