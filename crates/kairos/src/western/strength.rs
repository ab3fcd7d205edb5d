//! Planetary strength: a single 0-1 figure combining essential dignity,
//! the zodiacal segment a body occupies, and its contact with the
//! reference chart.

use crate::aspects::AspectCalculator;
use crate::ephemeris::{Body, CelestialPosition, NatalChart};
use crate::western::dignities::{DignityState, DignityTable};
use serde::{Deserialize, Serialize};

pub const BASELINE_STRENGTH: f64 = 0.5;
pub const SEGMENT_WEIGHT: f64 = 0.2;
pub const NATAL_WEIGHT: f64 = 0.3;

/// Audit record of one strength evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrengthBreakdown {
    pub body: Body,
    pub dignity: DignityState,
    pub dignity_adjustment: f64,
    pub segment_bonus: f64,
    pub natal_bonus: f64,
    pub total: f64,
}

pub struct StrengthAnalyzer<'a> {
    dignities: &'a DignityTable,
    aspects: &'a AspectCalculator,
}

impl<'a> StrengthAnalyzer<'a> {
    pub fn new(dignities: &'a DignityTable, aspects: &'a AspectCalculator) -> Self {
        Self { dignities, aspects }
    }

    /// `segment_weights` maps sign index to a 0-1 weight for the activity
    /// category being scored.
    pub fn analyze(
        &self,
        position: &CelestialPosition,
        segment_weights: &[f64; 12],
        natal: Option<&NatalChart>,
    ) -> StrengthBreakdown {
        let dignity = self.dignities.assess(position.body, position.longitude);
        let dignity_adjustment = dignity.adjustment();

        let weight = segment_weights[position.sign_index() as usize].clamp(0.0, 1.0);
        let segment_bonus = SEGMENT_WEIGHT * weight;

        let natal_bonus = natal
            .and_then(|chart| chart.get(position.body))
            .and_then(|radix| self.aspects.relationship(position, radix))
            .map(|rel| NATAL_WEIGHT * rel.strength)
            .unwrap_or(0.0);

        let total =
            (BASELINE_STRENGTH + dignity_adjustment + segment_bonus + natal_bonus).clamp(0.0, 1.0);

        StrengthBreakdown {
            body: position.body,
            dignity,
            dignity_adjustment,
            segment_bonus,
            natal_bonus,
            total,
        }
    }
}
