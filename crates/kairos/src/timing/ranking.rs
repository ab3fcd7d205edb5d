//! Ranking and selection: the request-level second pass over every window
//! the scanner kept.

use crate::timing::activity::{ActivityCategory, ActivityProfile, Urgency};
use crate::timing::window::{factor, FactorMap, Recommendation, TimeWindow};

pub const WINDOW_WEIGHT: f64 = 0.4;
pub const RULING_MATCH_BONUS: f64 = 0.2;
pub const PHASE_FAVOR_WEIGHT: f64 = 0.15;
pub const RETROGRADE_PENALTY: f64 = 0.1;
pub const LONG_VOID_PENALTY: f64 = 0.15;
pub const PERSONALIZATION_WEIGHT: f64 = 0.1;
pub const URGENCY_BONUS: f64 = 0.1;
pub const URGENCY_DECAY_PER_DAY: f64 = 0.01;

pub const CONFIDENCE_FLOOR: f64 = 0.3;
pub const CONFIDENCE_CEILING: f64 = 0.95;

/// Request-level weights for one ranking pass.
#[derive(Debug, Clone, Copy)]
pub struct RankingContext<'a> {
    pub category: ActivityCategory,
    pub profile: &'a ActivityProfile,
    pub activity: &'a str,
    pub urgency: Urgency,
    pub personalized: bool,
    pub confidence_threshold: f64,
    pub void_penalty_hours: f64,
    pub max_recommendations: usize,
}

/// Final score of one window and the contributions it was built from.
pub fn final_score(window: &TimeWindow, ctx: &RankingContext<'_>) -> (f64, FactorMap) {
    let mut breakdown = FactorMap::new();
    breakdown.insert(factor::WINDOW_SCORE.to_string(), WINDOW_WEIGHT * window.score);

    if window.ruling_match {
        breakdown.insert(factor::RULING_MATCH.to_string(), RULING_MATCH_BONUS);
    }

    if ctx
        .category
        .phase_favors(ctx.profile, window.phase.phase, ctx.activity)
    {
        breakdown.insert(
            factor::PHASE_FAVOR.to_string(),
            PHASE_FAVOR_WEIGHT * ctx.profile.baseline_confidence,
        );
    }

    if !window.retrograde_impacts.is_empty() {
        breakdown.insert(
            factor::RETROGRADE.to_string(),
            -RETROGRADE_PENALTY * window.retrograde_impacts.len() as f64,
        );
    }

    if let Some(void) = &window.void_moon {
        if void.duration_hours > ctx.void_penalty_hours {
            breakdown.insert(factor::VOID_DURATION.to_string(), -LONG_VOID_PENALTY);
        }
    }

    if ctx.personalized {
        if let Some(resonance) = window.personal_resonance {
            breakdown.insert(
                factor::PERSONALIZATION.to_string(),
                PERSONALIZATION_WEIGHT * resonance,
            );
        }
    }

    if ctx.urgency == Urgency::Urgent {
        let bonus = (URGENCY_BONUS - URGENCY_DECAY_PER_DAY * window.day_offset as f64).max(0.0);
        if bonus > 0.0 {
            breakdown.insert(factor::URGENCY.to_string(), bonus);
        }
    }

    let total = breakdown.values().sum::<f64>().clamp(0.0, 1.0);
    (total, breakdown)
}

/// Confidence from the window score nudged by how many factors pulled
/// each way. The window score entry itself is the base, not a factor.
pub fn confidence(window_score: f64, breakdown: &FactorMap) -> f64 {
    let adjustments = || {
        breakdown
            .iter()
            .filter(|(name, _)| name.as_str() != factor::WINDOW_SCORE)
            .map(|(_, v)| *v)
    };
    let positives = adjustments().filter(|v| *v > 0.0).count() as f64;
    let negatives = adjustments().filter(|v| *v < 0.0).count() as f64;
    (window_score + 0.05 * positives - 0.03 * negatives).clamp(CONFIDENCE_FLOOR, CONFIDENCE_CEILING)
}

/// Filter, score, sort and truncate. Equal final scores go to the earlier
/// window, whatever order the windows arrived in.
pub fn rank(windows: Vec<TimeWindow>, ctx: &RankingContext<'_>) -> Vec<Recommendation> {
    let mut scored: Vec<Recommendation> = windows
        .into_iter()
        .filter(|w| w.score >= ctx.confidence_threshold)
        .map(|window| {
            let (final_score, breakdown) = final_score(&window, ctx);
            Recommendation {
                rank: 0,
                confidence: confidence(window.score, &breakdown),
                window,
                final_score,
                breakdown,
                explanation: None,
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.final_score
            .total_cmp(&a.final_score)
            .then_with(|| a.window.start.cmp(&b.window.start))
    });
    scored.truncate(ctx.max_recommendations);

    for (i, rec) in scored.iter_mut().enumerate() {
        rec.rank = i + 1;
    }
    scored
}
