use crate::timing::{factor, ActivityCategory, Recommendation};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub summary: String,
    pub reasoning: String,
    pub advice: String,
    /// Built from the factor breakdown rather than by the service
    #[serde(default)]
    pub templated: bool,
}

#[derive(Error, Debug, Clone)]
pub enum ExplanationError {
    #[error("Explanation service unavailable: {0}")]
    Unavailable(String),
    #[error("Explanation service returned an unusable answer: {0}")]
    Malformed(String),
}

/// Natural-language explanations for a recommendation, typically backed by
/// a remote language model.
#[async_trait]
pub trait ExplanationService: Send + Sync {
    async fn explain(
        &self,
        activity: &str,
        category: ActivityCategory,
        recommendation: &Recommendation,
    ) -> Result<Explanation, ExplanationError>;
}

pub fn quality_tier(final_score: f64) -> &'static str {
    if final_score >= 0.8 {
        "Excellent"
    } else if final_score >= 0.65 {
        "Good"
    } else {
        "Acceptable"
    }
}

fn describe_factor(name: &str) -> &str {
    match name {
        factor::WINDOW_SCORE => "overall hour quality",
        factor::RULING_MATCH => "a supportive planetary hour",
        factor::PHASE_FAVOR => "a favorable lunar phase",
        factor::RETROGRADE => "retrograde motion",
        factor::VOID_DURATION => "a long void-of-course Moon",
        factor::PERSONALIZATION => "contact with your birth chart",
        factor::URGENCY => "being soon",
        other => other,
    }
}

/// Deterministic explanation derived only from the breakdown.
pub fn fallback_explanation(activity: &str, rec: &Recommendation) -> Explanation {
    let percent = (rec.final_score * 100.0).round() as i64;
    let summary = format!(
        "{} timing for {} with {}% favorability during {}",
        quality_tier(rec.final_score),
        activity,
        percent,
        rec.window.phase.phase
    );

    let helping: Vec<&str> = rec.positive_factors().map(|(k, _)| describe_factor(k)).collect();
    let hindering: Vec<&str> = rec.negative_factors().map(|(k, _)| describe_factor(k)).collect();
    let mut reasoning = format!(
        "The {} hour supports this window through {}.",
        rec.window.ruling_body(),
        helping.join(", ")
    );
    if !hindering.is_empty() {
        reasoning.push_str(&format!(" Held back by {}.", hindering.join(", ")));
    }

    let advice = if rec.window.retrograde_impacts.is_empty() {
        format!("Schedule the {} to start close to the beginning of the hour.", activity)
    } else {
        let bodies: Vec<String> = rec.window.retrograde_impacts.iter().map(|b| b.to_string()).collect();
        format!(
            "With {} retrograde, double-check details and leave room to revisit.",
            bodies.join(" and ")
        )
    };

    Explanation {
        summary,
        reasoning,
        advice,
        templated: true,
    }
}

/// Explain the first `top_k` recommendations. Service failures fall back
/// to the template; they never drop a recommendation.
pub async fn attach_explanations(
    service: Option<&dyn ExplanationService>,
    activity: &str,
    category: ActivityCategory,
    recommendations: &mut [Recommendation],
    top_k: usize,
) {
    for rec in recommendations.iter_mut().take(top_k) {
        let explanation = match service {
            Some(service) => match service.explain(activity, category, rec).await {
                Ok(explanation) => explanation,
                Err(e) => {
                    log::warn!("Using templated explanation for rank {}: {}", rec.rank, e);
                    fallback_explanation(activity, rec)
                }
            },
            None => fallback_explanation(activity, rec),
        };
        rec.explanation = Some(explanation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers() {
        assert_eq!(quality_tier(0.85), "Excellent");
        assert_eq!(quality_tier(0.8), "Excellent");
        assert_eq!(quality_tier(0.7), "Good");
        assert_eq!(quality_tier(0.64), "Acceptable");
    }
}
