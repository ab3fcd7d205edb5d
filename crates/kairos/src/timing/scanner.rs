//! Time window scanner.
//!
//! Walks one local day hour by hour, resolves the sky at the top of each
//! hour and scores it for the requested activity. Days are independent of
//! each other, so callers can scan them concurrently.

use crate::aspects::AspectCalculator;
use crate::cycles::{impacted_bodies, phase_or_fallback, VoidCalculator};
use crate::ephemeris::{snapshot, Body, NatalChart, PositionSource, SkySnapshot};
use crate::settings::EngineSettings;
use crate::tables::TimingTables;
use crate::timing::activity::{ActivityCategory, ActivityProfile};
use crate::timing::hours::{local_midnight, planetary_hour};
use crate::timing::window::{factor, FactorMap, TimeWindow};
use crate::western::StrengthAnalyzer;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Timelike, Utc};
use std::sync::Arc;

pub const BASELINE_SCORE: f64 = 0.5;
pub const RULING_HOUR_BONUS: f64 = 0.3;
pub const PHASE_WEIGHT: f64 = 0.2;
pub const STRENGTH_WEIGHT: f64 = 0.2;
pub const VOID_MOON_PENALTY: f64 = 0.3;
pub const PREFERRED_HOURS_BONUS: f64 = 0.1;

/// Strength fit used when none of the favorable bodies resolved
const NEUTRAL_FIT: f64 = 0.5;

/// Request-scoped inputs shared by every day of one scan.
#[derive(Debug, Clone)]
pub struct ScanPlan {
    pub category: ActivityCategory,
    pub activity: String,
    pub profile: ActivityProfile,
    pub natal: Option<NatalChart>,
    /// Hours that ended before this instant are skipped
    pub anchor: DateTime<Utc>,
    pub offset: FixedOffset,
}

impl ScanPlan {
    pub fn local_date(&self) -> NaiveDate {
        self.anchor.with_timezone(&self.offset).date_naive()
    }
}

/// Result of scanning one local day.
#[derive(Debug, Clone, Default)]
pub struct DayScan {
    pub day_offset: u32,
    /// Windows at or above the confidence threshold, in hour order
    pub windows: Vec<TimeWindow>,
    /// Hours that were evaluated
    pub instants: usize,
    /// Body positions resolved across those hours
    pub resolved_positions: usize,
}

#[derive(Clone)]
pub struct TimeWindowScanner {
    source: Arc<dyn PositionSource>,
    tables: Arc<TimingTables>,
    settings: Arc<EngineSettings>,
    aspects: AspectCalculator,
}

impl TimeWindowScanner {
    pub fn new(
        source: Arc<dyn PositionSource>,
        tables: Arc<TimingTables>,
        settings: Arc<EngineSettings>,
    ) -> Self {
        let aspects = AspectCalculator::new(tables.aspects.clone());
        Self {
            source,
            tables,
            settings,
            aspects,
        }
    }

    pub async fn scan_day(&self, plan: &ScanPlan, day_offset: u32) -> DayScan {
        let date = plan.local_date() + Duration::days(day_offset as i64);
        let midnight = local_midnight(date, plan.offset);
        let mut scan = DayScan {
            day_offset,
            ..Default::default()
        };

        for hour in 0..24 {
            let start = midnight + Duration::hours(hour);
            if start + Duration::hours(1) <= plan.anchor {
                continue;
            }

            let sky = snapshot(self.source.as_ref(), start, &self.settings.tracked_bodies).await;
            scan.instants += 1;
            scan.resolved_positions += sky.positions.len();
            if sky.is_empty() {
                continue;
            }

            let window = self.score_snapshot(plan, &sky, day_offset);
            if window.score >= self.settings.confidence_threshold {
                scan.windows.push(window);
            }
        }

        scan
    }

    /// Score the hour starting at `sky.instant`. Pure: the same snapshot
    /// and plan always give the same window.
    pub fn score_snapshot(&self, plan: &ScanPlan, sky: &SkySnapshot, day_offset: u32) -> TimeWindow {
        let start = sky.instant;
        let end = start + Duration::hours(1);
        let profile = &plan.profile;

        let hour = planetary_hour(start, plan.offset, &self.settings.daylight);
        let ruling_match = self.tables.hours.supports(hour.ruler, &plan.activity);

        let phase = phase_or_fallback(sky);
        let phase_fit = plan
            .category
            .phase_suitability(profile, phase.phase, &plan.activity);
        let strength_fit = self.strength_fit(plan, sky);

        let void_moon = VoidCalculator::new(&self.tables.aspects, self.settings.void_ceiling_hours)
            .window_at(sky)
            .filter(|void| void.overlaps(start, end));

        let local_hour = start.with_timezone(&plan.offset).hour();
        let preferred = profile.preferred_hours.contains(local_hour);

        let mut factors = FactorMap::new();
        factors.insert(factor::BASELINE.to_string(), BASELINE_SCORE);
        if ruling_match {
            factors.insert(factor::RULING_HOUR.to_string(), RULING_HOUR_BONUS);
        }
        factors.insert(factor::LUNAR_PHASE.to_string(), PHASE_WEIGHT * phase_fit);
        factors.insert(factor::PLANETARY_STRENGTH.to_string(), STRENGTH_WEIGHT * strength_fit);
        if void_moon.is_some() {
            factors.insert(factor::VOID_MOON.to_string(), -VOID_MOON_PENALTY);
        }
        if preferred {
            factors.insert(factor::PREFERRED_HOURS.to_string(), PREFERRED_HOURS_BONUS);
        }
        let score = factors.values().sum::<f64>().clamp(0.0, 1.0);

        let personal_resonance = plan
            .natal
            .as_ref()
            .and_then(|natal| personal_resonance(&self.aspects, &profile.favorable_bodies, sky, natal));

        TimeWindow {
            start,
            end,
            day_offset,
            score,
            factors,
            phase,
            planetary_hour: hour,
            ruling_match,
            void_moon,
            retrograde_impacts: impacted_bodies(sky, &profile.avoid_retrograde),
            personal_resonance,
        }
    }

    /// Mean strength of the category's favorable bodies that resolved.
    fn strength_fit(&self, plan: &ScanPlan, sky: &SkySnapshot) -> f64 {
        let analyzer = StrengthAnalyzer::new(&self.tables.dignities, &self.aspects);
        let totals: Vec<f64> = plan
            .profile
            .favorable_bodies
            .iter()
            .filter_map(|body| sky.get(*body))
            .map(|pos| {
                analyzer
                    .analyze(pos, &plan.profile.segment_weights, plan.natal.as_ref())
                    .total
            })
            .collect();

        if totals.is_empty() {
            NEUTRAL_FIT
        } else {
            totals.iter().sum::<f64>() / totals.len() as f64
        }
    }
}

/// Signed contact between each favorable transit and its own natal place:
/// harmonious aspects count for, hard aspects against, no aspect is zero.
/// `None` when no favorable body is present in both charts.
pub fn personal_resonance(
    aspects: &AspectCalculator,
    favorable: &[Body],
    sky: &SkySnapshot,
    natal: &NatalChart,
) -> Option<f64> {
    let contacts: Vec<f64> = favorable
        .iter()
        .filter_map(|body| Some((sky.get(*body)?, natal.get(*body)?)))
        .map(|(transit, radix)| match aspects.relationship(transit, radix) {
            Some(rel) if rel.kind.is_harmonious() => rel.strength,
            Some(rel) => -rel.strength,
            None => 0.0,
        })
        .collect();

    if contacts.is_empty() {
        None
    } else {
        Some(contacts.iter().sum::<f64>() / contacts.len() as f64)
    }
}
