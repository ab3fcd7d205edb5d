//! The request surface: validate a request, scan its horizon one task per
//! day, rank what survives and dress it for the caller.

use crate::cycles::{phase_or_fallback, retrograde_bodies, CyclicalPhase, VoidCalculator, VoidWindow};
use crate::ephemeris::{snapshot, Body, NatalChart, PositionSource};
use crate::error::EngineError;
use crate::services::{
    attach_explanations, cache_key, BirthProfileStore, ExplanationService, ResponseCache,
};
use crate::settings::EngineSettings;
use crate::tables::TimingTables;
use crate::timing::{
    planetary_hour, rank, ActivityCategory, ActivityProfile, PlanetaryHour, RankingContext,
    Recommendation, ScanPlan, TimeWindow, TimeWindowScanner, Urgency,
};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub activity: String,
    pub category: String,
    pub horizon_days: u32,
    #[serde(default)]
    pub urgency: Urgency,
    #[serde(default)]
    pub personalize: bool,
    #[serde(default)]
    pub user_id: Option<String>,
    /// "Now" for this request; the first hour scanned is the one holding it
    pub anchor: DateTime<Utc>,
    /// Requester's timezone as a fixed UTC offset
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl RecommendationRequest {
    pub fn new(activity: &str, category: &str, horizon_days: u32, anchor: DateTime<Utc>) -> Self {
        Self {
            activity: activity.to_string(),
            category: category.to_string(),
            horizon_days,
            urgency: Urgency::Normal,
            personalize: false,
            user_id: None,
            anchor,
            utc_offset_minutes: 0,
        }
    }

    /// Out-of-range offsets fall back to UTC.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).unwrap_or_else(|| {
            log::warn!("Ignoring invalid UTC offset of {} minutes", self.utc_offset_minutes);
            Utc.fix()
        })
    }

    /// Scans are per user once personalized, so the user id is appended
    /// to the personal key.
    pub fn cache_key(&self) -> String {
        let local_date = self.anchor.with_timezone(&self.offset()).date_naive();
        let key = cache_key(&self.category, &self.activity, local_date, self.personalize);
        match (&self.user_id, self.personalize) {
            (Some(user_id), true) => format!("{}:{}", key, user_id),
            _ => key,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Ok,
    UnknownCategory,
    UnknownActivity,
    NoFavorableWindows,
}

/// The sky at the request anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionsSummary {
    pub instant: DateTime<Utc>,
    pub phase: CyclicalPhase,
    pub planetary_hour: PlanetaryHour,
    pub retrograde: Vec<Body>,
    pub void_moon: Option<VoidWindow>,
    /// Bodies the source could not place at the anchor
    pub unavailable: Vec<Body>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub status: ResponseStatus,
    pub activity: String,
    pub category: String,
    pub horizon_days: u32,
    pub personalized: bool,
    pub recommendations: Vec<Recommendation>,
    pub overall_confidence: f64,
    pub conditions: Option<ConditionsSummary>,
}

impl RecommendationResponse {
    fn empty(status: ResponseStatus, request: &RecommendationRequest) -> Self {
        Self {
            status,
            activity: request.activity.clone(),
            category: request.category.clone(),
            horizon_days: 0,
            personalized: false,
            recommendations: Vec::new(),
            overall_confidence: 0.0,
            conditions: None,
        }
    }
}

/// Scored windows for one horizon, before ranking. This is what
/// `recommend_cached` keeps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannedHorizon {
    pub anchor: DateTime<Utc>,
    pub horizon_days: u32,
    pub windows: Vec<TimeWindow>,
}

impl ScannedHorizon {
    /// The windows a request at `anchor` over `horizon_days` may use, or
    /// `None` when this scan does not cover it.
    pub fn serve(self, anchor: DateTime<Utc>, horizon_days: u32) -> Option<Vec<TimeWindow>> {
        if anchor < self.anchor || horizon_days > self.horizon_days {
            return None;
        }
        Some(
            self.windows
                .into_iter()
                .filter(|w| w.day_offset < horizon_days && w.end > anchor)
                .collect(),
        )
    }
}

/// A request that passed validation, with its resolved profile and chart.
struct Admitted<'a> {
    category: ActivityCategory,
    profile: &'a ActivityProfile,
    activity: String,
    natal: Option<NatalChart>,
    horizon_days: u32,
    offset: FixedOffset,
}

/// Lowercase, with spaces and dashes folded to underscores
pub fn normalize_activity(activity: &str) -> String {
    activity
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

pub struct TimingEngine {
    source: Arc<dyn PositionSource>,
    tables: Arc<TimingTables>,
    settings: Arc<EngineSettings>,
    explainer: Option<Arc<dyn ExplanationService>>,
    profiles: Option<Arc<dyn BirthProfileStore>>,
}

impl TimingEngine {
    pub fn new(source: Arc<dyn PositionSource>) -> Self {
        Self {
            source,
            tables: TimingTables::shared(),
            settings: Arc::new(EngineSettings::default()),
            explainer: None,
            profiles: None,
        }
    }

    pub fn with_tables(mut self, tables: Arc<TimingTables>) -> Self {
        self.tables = tables;
        self
    }

    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = Arc::new(settings);
        self
    }

    pub fn with_explainer(mut self, explainer: Arc<dyn ExplanationService>) -> Self {
        self.explainer = Some(explainer);
        self
    }

    pub fn with_profiles(mut self, profiles: Arc<dyn BirthProfileStore>) -> Self {
        self.profiles = Some(profiles);
        self
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub async fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RecommendationResponse, EngineError> {
        let admitted = match self.admit(request).await {
            Ok(admitted) => admitted,
            Err(rejected) => return Ok(rejected),
        };
        let scan = self.scan(request, &admitted).await?;
        Ok(self.respond(request, admitted, scan.windows).await)
    }

    /// `recommend` with the scored windows kept in `cache`. Ranking, urgency,
    /// explanations and conditions still run per request. A cached scan is
    /// only reused when it started no later than the request anchor and
    /// covers its horizon; unreadable entries are rescanned.
    pub async fn recommend_cached(
        &self,
        cache: &dyn ResponseCache,
        request: &RecommendationRequest,
    ) -> Result<RecommendationResponse, EngineError> {
        let admitted = match self.admit(request).await {
            Ok(admitted) => admitted,
            Err(rejected) => return Ok(rejected),
        };

        let key = request.cache_key();
        let cached = match cache.get(&key).await {
            Some(hit) => match serde_json::from_str::<ScannedHorizon>(&hit) {
                Ok(scan) => scan.serve(request.anchor, admitted.horizon_days),
                Err(e) => {
                    log::warn!("Discarding unreadable cache entry {}: {}", key, e);
                    None
                }
            },
            None => None,
        };

        let windows = match cached {
            Some(windows) => {
                log::debug!("Cache hit for {}", key);
                windows
            }
            None => {
                let scan = self.scan(request, &admitted).await?;
                match serde_json::to_string(&scan) {
                    Ok(json) => {
                        let ttl = Duration::from_secs(self.settings.cache_ttl_secs);
                        cache.set(&key, json, ttl).await;
                    }
                    Err(e) => log::warn!("Could not serialize scan for {}: {}", key, e),
                }
                scan.windows
            }
        };
        Ok(self.respond(request, admitted, windows).await)
    }

    /// Category, activity and profile checks. A rejected request comes back
    /// as the response to return.
    async fn admit(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Admitted<'_>, RecommendationResponse> {
        let category: ActivityCategory = match request.category.parse() {
            Ok(category) => category,
            Err(e) => {
                log::info!("{}", e);
                return Err(RecommendationResponse::empty(ResponseStatus::UnknownCategory, request));
            }
        };
        let Some(profile) = self.tables.profiles.get(category) else {
            log::info!("No activity profile configured for {}", category);
            return Err(RecommendationResponse::empty(ResponseStatus::UnknownCategory, request));
        };

        let activity = normalize_activity(&request.activity);
        if !profile.supports_activity(&activity) {
            log::info!("Unknown activity '{}' for {}", request.activity, category);
            return Err(RecommendationResponse::empty(ResponseStatus::UnknownActivity, request));
        }

        Ok(Admitted {
            category,
            profile,
            activity,
            natal: self.resolve_natal(request).await,
            horizon_days: self.settings.clamp_horizon(request.horizon_days),
            offset: request.offset(),
        })
    }

    async fn scan(
        &self,
        request: &RecommendationRequest,
        admitted: &Admitted<'_>,
    ) -> Result<ScannedHorizon, EngineError> {
        log::info!(
            "Scoring {} ({}) over {} day(s) from {}{}",
            admitted.activity,
            admitted.category,
            admitted.horizon_days,
            request.anchor,
            if admitted.natal.is_some() { ", personalized" } else { "" }
        );

        let plan = Arc::new(ScanPlan {
            category: admitted.category,
            activity: admitted.activity.clone(),
            profile: admitted.profile.clone(),
            natal: admitted.natal.clone(),
            anchor: request.anchor,
            offset: admitted.offset,
        });
        let scanner = TimeWindowScanner::new(
            Arc::clone(&self.source),
            Arc::clone(&self.tables),
            Arc::clone(&self.settings),
        );

        let mut tasks = JoinSet::new();
        for day in 0..admitted.horizon_days {
            let scanner = scanner.clone();
            let plan = Arc::clone(&plan);
            tasks.spawn(async move { scanner.scan_day(&plan, day).await });
        }

        let mut windows = Vec::new();
        let mut instants = 0;
        let mut resolved = 0;
        while let Some(joined) = tasks.join_next().await {
            let day = joined?;
            instants += day.instants;
            resolved += day.resolved_positions;
            windows.extend(day.windows);
        }
        if resolved == 0 {
            return Err(EngineError::SourceOutage { instants });
        }

        Ok(ScannedHorizon {
            anchor: request.anchor,
            horizon_days: admitted.horizon_days,
            windows,
        })
    }

    /// Rank, explain and summarize scored windows for one request.
    async fn respond(
        &self,
        request: &RecommendationRequest,
        admitted: Admitted<'_>,
        windows: Vec<TimeWindow>,
    ) -> RecommendationResponse {
        let personalized = admitted.natal.is_some();
        let ctx = RankingContext {
            category: admitted.category,
            profile: admitted.profile,
            activity: &admitted.activity,
            urgency: request.urgency,
            personalized,
            confidence_threshold: self.settings.confidence_threshold,
            void_penalty_hours: self.settings.void_penalty_hours,
            max_recommendations: self.settings.max_recommendations,
        };
        let mut recommendations = rank(windows, &ctx);

        attach_explanations(
            self.explainer.as_deref(),
            &admitted.activity,
            admitted.category,
            &mut recommendations,
            self.settings.explain_top_k,
        )
        .await;

        let overall_confidence = if recommendations.is_empty() {
            0.0
        } else {
            recommendations.iter().map(|r| r.confidence).sum::<f64>() / recommendations.len() as f64
        };
        let status = if recommendations.is_empty() {
            ResponseStatus::NoFavorableWindows
        } else {
            ResponseStatus::Ok
        };

        RecommendationResponse {
            status,
            activity: admitted.activity,
            category: admitted.category.to_string(),
            horizon_days: admitted.horizon_days,
            personalized,
            recommendations,
            overall_confidence,
            conditions: Some(self.conditions(request.anchor, admitted.offset).await),
        }
    }

    async fn resolve_natal(&self, request: &RecommendationRequest) -> Option<NatalChart> {
        if !request.personalize {
            return None;
        }
        let (store, user_id) = match (&self.profiles, &request.user_id) {
            (Some(store), Some(user_id)) => (store, user_id),
            _ => return None,
        };
        match store.profile(user_id).await {
            Some(chart) if !chart.is_empty() => Some(chart),
            _ => {
                log::info!("No birth profile for {}; personalization off", user_id);
                None
            }
        }
    }

    async fn conditions(&self, instant: DateTime<Utc>, offset: FixedOffset) -> ConditionsSummary {
        let sky = snapshot(self.source.as_ref(), instant, &self.settings.tracked_bodies).await;
        let void_moon = VoidCalculator::new(&self.tables.aspects, self.settings.void_ceiling_hours)
            .window_at(&sky)
            .filter(|void| void.contains(instant));

        ConditionsSummary {
            instant,
            phase: phase_or_fallback(&sky),
            planetary_hour: planetary_hour(instant, offset, &self.settings.daylight),
            retrograde: retrograde_bodies(&sky),
            void_moon,
            unavailable: sky.missing,
        }
    }
}
