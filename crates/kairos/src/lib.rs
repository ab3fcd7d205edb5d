pub mod aspects;
pub mod cycles;
pub mod engine;
pub mod ephemeris;
pub mod error;
pub mod services;
pub mod settings;
pub mod tables;
pub mod timing;
pub mod western;

pub use engine::{
    ConditionsSummary, RecommendationRequest, RecommendationResponse, ResponseStatus,
    ScannedHorizon, TimingEngine,
};
pub use error::{EngineError, PhaseError, VoidWindowError};
pub use settings::EngineSettings;
pub use tables::TimingTables;
pub use timing::{ActivityCategory, Recommendation, TimeWindow, Urgency};
