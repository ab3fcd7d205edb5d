pub mod activity;
pub mod hours;
pub mod ranking;
pub mod scanner;
pub mod window;

pub use activity::{
    ActivityCategory, ActivityProfile, HourRange, ProfileTable, UnknownCategory, UnknownUrgency, Urgency,
};
pub use hours::{
    day_ruler, local_midnight, planetary_hour, DaylightModel, HourActivities, PlanetaryHour,
    PlanetaryHourTable, SolarDay, CHALDEAN_ORDER,
};
pub use ranking::{confidence, final_score, rank, RankingContext};
pub use scanner::{personal_resonance, DayScan, ScanPlan, TimeWindowScanner};
pub use window::{factor, FactorMap, Recommendation, TimeWindow};
