//! Planetary hours.
//!
//! Daylight (sunrise to sunset) and night (sunset to next sunrise) are each
//! split into 12 equal hours. The first daylight hour belongs to the day's
//! ruler and the rest follow the Chaldean order, so the night before sunrise
//! still belongs to the previous day's sequence.

use crate::ephemeris::{Body, GeoLocation};
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Slowest to fastest, as the hours rotate.
pub const CHALDEAN_ORDER: [Body; 7] = [
    Body::Saturn,
    Body::Jupiter,
    Body::Mars,
    Body::Sun,
    Body::Venus,
    Body::Mercury,
    Body::Moon,
];

pub fn day_ruler(weekday: Weekday) -> Body {
    match weekday {
        Weekday::Sun => Body::Sun,
        Weekday::Mon => Body::Moon,
        Weekday::Tue => Body::Mars,
        Weekday::Wed => Body::Mercury,
        Weekday::Thu => Body::Jupiter,
        Weekday::Fri => Body::Venus,
        Weekday::Sat => Body::Saturn,
    }
}

fn chaldean_index(body: Body) -> usize {
    CHALDEAN_ORDER.iter().position(|b| *b == body).unwrap_or(0)
}

fn hours_to_duration(hours: f64) -> Duration {
    Duration::milliseconds((hours * 3_600_000.0).round() as i64)
}

/// Local midnight of `date` expressed in UTC
pub fn local_midnight(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN) - Duration::seconds(offset.local_minus_utc() as i64);
    Utc.from_utc_datetime(&naive)
}

/// How sunrise and sunset are placed on each date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum DaylightModel {
    /// Same local sunrise/sunset every day (hours after local midnight)
    Fixed { sunrise_hour: f64, sunset_hour: f64 },
    /// Approximate sunrise equation for a location
    Solar { location: GeoLocation },
}

impl Default for DaylightModel {
    fn default() -> Self {
        DaylightModel::Fixed {
            sunrise_hour: 6.0,
            sunset_hour: 18.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarDay {
    pub date: NaiveDate,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

impl DaylightModel {
    pub fn solar_day(&self, date: NaiveDate, offset: FixedOffset) -> SolarDay {
        match self {
            DaylightModel::Fixed { sunrise_hour, sunset_hour } => {
                fixed_day(date, offset, *sunrise_hour, *sunset_hour)
            }
            // Polar day or night has no sunrise; fall back to a 12/12 split
            DaylightModel::Solar { location } => solar_times(date, *location)
                .unwrap_or_else(|| fixed_day(date, offset, 6.0, 18.0)),
        }
    }
}

fn fixed_day(date: NaiveDate, offset: FixedOffset, sunrise_hour: f64, sunset_hour: f64) -> SolarDay {
    let midnight = local_midnight(date, offset);
    SolarDay {
        date,
        sunrise: midnight + hours_to_duration(sunrise_hour),
        sunset: midnight + hours_to_duration(sunset_hour),
    }
}

fn solar_times(date: NaiveDate, location: GeoLocation) -> Option<SolarDay> {
    let n = date.ordinal() as f64;
    let declination = 23.44_f64.to_radians() * (360.0 / 365.0 * (284.0 + n)).to_radians().sin();
    let cos_hour_angle = -(location.lat.to_radians().tan() * declination.tan());
    if !(-1.0..=1.0).contains(&cos_hour_angle) {
        return None;
    }
    let half_day_deg = cos_hour_angle.acos().to_degrees();

    // Equation of time, minutes
    let b = (360.0 / 365.0 * (n - 81.0)).to_radians();
    let eot = 9.87 * (2.0 * b).sin() - 7.53 * b.cos() - 1.5 * b.sin();
    let solar_noon_min = 720.0 - 4.0 * location.lon - eot;

    let utc_midnight = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
    let minutes = |m: f64| Duration::milliseconds((m * 60_000.0).round() as i64);
    Some(SolarDay {
        date,
        sunrise: utc_midnight + minutes(solar_noon_min - 4.0 * half_day_deg),
        sunset: utc_midnight + minutes(solar_noon_min + 4.0 * half_day_deg),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanetaryHour {
    pub ruler: Body,
    /// 0-11 daylight hours, 12-23 night hours
    pub index: u8,
    pub is_day: bool,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Date whose ruler seeds the sequence
    pub day: NaiveDate,
}

/// Which of 12 equal parts of `[from, to)` holds `instant`
fn twelfth(from: DateTime<Utc>, to: DateTime<Utc>, instant: DateTime<Utc>) -> (u8, DateTime<Utc>, DateTime<Utc>) {
    let span = (to - from).num_milliseconds().max(12);
    let part = span / 12;
    let elapsed = (instant - from).num_milliseconds().clamp(0, span - 1);
    let idx = (elapsed / part).min(11);
    let start = from + Duration::milliseconds(part * idx);
    let end = if idx == 11 { to } else { start + Duration::milliseconds(part) };
    (idx as u8, start, end)
}

pub fn planetary_hour(instant: DateTime<Utc>, offset: FixedOffset, model: &DaylightModel) -> PlanetaryHour {
    let local_date = instant.with_timezone(&offset).date_naive();
    let today = model.solar_day(local_date, offset);

    let (day, index, is_day, start, end) = if instant < today.sunrise {
        let prev_date = local_date.pred_opt().unwrap_or(local_date);
        let prev = model.solar_day(prev_date, offset);
        let (i, s, e) = twelfth(prev.sunset, today.sunrise, instant);
        (prev_date, 12 + i, false, s, e)
    } else if instant < today.sunset {
        let (i, s, e) = twelfth(today.sunrise, today.sunset, instant);
        (local_date, i, true, s, e)
    } else {
        let next_date = local_date.succ_opt().unwrap_or(local_date);
        let next = model.solar_day(next_date, offset);
        let (i, s, e) = twelfth(today.sunset, next.sunrise, instant);
        (local_date, 12 + i, false, s, e)
    };

    let seed = chaldean_index(day_ruler(day.weekday()));
    PlanetaryHour {
        ruler: CHALDEAN_ORDER[(seed + index as usize) % 7],
        index,
        is_day,
        start,
        end,
        day,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourActivities {
    pub body: Body,
    pub activities: Vec<String>,
}

/// Activities each ruling body's hour is traditionally good for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetaryHourTable {
    pub entries: Vec<HourActivities>,
}

impl PlanetaryHourTable {
    pub fn standard() -> Self {
        let row = |body: Body, activities: &[&str]| HourActivities {
            body,
            activities: activities.iter().map(|s| s.to_string()).collect(),
        };
        Self {
            entries: vec![
                row(Body::Sun, &["launch", "presentation", "hiring", "checkup", "career", "leadership"]),
                row(Body::Moon, &["journey", "relocation", "family", "reconciliation", "diet", "brainstorm"]),
                row(Body::Mercury, &["meeting", "negotiation", "contract", "writing", "flight", "trading", "networking"]),
                row(Body::Venus, &["date", "proposal", "wedding", "art", "music", "design", "purchase", "social"]),
                row(Body::Mars, &["exercise", "surgery", "competition", "road_trip", "detox"]),
                row(Body::Jupiter, &["investment", "loan", "launch", "wedding", "journey", "savings"]),
                row(Body::Saturn, &["planning", "contract", "savings", "detox", "real_estate"]),
            ],
        }
    }

    pub fn activities(&self, body: Body) -> &[String] {
        self.entries
            .iter()
            .find(|e| e.body == body)
            .map(|e| e.activities.as_slice())
            .unwrap_or(&[])
    }

    pub fn supports(&self, body: Body, activity: &str) -> bool {
        self.activities(body).iter().any(|a| a == activity)
    }
}

impl Default for PlanetaryHourTable {
    fn default() -> Self {
        Self::standard()
    }
}
