use crate::ephemeris::source::{EphemerisError, PositionSource};
use crate::ephemeris::types::{normalize_degrees, Body, RawPosition};
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Timelike, Utc};
use std::env;
use std::path::PathBuf;
use std::sync::Mutex;
use swisseph::swe::{calc_ut, julday};

// FLG_SWIEPH = 2 (use Swiss Ephemeris files), FLG_SPEED = 256 (fill speed slots)
const CALC_FLAGS: u32 = 2 | 256;

fn swiss_code(body: Body) -> u32 {
    match body {
        Body::Sun => 0,
        Body::Moon => 1,
        Body::Mercury => 2,
        Body::Venus => 3,
        Body::Mars => 4,
        Body::Jupiter => 5,
        Body::Saturn => 6,
        Body::Uranus => 7,
        Body::Neptune => 8,
        Body::Pluto => 9,
    }
}

/// Position source backed by Swiss Ephemeris data files.
pub struct SwissEphemerisAdapter {
    ephemeris_path: PathBuf,
    // the C library keeps global state; serialize calls into it
    lock: Mutex<()>,
}

impl SwissEphemerisAdapter {
    /// Create a new adapter with optional ephemeris path
    pub fn new(ephemeris_path: Option<PathBuf>) -> Result<Self, EphemerisError> {
        let path = ephemeris_path.unwrap_or_else(|| {
            env::var("SWISS_EPHEMERIS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/usr/local/share/swisseph"))
        });

        if !path.exists() {
            return Err(EphemerisError::FileNotFound {
                path: path.display().to_string(),
                message: "Ephemeris path does not exist. Please ensure Swiss Ephemeris data files are installed.".to_string(),
            });
        }

        Ok(Self {
            ephemeris_path: path,
            lock: Mutex::new(()),
        })
    }

    pub fn ephemeris_path(&self) -> &PathBuf {
        &self.ephemeris_path
    }

    fn calc(&self, instant: DateTime<Utc>, body: Body) -> Result<RawPosition, EphemerisError> {
        let _guard = self.lock.lock().map_err(|_| EphemerisError::CalculationFailed {
            body,
            datetime: instant,
            message: "Swiss Ephemeris lock poisoned".to_string(),
        })?;

        let jd = datetime_to_julian_day(instant);
        let result = calc_ut(jd, swiss_code(body), CALC_FLAGS).map_err(|e| {
            EphemerisError::CalculationFailed {
                body,
                datetime: instant,
                message: format!("Swiss Ephemeris error: {}", e),
            }
        })?;

        let out = result.out;
        Ok(RawPosition {
            longitude: normalize_degrees(out[0]),
            latitude: out[1],
            distance: out[2],
            speed: out[3],
        })
    }
}

#[async_trait]
impl PositionSource for SwissEphemerisAdapter {
    async fn position(
        &self,
        instant: DateTime<Utc>,
        body: Body,
    ) -> Result<RawPosition, EphemerisError> {
        self.calc(instant, body)
    }
}

/// Convert UTC datetime to Julian Day
fn datetime_to_julian_day(dt: DateTime<Utc>) -> f64 {
    let hour_decimal =
        dt.hour() as f64 + dt.minute() as f64 / 60.0 + dt.second() as f64 / 3600.0;

    // GREG_CAL = 1
    julday(dt.year(), dt.month() as i32, dt.day() as i32, hour_decimal, 1)
}
