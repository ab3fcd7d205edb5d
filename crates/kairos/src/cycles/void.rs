//! Void-of-course windows for the fast reference body (the Moon).
//!
//! From one snapshot, every other body's motion is projected linearly. The
//! void starts at the last exact aspect the Moon completes inside its
//! current sign and ends when it crosses into the next sign.

use crate::aspects::AspectTable;
use crate::ephemeris::{normalize_degrees, Body, SkySnapshot};
use crate::error::VoidWindowError;
use crate::western::ZodiacSign;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoidWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_hours: f64,
    /// Sign the Moon is leaving
    pub sign: ZodiacSign,
}

impl VoidWindow {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Whether `[start, end)` intersects this window
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && start < self.end
    }
}

fn days_to_duration(days: f64) -> Duration {
    Duration::milliseconds((days * MILLIS_PER_DAY).round() as i64)
}

pub struct VoidCalculator<'a> {
    aspects: &'a AspectTable,
    reference: Body,
    ceiling_hours: f64,
}

impl<'a> VoidCalculator<'a> {
    pub fn new(aspects: &'a AspectTable, ceiling_hours: f64) -> Self {
        Self {
            aspects,
            reference: Body::Moon,
            ceiling_hours,
        }
    }

    /// Void window for the sign the reference body occupies at `sky.instant`.
    pub fn compute(&self, sky: &SkySnapshot) -> Result<VoidWindow, VoidWindowError> {
        let moon = sky
            .get(self.reference)
            .ok_or(VoidWindowError::MissingReference(self.reference))?;
        if moon.speed <= 0.0 {
            return Err(VoidWindowError::NotProgressing(self.reference));
        }

        let degree = moon.degree_in_sign();
        let entry_days = -degree / moon.speed;
        let exit_days = (30.0 - degree) / moon.speed;

        // Latest exact aspect inside [sign entry, sign exit)
        let mut last_aspect: Option<f64> = None;
        for other in sky.positions.values() {
            if other.body == self.reference {
                continue;
            }
            let relative_speed = moon.speed - other.speed;
            if relative_speed <= 0.0 {
                continue;
            }
            let separation = normalize_degrees(moon.longitude - other.longitude);

            for entry in &self.aspects.entries {
                for target in [entry.exact_angle, -entry.exact_angle] {
                    let gain = normalize_degrees(target - separation);
                    for days in [gain / relative_speed, (gain - 360.0) / relative_speed] {
                        if days >= entry_days && days < exit_days {
                            last_aspect = Some(last_aspect.map_or(days, |t| t.max(days)));
                        }
                    }
                }
            }
        }

        let start_days = last_aspect.unwrap_or(entry_days);
        let hours = (exit_days - start_days) * 24.0;
        if hours <= 0.0 || hours >= self.ceiling_hours {
            return Err(VoidWindowError::Implausible {
                hours,
                ceiling_hours: self.ceiling_hours,
            });
        }

        let start = sky.instant + days_to_duration(start_days);
        let end = sky.instant + days_to_duration(exit_days);
        Ok(VoidWindow {
            start,
            end,
            duration_hours: hours,
            sign: ZodiacSign::from_index(moon.sign_index()),
        })
    }

    /// Like `compute`, but every failure is quietly dropped.
    pub fn window_at(&self, sky: &SkySnapshot) -> Option<VoidWindow> {
        match self.compute(sky) {
            Ok(window) => Some(window),
            Err(e) => {
                log::debug!("No void window at {}: {}", sky.instant, e);
                None
            }
        }
    }
}
