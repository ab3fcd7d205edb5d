use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Tracked celestial bodies, in conventional ephemeris order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Body {
    pub const ALL: [Body; 10] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Body::Sun => "sun",
            Body::Moon => "moon",
            Body::Mercury => "mercury",
            Body::Venus => "venus",
            Body::Mars => "mars",
            Body::Jupiter => "jupiter",
            Body::Saturn => "saturn",
            Body::Uranus => "uranus",
            Body::Neptune => "neptune",
            Body::Pluto => "pluto",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Moon => "Moon",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
            Body::Pluto => "Pluto",
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown body id: {0}")]
pub struct UnknownBody(pub String);

impl FromStr for Body {
    type Err = UnknownBody;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Body::ALL
            .iter()
            .copied()
            .find(|b| b.id() == lower)
            .ok_or_else(|| UnknownBody(s.to_string()))
    }
}

/// Geographic location coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub lon: f64,
}

/// Position record as returned by a position source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPosition {
    /// Ecliptic longitude in degrees
    pub longitude: f64,
    /// Ecliptic latitude in degrees
    pub latitude: f64,
    /// Distance in AU
    pub distance: f64,
    /// Speed in longitude (degrees per day)
    pub speed: f64,
}

/// Normalize an angle into `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let n = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if n >= 360.0 {
        0.0
    } else {
        n
    }
}

/// A body's position at one instant. Value type, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CelestialPosition {
    pub body: Body,
    /// Longitude in degrees (0-360)
    pub longitude: f64,
    pub latitude: f64,
    pub distance: f64,
    /// Speed in longitude (degrees per day); negative means retrograde
    pub speed: f64,
}

impl CelestialPosition {
    pub fn from_raw(body: Body, raw: RawPosition) -> Self {
        Self {
            body,
            longitude: normalize_degrees(raw.longitude),
            latitude: raw.latitude,
            distance: raw.distance,
            speed: raw.speed,
        }
    }

    /// Zodiacal segment index (0-11)
    pub fn sign_index(&self) -> u8 {
        ((self.longitude / 30.0).floor() as u8).min(11)
    }

    /// Degree within the current sign (0 <= x < 30)
    pub fn degree_in_sign(&self) -> f64 {
        self.longitude % 30.0
    }

    pub fn is_retrograde(&self) -> bool {
        self.speed < 0.0
    }
}

/// Positions of every body that resolved at one instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkySnapshot {
    pub instant: DateTime<Utc>,
    pub positions: BTreeMap<Body, CelestialPosition>,
    /// Bodies the source failed to produce for this instant
    pub missing: Vec<Body>,
}

impl SkySnapshot {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant,
            positions: BTreeMap::new(),
            missing: Vec::new(),
        }
    }

    pub fn get(&self, body: Body) -> Option<&CelestialPosition> {
        self.positions.get(&body)
    }

    pub fn insert(&mut self, position: CelestialPosition) {
        self.positions.insert(position.body, position);
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Reference chart (birth profile) used for personalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NatalChart {
    pub positions: BTreeMap<Body, CelestialPosition>,
}

impl NatalChart {
    /// Build a chart from bare longitudes; speeds are irrelevant for a fixed chart.
    pub fn from_longitudes<I>(longitudes: I) -> Self
    where
        I: IntoIterator<Item = (Body, f64)>,
    {
        let positions = longitudes
            .into_iter()
            .map(|(body, lon)| {
                let pos = CelestialPosition::from_raw(
                    body,
                    RawPosition {
                        longitude: lon,
                        latitude: 0.0,
                        distance: 1.0,
                        speed: 0.0,
                    },
                );
                (body, pos)
            })
            .collect();
        Self { positions }
    }

    pub fn get(&self, body: Body) -> Option<&CelestialPosition> {
        self.positions.get(&body)
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
