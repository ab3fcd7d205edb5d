//! Essential dignity points used to bias planetary strength.
//!
//! Each classical body has a degree of exaltation, a representative point
//! of detriment and a point of fall (opposite the exaltation). A body close
//! enough to one of them is considered dignified or debilitated.

use crate::aspects::angular_separation;
use crate::ephemeris::Body;
use serde::{Deserialize, Serialize};

pub const EXALTATION_RADIUS: f64 = 5.0;
pub const DETRIMENT_RADIUS: f64 = 10.0;
pub const FALL_RADIUS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DignityState {
    Exaltation,
    Detriment,
    Fall,
    Peregrine,
}

impl DignityState {
    /// Strength adjustment contributed by this state
    pub fn adjustment(&self) -> f64 {
        match self {
            DignityState::Exaltation => 0.5,
            DignityState::Detriment => -0.3,
            DignityState::Fall => -0.5,
            DignityState::Peregrine => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DignityPoints {
    pub body: Body,
    /// Longitudes in degrees
    pub exaltation: f64,
    pub detriment: f64,
    pub fall: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DignityTable {
    pub entries: Vec<DignityPoints>,
}

impl DignityTable {
    pub fn new(entries: Vec<DignityPoints>) -> Self {
        Self { entries }
    }

    /// Traditional exaltation degrees; detriment at mid-sign of the sign
    /// opposite the domicile; fall opposite the exaltation.
    pub fn standard() -> Self {
        Self::new(vec![
            DignityPoints { body: Body::Sun, exaltation: 19.0, detriment: 315.0, fall: 199.0 },
            DignityPoints { body: Body::Moon, exaltation: 33.0, detriment: 285.0, fall: 213.0 },
            DignityPoints { body: Body::Mercury, exaltation: 165.0, detriment: 255.0, fall: 345.0 },
            DignityPoints { body: Body::Venus, exaltation: 357.0, detriment: 225.0, fall: 177.0 },
            DignityPoints { body: Body::Mars, exaltation: 298.0, detriment: 195.0, fall: 118.0 },
            DignityPoints { body: Body::Jupiter, exaltation: 105.0, detriment: 75.0, fall: 285.0 },
            DignityPoints { body: Body::Saturn, exaltation: 201.0, detriment: 105.0, fall: 21.0 },
        ])
    }

    pub fn points(&self, body: Body) -> Option<&DignityPoints> {
        self.entries.iter().find(|e| e.body == body)
    }

    /// Exaltation is checked first, then detriment, then fall.
    pub fn assess(&self, body: Body, longitude: f64) -> DignityState {
        let Some(points) = self.points(body) else {
            return DignityState::Peregrine;
        };

        if angular_separation(longitude, points.exaltation) <= EXALTATION_RADIUS {
            DignityState::Exaltation
        } else if angular_separation(longitude, points.detriment) <= DETRIMENT_RADIUS {
            DignityState::Detriment
        } else if angular_separation(longitude, points.fall) <= FALL_RADIUS {
            DignityState::Fall
        } else {
            DignityState::Peregrine
        }
    }
}

impl Default for DignityTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sun_exalted_in_aries() {
        let table = DignityTable::standard();
        assert_eq!(table.assess(Body::Sun, 19.0), DignityState::Exaltation);
        assert_eq!(table.assess(Body::Sun, 23.5), DignityState::Exaltation);
        assert_eq!(table.assess(Body::Sun, 25.0), DignityState::Peregrine);
    }

    #[test]
    fn test_exaltation_wraps_around_pisces() {
        let table = DignityTable::standard();
        // Venus exalted at 27 Pisces; 1 Aries is 4 degrees away
        assert_eq!(table.assess(Body::Venus, 1.0), DignityState::Exaltation);
    }

    #[test]
    fn test_detriment_and_fall() {
        let table = DignityTable::standard();
        assert_eq!(table.assess(Body::Mars, 190.0), DignityState::Detriment);
        assert_eq!(table.assess(Body::Mars, 120.0), DignityState::Fall);
        assert_eq!(table.assess(Body::Uranus, 120.0), DignityState::Peregrine);
    }
}
