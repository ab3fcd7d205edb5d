use crate::ephemeris::{Body, SkySnapshot};

/// A body is retrograde whenever its longitudinal speed is negative.
pub fn is_retrograde(speed: f64) -> bool {
    speed < 0.0
}

pub fn retrograde_bodies(sky: &SkySnapshot) -> Vec<Body> {
    sky.positions
        .values()
        .filter(|p| is_retrograde(p.speed))
        .map(|p| p.body)
        .collect()
}

/// Retrograde bodies out of those an activity wants direct.
pub fn impacted_bodies(sky: &SkySnapshot, avoid: &[Body]) -> Vec<Body> {
    retrograde_bodies(sky)
        .into_iter()
        .filter(|b| avoid.contains(b))
        .collect()
}
