use crate::aspects::types::{AngularRelationship, AspectCore, AspectTable};
use crate::ephemeris::{normalize_degrees, CelestialPosition, NatalChart, SkySnapshot};

/// Angular distance between two longitudes, normalized to 0-180.
pub fn angular_separation(lon1: f64, lon2: f64) -> f64 {
    let raw_diff = (normalize_degrees(lon1) - normalize_degrees(lon2)).abs();
    if raw_diff > 180.0 {
        360.0 - raw_diff
    } else {
        raw_diff
    }
}

/// Aspect calculator
#[derive(Debug, Clone, Default)]
pub struct AspectCalculator {
    table: AspectTable,
}

impl AspectCalculator {
    pub fn new(table: AspectTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &AspectTable {
        &self.table
    }

    /// Classify the angle between two longitudes.
    ///
    /// Rows are tested in table order and the first match wins, even if a
    /// later row would be closer. Returns `None` when the separation is
    /// outside every tolerance.
    pub fn classify(&self, lon1: f64, lon2: f64) -> Option<AspectCore> {
        let separation = angular_separation(lon1, lon2);

        for entry in &self.table.entries {
            let orb = (separation - entry.exact_angle).abs();
            if orb <= entry.tolerance {
                let strength = if entry.tolerance > 0.0 {
                    ((entry.tolerance - orb) / entry.tolerance).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                return Some(AspectCore {
                    kind: entry.kind,
                    exact_angle: entry.exact_angle,
                    separation,
                    orb,
                    strength,
                    // Longitude order stands in for applying/separating; scoring
                    // weights were tuned against this, so relative speed is ignored.
                    is_applying: normalize_degrees(lon2) > normalize_degrees(lon1),
                });
            }
        }

        None
    }

    pub fn relationship(
        &self,
        a: &CelestialPosition,
        b: &CelestialPosition,
    ) -> Option<AngularRelationship> {
        self.classify(a.longitude, b.longitude)
            .map(|core| AngularRelationship {
                from: a.body,
                to: b.body,
                kind: core.kind,
                orb: core.orb,
                strength: core.strength,
                is_applying: core.is_applying,
            })
    }

    /// All aspects between the resolved bodies of one snapshot, in body order.
    pub fn relationships(&self, sky: &SkySnapshot) -> Vec<AngularRelationship> {
        let positions: Vec<&CelestialPosition> = sky.positions.values().collect();
        let mut pairs = Vec::new();
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                if let Some(rel) = self.relationship(positions[i], positions[j]) {
                    pairs.push(rel);
                }
            }
        }
        pairs
    }

    /// Aspects from each transiting body to every natal body.
    pub fn transit_to_natal(
        &self,
        sky: &SkySnapshot,
        natal: &NatalChart,
    ) -> Vec<AngularRelationship> {
        let mut pairs = Vec::new();
        for transit in sky.positions.values() {
            for radix in natal.positions.values() {
                if let Some(rel) = self.relationship(transit, radix) {
                    pairs.push(rel);
                }
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspects::types::{AspectKind, AspectOrb};

    #[test]
    fn test_separation_wraps_across_zero() {
        assert!((angular_separation(350.0, 10.0) - 20.0).abs() < 1e-9);
        assert!((angular_separation(10.0, 350.0) - 20.0).abs() < 1e-9);
        assert!((angular_separation(0.0, 180.0) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_first_matching_row_wins() {
        // Overlapping rows: a wide conjunction listed before a sextile
        let table = AspectTable::new(vec![
            AspectOrb { kind: AspectKind::Conjunction, exact_angle: 0.0, tolerance: 58.0 },
            AspectOrb { kind: AspectKind::Sextile, exact_angle: 60.0, tolerance: 6.0 },
        ]);
        let calc = AspectCalculator::new(table);
        let aspect = calc.classify(0.0, 57.0).unwrap();
        assert_eq!(aspect.kind, AspectKind::Conjunction);
    }

    #[test]
    fn test_applying_follows_longitude_order() {
        let calc = AspectCalculator::default();
        assert!(calc.classify(100.0, 103.0).unwrap().is_applying);
        assert!(!calc.classify(103.0, 100.0).unwrap().is_applying);
    }
}
