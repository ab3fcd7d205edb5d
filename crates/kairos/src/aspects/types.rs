use crate::ephemeris::Body;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectKind {
    Conjunction,
    Sextile,
    Square,
    Trine,
    Opposition,
}

impl AspectKind {
    pub fn name(&self) -> &'static str {
        match self {
            AspectKind::Conjunction => "conjunction",
            AspectKind::Sextile => "sextile",
            AspectKind::Square => "square",
            AspectKind::Trine => "trine",
            AspectKind::Opposition => "opposition",
        }
    }

    /// Soft aspects; squares and oppositions are hard.
    pub fn is_harmonious(&self) -> bool {
        matches!(
            self,
            AspectKind::Conjunction | AspectKind::Sextile | AspectKind::Trine
        )
    }
}

/// One row of the aspect table: exact angle and allowed deviation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectOrb {
    pub kind: AspectKind,
    pub exact_angle: f64,
    pub tolerance: f64,
}

/// Ordered aspect table. Classification takes the first row that matches,
/// so row order is significant when tolerances overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectTable {
    pub entries: Vec<AspectOrb>,
}

impl AspectTable {
    pub fn new(entries: Vec<AspectOrb>) -> Self {
        Self { entries }
    }

    pub fn standard() -> Self {
        Self::new(vec![
            AspectOrb { kind: AspectKind::Conjunction, exact_angle: 0.0, tolerance: 8.0 },
            AspectOrb { kind: AspectKind::Sextile, exact_angle: 60.0, tolerance: 6.0 },
            AspectOrb { kind: AspectKind::Square, exact_angle: 90.0, tolerance: 8.0 },
            AspectOrb { kind: AspectKind::Trine, exact_angle: 120.0, tolerance: 8.0 },
            AspectOrb { kind: AspectKind::Opposition, exact_angle: 180.0, tolerance: 8.0 },
        ])
    }

    pub fn tolerance(&self, kind: AspectKind) -> Option<f64> {
        self.entries.iter().find(|e| e.kind == kind).map(|e| e.tolerance)
    }
}

impl Default for AspectTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Core aspect information for a pair of longitudes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectCore {
    pub kind: AspectKind,
    /// Exact angle for this aspect (0, 60, 90, 120, 180)
    pub exact_angle: f64,
    /// Normalized separation the aspect was classified from (0-180)
    pub separation: f64,
    /// Absolute deviation from the exact angle
    pub orb: f64,
    /// 1.0 at the exact angle, 0.0 at the tolerance boundary
    pub strength: f64,
    /// Approximated from longitude order only, not from relative speed
    pub is_applying: bool,
}

/// An aspect between two named bodies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngularRelationship {
    pub from: Body,
    pub to: Body,
    pub kind: AspectKind,
    pub orb: f64,
    pub strength: f64,
    pub is_applying: bool,
}
