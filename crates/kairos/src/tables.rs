//! Process-wide lookup tables.
//!
//! Everything here is read-only once built. The standard set is built once
//! and shared; tests and configuration can inject their own.

use crate::aspects::AspectTable;
use crate::timing::{PlanetaryHourTable, ProfileTable};
use crate::western::DignityTable;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

lazy_static::lazy_static! {
    static ref STANDARD_TABLES: Arc<TimingTables> = Arc::new(TimingTables::standard());
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingTables {
    pub aspects: AspectTable,
    pub dignities: DignityTable,
    pub profiles: ProfileTable,
    pub hours: PlanetaryHourTable,
}

impl TimingTables {
    pub fn standard() -> Self {
        Self {
            aspects: AspectTable::standard(),
            dignities: DignityTable::standard(),
            profiles: ProfileTable::standard(),
            hours: PlanetaryHourTable::standard(),
        }
    }

    /// The standard tables, built on first use.
    pub fn shared() -> Arc<Self> {
        Arc::clone(&STANDARD_TABLES)
    }
}

impl Default for TimingTables {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::ActivityCategory;

    #[test]
    fn test_shared_tables_are_built_once() {
        assert!(Arc::ptr_eq(&TimingTables::shared(), &TimingTables::shared()));
    }

    #[test]
    fn test_partial_override_keeps_other_tables() {
        let json = r#"{"aspects": {"entries": [{"kind": "conjunction", "exact_angle": 0.0, "tolerance": 10.0}]}}"#;
        let tables: TimingTables = serde_json::from_str(json).unwrap();
        assert_eq!(tables.aspects.entries.len(), 1);
        assert!(tables.profiles.get(ActivityCategory::Finance).is_some());
        assert_eq!(tables.dignities, DignityTable::standard());
    }
}
