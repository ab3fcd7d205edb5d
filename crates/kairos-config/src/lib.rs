use kairos::timing::{ActivityCategory, DaylightModel};
use kairos::{EngineSettings, TimingTables};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const CONFIG_ENV: &str = "KAIROS_CONFIG";

/// Where body positions come from.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceConfig {
    /// A recorded sky replayed with linear motion (JSON)
    Recorded { path: PathBuf },
    /// Swiss Ephemeris data files; needs the `swiss-ephemeris` feature
    SwissEphemeris { data_path: Option<PathBuf> },
}

#[derive(Debug, Clone)]
pub struct KairosConfig {
    pub engine: EngineSettings,
    pub tables: Arc<TimingTables>,
    pub source: Option<SourceConfig>,
}

impl Default for KairosConfig {
    fn default() -> Self {
        Self {
            engine: EngineSettings::default(),
            tables: TimingTables::shared(),
            source: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum SourceToml {
    Recorded { path: PathBuf },
    SwissEphemeris {
        #[serde(default)]
        data_path: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Deserialize)]
struct RootConfigToml {
    #[serde(default)]
    engine: EngineSettings,
    #[serde(default)]
    tables: Option<TimingTables>,
    #[serde(default)]
    source: Option<SourceToml>,
}

/// `KAIROS_CONFIG` if set, otherwise the usual relative locations of
/// `configs/kairos.toml`.
pub fn read_config_text() -> anyhow::Result<(PathBuf, String)> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        let path = PathBuf::from(path);
        let text = fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Could not read {} from {CONFIG_ENV}: {e}", path.display()))?;
        return Ok((path, text));
    }

    let paths = ["configs/kairos.toml", "../../configs/kairos.toml"];
    for p in &paths {
        if let Ok(c) = fs::read_to_string(p) {
            return Ok((PathBuf::from(p), c));
        }
    }
    anyhow::bail!("Could not load kairos.toml from {:?}", paths);
}

/// Parse and validate. Relative source paths resolve against `base_dir`.
pub fn parse_config(text: &str, base_dir: &Path) -> anyhow::Result<KairosConfig> {
    let root: RootConfigToml =
        toml::from_str(text).map_err(|e| anyhow::anyhow!("Failed to parse kairos config: {e}"))?;

    validate_engine(&root.engine)?;
    let tables = match root.tables {
        Some(tables) => {
            validate_tables(&tables)?;
            Arc::new(tables)
        }
        None => TimingTables::shared(),
    };

    let source = root.source.map(|s| match s {
        SourceToml::Recorded { path } => SourceConfig::Recorded {
            path: resolve(base_dir, path),
        },
        SourceToml::SwissEphemeris { data_path } => SourceConfig::SwissEphemeris {
            data_path: data_path.map(|p| resolve(base_dir, p)),
        },
    });

    Ok(KairosConfig {
        engine: root.engine,
        tables,
        source,
    })
}

fn resolve(base_dir: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base_dir.join(path)
    }
}

pub fn load_from_path(path: &Path) -> anyhow::Result<KairosConfig> {
    let text = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Could not read config {}: {e}", path.display()))?;
    parse_config(&text, path.parent().unwrap_or_else(|| Path::new(".")))
}

pub fn load() -> anyhow::Result<KairosConfig> {
    let (path, text) = read_config_text()?;
    parse_config(&text, path.parent().unwrap_or_else(|| Path::new(".")))
}

pub fn validate_engine(engine: &EngineSettings) -> anyhow::Result<()> {
    if !(0.0..=1.0).contains(&engine.confidence_threshold) {
        anyhow::bail!(
            "engine.confidence_threshold must be within [0, 1], got {}",
            engine.confidence_threshold
        );
    }
    if engine.max_recommendations == 0 {
        anyhow::bail!("engine.max_recommendations must be at least 1");
    }
    if engine.max_horizon_days == 0 || engine.max_horizon_days > 366 {
        anyhow::bail!(
            "engine.max_horizon_days must be within 1..=366, got {}",
            engine.max_horizon_days
        );
    }
    if engine.void_ceiling_hours <= 0.0 {
        anyhow::bail!("engine.void_ceiling_hours must be positive");
    }
    if engine.void_penalty_hours < 0.0 || engine.void_penalty_hours >= engine.void_ceiling_hours {
        anyhow::bail!(
            "engine.void_penalty_hours must be within [0, {}), got {}",
            engine.void_ceiling_hours,
            engine.void_penalty_hours
        );
    }
    for required in [kairos::ephemeris::Body::Sun, kairos::ephemeris::Body::Moon] {
        if !engine.tracked_bodies.contains(&required) {
            anyhow::bail!("engine.tracked_bodies must include {required}");
        }
    }
    match &engine.daylight {
        DaylightModel::Fixed { sunrise_hour, sunset_hour } => {
            if !(0.0 <= *sunrise_hour && sunrise_hour < sunset_hour && *sunset_hour <= 24.0) {
                anyhow::bail!(
                    "engine.daylight needs 0 <= sunrise_hour < sunset_hour <= 24, got {sunrise_hour} / {sunset_hour}"
                );
            }
        }
        DaylightModel::Solar { location } => {
            if !(-90.0..=90.0).contains(&location.lat) || !(-180.0..=180.0).contains(&location.lon) {
                anyhow::bail!(
                    "engine.daylight.location out of range: lat {}, lon {}",
                    location.lat,
                    location.lon
                );
            }
        }
    }
    Ok(())
}

pub fn validate_tables(tables: &TimingTables) -> anyhow::Result<()> {
    if tables.aspects.entries.is_empty() {
        anyhow::bail!("tables.aspects must list at least one aspect");
    }
    for entry in &tables.aspects.entries {
        if entry.tolerance < 0.0 || !(0.0..=180.0).contains(&entry.exact_angle) {
            anyhow::bail!("Invalid aspect row for {}: {:?}", entry.kind.name(), entry);
        }
    }
    for category in ActivityCategory::ALL {
        let profile = tables
            .profiles
            .get(category)
            .ok_or_else(|| anyhow::anyhow!("tables.profiles is missing the {category} profile"))?;
        if profile.activities.is_empty() {
            anyhow::bail!("The {category} profile lists no activities");
        }
        if !(0.0..=1.0).contains(&profile.baseline_confidence) {
            anyhow::bail!(
                "The {category} profile baseline_confidence must be within [0, 1], got {}",
                profile.baseline_confidence
            );
        }
        if profile.segment_weights.iter().any(|w| !(0.0..=1.0).contains(w)) {
            anyhow::bail!("The {category} profile has segment weights outside [0, 1]");
        }
        if profile.preferred_hours.start > 23 || profile.preferred_hours.end > 24 {
            anyhow::bail!("The {category} profile has preferred hours outside a day");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_is_all_defaults() {
        let config = parse_config("", Path::new(".")).unwrap();
        assert_eq!(config.engine, EngineSettings::default());
        assert!(Arc::ptr_eq(&config.tables, &TimingTables::shared()));
        assert_eq!(config.source, None);
    }

    #[test]
    fn test_engine_section_overrides() {
        let text = r#"
[engine]
confidence_threshold = 0.7
max_recommendations = 5
tracked_bodies = ["sun", "moon", "mercury"]

[engine.daylight]
model = "solar"
location = { lat = 51.48, lon = 0.0 }
"#;
        let config = parse_config(text, Path::new(".")).unwrap();
        assert_eq!(config.engine.confidence_threshold, 0.7);
        assert_eq!(config.engine.max_recommendations, 5);
        assert_eq!(config.engine.tracked_bodies.len(), 3);
        assert_eq!(config.engine.max_horizon_days, 30);
        assert!(matches!(config.engine.daylight, DaylightModel::Solar { .. }));
    }

    #[test]
    fn test_out_of_range_settings_are_rejected() {
        let err = parse_config("[engine]\nconfidence_threshold = 1.5\n", Path::new(".")).unwrap_err();
        assert!(err.to_string().contains("confidence_threshold"));

        let err = parse_config("[engine]\ntracked_bodies = [\"mars\"]\n", Path::new(".")).unwrap_err();
        assert!(err.to_string().contains("tracked_bodies"));

        let err = parse_config("[engine]\nvoid_penalty_hours = 60.0\n", Path::new(".")).unwrap_err();
        assert!(err.to_string().contains("void_penalty_hours"));
    }

    #[test]
    fn test_table_override_must_cover_every_category() {
        let text = r#"
[[tables.profiles.profiles]]
category = "business"
activities = ["meeting"]
favorable_bodies = ["mercury"]
avoid_retrograde = ["mercury"]
favorable_phases = ["new"]
baseline_confidence = 0.7
preferred_hours = { start = 9, end = 17 }
segment_weights = [0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5]
"#;
        let err = parse_config(text, Path::new(".")).unwrap_err();
        assert!(err.to_string().contains("relationships"), "{err}");
    }

    #[test]
    fn test_recorded_source_resolves_next_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kairos.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[source]\nkind = \"recorded\"\npath = \"sky.json\"").unwrap();

        let config = load_from_path(&path).unwrap();
        assert_eq!(
            config.source,
            Some(SourceConfig::Recorded { path: dir.path().join("sky.json") })
        );
    }

    #[test]
    fn test_sample_config_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../configs/kairos.toml");
        let config = load_from_path(&path).unwrap();
        assert_eq!(config.engine, EngineSettings::default());
        assert!(matches!(config.source, Some(SourceConfig::Recorded { .. })));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from_path(&dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }
}
