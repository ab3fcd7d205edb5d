use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use kairos::ephemeris::{Body, LinearMotionSource, NatalChart, PositionSource};
use kairos::services::MemoryProfileStore;
use kairos::{RecommendationRequest, RecommendationResponse, ResponseStatus, TimingEngine, Urgency};
use kairos_config::{KairosConfig, SourceConfig};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const CLI_USER: &str = "cli";

#[derive(Clone, Copy, Debug, ValueEnum)]
enum UrgencyArg {
    Normal,
    Urgent,
    Flexible,
}

impl From<UrgencyArg> for Urgency {
    fn from(arg: UrgencyArg) -> Self {
        match arg {
            UrgencyArg::Normal => Urgency::Normal,
            UrgencyArg::Urgent => Urgency::Urgent,
            UrgencyArg::Flexible => Urgency::Flexible,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Rank favorable time windows for an activity")]
struct Args {
    /// Activity key, e.g. `meeting` or `road trip`.
    #[arg(long)]
    activity: String,

    /// One of business, relationships, health, travel, finance, creative.
    #[arg(long)]
    category: String,

    /// Days to scan, starting with the day holding `--at`.
    #[arg(long, default_value_t = 7)]
    days: u32,

    #[arg(long, value_enum, default_value_t = UrgencyArg::Normal)]
    urgency: UrgencyArg,

    /// Request instant (RFC 3339). Defaults to now.
    #[arg(long)]
    at: Option<DateTime<Utc>>,

    /// Requester's UTC offset in minutes (e.g. -300 for UTC-5).
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    utc_offset: i32,

    /// Recorded sky (JSON) to replay; overrides the configured source.
    #[arg(long)]
    sky: Option<PathBuf>,

    /// Birth chart as JSON longitudes, e.g. `{"sun": 200.0, "moon": 14.5}`.
    /// Turns personalization on.
    #[arg(long)]
    natal: Option<PathBuf>,

    /// Config file (otherwise `KAIROS_CONFIG` or `configs/kairos.toml`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the full response as JSON.
    #[arg(long)]
    json: bool,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<KairosConfig> {
    match path {
        Some(path) => kairos_config::load_from_path(path),
        None => match kairos_config::load() {
            Ok(config) => Ok(config),
            Err(e) => {
                log::warn!("{e}; using built-in defaults");
                Ok(KairosConfig::default())
            }
        },
    }
}

fn load_recorded_sky(path: &Path) -> anyhow::Result<LinearMotionSource> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read sky file {}", path.display()))?;
    LinearMotionSource::from_json(&text)
        .with_context(|| format!("Invalid sky file {}", path.display()))
}

fn build_source(args: &Args, config: &KairosConfig) -> anyhow::Result<Arc<dyn PositionSource>> {
    let source = match (&args.sky, &config.source) {
        (Some(path), _) => SourceConfig::Recorded { path: path.clone() },
        (None, Some(source)) => source.clone(),
        (None, None) => anyhow::bail!("No position source: pass --sky or configure [source]"),
    };

    match source {
        SourceConfig::Recorded { path } => Ok(Arc::new(load_recorded_sky(&path)?)),
        #[cfg(feature = "swiss-ephemeris")]
        SourceConfig::SwissEphemeris { data_path } => {
            let adapter = kairos::ephemeris::SwissEphemerisAdapter::new(data_path)
                .context("Could not open Swiss Ephemeris data")?;
            Ok(Arc::new(adapter))
        }
        #[cfg(not(feature = "swiss-ephemeris"))]
        SourceConfig::SwissEphemeris { .. } => {
            anyhow::bail!("This build has no Swiss Ephemeris support (enable the `swiss-ephemeris` feature)")
        }
    }
}

fn load_natal(path: &Path) -> anyhow::Result<NatalChart> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read natal chart {}", path.display()))?;
    let longitudes: BTreeMap<Body, f64> = serde_json::from_str(&text)
        .with_context(|| format!("Invalid natal chart {}", path.display()))?;
    Ok(NatalChart::from_longitudes(longitudes))
}

fn print_report(response: &RecommendationResponse) {
    match response.status {
        ResponseStatus::UnknownCategory => {
            println!("Unknown category '{}'", response.category);
            return;
        }
        ResponseStatus::UnknownActivity => {
            println!("'{}' is not an activity of {}", response.activity, response.category);
            return;
        }
        ResponseStatus::NoFavorableWindows => {
            println!("No favorable windows in the next {} day(s)", response.horizon_days);
        }
        ResponseStatus::Ok => {}
    }

    if let Some(now) = &response.conditions {
        println!(
            "Now: {} ({:.0}% lit), {} hour{}",
            now.phase.phase,
            now.phase.illumination * 100.0,
            now.planetary_hour.ruler,
            if now.void_moon.is_some() { ", Moon void of course" } else { "" }
        );
        if !now.retrograde.is_empty() {
            let names: Vec<String> = now.retrograde.iter().map(|b| b.to_string()).collect();
            println!("Retrograde: {}", names.join(", "));
        }
    }

    for rec in &response.recommendations {
        println!(
            "#{:<2} {} - {}  score {:.2}  confidence {:.2}  ({} hour)",
            rec.rank,
            rec.window.start.format("%Y-%m-%d %H:%M"),
            rec.window.end.format("%H:%M UTC"),
            rec.final_score,
            rec.confidence,
            rec.window.ruling_body()
        );
        if let Some(explanation) = &rec.explanation {
            println!("    {}", explanation.summary);
            println!("    {}", explanation.advice);
        }
    }
    println!("Overall confidence: {:.2}", response.overall_confidence);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    let source = build_source(&args, &config)?;

    let mut engine = TimingEngine::new(source)
        .with_tables(Arc::clone(&config.tables))
        .with_settings(config.engine.clone());

    let mut request = RecommendationRequest::new(
        &args.activity,
        &args.category,
        args.days,
        args.at.unwrap_or_else(Utc::now),
    );
    request.urgency = args.urgency.into();
    request.utc_offset_minutes = args.utc_offset;

    if let Some(path) = &args.natal {
        let store = Arc::new(MemoryProfileStore::new());
        store.insert(CLI_USER, load_natal(path)?).await;
        engine = engine.with_profiles(store);
        request.personalize = true;
        request.user_id = Some(CLI_USER.to_string());
    }

    let response = engine.recommend(&request).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_report(&response);
    }
    Ok(())
}
