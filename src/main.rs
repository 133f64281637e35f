//! Starchat - terminal client for a streaming astrology answer service

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use starchat::app;
use starchat::types::config::{OutputMode, Settings};
use starchat::types::{BirthProfile, Config, Language};

#[derive(Parser, Debug)]
#[command(name = "starchat")]
#[command(about = "Starchat - ask the stars from your terminal")]
#[command(version)]
struct Args {
    /// Question to ask once. Without it, questions are read from stdin.
    #[arg(value_name = "QUESTION")]
    question: Option<String>,

    /// Name on the birth chart
    #[arg(long)]
    name: Option<String>,

    /// Birth date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<String>,

    /// Birth time (HH:MM, 24-hour)
    #[arg(long)]
    time: Option<String>,

    /// Birth place
    #[arg(long)]
    place: Option<String>,

    /// Birth latitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Birth longitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Response language
    #[arg(short, long, value_enum)]
    language: Option<Language>,

    /// Answer service base URL
    #[arg(long, env = "STARCHAT_BASE_URL")]
    base_url: Option<String>,

    /// API key (or set STARCHAT_API_KEY env var)
    #[arg(long, env = "STARCHAT_API_KEY", hide_env_values = true)]
    api_key: Option<secrecy::SecretString>,

    /// Settings file (defaults to the user config directory)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print answers as JSON instead of styled text
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Args {
    /// Applies profile flags on top of the settings profile.
    fn profile(&self, base: Option<BirthProfile>) -> Result<BirthProfile> {
        let missing = |field: &str| {
            anyhow::anyhow!(
                "Birth profile incomplete: --{field} is required (or set it under [profile] in the config file)"
            )
        };
        let from_file = base.is_some();
        let base = base.unwrap_or_default();
        let pick = |flag: &Option<String>, current: String, field: &str| -> Result<String> {
            match flag {
                Some(value) => Ok(value.clone()),
                None if !current.is_empty() => Ok(current),
                None => Err(missing(field)),
            }
        };
        let coordinate = |flag: Option<f64>, current: f64, field: &str| -> Result<f64> {
            match flag {
                Some(value) => Ok(value),
                None if from_file => Ok(current),
                None => Err(missing(field)),
            }
        };

        Ok(BirthProfile {
            latitude: coordinate(self.lat, base.latitude, "lat")?,
            longitude: coordinate(self.lon, base.longitude, "lon")?,
            name: pick(&self.name, base.name, "name")?,
            date: pick(&self.date, base.date, "date")?,
            time: pick(&self.time, base.time, "time")?,
            place: pick(&self.place, base.place, "place")?,
        })
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let filter = if args.debug { "debug" } else { "info" };
    // stdout carries only answers
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let settings = Settings::load(args.config.as_deref()).context("Failed to load settings")?;

    let mut endpoint_settings = settings.clone();
    if let Some(base_url) = &args.base_url {
        endpoint_settings.base_url.clone_from(base_url);
    }

    let config = Config {
        profile: args.profile(settings.profile.clone())?,
        api_key: args.api_key.clone(),
        endpoint_url: endpoint_settings.endpoint_url(),
        language: args.language.unwrap_or(settings.language),
        retry: settings.retry.clone(),
        loading: settings.loading.clone(),
        question: args.question.clone(),
        output: if args.json {
            OutputMode::Json
        } else {
            OutputMode::Styled
        },
    };

    let all_answered = app::run(config).await?;
    Ok(if all_answered {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
