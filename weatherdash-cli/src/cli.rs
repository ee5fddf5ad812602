use std::{io::Write, process::ExitCode};

use anyhow::{Context, bail};
use chrono::{Local, Timelike};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use serde::Serialize;
use tracing::{debug, info};
use weatherdash_core::{
    AlertEvaluator, AppController, Config, LocationQuery, Presentation, ViewModel,
    WeatherSnapshot,
    alerts::{NoAdvisories, StormWatch},
    config::DEFAULT_LOCATION,
    geolocation::{self, Geolocator},
    model::parse_coordinates,
    provider_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherdash", version, about = "Terminal weather dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI.com key, default location and home coordinates.
    Configure,

    /// Show the dashboard once and exit.
    Show {
        /// City name or "lat,lon". Defaults to the configured location.
        location: Option<String>,

        /// Use the configured home coordinates.
        #[arg(long, conflicts_with = "location")]
        here: bool,

        /// Print the snapshot and derived data as JSON.
        #[arg(long)]
        json: bool,

        /// Add the demo thunderstorm watch advisory.
        #[arg(long)]
        storm_watch: bool,
    },

    /// Interactive dashboard with a search prompt.
    Dashboard {
        /// Add the demo thunderstorm watch advisory.
        #[arg(long)]
        storm_watch: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { location, here, json, storm_watch } => {
                let config = Config::load()?;
                show(&config, location.as_deref(), here, json, storm_watch).await
            }
            Command::Dashboard { storm_watch } => {
                let config = Config::load()?;
                dashboard(&config, storm_watch).await
            }
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    snapshot: &'a WeatherSnapshot,
    presentation: &'a Presentation,
}

fn build_evaluator(config: &Config, storm_watch: bool) -> AlertEvaluator {
    if storm_watch {
        AlertEvaluator::new(config.thresholds, StormWatch::always())
    } else {
        AlertEvaluator::new(config.thresholds, NoAdvisories)
    }
}

fn build_controller(config: &Config) -> anyhow::Result<AppController> {
    let provider = provider_from_config(config)?;
    Ok(AppController::new(provider, config.default_location_query()?))
}

fn draw(view: &ViewModel, evaluator: &AlertEvaluator) -> anyhow::Result<()> {
    let hour = Local::now().hour();
    let presentation = view
        .snapshot
        .as_deref()
        .map(|s| Presentation::for_snapshot(s, evaluator, hour));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render::render(&mut out, view, presentation.as_ref(), hour)?;
    out.flush()?;
    Ok(())
}

async fn show(
    config: &Config,
    location: Option<&str>,
    here: bool,
    json: bool,
    storm_watch: bool,
) -> anyhow::Result<ExitCode> {
    let controller = build_controller(config)?;
    let evaluator = build_evaluator(config, storm_watch);

    if here {
        controller.locate(geolocation::from_config(config).as_ref()).await;
    } else if let Some(location) = location {
        if controller.submit(location).await.is_none() {
            bail!("Location must not be empty");
        }
    } else {
        controller.mount().await;
    }

    let view = controller.view();

    if json {
        if let Some(snapshot) = view.snapshot.as_deref() {
            let presentation = Presentation::for_snapshot(snapshot, &evaluator, Local::now().hour());
            let report = JsonReport { snapshot, presentation: &presentation };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    if !json || view.error.is_some() {
        draw(&view, &evaluator)?;
    }

    Ok(if view.error.is_some() { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

async fn dashboard(config: &Config, storm_watch: bool) -> anyhow::Result<ExitCode> {
    let controller = build_controller(config)?;
    let evaluator = build_evaluator(config, storm_watch);
    let geolocator: Box<dyn Geolocator> = geolocation::from_config(config);

    eprintln!("Loading weather for {}...", controller.default_location());
    controller.mount().await;

    loop {
        println!();
        draw(&controller.view(), &evaluator)?;
        println!();

        let input = Text::new("Search location:")
            .with_help_message(":here uses your home coordinates, :q or Esc quits")
            .prompt_skippable();

        let input = match input {
            Ok(Some(input)) => input,
            Ok(None) | Err(InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read search input"),
        };

        match input.trim() {
            ":q" | ":quit" => break,
            ":here" => {
                debug!("Searching by home coordinates");
                controller.locate(geolocator.as_ref()).await;
            }
            text => match controller.submit(text).await {
                Some(outcome) => debug!(location = text, ?outcome, "Search finished"),
                None => debug!("Ignoring blank search"),
            },
        }
    }

    info!("Dashboard closed");
    Ok(ExitCode::SUCCESS)
}

fn configure() -> anyhow::Result<ExitCode> {
    let mut config = Config::load()?;

    let api_key = Password::new("WeatherAPI.com API key (empty keeps the current one):")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()?;
    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }

    let current_default = config.default_location.clone().unwrap_or_else(|| DEFAULT_LOCATION.into());
    let default_location = Text::new("Default location:").with_default(&current_default).prompt()?;
    default_location
        .parse::<LocationQuery>()
        .context("Default location must not be empty")?;
    config.default_location = Some(default_location.trim().to_string());

    let home = Text::new("Home coordinates as lat,lon (empty to skip):")
        .with_initial_value(config.home.as_deref().unwrap_or_default())
        .prompt()?;
    let home = home.trim();
    if home.is_empty() {
        config.home = None;
    } else if parse_coordinates(home).is_some() {
        config.home = Some(home.to_string());
    } else {
        bail!("'{home}' is not a valid lat,lon pair");
    }

    let path = config.save()?;
    info!(path = %path.display(), "Configuration saved");
    println!("Saved configuration to {}", path.display());

    Ok(ExitCode::SUCCESS)
}
