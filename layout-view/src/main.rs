//! Application entry point for the building layout viewer.
//!
//! This binary parses the command line, loads a layout request and
//! delegates all interactive logic and rendering to [`Viewer`] from the
//! `viewer` module.

mod viewer;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use layout_core::{BuildingTemplate, LayoutConfig, LayoutRequest, LinkSpec};
use serde::de::DeserializeOwned;
use tracing::info;
use tracing_subscriber::EnvFilter;
use viewer::Viewer;

/// Animate a force-directed building layout.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Layout request JSON (`buildings`, `links`, `seed`, `fast`). A small
    /// built-in scenario is shown when omitted.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Layout tunables JSON; missing keys keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the scenario's seed.
    #[arg(long)]
    seed: Option<i64>,

    /// Run to convergence before showing the layout.
    #[arg(long)]
    fast: bool,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn builtin_scenario() -> LayoutRequest {
    LayoutRequest {
        buildings: vec![
            BuildingTemplate::rectangle("kitchen", "Kitchen", 8.0, 6.0).with_color("#f97316"),
            BuildingTemplate::rectangle("storage", "Storage", 8.0, 8.0).with_color("#3b82f6"),
            BuildingTemplate::rectangle("barracks", "Barracks", 12.0, 6.0).with_color("#22c55e"),
            BuildingTemplate::circle("well", "Well", 4.0).with_color("#06b6d4"),
            BuildingTemplate::circle("tower", "Tower", 6.0).with_color("#a855f7"),
        ],
        links: vec![
            LinkSpec::new("kitchen", "storage", 6.0),
            LinkSpec::new("kitchen", "well", 8.0),
            LinkSpec::new("barracks", "tower", 5.0),
        ],
        seed: 12345,
        fast: false,
    }
}

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if an input file cannot be loaded, the scenario is invalid, or
///   eframe fails to create the native window or event loop.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut request = match &args.scenario {
        Some(path) => read_json(path)?,
        None => builtin_scenario(),
    };
    if let Some(seed) = args.seed {
        request.seed = seed;
    }
    request.fast |= args.fast;

    let cfg: LayoutConfig = match &args.config {
        Some(path) => read_json(path)?,
        None => LayoutConfig::default(),
    };

    info!(
        buildings = request.buildings.len(),
        links = request.links.len(),
        seed = request.seed,
        fast = request.fast,
        "loaded scenario"
    );
    let viewer = Viewer::new(request, cfg).context("invalid scenario")?;

    eframe::run_native(
        "Building Layout",
        eframe::NativeOptions::default(),
        Box::new(|_cc| Ok(Box::new(viewer))),
    )
    .map_err(|e| anyhow!("viewer failed: {e}"))
}
