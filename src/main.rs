//! NutriScan - nutrition label scanning and AR portion planning
//!
//! The portable core of a label-scanning app: recognized text goes in, an
//! extracted facts table and an AR portion-stack plan come out. Camera, OCR
//! and AR rendering belong to the host platform; the CLI drives the pipeline
//! with recorded recognizer output or one of the built-in sample labels.

mod app;
mod capture;
mod config;
mod label;
mod portion;
mod recognition;
mod scene;
mod session;

use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::app::NutriScanApp;
use crate::capture::{find_sample, CapturedPhoto, SAMPLE_LABELS};
use crate::config::AppConfig;
use crate::label::RESCAN_PROMPT;
use crate::portion::plan_stack;
use crate::recognition::{RecordedRecognizer, TextRecognizer};
use crate::scene::RaycastHit;

/// NutriScan - scan a nutrition-facts label and plan its AR portion stack
#[derive(Parser, Debug)]
#[command(name = "nutriscan")]
#[command(about = "Scan a nutrition-facts label and plan its AR portion stack")]
struct Args {
    /// Built-in sample label to scan
    #[arg(long)]
    sample: Option<String>,

    /// Recorded recognizer output, one recognized line per row
    #[arg(long)]
    lines: Option<PathBuf>,

    /// Recorded recognizer output as JSON with candidate confidences
    #[arg(long)]
    observations: Option<PathBuf>,

    /// Label photo to attach to the scan (PNG/JPEG)
    #[arg(long)]
    photo: Option<PathBuf>,

    /// Also plan the AR portion stack from the parsed serving size
    #[arg(long)]
    portion: bool,

    /// Configuration file (defaults to the per-user config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// List built-in sample labels and exit
    #[arg(long)]
    list_samples: bool,
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    if args.list_samples {
        println!("Built-in sample labels:");
        for sample in &SAMPLE_LABELS {
            println!("  {} - {}", sample.name, sample.description);
        }
        return Ok(());
    }

    let recognizer = build_recognizer(&args)?;
    let config = load_or_create_config(args.config.as_deref());

    info!("NutriScan starting...");

    let photo = match &args.photo {
        Some(path) => CapturedPhoto::load(path)?,
        None => CapturedPhoto::placeholder(),
    };

    let app = NutriScanApp::new(&config, recognizer);

    // Walk the session through onboarding onto the camera screen
    {
        let session = app.session();
        let mut session = session.write();
        while !session.can_begin() {
            session.advance_onboarding();
        }
        session.begin()?;
    }

    app.scan_blocking(photo)?;

    let session = app.session();
    let mut session = session.write();

    println!("Nutrition Facts:");
    if session.facts().is_empty() {
        println!("  (no fields recognized)");
    }
    for (field, value) in session.facts().iter_sorted() {
        println!("  {}: {}", field.prefix(), value);
    }

    if args.portion {
        match session.request_portion() {
            Ok(serving) => {
                println!();
                println!("Serving size: {} {}", serving.quantity, serving.unit);

                // Plan against a surface hit at the world origin
                let hit = RaycastHit::at(0.0, 0.0, 0.0);
                let plan = plan_stack(serving.quantity, &hit, &config.portion);

                println!("Portion stack ({} cubes):", plan.len());
                for cube in &plan {
                    println!(
                        "  #{:<3} rest y={:.3}m  drop after {}ms  color=[{:.2}, {:.2}, {:.2}]",
                        cube.index, cube.rest.y, cube.delay_ms, cube.color[0], cube.color[1], cube.color[2]
                    );
                }

                session.continue_to_conclusion()?;
            }
            Err(_) => {
                println!();
                println!("{RESCAN_PROMPT}");
            }
        }
    }

    Ok(())
}

/// Pick the recognizer backend from the command line
fn build_recognizer(args: &Args) -> Result<Box<dyn TextRecognizer>> {
    if let Some(name) = &args.sample {
        let sample = find_sample(name)
            .ok_or_else(|| anyhow!("Unknown sample label '{name}', try --list-samples"))?;
        return Ok(Box::new(RecordedRecognizer::from_lines(sample.lines)));
    }
    if let Some(path) = &args.observations {
        return Ok(Box::new(RecordedRecognizer::load_observations(path)?));
    }
    if let Some(path) = &args.lines {
        return Ok(Box::new(RecordedRecognizer::load_lines(path)?));
    }
    Err(anyhow!(
        "No recognizer input; pass --sample, --lines or --observations (or --list-samples)"
    ))
}

/// Load configuration from file or create default
fn load_or_create_config(path: Option<&Path>) -> AppConfig {
    if let Some(path) = path {
        match config::load_config(path) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", path);
                return config;
            }
            Err(e) => {
                tracing::warn!("Failed to load {:?} ({e}), using defaults", path);
                return AppConfig::default();
            }
        }
    }

    if let Ok(config_dir) = config::get_config_dir() {
        let config_path = config_dir.join("config.toml");
        if config_path.exists() {
            if let Ok(config) = config::load_config(&config_path) {
                info!("Loaded configuration from {:?}", config_path);
                return config;
            }
        }
    }
    info!("Using default configuration");
    AppConfig::default()
}
