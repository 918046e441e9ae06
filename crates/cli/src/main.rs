#![deny(unsafe_code)]
//! CLI binary for the led-palette generator.
//!
//! Subcommands:
//! - `generate` — build an ordered palette and print its colors
//! - `list` — print available strategies

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use led_palette_core::{
    generate, HclBounds, Optimizer, Palette, PaletteRequest, PaletteStrategy, Rgb, Xorshift64,
};
use std::path::PathBuf;
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "led-palette", about = "Perceptually spread LED palette generator")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate an ordered palette and print it.
    Generate {
        /// Number of colors (1-16).
        #[arg(short = 'n', long)]
        size: Option<usize>,

        /// Hue range in degrees, as MIN:MAX.
        #[arg(long)]
        hue: Option<String>,

        /// Chroma range, as MIN:MAX.
        #[arg(long)]
        chroma: Option<String>,

        /// Lightness range, as MIN:MAX.
        #[arg(long)]
        lightness: Option<String>,

        /// Strategy name (repulsion, kmeans).
        #[arg(short, long)]
        strategy: Option<String>,

        /// PRNG seed. Defaults to a time-derived value.
        #[arg(long)]
        seed: Option<u64>,

        /// Strategy parameters as a JSON string.
        #[arg(long)]
        params: Option<String>,

        /// JSON request file; flags override its fields.
        #[arg(short, long)]
        request: Option<PathBuf>,

        /// Also print this many evenly spaced gradient samples.
        #[arg(short, long)]
        gradient: Option<usize>,
    },
    /// List available strategies.
    List,
}

/// Flag overrides for a [`PaletteRequest`].
struct Overrides {
    size: Option<usize>,
    hue: Option<String>,
    chroma: Option<String>,
    lightness: Option<String>,
    strategy: Option<String>,
    seed: Option<u64>,
    params: Option<String>,
}

/// Parses `"MIN:MAX"` into an integer pair.
fn parse_range(axis: &str, text: &str) -> Result<(i32, i32), CliError> {
    let bad = || CliError::Input(format!("invalid --{axis} range {text:?}: expected MIN:MAX"));
    let (min, max) = text.split_once(':').ok_or_else(bad)?;
    let min = min.trim().parse().map_err(|_| bad())?;
    let max = max.trim().parse().map_err(|_| bad())?;
    Ok((min, max))
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Reads a request file, also reporting whether it sets `seed` explicitly.
fn load_request(path: Option<&PathBuf>) -> Result<(PaletteRequest, bool), CliError> {
    let Some(path) = path else {
        return Ok((PaletteRequest::default(), false));
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("cannot read {}: {e}", path.display())))?;
    let invalid =
        |e: serde_json::Error| CliError::Input(format!("invalid request file {}: {e}", path.display()));
    let value: serde_json::Value = serde_json::from_str(&text).map_err(invalid)?;
    let has_seed = value.get("seed").is_some();
    let request = serde_json::from_value(value).map_err(invalid)?;
    Ok((request, has_seed))
}

/// Applies flag overrides on top of `base`. A missing seed in both places
/// falls back to the clock.
fn build_request(
    mut base: PaletteRequest,
    overrides: Overrides,
    seed_in_file: bool,
) -> Result<PaletteRequest, CliError> {
    if let Some(size) = overrides.size {
        base.size = size;
    }
    if let Some(text) = &overrides.hue {
        (base.bounds.hue_min, base.bounds.hue_max) = parse_range("hue", text)?;
    }
    if let Some(text) = &overrides.chroma {
        (base.bounds.chroma_min, base.bounds.chroma_max) = parse_range("chroma", text)?;
    }
    if let Some(text) = &overrides.lightness {
        (base.bounds.lightness_min, base.bounds.lightness_max) =
            parse_range("lightness", text)?;
    }
    if let Some(strategy) = overrides.strategy {
        base.strategy = strategy;
    }
    if let Some(text) = &overrides.params {
        base.params = serde_json::from_str(text)
            .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    }
    match overrides.seed {
        Some(seed) => base.seed = seed,
        None if !seed_in_file => {
            base.seed = time_seed();
            tracing::info!(seed = base.seed, "using time-derived seed");
        }
        None => {}
    }
    Ok(base)
}

/// Resolves the strategy once and runs the pipeline with it.
fn build_palette(request: &PaletteRequest) -> Result<(PaletteStrategy, Palette), CliError> {
    let optimizer = request.optimizer()?;
    let mut rng = Xorshift64::new(request.seed);
    let palette = generate(
        request.size,
        &request.bounds,
        &optimizer,
        &mut rng,
        request.max_attempts,
    )?;
    Ok((optimizer, palette))
}

fn print_palette(
    request: &PaletteRequest,
    optimizer: &PaletteStrategy,
    palette: &Palette,
    gradient: Option<Vec<Rgb>>,
    json: bool,
) -> Result<(), CliError> {
    if json {
        let mut info = serde_json::json!({
            "size": request.size,
            "seed": request.seed,
            "strategy": optimizer.name(),
            "params": optimizer.params(),
            "bounds": request.bounds,
            "colors": palette.colors(),
            "lab": palette.lab(),
            "diagnostics": palette.diagnostics(),
        });
        if let Some(samples) = gradient {
            info["gradient"] = serde_json::to_value(samples)?;
        }
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        for c in palette.colors() {
            println!("{} {:>3} {:>3} {:>3}", c.to_hex(), c.r, c.g, c.b);
        }
        if let Some(samples) = gradient {
            println!();
            for c in samples {
                println!("{}", c.to_hex());
            }
        }
        eprintln!(
            "generated {} colors ({}, seed {})",
            palette.len(),
            optimizer.name(),
            request.seed
        );
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let names = PaletteStrategy::list_names();
            if cli.json {
                let strategies = names
                    .iter()
                    .map(|name| {
                        PaletteStrategy::from_name(name, &serde_json::json!({}))
                            .map(|s| serde_json::json!({"name": name, "params": s.param_schema()}))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let info = serde_json::json!({
                    "strategies": strategies,
                    "default_bounds": HclBounds::FULL,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Strategies:");
                for name in names {
                    println!("  {name}");
                }
            }
        }
        Command::Generate {
            size,
            hue,
            chroma,
            lightness,
            strategy,
            seed,
            params,
            request,
            gradient,
        } => {
            let (base, seed_in_file) = load_request(request.as_ref())?;
            let overrides = Overrides {
                size,
                hue,
                chroma,
                lightness,
                strategy,
                seed,
                params,
            };
            let request = build_request(base, overrides, seed_in_file)?;
            let (optimizer, palette) = build_palette(&request)?;
            let gradient = gradient.map(|steps| palette.gradient(steps));
            print_palette(&request, &optimizer, &palette, gradient, cli.json)?;
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            eprintln!("{}", serde_json::to_string_pretty(&e.to_json()).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
