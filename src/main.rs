//! Command-line front end for the listing form.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use rental_price::api::form;
use rental_price::common::config::AppCfg;
use rental_price::common::error::{PriceError, PriceResult};
use rental_price::features::domain::Listing;
use rental_price::features::service as features;
use rental_price::inference::service as inference;
use rental_price::inference::workers::Pool;

/// Estimate the nightly price of a short-term rental listing.
#[derive(Parser)]
#[command(name = "rental-price")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory holding the fitted artifacts (overrides RENTAL_ARTIFACT_ROOT)
    #[arg(long, global = true)]
    artifacts: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict the price of one listing
    ///
    /// Examples:
    ///   rental-price predict
    ///   rental-price predict --set bedrooms=2 --set beds=3
    ///   rental-price predict --input listing.json
    Predict {
        /// JSON object with listing fields; absent fields use form defaults
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Field assignment applied after --input, e.g. bedrooms=2
        #[arg(short = 's', long = "set", value_name = "KEY=VALUE")]
        assignments: Vec<String>,

        /// Print the response as JSON
        #[arg(long)]
        json: bool,
    },
    /// Predict every listing of a JSON-lines file
    Batch {
        /// One JSON listing per line
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Show the form fields with their bounds and defaults
    Schema,
    /// Load the artifacts and print what was loaded
    Check,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let cfg = match AppCfg::load() {
        Ok(cfg) => cfg,
        Err(err) => return fail(&err),
    };
    let cfg = match cli.artifacts {
        Some(root) => cfg.with_artifact_root(root),
        None => cfg,
    };
    rental_price::common::log::init(cfg.log_level);

    let outcome = match cli.command {
        Commands::Schema => {
            print!("{}", form::render_schema());
            Ok(())
        }
        Commands::Check => check(&cfg),
        Commands::Predict {
            input,
            assignments,
            json,
        } => predict(&cfg, input, &assignments, json),
        Commands::Batch { file } => batch(&cfg, &file),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => fail(&err),
    }
}

fn fail(err: &PriceError) -> ExitCode {
    eprintln!("{}", form::render_error(err));
    if err.is_fatal() {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

fn check(cfg: &AppCfg) -> PriceResult<()> {
    let pipeline = inference::load_from_cfg(cfg)?;
    let manifest = pipeline.manifest();
    for entry in &manifest.entries {
        println!("{:<10} {} ({})", entry.kind, entry.location, entry.fingerprint);
    }
    println!(
        "{} columns -> {} components -> {} regressor (placeholder: {})",
        manifest.input_dim,
        manifest.reduced_dim,
        manifest.regressor,
        manifest.placeholder.as_str()
    );
    Ok(())
}

fn read_listing(input: Option<PathBuf>, assignments: &[String]) -> PriceResult<Listing> {
    let mut listing = match input {
        Some(path) => {
            let text = fs::read_to_string(&path).map_err(|err| {
                PriceError::invalid(format!("cannot read {}: {err}", path.display()))
            })?;
            features::listing_from_json(&text)?
        }
        None => Listing::default(),
    };
    for assignment in assignments {
        features::apply_assignment(&mut listing, assignment)?;
    }
    Ok(listing)
}

fn predict(
    cfg: &AppCfg,
    input: Option<PathBuf>,
    assignments: &[String],
    json: bool,
) -> PriceResult<()> {
    // a broken artifact store blocks the form before any input is read
    let pipeline = inference::load_from_cfg(cfg)?;
    let listing = read_listing(input, assignments)?;

    let outcome = features::assemble(&listing).and_then(|v| inference::predict(&pipeline, &v));
    match outcome {
        Ok(prediction) if json => {
            let body = serde_json::json!({
                "price": prediction.price,
                "display": form::render_price(prediction.price),
                "latency_us": prediction.latency_us,
            });
            println!("{body}");
            Ok(())
        }
        Ok(prediction) => {
            println!("Estimated price per night: {}", form::render_price(prediction.price));
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", form::render_inputs(&listing));
            Err(err)
        }
    }
}

fn batch(cfg: &AppCfg, file: &Path) -> PriceResult<()> {
    let pipeline = Arc::new(inference::load_from_cfg(cfg)?);
    let text = fs::read_to_string(file)
        .map_err(|err| PriceError::invalid(format!("cannot read {}: {err}", file.display())))?;

    // One slot per non-blank line; rejected lines keep their slot.
    let mut slots: Vec<Option<PriceResult<f64>>> = Vec::new();
    let mut accepted = Vec::new();
    let mut vectors = Vec::new();
    for (idx, line) in text.lines().filter(|l| !l.trim().is_empty()).enumerate() {
        match features::listing_from_json(line).and_then(|listing| features::assemble(&listing)) {
            Ok(vector) => {
                accepted.push(idx);
                vectors.push(vector);
                slots.push(None);
            }
            Err(PriceError::InvalidInput(msg)) => {
                slots.push(Some(Err(PriceError::invalid(format!("line {}: {msg}", idx + 1)))));
            }
            Err(err) => slots.push(Some(Err(err))),
        }
    }

    let pool = Pool::new(cfg.workers);
    for (idx, result) in accepted
        .into_iter()
        .zip(inference::batch_predict(pipeline, vectors, &pool))
    {
        slots[idx] = Some(result.map(|prediction| prediction.price));
    }

    let mut failed = None;
    for (idx, slot) in slots.into_iter().enumerate() {
        match slot {
            Some(Ok(price)) => println!("{}\t{}", idx + 1, form::render_price(price)),
            Some(Err(err)) => {
                println!("{}\t{}", idx + 1, form::render_error(&err));
                failed.get_or_insert(err);
            }
            None => {}
        }
    }
    match failed {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
