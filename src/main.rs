use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use fast_knn_classifier::utils::logger;
use fast_knn_classifier::{EvaluationReport, Model, DEFAULT_K, DEFAULT_NAME};
use std::path::PathBuf;

/// Training data used when `--train` is not given
const DEFAULT_TRAINING_DATA: &str = "data/default_train";

#[derive(Parser)]
#[command(name = "fast-knn-classifier")]
#[command(author = "Hummer Team")]
#[command(version = "0.1.0")]
#[command(about = "A k-nearest-neighbors classifier with range-normalized distances", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ModelArgs {
    /// Path to training data (header line, then `f1 ... fN label` rows)
    #[arg(short, long, default_value = DEFAULT_TRAINING_DATA)]
    train: PathBuf,

    /// Number of neighbors; invalid values fall back to the default
    #[arg(short, long, allow_hyphen_values = true)]
    k: Option<String>,

    /// Display name for the model
    #[arg(short, long, default_value = DEFAULT_NAME)]
    name: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Train on one file and report accuracy on another
    Test {
        #[command(flatten)]
        model: ModelArgs,

        /// Path to test data in the same format as the training data
        #[arg(short = 'T', long)]
        test: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Also print the learned feature bounds
        #[arg(long)]
        show_all: bool,
    },

    /// Classify a single feature vector
    Classify {
        #[command(flatten)]
        model: ModelArgs,

        /// Feature values, in training column order
        #[arg(required = true, allow_negative_numbers = true)]
        features: Vec<f64>,
    },

    /// Show training set size, label counts and feature bounds
    Inspect {
        #[command(flatten)]
        model: ModelArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init_cli_logger(cli.verbose);

    match cli.command {
        Commands::Test {
            model,
            test,
            json,
            show_all,
        } => {
            let mut model = build_model(&model)?;
            let report = model
                .test(&test)
                .with_context(|| format!("failed to test model on {}", test.display()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }

            if show_all {
                print_bounds(&model);
            }
        }

        Commands::Classify { model, features } => {
            let model = build_model(&model)?;
            let label = model
                .classify_features(&features)
                .context("failed to classify feature vector")?;
            println!("Predicted class: {}", label);
        }

        Commands::Inspect { model } => {
            let model = build_model(&model)?;
            println!("Model: {}", model.name());
            println!("Training instances: {}", model.training_data().len());
            println!("Features: {}", model.feature_count());
            println!("k = {} (effective {})", model.k(), model.effective_k());
            println!("Label counts:");
            for (label, count) in model.training_data().label_counts() {
                println!("  {}: {}", label, count);
            }
            print_bounds(&model);
        }
    }

    Ok(())
}

fn build_model(args: &ModelArgs) -> anyhow::Result<Model> {
    let model = Model::from_path(&args.train)
        .with_context(|| format!("failed to build model from {}", args.train.display()))?
        .with_name(args.name.clone())
        .with_k(resolve_k(args.k.as_deref()));
    Ok(model)
}

/// Parse the k argument, falling back to the default on malformed input.
/// Non-positive values map to 0, which the model clamps to 1.
fn resolve_k(raw: Option<&str>) -> usize {
    let Some(raw) = raw else {
        return DEFAULT_K;
    };

    match raw.trim().parse::<i64>() {
        Ok(k) => usize::try_from(k).unwrap_or(0),
        Err(e) => {
            tracing::warn!(
                "Could not parse k = \"{}\" ({}), using default k = {}",
                raw,
                e,
                DEFAULT_K
            );
            DEFAULT_K
        }
    }
}

fn print_report(report: &EvaluationReport) {
    println!("Test results for {}\nk = {}\n", report.model, report.k);
    for prediction in &report.predictions {
        println!("{}", prediction);
    }
    println!("\n{}", report.summary());
}

fn print_bounds(model: &Model) {
    println!("\n=== Feature bounds ===");
    for (i, bound) in model.bounds().iter().enumerate() {
        println!("Feature {:>3}: [{:.4}, {:.4}]", i, bound.lower, bound.upper);
    }
}
