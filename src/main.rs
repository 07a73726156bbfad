// src/main.rs - PancreaScan command-line interface

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use rayon::prelude::*;

use pancrea_scan_lib::classifier::{train_with_holdout, TrainedModel};
use pancrea_scan_lib::config::Config;
use pancrea_scan_lib::dataset::{build_feature_dataset, read_feature_dataset};
use pancrea_scan_lib::diet::{recommendations, Gender};
use pancrea_scan_lib::errors::PancreaScanError;
use pancrea_scan_lib::feature_extraction::FEATURE_NAMES;
use pancrea_scan_lib::image_io::{get_image_files_in_dir, load_image};
use pancrea_scan_lib::pipeline::{process_scan, ScanReport};

/// Command-line arguments
#[derive(Parser, Debug)]
#[clap(author, version, about = "PancreaScan - Pancreatic Scan Feature Analysis")]
struct Args {
    /// Path to configuration file
    #[clap(short, long, default_value = "config.toml")]
    config: String,

    /// Enable debug mode (save intermediate images and print more info)
    #[clap(short, long)]
    debug: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a scan (or a directory of scans) and report its features
    Analyze {
        /// Path to input file or directory (overwrites config)
        #[clap(short, long)]
        input: Option<String>,

        /// Path to output directory (overwrites config)
        #[clap(short, long)]
        output: Option<String>,

        /// Patient age, for diet recommendations
        #[clap(long)]
        age: Option<u32>,

        /// Patient gender, for diet recommendations
        #[clap(long, value_enum)]
        gender: Option<GenderArg>,

        /// Number of scans the patient has had
        #[clap(long, default_value_t = 1)]
        scan_count: u32,
    },

    /// Build the labeled feature table from the dataset directories
    BuildDataset {
        /// Dataset root containing one subdirectory per class (overwrites config)
        #[clap(long)]
        dataset_dir: Option<String>,

        /// Output path for the feature table (overwrites config)
        #[clap(long)]
        features: Option<String>,
    },

    /// Train the classifier on the feature table and save it
    Train {
        /// Path to the feature table (overwrites config)
        #[clap(long)]
        features: Option<String>,

        /// Output path for the trained model (overwrites config)
        #[clap(long)]
        model: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GenderArg {
    Male,
    Female,
    Other,
}

impl From<GenderArg> for Gender {
    fn from(arg: GenderArg) -> Self {
        match arg {
            GenderArg::Male => Gender::Male,
            GenderArg::Female => Gender::Female,
            GenderArg::Other => Gender::Other,
        }
    }
}

/// Main function
fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = Config::from_file(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config))?;

    match args.command {
        Command::Analyze { input, output, age, gender, scan_count } => {
            if let Some(input) = input {
                config.input_path = input;
            }
            if let Some(output) = output {
                config.output_base_dir = output;
            }
            config.validate()?;

            analyze(&config, args.debug, age, gender.map(Gender::from), scan_count)?;
        }

        Command::BuildDataset { dataset_dir, features } => {
            if let Some(dataset_dir) = dataset_dir {
                config.dataset_dir = dataset_dir;
            }
            if let Some(features) = features {
                config.feature_table_path = features;
            }

            build_feature_dataset(&config)?;
        }

        Command::Train { features, model } => {
            if let Some(features) = features {
                config.feature_table_path = features;
            }
            if let Some(model) = model {
                config.model_path = model;
            }

            train(&config)?;
        }
    }

    Ok(())
}

/// Run the pipeline on a single scan or every scan in a directory
fn analyze(
    config: &Config,
    debug: bool,
    age: Option<u32>,
    gender: Option<Gender>,
    scan_count: u32,
) -> anyhow::Result<()> {
    // Load the model once at startup; absence is not an error
    let model = if Path::new(&config.model_path).exists() {
        println!("Loaded trained model from {}", config.model_path);
        Some(TrainedModel::load(&config.model_path)?)
    } else {
        println!("No trained model found at {}; reporting features only", config.model_path);
        None
    };

    let start_time = Instant::now();
    let input_path = PathBuf::from(&config.input_path);

    if input_path.is_file() {
        println!("Processing single file: {}", input_path.display());
        let input_image = load_image(&input_path)?;
        match process_scan(input_image, config, model.as_ref(), debug) {
            Ok(report) => print_report(&report, age, gender, scan_count),
            Err(PancreaScanError::GateRejected(reason)) => {
                println!("{}: rejected ({})", input_path.display(), reason);
            }
            Err(e) => return Err(e.into()),
        }
    } else if input_path.is_dir() {
        println!("Processing directory: {}", input_path.display());
        let files = get_image_files_in_dir(&input_path)?;
        println!("Found {} image files", files.len());

        let process_one = |path: &PathBuf| {
            println!("Processing: {}", path.display());
            match load_image(path) {
                Ok(input_image) => {
                    match process_scan(input_image, config, model.as_ref(), debug) {
                        Ok(report) => print_report(&report, age, gender, scan_count),
                        Err(PancreaScanError::GateRejected(reason)) => {
                            println!("{}: rejected ({})", path.display(), reason);
                        }
                        Err(e) => eprintln!("Error processing {}: {}", path.display(), e),
                    }
                }
                Err(e) => eprintln!("Error loading {}: {}", path.display(), e),
            }
        };

        if config.use_parallel {
            files.par_iter().for_each(process_one);
        } else {
            files.iter().for_each(process_one);
        }
    } else {
        return Err(PancreaScanError::InvalidPath(input_path).into());
    }

    let elapsed = start_time.elapsed();
    println!("Processing completed in {:.2} seconds", elapsed.as_secs_f64());

    Ok(())
}

/// Print one scan's features, classification and diet recommendations
fn print_report(report: &ScanReport, age: Option<u32>, gender: Option<Gender>, scan_count: u32) {
    println!("Results for {}:", report.filename);

    let values = report.features.to_array();
    for (name, value) in FEATURE_NAMES.iter().zip(values.iter()) {
        println!("  {}: {:.6}", name, value);
    }

    println!("  Classification: {}", report.class_name);
    println!("  Status: {}", report.status);
    println!("  Confidence: {:.3}", report.confidence);

    if let (Some(age), Some(gender)) = (age, gender) {
        println!("  Diet recommendations:");
        for item in recommendations(age, gender, scan_count, report.cancer_detected) {
            println!("    - {}", item);
        }
    }
}

/// Train on the feature table with a seeded holdout split, report the
/// evaluation and save the model
fn train(config: &Config) -> anyhow::Result<()> {
    println!("Reading feature table from {}", config.feature_table_path);
    let rows = read_feature_dataset(&config.feature_table_path)?;
    println!("Loaded {} labeled rows", rows.len());

    let (model, report) = train_with_holdout(
        &rows,
        &config.class_names,
        config.holdout_fraction,
        config.shuffle_seed,
    )?;

    println!("Holdout accuracy: {:.3}", report.accuracy);
    for metrics in &report.per_class {
        println!(
            "  {}: precision {:.3}, recall {:.3} ({} samples)",
            metrics.class_name, metrics.precision, metrics.recall, metrics.support
        );
    }

    model.save(&config.model_path)?;
    println!("Model saved to {}", config.model_path);

    Ok(())
}
