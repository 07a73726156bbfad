// src/dataset.rs - Harvest labeled feature rows from class directories

use std::path::Path;

use csv::{Reader, Writer};
use rayon::prelude::*;

use crate::config::Config;
use crate::errors::{PancreaScanError, Result};
use crate::feature_extraction::FEATURE_NAMES;
use crate::image_io::{get_image_files_in_dir, load_image};
use crate::pipeline::{run, ScanOutcome};

/// One row of the feature table: the ten features plus a class label
/// (the class's position in Config::class_names)
#[derive(Debug, Clone)]
pub struct LabeledFeatures {
    pub features: [f64; 10],
    pub label: usize,
}

/// Per-class and total counts from a dataset build
#[derive(Debug, Clone)]
pub struct DatasetSummary {
    pub rows_written: usize,
    pub files_skipped: usize,
    pub per_class: Vec<usize>,
}

/// Build the feature table: walk each configured class directory, run the
/// pipeline once per decodable image, and write the collected rows as CSV.
/// Files that fail to decode or are rejected by the gate are skipped
/// silently, per the harvester contract.
pub fn build_feature_dataset(config: &Config) -> Result<DatasetSummary> {
    let mut rows: Vec<LabeledFeatures> = Vec::new();
    let mut files_skipped = 0usize;
    let mut per_class = vec![0usize; config.class_names.len()];

    for (label, class_name) in config.class_names.iter().enumerate() {
        let class_dir = Path::new(&config.dataset_dir).join(class_name);
        if !class_dir.exists() {
            eprintln!("Warning: class directory not found: {}", class_dir.display());
            continue;
        }

        let files = get_image_files_in_dir(&class_dir)?;
        println!(
            "Extracting features from {} ({} files)",
            class_dir.display(),
            files.len()
        );

        let extracted: Vec<Option<[f64; 10]>> = if config.use_parallel {
            files.par_iter().map(|path| extract_row(path)).collect()
        } else {
            files.iter().map(|path| extract_row(path)).collect()
        };

        for features in extracted {
            match features {
                Some(features) => {
                    per_class[label] += 1;
                    rows.push(LabeledFeatures { features, label });
                }
                None => files_skipped += 1,
            }
        }
    }

    write_feature_dataset(&rows, &config.feature_table_path)?;
    println!(
        "Feature table written to {} ({} rows, {} files skipped)",
        config.feature_table_path,
        rows.len(),
        files_skipped
    );

    Ok(DatasetSummary {
        rows_written: rows.len(),
        files_skipped,
        per_class,
    })
}

/// Run the pipeline on one file. None means the file is skipped: either
/// it didn't decode or the gate rejected it.
fn extract_row(path: &Path) -> Option<[f64; 10]> {
    let input = load_image(path).ok()?;
    match run(&input.image) {
        ScanOutcome::Extracted { features } => Some(features.to_array()),
        ScanOutcome::Rejected { .. } => None,
    }
}

/// Write labeled rows as CSV with the fixed feature header plus "label"
pub fn write_feature_dataset<P: AsRef<Path>>(rows: &[LabeledFeatures], path: P) -> Result<()> {
    let mut writer = Writer::from_path(path.as_ref())
        .map_err(|e| PancreaScanError::CsvOutput(e))?;

    let mut header: Vec<&str> = FEATURE_NAMES.to_vec();
    header.push("label");
    writer.write_record(&header).map_err(|e| PancreaScanError::CsvOutput(e))?;

    for row in rows {
        let mut record: Vec<String> = row
            .features
            .iter()
            .map(|v| format!("{:.6}", v))
            .collect();
        record.push(row.label.to_string());
        writer.write_record(&record).map_err(|e| PancreaScanError::CsvOutput(e))?;
    }

    writer.flush().map_err(|e| PancreaScanError::CsvOutput(csv::Error::from(e)))?;

    Ok(())
}

/// Read a feature table back for training
pub fn read_feature_dataset<P: AsRef<Path>>(path: P) -> Result<Vec<LabeledFeatures>> {
    let mut reader = Reader::from_path(path.as_ref())
        .map_err(|e| PancreaScanError::CsvOutput(e))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| PancreaScanError::CsvOutput(e))?;

        if record.len() != FEATURE_NAMES.len() + 1 {
            return Err(PancreaScanError::Other(format!(
                "feature table row has {} columns, expected {}",
                record.len(),
                FEATURE_NAMES.len() + 1
            )));
        }

        let mut features = [0.0f64; 10];
        for (i, value) in features.iter_mut().enumerate() {
            *value = record[i].parse().map_err(|e| {
                PancreaScanError::Other(format!("invalid feature value '{}': {}", &record[i], e))
            })?;
        }

        let label = record[FEATURE_NAMES.len()].parse().map_err(|e| {
            PancreaScanError::Other(format!(
                "invalid label '{}': {}",
                &record[FEATURE_NAMES.len()],
                e
            ))
        })?;

        rows.push(LabeledFeatures { features, label });
    }

    Ok(rows)
}
