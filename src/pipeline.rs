// src/pipeline.rs - Orchestrates gate -> normalize -> segment -> extract

use std::fs;
use std::path::PathBuf;

use image::RgbImage;

use crate::classifier::TrainedModel;
use crate::config::Config;
use crate::errors::{PancreaScanError, Result};
use crate::feature_extraction::{extract_features, FeatureVector};
use crate::gate::{check_scan, GateDecision};
use crate::image_io::{save_gray_image, save_image, InputImage};
use crate::overlay::draw_contour_overlay;
use crate::preprocess::normalize;
use crate::segmentation::segment;

/// Outcome of running the core pipeline on one image
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// The admissibility gate rejected the image; no stages ran after it
    Rejected { reason: String },
    /// All stages succeeded
    Extracted { features: FeatureVector },
}

/// Run the core pipeline on a decoded image. Deterministic and total:
/// every stage is a pure function of its input, and the gate is the only
/// stage that can refuse.
pub fn run(image: &RgbImage) -> ScanOutcome {
    match check_scan(image) {
        GateDecision::Rejected { reason } => ScanOutcome::Rejected { reason },
        GateDecision::Accepted => {
            let normalized = normalize(image);
            let mask = segment(&normalized);
            ScanOutcome::Extracted {
                features: extract_features(&mask),
            }
        }
    }
}

/// Per-scan report produced for the CLI and downstream recommendation table
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub filename: String,
    pub features: FeatureVector,
    /// Predicted class name, or "Model Not Trained" when no model is loaded
    pub class_name: String,
    /// "Detected" / "Healthy", or "N/A" when no model is loaded
    pub status: String,
    pub confidence: f64,
    pub cancer_detected: bool,
}

/// Process a single scan end to end: run the core pipeline, save the
/// contour overlay (plus intermediate stages in debug mode), and classify
/// with the optional injected model.
pub fn process_scan(
    input_image: InputImage,
    config: &Config,
    model: Option<&TrainedModel>,
    debug: bool,
) -> Result<ScanReport> {
    let InputImage { image, path: _, filename } = input_image;

    // Step 1: Admissibility gate
    if let GateDecision::Rejected { reason } = check_scan(&image) {
        return Err(PancreaScanError::GateRejected(reason));
    }

    // Step 2: Normalize and segment
    let normalized = normalize(&image);
    let mask = segment(&normalized);

    // Step 3: Extract the feature vector
    let features = extract_features(&mask);

    let output_base = PathBuf::from(&config.output_base_dir);

    // Save intermediate stage images if requested
    if debug {
        let debug_dir = output_base.join("debug");
        fs::create_dir_all(&debug_dir).map_err(|e| PancreaScanError::Io(e))?;

        save_gray_image(&normalized, debug_dir.join(format!("{}_preprocessed.png", filename)))?;
        save_gray_image(&mask, debug_dir.join(format!("{}_segmented.png", filename)))?;
    }

    // Step 4: Render the contour overlay for the report
    let overlay = draw_contour_overlay(&mask);
    fs::create_dir_all(&output_base).map_err(|e| PancreaScanError::Io(e))?;
    save_image(&overlay, output_base.join(format!("{}_contours.png", filename)))?;

    // Step 5: Classify with the injected model, if one is loaded
    let (class_name, status, confidence, cancer_detected) = match model {
        Some(model) => {
            let prediction = model.predict(&features);
            let detected = prediction.label != 0;
            let status = if detected { "Detected" } else { "Healthy" };
            (
                prediction.class_name,
                status.to_string(),
                prediction.confidence,
                detected,
            )
        }
        None => (
            "Model Not Trained".to_string(),
            "N/A".to_string(),
            0.0,
            false,
        ),
    };

    Ok(ScanReport {
        filename,
        features,
        class_name,
        status,
        confidence,
        cancer_detected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn solid_red_image_is_rejected_before_extraction() {
        let image = RgbImage::from_pixel(64, 64, Rgb([255, 0, 0]));
        match run(&image) {
            ScanOutcome::Rejected { reason } => {
                assert_eq!(reason, crate::gate::REJECT_REASON);
            }
            ScanOutcome::Extracted { .. } => panic!("red image should not pass the gate"),
        }
    }

    #[test]
    fn uniform_gray_scan_extracts_degenerate_or_single_contour() {
        let image = RgbImage::from_pixel(128, 128, Rgb([128, 128, 128]));
        match run(&image) {
            ScanOutcome::Extracted { features } => {
                assert!(
                    features.num_contours == 0.0 || features.num_contours == 1.0,
                    "num_contours = {}",
                    features.num_contours
                );
                if features.num_contours == 0.0 {
                    assert_eq!(features.avg_circularity, 0.0);
                    assert_eq!(features.contour_density, 0.0);
                    assert_eq!(features.edge_density, 0.0);
                    assert_eq!(features.shape_complexity, 0.0);
                }
            }
            ScanOutcome::Rejected { .. } => panic!("uniform gray scan must pass the gate"),
        }
    }

    #[test]
    fn pipeline_is_idempotent() {
        let mut image = RgbImage::new(96, 96);
        for (x, y, pixel) in image.enumerate_pixels_mut() {
            let v = ((x * 3 + y * 5) % 256) as u8;
            *pixel = Rgb([v, v, v]);
        }

        let first = run(&image);
        let second = run(&image);
        assert_eq!(first, second);
    }
}
