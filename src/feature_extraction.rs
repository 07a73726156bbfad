// src/feature_extraction.rs - Aggregate contour geometry and mask statistics
// into the ten-field feature vector

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::contour::find_external_contours;
use crate::shape_analysis::{circularity, contour_area, contour_perimeter, shape_complexity};

/// Feature column names, in the exact order downstream classifiers
/// consume them. This order is a stable contract: a model trained on one
/// run's output must stay input-compatible with a later run's output.
pub const FEATURE_NAMES: [&str; 10] = [
    "num_contours",
    "total_area",
    "avg_circularity",
    "max_contour_area",
    "contour_density",
    "avg_intensity",
    "intensity_std",
    "texture_uniformity",
    "edge_density",
    "shape_complexity",
];

/// The ten scalar descriptors extracted from one segmented scan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub num_contours: f64,
    pub total_area: f64,
    pub avg_circularity: f64,
    pub max_contour_area: f64,
    pub contour_density: f64,
    pub avg_intensity: f64,
    pub intensity_std: f64,
    pub texture_uniformity: f64,
    pub edge_density: f64,
    pub shape_complexity: f64,
}

impl FeatureVector {
    /// Fields as an array, matching FEATURE_NAMES order
    pub fn to_array(&self) -> [f64; 10] {
        [
            self.num_contours,
            self.total_area,
            self.avg_circularity,
            self.max_contour_area,
            self.contour_density,
            self.avg_intensity,
            self.intensity_std,
            self.texture_uniformity,
            self.edge_density,
            self.shape_complexity,
        ]
    }
}

/// Extract the feature vector from a binary mask.
///
/// Contour statistics are accumulated over every external contour; when
/// there are no contours the running sums are simply never divided, so
/// all derived ratios stay 0. A contour with zero perimeter is excluded
/// from the circularity/complexity sums but still counts toward
/// num_contours and total_area. Intensity statistics run over the whole
/// mask, not just foreground.
pub fn extract_features(mask: &GrayImage) -> FeatureVector {
    let (width, height) = mask.dimensions();
    let image_area = (width as f64) * (height as f64);

    let contours = find_external_contours(mask);

    let mut total_area = 0.0;
    let mut max_contour_area = 0.0f64;
    let mut total_perimeter = 0.0;
    let mut circularity_sum = 0.0;
    let mut complexity_sum = 0.0;

    for contour in &contours {
        let area = contour_area(&contour.points);
        let perimeter = contour_perimeter(&contour.points);

        total_area += area;
        total_perimeter += perimeter;
        if area > max_contour_area {
            max_contour_area = area;
        }

        if perimeter > 0.0 {
            circularity_sum += circularity(area, perimeter);
            complexity_sum += shape_complexity(area, perimeter);
        }
    }

    let num_contours = contours.len();
    let (avg_circularity, shape_complexity, contour_density, edge_density) = if num_contours > 0 {
        (
            circularity_sum / num_contours as f64,
            complexity_sum / num_contours as f64,
            total_area / image_area,
            total_perimeter / image_area,
        )
    } else {
        (0.0, 0.0, 0.0, 0.0)
    };

    let (avg_intensity, intensity_std, texture_uniformity) = mask_intensity_stats(mask);

    FeatureVector {
        num_contours: num_contours as f64,
        total_area,
        avg_circularity,
        max_contour_area,
        contour_density,
        avg_intensity,
        intensity_std,
        texture_uniformity,
        edge_density,
        shape_complexity,
    }
}

/// Mean and population standard deviation of all mask intensities, plus
/// texture uniformity: the sum of squared maximum-normalized intensities,
/// defined as 0 for an all-black mask
fn mask_intensity_stats(mask: &GrayImage) -> (f64, f64, f64) {
    let pixel_count = mask.pixels().len() as f64;

    let mut sum = 0.0;
    let mut max_intensity = 0u8;
    for pixel in mask.pixels() {
        sum += pixel[0] as f64;
        if pixel[0] > max_intensity {
            max_intensity = pixel[0];
        }
    }
    let mean = sum / pixel_count;

    let mut variance_sum = 0.0;
    for pixel in mask.pixels() {
        let diff = pixel[0] as f64 - mean;
        variance_sum += diff * diff;
    }
    let std = (variance_sum / pixel_count).sqrt();

    let texture_uniformity = if max_intensity > 0 {
        let max = max_intensity as f64;
        mask.pixels()
            .map(|p| {
                let normalized = p[0] as f64 / max;
                normalized * normalized
            })
            .sum::<f64>()
    } else {
        0.0
    };

    (mean, std, texture_uniformity)
}
