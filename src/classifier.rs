// src/classifier.rs - Nearest-centroid classifier over standardized features

use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::dataset::LabeledFeatures;
use crate::errors::{PancreaScanError, Result};
use crate::feature_extraction::{FeatureVector, FEATURE_NAMES};

/// A trained model: per-class centroids in z-scored feature space.
/// Loaded once at startup and read-only afterwards; its absence is not an
/// error (callers fall back to "Model Not Trained" sentinels).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedModel {
    pub class_names: Vec<String>,
    feature_means: Vec<f64>,
    feature_stds: Vec<f64>,
    centroids: Vec<Vec<f64>>,
}

/// A single class prediction with its confidence
#[derive(Debug, Clone)]
pub struct Prediction {
    pub label: usize,
    pub class_name: String,
    pub confidence: f64,
}

/// Per-class precision/recall plus overall accuracy on a holdout set
#[derive(Debug, Clone)]
pub struct EvalReport {
    pub accuracy: f64,
    pub per_class: Vec<ClassMetrics>,
}

#[derive(Debug, Clone)]
pub struct ClassMetrics {
    pub class_name: String,
    pub precision: f64,
    pub recall: f64,
    pub support: usize,
}

impl TrainedModel {
    /// Fit centroids on labeled feature rows. Every class must have at
    /// least one sample.
    pub fn fit(rows: &[LabeledFeatures], class_names: &[String]) -> Result<TrainedModel> {
        if rows.is_empty() {
            return Err(PancreaScanError::Training(
                "cannot fit a model on an empty dataset".to_string(),
            ));
        }

        let num_features = FEATURE_NAMES.len();
        let num_classes = class_names.len();

        for row in rows {
            if row.label >= num_classes {
                return Err(PancreaScanError::Training(format!(
                    "label {} is out of range for {} classes",
                    row.label, num_classes
                )));
            }
        }

        // Column means and population standard deviations
        let n = rows.len() as f64;
        let mut feature_means = vec![0.0; num_features];
        for row in rows {
            for (i, value) in row.features.iter().enumerate() {
                feature_means[i] += value;
            }
        }
        for mean in feature_means.iter_mut() {
            *mean /= n;
        }

        let mut feature_stds = vec![0.0; num_features];
        for row in rows {
            for (i, value) in row.features.iter().enumerate() {
                let diff = value - feature_means[i];
                feature_stds[i] += diff * diff;
            }
        }
        for std in feature_stds.iter_mut() {
            *std = (*std / n).sqrt();
            // Constant columns standardize to 0 instead of dividing by 0
            if *std == 0.0 {
                *std = 1.0;
            }
        }

        // Per-class centroids over standardized rows
        let mut centroids = vec![vec![0.0; num_features]; num_classes];
        let mut class_counts = vec![0usize; num_classes];

        for row in rows {
            class_counts[row.label] += 1;
            for (i, value) in row.features.iter().enumerate() {
                centroids[row.label][i] += (value - feature_means[i]) / feature_stds[i];
            }
        }

        for (label, count) in class_counts.iter().enumerate() {
            if *count == 0 {
                return Err(PancreaScanError::Training(format!(
                    "class '{}' has no training samples",
                    class_names[label]
                )));
            }
            for value in centroids[label].iter_mut() {
                *value /= *count as f64;
            }
        }

        Ok(TrainedModel {
            class_names: class_names.to_vec(),
            feature_means,
            feature_stds,
            centroids,
        })
    }

    /// Predict the class of one feature vector. Confidence is a softmax
    /// over negative centroid distances.
    pub fn predict(&self, features: &FeatureVector) -> Prediction {
        let standardized: Vec<f64> = features
            .to_array()
            .iter()
            .enumerate()
            .map(|(i, value)| (value - self.feature_means[i]) / self.feature_stds[i])
            .collect();

        let distances: Vec<f64> = self
            .centroids
            .iter()
            .map(|centroid| {
                centroid
                    .iter()
                    .zip(&standardized)
                    .map(|(c, v)| (c - v) * (c - v))
                    .sum::<f64>()
                    .sqrt()
            })
            .collect();

        let mut label = 0;
        for (i, distance) in distances.iter().enumerate() {
            if *distance < distances[label] {
                label = i;
            }
        }

        // Softmax over negative distances, shifted by the minimum for
        // numerical stability
        let min_distance = distances[label];
        let weights: Vec<f64> = distances.iter().map(|d| (-(d - min_distance)).exp()).collect();
        let weight_sum: f64 = weights.iter().sum();
        let confidence = weights[label] / weight_sum;

        Prediction {
            label,
            class_name: self.class_names[label].clone(),
            confidence,
        }
    }

    /// Evaluate accuracy and per-class precision/recall on labeled rows
    pub fn evaluate(&self, rows: &[LabeledFeatures]) -> EvalReport {
        let num_classes = self.class_names.len();
        let mut correct = 0usize;
        let mut predicted_counts = vec![0usize; num_classes];
        let mut true_counts = vec![0usize; num_classes];
        let mut true_positives = vec![0usize; num_classes];

        for row in rows {
            let features = features_from_array(&row.features);
            let prediction = self.predict(&features);

            predicted_counts[prediction.label] += 1;
            if row.label < num_classes {
                true_counts[row.label] += 1;
            }
            if prediction.label == row.label {
                correct += 1;
                true_positives[prediction.label] += 1;
            }
        }

        let accuracy = if rows.is_empty() {
            0.0
        } else {
            correct as f64 / rows.len() as f64
        };

        let per_class = self
            .class_names
            .iter()
            .enumerate()
            .map(|(label, class_name)| {
                let precision = if predicted_counts[label] > 0 {
                    true_positives[label] as f64 / predicted_counts[label] as f64
                } else {
                    0.0
                };
                let recall = if true_counts[label] > 0 {
                    true_positives[label] as f64 / true_counts[label] as f64
                } else {
                    0.0
                };
                ClassMetrics {
                    class_name: class_name.clone(),
                    precision,
                    recall,
                    support: true_counts[label],
                }
            })
            .collect();

        EvalReport { accuracy, per_class }
    }

    /// Save the model as JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| PancreaScanError::ModelSerde(e))?;
        fs::write(path, content).map_err(|e| PancreaScanError::Io(e))?;
        Ok(())
    }

    /// Load a model from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<TrainedModel> {
        let content = fs::read_to_string(path).map_err(|e| PancreaScanError::Io(e))?;
        let model = serde_json::from_str(&content)
            .map_err(|e| PancreaScanError::ModelSerde(e))?;
        Ok(model)
    }
}

/// Fit on a seeded shuffle of the rows, holding out a fraction for
/// evaluation. Returns the fitted model and its holdout report.
pub fn train_with_holdout(
    rows: &[LabeledFeatures],
    class_names: &[String],
    holdout_fraction: f64,
    seed: u64,
) -> Result<(TrainedModel, EvalReport)> {
    let mut shuffled = rows.to_vec();
    let mut rng = StdRng::seed_from_u64(seed);
    shuffled.shuffle(&mut rng);

    let holdout_size = ((shuffled.len() as f64) * holdout_fraction).round() as usize;
    if holdout_size == 0 || holdout_size >= shuffled.len() {
        return Err(PancreaScanError::Training(format!(
            "dataset of {} rows is too small for a holdout fraction of {}",
            shuffled.len(),
            holdout_fraction
        )));
    }

    let (holdout, training) = shuffled.split_at(holdout_size);
    let model = TrainedModel::fit(training, class_names)?;
    let report = model.evaluate(holdout);

    Ok((model, report))
}

/// Rebuild a FeatureVector from an array in FEATURE_NAMES order
pub fn features_from_array(values: &[f64; 10]) -> FeatureVector {
    FeatureVector {
        num_contours: values[0],
        total_area: values[1],
        avg_circularity: values[2],
        max_contour_area: values[3],
        contour_density: values[4],
        avg_intensity: values[5],
        intensity_std: values[6],
        texture_uniformity: values[7],
        edge_density: values[8],
        shape_complexity: values[9],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn class_names() -> Vec<String> {
        vec!["non_cancerous".to_string(), "cancerous".to_string()]
    }

    fn cluster_row(base: f64, label: usize) -> LabeledFeatures {
        let mut features = [0.0; 10];
        for (i, value) in features.iter_mut().enumerate() {
            *value = base + i as f64 * 0.1;
        }
        LabeledFeatures { features, label }
    }

    fn separable_rows() -> Vec<LabeledFeatures> {
        let mut rows = Vec::new();
        for i in 0..10 {
            rows.push(cluster_row(1.0 + i as f64 * 0.01, 0));
            rows.push(cluster_row(9.0 + i as f64 * 0.01, 1));
        }
        rows
    }

    #[test]
    fn fit_and_predict_separable_clusters() {
        let rows = separable_rows();
        let model = TrainedModel::fit(&rows, &class_names()).unwrap();

        let healthy = model.predict(&features_from_array(&rows[0].features));
        assert_eq!(healthy.label, 0);
        assert_eq!(healthy.class_name, "non_cancerous");
        assert!(healthy.confidence > 0.5);

        let cancerous = model.predict(&features_from_array(&rows[1].features));
        assert_eq!(cancerous.label, 1);
    }

    #[test]
    fn evaluate_reports_perfect_separation() {
        let rows = separable_rows();
        let model = TrainedModel::fit(&rows, &class_names()).unwrap();
        let report = model.evaluate(&rows);

        assert_approx_eq!(report.accuracy, 1.0);
        for metrics in &report.per_class {
            assert_approx_eq!(metrics.precision, 1.0);
            assert_approx_eq!(metrics.recall, 1.0);
            assert_eq!(metrics.support, 10);
        }
    }

    #[test]
    fn fit_rejects_empty_and_single_class_datasets() {
        assert!(TrainedModel::fit(&[], &class_names()).is_err());

        let only_healthy: Vec<LabeledFeatures> =
            (0..5).map(|i| cluster_row(i as f64, 0)).collect();
        assert!(TrainedModel::fit(&only_healthy, &class_names()).is_err());
    }

    #[test]
    fn model_round_trips_through_json() {
        let rows = separable_rows();
        let model = TrainedModel::fit(&rows, &class_names()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        model.save(&path).unwrap();

        let loaded = TrainedModel::load(&path).unwrap();
        assert_eq!(loaded.class_names, model.class_names);

        let features = features_from_array(&rows[0].features);
        let before = model.predict(&features);
        let after = loaded.predict(&features);
        assert_eq!(before.label, after.label);
        assert_approx_eq!(before.confidence, after.confidence);
    }

    #[test]
    fn holdout_training_is_seed_deterministic() {
        let rows = separable_rows();
        let names = class_names();

        let (_, first) = train_with_holdout(&rows, &names, 0.2, 42).unwrap();
        let (_, second) = train_with_holdout(&rows, &names, 0.2, 42).unwrap();
        assert_approx_eq!(first.accuracy, second.accuracy);
    }

    #[test]
    fn holdout_rejects_tiny_datasets() {
        let rows = vec![cluster_row(1.0, 0), cluster_row(9.0, 1)];
        assert!(train_with_holdout(&rows, &class_names(), 0.05, 7).is_err());
    }
}
