// src/config.rs - Configuration for paths, dataset layout and training parameters

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{PancreaScanError, Result};

/// Configuration for PancreaScan
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub input_path: String,
    pub output_base_dir: String,

    /// Directory containing one subdirectory per class (label = position in class_names)
    #[serde(default = "default_dataset_dir")]
    pub dataset_dir: String,

    /// Class directory names, in label order (index 0 is the healthy class)
    #[serde(default = "default_class_names")]
    pub class_names: Vec<String>,

    /// Where the extracted feature table is written/read
    #[serde(default = "default_feature_table_path")]
    pub feature_table_path: String,

    /// Where the trained model is saved/loaded
    #[serde(default = "default_model_path")]
    pub model_path: String,

    #[serde(default = "default_parallel")]
    pub use_parallel: bool,

    /// Fraction of rows held out for evaluation during training
    #[serde(default = "default_holdout_fraction")]
    pub holdout_fraction: f64,

    /// Seed for the train/holdout shuffle, so runs are reproducible
    #[serde(default = "default_shuffle_seed")]
    pub shuffle_seed: u64,
}

fn default_dataset_dir() -> String {
    "./datasets".to_string()
}

fn default_class_names() -> Vec<String> {
    vec!["non_cancerous".to_string(), "cancerous".to_string()]
}

fn default_feature_table_path() -> String {
    "./features_dataset.csv".to_string()
}

fn default_model_path() -> String {
    "./pancreas_model.json".to_string()
}

fn default_parallel() -> bool {
    true
}

fn default_holdout_fraction() -> f64 {
    0.2
}

fn default_shuffle_seed() -> u64 {
    42
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            PancreaScanError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            PancreaScanError::Config(format!("Failed to parse config file '{}': {}", path.display(), e))
        })?;

        Ok(config)
    }

    /// Create default configuration
    pub fn default() -> Self {
        Self {
            input_path: "./input".to_string(),
            output_base_dir: "./output".to_string(),
            dataset_dir: default_dataset_dir(),
            class_names: default_class_names(),
            feature_table_path: default_feature_table_path(),
            model_path: default_model_path(),
            use_parallel: true,
            holdout_fraction: default_holdout_fraction(),
            shuffle_seed: default_shuffle_seed(),
        }
    }

    /// Validate configuration and create output directories
    pub fn validate(&self) -> Result<()> {
        if self.class_names.is_empty() {
            return Err(PancreaScanError::Config(
                "class_names must contain at least one class".to_string(),
            ));
        }

        if self.holdout_fraction <= 0.0 || self.holdout_fraction >= 1.0 {
            return Err(PancreaScanError::Config(
                "holdout_fraction must be between 0.0 and 1.0 (exclusive)".to_string(),
            ));
        }

        // Create output directory if it doesn't exist
        let base_dir = PathBuf::from(&self.output_base_dir);
        fs::create_dir_all(&base_dir).map_err(|e| PancreaScanError::Io(e))?;

        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            PancreaScanError::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, content).map_err(|e| PancreaScanError::Io(e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_two_classes_in_label_order() {
        let config = Config::default();
        assert_eq!(config.class_names, vec!["non_cancerous", "cancerous"]);
        assert_eq!(config.holdout_fraction, 0.2);
    }

    #[test]
    fn holdout_fraction_bounds_are_enforced() {
        let mut config = Config::default();
        config.output_base_dir = std::env::temp_dir()
            .join("pancrea_scan_config_test")
            .to_string_lossy()
            .to_string();

        config.holdout_fraction = 0.0;
        assert!(config.validate().is_err());

        config.holdout_fraction = 1.0;
        assert!(config.validate().is_err());

        config.holdout_fraction = 0.25;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.class_names, config.class_names);
        assert_eq!(parsed.shuffle_seed, config.shuffle_seed);
    }
}
