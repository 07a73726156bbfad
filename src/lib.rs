// src/lib.rs - Library interface for PancreaScan

pub mod classifier;
pub mod config;
pub mod contour;
pub mod dataset;
pub mod diet;
pub mod errors;
pub mod feature_extraction;
pub mod gate;
pub mod image_io;
pub mod overlay;
pub mod pipeline;
pub mod preprocess;
pub mod segmentation;
pub mod shape_analysis;

// Re-export commonly used types and functions
pub use errors::{PancreaScanError, Result};
pub use config::Config;
pub use pipeline::{run, process_scan, ScanOutcome, ScanReport};
pub use image_io::{InputImage, load_image, save_image};
pub use feature_extraction::{extract_features, FeatureVector, FEATURE_NAMES};
pub use gate::{check_scan, color_ratio, GateDecision};
pub use classifier::{TrainedModel, Prediction};
