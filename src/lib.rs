//! Animal image classification - training pipeline setup
//!
//! Glue layer for an image-classification training run: loads precomputed
//! feature/label arrays from `.npy` artifacts, splits them into
//! train/validation/test sets (precomputed fold indices or a seeded random
//! split), wraps them in batch-producing loaders with train/eval transform
//! pipelines, seeds every random source for reproducibility, and resolves a
//! pretrained EfficientNet backbone plus batch size by name.
//!
//! # Example
//!
//! ```ignore
//! use animal_classifier::{reproducibility, data, models, DataConfig};
//!
//! reproducibility::setup_reproducibility(42)?;
//! let batch_size = models::get_batch_size("efficientnet_b0")?;
//! let (train, val, test) = data::setup_dataloaders(
//!     &DataConfig::default(), "data/", 42, batch_size, 4, label_map, None,
//! )?;
//! ```

pub mod config;
pub mod data;
pub mod models;
pub mod reproducibility;

// Re-export commonly used items
pub use config::DataConfig;
pub use data::{setup_dataloaders, AnimalDataset, DataLoader};
pub use models::{get_batch_size, init_model, ModelName};

use std::path::PathBuf;

/// Library error types
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("missing required artifact: {0}")]
    MissingArtifact(PathBuf),

    #[error("unsupported model name: {0}")]
    UnsupportedModel(String),

    #[error("shape mismatch: {0}")]
    Shape(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Candle error: {0}")]
    Candle(#[from] candle_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("npy read error: {0}")]
    Npy(#[from] ndarray_npy::ReadNpyError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
