/// Model and batch-size registry
///
/// A closed set of supported backbones. Adding one means adding an enum
/// variant and extending the batch-size and block-config lookups.
use std::str::FromStr;

use candle_nn::VarBuilder;
use candle_transformers::models::efficientnet::{EfficientNet, MBConvConfig};

pub mod loader;

pub use loader::init_pretrained;

/// Supported backbone architectures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelName {
    EfficientNetB0,
    EfficientNetB3,
}

impl FromStr for ModelName {
    type Err = crate::PipelineError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "efficientnet_b0" => Ok(ModelName::EfficientNetB0),
            "efficientnet_b3" => Ok(ModelName::EfficientNetB3),
            other => Err(crate::PipelineError::UnsupportedModel(other.to_string())),
        }
    }
}

impl std::fmt::Display for ModelName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ModelName::EfficientNetB0 => "efficientnet_b0",
            ModelName::EfficientNetB3 => "efficientnet_b3",
        };
        f.write_str(s)
    }
}

impl ModelName {
    /// Batch size tuned per architecture (B3 activations are roughly twice
    /// the size of B0 at the same resolution).
    pub fn batch_size(&self) -> usize {
        match self {
            ModelName::EfficientNetB0 => 64,
            ModelName::EfficientNetB3 => 32,
        }
    }

    fn block_configs(&self) -> Vec<MBConvConfig> {
        match self {
            ModelName::EfficientNetB0 => MBConvConfig::b0(),
            ModelName::EfficientNetB3 => MBConvConfig::b3(),
        }
    }
}

/// Look up the recommended batch size for a model name.
pub fn get_batch_size(model_name: &str) -> crate::Result<usize> {
    Ok(model_name.parse::<ModelName>()?.batch_size())
}

/// Build the classification network for `model_name` with a head sized to
/// `num_classes`, pulling weights from `vb` (pretrained checkpoint or fresh
/// variables).
pub fn init_model(
    model_name: &str,
    num_classes: usize,
    vb: VarBuilder,
) -> crate::Result<EfficientNet> {
    let name: ModelName = model_name.parse()?;
    log::info!("Building {} with {} output classes", name, num_classes);
    Ok(EfficientNet::new(vb, name.block_configs(), num_classes)?)
}
