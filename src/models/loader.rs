/// Pretrained weight loading from safetensors files
use std::path::Path;

use candle_core::{DType, Device};
use candle_nn::VarBuilder;
use candle_transformers::models::efficientnet::EfficientNet;

/// Build `model_name` with its classification head sized to `num_classes`,
/// initialized from a pretrained safetensors checkpoint.
///
/// The checkpoint is the public ImageNet checkpoint for the architecture,
/// exported to safetensors with a classifier already sized to
/// `num_classes` (the head tensors must match, candle reads every variable
/// from the file).
pub fn init_pretrained<P: AsRef<Path>>(
    model_name: &str,
    num_classes: usize,
    weights_path: P,
    device: &Device,
) -> crate::Result<EfficientNet> {
    let path = weights_path.as_ref();
    if !path.exists() {
        return Err(crate::PipelineError::MissingArtifact(path.to_path_buf()));
    }

    log::info!("Loading pretrained weights from {:?}", path);

    let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[path], DType::F32, device)? };

    super::init_model(model_name, num_classes, vb)
}
