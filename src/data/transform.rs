/// Image transform pipelines
///
/// One [`crate::DataConfig`] yields two pipelines: the training pipeline
/// augments (random resized crop, random horizontal flip), the evaluation
/// pipeline only resizes and normalizes. Augmentation draws come from the
/// rng supplied by the caller, so a seeded loader replays identically.
use candle_core::{Device, Tensor};
use ndarray::{s, ArrayView3};
use rand::rngs::StdRng;
use rand::Rng;

use crate::config::DataConfig;

#[derive(Debug, Clone)]
pub struct Transform {
    input_size: usize,
    mean: [f32; 3],
    std: [f32; 3],
    hflip: f32,
    scale_jitter: f32,
    is_training: bool,
}

impl Transform {
    /// Build a pipeline from the shared config.
    pub fn from_config(config: &DataConfig, is_training: bool) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self {
            input_size: config.input_size,
            mean: config.mean,
            std: config.std,
            hflip: config.hflip,
            scale_jitter: config.scale_jitter,
            is_training,
        })
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn is_training(&self) -> bool {
        self.is_training
    }

    /// Map one raw HWC u8 image to a normalized [3, S, S] f32 tensor.
    pub fn apply(
        &self,
        image: ArrayView3<'_, u8>,
        rng: &mut StdRng,
        device: &Device,
    ) -> crate::Result<Tensor> {
        let (height, width, channels) = image.dim();
        if channels != 3 {
            return Err(crate::PipelineError::Shape(format!(
                "expected 3 channels, got {}",
                channels
            )));
        }

        // Training-time random resized crop: square patch with area fraction
        // drawn from [scale_jitter, 1.0], random position.
        let view = if self.is_training && self.scale_jitter < 1.0 {
            let frac: f32 = rng.gen_range(self.scale_jitter..=1.0);
            let side = ((height.min(width) as f32) * frac.sqrt()).max(1.0) as usize;
            let top = rng.gen_range(0..=height - side);
            let left = rng.gen_range(0..=width - side);
            image.slice(s![top..top + side, left..left + side, ..])
        } else {
            image.view()
        };

        let flip = self.is_training && rng.gen::<f32>() < self.hflip;

        // HWC u8 -> CHW f32 in [0, 1], flipping on the fly.
        let (crop_h, crop_w, _) = view.dim();
        let mut data = Vec::with_capacity(3 * crop_h * crop_w);
        for c in 0..3 {
            for y in 0..crop_h {
                for x in 0..crop_w {
                    let sx = if flip { crop_w - 1 - x } else { x };
                    data.push(view[(y, sx, c)] as f32 / 255.0);
                }
            }
        }

        let tensor = Tensor::from_vec(data, (3, crop_h, crop_w), device)?;

        // Resize to the model input size.
        let tensor = tensor
            .unsqueeze(0)?
            .upsample_nearest2d(self.input_size, self.input_size)?
            .squeeze(0)?;

        // Per-channel normalization.
        let mean = Tensor::from_slice(&self.mean, (3, 1, 1), device)?;
        let std = Tensor::from_slice(&self.std, (3, 1, 1), device)?;
        let tensor = tensor.broadcast_sub(&mean)?.broadcast_div(&std)?;

        Ok(tensor)
    }
}
