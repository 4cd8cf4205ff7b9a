/// Configuration for the data/augmentation pipeline
///
/// One config feeds both transform pipelines: the training pipeline applies
/// the augmentation fields, the evaluation pipeline ignores them.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DataConfig {
    /// Side length of the square model input
    pub input_size: usize,

    /// Per-channel normalization mean (RGB)
    pub mean: [f32; 3],

    /// Per-channel normalization std (RGB)
    pub std: [f32; 3],

    /// Probability of a random horizontal flip (training only)
    pub hflip: f32,

    /// Lower bound on the crop area fraction for random resized crop
    /// (training only). 1.0 disables the crop.
    pub scale_jitter: f32,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            input_size: 224,
            // ImageNet statistics, matching the pretrained backbones
            mean: [0.485, 0.456, 0.406],
            std: [0.229, 0.224, 0.225],
            hflip: 0.5,
            scale_jitter: 0.8,
        }
    }
}

impl DataConfig {
    /// Validate configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.input_size == 0 {
            return Err(crate::PipelineError::Config(
                "input_size must be > 0".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.hflip) {
            return Err(crate::PipelineError::Config(format!(
                "hflip must be in [0, 1], got {}",
                self.hflip
            )));
        }

        if !(0.0..=1.0).contains(&self.scale_jitter) || self.scale_jitter == 0.0 {
            return Err(crate::PipelineError::Config(format!(
                "scale_jitter must be in (0, 1], got {}",
                self.scale_jitter
            )));
        }

        if self.std.iter().any(|&s| s == 0.0) {
            return Err(crate::PipelineError::Config(
                "std channels must be nonzero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(DataConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_input_size() {
        let config = DataConfig {
            input_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_flip_probability() {
        let config = DataConfig {
            hflip: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let config = DataConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: DataConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.input_size, config.input_size);
        assert_eq!(back.mean, config.mean);
    }
}
