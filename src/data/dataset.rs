/// Dataset views over loaded feature arrays
use std::collections::HashMap;

use candle_core::{Device, Tensor};
use ndarray::{Array1, Array4};
use rand::rngs::StdRng;

use super::transform::Transform;

/// A dataset view: feature array, optional labels, the caller's label map
/// and a transform pipeline. The test split is built without labels and can
/// never yield one.
pub struct AnimalDataset {
    features: Array4<u8>,
    labels: Option<Array1<i64>>,
    label_map: HashMap<i64, u32>,
    transform: Transform,
}

impl AnimalDataset {
    /// Create a labeled or unlabeled dataset view.
    ///
    /// Fails if the label count does not match the feature count, or if a
    /// label is missing from the label map.
    pub fn new(
        features: Array4<u8>,
        labels: Option<Array1<i64>>,
        label_map: HashMap<i64, u32>,
        transform: Transform,
    ) -> crate::Result<Self> {
        if let Some(labels) = &labels {
            if labels.len() != features.shape()[0] {
                return Err(crate::PipelineError::Shape(format!(
                    "{} features vs {} labels",
                    features.shape()[0],
                    labels.len()
                )));
            }
            if let Some(raw) = labels.iter().find(|raw| !label_map.contains_key(raw)) {
                return Err(crate::PipelineError::Config(format!(
                    "label {} not present in label map",
                    raw
                )));
            }
        }

        Ok(Self {
            features,
            labels,
            label_map,
            transform,
        })
    }

    /// Number of examples
    pub fn len(&self) -> usize {
        self.features.shape()[0]
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_labeled(&self) -> bool {
        self.labels.is_some()
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Get one transformed example: the image tensor and, for labeled views,
    /// the mapped class index.
    pub fn get(
        &self,
        idx: usize,
        rng: &mut StdRng,
        device: &Device,
    ) -> crate::Result<(Tensor, Option<u32>)> {
        let image = self.features.index_axis(ndarray::Axis(0), idx);
        let tensor = self.transform.apply(image, rng, device)?;

        let class = match &self.labels {
            Some(labels) => Some(self.label_map[&labels[idx]]),
            None => None,
        };

        Ok((tensor, class))
    }
}
