/// Batch-producing loader over a dataset view
use candle_core::{Device, Tensor};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::dataset::AnimalDataset;

/// Loader options shared by the three pipelines.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Examples per batch
    pub batch_size: usize,
    /// Threads used to decode one batch. 0 and 1 both mean inline decoding.
    pub num_workers: usize,
    /// Reshuffle the visit order every epoch (train only)
    pub shuffle: bool,
    /// Seed for the loader's own rng (shuffle order and augmentation draws)
    pub seed: u64,
}

/// Batch loader in the index-vector style: a shuffled (or fixed) visit order
/// over the dataset, advanced by `next_batch`, reset per epoch.
///
/// Augmentation seeds are pre-drawn from the loader rng per example, so the
/// produced batches do not depend on `num_workers`.
pub struct DataLoader {
    dataset: AnimalDataset,
    batch_size: usize,
    num_workers: usize,
    shuffle: bool,
    rng: StdRng,
    indices: Vec<usize>,
    current_idx: usize,
}

impl DataLoader {
    /// Create a new loader over `dataset`.
    pub fn new(dataset: AnimalDataset, opts: LoaderOptions) -> Self {
        let mut rng = StdRng::seed_from_u64(opts.seed);
        let mut indices: Vec<usize> = (0..dataset.len()).collect();

        if opts.shuffle {
            indices.shuffle(&mut rng);
        }

        Self {
            dataset,
            batch_size: opts.batch_size,
            num_workers: opts.num_workers,
            shuffle: opts.shuffle,
            rng,
            indices,
            current_idx: 0,
        }
    }

    /// Get the next batch: images `[B, 3, S, S]` and, for labeled datasets,
    /// class indices `[B]`. Returns `None` when the epoch is exhausted.
    pub fn next_batch(
        &mut self,
        device: &Device,
    ) -> crate::Result<Option<(Tensor, Option<Tensor>)>> {
        if self.current_idx >= self.indices.len() {
            return Ok(None);
        }

        let end_idx = (self.current_idx + self.batch_size).min(self.indices.len());
        let batch_indices = self.indices[self.current_idx..end_idx].to_vec();
        self.current_idx = end_idx;

        // One augmentation seed per example, drawn in batch order.
        let jobs: Vec<(usize, u64)> = batch_indices
            .into_iter()
            .map(|idx| (idx, self.rng.gen()))
            .collect();

        let examples = if self.num_workers > 1 {
            self.decode_parallel(&jobs, device)?
        } else {
            let mut out = Vec::with_capacity(jobs.len());
            for &(idx, seed) in &jobs {
                let mut rng = StdRng::seed_from_u64(seed);
                out.push(self.dataset.get(idx, &mut rng, device)?);
            }
            out
        };

        let images: Vec<Tensor> = examples.iter().map(|(img, _)| img.clone()).collect();
        let images = Tensor::stack(&images, 0)?;

        let labels = if self.dataset.is_labeled() {
            let classes: Vec<u32> = examples
                .iter()
                .map(|(_, class)| {
                    class.ok_or_else(|| {
                        crate::PipelineError::Shape("labeled dataset yielded no class".to_string())
                    })
                })
                .collect::<crate::Result<_>>()?;
            Some(Tensor::from_vec(classes, examples.len(), device)?)
        } else {
            None
        };

        Ok(Some((images, labels)))
    }

    fn decode_parallel(
        &self,
        jobs: &[(usize, u64)],
        device: &Device,
    ) -> crate::Result<Vec<(Tensor, Option<u32>)>> {
        let chunk_size = (jobs.len() + self.num_workers - 1) / self.num_workers;
        let dataset = &self.dataset;

        let decoded: Vec<crate::Result<Vec<(Tensor, Option<u32>)>>> =
            std::thread::scope(|scope| {
                let handles: Vec<_> = jobs
                    .chunks(chunk_size)
                    .map(|chunk| {
                        scope.spawn(move || {
                            chunk
                                .iter()
                                .map(|&(idx, seed)| {
                                    let mut rng = StdRng::seed_from_u64(seed);
                                    dataset.get(idx, &mut rng, device)
                                })
                                .collect()
                        })
                    })
                    .collect();

                handles
                    .into_iter()
                    .map(|handle| handle.join().expect("decode worker panicked"))
                    .collect()
            });

        let mut out = Vec::with_capacity(jobs.len());
        for chunk in decoded {
            out.extend(chunk?);
        }
        Ok(out)
    }

    /// Reset for a new epoch, reshuffling if configured.
    pub fn reset(&mut self) {
        self.current_idx = 0;

        if self.shuffle {
            self.indices.shuffle(&mut self.rng);
        }
    }

    /// Get number of batches per epoch
    pub fn num_batches(&self) -> usize {
        (self.dataset.len() + self.batch_size - 1) / self.batch_size
    }

    /// Get dataset reference
    pub fn dataset(&self) -> &AnimalDataset {
        &self.dataset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::transform::Transform;
    use crate::DataConfig;
    use ndarray::{Array, Array1};
    use std::collections::HashMap;

    fn dataset(n: usize, labeled: bool, is_training: bool) -> AnimalDataset {
        let features =
            Array::from_shape_fn((n, 12, 12, 3), |(i, y, x, c)| (i * 31 + y * 5 + x + c) as u8);
        let labels = labeled.then(|| Array1::from_vec((0..n as i64).map(|i| i % 3).collect()));
        let label_map = HashMap::from([(0, 0), (1, 1), (2, 2)]);
        let config = DataConfig {
            input_size: 8,
            ..Default::default()
        };
        let transform = Transform::from_config(&config, is_training).unwrap();
        AnimalDataset::new(features, labels, label_map, transform).unwrap()
    }

    fn opts(shuffle: bool, num_workers: usize, seed: u64) -> LoaderOptions {
        LoaderOptions {
            batch_size: 4,
            num_workers,
            shuffle,
            seed,
        }
    }

    fn drain(loader: &mut DataLoader) -> Vec<(Tensor, Option<Tensor>)> {
        let mut batches = Vec::new();
        while let Some(batch) = loader.next_batch(&Device::Cpu).unwrap() {
            batches.push(batch);
        }
        batches
    }

    #[test]
    fn test_batch_shapes_and_count() {
        let mut loader = DataLoader::new(dataset(10, true, false), opts(false, 1, 0));
        assert_eq!(loader.num_batches(), 3);

        let batches = drain(&mut loader);
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].0.dims(), &[4, 3, 8, 8]);
        // Last batch is the remainder
        assert_eq!(batches[2].0.dims(), &[2, 3, 8, 8]);
        assert_eq!(batches[0].1.as_ref().unwrap().dims(), &[4]);
    }

    #[test]
    fn test_unlabeled_loader_yields_no_label_tensor() {
        let mut loader = DataLoader::new(dataset(6, false, false), opts(false, 1, 0));
        for (_, labels) in drain(&mut loader) {
            assert!(labels.is_none());
        }
    }

    #[test]
    fn test_same_seed_same_batches() {
        let flatten = |batches: Vec<(Tensor, Option<Tensor>)>| -> Vec<Vec<f32>> {
            batches
                .iter()
                .map(|(img, _)| img.flatten_all().unwrap().to_vec1().unwrap())
                .collect()
        };

        let mut a = DataLoader::new(dataset(10, true, true), opts(true, 1, 7));
        let mut b = DataLoader::new(dataset(10, true, true), opts(true, 1, 7));
        assert_eq!(flatten(drain(&mut a)), flatten(drain(&mut b)));
    }

    #[test]
    fn test_worker_count_does_not_change_batches() {
        let flatten = |batches: Vec<(Tensor, Option<Tensor>)>| -> Vec<Vec<f32>> {
            batches
                .iter()
                .map(|(img, _)| img.flatten_all().unwrap().to_vec1().unwrap())
                .collect()
        };

        let mut inline = DataLoader::new(dataset(10, true, true), opts(true, 1, 7));
        let mut threaded = DataLoader::new(dataset(10, true, true), opts(true, 3, 7));
        assert_eq!(flatten(drain(&mut inline)), flatten(drain(&mut threaded)));
    }

    #[test]
    fn test_reset_reshuffles_train_order() {
        let labels_of = |batches: &[(Tensor, Option<Tensor>)]| -> Vec<u32> {
            batches
                .iter()
                .flat_map(|(_, labels)| {
                    labels.as_ref().unwrap().to_vec1::<u32>().unwrap()
                })
                .collect()
        };

        let mut loader = DataLoader::new(dataset(24, true, false), opts(true, 1, 3));
        let first = labels_of(&drain(&mut loader));
        loader.reset();
        let second = labels_of(&drain(&mut loader));

        // Same multiset of examples, different visit order.
        assert_eq!(first.len(), second.len());
        assert_ne!(first, second);
    }

    #[test]
    fn test_unshuffled_loader_preserves_order() {
        let mut loader = DataLoader::new(dataset(9, true, false), opts(false, 1, 0));
        let mut seen = Vec::new();
        while let Some((_, labels)) = loader.next_batch(&Device::Cpu).unwrap() {
            seen.extend(labels.unwrap().to_vec1::<u32>().unwrap());
        }
        let expected: Vec<u32> = (0..9).map(|i| i % 3).collect();
        assert_eq!(seen, expected);
    }
}
