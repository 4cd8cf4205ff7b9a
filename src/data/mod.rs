/// Data pipeline: artifacts, splits, transforms, datasets and loaders
pub mod artifacts;
pub mod dataset;
pub mod loader;
pub mod split;
pub mod transform;

pub use artifacts::{load_files, load_fold_indices};
pub use dataset::AnimalDataset;
pub use loader::{DataLoader, LoaderOptions};
pub use split::{Split, TRAIN_FRACTION};
pub use transform::Transform;

use std::collections::HashMap;
use std::path::Path;

use ndarray::Axis;

/// Assemble the (train, validation, test) loader triple.
///
/// Loads the `.npy` artifacts under `data_dir`, splits the training examples
/// by the fold under `fold_dir` when given (otherwise a seeded random
/// 80/20 cut), and wraps the three dataset views in loaders. Only the train
/// loader shuffles; the test view carries no labels.
#[allow(clippy::too_many_arguments)]
pub fn setup_dataloaders<P: AsRef<Path>>(
    config: &crate::DataConfig,
    data_dir: P,
    seed: u64,
    batch_size: usize,
    num_workers: usize,
    label_map: HashMap<i64, u32>,
    fold_dir: Option<&Path>,
) -> crate::Result<(DataLoader, DataLoader, DataLoader)> {
    let train_transform = Transform::from_config(config, true)?;
    let eval_transform = Transform::from_config(config, false)?;

    let (train_features, train_labels, test_features) = load_files(data_dir)?;

    let split = match fold_dir {
        Some(dir) => {
            let (train_idx, val_idx) = load_fold_indices(dir)?;
            Split::FoldProvided { train_idx, val_idx }
        }
        None => Split::random(seed),
    };
    let (train_idx, val_idx) = split.indices(train_features.shape()[0])?;

    log::info!(
        "Split: {} train / {} val / {} test examples",
        train_idx.len(),
        val_idx.len(),
        test_features.shape()[0]
    );

    let train_dataset = AnimalDataset::new(
        train_features.select(Axis(0), &train_idx),
        Some(train_labels.select(Axis(0), &train_idx)),
        label_map.clone(),
        train_transform,
    )?;
    let val_dataset = AnimalDataset::new(
        train_features.select(Axis(0), &val_idx),
        Some(train_labels.select(Axis(0), &val_idx)),
        label_map.clone(),
        eval_transform.clone(),
    )?;
    let test_dataset = AnimalDataset::new(test_features, None, label_map, eval_transform)?;

    let opts = |shuffle: bool| LoaderOptions {
        batch_size,
        num_workers,
        shuffle,
        seed,
    };

    Ok((
        DataLoader::new(train_dataset, opts(true)),
        DataLoader::new(val_dataset, opts(false)),
        DataLoader::new(test_dataset, opts(false)),
    ))
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use ndarray::{Array, Array1};
    use ndarray_npy::WriteNpyExt;
    use std::fs::File;
    use std::path::Path;

    use super::artifacts;

    pub fn write_features(path: &Path, n: usize, side: usize) {
        let features =
            Array::from_shape_fn((n, side, side, 3), |(i, y, x, c)| (i + y + x + c) as u8);
        features.write_npy(File::create(path).unwrap()).unwrap();
    }

    pub fn write_labels(path: &Path, labels: &[i64]) {
        let labels = Array1::from_vec(labels.to_vec());
        labels.write_npy(File::create(path).unwrap()).unwrap();
    }

    pub fn write_data_dir(dir: &Path, n_train: usize, n_test: usize, side: usize) {
        write_features(&dir.join(artifacts::TRAIN_FEATURES), n_train, side);
        let labels: Vec<i64> = (0..n_train).map(|i| (i % 3) as i64).collect();
        write_labels(&dir.join(artifacts::TRAIN_LABELS), &labels);
        write_features(&dir.join(artifacts::TEST_FEATURES), n_test, side);
    }

    pub fn write_fold_dir(dir: &Path, train_idx: &[i64], val_idx: &[i64]) {
        write_labels(&dir.join(artifacts::TRAIN_INDICES), train_idx);
        write_labels(&dir.join(artifacts::VAL_INDICES), val_idx);
    }
}
