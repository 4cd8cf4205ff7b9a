/// Loading of precomputed `.npy` artifacts
///
/// The data directory layout is fixed: `train_features.npy` (u8 images,
/// [N, H, W, C]), `train_labels.npy` (i64, [N]) and `test_features.npy`.
/// A fold directory adds `train_indices.npy` / `val_indices.npy` (i64).
use ndarray::{Array1, Array4};
use ndarray_npy::ReadNpyExt;
use std::fs::File;
use std::path::Path;

pub const TRAIN_FEATURES: &str = "train_features.npy";
pub const TRAIN_LABELS: &str = "train_labels.npy";
pub const TEST_FEATURES: &str = "test_features.npy";
pub const TRAIN_INDICES: &str = "train_indices.npy";
pub const VAL_INDICES: &str = "val_indices.npy";

fn open_artifact(path: &Path) -> crate::Result<File> {
    if !path.exists() {
        return Err(crate::PipelineError::MissingArtifact(path.to_path_buf()));
    }
    Ok(File::open(path)?)
}

/// Load train features, train labels and test features from `root_dir`.
///
/// Any missing required file aborts the whole load with
/// [`crate::PipelineError::MissingArtifact`]; there is no partial result.
pub fn load_files<P: AsRef<Path>>(
    root_dir: P,
) -> crate::Result<(Array4<u8>, Array1<i64>, Array4<u8>)> {
    let dir = root_dir.as_ref();

    log::info!("Loading artifacts from: {:?}", dir);

    let train_features =
        <Array4<u8> as ReadNpyExt>::read_npy(open_artifact(&dir.join(TRAIN_FEATURES))?)?;
    let train_labels =
        <Array1<i64> as ReadNpyExt>::read_npy(open_artifact(&dir.join(TRAIN_LABELS))?)?;
    let test_features =
        <Array4<u8> as ReadNpyExt>::read_npy(open_artifact(&dir.join(TEST_FEATURES))?)?;

    if train_features.shape()[0] != train_labels.len() {
        return Err(crate::PipelineError::Shape(format!(
            "train features {:?} vs labels {:?}",
            train_features.shape(),
            train_labels.shape()
        )));
    }

    log::info!(
        "Loaded {} train examples {:?}, {} test examples",
        train_features.shape()[0],
        &train_features.shape()[1..],
        test_features.shape()[0]
    );

    Ok((train_features, train_labels, test_features))
}

/// Load precomputed fold indices from `fold_dir`.
pub fn load_fold_indices<P: AsRef<Path>>(
    fold_dir: P,
) -> crate::Result<(Array1<i64>, Array1<i64>)> {
    let dir = fold_dir.as_ref();

    let train_idx =
        <Array1<i64> as ReadNpyExt>::read_npy(open_artifact(&dir.join(TRAIN_INDICES))?)?;
    let val_idx = <Array1<i64> as ReadNpyExt>::read_npy(open_artifact(&dir.join(VAL_INDICES))?)?;

    log::info!(
        "Loaded fold: {} train / {} val indices",
        train_idx.len(),
        val_idx.len()
    );

    Ok((train_idx, val_idx))
}
