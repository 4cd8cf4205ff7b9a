/// Train/validation split selection
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Fraction of the training examples kept for training when no fold is
/// supplied. Fixed for now; the `RandomSplit` field exists so a caller
/// could override it later.
pub const TRAIN_FRACTION: f64 = 0.8;

/// How to partition the training examples into train and validation sets.
#[derive(Debug, Clone)]
pub enum Split {
    /// Precomputed fold indices, typically shared across runs for
    /// cross-validation consistency.
    FoldProvided {
        train_idx: Array1<i64>,
        val_idx: Array1<i64>,
    },
    /// Seeded random shuffle-and-cut. Deterministic for a fixed seed.
    RandomSplit { seed: u64, train_fraction: f64 },
}

impl Split {
    pub fn random(seed: u64) -> Self {
        Split::RandomSplit {
            seed,
            train_fraction: TRAIN_FRACTION,
        }
    }

    /// Resolve to concrete (train, validation) index vectors over
    /// `0..num_examples`.
    ///
    /// Fold indices are bounds-checked; partition coverage is the fold
    /// producer's responsibility (see [`Split::validate_partition`]).
    pub fn indices(&self, num_examples: usize) -> crate::Result<(Vec<usize>, Vec<usize>)> {
        match self {
            Split::FoldProvided { train_idx, val_idx } => {
                let check = |idx: &Array1<i64>, name: &str| -> crate::Result<Vec<usize>> {
                    idx.iter()
                        .map(|&i| {
                            if i < 0 || i as usize >= num_examples {
                                Err(crate::PipelineError::Shape(format!(
                                    "{} index {} out of range 0..{}",
                                    name, i, num_examples
                                )))
                            } else {
                                Ok(i as usize)
                            }
                        })
                        .collect()
                };
                Ok((check(train_idx, "train")?, check(val_idx, "val")?))
            }
            Split::RandomSplit {
                seed,
                train_fraction,
            } => {
                let mut order: Vec<usize> = (0..num_examples).collect();
                let mut rng = StdRng::seed_from_u64(*seed);
                order.shuffle(&mut rng);

                let cut = ((num_examples as f64) * train_fraction).round() as usize;
                let cut = cut.min(num_examples);
                let val = order.split_off(cut);
                Ok((order, val))
            }
        }
    }

    /// Check the partition property: train and validation indices are
    /// disjoint and together cover `0..num_examples` exactly.
    pub fn validate_partition(&self, num_examples: usize) -> crate::Result<()> {
        let (train, val) = self.indices(num_examples)?;

        let mut seen = vec![false; num_examples];
        for &i in train.iter().chain(val.iter()) {
            if seen[i] {
                return Err(crate::PipelineError::Shape(format!(
                    "index {} appears twice in the split",
                    i
                )));
            }
            seen[i] = true;
        }

        if let Some(missing) = seen.iter().position(|&s| !s) {
            return Err(crate::PipelineError::Shape(format!(
                "index {} missing from the split",
                missing
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_split_is_a_partition() {
        let split = Split::random(7);
        split.validate_partition(103).unwrap();

        let (train, val) = split.indices(100).unwrap();
        assert_eq!(train.len(), 80);
        assert_eq!(val.len(), 20);
    }

    #[test]
    fn test_random_split_deterministic_per_seed() {
        let (train_a, val_a) = Split::random(42).indices(50).unwrap();
        let (train_b, val_b) = Split::random(42).indices(50).unwrap();
        assert_eq!(train_a, train_b);
        assert_eq!(val_a, val_b);

        let (train_c, _) = Split::random(43).indices(50).unwrap();
        assert_ne!(train_a, train_c);
    }

    #[test]
    fn test_fold_split_passes_indices_through() {
        let split = Split::FoldProvided {
            train_idx: Array1::from_vec(vec![0, 2, 4]),
            val_idx: Array1::from_vec(vec![1, 3]),
        };
        let (train, val) = split.indices(5).unwrap();
        assert_eq!(train, vec![0, 2, 4]);
        assert_eq!(val, vec![1, 3]);
        split.validate_partition(5).unwrap();
    }

    #[test]
    fn test_fold_split_rejects_out_of_range() {
        let split = Split::FoldProvided {
            train_idx: Array1::from_vec(vec![0, 9]),
            val_idx: Array1::from_vec(vec![1]),
        };
        assert!(split.indices(5).is_err());
    }

    #[test]
    fn test_overlapping_fold_fails_validation() {
        let split = Split::FoldProvided {
            train_idx: Array1::from_vec(vec![0, 1, 2]),
            val_idx: Array1::from_vec(vec![2, 3]),
        };
        assert!(split.validate_partition(4).is_err());
    }
}
