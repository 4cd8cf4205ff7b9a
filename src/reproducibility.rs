/// Process-wide RNG seeding for reproducible runs
///
/// Call [`setup_reproducibility`] exactly once at process start, before any
/// loaders or models are built. It mutates shared global RNG state: the
/// crate-global [`rand::rngs::StdRng`] behind [`with_global_rng`], and the
/// seed of whichever accelerator device candle has available. Candle's CPU
/// backend has no seedable generator of its own; every host-side draw in this
/// crate goes through the global rng or an explicitly seeded one, so seeding
/// here covers them all.
use std::sync::{Mutex, OnceLock};

use candle_core::Device;
use rand::rngs::StdRng;
use rand::SeedableRng;

static GLOBAL_RNG: OnceLock<Mutex<StdRng>> = OnceLock::new();

/// Seed every random source the pipeline depends on.
///
/// Re-invoking with the same seed restores the global rng to the same state,
/// so subsequent draws repeat.
pub fn setup_reproducibility(seed: u64) -> crate::Result<()> {
    if candle_core::utils::cuda_is_available() {
        let device = Device::new_cuda(0)?;
        device.set_seed(seed)?;
        log::info!("Seeded CUDA device 0 with {}", seed);
    }

    if candle_core::utils::metal_is_available() {
        let device = Device::new_metal(0)?;
        device.set_seed(seed)?;
        log::info!("Seeded Metal device 0 with {}", seed);
    }

    let rng = GLOBAL_RNG.get_or_init(|| Mutex::new(StdRng::seed_from_u64(seed)));
    *rng.lock().expect("global rng poisoned") = StdRng::seed_from_u64(seed);

    log::info!("Reproducibility set up with seed {}", seed);
    Ok(())
}

/// Run `f` with exclusive access to the crate-global rng.
///
/// Falls back to an entropy-seeded generator if [`setup_reproducibility`]
/// was never called.
pub fn with_global_rng<T>(f: impl FnOnce(&mut StdRng) -> T) -> T {
    let rng = GLOBAL_RNG.get_or_init(|| Mutex::new(StdRng::from_entropy()));
    f(&mut rng.lock().expect("global rng poisoned"))
}
