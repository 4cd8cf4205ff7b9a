/// Pipeline smoke run: seed, assemble loaders, build a model, forward one epoch
use std::collections::HashMap;

use animal_classifier::{data, models, reproducibility, DataConfig};
use candle_core::Device;
use candle_nn::{Module, VarBuilder, VarMap};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let seed = 42;
    let model_name = "efficientnet_b0";
    let num_classes = 10;
    let data_dir = std::env::args().nth(1).unwrap_or_else(|| "data".to_string());

    // Device setup - Try CUDA first, fallback to CPU
    let device = if candle_core::utils::cuda_is_available() {
        Device::new_cuda(0)?
    } else {
        Device::Cpu
    };
    log::info!("Using device: {:?}", device);

    reproducibility::setup_reproducibility(seed)?;

    // Identity label map for raw labels 0..num_classes
    let label_map: HashMap<i64, u32> = (0..num_classes).map(|c| (c as i64, c)).collect();

    let batch_size = models::get_batch_size(model_name)?;
    let config = DataConfig::default();

    let (mut train_loader, val_loader, test_loader) = data::setup_dataloaders(
        &config, &data_dir, seed, batch_size, 4, label_map, None,
    )?;

    log::info!("Loaders ready:");
    log::info!("  - Train batches: {}", train_loader.num_batches());
    log::info!("  - Val batches:   {}", val_loader.num_batches());
    log::info!("  - Test batches:  {}", test_loader.num_batches());

    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, candle_core::DType::F32, &device);
    let model = models::init_model(model_name, num_classes as usize, vb)?;
    log::info!("Model {} built with {} classes", model_name, num_classes);

    // One pass over the train loader to exercise the whole pipeline
    let mut batches = 0;
    while let Some((images, labels)) = train_loader.next_batch(&device)? {
        let logits = model.forward(&images)?;
        batches += 1;
        if batches == 1 {
            log::info!(
                "First batch: images {:?}, labels {:?}, logits {:?}",
                images.dims(),
                labels.as_ref().map(|l| l.dims()),
                logits.dims()
            );
        }
    }
    log::info!("Epoch done: {} batches", batches);

    Ok(())
}
