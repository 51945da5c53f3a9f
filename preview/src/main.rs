//! Smoke-test binary that previews dataset samples and batches.

mod config;

use anyhow::{Context, Result};
use config::Config;
use det_data::{
    collate::DetectionCollater,
    transform::DetectionResize,
    voc::VocDetection,
};
use log::info;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, Clone, StructOpt)]
/// Preview detection dataset samples and batches
struct Args {
    #[structopt(long, default_value = "preview.json5")]
    /// configuration file
    pub config_file: PathBuf,
    #[structopt(long, default_value = "5")]
    /// number of samples to preview
    pub samples: usize,
    #[structopt(long, default_value = "2")]
    /// number of batches to assemble
    pub batches: usize,
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    // parse arguments
    let Args {
        config_file,
        samples: num_samples,
        batches: num_batches,
    } = Args::from_args();
    let Config {
        dataset: dataset_config,
        preprocessor,
        loader,
    } = Config::open(&config_file)
        .with_context(|| format!("failed to load config file '{}'", config_file.display()))?;

    // build the pipeline
    let resize = DetectionResize::new(preprocessor.resize.get(), preprocessor.kind)?;
    let dataset = VocDetection::load(dataset_config, Some(Box::new(resize)))?;
    let collater = DetectionCollater::new(
        preprocessor.resize.get(),
        preprocessor.kind,
        loader.max_annots.get(),
    )?;

    // preview individual samples
    for index in 0..num_samples.min(dataset.len()) {
        let sample = dataset.get(index)?;
        info!(
            "sample {}: path {}, image {:?}, annots {:?}, scale {}, size {:?}",
            index,
            sample.path.display(),
            sample.image.dim(),
            sample.annots.dim(),
            sample.scale,
            sample.size,
        );
    }

    // assemble sequential batches
    let batch_size = loader.batch_size.get();
    let mut pending = Vec::with_capacity(batch_size);
    let mut produced = 0;

    for sample in dataset.samples() {
        if produced == num_batches {
            break;
        }
        pending.push(sample?);

        if pending.len() == batch_size {
            let batch = collater.collate(&pending)?;
            info!(
                "batch {}: images {:?}, annots {:?}, scales {:?}, sizes {:?}",
                produced,
                batch.images.dim(),
                batch.annots.dim(),
                batch.scales.dim(),
                batch.sizes.dim(),
            );
            pending.clear();
            produced += 1;
        }
    }

    Ok(())
}
