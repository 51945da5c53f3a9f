//! Preview program configuration format.

use anyhow::Result;
use det_data::{transform::ResizeKind, voc::VocConfig};
use serde::{Deserialize, Serialize};
use std::{num::NonZeroUsize, path::Path};

/// The main preview configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub dataset: VocConfig,
    pub preprocessor: PreprocessorConfig,
    pub loader: LoaderConfig,
}

impl Config {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = std::fs::read_to_string(path)?;
        let config = json5::from_str(&text)?;
        Ok(config)
    }
}

/// The sample preprocessing options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessorConfig {
    /// The resize target in pixels.
    pub resize: NonZeroUsize,
    /// The resize policy.
    pub kind: ResizeKind,
}

/// The batch assembly options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    pub batch_size: NonZeroUsize,
    pub max_annots: NonZeroUsize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use det_data::voc::Split;

    #[test]
    fn parse_example_config() {
        let text = r#"{
            dataset: {
                root: "/data/VOCdevkit",
                image_sets: [
                    { year: "2007", split: "trainval" },
                    { year: "2012", split: "trainval" },
                ],
                keep_difficult: false,
                classes: null,
            },
            preprocessor: {
                resize: 640,
                kind: "yolo_style",
            },
            loader: {
                batch_size: 4,
                max_annots: 100,
            },
        }"#;
        let config: Config = json5::from_str(text).unwrap();
        assert_eq!(config.dataset.image_sets.len(), 2);
        assert_eq!(config.dataset.image_sets[1].split, Split::TrainVal);
        assert_eq!(config.preprocessor.resize.get(), 640);
        assert_eq!(config.preprocessor.kind, ResizeKind::YoloStyle);
        assert_eq!(config.loader.batch_size.get(), 4);
    }
}
