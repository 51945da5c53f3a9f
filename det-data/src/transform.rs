//! The sample transform pipeline.

use crate::{common::*, sample::Sample};
use image::{
    imageops::{self, FilterType},
    ImageBuffer, Rgb,
};

/// The capability shared by all pipeline stages.
///
/// A stage consumes a sample and returns the rewritten one. Stages keep no
/// per-call state, so a built pipeline is shareable across workers.
pub trait SampleTransform
where
    Self: Debug + Send + Sync,
{
    fn transform(&self, sample: Sample) -> Result<Sample>;
}

/// Applies an ordered list of stages front to back.
///
/// `Compose` implements [SampleTransform] itself, so pipelines nest.
#[derive(Debug)]
pub struct Compose {
    steps: Vec<Box<dyn SampleTransform>>,
}

impl Compose {
    pub fn new(steps: Vec<Box<dyn SampleTransform>>) -> Self {
        Self { steps }
    }
}

impl SampleTransform for Compose {
    fn transform(&self, sample: Sample) -> Result<Sample> {
        self.steps
            .iter()
            .try_fold(sample, |sample, step| step.transform(sample))
    }
}

/// The resize policy of [DetectionResize] and the batch canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeKind {
    /// The longest edge is scaled to the target size.
    YoloStyle,
    /// The short edge is capped at the target size and the long edge at
    /// `round(target * 1333 / 800)`, whichever binds first.
    RetinaStyle,
}

impl ResizeKind {
    /// The scale factor for an image of the given size.
    pub fn scale_factor(&self, resize: usize, height: usize, width: usize) -> f32 {
        let resize = resize as f32;
        let long = height.max(width) as f32;
        let short = height.min(width) as f32;

        match self {
            Self::YoloStyle => resize / long,
            Self::RetinaStyle => {
                let long_cap = (resize * 1333.0 / 800.0).round();
                (long_cap / long).min(resize / short)
            }
        }
    }

    /// The square batch canvas side for the given target size.
    pub fn canvas_size(&self, resize: usize) -> usize {
        match self {
            Self::YoloStyle => resize,
            Self::RetinaStyle => (resize as f64 * 1333.0 / 800.0).round() as usize,
        }
    }
}

/// Deterministic aspect-preserving resize.
///
/// The image is resampled bilinearly, the four box columns and `scale` are
/// multiplied by the factor, and `size` keeps the pre-transform geometry.
/// This is the only in-tree mutator of `Sample::scale`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DetectionResize {
    resize: usize,
    kind: ResizeKind,
}

impl DetectionResize {
    pub fn new(resize: usize, kind: ResizeKind) -> Result<Self> {
        ensure!(resize > 0, "target resize must be positive");
        Ok(Self { resize, kind })
    }
}

impl SampleTransform for DetectionResize {
    fn transform(&self, mut sample: Sample) -> Result<Sample> {
        let (height, width, _) = sample.image.dim();
        let factor = self.kind.scale_factor(self.resize, height, width);
        let new_height = (height as f32 * factor).round() as u32;
        let new_width = (width as f32 * factor).round() as u32;

        let buffer: ImageBuffer<Rgb<f32>, Vec<f32>> =
            ImageBuffer::from_raw(width as u32, height as u32, sample.image.into_raw_vec())
                .ok_or_else(|| format_err!("image array does not fit its declared shape"))?;
        let resized = imageops::resize(&buffer, new_width, new_height, FilterType::Triangle);

        sample.image = Array3::from_shape_vec(
            (new_height as usize, new_width as usize, 3),
            resized.into_raw(),
        )?;
        sample
            .annots
            .slice_mut(s![.., 0..4])
            .mapv_inplace(|coord| coord * factor);
        sample.scale *= factor;

        Ok(sample)
    }
}
