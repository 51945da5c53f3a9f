//! Batch assembly for the training step boundary.

use crate::{common::*, sample::Sample, transform::ResizeKind};

/// One collated batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// Stacked images, `(batch, channel, size, size)` channels first.
    pub images: Array4<f32>,
    /// Annotation rows padded with `-1.0`, `(batch, max_annots, 5)`.
    pub annots: Array3<f32>,
    /// Per-sample accumulated resize factors, `(batch,)`.
    pub scales: Array1<f32>,
    /// Per-sample pre-transform `[height, width]`, `(batch, 2)`.
    pub sizes: Array2<f32>,
}

/// Merges variable-size samples into fixed-shape batch arrays.
///
/// Each image is copied into the top-left corner of a zeroed square canvas
/// sized for the configured resize policy; a resized sample therefore always
/// fits. Annotation rows are `-1.0`-padded up to `max_annots` and truncated
/// beyond it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionCollater {
    canvas_size: usize,
    max_annots: usize,
}

impl DetectionCollater {
    pub fn new(resize: usize, kind: ResizeKind, max_annots: usize) -> Result<Self> {
        ensure!(resize > 0, "target resize must be positive");
        ensure!(max_annots > 0, "max_annots must be positive");
        Ok(Self {
            canvas_size: kind.canvas_size(resize),
            max_annots,
        })
    }

    pub fn canvas_size(&self) -> usize {
        self.canvas_size
    }

    pub fn collate(&self, samples: &[Sample]) -> Result<Batch> {
        ensure!(!samples.is_empty(), "cannot collate an empty batch");

        let batch_size = samples.len();
        let canvas = self.canvas_size;

        let mut images = Array4::<f32>::zeros((batch_size, canvas, canvas, 3));
        let mut annots = Array3::<f32>::from_elem((batch_size, self.max_annots, 5), -1.0);
        let mut scales = Array1::<f32>::zeros(batch_size);
        let mut sizes = Array2::<f32>::zeros((batch_size, 2));

        for (index, sample) in samples.iter().enumerate() {
            let (height, width, _) = sample.image.dim();
            ensure!(
                height <= canvas && width <= canvas,
                "sample {} of size {}x{} exceeds the {}x{} batch canvas",
                sample.path.display(),
                height,
                width,
                canvas,
                canvas
            );

            images
                .slice_mut(s![index, 0..height, 0..width, ..])
                .assign(&sample.image);

            let num_annots = sample.annots.nrows().min(self.max_annots);
            annots
                .slice_mut(s![index, 0..num_annots, ..])
                .assign(&sample.annots.slice(s![0..num_annots, ..]));

            scales[index] = sample.scale;
            sizes[(index, 0)] = sample.size[0];
            sizes[(index, 1)] = sample.size[1];
        }

        let images = images
            .permuted_axes([0, 3, 1, 2])
            .as_standard_layout()
            .to_owned();

        Ok(Batch {
            images,
            annots,
            scales,
            sizes,
        })
    }
}
