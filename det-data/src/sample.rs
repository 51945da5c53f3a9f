//! Sample records produced by dataset loading.

use crate::common::*;

/// The number of columns of an annotation row.
///
/// A row is `[x_min, y_min, x_max, y_max, class_index]` in pixel coordinates
/// of the owning image.
pub const ANNOT_COLS: usize = 5;

/// Builds the annotation array of a sample without objects.
pub fn empty_annots() -> Array2<f32> {
    Array2::zeros((0, ANNOT_COLS))
}

/// A loaded detection sample.
///
/// The record is rebuilt from disk on every request. Transform stages rewrite
/// `image`, `annots` and `scale` in place of the input; `size` keeps the
/// decoded height and width from before any transform ran.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// The source image path.
    pub path: PathBuf,
    /// The image in `(height, width, channel)` RGB order, values in `0.0..=255.0`.
    pub image: Array3<f32>,
    /// Annotation rows, `(num_objects, 5)`.
    pub annots: Array2<f32>,
    /// The accumulated resize factor, `1.0` at assembly.
    pub scale: f32,
    /// The decoded `[height, width]` before any transform.
    pub size: [f32; 2],
}

impl Sample {
    pub fn height(&self) -> usize {
        self.image.dim().0
    }

    pub fn width(&self) -> usize {
        self.image.dim().1
    }

    /// Reads the annotation rows as typed records, skipping padding rows.
    pub fn labeled_boxes(&self) -> Vec<LabeledBox> {
        self.annots
            .outer_iter()
            .filter_map(LabeledBox::from_row)
            .collect()
    }
}

/// A typed view of one annotation row.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledBox {
    /// `[x_min, y_min, x_max, y_max]` in pixels.
    pub bbox: [f32; 4],
    pub class: usize,
}

impl LabeledBox {
    /// Converts an annotation row back to a record.
    ///
    /// Returns `None` for padding rows, whose class column is negative.
    pub fn from_row(row: ArrayView1<f32>) -> Option<Self> {
        debug_assert_eq!(row.len(), ANNOT_COLS);
        let class = row[4];
        if class < 0.0 {
            return None;
        }
        Some(Self {
            bbox: [row[0], row[1], row[2], row[3]],
            class: class as usize,
        })
    }

    pub fn to_row(&self) -> [f32; ANNOT_COLS] {
        let [xmin, ymin, xmax, ymax] = self.bbox;
        [xmin, ymin, xmax, ymax, self.class as f32]
    }
}

/// Decodes an image file into a `(height, width, channel)` RGB float array.
///
/// Pixel values are byte values as floats. A missing or undecodable file is
/// an error.
pub fn load_image<P>(path: P) -> Result<Array3<f32>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let image = image::open(path)
        .with_context(|| format!("failed to read image file {}", path.display()))?
        .to_rgb8();
    let (width, height) = image.dimensions();
    let pixels: Vec<f32> = image
        .into_raw()
        .into_iter()
        .map(|value| value as f32)
        .collect();
    let array = Array3::from_shape_vec((height as usize, width as usize, 3), pixels)?;
    Ok(array)
}
