//! The VOC detection dataset.

use super::parser;
use crate::{
    classes::ClassTable,
    common::*,
    sample::{load_image, Sample},
    transform::SampleTransform,
};

/// A VOC split manifest name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Val,
    TrainVal,
    Test,
}

impl Split {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Val => "val",
            Self::TrainVal => "trainval",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// One year/split pair of the dataset root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageSet {
    pub year: String,
    pub split: Split,
}

/// Dataset options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocConfig {
    /// The directory holding the `VOC<year>` subdirectories.
    pub root: PathBuf,
    /// The year/split manifests to concatenate, in order.
    pub image_sets: Vec<ImageSet>,
    /// Whether entries marked difficult are retained.
    pub keep_difficult: bool,
    /// Optional list of class names to load; `None` loads the canonical set.
    pub classes: Option<Vec<String>>,
}

/// The Pascal VOC detection dataset.
///
/// The instance is read-only after [load](Self::load); [get](Self::get) takes
/// `&self` and returns an exclusively owned sample, so callers may fan
/// production out over disjoint indices without locks.
#[derive(Debug)]
pub struct VocDetection {
    classes: ClassTable,
    keep_difficult: bool,
    ids: Vec<SampleId>,
    transform: Option<Box<dyn SampleTransform>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SampleId {
    year_root: PathBuf,
    id: String,
}

impl SampleId {
    fn image_path(&self) -> PathBuf {
        self.year_root.join("JPEGImages").join(format!("{}.jpg", self.id))
    }

    fn annotation_path(&self) -> PathBuf {
        self.year_root
            .join("Annotations")
            .join(format!("{}.xml", self.id))
    }
}

impl VocDetection {
    /// Builds the dataset by reading every configured split manifest.
    ///
    /// An absent manifest or an unknown class name fails the call.
    pub fn load(config: VocConfig, transform: Option<Box<dyn SampleTransform>>) -> Result<Self> {
        let VocConfig {
            root,
            image_sets,
            keep_difficult,
            classes,
        } = config;

        let classes = match classes {
            Some(names) => ClassTable::new(names)?,
            None => ClassTable::voc(),
        };

        let mut ids = vec![];
        for ImageSet { year, split } in &image_sets {
            let year_root = root.join(format!("VOC{}", year));
            let manifest = year_root
                .join("ImageSets")
                .join("Main")
                .join(format!("{}.txt", split));
            let text = fs::read_to_string(&manifest).with_context(|| {
                format!("failed to read split manifest {}", manifest.display())
            })?;

            ids.extend(text.lines().filter_map(|line| {
                let id = line.trim();
                (!id.is_empty()).then(|| SampleId {
                    year_root: year_root.clone(),
                    id: id.to_string(),
                })
            }));
        }

        info!("dataset size: {}", ids.len());
        info!("dataset class num: {}", classes.len());

        Ok(Self {
            classes,
            keep_difficult,
            ids,
            transform,
        })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn classes(&self) -> &ClassTable {
        &self.classes
    }

    /// Produces the sample of one manifest index.
    ///
    /// The image is decoded first and its geometry drives the annotation
    /// bounds checks; declared sizes in the XML are never trusted. The
    /// configured transform pipeline runs last.
    pub fn get(&self, index: usize) -> Result<Sample> {
        let sample_id = self.ids.get(index).ok_or_else(|| {
            format_err!(
                "sample index {} out of range of {} samples",
                index,
                self.ids.len()
            )
        })?;

        let image_path = sample_id.image_path();
        let image = load_image(&image_path)?;
        let (height, width, _) = image.dim();

        let annotation = parser::load_annotation(sample_id.annotation_path())?;
        let annots = parser::parse_annots(
            &annotation,
            &self.classes,
            (height, width),
            self.keep_difficult,
        );

        let sample = Sample {
            path: image_path,
            image,
            annots,
            scale: 1.0,
            size: [height as f32, width as f32],
        };

        match &self.transform {
            Some(transform) => transform.transform(sample),
            None => Ok(sample),
        }
    }

    /// Iterates samples in manifest order.
    pub fn samples(&self) -> impl Iterator<Item = Result<Sample>> + '_ {
        (0..self.len()).map(move |index| self.get(index))
    }
}
