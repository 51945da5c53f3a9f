//! Serde model of the VOC XML annotation format.

use crate::common::*;

/// One parsed annotation file.
///
/// Only XML well-formedness is required at this level. Per-object fields stay
/// optional and textual so that one malformed entry never fails the file; the
/// parser decides per entry what to keep.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VocAnnotation {
    #[serde(rename = "object", default)]
    pub objects: Vec<VocObject>,
}

/// One raw `<object>` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VocObject {
    pub name: Option<String>,
    pub difficult: Option<String>,
    pub bndbox: Option<VocBndBox>,
}

/// The `<bndbox>` element, coordinates kept as raw text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VocBndBox {
    pub xmin: Option<String>,
    pub ymin: Option<String>,
    pub xmax: Option<String>,
    pub ymax: Option<String>,
}
