//! Annotation file loading and the per-entry filter pass.

use super::schema::{VocAnnotation, VocObject};
use crate::{
    classes::ClassTable,
    common::*,
    sample::{empty_annots, ANNOT_COLS},
};

/// Reads and parses one annotation file.
///
/// A missing file or non-well-formed XML is an error; entry-level problems
/// are left to [parse_annots].
pub fn load_annotation<P>(path: P) -> Result<VocAnnotation>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let xml_content = fs::read_to_string(path)
        .with_context(|| format!("failed to read annotation file {}", path.display()))?;
    let annotation = serde_xml_rs::from_str(&xml_content)
        .with_context(|| format!("failed to parse annotation file {}", path.display()))?;
    Ok(annotation)
}

/// Filters the raw entries of a parsed annotation file into annotation rows.
///
/// Entries are visited in file order. An entry is dropped when it is marked
/// difficult while `keep_difficult` is unset, names a class outside the
/// table, has a missing or unparsable field, spans one pixel or less on
/// either axis, or leaves the `[0, width] x [0, height]` bounds of the
/// supplied image size. Drops are policy, not errors; nothing is logged or
/// counted. Zero survivors yield a `(0, 5)` array.
pub fn parse_annots(
    annotation: &VocAnnotation,
    classes: &ClassTable,
    (height, width): (usize, usize),
    keep_difficult: bool,
) -> Array2<f32> {
    let (height, width) = (height as f32, width as f32);

    let rows: Vec<[f32; ANNOT_COLS]> = annotation
        .objects
        .iter()
        .filter_map(|object| {
            let row = parse_entry(object, classes, keep_difficult)?;
            let [xmin, ymin, xmax, ymax, _] = row;

            if xmax - xmin <= 1.0 || ymax - ymin <= 1.0 {
                return None;
            }
            if xmin < 0.0 || ymin < 0.0 || xmax > width || ymax > height {
                return None;
            }

            Some(row)
        })
        .collect();

    if rows.is_empty() {
        empty_annots()
    } else {
        Array2::from_shape_vec((rows.len(), ANNOT_COLS), rows.concat())
            .expect("row count and column count are consistent by construction")
    }
}

fn parse_entry(
    object: &VocObject,
    classes: &ClassTable,
    keep_difficult: bool,
) -> Option<[f32; ANNOT_COLS]> {
    // absent marker means a plain object, garbage marker drops the entry
    let difficult = match &object.difficult {
        Some(text) => text.trim().parse::<i64>().ok()? == 1,
        None => false,
    };
    if difficult && !keep_difficult {
        return None;
    }

    let name = object.name.as_ref()?.trim().to_lowercase();
    let class_index = classes.index_of(&name)?;

    let bndbox = object.bndbox.as_ref()?;
    let xmin = parse_coord(bndbox.xmin.as_deref())?;
    let ymin = parse_coord(bndbox.ymin.as_deref())?;
    let xmax = parse_coord(bndbox.xmax.as_deref())?;
    let ymax = parse_coord(bndbox.ymax.as_deref())?;

    Some([xmin, ymin, xmax, ymax, class_index as f32])
}

fn parse_coord(text: Option<&str>) -> Option<f32> {
    let value: f32 = text?.trim().parse().ok()?;
    value.is_finite().then(|| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotation(objects_xml: &str) -> VocAnnotation {
        let xml = format!(
            "<annotation><folder>VOC2007</folder><filename>unused.jpg</filename>{}</annotation>",
            objects_xml
        );
        serde_xml_rs::from_str(&xml).unwrap()
    }

    fn object_xml(name: &str, difficult: &str, bbox: [&str; 4]) -> String {
        format!(
            "<object><name>{}</name><difficult>{}</difficult>\
             <bndbox><xmin>{}</xmin><ymin>{}</ymin><xmax>{}</xmax><ymax>{}</ymax></bndbox>\
             </object>",
            name, difficult, bbox[0], bbox[1], bbox[2], bbox[3]
        )
    }

    #[test]
    fn valid_entry_survives() {
        let annotation = annotation(&object_xml("cat", "0", ["50", "40", "200", "300"]));
        let annots = parse_annots(&annotation, &ClassTable::voc(), (500, 375), false);
        assert_eq!(annots.dim(), (1, 5));
        assert_eq!(
            annots.row(0).to_vec(),
            vec![50.0, 40.0, 200.0, 300.0, 7.0]
        );
    }

    #[test]
    fn degenerate_box_is_dropped() {
        let annotation = annotation(&object_xml("cat", "0", ["10", "10", "10.5", "20"]));
        let annots = parse_annots(&annotation, &ClassTable::voc(), (100, 100), false);
        assert_eq!(annots.dim(), (0, 5));
    }

    #[test]
    fn out_of_bounds_box_is_dropped() {
        let annotation = annotation(&object_xml("cat", "0", ["-5", "10", "50", "50"]));
        let annots = parse_annots(&annotation, &ClassTable::voc(), (100, 100), false);
        assert_eq!(annots.dim(), (0, 5));

        // bounds come from the supplied image size, not the box itself
        let annotation = annotation_exceeding_width();
        let annots = parse_annots(&annotation, &ClassTable::voc(), (100, 100), false);
        assert_eq!(annots.dim(), (0, 5));
    }

    fn annotation_exceeding_width() -> VocAnnotation {
        annotation(&object_xml("cat", "0", ["10", "10", "120", "50"]))
    }

    #[test]
    fn unknown_class_is_dropped() {
        let annotation = annotation(&object_xml("unicorn", "0", ["10", "10", "50", "50"]));
        let annots = parse_annots(&annotation, &ClassTable::voc(), (100, 100), false);
        assert_eq!(annots.dim(), (0, 5));
    }

    #[test]
    fn class_name_is_normalized() {
        let annotation = annotation(&object_xml("  Cat ", "0", ["10", "10", "50", "50"]));
        let annots = parse_annots(&annotation, &ClassTable::voc(), (100, 100), false);
        assert_eq!(annots.dim(), (1, 5));
        assert_eq!(annots[(0, 4)], 7.0);
    }

    #[test]
    fn difficult_entry_follows_flag() {
        let annotation = annotation(&object_xml("cat", "1", ["10", "10", "50", "50"]));

        let dropped = parse_annots(&annotation, &ClassTable::voc(), (100, 100), false);
        assert_eq!(dropped.dim(), (0, 5));

        let kept = parse_annots(&annotation, &ClassTable::voc(), (100, 100), true);
        assert_eq!(kept.dim(), (1, 5));
    }

    #[test]
    fn missing_difficult_marker_means_plain() {
        let xml = "<annotation><object><name>cat</name>\
                   <bndbox><xmin>10</xmin><ymin>10</ymin><xmax>50</xmax><ymax>50</ymax></bndbox>\
                   </object></annotation>";
        let annotation: VocAnnotation = serde_xml_rs::from_str(xml).unwrap();
        let annots = parse_annots(&annotation, &ClassTable::voc(), (100, 100), false);
        assert_eq!(annots.dim(), (1, 5));
    }

    #[test]
    fn malformed_entry_is_dropped_not_fatal() {
        let objects = [
            object_xml("cat", "maybe", ["10", "10", "50", "50"]),
            object_xml("cat", "0", ["ten", "10", "50", "50"]),
            object_xml("cat", "0", ["NaN", "10", "50", "50"]),
            object_xml("dog", "0", ["10", "10", "50", "50"]),
        ]
        .concat();
        let annotation = annotation(&objects);
        let annots = parse_annots(&annotation, &ClassTable::voc(), (100, 100), false);
        assert_eq!(annots.dim(), (1, 5));
        assert_eq!(annots[(0, 4)], 11.0);
    }

    #[test]
    fn source_order_is_preserved() {
        let objects = [
            object_xml("dog", "0", ["10", "10", "50", "50"]),
            object_xml("cat", "1", ["20", "20", "60", "60"]),
            object_xml("person", "0", ["30", "30", "70", "70"]),
        ]
        .concat();
        let annotation = annotation(&objects);
        let annots = parse_annots(&annotation, &ClassTable::voc(), (100, 100), false);
        assert_eq!(annots.dim(), (2, 5));
        assert_eq!(annots[(0, 4)], 11.0);
        assert_eq!(annots[(1, 4)], 14.0);
    }

    #[test]
    fn parsing_is_idempotent() {
        let objects = [
            object_xml("cat", "0", ["50", "40", "200", "300"]),
            object_xml("dog", "0", ["10.5", "20.25", "100", "200"]),
        ]
        .concat();
        let annotation = annotation(&objects);
        let first = parse_annots(&annotation, &ClassTable::voc(), (500, 375), false);
        let second = parse_annots(&annotation, &ClassTable::voc(), (500, 375), false);
        assert_eq!(first, second);
    }
}
