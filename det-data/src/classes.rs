//! Detection class tables.

use crate::common::*;

/// Canonical PASCAL VOC class names in index order.
pub const VOC_CLASSES: [&str; 20] = [
    "aeroplane",
    "bicycle",
    "bird",
    "boat",
    "bottle",
    "bus",
    "car",
    "cat",
    "chair",
    "cow",
    "diningtable",
    "dog",
    "horse",
    "motorbike",
    "person",
    "pottedplant",
    "sheep",
    "sofa",
    "train",
    "tvmonitor",
];

/// Per-class RGB colors, aligned with [VOC_CLASSES].
pub const VOC_CLASS_COLORS: [[u8; 3]; 20] = [
    [3, 49, 100],
    [207, 114, 57],
    [78, 11, 12],
    [137, 254, 43],
    [250, 0, 126],
    [96, 70, 138],
    [4, 92, 12],
    [134, 11, 24],
    [168, 242, 245],
    [2, 245, 181],
    [100, 228, 217],
    [45, 220, 214],
    [109, 58, 0],
    [157, 94, 231],
    [37, 3, 197],
    [57, 43, 97],
    [254, 154, 235],
    [164, 1, 210],
    [87, 20, 206],
    [58, 198, 17],
];

/// An ordered class name to index and color mapping.
///
/// The table is immutable once built. Class indices are positions in the
/// requested name list, so training and evaluation resolve names identically
/// as long as they share the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassTable {
    names: IndexSet<String>,
    colors: Vec<[u8; 3]>,
}

impl ClassTable {
    /// Builds the table of all canonical VOC classes.
    pub fn voc() -> Self {
        let names: IndexSet<String> = VOC_CLASSES.iter().map(|name| name.to_string()).collect();
        let colors = VOC_CLASS_COLORS.to_vec();
        Self { names, colors }
    }

    /// Builds a table from a list of canonical class names.
    ///
    /// Every requested name must appear in [VOC_CLASSES] and may appear at
    /// most once. Indices follow the requested order, not the canonical one.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self {
            names: IndexSet::new(),
            colors: vec![],
        };

        for name in names {
            let name = name.as_ref();
            let canonical_index = VOC_CLASSES
                .iter()
                .position(|canonical| *canonical == name)
                .ok_or_else(|| format_err!("unknown class name '{}'", name))?;
            ensure!(
                table.names.insert(name.to_string()),
                "duplicated class name '{}'",
                name
            );
            table.colors.push(VOC_CLASS_COLORS[canonical_index]);
        }

        Ok(table)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.get_index_of(name)
    }

    pub fn name_of(&self, index: usize) -> Option<&str> {
        self.names.get_index(index).map(|name| name.as_str())
    }

    pub fn color_of(&self, index: usize) -> Option<[u8; 3]> {
        self.colors.get(index).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|name| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voc_table() {
        let table = ClassTable::voc();
        assert_eq!(table.len(), 20);
        assert_eq!(table.index_of("aeroplane"), Some(0));
        assert_eq!(table.index_of("cat"), Some(7));
        assert_eq!(table.index_of("tvmonitor"), Some(19));
        assert_eq!(table.name_of(7), Some("cat"));
        assert_eq!(table.color_of(7), Some([134, 11, 24]));
        assert_eq!(table.index_of("unicorn"), None);
    }

    #[test]
    fn subset_table() {
        let table = ClassTable::new(["cat", "dog", "person"]).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.index_of("cat"), Some(0));
        assert_eq!(table.index_of("dog"), Some(1));
        assert_eq!(table.index_of("person"), Some(2));
        assert_eq!(table.index_of("bus"), None);
        assert_eq!(table.color_of(0), Some([134, 11, 24]));
        assert_eq!(table.color_of(2), Some([37, 3, 197]));
    }

    #[test]
    fn unknown_name_fails() {
        let result = ClassTable::new(["cat", "unicorn"]);
        assert!(result.is_err());
    }

    #[test]
    fn duplicated_name_fails() {
        let result = ClassTable::new(["cat", "dog", "cat"]);
        assert!(result.is_err());
    }
}
