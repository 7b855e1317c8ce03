//! Provenance metadata for datasets.
//!
//! A [`Tag`] records which file(s) a dataset was built from together with a
//! free-text description per file. Tags start empty or with a single entry
//! and only ever grow when datasets are merged.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One provenance record: source file name plus description.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagEntry {
    pub file_name: String,
    pub description: String,
}

/// Ordered list of provenance records.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    entries: Vec<TagEntry>,
}

impl Tag {
    /// Tag with a single (file name, description) entry.
    pub fn new(file_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            entries: vec![TagEntry {
                file_name: file_name.into(),
                description: description.into(),
            }],
        }
    }

    /// Returns `true` when no provenance has been recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of provenance entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[TagEntry] {
        &self.entries
    }

    /// File names in merge order.
    pub fn file_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.file_name.as_str())
    }

    /// Descriptions in merge order.
    pub fn descriptions(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.description.as_str())
    }

    /// Concatenates the entries of `other` onto `self`.
    ///
    /// Entries already present (same file name and description) are not
    /// repeated, so merging a dataset with a copy of itself keeps its tag.
    pub fn append(&mut self, other: &Tag) {
        for entry in &other.entries {
            if !self.entries.contains(entry) {
                self.entries.push(entry.clone());
            }
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for entry in &self.entries {
            if !first {
                f.write_str(" + ")?;
            }
            first = false;
            write!(f, "{} ({})", entry.file_name, entry.description)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_concatenates_distinct_sources() {
        let mut tag = Tag::new("file_1.mat", "description 1");
        tag.append(&Tag::new("file_2.mat", "description 2"));
        assert_eq!(tag.len(), 2);
        assert_eq!(
            tag.file_names().collect::<Vec<_>>(),
            vec!["file_1.mat", "file_2.mat"]
        );
        assert_eq!(
            tag.descriptions().collect::<Vec<_>>(),
            vec!["description 1", "description 2"]
        );
    }

    #[test]
    fn append_same_source_is_noop() {
        let mut tag = Tag::new("file_1.mat", "description 1");
        let copy = tag.clone();
        tag.append(&copy);
        assert_eq!(tag, copy);
    }

    #[test]
    fn append_to_empty_copies() {
        let mut tag = Tag::default();
        tag.append(&Tag::new("a.tif", "pop"));
        assert_eq!(tag.len(), 1);
        assert_eq!(tag.to_string(), "a.tif (pop)");
    }
}
