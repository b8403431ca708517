//! The bundled IPC reference dataset.
//!
//! The JSON file is compiled into the binary and parsed once at startup.
//! Sections are indexed by their normalised sort key, so `"IPC 498A"`,
//! `"498a"` and `"498A"` all resolve to the same entry.

use std::collections::HashMap;

use jurislead_core::{IpcSection, normalize_section};
use tracing::debug;

use crate::SearchError;

const BUNDLED: &str = include_str!("../data/ipc_sections.json");

#[derive(Debug, Clone)]
pub struct IpcDataset {
    sections: Vec<IpcSection>,
    index: HashMap<String, usize>,
}

impl IpcDataset {
    /// Parse the dataset shipped with the crate.
    pub fn bundled() -> Result<Self, SearchError> {
        Self::from_json(BUNDLED)
    }

    /// Parse a dataset from JSON, rejecting duplicate section identifiers.
    pub fn from_json(json: &str) -> Result<Self, SearchError> {
        let sections: Vec<IpcSection> = serde_json::from_str(json)?;
        Self::from_sections(sections)
    }

    pub fn from_sections(sections: Vec<IpcSection>) -> Result<Self, SearchError> {
        let mut index = HashMap::with_capacity(sections.len());
        for (i, entry) in sections.iter().enumerate() {
            if index.insert(normalize_section(&entry.section), i).is_some() {
                return Err(SearchError::DuplicateSection(entry.section.clone()));
            }
        }
        debug!(sections = sections.len(), "loaded IPC dataset");
        Ok(Self { sections, index })
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Entries in file order.
    pub fn iter(&self) -> impl Iterator<Item = &IpcSection> {
        self.sections.iter()
    }

    /// Look up one section, accepting display forms like `"Section 302"`.
    pub fn get(&self, id: &str) -> Option<&IpcSection> {
        self.index
            .get(&normalize_section(id))
            .map(|&i| &self.sections[i])
    }

    /// Every entry ordered by section number, then suffix letters.
    pub fn sorted(&self) -> Vec<&IpcSection> {
        let mut all: Vec<&IpcSection> = self.sections.iter().collect();
        all.sort_by_cached_key(|s| normalize_section(&s.section));
        all
    }

    /// Related sections of `id` that are present in the dataset.
    ///
    /// References to sections the dataset does not carry are skipped.
    pub fn related(&self, id: &str) -> Vec<&IpcSection> {
        let Some(entry) = self.get(id) else {
            return Vec::new();
        };
        entry
            .related_sections
            .iter()
            .filter_map(|r| self.get(r))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_dataset_loads() {
        let ds = IpcDataset::bundled().unwrap();
        assert!(ds.len() >= 30);
        assert_eq!(ds.get("302").unwrap().title, "Punishment for murder");
    }

    #[test]
    fn lookup_accepts_display_forms() {
        let ds = IpcDataset::bundled().unwrap();
        assert_eq!(ds.get("IPC 498A").unwrap().section, "498A");
        assert_eq!(ds.get("section 498a").unwrap().section, "498A");
        assert!(ds.get("9999").is_none());
    }

    #[test]
    fn sorted_uses_section_number_then_suffix() {
        let ds = IpcDataset::bundled().unwrap();
        let order: Vec<&str> = ds.sorted().iter().map(|s| s.section.as_str()).collect();
        let pos = |id: &str| order.iter().position(|s| *s == id).unwrap();
        assert!(pos("120B") < pos("147"));
        assert!(pos("304") < pos("304A"));
        assert!(pos("304A") < pos("304B"));
        assert!(pos("354") < pos("354A"));
        assert!(pos("498A") < pos("500"));
    }

    #[test]
    fn related_skips_missing_references() {
        let ds = IpcDataset::bundled().unwrap();
        let related: Vec<&str> = ds
            .related("302")
            .iter()
            .map(|s| s.section.as_str())
            .collect();
        // 299 and 300 are definitions the dataset does not carry.
        assert_eq!(related, vec!["304", "307"]);
    }

    #[test]
    fn duplicate_sections_rejected() {
        let json = r#"[
            {"section": "302", "title": "a", "description": "", "punishment": "",
             "severity": "high", "bailable": false, "cognizable": true},
            {"section": "302", "title": "b", "description": "", "punishment": "",
             "severity": "high", "bailable": false, "cognizable": true}
        ]"#;
        let err = IpcDataset::from_json(json).unwrap_err();
        assert!(matches!(err, SearchError::DuplicateSection(s) if s == "302"));
    }

    #[test]
    fn malformed_dataset_rejected() {
        assert!(matches!(
            IpcDataset::from_json(r#"[{"section": "302"}]"#),
            Err(SearchError::Parse(_))
        ));
    }
}
