//! Synthetic label to complex id join.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use gist_common::{ComplexId, MetadataRow};

use crate::error::{Result, ScoreError};

/// Inverse of the metadata table's `complex id -> label` column pair.
///
/// Construction fails unless the mapping is a bijection, so every lookup
/// recovers exactly the complex the label was assigned to.
#[derive(Debug, Clone, Default)]
pub struct LabelMap {
    by_label: HashMap<u32, ComplexId>,
}

impl LabelMap {
    pub fn from_rows(rows: &[MetadataRow]) -> Result<Self> {
        let mut by_label: HashMap<u32, ComplexId> = HashMap::with_capacity(rows.len());
        let mut seen = HashSet::with_capacity(rows.len());
        for row in rows {
            if !seen.insert(row.complex_id.clone()) {
                return Err(ScoreError::DuplicateComplex {
                    complex_id: row.complex_id.to_string(),
                });
            }
            match by_label.entry(row.label) {
                Entry::Occupied(existing) => {
                    return Err(ScoreError::DuplicateLabel {
                        label: row.label,
                        first: existing.get().to_string(),
                        second: row.complex_id.to_string(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(row.complex_id.clone());
                }
            }
        }
        Ok(Self { by_label })
    }

    pub fn resolve(&self, label: u32) -> Result<&ComplexId> {
        self.by_label
            .get(&label)
            .ok_or(ScoreError::UnknownLabel(label))
    }

    pub fn len(&self) -> usize {
        self.by_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cid: &str, label: u32) -> MetadataRow {
        MetadataRow::new(ComplexId::from(cid.to_string()), label)
    }

    #[test]
    fn test_resolve() {
        let map = LabelMap::from_rows(&[row("P1L1", 0), row("P2L1", 1)]).unwrap();
        assert_eq!(map.resolve(1).unwrap().as_str(), "P2L1");
        assert!(matches!(map.resolve(7), Err(ScoreError::UnknownLabel(7))));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_duplicate_label_is_fatal() {
        let err = LabelMap::from_rows(&[row("P1L1", 0), row("P2L1", 0)]).unwrap_err();
        match err {
            ScoreError::DuplicateLabel { label, first, second } => {
                assert_eq!(label, 0);
                assert_eq!(first, "P1L1");
                assert_eq!(second, "P2L1");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_complex_is_fatal() {
        let err = LabelMap::from_rows(&[row("P1L1", 0), row("P1L1", 1)]).unwrap_err();
        assert!(matches!(err, ScoreError::DuplicateComplex { .. }));
    }
}
