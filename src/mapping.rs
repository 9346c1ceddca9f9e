//! Operator column mapping: five target fields, a fixed option list, and
//! the fail-soft cell resolution used by the commit loop.

use std::collections::HashMap;

use crate::parse::HeaderIndex;

/// Selection meaning "do not populate this field from any CSV column".
pub const IGNORE: &str = "Ignore";

/// Options offered by every one of the five mapping selectors.
pub const TARGET_OPTIONS: [&str; 6] = [
    "First Name",
    "Last Name",
    "Street",
    "Post Code",
    "Country",
    IGNORE,
];

/// The five destination attributes a CSV column can be mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetField {
    FirstName,
    LastName,
    Street,
    PostCode,
    Country,
}

impl TargetField {
    pub const ALL: [TargetField; 5] = [
        TargetField::FirstName,
        TargetField::LastName,
        TargetField::Street,
        TargetField::PostCode,
        TargetField::Country,
    ];

    /// Human-readable label shown in the mapping selector.
    pub fn label(self) -> &'static str {
        match self {
            TargetField::FirstName => "First Name",
            TargetField::LastName => "Last Name",
            TargetField::Street => "Street",
            TargetField::PostCode => "Post Code",
            TargetField::Country => "Country",
        }
    }
}

/// Fixed label -> internal CSV header key table.
pub fn header_key(label: &str) -> Option<&'static str> {
    match label {
        "First Name" => Some("first"),
        "Last Name" => Some("last"),
        "Street" => Some("address"),
        "Post Code" => Some("zip"),
        "Country" => Some("country"),
        _ => None,
    }
}

/// Current selection for each target field. Nothing prevents two fields
/// from selecting the same option.
#[derive(Debug, Clone, Default)]
pub struct FieldMapping {
    selections: HashMap<TargetField, String>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, field: TargetField, choice: impl Into<String>) {
        self.selections.insert(field, choice.into());
    }

    pub fn clear(&mut self, field: TargetField) {
        self.selections.remove(&field);
    }

    pub fn selection(&self, field: TargetField) -> Option<&str> {
        self.selections.get(&field).map(String::as_str)
    }

    /// True iff all five fields have a non-empty selection. "Ignore" is a
    /// valid, explicit selection. Gates the save action.
    pub fn is_complete(&self) -> bool {
        TargetField::ALL
            .iter()
            .all(|f| self.selections.get(f).is_some_and(|s| !s.is_empty()))
    }

    /// Resolve one target field against a data row.
    ///
    /// "Ignore" and an unset field resolve to `None`. A known label is
    /// translated through [`header_key`]; anything else is treated as a raw
    /// header name. A key missing from the index or a row too short for
    /// the column resolves to `None` rather than failing.
    pub fn resolve_cell(
        &self,
        row: &[String],
        field: TargetField,
        index: &HeaderIndex,
    ) -> Option<String> {
        let choice = self.selections.get(&field)?;
        if choice == IGNORE {
            return None;
        }
        let key = header_key(choice).unwrap_or(choice.as_str());
        let col = *index.get(key)?;
        row.get(col).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(headers: &[&str]) -> HeaderIndex {
        headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.to_string(), i))
            .collect()
    }

    fn row_of(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn label_key_table_covers_the_five_labels() {
        assert_eq!(header_key("First Name"), Some("first"));
        assert_eq!(header_key("Last Name"), Some("last"));
        assert_eq!(header_key("Street"), Some("address"));
        assert_eq!(header_key("Post Code"), Some("zip"));
        assert_eq!(header_key("Country"), Some("country"));
        assert_eq!(header_key("Ignore"), None);
    }

    #[test]
    fn mapping_incomplete_until_all_five_selected() {
        let mut mapping = FieldMapping::new();
        assert!(!mapping.is_complete());
        for field in [
            TargetField::FirstName,
            TargetField::LastName,
            TargetField::Street,
            TargetField::PostCode,
        ] {
            mapping.select(field, field.label());
            assert!(!mapping.is_complete());
        }
        mapping.select(TargetField::Country, "Country");
        assert!(mapping.is_complete());
    }

    #[test]
    fn all_ignore_counts_as_complete() {
        let mut mapping = FieldMapping::new();
        for field in TargetField::ALL {
            mapping.select(field, IGNORE);
        }
        assert!(mapping.is_complete());
    }

    #[test]
    fn clearing_a_selection_disables_the_save_gate() {
        let mut mapping = FieldMapping::new();
        for field in TargetField::ALL {
            mapping.select(field, IGNORE);
        }
        assert!(mapping.is_complete());
        assert_eq!(mapping.selection(TargetField::Street), Some(IGNORE));
        mapping.clear(TargetField::Street);
        assert_eq!(mapping.selection(TargetField::Street), None);
        assert!(!mapping.is_complete());
    }

    #[test]
    fn empty_selection_does_not_count_as_complete() {
        let mut mapping = FieldMapping::new();
        for field in TargetField::ALL {
            mapping.select(field, IGNORE);
        }
        mapping.select(TargetField::Street, "");
        assert!(!mapping.is_complete());
    }

    #[test]
    fn ignore_resolves_to_absent_regardless_of_index() {
        let index = index_of(&["first", "last"]);
        let row = row_of(&["Ada", "Lovelace"]);
        let mut mapping = FieldMapping::new();
        mapping.select(TargetField::FirstName, IGNORE);
        assert_eq!(mapping.resolve_cell(&row, TargetField::FirstName, &index), None);
    }

    #[test]
    fn known_label_translates_through_the_table() {
        let index = index_of(&["first", "last", "address", "zip", "country"]);
        let row = row_of(&["Ada", "Lovelace", "12 Main St", "12345", "UK"]);
        let mut mapping = FieldMapping::new();
        mapping.select(TargetField::Street, "Street");
        assert_eq!(
            mapping.resolve_cell(&row, TargetField::Street, &index),
            Some("12 Main St".to_string())
        );
    }

    #[test]
    fn raw_header_round_trip() {
        // A;B;C with one row x;y;z
        let index = index_of(&["A", "B", "C"]);
        let row = row_of(&["x", "y", "z"]);
        let mut mapping = FieldMapping::new();
        mapping.select(TargetField::FirstName, "A");
        assert_eq!(
            mapping.resolve_cell(&row, TargetField::FirstName, &index),
            Some("x".to_string())
        );
        mapping.select(TargetField::FirstName, "Z");
        assert_eq!(mapping.resolve_cell(&row, TargetField::FirstName, &index), None);
    }

    #[test]
    fn missing_mapped_header_degrades_to_absent() {
        let index = index_of(&["first", "last"]);
        let row = row_of(&["Ada", "Lovelace"]);
        let mut mapping = FieldMapping::new();
        // "Street" maps to key "address", which this file does not have.
        mapping.select(TargetField::Street, "Street");
        assert_eq!(mapping.resolve_cell(&row, TargetField::Street, &index), None);
    }

    #[test]
    fn short_row_degrades_to_absent() {
        let index = index_of(&["first", "last", "country"]);
        let row = row_of(&["Ada"]);
        let mut mapping = FieldMapping::new();
        mapping.select(TargetField::Country, "Country");
        assert_eq!(mapping.resolve_cell(&row, TargetField::Country, &index), None);
    }

    #[test]
    fn unset_field_resolves_to_absent() {
        let index = index_of(&["first"]);
        let row = row_of(&["Ada"]);
        let mapping = FieldMapping::new();
        assert_eq!(mapping.resolve_cell(&row, TargetField::FirstName, &index), None);
    }
}
