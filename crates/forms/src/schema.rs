use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::field::{FieldKind, FieldSchema};

/// A repeating-entry section: a variable-length list of identically shaped
/// rows (journal entries, expense lines) carried alongside a form's fixed
/// header fields.
///
/// `key` is the wire name the row array serializes under; row field names
/// live in that namespace, so they may not collide with header fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSchema {
    pub key: String,
    pub fields: Vec<FieldSchema>,
}

impl SectionSchema {
    pub fn new(key: impl Into<String>, fields: Vec<FieldSchema>) -> Self {
        Self {
            key: key.into(),
            fields,
        }
    }
}

/// Declarative schema for a form: ordered header fields plus an optional
/// repeating section. Field order is display order and wire order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<FieldSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<SectionSchema>,
}

impl FormSchema {
    /// Create a flat schema.
    ///
    /// Fails with [`SchemaError::DuplicateField`] when two fields share a
    /// name.
    pub fn new(name: impl Into<String>, fields: Vec<FieldSchema>) -> Result<Self, SchemaError> {
        Self::build(name.into(), fields, None)
    }

    /// Create a schema with a repeating-entry section.
    ///
    /// Duplicate names are rejected across header fields, within the
    /// section, and between the two: rows are namespaced under the section
    /// key on the wire, but a shared name would still be ambiguous in the
    /// editing UI. A `File` field inside the section is rejected with
    /// [`SchemaError::FileInSection`]: rows serialize as JSON, which
    /// cannot carry an attachment.
    pub fn with_section(
        name: impl Into<String>,
        fields: Vec<FieldSchema>,
        section: SectionSchema,
    ) -> Result<Self, SchemaError> {
        Self::build(name.into(), fields, Some(section))
    }

    fn build(
        name: String,
        fields: Vec<FieldSchema>,
        section: Option<SectionSchema>,
    ) -> Result<Self, SchemaError> {
        let mut seen = HashSet::new();
        let section_fields = section.iter().flat_map(|s| s.fields.iter());
        for field in fields.iter().chain(section_fields) {
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    name: field.name.clone(),
                });
            }
        }
        if let Some(section) = &section {
            for field in &section.fields {
                if matches!(field.kind, FieldKind::File) {
                    return Err(SchemaError::FileInSection {
                        field: field.name.clone(),
                    });
                }
            }
        }
        Ok(Self {
            name,
            description: None,
            fields,
            section,
        })
    }

    /// Attach an optional description (multi-line friendly).
    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Find a header field by its name.
    pub fn field_by_name(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldKind;
    use pretty_assertions::assert_eq;

    fn text(name: &str) -> FieldSchema {
        FieldSchema::new(name, name, FieldKind::Text).unwrap()
    }

    #[test]
    fn duplicate_header_names_are_rejected() {
        let err = FormSchema::new("Contact", vec![text("email"), text("email")]).unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateField {
                name: "email".into()
            }
        );
    }

    #[test]
    fn duplicate_across_header_and_section_is_rejected() {
        let section = SectionSchema::new("entries", vec![text("date")]);
        let err = FormSchema::with_section("Journal", vec![text("date")], section).unwrap_err();
        assert_eq!(err, SchemaError::DuplicateField { name: "date".into() });
    }

    #[test]
    fn file_field_in_section_is_rejected() {
        // A chosen file would be flattened into the rows' JSON encoding and
        // lost; the schema refuses to be built instead.
        let section = SectionSchema::new(
            "expenses",
            vec![
                text("date"),
                FieldSchema::new("receipt", "Receipt", FieldKind::File).unwrap(),
            ],
        );
        let err = FormSchema::with_section("Expenses", vec![text("volunteer")], section)
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::FileInSection {
                field: "receipt".into()
            }
        );
    }

    #[test]
    fn file_field_in_header_is_allowed() {
        let schema = FormSchema::new(
            "News post",
            vec![
                text("title"),
                FieldSchema::new("attachment", "Attachment", FieldKind::File).unwrap(),
            ],
        )
        .unwrap();
        assert!(schema.field_by_name("attachment").is_some());
    }

    #[test]
    fn field_order_is_preserved() {
        let schema = FormSchema::new("Contact", vec![text("name"), text("email"), text("city")])
            .unwrap()
            .description("How to reach you");
        let names: Vec<_> = schema.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name", "email", "city"]);
        assert_eq!(schema.description.as_deref(), Some("How to reach you"));
    }

    #[test]
    fn section_lookup() {
        let section = SectionSchema::new("entries", vec![text("activity")]);
        let schema = FormSchema::with_section("Journal", vec![text("volunteer")], section).unwrap();
        assert!(schema.field_by_name("volunteer").is_some());
        assert!(schema.field_by_name("activity").is_none());
        assert_eq!(schema.section.as_ref().unwrap().key, "entries");
    }
}
