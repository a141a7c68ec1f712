use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// A single form field kind supported by the form engine.
///
/// Notes:
/// - Text / Phone / Date render as single-line editors
/// - TextArea is a multi-line friendly editor
/// - Number commits through a numeric parse at the edit boundary
/// - Select cycles through its options; the option list is part of the
///   variant, so a select without options is unrepresentable after
///   construction
/// - Checkbox toggles a boolean
/// - File holds a reference to a local file; bytes are only read at
///   submission time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Phone,
    TextArea,
    Select { options: Vec<String> },
    Checkbox,
    File,
}

impl FieldKind {
    /// True if the field edits through a single-line (or multi-line) text
    /// editor when focused.
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            FieldKind::Text
                | FieldKind::Number
                | FieldKind::Date
                | FieldKind::Phone
                | FieldKind::TextArea
                | FieldKind::File
        )
    }
}

/// Declarative description of one form field.
///
/// `name` is the stable key used for state lookup and the wire payload; it
/// is sent verbatim, with no implicit renaming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl FieldSchema {
    /// Create a new field definition.
    ///
    /// Fails with [`SchemaError::EmptySelect`] when `kind` is a `Select`
    /// with an empty option list.
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        kind: FieldKind,
    ) -> Result<Self, SchemaError> {
        let name = name.into();
        if let FieldKind::Select { options } = &kind {
            if options.is_empty() {
                return Err(SchemaError::EmptySelect { field: name });
            }
        }
        Ok(Self {
            name,
            label: label.into(),
            kind,
            required: false,
            help: None,
        })
    }

    /// Mark the field as required (enforced by the validator).
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach optional help / hint text shown beneath the field.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Borrow the option list for a `Select` field, if any.
    pub fn options(&self) -> Option<&[String]> {
        match &self.kind {
            FieldKind::Select { options } => Some(options.as_slice()),
            _ => None,
        }
    }
}
