use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::field::FieldKind;

/// Reference to a local file chosen for upload. Only the reference travels
/// through form state; bytes are read by the submission client at send time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub file_name: String,
    pub path: PathBuf,
}

impl FileRef {
    /// Build a reference from a path, taking the file name component as the
    /// upload name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { file_name, path }
    }
}

/// Current value of one field, discriminated by the field's declared kind
/// rather than stored as an untyped blob.
///
/// - textual kinds (text, date, phone, textarea, select) carry `Text`
/// - number carries `Number(None)` until a successful parse
/// - checkbox carries `Bool`
/// - file carries `File(None)` until a file is chosen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Number(Option<f64>),
    Bool(bool),
    File(Option<FileRef>),
}

impl FieldValue {
    /// The zero value a field starts from (and is reset to after a
    /// successful submission).
    pub fn default_for(kind: &FieldKind) -> Self {
        match kind {
            FieldKind::Number => FieldValue::Number(None),
            FieldKind::Checkbox => FieldValue::Bool(false),
            FieldKind::File => FieldValue::File(None),
            _ => FieldValue::Text(String::new()),
        }
    }

    /// True when the value counts as "not filled in" for a required check.
    /// A checkbox is never blank: unchecked is a deliberate answer.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Number(n) => n.is_none(),
            FieldValue::Bool(_) => false,
            FieldValue::File(f) => f.is_none(),
        }
    }

    /// Borrow the textual content, if this is a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// True if any file reference is attached.
    pub fn is_file(&self) -> bool {
        matches!(self, FieldValue::File(Some(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_per_kind() {
        assert_eq!(
            FieldValue::default_for(&FieldKind::Text),
            FieldValue::Text(String::new())
        );
        assert_eq!(
            FieldValue::default_for(&FieldKind::Number),
            FieldValue::Number(None)
        );
        assert_eq!(
            FieldValue::default_for(&FieldKind::Checkbox),
            FieldValue::Bool(false)
        );
        assert_eq!(
            FieldValue::default_for(&FieldKind::File),
            FieldValue::File(None)
        );
    }

    #[test]
    fn blankness() {
        assert!(FieldValue::Text("   ".into()).is_blank());
        assert!(!FieldValue::Text("x".into()).is_blank());
        assert!(FieldValue::Number(None).is_blank());
        assert!(!FieldValue::Number(Some(0.0)).is_blank());
        assert!(!FieldValue::Bool(false).is_blank());
        assert!(FieldValue::File(None).is_blank());
    }

    #[test]
    fn file_ref_takes_name_from_path() {
        let f = FileRef::from_path("/tmp/uploads/banner.png");
        assert_eq!(f.file_name, "banner.png");
    }
}
