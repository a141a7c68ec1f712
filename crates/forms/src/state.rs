use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::schema::FormSchema;
use crate::validate::ValidationFailure;
use crate::value::FieldValue;

/// One-line outcome banner shown after a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

/// Mutable state captured while editing a form.
///
/// Owned exclusively by the view that created it; dropped when that view
/// goes away. Validation failures and the submission notice live here next
/// to the values so a re-render sees everything in one place, mirroring how
/// the values themselves are looked up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    values: HashMap<String, FieldValue>,
    rows: Vec<HashMap<String, FieldValue>>,
    pub failures: Vec<ValidationFailure>,
    pub notice: Option<Notice>,
}

/// Immutable point-in-time copy of form state handed to the validator and
/// the submission adapter. `BTreeMap`-backed so iteration order is stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSnapshot {
    pub values: BTreeMap<String, FieldValue>,
    pub rows: Vec<BTreeMap<String, FieldValue>>,
}

impl FormState {
    /// Fresh state for a schema: every header field at its zero value, no
    /// rows yet.
    pub fn empty(schema: &FormSchema) -> Self {
        let values = schema
            .fields
            .iter()
            .map(|f| (f.name.clone(), FieldValue::default_for(&f.kind)))
            .collect();
        Self {
            values,
            rows: Vec::new(),
            failures: Vec::new(),
            notice: None,
        }
    }

    /// Set (or replace) a header field value.
    pub fn set_value(&mut self, name: &str, value: FieldValue) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get_value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Set a field value inside one row of the repeating section. Out of
    /// range indices are ignored (the UI can only address existing rows).
    pub fn set_row_value(&mut self, row: usize, name: &str, value: FieldValue) {
        if let Some(r) = self.rows.get_mut(row) {
            r.insert(name.to_string(), value);
        } else {
            debug!(row, name, "set_row_value on missing row ignored");
        }
    }

    pub fn row_value(&self, row: usize, name: &str) -> Option<&FieldValue> {
        self.rows.get(row).and_then(|r| r.get(name))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Append a new row initialized from the section's zero-value template.
    /// Existing rows are never touched; rows are append-only.
    pub fn add_row(&mut self, schema: &FormSchema) {
        let Some(section) = &schema.section else {
            debug!("add_row on a schema without a repeating section ignored");
            return;
        };
        let row = section
            .fields
            .iter()
            .map(|f| (f.name.clone(), FieldValue::default_for(&f.kind)))
            .collect();
        self.rows.push(row);
    }

    /// Reset to the zero-value template (after a successful submission).
    /// The notice survives the reset so the success banner stays visible.
    pub fn reset(&mut self, schema: &FormSchema) {
        let notice = self.notice.take();
        *self = Self::empty(schema);
        self.notice = notice;
    }

    /// Immutable copy of the current values for validation/submission.
    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            values: self.values.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            rows: self
                .rows
                .iter()
                .map(|r| r.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                .collect(),
        }
    }

    /// The failure recorded for a header field, if any.
    pub fn failure_for(&self, name: &str) -> Option<&ValidationFailure> {
        self.failures
            .iter()
            .find(|f| f.row.is_none() && f.field == name)
    }

    /// The failure recorded for a field in one section row, if any.
    pub fn row_failure_for(&self, row: usize, name: &str) -> Option<&ValidationFailure> {
        self.failures
            .iter()
            .find(|f| f.row == Some(row) && f.field == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldKind, FieldSchema};
    use crate::schema::SectionSchema;
    use pretty_assertions::assert_eq;

    fn journal_schema() -> FormSchema {
        let header = vec![
            FieldSchema::new("volunteer", "Volunteer", FieldKind::Text)
                .unwrap()
                .required(),
        ];
        let section = SectionSchema::new(
            "entries",
            vec![
                FieldSchema::new("date", "Date", FieldKind::Date).unwrap(),
                FieldSchema::new("hours", "Hours", FieldKind::Number).unwrap(),
                FieldSchema::new("onsite", "On site", FieldKind::Checkbox).unwrap(),
            ],
        );
        FormSchema::with_section("Volunteer journal", header, section).unwrap()
    }

    #[test]
    fn empty_state_has_zero_defaults() {
        let schema = journal_schema();
        let state = FormState::empty(&schema);
        assert_eq!(
            state.get_value("volunteer"),
            Some(&FieldValue::Text(String::new()))
        );
        assert_eq!(state.row_count(), 0);
    }

    #[test]
    fn add_row_appends_zero_template_without_touching_prior_rows() {
        let schema = journal_schema();
        let mut state = FormState::empty(&schema);

        state.add_row(&schema);
        state.set_row_value(0, "date", FieldValue::Text("2026-03-01".into()));
        state.set_row_value(0, "hours", FieldValue::Number(Some(4.0)));

        state.add_row(&schema);
        assert_eq!(state.row_count(), 2);

        // New row carries the section's full field set at zero values.
        assert_eq!(
            state.row_value(1, "date"),
            Some(&FieldValue::Text(String::new()))
        );
        assert_eq!(state.row_value(1, "hours"), Some(&FieldValue::Number(None)));
        assert_eq!(state.row_value(1, "onsite"), Some(&FieldValue::Bool(false)));

        // Prior row is unchanged.
        assert_eq!(
            state.row_value(0, "date"),
            Some(&FieldValue::Text("2026-03-01".into()))
        );
        assert_eq!(
            state.row_value(0, "hours"),
            Some(&FieldValue::Number(Some(4.0)))
        );
    }

    #[test]
    fn rows_are_independently_editable() {
        // One initial row, then two more; editing row 1 leaves the others alone.
        let schema = journal_schema();
        let mut state = FormState::empty(&schema);
        state.add_row(&schema);
        state.add_row(&schema);
        state.add_row(&schema);
        assert_eq!(state.row_count(), 3);

        state.set_row_value(1, "hours", FieldValue::Number(Some(2.5)));

        assert_eq!(state.row_value(0, "hours"), Some(&FieldValue::Number(None)));
        assert_eq!(
            state.row_value(1, "hours"),
            Some(&FieldValue::Number(Some(2.5)))
        );
        assert_eq!(state.row_value(2, "hours"), Some(&FieldValue::Number(None)));
        // Other fields of the edited row keep their defaults.
        assert_eq!(
            state.row_value(1, "date"),
            Some(&FieldValue::Text(String::new()))
        );
    }

    #[test]
    fn add_row_without_section_is_a_no_op() {
        let schema = FormSchema::new(
            "Contact",
            vec![FieldSchema::new("name", "Name", FieldKind::Text).unwrap()],
        )
        .unwrap();
        let mut state = FormState::empty(&schema);
        state.add_row(&schema);
        assert_eq!(state.row_count(), 0);
    }

    #[test]
    fn snapshot_is_detached_from_later_edits() {
        let schema = journal_schema();
        let mut state = FormState::empty(&schema);
        state.set_value("volunteer", FieldValue::Text("Ada".into()));
        let snap = state.snapshot();

        state.set_value("volunteer", FieldValue::Text("Grace".into()));
        assert_eq!(
            snap.values.get("volunteer"),
            Some(&FieldValue::Text("Ada".into()))
        );
    }

    #[test]
    fn reset_restores_defaults_and_keeps_notice() {
        let schema = journal_schema();
        let mut state = FormState::empty(&schema);
        state.set_value("volunteer", FieldValue::Text("Ada".into()));
        state.add_row(&schema);
        state.notice = Some(Notice::success("Saved"));

        state.reset(&schema);
        assert_eq!(
            state.get_value("volunteer"),
            Some(&FieldValue::Text(String::new()))
        );
        assert_eq!(state.row_count(), 0);
        assert_eq!(state.notice, Some(Notice::success("Saved")));
    }
}
