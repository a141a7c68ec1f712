use serde::{Deserialize, Serialize};

use crate::field::FieldSchema;
use crate::schema::FormSchema;
use crate::state::FormSnapshot;
use crate::value::FieldValue;

/// One failed check, addressed to a header field (`row: None`) or to a
/// field inside one row of the repeating section. Produced transiently at
/// submit time; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    pub field: String,
    pub row: Option<usize>,
    pub message: String,
}

/// Check a snapshot against its schema.
///
/// Fields are visited in schema order, header first, then each section row.
/// Checks are independent and never fail fast: every offending field is
/// reported so the UI can highlight all of them in one pass. An empty
/// result means the form is submittable.
pub fn validate(schema: &FormSchema, snapshot: &FormSnapshot) -> Vec<ValidationFailure> {
    let mut failures = Vec::new();

    for field in &schema.fields {
        check_field(field, snapshot.values.get(&field.name), None, &mut failures);
    }

    if let Some(section) = &schema.section {
        for (idx, row) in snapshot.rows.iter().enumerate() {
            for field in &section.fields {
                check_field(field, row.get(&field.name), Some(idx), &mut failures);
            }
        }
    }

    failures
}

fn check_field(
    field: &FieldSchema,
    value: Option<&FieldValue>,
    row: Option<usize>,
    failures: &mut Vec<ValidationFailure>,
) {
    // A missing entry counts as the zero value.
    let blank = value.map(FieldValue::is_blank).unwrap_or(true);

    if field.required && blank {
        failures.push(ValidationFailure {
            field: field.name.clone(),
            row,
            message: format!("{} is required", field.label),
        });
    }

    // Membership check for selects, only once something was chosen: an
    // untouched optional select is not an invalid selection.
    if let Some(options) = field.options() {
        if !blank {
            let chosen = value.and_then(FieldValue::as_text).unwrap_or("");
            if !options.iter().any(|o| o == chosen) {
                failures.push(ValidationFailure {
                    field: field.name.clone(),
                    row,
                    message: format!("{} has an invalid selection", field.label),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldKind, FieldSchema};
    use crate::schema::SectionSchema;
    use crate::state::FormState;
    use pretty_assertions::assert_eq;

    fn select(name: &str, label: &str, options: &[&str]) -> FieldSchema {
        FieldSchema::new(
            name,
            label,
            FieldKind::Select {
                options: options.iter().map(|s| s.to_string()).collect(),
            },
        )
        .unwrap()
    }

    #[test]
    fn required_blank_title_fails() {
        // Schema: one required text field; snapshot holds the empty string.
        let schema = FormSchema::new(
            "News post",
            vec![FieldSchema::new("title", "title", FieldKind::Text)
                .unwrap()
                .required()],
        )
        .unwrap();
        let state = FormState::empty(&schema);

        let failures = validate(&schema, &state.snapshot());
        assert_eq!(
            failures,
            vec![ValidationFailure {
                field: "title".into(),
                row: None,
                message: "title is required".into(),
            }]
        );
    }

    #[test]
    fn populated_form_with_valid_select_passes() {
        let schema = FormSchema::new(
            "Contact",
            vec![
                FieldSchema::new("name", "Name", FieldKind::Text)
                    .unwrap()
                    .required(),
                select("category", "Category", &["Health", "Education"]).required(),
                FieldSchema::new("hours", "Hours", FieldKind::Number)
                    .unwrap()
                    .required(),
                FieldSchema::new("subscribed", "Subscribed", FieldKind::Checkbox).unwrap(),
            ],
        )
        .unwrap();
        let mut state = FormState::empty(&schema);
        state.set_value("name", FieldValue::Text("Ada".into()));
        state.set_value("category", FieldValue::Text("Health".into()));
        state.set_value("hours", FieldValue::Number(Some(3.0)));

        assert_eq!(validate(&schema, &state.snapshot()), vec![]);
    }

    #[test]
    fn select_value_outside_options_fails() {
        let schema = FormSchema::new(
            "Survey",
            vec![select("category", "category", &["Health", "Education"]).required()],
        )
        .unwrap();
        let mut state = FormState::empty(&schema);
        state.set_value("category", FieldValue::Text("Finance".into()));

        let failures = validate(&schema, &state.snapshot());
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].field, "category");
        assert_eq!(failures[0].message, "category has an invalid selection");
    }

    #[test]
    fn untouched_optional_select_passes() {
        let schema = FormSchema::new(
            "Survey",
            vec![select("category", "Category", &["Health", "Education"])],
        )
        .unwrap();
        let state = FormState::empty(&schema);
        assert_eq!(validate(&schema, &state.snapshot()), vec![]);
    }

    #[test]
    fn unchecked_checkbox_satisfies_required() {
        // Unchecked is a deliberate answer, not a missing one.
        let schema = FormSchema::new(
            "Consent",
            vec![FieldSchema::new("agreed", "Agreed", FieldKind::Checkbox)
                .unwrap()
                .required()],
        )
        .unwrap();
        let state = FormState::empty(&schema);
        assert_eq!(validate(&schema, &state.snapshot()), vec![]);
    }

    #[test]
    fn all_failing_fields_are_reported() {
        let schema = FormSchema::new(
            "Contact",
            vec![
                FieldSchema::new("name", "Name", FieldKind::Text)
                    .unwrap()
                    .required(),
                FieldSchema::new("email", "Email", FieldKind::Text)
                    .unwrap()
                    .required(),
                select("category", "Category", &["Health"]).required(),
            ],
        )
        .unwrap();
        let state = FormState::empty(&schema);

        let failures = validate(&schema, &state.snapshot());
        let fields: Vec<_> = failures.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "email", "category"]);
    }

    #[test]
    fn row_failures_carry_their_index() {
        let section = SectionSchema::new(
            "entries",
            vec![FieldSchema::new("activity", "Activity", FieldKind::Text)
                .unwrap()
                .required()],
        );
        let schema = FormSchema::with_section("Journal", vec![], section).unwrap();
        let mut state = FormState::empty(&schema);
        state.add_row(&schema);
        state.add_row(&schema);
        state.set_row_value(0, "activity", FieldValue::Text("Canvassing".into()));

        let failures = validate(&schema, &state.snapshot());
        assert_eq!(
            failures,
            vec![ValidationFailure {
                field: "activity".into(),
                row: Some(1),
                message: "Activity is required".into(),
            }]
        );
    }
}
