use forms::{FieldKind, FieldSchema, FieldValue, FileRef, FormSchema, FormSnapshot};
use serde_json::{json, Map as JsonMap, Value as JsonValue};

/// Outbound request body built from a validated snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(JsonValue),
    Multipart(Vec<PartSpec>),
}

/// One part of a multipart body. Pure description: file bytes are read by
/// the client at send time, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct PartSpec {
    pub name: String,
    pub kind: PartKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PartKind {
    Text(String),
    File(FileRef),
}

/// Build the wire body for a snapshot.
///
/// Multipart if and only if at least one field value carries a file
/// reference; otherwise a JSON object keyed verbatim by field name, in
/// schema order. The repeating section serializes as an ordered array of
/// per-row objects under the section's key, alongside the header fields.
pub fn build_payload(schema: &FormSchema, snapshot: &FormSnapshot) -> Payload {
    // Only header fields can hold files; schema construction rejects a
    // File field inside the repeating section.
    let has_file = snapshot.values.values().any(FieldValue::is_file);

    if has_file {
        Payload::Multipart(build_parts(schema, snapshot))
    } else {
        Payload::Json(build_json(schema, snapshot))
    }
}

fn build_json(schema: &FormSchema, snapshot: &FormSnapshot) -> JsonValue {
    let mut map = JsonMap::new();
    for field in &schema.fields {
        map.insert(
            field.name.clone(),
            json_value(field, snapshot.values.get(&field.name)),
        );
    }
    if let Some(section) = &schema.section {
        let rows: Vec<JsonValue> = snapshot
            .rows
            .iter()
            .map(|row| {
                let mut obj = JsonMap::new();
                for field in &section.fields {
                    obj.insert(field.name.clone(), json_value(field, row.get(&field.name)));
                }
                JsonValue::Object(obj)
            })
            .collect();
        map.insert(section.key.clone(), JsonValue::Array(rows));
    }
    JsonValue::Object(map)
}

fn json_value(field: &FieldSchema, value: Option<&FieldValue>) -> JsonValue {
    match value {
        Some(FieldValue::Text(s)) => JsonValue::String(s.clone()),
        Some(FieldValue::Number(Some(n))) => json!(n),
        Some(FieldValue::Number(None)) => JsonValue::Null,
        Some(FieldValue::Bool(b)) => JsonValue::Bool(*b),
        // A present file only occurs on the multipart path; JSON sees the
        // unset file field as null.
        Some(FieldValue::File(_)) => JsonValue::Null,
        None => match &field.kind {
            FieldKind::Checkbox => JsonValue::Bool(false),
            FieldKind::Number | FieldKind::File => JsonValue::Null,
            _ => JsonValue::String(String::new()),
        },
    }
}

fn build_parts(schema: &FormSchema, snapshot: &FormSnapshot) -> Vec<PartSpec> {
    let mut parts = Vec::new();
    for field in &schema.fields {
        match snapshot.values.get(&field.name) {
            Some(FieldValue::File(Some(file))) => parts.push(PartSpec {
                name: field.name.clone(),
                kind: PartKind::File(file.clone()),
            }),
            Some(FieldValue::File(None)) | None if matches!(field.kind, FieldKind::File) => {
                // unset attachment: omitted from the body
            }
            value => parts.push(PartSpec {
                name: field.name.clone(),
                kind: PartKind::Text(text_value(field, value)),
            }),
        }
    }
    if let Some(section) = &schema.section {
        // Rows travel as one JSON-encoded part under the section key;
        // section schemas cannot declare file fields.
        let rows: Vec<JsonValue> = snapshot
            .rows
            .iter()
            .map(|row| {
                let mut obj = JsonMap::new();
                for field in &section.fields {
                    obj.insert(field.name.clone(), json_value(field, row.get(&field.name)));
                }
                JsonValue::Object(obj)
            })
            .collect();
        parts.push(PartSpec {
            name: section.key.clone(),
            kind: PartKind::Text(JsonValue::Array(rows).to_string()),
        });
    }
    parts
}

fn text_value(field: &FieldSchema, value: Option<&FieldValue>) -> String {
    match value {
        Some(FieldValue::Text(s)) => s.clone(),
        Some(FieldValue::Number(Some(n))) => n.to_string(),
        Some(FieldValue::Number(None)) => String::new(),
        Some(FieldValue::Bool(b)) => b.to_string(),
        Some(FieldValue::File(_)) => String::new(),
        None => match &field.kind {
            FieldKind::Checkbox => "false".to_string(),
            _ => String::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forms::{FieldSchema, FormState, SectionSchema};
    use pretty_assertions::assert_eq;

    fn contact_schema() -> FormSchema {
        FormSchema::new(
            "Contact",
            vec![
                FieldSchema::new("full_name", "Full name", FieldKind::Text).unwrap(),
                FieldSchema::new("age", "Age", FieldKind::Number).unwrap(),
                FieldSchema::new("subscribed", "Subscribed", FieldKind::Checkbox).unwrap(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn flat_snapshot_without_files_builds_json() {
        let schema = contact_schema();
        let mut state = FormState::empty(&schema);
        state.set_value("full_name", FieldValue::Text("Ada Lovelace".into()));
        state.set_value("age", FieldValue::Number(Some(36.0)));
        state.set_value("subscribed", FieldValue::Bool(true));

        let payload = build_payload(&schema, &state.snapshot());
        assert_eq!(
            payload,
            Payload::Json(json!({
                "full_name": "Ada Lovelace",
                "age": 36.0,
                "subscribed": true,
            }))
        );
    }

    #[test]
    fn field_names_pass_through_verbatim() {
        // No camel/snake rewriting: whatever the schema says is what is sent.
        let schema = FormSchema::new(
            "Mixed",
            vec![
                FieldSchema::new("displayName", "Display name", FieldKind::Text).unwrap(),
                FieldSchema::new("contact_phone", "Phone", FieldKind::Phone).unwrap(),
            ],
        )
        .unwrap();
        let state = FormState::empty(&schema);

        let Payload::Json(JsonValue::Object(map)) = build_payload(&schema, &state.snapshot())
        else {
            panic!("expected JSON payload");
        };
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["displayName", "contact_phone"]);
    }

    #[test]
    fn file_value_switches_to_multipart() {
        let schema = FormSchema::new(
            "News post",
            vec![
                FieldSchema::new("title", "Title", FieldKind::Text).unwrap(),
                FieldSchema::new("attachment", "Attachment", FieldKind::File).unwrap(),
            ],
        )
        .unwrap();
        let mut state = FormState::empty(&schema);
        state.set_value("title", FieldValue::Text("Launch".into()));

        // No file chosen yet: still JSON, attachment omitted as null.
        let payload = build_payload(&schema, &state.snapshot());
        assert_eq!(
            payload,
            Payload::Json(json!({ "title": "Launch", "attachment": null }))
        );

        // File chosen: multipart with a text part and a file part.
        state.set_value(
            "attachment",
            FieldValue::File(Some(FileRef::from_path("/tmp/banner.png"))),
        );
        let Payload::Multipart(parts) = build_payload(&schema, &state.snapshot()) else {
            panic!("expected multipart payload");
        };
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].name, "title");
        assert_eq!(parts[0].kind, PartKind::Text("Launch".into()));
        assert_eq!(parts[1].name, "attachment");
        assert_eq!(
            parts[1].kind,
            PartKind::File(FileRef::from_path("/tmp/banner.png"))
        );
    }

    #[test]
    fn header_file_with_rows_keeps_the_file_part() {
        // Attachments are header-only (schema construction enforces it), so
        // a multipart body always carries the real file part, never a
        // flattened placeholder inside the rows encoding.
        let section = SectionSchema::new(
            "expenses",
            vec![FieldSchema::new("amount", "Amount", FieldKind::Number).unwrap()],
        );
        let schema = FormSchema::with_section(
            "Expense report",
            vec![
                FieldSchema::new("month", "Month", FieldKind::Text).unwrap(),
                FieldSchema::new("receipt", "Receipt", FieldKind::File).unwrap(),
            ],
            section,
        )
        .unwrap();
        let mut state = FormState::empty(&schema);
        state.set_value("month", FieldValue::Text("2026-08".into()));
        state.set_value(
            "receipt",
            FieldValue::File(Some(FileRef::from_path("/tmp/receipt.pdf"))),
        );
        state.add_row(&schema);
        state.set_row_value(0, "amount", FieldValue::Number(Some(12.5)));

        let Payload::Multipart(parts) = build_payload(&schema, &state.snapshot()) else {
            panic!("expected multipart payload");
        };
        assert_eq!(parts.len(), 3);
        assert_eq!(
            parts[1].kind,
            PartKind::File(FileRef::from_path("/tmp/receipt.pdf"))
        );
        assert_eq!(parts[2].name, "expenses");
        assert_eq!(
            parts[2].kind,
            PartKind::Text(r#"[{"amount":12.5}]"#.to_string())
        );
    }

    #[test]
    fn rows_serialize_under_the_section_key() {
        let section = SectionSchema::new(
            "entries",
            vec![
                FieldSchema::new("date", "Date", FieldKind::Date).unwrap(),
                FieldSchema::new("hours", "Hours", FieldKind::Number).unwrap(),
            ],
        );
        let schema = FormSchema::with_section(
            "Journal",
            vec![FieldSchema::new("volunteer", "Volunteer", FieldKind::Text).unwrap()],
            section,
        )
        .unwrap();
        let mut state = FormState::empty(&schema);
        state.set_value("volunteer", FieldValue::Text("Ada".into()));
        state.add_row(&schema);
        state.set_row_value(0, "date", FieldValue::Text("2026-03-01".into()));
        state.set_row_value(0, "hours", FieldValue::Number(Some(4.0)));
        state.add_row(&schema);
        state.set_row_value(1, "date", FieldValue::Text("2026-03-02".into()));

        let payload = build_payload(&schema, &state.snapshot());
        assert_eq!(
            payload,
            Payload::Json(json!({
                "volunteer": "Ada",
                "entries": [
                    { "date": "2026-03-01", "hours": 4.0 },
                    { "date": "2026-03-02", "hours": null },
                ],
            }))
        );
    }
}
