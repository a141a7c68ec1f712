use forms::{FieldKind, FieldSchema, FormSchema, SchemaError, SectionSchema};

use crate::cli::ScreenKind;

/// One admin screen: a schema plus the endpoint it posts to and lists from.
pub struct Screen {
    pub schema: FormSchema,
    pub endpoint: &'static str,
}

pub fn screen_for(kind: ScreenKind) -> Result<Screen, SchemaError> {
    match kind {
        ScreenKind::Contact => contact_screen(),
        ScreenKind::Journal => journal_screen(),
        ScreenKind::News => news_screen(),
    }
}

/// Contact / survey intake form posted to `/contacts`.
pub fn contact_screen() -> Result<Screen, SchemaError> {
    let schema = FormSchema::new(
        "Contact intake",
        vec![
            FieldSchema::new("full_name", "Full name", FieldKind::Text)?.required(),
            FieldSchema::new("phone", "Phone", FieldKind::Phone)?
                .help("Reachable daytime number"),
            FieldSchema::new(
                "category",
                "Category",
                FieldKind::Select {
                    options: vec![
                        "Health".into(),
                        "Education".into(),
                        "Environment".into(),
                        "Other".into(),
                    ],
                },
            )?
            .required(),
            FieldSchema::new("message", "Message", FieldKind::TextArea)?.required(),
            FieldSchema::new("follow_up", "Needs follow-up", FieldKind::Checkbox)?,
        ],
    )?
    .description("Record an incoming contact or survey response.");
    Ok(Screen {
        schema,
        endpoint: "/contacts",
    })
}

/// Volunteer journal: fixed header plus repeating daily entries, posted to
/// `/volunteers/journal`.
pub fn journal_screen() -> Result<Screen, SchemaError> {
    let header = vec![
        FieldSchema::new("volunteer", "Volunteer", FieldKind::Text)?.required(),
        FieldSchema::new("month", "Month", FieldKind::Text)?
            .help("Reporting month, e.g. 2026-08")
            .required(),
    ];
    let section = SectionSchema::new(
        "entries",
        vec![
            FieldSchema::new("date", "Date", FieldKind::Date)?.required(),
            FieldSchema::new(
                "activity",
                "Activity",
                FieldKind::Select {
                    options: vec![
                        "Canvassing".into(),
                        "Phone bank".into(),
                        "Event support".into(),
                        "Office".into(),
                    ],
                },
            )?
            .required(),
            FieldSchema::new("hours", "Hours", FieldKind::Number)?.required(),
            FieldSchema::new("notes", "Notes", FieldKind::TextArea)?,
        ],
    );
    let schema = FormSchema::with_section("Volunteer journal", header, section)?
        .description("Log volunteer activity for the month. Entries are append-only.");
    Ok(Screen {
        schema,
        endpoint: "/volunteers/journal",
    })
}

/// News post with an optional attachment, posted to `/news`.
pub fn news_screen() -> Result<Screen, SchemaError> {
    let schema = FormSchema::new(
        "News post",
        vec![
            FieldSchema::new("title", "Title", FieldKind::Text)?.required(),
            FieldSchema::new("published_on", "Publish date", FieldKind::Date)?,
            FieldSchema::new(
                "category",
                "Category",
                FieldKind::Select {
                    options: vec!["Announcement".into(), "Campaign".into(), "Press".into()],
                },
            )?
            .required(),
            FieldSchema::new("body", "Body", FieldKind::TextArea)?.required(),
            FieldSchema::new("attachment", "Attachment", FieldKind::File)?
                .help("Path to an image or document to upload"),
        ],
    )?
    .description("Publish a news item to the public site.");
    Ok(Screen {
        schema,
        endpoint: "/news",
    })
}
