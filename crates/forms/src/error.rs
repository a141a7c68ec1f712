use thiserror::Error;

/// A malformed schema detected at authoring time.
///
/// These surface to the form author while a screen is being built, never to
/// an end user: a schema that fails construction cannot be rendered or
/// submitted at all.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// A `Select` field was declared with no options to choose from.
    #[error("select field '{field}' has no options")]
    EmptySelect { field: String },

    /// Two fields in one schema share the same wire name.
    #[error("duplicate field name '{name}' in schema")]
    DuplicateField { name: String },

    /// A `File` field was declared inside a repeating section. Rows travel
    /// as one JSON-encoded value on the wire, which cannot carry file
    /// bytes, so the combination is rejected up front.
    #[error("file field '{field}' is not allowed in a repeating section")]
    FileInSection { field: String },
}
