//! Schema-driven form engine.
//!
//! A form is declared once as a [`FormSchema`] (ordered fields, optionally a
//! repeating journal-style section), edited through a [`FormState`], checked
//! by [`validate`] against an immutable [`FormSnapshot`], and handed to a
//! submission adapter for the wire.
//!
//! The crate is pure: no I/O, no async, no rendering. Every operation is
//! synchronous and in-memory so a UI can call it from its event handlers
//! without ever observing a half-updated form.

pub mod error;
pub mod field;
pub mod schema;
pub mod state;
pub mod validate;
pub mod value;

pub use error::SchemaError;
pub use field::{FieldKind, FieldSchema};
pub use schema::{FormSchema, SectionSchema};
pub use state::{FormSnapshot, FormState, Notice, NoticeKind};
pub use validate::{validate, ValidationFailure};
pub use value::{FieldValue, FileRef};
