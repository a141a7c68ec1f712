//! Submission adapter for the form engine.
//!
//! [`payload`] turns a validated [`forms::FormSnapshot`] into a wire body
//! (JSON, or multipart when a file is attached); [`client`] issues exactly
//! one HTTP request per submit action against the remote REST backend.

pub mod client;
pub mod error;
pub mod payload;

pub use client::{Client, SubmitConfig};
pub use error::SubmitError;
pub use payload::{build_payload, PartKind, PartSpec, Payload};
