use thiserror::Error;

/// A submission attempt that did not end in a 2xx response.
///
/// The attempted form state is never touched on failure; the caller keeps
/// it so the user can correct and resubmit without re-entering everything.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Transport-level failure (connect, TLS, timeout, malformed response).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A file field referenced a path that could not be read at send time.
    #[error("could not read attachment: {0}")]
    Attachment(#[from] std::io::Error),

    /// The backend answered with a non-2xx status. `message` is the
    /// server-provided error verbatim when one was present, otherwise a
    /// generic line.
    #[error("{message}")]
    Rejected { status: u16, message: String },
}

impl SubmitError {
    /// The single user-facing line a view shows for this error.
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
