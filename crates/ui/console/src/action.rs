use forms::FormSnapshot;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use strum::Display;

/// Result of an in-flight submission, delivered back to the UI thread as
/// an action once the response arrives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SubmitOutcome {
    /// 2xx: parsed response body.
    Accepted(JsonValue),
    /// Anything else: the single user-facing message.
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Display, Deserialize)]
pub enum Action {
    Tick,
    Render,
    Resize(u16, u16),
    Quit,
    Update,
    Error(String),
    /// Validate the active form and, if clean, produce a snapshot.
    Submit,
    /// A validated snapshot ready to be serialized and sent.
    SnapshotReady(FormSnapshot),
    /// The submission continuation (ordered after its request).
    SubmissionFinished(SubmitOutcome),
    /// Show/hide the read-only record list for the active screen.
    ToggleRecords,
    RecordsLoaded(Vec<JsonValue>),
    /// A records fetch failed; closes the list (if still open) and surfaces
    /// the message. Deliberately not a toggle: the continuation may arrive
    /// after the user already closed the view.
    RecordsFailed(String),
}
