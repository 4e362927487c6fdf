/// Message shown when the new build is empty.
pub const NO_NEW_PARTS_MESSAGE: &str =
    "Please add at least one new component to your 'New PC' build to generate an upgrade guide.";

/// Single user-facing reason for any failed generation call.
pub const GENERATION_FAILED_MESSAGE: &str =
    "Failed to generate tutorial. The model may have returned an invalid format or an error occurred.";

pub const BUSY_MESSAGE: &str = "A tutorial is already being generated.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuideError {
    #[error("no new parts specified")]
    NoNewParts,

    #[error("a tutorial request is already in flight")]
    Busy,

    /// Transport or service failure.
    #[error("generation request failed: {0}")]
    Request(String),

    /// The service answered but the payload is not a valid tutorial.
    #[error("generation returned an invalid format: {0}")]
    Format(String),
}

impl GuideError {
    /// Text for display. Request and format failures share one message;
    /// the distinction is kept for logs only.
    pub fn user_message(&self) -> &'static str {
        match self {
            GuideError::NoNewParts => NO_NEW_PARTS_MESSAGE,
            GuideError::Busy => BUSY_MESSAGE,
            GuideError::Request(_) | GuideError::Format(_) => GENERATION_FAILED_MESSAGE,
        }
    }
}
