use serde::{Deserialize, Serialize};

/// Error payload reported by the playback backend when a track fails
/// mid-stream. Both fields are free text and either may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaybackFault {
    pub message: Option<String>,
    pub cause: Option<String>,
}

/// What kind of failure a playback fault represents, which decides whether
/// the error-recovery resolve is worth attempting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// The source refused access (age gate, login wall). An alternative
    /// upload often plays fine.
    AccessRestricted,
    /// The stream was found but could not be decoded. A different encoding
    /// of the same song usually works.
    Decoding,
    /// Anything else; skip the track instead of retrying.
    Other,
}

impl FaultKind {
    pub fn is_recoverable(self) -> bool {
        !matches!(self, FaultKind::Other)
    }
}

const ACCESS_MARKERS: [&str; 2] = ["Please sign in", "Sign in to confirm"];
const DECODING_CAUSE_MARKERS: [&str; 2] = ["AacDecoder", "Expected decoding to halt"];
const DECODING_MESSAGE_MARKERS: [&str; 2] = ["decoding", "Something went wrong when decoding"];

impl PlaybackFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            cause: None,
        }
    }

    /// Classify the fault from the backend's message and cause strings.
    /// Access walls are checked before decoder failures; an access error
    /// sometimes drags decoder noise along in its cause chain.
    pub fn kind(&self) -> FaultKind {
        if self.matches(&ACCESS_MARKERS, &ACCESS_MARKERS) {
            FaultKind::AccessRestricted
        } else if self.matches(&DECODING_MESSAGE_MARKERS, &DECODING_CAUSE_MARKERS) {
            FaultKind::Decoding
        } else {
            FaultKind::Other
        }
    }

    fn matches(&self, message_markers: &[&str], cause_markers: &[&str]) -> bool {
        let message_hit = self
            .message
            .as_deref()
            .is_some_and(|m| message_markers.iter().any(|marker| m.contains(marker)));
        let cause_hit = self
            .cause
            .as_deref()
            .is_some_and(|c| cause_markers.iter().any(|marker| c.contains(marker)));
        message_hit || cause_hit
    }
}
