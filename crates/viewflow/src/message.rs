//! Remote Call Failures
//!
//! Shared failure shape for every fetch and mutation, with the
//! user-message fallback chain in one testable place.

use std::fmt;

/// Shown when neither the server nor the transport produced a message.
pub const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

/// Failure from a remote call.
///
/// `server_message` is the message the backend put in the error body,
/// `message` is the generic transport/status description.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApiFailure {
    pub server_message: Option<String>,
    pub message: Option<String>,
}

impl ApiFailure {
    /// Failure carrying a server-provided message.
    pub fn server(msg: impl Into<String>) -> Self {
        Self {
            server_message: Some(msg.into()),
            message: None,
        }
    }

    /// Transport-level failure (network error, decode error).
    pub fn transport(msg: impl Into<String>) -> Self {
        Self {
            server_message: None,
            message: Some(msg.into()),
        }
    }

    /// Message to surface to the user.
    ///
    /// Priority: server message, then generic message, then
    /// [`FALLBACK_MESSAGE`]. Blank strings count as absent.
    pub fn user_message(&self) -> String {
        non_blank(self.server_message.as_deref())
            .or_else(|| non_blank(self.message.as_deref()))
            .unwrap_or(FALLBACK_MESSAGE)
            .to_string()
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user_message())
    }
}

impl std::error::Error for ApiFailure {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_wins() {
        let err = ApiFailure {
            server_message: Some("Title already exists".into()),
            message: Some("request failed with status 409".into()),
        };
        assert_eq!(err.user_message(), "Title already exists");
    }

    #[test]
    fn test_generic_message_second() {
        let err = ApiFailure::transport("connection refused");
        assert_eq!(err.user_message(), "connection refused");
    }

    #[test]
    fn test_literal_fallback_last() {
        assert_eq!(ApiFailure::default().user_message(), FALLBACK_MESSAGE);
        // Blank strings are not messages
        let err = ApiFailure {
            server_message: Some("  ".into()),
            message: Some(String::new()),
        };
        assert_eq!(err.user_message(), FALLBACK_MESSAGE);
    }
}
