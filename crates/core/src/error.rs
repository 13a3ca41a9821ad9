//! Error types for the leafscan-core library.
//!
//! This module provides granular error variants for different failure modes,
//! enabling precise error handling and user-friendly error messages.

use thiserror::Error;

/// Errors that can occur within the leafscan-core library.
///
/// Each variant represents a specific failure mode with contextual information
/// to help diagnose and handle errors appropriately.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (bad server URL, invalid values).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Analyze was triggered with no image or URL selected.
    #[error("No image or URL selected")]
    NoInputSelected,

    /// A string passed as an image URL is not a valid http(s) URL.
    #[error("Invalid image URL: {0}")]
    InvalidUrl(String),

    /// Reading or decoding a local image file failed.
    #[error("Cannot read image: {0}")]
    ImageRead(String),

    /// The server answered with a non-success status code.
    #[error("Server returned HTTP {0}")]
    Http(u16),

    /// The server could not be reached, or its response was malformed.
    #[error("{0}")]
    Transport(String),

    /// UI-related errors (window creation, event loop).
    #[error("UI error: {0}")]
    Ui(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an image-read error with the given message.
    pub fn image(msg: impl Into<String>) -> Self {
        Self::ImageRead(msg.into())
    }

    /// Creates a transport error with the given message.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Creates a UI error with the given message.
    pub fn ui(msg: impl Into<String>) -> Self {
        Self::Ui(msg.into())
    }

    /// Maps the error to the message shown in place of the treatment text.
    ///
    /// Status codes use a fixed table; everything else renders its
    /// `Display` text. None of these messages trigger a retry.
    pub fn user_message(&self) -> String {
        match self {
            Self::Http(404) => "endpoint not found, check server routes".to_string(),
            Self::Http(500) => "server-side failure".to_string(),
            Self::Http(code) => format!("server error {code}"),
            Self::NoInputSelected => {
                "Please select an image or paste an image URL first".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// A convenient alias for Result with [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_404_points_at_server_routes() {
        let msg = AppError::Http(404).user_message();
        assert!(msg.contains("route"), "got: {msg}");
    }

    #[test]
    fn status_500_names_server_side_failure() {
        let msg = AppError::Http(500).user_message();
        assert!(msg.contains("server-side failure"), "got: {msg}");
    }

    #[test]
    fn other_statuses_carry_the_literal_code() {
        assert_eq!(AppError::Http(503).user_message(), "server error 503");
        assert_eq!(AppError::Http(418).user_message(), "server error 418");
    }

    #[test]
    fn transport_errors_render_their_description() {
        let err = AppError::transport("cannot reach server at http://10.0.0.1:5000");
        assert_eq!(
            err.user_message(),
            "cannot reach server at http://10.0.0.1:5000"
        );
    }
}
