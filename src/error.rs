//! # Video Loading Error Types
//!
//! Error types for backend selection, loading and clip decoding.

use thiserror::Error;

/// Errors that can occur while selecting a backend, loading a video or
/// decoding clips from it.
#[derive(Error, Debug)]
pub enum VideoError {
    // ========================================================================
    // Selection Errors
    // ========================================================================
    /// Decoder token is not one of the supported backends.
    #[error("Unsupported decoder backend: {0}")]
    UnsupportedDecoder(String),

    // ========================================================================
    // Source Errors
    // ========================================================================
    /// Failed to open or read the video source.
    #[error("Failed to open video source: {0}")]
    SourceError(String),

    /// The source reported a zero width or height when short-side scaling
    /// was requested.
    #[error("Invalid video source at \"{path}\"")]
    InvalidSource {
        /// The path whose probe reported invalid dimensions.
        path: String,
    },

    /// Dimension probing failed or no prober is configured.
    #[error("Dimension probe failed: {0}")]
    ProbeError(String),

    // ========================================================================
    // Format/Codec Errors
    // ========================================================================
    /// Container format is not recognized or cannot be parsed.
    #[error("Unsupported or invalid video format: {0}")]
    InvalidFormat(String),

    /// The requested decode operation is not supported by this build or
    /// backend.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    // ========================================================================
    // Decoding Errors
    // ========================================================================
    /// Error occurred while decoding a clip.
    #[error("Decoding error: {0}")]
    DecodingError(String),

    /// Clip range is invalid (end precedes start).
    #[error("Invalid clip range: start {start:?} is after end {end:?}")]
    InvalidClipRange {
        /// Requested clip start.
        start: std::time::Duration,
        /// Requested clip end.
        end: std::time::Duration,
    },

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl VideoError {
    /// Returns `true` if this error originated from opening or probing the
    /// source rather than from decoding.
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            VideoError::SourceError(_)
                | VideoError::InvalidSource { .. }
                | VideoError::ProbeError(_)
                | VideoError::IoError(_)
        )
    }

    /// Returns `true` if this error is related to container or codec
    /// support.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            VideoError::InvalidFormat(_) | VideoError::Unsupported(_)
        )
    }
}

/// Result type for video loading operations.
pub type Result<T> = std::result::Result<T, VideoError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn error_classification() {
        assert!(VideoError::SourceError("gone".into()).is_source_error());
        assert!(VideoError::InvalidSource { path: "/a.mp4".into() }.is_source_error());
        assert!(!VideoError::DecodingError("bad packet".into()).is_source_error());

        assert!(VideoError::InvalidFormat("not a container".into()).is_format_error());
        assert!(!VideoError::UnsupportedDecoder("opencv".into()).is_format_error());
    }

    #[test]
    fn invalid_source_display_includes_path() {
        let err = VideoError::InvalidSource {
            path: "/videos/broken.mp4".into(),
        };
        assert_eq!(err.to_string(), "Invalid video source at \"/videos/broken.mp4\"");
    }

    #[test]
    fn clip_range_display() {
        let err = VideoError::InvalidClipRange {
            start: Duration::from_secs(10),
            end: Duration::from_secs(5),
        };
        assert!(err.to_string().contains("10s"));
        assert!(err.to_string().contains("5s"));
    }
}
