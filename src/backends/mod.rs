//! # Decoder Backend Selection
//!
//! A closed enumeration of decoder backends mapped to a constructor table.
//! Selection is a pure mapping: unknown tokens fail eagerly at parse time,
//! before any file I/O.

mod audio;
mod decord;
mod pyav;
mod torchvision;

#[cfg(feature = "ffmpeg")]
mod ffmpeg;

pub use decord::DecordVideo;
pub use pyav::PyAvVideo;
pub use torchvision::TorchVisionVideo;

use crate::config::DecodeParams;
use crate::error::{Result, VideoError};
use crate::video::Video;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported decoder backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecoderType {
    /// Selective demux-and-decode, seeking to the clip start.
    #[default]
    PyAv,
    /// Sequential full decode, slicing by timestamp.
    TorchVision,
    /// Keyframe-aligned random access decode.
    Decord,
}

impl DecoderType {
    /// All supported backends, in enumeration order.
    pub const ALL: [DecoderType; 3] =
        [DecoderType::PyAv, DecoderType::TorchVision, DecoderType::Decord];

    /// The token naming this backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            DecoderType::PyAv => "pyav",
            DecoderType::TorchVision => "torchvision",
            DecoderType::Decord => "decord",
        }
    }

    /// The constructor for this backend.
    pub(crate) fn constructor(self) -> fn(VideoInput) -> Result<Box<dyn Video>> {
        match self {
            DecoderType::PyAv => PyAvVideo::boxed,
            DecoderType::TorchVision => TorchVisionVideo::boxed,
            DecoderType::Decord => DecordVideo::boxed,
        }
    }
}

impl FromStr for DecoderType {
    type Err = VideoError;

    fn from_str(token: &str) -> Result<Self> {
        match token {
            "pyav" => Ok(DecoderType::PyAv),
            "torchvision" => Ok(DecoderType::TorchVision),
            "decord" => Ok(DecoderType::Decord),
            other => Err(VideoError::UnsupportedDecoder(other.to_string())),
        }
    }
}

impl fmt::Display for DecoderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a backend constructor receives from the loader.
#[derive(Debug, Clone)]
pub struct VideoInput {
    /// The encoded video bytes. The backend takes ownership.
    pub data: Bytes,
    /// Display name (the source's base file name).
    pub video_name: String,
    /// Whether to decode the video stream.
    pub decode_video: bool,
    /// Whether to decode the audio stream.
    pub decode_audio: bool,
    /// Forwarded parameters, including computed width/height when short-side
    /// scaling was requested.
    pub params: DecodeParams,
}

/// Validate a clip range before decoding.
pub(crate) fn check_clip_range(
    start: std::time::Duration,
    end: std::time::Duration,
) -> Result<()> {
    if end < start {
        return Err(VideoError::InvalidClipRange { start, end });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_tokens_parse_to_distinct_backends() {
        assert_eq!("pyav".parse::<DecoderType>().unwrap(), DecoderType::PyAv);
        assert_eq!(
            "torchvision".parse::<DecoderType>().unwrap(),
            DecoderType::TorchVision
        );
        assert_eq!("decord".parse::<DecoderType>().unwrap(), DecoderType::Decord);
    }

    #[test]
    fn unknown_tokens_are_rejected() {
        for token in ["opencv", "PYAV", "ffmpeg", ""] {
            let err = token.parse::<DecoderType>().unwrap_err();
            assert!(matches!(err, VideoError::UnsupportedDecoder(_)), "{token}");
        }
    }

    #[test]
    fn default_backend_is_first_enumerated() {
        assert_eq!(DecoderType::default(), DecoderType::PyAv);
        assert_eq!(DecoderType::ALL[0], DecoderType::default());
    }

    #[test]
    fn tokens_round_trip_through_display() {
        for backend in DecoderType::ALL {
            assert_eq!(backend.as_str().parse::<DecoderType>().unwrap(), backend);
            assert_eq!(backend.to_string(), backend.as_str());
        }
    }

    #[test]
    fn tokens_round_trip_through_serde() {
        for backend in DecoderType::ALL {
            let json = serde_json::to_string(&backend).unwrap();
            assert_eq!(json, format!("\"{}\"", backend.as_str()));
            let back: DecoderType = serde_json::from_str(&json).unwrap();
            assert_eq!(back, backend);
        }
    }

    #[test]
    fn constructor_table_builds_matching_backend() {
        for backend in DecoderType::ALL {
            let input = VideoInput {
                data: Bytes::from_static(b"not a real container"),
                video_name: "clip.mp4".to_string(),
                decode_video: false,
                decode_audio: false,
                params: DecodeParams::default(),
            };
            let video = (backend.constructor())(input).unwrap();
            assert_eq!(video.backend(), backend);
            assert_eq!(video.name(), "clip.mp4");
        }
    }

    #[test]
    fn clip_range_validation() {
        use std::time::Duration;

        assert!(check_clip_range(Duration::from_secs(1), Duration::from_secs(2)).is_ok());
        assert!(check_clip_range(Duration::from_secs(2), Duration::from_secs(2)).is_ok());
        assert!(matches!(
            check_clip_range(Duration::from_secs(3), Duration::from_secs(2)),
            Err(VideoError::InvalidClipRange { .. })
        ));
    }
}
