//! # Load Configuration
//!
//! Configuration types for video loading. All defaults are explicit and
//! documented here rather than scattered at call sites.

use crate::backends::DecoderType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Options controlling a single video load.
///
/// ## Width/height override
///
/// When [`LoadOptions::short_side_scale`] is set to a positive value, the
/// loader probes the source and computes output dimensions preserving aspect
/// ratio. The computed values **overwrite** any caller-supplied
/// [`DecodeParams::width`] / [`DecodeParams::height`]. This override is
/// intentional: the scaled size always takes precedence over manual sizes
/// when scaling is requested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Whether the constructed backend should decode the video stream.
    ///
    /// Default: true.
    #[serde(default = "default_decode_video")]
    pub decode_video: bool,

    /// Whether the constructed backend should decode the audio stream.
    ///
    /// Default: true.
    #[serde(default = "default_decode_audio")]
    pub decode_audio: bool,

    /// Which decoder backend to construct.
    ///
    /// Default: [`DecoderType::PyAv`].
    #[serde(default)]
    pub decoder: DecoderType,

    /// Target pixel length for the shorter spatial dimension.
    ///
    /// `None` (the default) and `Some(0)` both mean "no scaling": the source
    /// is not probed and forwarded params pass through unmodified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_side_scale: Option<u32>,

    /// Parameters forwarded to the constructed backend.
    #[serde(default)]
    pub params: DecodeParams,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            decode_video: default_decode_video(),
            decode_audio: default_decode_audio(),
            decoder: DecoderType::default(),
            short_side_scale: None,
            params: DecodeParams::default(),
        }
    }
}

impl LoadOptions {
    /// Set the decoder backend.
    pub fn with_decoder(mut self, decoder: DecoderType) -> Self {
        self.decoder = decoder;
        self
    }

    /// Set the decode-video flag.
    pub fn with_decode_video(mut self, decode_video: bool) -> Self {
        self.decode_video = decode_video;
        self
    }

    /// Set the decode-audio flag.
    pub fn with_decode_audio(mut self, decode_audio: bool) -> Self {
        self.decode_audio = decode_audio;
        self
    }

    /// Set the short-side scale target.
    pub fn with_short_side_scale(mut self, scale: u32) -> Self {
        self.short_side_scale = Some(scale);
        self
    }

    /// Set the forwarded decode parameters.
    pub fn with_params(mut self, params: DecodeParams) -> Self {
        self.params = params;
        self
    }

    /// The short-side scale that actually triggers probing and scaling.
    ///
    /// Zero is treated as "no scaling requested".
    pub fn effective_short_side_scale(&self) -> Option<u32> {
        self.short_side_scale.filter(|scale| *scale > 0)
    }
}

/// Parameters forwarded to the constructed backend.
///
/// `width` / `height` are the target output dimensions, if any. `extra`
/// carries open-ended named options that the loader passes through
/// unmodified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodeParams {
    /// Target output width in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    /// Target output height in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// Additional named options forwarded verbatim.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, serde_json::Value>,
}

impl DecodeParams {
    /// Set the target output dimensions.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Insert an additional forwarded option.
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

// ============================================================================
// Default Functions (for serde)
// ============================================================================

fn default_decode_video() -> bool {
    true
}

fn default_decode_audio() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let options = LoadOptions::default();
        assert!(options.decode_video);
        assert!(options.decode_audio);
        assert_eq!(options.decoder, DecoderType::PyAv);
        assert_eq!(options.short_side_scale, None);
        assert_eq!(options.params, DecodeParams::default());
    }

    #[test]
    fn zero_scale_is_no_scale() {
        let options = LoadOptions::default().with_short_side_scale(0);
        assert_eq!(options.effective_short_side_scale(), None);

        let options = LoadOptions::default().with_short_side_scale(320);
        assert_eq!(options.effective_short_side_scale(), Some(320));
    }

    #[test]
    fn builder_methods() {
        let options = LoadOptions::default()
            .with_decoder(DecoderType::Decord)
            .with_decode_video(false)
            .with_decode_audio(false)
            .with_short_side_scale(256)
            .with_params(DecodeParams::default().with_dimensions(640, 480));

        assert_eq!(options.decoder, DecoderType::Decord);
        assert!(!options.decode_video);
        assert!(!options.decode_audio);
        assert_eq!(options.short_side_scale, Some(256));
        assert_eq!(options.params.width, Some(640));
        assert_eq!(options.params.height, Some(480));
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: LoadOptions = serde_json::from_str("{}").unwrap();
        assert!(options.decode_video);
        assert!(options.decode_audio);
        assert_eq!(options.decoder, DecoderType::PyAv);

        let options: LoadOptions =
            serde_json::from_str(r#"{"decoder": "torchvision", "short_side_scale": 320}"#).unwrap();
        assert_eq!(options.decoder, DecoderType::TorchVision);
        assert_eq!(options.short_side_scale, Some(320));
    }

    #[test]
    fn extra_params_round_trip() {
        let params = DecodeParams::default()
            .with_extra("sample_rate", serde_json::json!(44100))
            .with_extra("thread_type", serde_json::json!("AUTO"));

        let json = serde_json::to_string(&params).unwrap();
        let back: DecodeParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
        assert_eq!(back.extra["sample_rate"], serde_json::json!(44100));
    }
}
