//! # Dimension Probing and Short-Side Scaling
//!
//! Probes a source for its native frame dimensions and computes
//! aspect-ratio-preserving output sizes.

use crate::error::Result;

#[cfg(feature = "ffmpeg")]
use crate::error::VideoError;

/// Reports the native frame dimensions of a video source.
///
/// Probers open the path directly rather than the in-memory buffer, so they
/// can rely on demuxer-level header parsing. Only consulted when short-side
/// scaling is requested.
pub trait DimensionProber: Send + Sync {
    /// Probe the source and return `(width, height)` in pixels.
    ///
    /// Implementations report whatever the container header claims; the
    /// loader is responsible for rejecting zero dimensions.
    fn dimensions(&self, path: &str) -> Result<(u32, u32)>;
}

/// Compute output dimensions for a short-side scale target, preserving
/// aspect ratio.
///
/// The shorter native dimension is set to `target`; the other dimension is
/// scaled by the same ratio, truncated toward zero. When `width == height`,
/// height is treated as the shorter dimension.
///
/// Both native dimensions must be positive; the loader validates this before
/// calling.
pub fn short_side_dimensions(width: u32, height: u32, target: u32) -> (u32, u32) {
    debug_assert!(width > 0 && height > 0);
    if width < height {
        let scaled = u64::from(target) * u64::from(height) / u64::from(width);
        (target, scaled as u32)
    } else {
        let scaled = u64::from(target) * u64::from(width) / u64::from(height);
        (scaled as u32, target)
    }
}

/// FFmpeg-backed dimension prober.
///
/// Opens the container via the demuxer and reports the best video stream's
/// coded dimensions.
#[cfg(feature = "ffmpeg")]
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegProber;

#[cfg(feature = "ffmpeg")]
impl DimensionProber for FfmpegProber {
    fn dimensions(&self, path: &str) -> Result<(u32, u32)> {
        use ffmpeg_next as ffmpeg;

        ffmpeg::init().map_err(|e| VideoError::ProbeError(format!("FFmpeg init failed: {e}")))?;

        let input = ffmpeg::format::input(&path)
            .map_err(|e| VideoError::ProbeError(format!("Failed to open {path}: {e}")))?;

        let stream = input
            .streams()
            .best(ffmpeg::media::Type::Video)
            .ok_or_else(|| VideoError::ProbeError(format!("No video stream in {path}")))?;

        let decoder = ffmpeg::codec::context::Context::from_parameters(stream.parameters())
            .map_err(|e| VideoError::ProbeError(format!("Failed to read codec parameters: {e}")))?
            .decoder()
            .video()
            .map_err(|e| VideoError::ProbeError(format!("Not a video codec: {e}")))?;

        Ok((decoder.width(), decoder.height()))
    }
}

/// Prober used when no real prober is configured.
///
/// Fails with a message naming the feature flag; only ever reached when a
/// load requests short-side scaling.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct UnconfiguredProber;

impl DimensionProber for UnconfiguredProber {
    fn dimensions(&self, _path: &str) -> Result<(u32, u32)> {
        Err(crate::error::VideoError::ProbeError(
            "No dimension prober configured. Enable the 'ffmpeg' feature or supply one with \
             VideoLoader::with_prober"
                .to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landscape_short_side_is_height() {
        assert_eq!(short_side_dimensions(1920, 1080, 320), (320 * 1920 / 1080, 320));
        assert_eq!(short_side_dimensions(1920, 1080, 320), (568, 320));
    }

    #[test]
    fn portrait_short_side_is_width() {
        assert_eq!(short_side_dimensions(1080, 1920, 320), (320, 568));
    }

    #[test]
    fn square_treats_height_as_shorter() {
        assert_eq!(short_side_dimensions(512, 512, 320), (320, 320));
    }

    #[test]
    fn scaled_dimension_truncates_toward_zero() {
        // 854 * 320 / 480 = 569.33..
        assert_eq!(short_side_dimensions(854, 480, 320), (569, 320));
        // 320 * 500 / 300 = 533.33..
        assert_eq!(short_side_dimensions(300, 500, 320), (320, 533));
    }

    #[test]
    fn unconfigured_prober_names_feature() {
        let err = UnconfiguredProber.dimensions("/a.mp4").unwrap_err();
        assert!(err.to_string().contains("ffmpeg"));
    }
}
