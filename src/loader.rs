//! # Video Loader
//!
//! Fetches a video's bytes through a path resolver, optionally computes a
//! short-side-scaled output size, and constructs the selected backend.

use crate::backends::VideoInput;
use crate::config::LoadOptions;
use crate::error::{Result, VideoError};
use crate::probe::{short_side_dimensions, DimensionProber};
use crate::resolver::{read_to_bytes, video_name, LocalPathResolver, PathResolver};
use crate::video::Video;
use std::sync::Arc;
use tracing::debug;

/// Loads encoded videos from local or remote paths.
///
/// Each load is an independent, synchronous, single-shot operation: the
/// loader holds no per-call state, so loading the same source twice yields
/// two independent instances.
pub struct VideoLoader {
    resolver: Arc<dyn PathResolver>,
    prober: Arc<dyn DimensionProber>,
}

impl VideoLoader {
    /// Create a loader with the default collaborators: local filesystem
    /// resolution and, when the `ffmpeg` feature is enabled, FFmpeg-backed
    /// dimension probing.
    pub fn new() -> Self {
        Self {
            resolver: Arc::new(LocalPathResolver),
            prober: Self::default_prober(),
        }
    }

    #[cfg(feature = "ffmpeg")]
    fn default_prober() -> Arc<dyn DimensionProber> {
        Arc::new(crate::probe::FfmpegProber)
    }

    #[cfg(not(feature = "ffmpeg"))]
    fn default_prober() -> Arc<dyn DimensionProber> {
        Arc::new(crate::probe::UnconfiguredProber)
    }

    /// Replace the path resolver (e.g. with an HTTP resolver for remote
    /// URIs).
    pub fn with_resolver(mut self, resolver: Arc<dyn PathResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replace the dimension prober.
    pub fn with_prober(mut self, prober: Arc<dyn DimensionProber>) -> Self {
        self.prober = prober;
        self
    }

    /// Load the video at `path` and construct the selected backend.
    ///
    /// Reads the full contents into memory, then, if a positive
    /// short-side scale is requested, probes the source for its native
    /// dimensions and computes the scaled output size, overwriting any
    /// caller-supplied width/height in the forwarded params (see
    /// [`LoadOptions`]).
    ///
    /// # Errors
    ///
    /// - [`VideoError::SourceError`] / [`VideoError::IoError`] when the
    ///   resolver cannot open or read the path.
    /// - [`VideoError::InvalidSource`] when scaling is requested and the
    ///   probe reports a zero width or height.
    /// - [`VideoError::ProbeError`] when scaling is requested and probing
    ///   fails.
    pub fn load(&self, path: &str, options: LoadOptions) -> Result<Box<dyn Video>> {
        let data = read_to_bytes(self.resolver.as_ref(), path)?;

        let scale = options.effective_short_side_scale();
        let mut params = options.params;
        if let Some(scale) = scale {
            let (width, height) = self.prober.dimensions(path)?;
            if width == 0 || height == 0 {
                return Err(VideoError::InvalidSource {
                    path: path.to_string(),
                });
            }

            let (out_width, out_height) = short_side_dimensions(width, height, scale);
            if params.width.is_some() || params.height.is_some() {
                debug!(
                    "Overriding caller-supplied dimensions {:?}x{:?} with computed {}x{}",
                    params.width, params.height, out_width, out_height
                );
            }
            debug!(
                "Short-side scale {}: {}x{} -> {}x{}",
                scale, width, height, out_width, out_height
            );
            params.width = Some(out_width);
            params.height = Some(out_height);
        }

        let construct = options.decoder.constructor();
        construct(VideoInput {
            data,
            video_name: video_name(path),
            decode_video: options.decode_video,
            decode_audio: options.decode_audio,
            params,
        })
    }
}

impl Default for VideoLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a video with the default loader collaborators.
///
/// Convenience wrapper around [`VideoLoader::load`].
pub fn from_path(path: &str, options: LoadOptions) -> Result<Box<dyn Video>> {
    VideoLoader::new().load(path, options)
}
