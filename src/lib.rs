//! # Encoded Video Loading & Decoding
//!
//! Loads encoded videos from local or remote sources and serves audio/video
//! clips through a selectable decoder backend.
//!
//! ## Overview
//!
//! This crate handles:
//! - Path resolution for local files and remote URIs (HTTP feature-gated)
//! - Backend selection from fixed tokens (`pyav`, `torchvision`, `decord`)
//! - Aspect-preserving short-side scaling of output dimensions
//! - Audio clip decoding using symphonia
//! - Video clip decoding using FFmpeg (optional, feature-gated)
//!
//! ## Example
//!
//! ```no_run
//! use encoded_video::{LoadOptions, VideoLoader};
//! use std::time::Duration;
//!
//! # fn main() -> encoded_video::Result<()> {
//! let loader = VideoLoader::new();
//! let options = LoadOptions::default().with_short_side_scale(320);
//! let mut video = loader.load("/videos/clip.mp4", options)?;
//! let _clip = video.clip(Duration::ZERO, Duration::from_secs(5))?;
//! # Ok(())
//! # }
//! ```

pub mod backends;
pub mod config;
pub mod error;
pub mod loader;
pub mod probe;
pub mod resolver;
pub mod video;

pub use backends::{DecoderType, DecordVideo, PyAvVideo, TorchVisionVideo, VideoInput};
pub use config::{DecodeParams, LoadOptions};
pub use error::{Result, VideoError};
pub use loader::{from_path, VideoLoader};
pub use probe::{short_side_dimensions, DimensionProber};
pub use resolver::{LocalPathResolver, PathResolver};
pub use video::{AudioClip, Clip, Video, VideoFrame};

#[cfg(feature = "http-resolver")]
pub use resolver::HttpPathResolver;

#[cfg(feature = "ffmpeg")]
pub use probe::FfmpegProber;
