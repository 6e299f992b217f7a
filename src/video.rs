//! # Video Capability Trait
//!
//! The interface every decoder backend implements, plus the clip types it
//! produces.

use crate::backends::DecoderType;
use crate::config::DecodeParams;
use crate::error::Result;
use bytes::Bytes;
use std::time::Duration;

/// A loaded, encoded video that can serve audio/video clips between two
/// timestamps.
///
/// Instances own their encoded byte buffer and are independent of one
/// another; loading the same source twice yields two instances with no
/// shared state.
pub trait Video: Send {
    /// The backend that constructed this instance.
    fn backend(&self) -> DecoderType;

    /// Display name of the video (the source's base file name).
    fn name(&self) -> &str;

    /// Total duration, if the container reports one.
    fn duration(&self) -> Option<Duration>;

    /// Whether this instance decodes the video stream.
    fn decodes_video(&self) -> bool;

    /// Whether this instance decodes the audio stream.
    fn decodes_audio(&self) -> bool;

    /// Parameters forwarded by the loader, including the computed
    /// width/height when short-side scaling was requested.
    fn params(&self) -> &DecodeParams;

    /// Decode the clip between `start` and `end`.
    ///
    /// Streams whose decode flag is off are returned as `None` in the clip.
    ///
    /// # Errors
    ///
    /// Returns an error if `end` precedes `start`, if the container cannot
    /// be parsed, or if decoding fails.
    fn clip(&mut self, start: Duration, end: Duration) -> Result<Clip>;
}

/// Decoded audio/video data for a time range.
#[derive(Debug, Clone, Default)]
pub struct Clip {
    /// Decoded video frames, in presentation order. `None` when video
    /// decoding is disabled.
    pub video: Option<Vec<VideoFrame>>,

    /// Decoded audio samples. `None` when audio decoding is disabled or the
    /// container has no audio track.
    pub audio: Option<AudioClip>,
}

impl Clip {
    /// Returns `true` if the clip carries neither video nor audio data.
    pub fn is_empty(&self) -> bool {
        self.video.as_ref().map_or(true, |v| v.is_empty())
            && self.audio.as_ref().map_or(true, |a| a.samples.is_empty())
    }
}

/// A single decoded video frame in RGB24.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Packed RGB24 pixel data, `width * height * 3` bytes.
    pub data: Bytes,
    /// Presentation timestamp.
    pub pts: Duration,
}

/// A chunk of decoded PCM audio for a clip.
///
/// Samples are normalized to `[-1.0, 1.0]` and interleaved for multi-channel
/// audio (stereo is LRLRLR...).
#[derive(Debug, Clone)]
pub struct AudioClip {
    /// Interleaved PCM samples normalized to [-1.0, 1.0].
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of audio channels.
    pub channels: u16,
    /// Presentation timestamp of the first frame.
    pub start: Duration,
}

impl AudioClip {
    /// Number of frames (one sample per channel).
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / self.channels as usize
    }

    /// Duration of the decoded audio based on its sample rate.
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frames() as f64 / f64::from(self.sample_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_clip() {
        assert!(Clip::default().is_empty());

        let clip = Clip {
            video: Some(vec![]),
            audio: None,
        };
        assert!(clip.is_empty());
    }

    #[test]
    fn clip_with_audio_is_not_empty() {
        let clip = Clip {
            video: None,
            audio: Some(AudioClip {
                samples: vec![0.0; 4],
                sample_rate: 44100,
                channels: 2,
                start: Duration::ZERO,
            }),
        };
        assert!(!clip.is_empty());
    }

    #[test]
    fn audio_clip_frames_and_duration() {
        let audio = AudioClip {
            samples: vec![0.0; 8820], // 4410 frames * 2 channels
            sample_rate: 44100,
            channels: 2,
            start: Duration::ZERO,
        };
        assert_eq!(audio.frames(), 4410);
        assert_eq!(audio.duration().as_millis(), 100);
    }
}
