//! PyAV-style backend: selective decoding.

use crate::backends::{audio, check_clip_range, DecoderType, VideoInput};
use crate::config::DecodeParams;
use crate::error::Result;
use crate::video::{Clip, Video, VideoFrame};
use bytes::Bytes;
use std::time::Duration;

/// Backend that decodes clips selectively: the demuxer seeks to the clip
/// start and frames before it are discarded, so only the requested range is
/// decoded.
pub struct PyAvVideo {
    data: Bytes,
    video_name: String,
    decode_video: bool,
    decode_audio: bool,
    params: DecodeParams,
    duration: Option<Duration>,
}

impl PyAvVideo {
    /// Construct from the loader's input, taking ownership of the buffer.
    ///
    /// The container is probed for a duration; an unparseable buffer yields
    /// an unknown duration rather than a failure.
    pub fn new(input: VideoInput) -> Self {
        let duration = audio::probe_duration(&input.data, &input.video_name);
        Self {
            data: input.data,
            video_name: input.video_name,
            decode_video: input.decode_video,
            decode_audio: input.decode_audio,
            params: input.params,
            duration,
        }
    }

    pub(crate) fn boxed(input: VideoInput) -> Result<Box<dyn Video>> {
        Ok(Box::new(Self::new(input)))
    }

    /// Size of the owned encoded buffer in bytes.
    pub fn data_len(&self) -> usize {
        self.data.len()
    }

    #[cfg(feature = "ffmpeg")]
    fn decode_video_clip(&self, start: Duration, end: Duration) -> Result<Vec<VideoFrame>> {
        use crate::backends::ffmpeg::{read_clip, SeekStrategy};
        read_clip(&self.data, start, end, SeekStrategy::Precise, &self.params)
    }

    #[cfg(not(feature = "ffmpeg"))]
    fn decode_video_clip(&self, _start: Duration, _end: Duration) -> Result<Vec<VideoFrame>> {
        Err(crate::error::VideoError::Unsupported(
            "Video decoding requires the 'ffmpeg' feature".to_string(),
        ))
    }
}

impl Video for PyAvVideo {
    fn backend(&self) -> DecoderType {
        DecoderType::PyAv
    }

    fn name(&self) -> &str {
        &self.video_name
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn decodes_video(&self) -> bool {
        self.decode_video
    }

    fn decodes_audio(&self) -> bool {
        self.decode_audio
    }

    fn params(&self) -> &DecodeParams {
        &self.params
    }

    fn clip(&mut self, start: Duration, end: Duration) -> Result<Clip> {
        check_clip_range(start, end)?;

        let video = if self.decode_video {
            Some(self.decode_video_clip(start, end)?)
        } else {
            None
        };

        let audio = if self.decode_audio {
            audio::clip_or_none(&self.data, &self.video_name, start, end)?
        } else {
            None
        };

        Ok(Clip { video, audio })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> VideoInput {
        VideoInput {
            data: Bytes::from_static(b"opaque bytes"),
            video_name: "clip.mp4".to_string(),
            decode_video: false,
            decode_audio: false,
            params: DecodeParams::default().with_dimensions(320, 180),
        }
    }

    #[test]
    fn construction_stores_input() {
        let video = PyAvVideo::new(input());
        assert_eq!(video.backend(), DecoderType::PyAv);
        assert_eq!(video.name(), "clip.mp4");
        assert_eq!(video.data_len(), 12);
        assert_eq!(video.params().width, Some(320));
        assert_eq!(video.params().height, Some(180));
        assert_eq!(video.duration(), None);
    }

    #[test]
    fn clip_with_both_streams_disabled_is_empty() {
        let mut video = PyAvVideo::new(input());
        let clip = video
            .clip(Duration::ZERO, Duration::from_secs(1))
            .unwrap();
        assert!(clip.video.is_none());
        assert!(clip.audio.is_none());
        assert!(clip.is_empty());
    }

    #[test]
    fn clip_rejects_inverted_range() {
        let mut video = PyAvVideo::new(input());
        let err = video
            .clip(Duration::from_secs(2), Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::VideoError::InvalidClipRange { .. }
        ));
    }
}
