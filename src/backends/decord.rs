//! Decord-style backend: keyframe-aligned random access.

use crate::backends::{audio, check_clip_range, DecoderType, VideoInput};
use crate::config::DecodeParams;
use crate::error::Result;
use crate::video::{Clip, Video, VideoFrame};
use bytes::Bytes;
use std::time::Duration;

/// Backend that seeks to the keyframe at or before the clip start and keeps
/// every frame decoded from there. Fastest for random access; the returned
/// clip may begin slightly before the requested start.
pub struct DecordVideo {
    data: Bytes,
    video_name: String,
    decode_video: bool,
    decode_audio: bool,
    params: DecodeParams,
    duration: Option<Duration>,
}

impl DecordVideo {
    /// Construct from the loader's input, taking ownership of the buffer.
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

    #[cfg(feature = "ffmpeg")]
    fn decode_video_clip(&self, start: Duration, end: Duration) -> Result<Vec<VideoFrame>> {
        use crate::backends::ffmpeg::{read_clip, SeekStrategy};
        read_clip(&self.data, start, end, SeekStrategy::Keyframe, &self.params)
    }

    #[cfg(not(feature = "ffmpeg"))]
    fn decode_video_clip(&self, _start: Duration, _end: Duration) -> Result<Vec<VideoFrame>> {
        Err(crate::error::VideoError::Unsupported(
            "Video decoding requires the 'ffmpeg' feature".to_string(),
        ))
    }
}

impl Video for DecordVideo {
    fn backend(&self) -> DecoderType {
        DecoderType::Decord
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

    #[test]
    fn construction_stores_input() {
        let video = DecordVideo::new(VideoInput {
            data: Bytes::new(),
            video_name: "empty.mkv".to_string(),
            decode_video: false,
            decode_audio: true,
            params: DecodeParams::default(),
        });
        assert_eq!(video.backend(), DecoderType::Decord);
        assert_eq!(video.name(), "empty.mkv");
        assert_eq!(video.duration(), None);
    }

    #[test]
    fn audio_clip_on_unparseable_buffer_is_none() {
        let mut video = DecordVideo::new(VideoInput {
            data: Bytes::from_static(b"not media"),
            video_name: "noise.mp4".to_string(),
            decode_video: false,
            decode_audio: true,
            params: DecodeParams::default(),
        });
        let clip = video
            .clip(Duration::ZERO, Duration::from_secs(1))
            .unwrap();
        assert!(clip.audio.is_none());
        assert!(clip.is_empty());
    }
}
