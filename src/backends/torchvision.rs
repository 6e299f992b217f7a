//! TorchVision-style backend: sequential full decode.

use crate::backends::{audio, check_clip_range, DecoderType, VideoInput};
use crate::config::DecodeParams;
use crate::error::Result;
use crate::video::{Clip, Video, VideoFrame};
use bytes::Bytes;
use std::time::Duration;

/// Backend that decodes the stream sequentially from the beginning and
/// slices the requested range by timestamp. Slower for clips deep into a
/// long video, but avoids demuxer seeks entirely.
pub struct TorchVisionVideo {
    data: Bytes,
    video_name: String,
    decode_video: bool,
    decode_audio: bool,
    params: DecodeParams,
    duration: Option<Duration>,
}

impl TorchVisionVideo {
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
        read_clip(&self.data, start, end, SeekStrategy::Sequential, &self.params)
    }

    #[cfg(not(feature = "ffmpeg"))]
    fn decode_video_clip(&self, _start: Duration, _end: Duration) -> Result<Vec<VideoFrame>> {
        Err(crate::error::VideoError::Unsupported(
            "Video decoding requires the 'ffmpeg' feature".to_string(),
        ))
    }
}

impl Video for TorchVisionVideo {
    fn backend(&self) -> DecoderType {
        DecoderType::TorchVision
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
        let video = TorchVisionVideo::new(VideoInput {
            data: Bytes::from_static(b"bytes"),
            video_name: "archive.webm".to_string(),
            decode_video: true,
            decode_audio: false,
            params: DecodeParams::default(),
        });
        assert_eq!(video.backend(), DecoderType::TorchVision);
        assert_eq!(video.name(), "archive.webm");
        assert!(video.decodes_video());
        assert!(!video.decodes_audio());
        assert_eq!(video.params().width, None);
    }
}
