//! Shared symphonia-based audio clip decoding.
//!
//! All backends decode audio the same way: probe the in-memory buffer,
//! select the first audio track, seek to the clip start and decode until the
//! clip end, converting every sample format to interleaved f32.

use crate::error::{Result, VideoError};
use crate::video::AudioClip;
use bytes::Bytes;
use std::io::Cursor;
use std::time::Duration;
use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::conv::IntoSample;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, SeekMode, SeekTo};
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;
use symphonia::core::units::{Time, TimeBase};
use tracing::{debug, warn};

/// Decodes the audio track of an in-memory container for one clip.
pub(crate) struct AudioClipReader {
    format_reader: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    sample_rate: u32,
    channels: u16,
    time_base: Option<TimeBase>,
    duration: Option<Duration>,
}

impl AudioClipReader {
    /// Probe the buffer and prepare the first audio track for decoding.
    ///
    /// `name_hint` is the display name whose extension guides format
    /// detection.
    pub fn open(data: &Bytes, name_hint: &str) -> Result<Self> {
        let mut hint = Hint::new();
        if let Some(extension) = name_hint.rsplit('.').next().filter(|e| *e != name_hint) {
            hint.with_extension(extension);
        }

        let cursor = Cursor::new(data.to_vec());
        let media_source = Box::new(cursor) as Box<dyn MediaSource>;
        let mss = MediaSourceStream::new(media_source, Default::default());

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| VideoError::InvalidFormat(format!("Failed to probe container: {e}")))?;

        let format_reader = probed.format;

        let track = format_reader
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| VideoError::InvalidFormat("No decodable audio tracks".to_string()))?;

        let track_id = track.id;
        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or_else(|| VideoError::InvalidFormat("Missing sample rate".to_string()))?;

        // Channel count may be unknown until the first decoded packet.
        let channels = track
            .codec_params
            .channels
            .map(|ch| ch.count() as u16)
            .unwrap_or(2);

        let time_base = track.codec_params.time_base;
        let duration = track
            .codec_params
            .n_frames
            .map(|frames| Duration::from_secs_f64(frames as f64 / f64::from(sample_rate)));

        let decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| {
                VideoError::DecodingError(format!("Failed to create audio decoder: {e}"))
            })?;

        debug!(
            "Audio track {}: {}Hz, {} channels, duration {:?}",
            track_id, sample_rate, channels, duration
        );

        Ok(Self {
            format_reader,
            decoder,
            track_id,
            sample_rate,
            channels,
            time_base,
            duration,
        })
    }

    /// Track duration, if the container reports one.
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Decode the clip between `start` and `end`.
    pub fn read_clip(mut self, start: Duration, end: Duration) -> Result<AudioClip> {
        if !start.is_zero() {
            let time = Time::from(start.as_secs_f64());
            self.format_reader
                .seek(
                    SeekMode::Accurate,
                    SeekTo::Time {
                        time,
                        track_id: Some(self.track_id),
                    },
                )
                .map_err(|e| VideoError::DecodingError(format!("Audio seek failed: {e}")))?;
            self.decoder.reset();
        }

        let end_secs = end.as_secs_f64();
        let mut samples = Vec::new();
        let mut clip_start: Option<Duration> = None;

        loop {
            let packet = match self.format_reader.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(e) => {
                    return Err(VideoError::DecodingError(format!(
                        "Failed to read packet: {e}"
                    )));
                }
            };

            if packet.track_id() != self.track_id {
                continue;
            }

            let packet_time = self
                .time_base
                .map(|tb| tb.calc_time(packet.ts()))
                .map(|t| t.seconds as f64 + t.frac);

            if let Some(secs) = packet_time {
                if secs > end_secs {
                    break;
                }
                if clip_start.is_none() {
                    clip_start = Some(Duration::from_secs_f64(secs));
                }
            }

            match self.decoder.decode(&packet) {
                Ok(decoded) => {
                    let decoded_channels = decoded.spec().channels.count() as u16;
                    if decoded_channels != self.channels {
                        debug!(
                            "Updating channel count from {} to {}",
                            self.channels, decoded_channels
                        );
                        self.channels = decoded_channels;
                    }
                    samples.extend(to_interleaved_f32(&decoded));
                }
                Err(SymphoniaError::DecodeError(e)) => {
                    // Skip corrupted packets and keep decoding.
                    warn!("Skipping packet with decode error: {}", e);
                    continue;
                }
                Err(e) => {
                    return Err(VideoError::DecodingError(format!(
                        "Failed to decode packet: {e}"
                    )));
                }
            }
        }

        Ok(AudioClip {
            samples,
            sample_rate: self.sample_rate,
            channels: self.channels,
            start: clip_start.unwrap_or(start),
        })
    }
}

/// Probe the buffer for a duration, tolerating unparseable data.
///
/// Used by backend constructors: an unreadable buffer yields an unknown
/// duration rather than a construction failure.
pub(crate) fn probe_duration(data: &Bytes, name_hint: &str) -> Option<Duration> {
    match AudioClipReader::open(data, name_hint) {
        Ok(reader) => reader.duration(),
        Err(e) => {
            debug!("Duration probe failed for {}: {}", name_hint, e);
            None
        }
    }
}

/// Decode the audio clip for a backend, treating a container without a
/// decodable audio track as "no audio" rather than a failure.
pub(crate) fn clip_or_none(
    data: &Bytes,
    name_hint: &str,
    start: Duration,
    end: Duration,
) -> Result<Option<AudioClip>> {
    match AudioClipReader::open(data, name_hint) {
        Ok(reader) => Ok(Some(reader.read_clip(start, end)?)),
        Err(VideoError::InvalidFormat(reason)) => {
            warn!("No decodable audio in {}: {}", name_hint, reason);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Convert a decoded buffer of any sample format to interleaved f32 in
/// [-1.0, 1.0].
fn to_interleaved_f32(buffer: &AudioBufferRef<'_>) -> Vec<f32> {
    match buffer {
        AudioBufferRef::F32(buf) => interleave(&**buf, |s: f32| s),
        AudioBufferRef::F64(buf) => interleave(&**buf, |s: f64| s.into_sample()),
        AudioBufferRef::S32(buf) => interleave(&**buf, |s: i32| s.into_sample()),
        AudioBufferRef::S24(buf) => interleave(&**buf, |s| IntoSample::into_sample(s)),
        AudioBufferRef::S16(buf) => interleave(&**buf, |s: i16| s.into_sample()),
        AudioBufferRef::S8(buf) => interleave(&**buf, |s: i8| s.into_sample()),
        AudioBufferRef::U32(buf) => interleave(&**buf, |s: u32| s.into_sample()),
        AudioBufferRef::U24(buf) => interleave(&**buf, |s| IntoSample::into_sample(s)),
        AudioBufferRef::U16(buf) => interleave(&**buf, |s: u16| s.into_sample()),
        AudioBufferRef::U8(buf) => interleave(&**buf, |s: u8| s.into_sample()),
    }
}

/// Interleave a planar buffer (LLLL...RRRR...) into LRLRLR... order,
/// converting each sample to f32.
fn interleave<T>(buf: &AudioBuffer<T>, convert: fn(T) -> f32) -> Vec<f32>
where
    T: Sample + Copy,
{
    let num_channels = buf.spec().channels.count();
    let num_frames = buf.frames();
    let mut interleaved = Vec::with_capacity(num_frames * num_channels);

    for frame_idx in 0..num_frames {
        for chan_idx in 0..num_channels {
            interleaved.push(convert(buf.chan(chan_idx)[frame_idx]));
        }
    }

    interleaved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_rejects_garbage_buffer() {
        let data = Bytes::from_static(b"\x00\x01\x02\x03 definitely not media");
        let result = AudioClipReader::open(&data, "clip.mp4");
        assert!(matches!(result, Err(VideoError::InvalidFormat(_))));
    }

    #[test]
    fn probe_duration_is_tolerant() {
        let data = Bytes::from_static(b"garbage");
        assert_eq!(probe_duration(&data, "clip.mp4"), None);

        let empty = Bytes::new();
        assert_eq!(probe_duration(&empty, "clip.webm"), None);
    }
}
