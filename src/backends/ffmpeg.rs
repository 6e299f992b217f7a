//! Shared FFmpeg-based video clip decoding.
//!
//! The three backends differ only in their seek strategy; demuxing, frame
//! decoding and RGB conversion are common. FFmpeg demuxers open by path, so
//! the owned buffer is spooled to a temporary file for the duration of the
//! read.

use crate::config::DecodeParams;
use crate::error::{Result, VideoError};
use crate::video::VideoFrame;
use bytes::Bytes;
use ffmpeg_next as ffmpeg;
use std::io::Write;
use std::time::Duration;
use tracing::debug;

/// How a backend positions the demuxer relative to the clip start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SeekStrategy {
    /// Decode from the beginning of the stream, keeping frames inside the
    /// clip range.
    Sequential,
    /// Seek to the clip start, discarding decoded frames that precede it.
    Precise,
    /// Seek to the clip start and keep every decoded frame from the
    /// preceding keyframe onward.
    Keyframe,
}

/// Decode the video frames of `data` between `start` and `end` as RGB24.
pub(crate) fn read_clip(
    data: &Bytes,
    start: Duration,
    end: Duration,
    strategy: SeekStrategy,
    params: &DecodeParams,
) -> Result<Vec<VideoFrame>> {
    let mut spool = tempfile::NamedTempFile::new()?;
    spool.write_all(data)?;
    spool.flush()?;

    ffmpeg::init().map_err(|e| VideoError::DecodingError(format!("FFmpeg init failed: {e}")))?;

    let mut input = ffmpeg::format::input(&spool.path()).map_err(|e| {
        VideoError::InvalidFormat(format!("Failed to open video container: {e}"))
    })?;

    let (stream_index, time_base, parameters) = {
        let stream = input
            .streams()
            .best(ffmpeg::media::Type::Video)
            .ok_or_else(|| VideoError::InvalidFormat("No video stream".to_string()))?;
        (stream.index(), stream.time_base(), stream.parameters())
    };

    let mut decoder = ffmpeg::codec::context::Context::from_parameters(parameters)
        .map_err(|e| VideoError::DecodingError(format!("Failed to create codec context: {e}")))?
        .decoder()
        .video()
        .map_err(|e| VideoError::DecodingError(format!("Failed to open video decoder: {e}")))?;

    if strategy != SeekStrategy::Sequential && !start.is_zero() {
        // Positions in AV_TIME_BASE units; lands on the keyframe at or
        // before the requested timestamp.
        let target_us = start.as_micros() as i64;
        input
            .seek(target_us, ..target_us)
            .map_err(|e| VideoError::DecodingError(format!("Video seek failed: {e}")))?;
    }

    let (src_width, src_height) = (decoder.width(), decoder.height());
    if src_width == 0 || src_height == 0 {
        return Err(VideoError::InvalidFormat(
            "Video stream reports zero dimensions".to_string(),
        ));
    }
    let out_width = params.width.unwrap_or(src_width);
    let out_height = params.height.unwrap_or(src_height);

    let mut scaler = ffmpeg::software::scaling::Context::get(
        decoder.format(),
        src_width,
        src_height,
        ffmpeg::format::Pixel::RGB24,
        out_width,
        out_height,
        ffmpeg::software::scaling::Flags::BILINEAR,
    )
    .map_err(|e| VideoError::DecodingError(format!("Failed to create scaler: {e}")))?;

    let tb_secs = f64::from(time_base.numerator()) / f64::from(time_base.denominator());
    let start_secs = start.as_secs_f64();
    let end_secs = end.as_secs_f64();
    let keep_before_start = strategy == SeekStrategy::Keyframe;

    let mut frames = Vec::new();
    let mut done = false;

    for (stream, packet) in input.packets() {
        if stream.index() != stream_index {
            continue;
        }
        decoder
            .send_packet(&packet)
            .map_err(|e| VideoError::DecodingError(format!("Failed to send packet: {e}")))?;
        drain_frames(
            &mut decoder,
            &mut scaler,
            &mut frames,
            tb_secs,
            start_secs,
            end_secs,
            keep_before_start,
            out_width,
            out_height,
            &mut done,
        )?;
        if done {
            break;
        }
    }

    if !done {
        // Flush delayed frames (B-frame reordering).
        if decoder.send_eof().is_ok() {
            drain_frames(
                &mut decoder,
                &mut scaler,
                &mut frames,
                tb_secs,
                start_secs,
                end_secs,
                keep_before_start,
                out_width,
                out_height,
                &mut done,
            )?;
        }
    }

    debug!(
        "Decoded {} video frames for clip {:?}..{:?}",
        frames.len(),
        start,
        end
    );
    Ok(frames)
}

#[allow(clippy::too_many_arguments)]
fn drain_frames(
    decoder: &mut ffmpeg::codec::decoder::Video,
    scaler: &mut ffmpeg::software::scaling::Context,
    frames: &mut Vec<VideoFrame>,
    tb_secs: f64,
    start_secs: f64,
    end_secs: f64,
    keep_before_start: bool,
    out_width: u32,
    out_height: u32,
    done: &mut bool,
) -> Result<()> {
    loop {
        let mut frame = ffmpeg::frame::Video::empty();
        if decoder.receive_frame(&mut frame).is_err() {
            break;
        }

        let secs = frame.timestamp().map(|ts| ts as f64 * tb_secs);
        if let Some(secs) = secs {
            if secs > end_secs {
                *done = true;
                break;
            }
            if !keep_before_start && secs < start_secs {
                continue;
            }
        }

        let mut rgb = ffmpeg::frame::Video::empty();
        scaler
            .run(&frame, &mut rgb)
            .map_err(|e| VideoError::DecodingError(format!("Failed to scale frame: {e}")))?;

        frames.push(VideoFrame {
            width: out_width,
            height: out_height,
            data: extract_rgb(&rgb, out_width, out_height)?,
            pts: Duration::from_secs_f64(secs.unwrap_or(0.0).max(0.0)),
        });
    }
    Ok(())
}

/// Copy packed RGB24 rows out of a scaled frame, honoring the line stride.
fn extract_rgb(frame: &ffmpeg::frame::Video, width: u32, height: u32) -> Result<Bytes> {
    let src = frame.data(0);
    let stride = frame.stride(0);
    let row_bytes = width as usize * 3;

    let required = (height as usize - 1) * stride + row_bytes;
    if src.len() < required {
        return Err(VideoError::DecodingError(format!(
            "Frame data too small: got {} bytes, need {} ({}x{}, stride={})",
            src.len(),
            required,
            width,
            height,
            stride
        )));
    }

    let mut out = Vec::with_capacity(row_bytes * height as usize);
    for y in 0..height as usize {
        out.extend_from_slice(&src[y * stride..y * stride + row_bytes]);
    }
    Ok(Bytes::from(out))
}
