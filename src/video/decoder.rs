//! Video decoder module
//!
//! Frame-accurate decoding by index using FFmpeg.

use std::path::{Path, PathBuf};

use anyhow::Context;
use image::RgbImage;
use tracing::{debug, error, info};

use ffmpeg_next as ffmpeg;
use ffmpeg::format::input;
use ffmpeg::format::Pixel;
use ffmpeg::media::Type;
use ffmpeg::software::scaling::{Context as Scaler, Flags};
use ffmpeg::util::frame::video::Video as VideoFrame;
use ffmpeg::Rational;

use super::source::{check_index, Frame, FrameSource, VideoBackend};
use crate::error::{DecodeError, OpenError};

/// Opens videos through FFmpeg
#[derive(Debug, Default, Clone, Copy)]
pub struct FfmpegBackend;

impl VideoBackend for FfmpegBackend {
    type Source = FfmpegSource;

    fn open(&mut self, path: &Path) -> Result<FfmpegSource, OpenError> {
        FfmpegSource::open(path)
    }
}

/// One opened video file
///
/// Holds the demuxer and decoder for the lifetime of a session. Frames are
/// decoded on demand: a request for the frame right after the last one
/// continues from the decoder's cursor, anything else seeks first.
pub struct FfmpegSource {
    /// FFmpeg format context
    input_ctx: ffmpeg::format::context::Input,
    /// Video stream index
    video_stream_index: usize,
    /// Video decoder
    decoder: ffmpeg::codec::decoder::Video,
    /// Scaler converting to RGB24 at native size
    scaler: Scaler,
    /// Native frame width
    width: u32,
    /// Native frame height
    height: u32,
    /// Stream time base
    time_base: Rational,
    /// First presentation timestamp of the stream, in time base units
    start_pts: i64,
    /// Video FPS
    fps: f64,
    /// Total frame count
    frame_count: usize,
    /// Index the decoder will produce next, if known
    cursor: Option<usize>,
    /// Packet iterator state
    packet_iter_exhausted: bool,
    /// Source path, for logging
    path: PathBuf,
}

impl FfmpegSource {
    /// Open a video file for decoding
    pub fn open(path: &Path) -> Result<Self, OpenError> {
        if !path.exists() {
            return Err(OpenError::NotFound(path.to_path_buf()));
        }

        let unsupported = |e: anyhow::Error| OpenError::Unsupported {
            path: path.to_path_buf(),
            reason: format!("{e:#}"),
        };

        // Initialize FFmpeg (safe to call multiple times)
        ffmpeg::init()
            .context("Failed to initialize FFmpeg")
            .map_err(unsupported)?;

        let input_ctx = input(&path)
            .context("Failed to open video file")
            .map_err(unsupported)?;

        let video_stream = input_ctx
            .streams()
            .best(Type::Video)
            .ok_or_else(|| OpenError::NoVideoStream(path.to_path_buf()))?;

        let video_stream_index = video_stream.index();
        let time_base = video_stream.time_base();
        let fps = frame_rate(video_stream.avg_frame_rate())
            .or_else(|| frame_rate(video_stream.rate()))
            .unwrap_or(30.0);
        let start_pts = match video_stream.start_time() {
            ts if ts == ffmpeg::ffi::AV_NOPTS_VALUE => 0,
            ts => ts,
        };

        let stream_seconds = if video_stream.duration() > 0 {
            Some(video_stream.duration() as f64 * rational_to_f64(time_base))
        } else {
            None
        };
        let container_seconds = if input_ctx.duration() > 0 {
            Some(input_ctx.duration() as f64 / f64::from(ffmpeg::ffi::AV_TIME_BASE))
        } else {
            None
        };
        let frame_count = estimate_frame_count(
            video_stream.frames(),
            stream_seconds,
            container_seconds,
            fps,
        );

        let (decoder, scaler) = build_decoder(&video_stream).map_err(unsupported)?;
        let width = decoder.width();
        let height = decoder.height();

        if frame_count == 0 {
            return Err(OpenError::Empty(path.to_path_buf()));
        }

        info!(
            "Opened video {}: {}x{} @ {:.2}fps, {} frames",
            path.display(),
            width,
            height,
            fps,
            frame_count
        );

        Ok(Self {
            input_ctx,
            video_stream_index,
            decoder,
            scaler,
            width,
            height,
            time_base,
            start_pts,
            fps,
            frame_count,
            cursor: Some(0),
            packet_iter_exhausted: false,
            path: path.to_path_buf(),
        })
    }

    /// Reposition the demuxer at or before `index` and drop buffered frames
    fn seek_to(&mut self, index: usize) -> Result<(), DecodeError> {
        let timestamp = frame_index_to_seek_timestamp(index, self.fps);
        self.input_ctx
            .seek(timestamp, ..timestamp)
            .map_err(|e| DecodeError::Unavailable {
                index,
                reason: format!("seek failed: {e}"),
            })?;

        self.decoder.flush();
        self.packet_iter_exhausted = false;
        self.cursor = None;
        debug!("Seeked {} to frame {} (ts {})", self.path.display(), index, timestamp);
        Ok(())
    }

    /// Decode forward until a frame at or past `index` comes out
    fn decode_forward(&mut self, index: usize) -> Result<RgbImage, DecodeError> {
        loop {
            // Try to receive already decoded frames first
            let mut decoded = VideoFrame::empty();
            if self.decoder.receive_frame(&mut decoded).is_ok() {
                let timestamp = decoded.timestamp().or(decoded.pts());
                let position = resolve_position(
                    timestamp.map(|pts| {
                        pts_to_frame_index(pts - self.start_pts, self.time_base, self.fps)
                    }),
                    self.cursor,
                )
                .ok_or_else(|| DecodeError::Unavailable {
                    index,
                    reason: "decoded frame has no timestamp".to_string(),
                })?;
                self.cursor = Some(position + 1);

                if position >= index {
                    return self.convert_frame(&decoded, index);
                }
                continue;
            }

            if self.packet_iter_exhausted {
                return Err(DecodeError::Unavailable {
                    index,
                    reason: "end of stream reached before frame".to_string(),
                });
            }

            match self.input_ctx.packets().next() {
                Some((stream, packet)) => {
                    // Skip non-video packets
                    if stream.index() != self.video_stream_index {
                        continue;
                    }
                    if let Err(e) = self.decoder.send_packet(&packet) {
                        debug!("Decoder rejected packet: {}", e);
                    }
                }
                None => {
                    // End of stream, flush decoder
                    self.packet_iter_exhausted = true;
                    let _ = self.decoder.send_eof();
                }
            }
        }
    }

    /// Convert FFmpeg frame to RgbImage
    fn convert_frame(&mut self, decoded: &VideoFrame, index: usize) -> Result<RgbImage, DecodeError> {
        let mut rgb_frame = VideoFrame::empty();

        if let Err(e) = self.scaler.run(decoded, &mut rgb_frame) {
            error!("Failed to scale frame {}: {}", index, e);
            return Err(DecodeError::Unavailable {
                index,
                reason: format!("pixel conversion failed: {e}"),
            });
        }

        let pixels = copy_rgb_rows(
            rgb_frame.data(0),
            rgb_frame.stride(0),
            self.width as usize,
            self.height as usize,
        );
        RgbImage::from_raw(self.width, self.height, pixels).ok_or_else(|| {
            DecodeError::Unavailable {
                index,
                reason: "decoded frame is shorter than expected".to_string(),
            }
        })
    }
}

impl FrameSource for FfmpegSource {
    fn frame_count(&self) -> usize {
        self.frame_count
    }

    fn decode(&mut self, index: usize) -> Result<Frame, DecodeError> {
        check_index(index, self.frame_count)?;

        if self.cursor != Some(index) {
            self.seek_to(index)?;
        }

        let image = self.decode_forward(index)?;
        Ok(Frame::new(index, image))
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        info!("Released decoder for {}", self.path.display());
    }
}

/// Decoder and RGB24 scaler for a video stream
fn build_decoder(
    stream: &ffmpeg::format::stream::Stream,
) -> anyhow::Result<(ffmpeg::codec::decoder::Video, Scaler)> {
    let context_decoder = ffmpeg::codec::context::Context::from_parameters(stream.parameters())
        .context("Failed to create decoder context")?;
    let decoder = context_decoder
        .decoder()
        .video()
        .context("Failed to create video decoder")?;

    let scaler = Scaler::get(
        decoder.format(),
        decoder.width(),
        decoder.height(),
        Pixel::RGB24,
        decoder.width(),
        decoder.height(),
        Flags::BILINEAR,
    )
    .context("Failed to create scaler")?;

    Ok((decoder, scaler))
}

fn rational_to_f64(r: Rational) -> f64 {
    if r.denominator() == 0 {
        0.0
    } else {
        r.numerator() as f64 / r.denominator() as f64
    }
}

fn frame_rate(r: Rational) -> Option<f64> {
    let fps = rational_to_f64(r);
    (fps > 0.0).then_some(fps)
}

/// Frame count from whichever source the container provides
///
/// Prefers the stream's own frame counter, then the stream duration, then
/// the container duration.
fn estimate_frame_count(
    stream_frames: i64,
    stream_seconds: Option<f64>,
    container_seconds: Option<f64>,
    fps: f64,
) -> usize {
    if stream_frames > 0 {
        return stream_frames as usize;
    }
    stream_seconds
        .or(container_seconds)
        .map(|seconds| (seconds * fps).round().max(0.0) as usize)
        .unwrap_or(0)
}

/// Presentation timestamp (relative to stream start) → frame index
fn pts_to_frame_index(pts: i64, time_base: Rational, fps: f64) -> usize {
    let seconds = pts as f64 * rational_to_f64(time_base);
    (seconds * fps).round().max(0.0) as usize
}

/// Index of a decoded frame: its own timestamp, else the running cursor
///
/// Right after a seek there is no cursor, so an untimed frame cannot be
/// placed.
fn resolve_position(timestamp_index: Option<usize>, cursor: Option<usize>) -> Option<usize> {
    timestamp_index.or(cursor)
}

/// Frame index → container seek timestamp in AV_TIME_BASE (microseconds)
fn frame_index_to_seek_timestamp(index: usize, fps: f64) -> i64 {
    let seconds = index as f64 / fps;
    (seconds * 1_000_000.0) as i64
}

/// Copy RGB24 rows out of a possibly padded plane
fn copy_rgb_rows(data: &[u8], stride: usize, width: usize, height: usize) -> Vec<u8> {
    let row_len = width * 3;
    if stride == row_len {
        return data[..(row_len * height).min(data.len())].to_vec();
    }

    let mut pixels = Vec::with_capacity(row_len * height);
    for y in 0..height {
        let row_start = y * stride;
        let row_end = row_start + row_len;
        if row_end > data.len() {
            break;
        }
        pixels.extend_from_slice(&data[row_start..row_end]);
    }
    pixels
}
