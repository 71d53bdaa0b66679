//! Convert Lottie animations into per-frame SVG snapshots, optionally assembled into a video.
//!
//! The pipeline runs in one direction:
//!
//! - Load an [`AnimationDocument`] (a Lottie JSON file with an in-point and out-point)
//! - Drive a [`RenderHost`] across the range with a [`FrameSampler`], four samples per frame
//! - Write each sample to `<index>.svg` through a [`FrameSink`]
//! - Optionally hand the sequence to a [`VideoEncoder`] (system `ffmpeg`)
//!
//! [`convert`] wires the default headless-Chromium host and ffmpeg encoder together;
//! [`convert_with`] accepts any host and encoder.
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod document;
/// Video assembly.
pub mod encode;
pub(crate) mod output;
pub(crate) mod render;
pub(crate) mod sample;
pub(crate) mod session;

pub use crate::foundation::cancel::CancelToken;
pub use crate::foundation::core::{Oversample, SampleIndex, SamplePlan, SampleTime};
pub use crate::foundation::error::{ConvertError, ConvertResult};

pub use crate::document::loader::AnimationDocument;
pub use crate::encode::ffmpeg::{EncodeParams, FfmpegEncoder, VideoEncoder, is_ffmpeg_on_path};
pub use crate::output::sink::{
    FRAME_EXTENSION, FrameSink, InMemorySink, SvgDirSink, frame_file_name,
};
pub use crate::render::chrome::{BrowserOpts, ChromeRenderHost};
pub use crate::render::host::RenderHost;
pub use crate::render::page::PlaybackLibrary;
pub use crate::sample::sampler::{FrameSampler, RenderedFrame};
pub use crate::session::convert::{
    ConvertConfig, ConvertOpts, ConvertStats, DEFAULT_PLAYBACK_LIBRARY, convert, convert_with,
    drain_into,
};
