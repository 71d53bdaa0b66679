use crate::document::loader::AnimationDocument;
use crate::encode::ffmpeg::{
    DEFAULT_FRAME_SIZE, DEFAULT_NATIVE_FPS, DEFAULT_OUTPUT_FPS, DEFAULT_VIDEO_FILE_NAME,
    EncodeParams, FfmpegEncoder, VideoEncoder,
};
use crate::foundation::cancel::CancelToken;
use crate::foundation::core::Oversample;
use crate::foundation::error::{ConvertError, ConvertResult};
use crate::output::sink::{FrameSink, SvgDirSink};
use crate::render::chrome::{BrowserOpts, ChromeRenderHost};
use crate::render::host::RenderHost;
use crate::render::page::PlaybackLibrary;
use crate::sample::sampler::{FrameSampler, RenderedFrame};
use std::path::PathBuf;

/// Default location of the lottie-web SVG player build.
pub const DEFAULT_PLAYBACK_LIBRARY: &str = "lib/lottie_svg.min.js";

/// What to convert and where. The pipeline's single entry contract, whether the values came
/// from arguments or from prompts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConvertConfig {
    /// Input Lottie JSON document.
    pub document_path: PathBuf,
    /// Directory receiving `<index>.svg` frames (and the video, if requested).
    pub output_dir: PathBuf,
    /// Assemble the frames into a video after sampling.
    pub encode_to_video: bool,
}

/// Tunables for a conversion run. Defaults reproduce the reference output.
#[derive(Clone, Debug)]
pub struct ConvertOpts {
    /// Samples rendered per native frame.
    pub oversample: u32,
    /// Frame rate of the assembled video.
    pub output_fps: u32,
    /// Native rate assumed when the document has no usable `fr`.
    pub native_fps_fallback: f64,
    /// Square video frame edge in pixels.
    pub frame_size: u32,
    /// Video file name inside the output directory.
    pub video_file_name: String,
    /// lottie-web player script evaluated in the render host.
    pub playback_library: PathBuf,
    /// Headless browser settings.
    pub browser: BrowserOpts,
}

impl Default for ConvertOpts {
    fn default() -> Self {
        Self {
            oversample: Oversample::DEFAULT.get(),
            output_fps: DEFAULT_OUTPUT_FPS,
            native_fps_fallback: DEFAULT_NATIVE_FPS,
            frame_size: DEFAULT_FRAME_SIZE,
            video_file_name: DEFAULT_VIDEO_FILE_NAME.to_string(),
            playback_library: PathBuf::from(DEFAULT_PLAYBACK_LIBRARY),
            browser: BrowserOpts::default(),
        }
    }
}

impl ConvertOpts {
    fn validate(&self) -> ConvertResult<Oversample> {
        if !self.native_fps_fallback.is_finite() || self.native_fps_fallback <= 0.0 {
            return Err(ConvertError::validation("native fps fallback must be > 0"));
        }
        Oversample::new(self.oversample)
    }

    /// Encoder parameters for `doc`. The input rate uses the document's own `fr` when declared.
    pub fn encode_params(&self, doc: &AnimationDocument) -> ConvertResult<EncodeParams> {
        let oversample = self.validate()?;
        let native_fps = doc.frame_rate().unwrap_or(self.native_fps_fallback);
        let params = EncodeParams {
            output_fps: self.output_fps,
            size: self.frame_size,
            out_file_name: self.video_file_name.clone(),
            ..EncodeParams::new(oversample, native_fps)
        };
        params.validate()?;
        Ok(params)
    }
}

/// Outcome of a completed run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConvertStats {
    /// Samples planned from the document range.
    pub samples_total: u64,
    /// Frame files written.
    pub frames_written: u64,
    /// Assembled video, when requested.
    pub video: Option<PathBuf>,
}

/// Convert a document using headless Chromium for rendering and system `ffmpeg` for video.
pub fn convert(
    cfg: &ConvertConfig,
    opts: &ConvertOpts,
    cancel: &CancelToken,
) -> ConvertResult<ConvertStats> {
    let mut encoder = FfmpegEncoder::new();
    convert_with(
        cfg,
        opts,
        cancel,
        |doc| {
            let library = PlaybackLibrary::from_path(&opts.playback_library)?;
            ChromeRenderHost::launch(doc, &library, &opts.browser)
        },
        &mut encoder,
    )
}

/// Convert a document with a caller-supplied render host and encoder.
///
/// Order of effects: options and document are validated before anything touches the output
/// directory; the host is created only after that; the encoder runs once, after the last frame
/// is written. The host is disposed on every exit path.
#[tracing::instrument(
    name = "convert",
    skip_all,
    fields(document = %cfg.document_path.display(), out = %cfg.output_dir.display())
)]
pub fn convert_with<H, F>(
    cfg: &ConvertConfig,
    opts: &ConvertOpts,
    cancel: &CancelToken,
    make_host: F,
    encoder: &mut dyn VideoEncoder,
) -> ConvertResult<ConvertStats>
where
    H: RenderHost,
    F: FnOnce(&AnimationDocument) -> ConvertResult<H>,
{
    let oversample = opts.validate()?;
    let doc = AnimationDocument::from_path(&cfg.document_path)?;
    let plan = doc.sample_plan(oversample)?;
    let encode_params = if cfg.encode_to_video {
        Some(opts.encode_params(&doc)?)
    } else {
        None
    };

    tracing::info!(
        title = doc.name().unwrap_or(""),
        in_point = doc.in_point(),
        out_point = doc.out_point(),
        fr = ?doc.frame_rate(),
        samples = plan.total_samples(),
        "starting conversion"
    );

    if cancel.is_cancelled() {
        return Err(ConvertError::Cancelled { completed: 0 });
    }

    let mut host = HostGuard(make_host(&doc)?);
    let mut sink = SvgDirSink::new(&cfg.output_dir);
    let sampler = FrameSampler::new(plan, &mut host.0, cancel.clone());
    let frames_written = drain_into(sampler, &mut sink)?;
    host.0.dispose()?;

    let video = match encode_params {
        Some(params) => {
            if cancel.is_cancelled() {
                return Err(ConvertError::Cancelled {
                    completed: frames_written,
                });
            }
            // SIGINT also reaches ffmpeg.
            let out = encoder
                .encode(&cfg.output_dir, &params)
                .map_err(|e| {
                    if cancel.is_cancelled() {
                        ConvertError::Cancelled {
                            completed: frames_written,
                        }
                    } else {
                        e
                    }
                })?;
            tracing::info!(video = %out.display(), "video written");
            Some(out)
        }
        None => None,
    };

    tracing::info!(frames = frames_written, "conversion finished");
    Ok(ConvertStats {
        samples_total: plan.total_samples(),
        frames_written,
        video,
    })
}

/// Push every sampled frame into `sink`, returning how many were pushed.
///
/// Frames are dropped as soon as they are written, so memory stays flat for long animations.
pub fn drain_into<I>(frames: I, sink: &mut dyn FrameSink) -> ConvertResult<u64>
where
    I: IntoIterator<Item = ConvertResult<RenderedFrame>>,
{
    let frames = frames.into_iter();
    sink.begin(frames.size_hint().1.unwrap_or(0) as u64)?;
    let mut pushed = 0u64;
    for frame in frames {
        sink.push_frame(&frame?)?;
        pushed += 1;
    }
    sink.end()?;
    Ok(pushed)
}

/// Disposes the wrapped host when the pipeline unwinds early.
struct HostGuard<H: RenderHost>(H);

impl<H: RenderHost> Drop for HostGuard<H> {
    fn drop(&mut self) {
        if let Err(e) = self.0.dispose() {
            tracing::warn!("render host dispose failed: {e}");
        }
    }
}
