use crate::foundation::core::Oversample;
use crate::foundation::error::{ConvertError, ConvertResult};
use crate::output::sink::FRAME_EXTENSION;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Output frame rate of the assembled video.
pub const DEFAULT_OUTPUT_FPS: u32 = 60;
/// Native rate assumed when the document declares none.
pub const DEFAULT_NATIVE_FPS: f64 = 60.0;
/// Square output frame edge in pixels.
pub const DEFAULT_FRAME_SIZE: u32 = 512;
/// File name of the assembled video inside the output directory.
pub const DEFAULT_VIDEO_FILE_NAME: &str = "out.mp4";

/// Parameters for turning a directory of `<index>.svg` frames into one video.
///
/// The input rate is `oversample × native_fps`, so the oversampled stream plays back at the
/// document's own speed, and ffmpeg resamples it to `output_fps`.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodeParams {
    /// Frames per second of the oversampled input sequence.
    pub input_fps: f64,
    /// Frames per second of the produced video.
    pub output_fps: u32,
    /// Output width and height in pixels.
    pub size: u32,
    /// ffmpeg video codec.
    pub codec: String,
    /// Replace an existing output file.
    pub overwrite: bool,
    /// Output file name, placed next to the frames.
    pub out_file_name: String,
}

impl EncodeParams {
    /// Defaults for an oversampled stream of a `native_fps` document.
    pub fn new(oversample: Oversample, native_fps: f64) -> Self {
        Self {
            input_fps: f64::from(oversample.get()) * native_fps,
            output_fps: DEFAULT_OUTPUT_FPS,
            size: DEFAULT_FRAME_SIZE,
            codec: "libx264".to_string(),
            overwrite: true,
            out_file_name: DEFAULT_VIDEO_FILE_NAME.to_string(),
        }
    }

    pub fn validate(&self) -> ConvertResult<()> {
        if !self.input_fps.is_finite() || self.input_fps <= 0.0 {
            return Err(ConvertError::validation("encode input fps must be > 0"));
        }
        if self.output_fps == 0 {
            return Err(ConvertError::validation("encode output fps must be > 0"));
        }
        if self.size == 0 {
            return Err(ConvertError::validation("encode frame size must be non-zero"));
        }
        if !self.size.is_multiple_of(2) {
            // yuv420p needs even dimensions.
            return Err(ConvertError::validation(
                "encode frame size must be even (required for yuv420p mp4 output)",
            ));
        }
        if self.out_file_name.is_empty() {
            return Err(ConvertError::validation("encode output file name is empty"));
        }
        Ok(())
    }

    /// Numbered-sequence input pattern matching the frame writer's names.
    pub fn input_pattern(&self, frames_dir: &Path) -> PathBuf {
        frames_dir.join(format!("%d.{FRAME_EXTENSION}"))
    }

    pub fn out_path(&self, frames_dir: &Path) -> PathBuf {
        frames_dir.join(&self.out_file_name)
    }

    /// Full ffmpeg argument list (without the program name).
    pub fn command_args(&self, frames_dir: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        args.push(if self.overwrite { "-y" } else { "-n" }.into());
        for a in [
            "-loglevel",
            "error",
            "-framerate",
            &format_rate(self.input_fps),
            "-start_number",
            "0",
            "-i",
        ] {
            args.push(a.into());
        }
        args.push(self.input_pattern(frames_dir).into_os_string());
        for a in [
            "-r",
            &self.output_fps.to_string(),
            "-s",
            &format!("{}x{}", self.size, self.size),
            "-c:v",
            &self.codec,
            "-pix_fmt",
            "yuv420p",
        ] {
            args.push(a.into());
        }
        args.push(self.out_path(frames_dir).into_os_string());
        args
    }
}

/// Assembles the written frame sequence into a video.
pub trait VideoEncoder {
    /// Encode every `<index>.svg` in `frames_dir`, returning the produced file.
    fn encode(&mut self, frames_dir: &Path, params: &EncodeParams) -> ConvertResult<PathBuf>;
}

/// [`VideoEncoder`] that runs the system `ffmpeg` binary.
#[derive(Clone, Debug)]
pub struct FfmpegEncoder {
    program: PathBuf,
}

impl FfmpegEncoder {
    /// Use `ffmpeg` from `PATH`.
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("ffmpeg"),
        }
    }

    /// Use a specific ffmpeg binary.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoEncoder for FfmpegEncoder {
    fn encode(&mut self, frames_dir: &Path, params: &EncodeParams) -> ConvertResult<PathBuf> {
        params.validate()?;

        let out_path = params.out_path(frames_dir);
        if !params.overwrite && out_path.exists() {
            return Err(ConvertError::encoding(format!(
                "output file '{}' already exists",
                out_path.display()
            )));
        }

        if !is_program_runnable(&self.program) {
            return Err(ConvertError::encoding(format!(
                "'{}' is required for video output, but could not be run",
                self.program.display()
            )));
        }

        let args = params.command_args(frames_dir);
        tracing::info!(
            program = %self.program.display(),
            input_fps = params.input_fps,
            output_fps = params.output_fps,
            out = %out_path.display(),
            "encoding video"
        );

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                ConvertError::encoding(format!(
                    "failed to spawn '{}': {e}",
                    self.program.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConvertError::encoding(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(out_path)
    }
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    is_program_runnable(Path::new("ffmpeg"))
}

fn is_program_runnable(program: &Path) -> bool {
    Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Integer rates print without a fraction ("240"); others keep up to six decimals.
fn format_rate(fps: f64) -> String {
    if fps.fract() == 0.0 {
        return format!("{}", fps as u64);
    }
    let s = format!("{fps:.6}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
