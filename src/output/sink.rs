use crate::foundation::core::SampleIndex;
use crate::foundation::error::{ConvertError, ConvertResult};
use crate::sample::sampler::RenderedFrame;
use std::path::{Path, PathBuf};

/// File extension of frame snapshots.
pub const FRAME_EXTENSION: &str = "svg";

/// `<index>.svg`, unpadded decimal.
pub fn frame_file_name(idx: SampleIndex) -> String {
    format!("{}.{FRAME_EXTENSION}", idx.0)
}

/// Create `dir` and any missing parents. Succeeds if it already exists.
pub fn ensure_dir(dir: &Path) -> ConvertResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| ConvertError::write(dir, e.to_string()))
}

/// Consumer of rendered frames.
///
/// Ordering contract: `push_frame` is called in strictly increasing [`SampleIndex`] order,
/// between one `begin` and one `end`.
pub trait FrameSink {
    /// Called once before any frames are pushed, with the number of samples planned.
    fn begin(&mut self, total_samples: u64) -> ConvertResult<()>;
    /// Persist one frame.
    fn push_frame(&mut self, frame: &RenderedFrame) -> ConvertResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> ConvertResult<()>;
}

/// Writes each frame as `<index>.svg` into a directory.
///
/// The directory is created (recursively) right before the first frame lands. Files from a
/// failed run are left in place.
#[derive(Debug)]
pub struct SvgDirSink {
    dir: PathBuf,
    dir_ready: bool,
    last_idx: Option<SampleIndex>,
    written: u64,
}

impl SvgDirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            dir_ready: false,
            last_idx: None,
            written: 0,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Frames written so far.
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl FrameSink for SvgDirSink {
    fn begin(&mut self, _total_samples: u64) -> ConvertResult<()> {
        self.last_idx = None;
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, frame: &RenderedFrame) -> ConvertResult<()> {
        if let Some(last) = self.last_idx
            && frame.index <= last
        {
            return Err(ConvertError::validation(format!(
                "frame sink received out-of-order index {} after {}",
                frame.index.0, last.0
            )));
        }

        if !self.dir_ready {
            ensure_dir(&self.dir)?;
            self.dir_ready = true;
        }
        let path = self.dir.join(frame_file_name(frame.index));
        std::fs::write(&path, &frame.markup)
            .map_err(|e| ConvertError::write(&path, e.to_string()))?;

        self.last_idx = Some(frame.index);
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> ConvertResult<()> {
        tracing::debug!(dir = %self.dir.display(), written = self.written, "frame sink finished");
        Ok(())
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    total: Option<u64>,
    ended: bool,
    frames: Vec<RenderedFrame>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample count announced in `begin`, if it was called.
    pub fn total_samples(&self) -> Option<u64> {
        self.total
    }

    pub fn ended(&self) -> bool {
        self.ended
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[RenderedFrame] {
        &self.frames
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, total_samples: u64) -> ConvertResult<()> {
        self.total = Some(total_samples);
        self.ended = false;
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, frame: &RenderedFrame) -> ConvertResult<()> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn end(&mut self) -> ConvertResult<()> {
        self.ended = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/output/sink.rs"]
mod tests;
