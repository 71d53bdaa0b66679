use crate::foundation::core::SampleTime;
use crate::foundation::error::ConvertResult;

/// An isolated environment running one playback instance of an animation.
///
/// The host is stateful: every seek overwrites the previously rendered scene, so exactly one
/// caller may drive it at a time. The pipeline enforces this by owning the host and lending it
/// only to the [`crate::FrameSampler`].
pub trait RenderHost {
    /// Move playback to `time`, redraw synchronously, and block until the host has painted.
    ///
    /// Ordering contract: seek, then forced redraw, then wait for the next paint. Returning
    /// earlier risks capturing a stale or half-updated scene.
    fn seek_and_settle(&mut self, time: SampleTime) -> ConvertResult<()>;

    /// Serialized vector markup of the animation container as currently rendered.
    fn capture_markup(&mut self) -> ConvertResult<String>;

    /// Tear down the rendering context.
    ///
    /// Must be idempotent. Implementations also release their resources on `Drop`, so error
    /// paths that never reach `dispose` still clean up.
    fn dispose(&mut self) -> ConvertResult<()> {
        Ok(())
    }
}
