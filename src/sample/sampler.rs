use crate::foundation::cancel::CancelToken;
use crate::foundation::core::{SampleIndex, SamplePlan, SampleTime};
use crate::foundation::error::{ConvertError, ConvertResult};
use crate::render::host::RenderHost;
use std::iter::FusedIterator;

/// Markup captured for one sample. Held only until it is written.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedFrame {
    /// Position within the run; also the output file stem.
    pub index: SampleIndex,
    /// Document time the host was seeked to.
    pub time: SampleTime,
    /// Serialized SVG markup of the animation container.
    pub markup: String,
}

/// Lazily renders every sample of a [`SamplePlan`] in increasing index order.
///
/// Each `next()` checks the cancel token, seeks the host, waits for it to settle, and
/// captures markup. The first error (including cancellation) is yielded once and ends the
/// sequence. Not restartable: the host's playback position moves as the sampler is consumed.
pub struct FrameSampler<'h, H: RenderHost + ?Sized> {
    plan: SamplePlan,
    host: &'h mut H,
    cancel: CancelToken,
    next: u64,
    done: bool,
}

impl<'h, H: RenderHost + ?Sized> FrameSampler<'h, H> {
    pub fn new(plan: SamplePlan, host: &'h mut H, cancel: CancelToken) -> Self {
        Self {
            plan,
            host,
            cancel,
            next: 0,
            done: false,
        }
    }

    /// Samples successfully captured so far.
    pub fn completed(&self) -> u64 {
        self.next
    }

    fn render(&mut self, idx: SampleIndex) -> ConvertResult<RenderedFrame> {
        let time = self.plan.time_at(idx);
        tracing::debug!(index = idx.0, time = time.0, "sampling frame");
        self.host.seek_and_settle(time)?;
        let markup = self.host.capture_markup()?;
        Ok(RenderedFrame {
            index: idx,
            time,
            markup,
        })
    }
}

impl<H: RenderHost + ?Sized> Iterator for FrameSampler<'_, H> {
    type Item = ConvertResult<RenderedFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.next >= self.plan.total_samples() {
            return None;
        }

        if self.cancel.is_cancelled() {
            self.done = true;
            tracing::warn!(completed = self.next, "conversion cancelled");
            return Some(Err(ConvertError::Cancelled {
                completed: self.next,
            }));
        }

        match self.render(SampleIndex(self.next)) {
            Ok(frame) => {
                self.next += 1;
                Some(Ok(frame))
            }
            Err(e) => {
                self.done = true;
                // SIGINT also reaches the browser, failing the in-flight call.
                if self.cancel.is_cancelled() {
                    tracing::warn!(completed = self.next, "conversion cancelled: {e}");
                    return Some(Err(ConvertError::Cancelled {
                        completed: self.next,
                    }));
                }
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let left = self.plan.total_samples().saturating_sub(self.next);
        let left = usize::try_from(left).unwrap_or(usize::MAX);
        // An error or cancellation can end the sequence early.
        (0, Some(left))
    }
}

impl<H: RenderHost + ?Sized> FusedIterator for FrameSampler<'_, H> {}

#[cfg(test)]
#[path = "../../tests/unit/sample/sampler.rs"]
mod tests;
