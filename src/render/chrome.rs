use crate::document::loader::AnimationDocument;
use crate::foundation::core::SampleTime;
use crate::foundation::error::{ConvertError, ConvertResult};
use crate::render::host::RenderHost;
use crate::render::page::{
    LOADED_SCRIPT, PlaybackLibrary, SETTLE_SCRIPT, capture_script, mount_script, seek_script,
};
use headless_chrome::protocol::cdp::Runtime;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Options for launching the headless browser.
#[derive(Clone, Debug)]
pub struct BrowserOpts {
    /// Chromium/Chrome binary. `None` lets `headless_chrome` search the usual locations.
    pub executable: Option<PathBuf>,
    /// Run Chromium with its sandbox (often has to be off inside containers).
    pub sandbox: bool,
    /// Upper bound for any single page evaluation (load, seek, settle, capture).
    pub eval_timeout: Duration,
    /// Browser is shut down after this long without CDP traffic.
    pub idle_timeout: Duration,
}

impl Default for BrowserOpts {
    fn default() -> Self {
        Self {
            executable: None,
            sandbox: true,
            eval_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(120),
        }
    }
}

/// [`RenderHost`] backed by a headless Chromium tab running lottie-web's SVG renderer.
///
/// The browser process is owned by the host and killed when the host is disposed or dropped.
pub struct ChromeRenderHost {
    tab: Option<Arc<Tab>>,
    browser: Option<Browser>,
    in_point: f64,
}

impl ChromeRenderHost {
    /// Launch a browser, load `library` into a blank page, and mount `doc` into a paused player.
    pub fn launch(
        doc: &AnimationDocument,
        library: &PlaybackLibrary,
        opts: &BrowserOpts,
    ) -> ConvertResult<Self> {
        let launch = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(opts.sandbox)
            .path(opts.executable.clone())
            .idle_browser_timeout(opts.idle_timeout)
            .build()
            .map_err(|e| ConvertError::render(format!("invalid browser launch options: {e}")))?;

        let browser = Browser::new(launch).map_err(|e| {
            ConvertError::render(format!(
                "failed to launch headless browser (is Chromium installed?): {e}"
            ))
        })?;

        // From here on `Drop` owns cleanup of the browser process.
        let mut host = Self {
            tab: None,
            browser: Some(browser),
            in_point: doc.in_point(),
        };
        host.initialize(doc, library, opts)?;
        Ok(host)
    }

    fn initialize(
        &mut self,
        doc: &AnimationDocument,
        library: &PlaybackLibrary,
        opts: &BrowserOpts,
    ) -> ConvertResult<()> {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| ConvertError::render("browser already disposed"))?;
        let tab = browser
            .new_tab()
            .map_err(|e| ConvertError::render(format!("open browser tab: {e}")))?;
        tab.set_default_timeout(opts.eval_timeout);
        tab.navigate_to("about:blank")
            .and_then(|t| t.wait_until_navigated())
            .map_err(|e| ConvertError::render(format!("open blank page: {e}")))?;
        self.tab = Some(tab);

        tracing::debug!(
            library = ?library.origin(),
            bytes = library.source().len(),
            "loading playback library"
        );
        self.eval(library.source(), false)?;
        self.eval(&mount_script(doc)?, false)?;
        self.eval(LOADED_SCRIPT, true)?;
        Ok(())
    }

    fn tab(&self) -> ConvertResult<&Arc<Tab>> {
        self.tab
            .as_ref()
            .ok_or_else(|| ConvertError::render("render host is not initialized or was disposed"))
    }

    fn eval(&self, script: &str, await_promise: bool) -> ConvertResult<Option<serde_json::Value>> {
        let returned = self
            .tab()?
            .call_method(Runtime::Evaluate {
                expression: script.to_string(),
                return_by_value: Some(true),
                generate_preview: Some(false),
                silent: Some(false),
                await_promise: Some(await_promise),
                include_command_line_api: Some(false),
                user_gesture: Some(false),
                object_group: None,
                context_id: None,
                throw_on_side_effect: None,
                timeout: None,
                disable_breaks: None,
                repl_mode: None,
                allow_unsafe_eval_blocked_by_csp: None,
                unique_context_id: None,
                serialization_options: None,
            })
            .map_err(|e| ConvertError::render(format!("page evaluation failed: {e}")))?;
        evaluation_value(returned)
    }

    fn release(&mut self) -> ConvertResult<()> {
        let closed = match self.tab.take() {
            Some(tab) => tab
                .close(false)
                .map(|_| ())
                .map_err(|e| ConvertError::render(format!("close browser tab: {e}"))),
            None => Ok(()),
        };
        // Dropping the browser kills the process.
        if self.browser.take().is_some() {
            tracing::debug!("headless browser released");
        }
        closed
    }
}

/// Value of a completed evaluation. A thrown exception or rejected promise is a render error.
pub(crate) fn evaluation_value(
    returned: Runtime::EvaluateReturnObject,
) -> ConvertResult<Option<serde_json::Value>> {
    match returned.exception_details {
        None => Ok(returned.result.value),
        Some(details) => {
            let thrown = details
                .exception
                .and_then(|e| e.description)
                .unwrap_or(details.text);
            Err(ConvertError::render(format!(
                "page script threw at {}:{}: {thrown}",
                details.line_number, details.column_number
            )))
        }
    }
}

impl RenderHost for ChromeRenderHost {
    fn seek_and_settle(&mut self, time: SampleTime) -> ConvertResult<()> {
        // The engine counts frames from the document's in-point.
        self.eval(&seek_script(time.0 - self.in_point), false)?;
        self.eval(SETTLE_SCRIPT, true)?;
        Ok(())
    }

    fn capture_markup(&mut self) -> ConvertResult<String> {
        match self.eval(&capture_script(), false)? {
            Some(serde_json::Value::String(markup)) => Ok(markup),
            other => Err(ConvertError::render(format!(
                "animation container returned no markup (got {other:?})"
            ))),
        }
    }

    fn dispose(&mut self) -> ConvertResult<()> {
        self.release()
    }
}

impl Drop for ChromeRenderHost {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            tracing::warn!("render host cleanup failed: {e}");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/chrome.rs"]
mod tests;
