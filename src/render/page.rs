//! Scripts evaluated inside the browser page.
//!
//! The page starts blank. The playback library is evaluated first so it registers its global
//! player, then [`mount_script`] creates the container and loads the animation into it.

use crate::document::loader::AnimationDocument;
use crate::foundation::error::{ConvertError, ConvertResult};
use std::path::{Path, PathBuf};

/// Element id of the container the player renders into.
pub const CONTAINER_ID: &str = "animation";

/// Resolves once the engine has built its DOM (`DOMLoaded`), rejects on `data_failed`.
pub const LOADED_SCRIPT: &str = r#"new Promise(function (resolve, reject) {
  var anim = window.animation;
  if (anim.isLoaded) { resolve(true); return; }
  anim.addEventListener('DOMLoaded', function () { resolve(true); });
  anim.addEventListener('data_failed', function () { reject(new Error('animation data failed to load')); });
})"#;

/// Resolves on the next paint of the page.
pub const SETTLE_SCRIPT: &str =
    "new Promise(function (resolve) { requestAnimationFrame(function () { resolve(true); }); })";

/// Source of the lottie-web player build that provides the SVG renderer.
#[derive(Clone, Debug)]
pub struct PlaybackLibrary {
    source: String,
    origin: Option<PathBuf>,
}

impl PlaybackLibrary {
    /// Read the player script from disk.
    pub fn from_path(path: impl AsRef<Path>) -> ConvertResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            ConvertError::render(format!(
                "load playback library '{}': {e}",
                path.display()
            ))
        })?;
        Ok(Self {
            source,
            origin: Some(path.to_path_buf()),
        })
    }

    /// Use an in-memory player script.
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            origin: None,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// File the script was read from, if any.
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }
}

/// Script that mounts the container and loads `doc` into a paused, non-looping SVG player.
pub fn mount_script(doc: &AnimationDocument) -> ConvertResult<String> {
    let data = serde_json::to_string(doc.raw())
        .map_err(|e| ConvertError::render(format!("serialize animation data: {e}")))?;
    Ok(format!(
        r#"(function () {{
  var player = window.bodymovin || window.lottie;
  if (!player) {{ throw new Error('playback library did not register a global player'); }}
  var container = document.createElement('div');
  container.id = '{CONTAINER_ID}';
  document.body.appendChild(container);
  window.animation = player.loadAnimation({{
    container: container,
    renderer: 'svg',
    loop: false,
    autoplay: false,
    animationData: {data}
  }});
  window.animation.setSubframe(true);
  return true;
}})()"#
    ))
}

/// Script that seeks to `frame` (relative to the in-point) and forces a synchronous redraw.
pub fn seek_script(frame: f64) -> String {
    format!(
        "(function () {{ var a = window.animation; a.goToAndStop({frame}, true); a.renderFrame(); return true; }})()"
    )
}

/// Script returning the container's serialized markup.
pub fn capture_script() -> String {
    format!("document.getElementById('{CONTAINER_ID}').innerHTML")
}

#[cfg(test)]
#[path = "../../tests/unit/render/page.rs"]
mod tests;
