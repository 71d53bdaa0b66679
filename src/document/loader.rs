use crate::foundation::core::{Oversample, SamplePlan};
use crate::foundation::error::{ConvertError, ConvertResult};
use serde::Deserialize;
use std::path::Path;

/// Required playback range, read from the document's `ip`/`op` keys.
#[derive(Debug, Deserialize)]
struct RangeHeader {
    #[serde(rename = "ip")]
    in_point: f64,
    #[serde(rename = "op")]
    out_point: f64,
}

/// A parsed Lottie animation document.
///
/// The scene graph itself stays opaque (`raw`) and is handed to the playback engine untouched.
/// Only the playable range is required; frame rate, size and name are picked up when present.
/// Immutable once loaded.
#[derive(Debug, Clone)]
pub struct AnimationDocument {
    raw: serde_json::Value,
    in_point: f64,
    out_point: f64,
    frame_rate: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
    name: Option<String>,
}

impl AnimationDocument {
    /// Read and parse a document from disk.
    ///
    /// Any read failure (missing file, permissions, a directory) is [`ConvertError::NotFound`];
    /// everything after the bytes are in hand is [`ConvertError::MalformedDocument`].
    pub fn from_path(path: impl AsRef<Path>) -> ConvertResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| ConvertError::not_found(path, e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Parse a document from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> ConvertResult<Self> {
        let raw: serde_json::Value = serde_json::from_reader(r)
            .map_err(|e| ConvertError::malformed(format!("parse animation JSON: {e}")))?;
        Self::from_value(raw)
    }

    /// Parse a document from JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> ConvertResult<Self> {
        let raw: serde_json::Value = serde_json::from_slice(bytes)
            .map_err(|e| ConvertError::malformed(format!("parse animation JSON: {e}")))?;
        Self::from_value(raw)
    }

    /// Wrap an already-parsed JSON value, checking the playable range.
    pub fn from_value(raw: serde_json::Value) -> ConvertResult<Self> {
        if !raw.is_object() {
            return Err(ConvertError::malformed(
                "animation document must be a JSON object",
            ));
        }

        let range = RangeHeader::deserialize(&raw)
            .map_err(|e| ConvertError::malformed(format!("read in/out points: {e}")))?;
        // Reject up front so a bad range never reaches rendering.
        SamplePlan::new(range.in_point, range.out_point, Oversample::DEFAULT)?;

        let number = |key: &str| {
            raw.get(key)
                .and_then(serde_json::Value::as_f64)
                .filter(|v| v.is_finite() && *v > 0.0)
        };
        let frame_rate = number("fr");
        let width = number("w");
        let height = number("h");
        let name = raw
            .get("nm")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned);

        Ok(Self {
            in_point: range.in_point,
            out_point: range.out_point,
            frame_rate,
            width,
            height,
            name,
            raw,
        })
    }

    /// First frame of the playable range (native units).
    pub fn in_point(&self) -> f64 {
        self.in_point
    }

    /// One-past-last frame of the playable range (native units).
    pub fn out_point(&self) -> f64 {
        self.out_point
    }

    /// Declared native frame rate (`fr`), if present and positive.
    pub fn frame_rate(&self) -> Option<f64> {
        self.frame_rate
    }

    pub fn width(&self) -> Option<f64> {
        self.width
    }

    pub fn height(&self) -> Option<f64> {
        self.height
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The full document as parsed.
    pub fn raw(&self) -> &serde_json::Value {
        &self.raw
    }

    /// Sample plan for this document's range at `oversample` samples per frame.
    pub fn sample_plan(&self, oversample: Oversample) -> ConvertResult<SamplePlan> {
        SamplePlan::new(self.in_point, self.out_point, oversample)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/loader.rs"]
mod tests;
