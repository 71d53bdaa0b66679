use crate::foundation::error::{ConvertError, ConvertResult};

/// Zero-based position of a sample within one conversion run.
///
/// Indices run over `[0, total_samples)` and double as the frame file name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SampleIndex(pub u64);

/// Time position in document-native frame units. Fractional under oversampling.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct SampleTime(pub f64);

/// How many samples are rendered per native frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Oversample(u32);

impl Oversample {
    /// Four samples per native frame.
    pub const DEFAULT: Self = Self(4);

    /// Create a validated factor (`factor > 0`).
    pub fn new(factor: u32) -> ConvertResult<Self> {
        if factor == 0 {
            return Err(ConvertError::validation("oversample factor must be > 0"));
        }
        Ok(Self(factor))
    }

    /// Raw factor.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for Oversample {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Mapping between sample indices and document time for one `[in_point, out_point)` range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplePlan {
    in_point: f64,
    out_point: f64,
    oversample: Oversample,
    total: u64,
}

impl SamplePlan {
    /// Build a plan for the half-open range `[in_point, out_point)`.
    ///
    /// Fails with [`ConvertError::MalformedDocument`] unless both points are finite and
    /// `out_point > in_point`. A fractional span rounds the sample count up.
    pub fn new(in_point: f64, out_point: f64, oversample: Oversample) -> ConvertResult<Self> {
        if !in_point.is_finite() || !out_point.is_finite() {
            return Err(ConvertError::malformed(
                "in-point and out-point must be finite numbers",
            ));
        }
        if out_point <= in_point {
            return Err(ConvertError::malformed(format!(
                "out-point ({out_point}) must be greater than in-point ({in_point})"
            )));
        }

        let span = (out_point - in_point) * f64::from(oversample.get());
        Ok(Self {
            in_point,
            out_point,
            oversample,
            total: span.ceil() as u64,
        })
    }

    /// Number of samples rendered for this range.
    pub fn total_samples(&self) -> u64 {
        self.total
    }

    pub fn in_point(&self) -> f64 {
        self.in_point
    }

    pub fn out_point(&self) -> f64 {
        self.out_point
    }

    pub fn oversample(&self) -> Oversample {
        self.oversample
    }

    /// Document time for `idx`: `in_point + idx / oversample`.
    pub fn time_at(&self, idx: SampleIndex) -> SampleTime {
        SampleTime(self.in_point + (idx.0 as f64) / f64::from(self.oversample.get()))
    }

    /// All indices in increasing order, each exactly once.
    pub fn indices(&self) -> impl Iterator<Item = SampleIndex> + use<> {
        (0..self.total).map(SampleIndex)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
