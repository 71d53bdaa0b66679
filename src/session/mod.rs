//! End-to-end conversion runs.

pub(crate) mod convert;
