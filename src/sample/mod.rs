//! Frame sampling: drives a render host across the document's time range.

pub(crate) mod sampler;
