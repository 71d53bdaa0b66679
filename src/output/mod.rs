//! Frame persistence.

pub(crate) mod sink;
