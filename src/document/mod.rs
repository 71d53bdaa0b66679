//! Animation document loading.

pub(crate) mod loader;
