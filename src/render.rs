//! Render hosts: environments that play an animation and hand back its SVG markup.

pub(crate) mod chrome;
pub(crate) mod host;
pub(crate) mod page;
