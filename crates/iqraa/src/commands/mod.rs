//! CLI command implementations.

pub(crate) mod markers;
pub(crate) mod render;

pub(crate) use markers::MarkersArgs;
pub(crate) use render::RenderArgs;
