//! Deferred media activation.
//!
//! Pages ship images, frames and background images with their real source in a
//! `data-*` attribute so nothing is fetched up front. This crate promotes those
//! sources once an element comes close to the viewport, or right away when the
//! rendering surface cannot observe the viewport at all.
//!
//! - [`ViewportHost`] / [`NoViewport`]: what the surface can report
//! - [`ViewportObserver`]: the page's single intersection watcher
//! - [`LazyMediaActivator`]: scans a scope, observes and activates
//! - [`activate`]: the one-shot per-element promotion

mod activation;
mod activator;
mod observer;
mod viewport;

pub use activation::{
    BACKGROUND_SELECTOR, FRAME_SELECTOR, IMAGE_SELECTOR, LOADED_ATTR, MediaKind, activate,
    is_loaded, looks_like_placeholder,
};
pub use activator::{
    ActivationStats, DEFAULT_FALLBACK_VIEWPORT_HEIGHT, DEFAULT_NEAR_VIEWPORT_PX,
    LazyMediaActivator, MediaSettings,
};
pub use observer::ViewportObserver;
pub use viewport::{DEFAULT_ROOT_MARGIN_PX, NoViewport, Rect, RootMargin, ViewportHost};
