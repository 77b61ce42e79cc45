//! Viewport capability of the rendering surface.

use std::fmt;

use iqraa_dom::NodeRef;

/// Vertical extent of an element relative to the top of the viewport, in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub bottom: f64,
}

impl Rect {
    /// Rect starting at `top` with the given height.
    #[must_use]
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            bottom: top + height,
        }
    }
}

/// What the rendering surface can tell about element visibility.
///
/// Surfaces without layout (a static file on disk) use [`NoViewport`], which
/// turns every deferred element into an eager activation.
pub trait ViewportHost {
    /// Whether the surface can report viewport intersections.
    fn supports_intersection(&self) -> bool;

    /// Height of the visible viewport, `None` if unknown.
    fn viewport_height(&self) -> Option<f64>;

    /// Current position of `element`, `None` if it has no layout.
    fn element_rect(&self, element: &NodeRef) -> Option<Rect>;
}

/// Surface without any viewport observation capability.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoViewport;

impl ViewportHost for NoViewport {
    fn supports_intersection(&self) -> bool {
        false
    }

    fn viewport_height(&self) -> Option<f64> {
        None
    }

    fn element_rect(&self, _element: &NodeRef) -> Option<Rect> {
        None
    }
}

/// Default look-ahead below and above the viewport.
pub const DEFAULT_ROOT_MARGIN_PX: f64 = 600.0;

/// Amount by which the viewport is grown before intersection tests.
///
/// Only the vertical axis is expanded; displays as a CSS margin (`600px 0px`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootMargin {
    vertical: f64,
}

impl RootMargin {
    /// Margin growing the viewport by `px` at top and bottom.
    #[must_use]
    pub fn vertical(px: f64) -> Self {
        Self { vertical: px }
    }

    /// Whether `rect` touches the viewport of `viewport_height` grown by this margin.
    #[must_use]
    pub fn intersects(&self, rect: Rect, viewport_height: f64) -> bool {
        rect.bottom >= -self.vertical && rect.top <= viewport_height + self.vertical
    }
}

impl Default for RootMargin {
    fn default() -> Self {
        Self::vertical(DEFAULT_ROOT_MARGIN_PX)
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px 0px", self.vertical)
    }
}
