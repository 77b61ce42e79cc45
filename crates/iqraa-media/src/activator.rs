//! Scope-level lazy media activation.

use std::ops::AddAssign;

use iqraa_dom::{DomError, NodeExt, NodeRef};

use crate::activation::{
    BACKGROUND_SELECTOR, FRAME_SELECTOR, IMAGE_SELECTOR, activate, awaits_source, is_loaded,
};
use crate::observer::ViewportObserver;
use crate::viewport::{RootMargin, ViewportHost};

/// Default distance below the viewport within which images load immediately.
pub const DEFAULT_NEAR_VIEWPORT_PX: f64 = 300.0;

/// Viewport height assumed when the surface does not report one.
pub const DEFAULT_FALLBACK_VIEWPORT_HEIGHT: f64 = 800.0;

/// Tuning for [`LazyMediaActivator`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MediaSettings {
    /// Look-ahead applied to viewport intersection.
    pub root_margin: RootMargin,
    /// Fast-path distance below the viewport.
    pub near_viewport_px: f64,
    /// Viewport height used when the surface reports none.
    pub fallback_viewport_height: f64,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            root_margin: RootMargin::default(),
            near_viewport_px: DEFAULT_NEAR_VIEWPORT_PX,
            fallback_viewport_height: DEFAULT_FALLBACK_VIEWPORT_HEIGHT,
        }
    }
}

/// Counts from one [`LazyMediaActivator::activate`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActivationStats {
    /// Elements activated during the call.
    pub activated: usize,
    /// Elements newly handed to the viewport observer.
    pub observed: usize,
}

impl AddAssign for ActivationStats {
    fn add_assign(&mut self, other: Self) {
        self.activated += other.activated;
        self.observed += other.observed;
    }
}

/// Activates deferred images, frames and backgrounds.
///
/// Holds the page's single viewport observer, created on first use. Surfaces
/// report scrolling through [`LazyMediaActivator::on_viewport_change`].
///
/// # Example
///
/// ```
/// use iqraa_dom::{Document, NodeExt};
/// use iqraa_media::{LazyMediaActivator, NoViewport};
///
/// let doc = Document::parse(r#"<img data-src="a.jpg">"#);
/// let mut activator = LazyMediaActivator::default();
/// let stats = activator.activate(doc.root(), &NoViewport).unwrap();
/// assert_eq!(stats.activated, 1);
/// let img = doc.query_first("img").unwrap().unwrap();
/// assert_eq!(img.attr("src").as_deref(), Some("a.jpg"));
/// ```
#[derive(Debug, Default)]
pub struct LazyMediaActivator {
    settings: MediaSettings,
    observer: Option<ViewportObserver>,
}

impl LazyMediaActivator {
    /// Create an activator with the given settings.
    #[must_use]
    pub fn new(settings: MediaSettings) -> Self {
        Self {
            settings,
            observer: None,
        }
    }

    /// The active settings.
    #[must_use]
    pub fn settings(&self) -> &MediaSettings {
        &self.settings
    }

    /// The shared observer, once created.
    #[must_use]
    pub fn observer(&self) -> Option<&ViewportObserver> {
        self.observer.as_ref()
    }

    /// Find deferred media at or under `scope` and activate or observe it.
    ///
    /// Without intersection support every candidate is activated now.
    /// Otherwise candidates are observed and images that still show a
    /// placeholder within the near-viewport band are activated immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if a candidate selector fails to compile.
    pub fn activate(
        &mut self,
        scope: &NodeRef,
        host: &dyn ViewportHost,
    ) -> Result<ActivationStats, DomError> {
        let images = scope.query_all(IMAGE_SELECTOR)?;
        let frames = scope.query_all(FRAME_SELECTOR)?;
        let backgrounds = scope.query_all(BACKGROUND_SELECTOR)?;
        let mut stats = ActivationStats::default();

        if !host.supports_intersection() {
            for element in images.iter().chain(&frames).chain(&backgrounds) {
                if activate(element) {
                    stats.activated += 1;
                }
            }
            tracing::debug!(activated = stats.activated, "Activated media eagerly");
            return Ok(stats);
        }

        let band = self.viewport_height(host) + self.settings.near_viewport_px;
        let margin = self.settings.root_margin;
        let observer = self.observer.get_or_insert_with(|| {
            tracing::debug!(%margin, "Created viewport observer");
            ViewportObserver::new(margin)
        });
        for element in images.iter().chain(&frames).chain(&backgrounds) {
            if !is_loaded(element) && observer.observe(element) {
                stats.observed += 1;
            }
        }

        for image in &images {
            if is_loaded(image) || !awaits_source(image) {
                continue;
            }
            let near = host.element_rect(image).is_some_and(|rect| rect.top < band);
            if near && activate(image) {
                observer.unobserve(image);
                stats.activated += 1;
            }
        }

        tracing::debug!(
            activated = stats.activated,
            observed = stats.observed,
            "Registered deferred media"
        );
        Ok(stats)
    }

    /// Activate every observed element that now intersects the viewport.
    ///
    /// Returns the number of elements activated.
    pub fn on_viewport_change(&mut self, host: &dyn ViewportHost) -> usize {
        let height = self.viewport_height(host);
        let Some(observer) = self.observer.as_mut() else {
            return 0;
        };
        observer
            .take_intersecting(host, height)
            .iter()
            .filter(|element| activate(element))
            .count()
    }

    fn viewport_height(&self, host: &dyn ViewportHost) -> f64 {
        host.viewport_height()
            .unwrap_or(self.settings.fallback_viewport_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::{NoViewport, Rect};
    use iqraa_dom::Document;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    /// Surface laying out elements by `id`; elements without a known id have no layout.
    struct FakeHost {
        height: Option<f64>,
        tops: HashMap<&'static str, f64>,
    }

    impl FakeHost {
        fn new(tops: &[(&'static str, f64)]) -> Self {
            Self {
                height: Some(800.0),
                tops: tops.iter().copied().collect(),
            }
        }

        fn scroll_by(&mut self, dy: f64) {
            for top in self.tops.values_mut() {
                *top -= dy;
            }
        }
    }

    impl ViewportHost for FakeHost {
        fn supports_intersection(&self) -> bool {
            true
        }

        fn viewport_height(&self) -> Option<f64> {
            self.height
        }

        fn element_rect(&self, element: &NodeRef) -> Option<Rect> {
            let id = element.attr("id")?;
            self.tops.get(id.as_str()).map(|top| Rect::new(*top, 100.0))
        }
    }

    const PAGE: &str = concat!(
        r#"<div class="post-body">"#,
        r#"<img id="near" src="data:image/gif;base64,AA" data-src="near.jpg">"#,
        r#"<img id="far" data-src="far.jpg">"#,
        r#"<iframe id="frame" data-src="https://x.test/a.pdf"></iframe>"#,
        r#"<div id="bg" data-bg="bg.png"></div>"#,
        "</div>"
    );

    fn get(doc: &Document, id: &str) -> NodeRef {
        doc.query_first(&format!("#{id}")).unwrap().unwrap()
    }

    #[test]
    fn test_eager_without_viewport() {
        let doc = Document::parse(PAGE);
        let mut activator = LazyMediaActivator::default();

        let stats = activator.activate(doc.root(), &NoViewport).unwrap();
        assert_eq!(stats.activated, 4);
        assert!(activator.observer().is_none());

        let html = doc.to_html();
        for deferred in ["data-src", "data-srcset", "data-lazy-src", "data-bg", "data-background"] {
            assert!(!html.contains(deferred), "{deferred} left in {html}");
        }
        assert_eq!(get(&doc, "far").attr("src").as_deref(), Some("far.jpg"));
        assert_eq!(
            get(&doc, "frame").attr("src").as_deref(),
            Some("https://x.test/a.pdf")
        );
    }

    #[test]
    fn test_overlapping_scopes_activate_once() {
        let doc = Document::parse(PAGE);
        let scope = doc.query_first(".post-body").unwrap().unwrap();
        let mut activator = LazyMediaActivator::default();

        assert_eq!(activator.activate(&scope, &NoViewport).unwrap().activated, 4);
        assert_eq!(
            activator.activate(doc.root(), &NoViewport).unwrap(),
            ActivationStats::default()
        );
    }

    #[test]
    fn test_fast_path_and_observation() {
        let doc = Document::parse(PAGE);
        let host = FakeHost::new(&[("near", 900.0), ("far", 3000.0), ("frame", 200.0), ("bg", 5000.0)]);
        let mut activator = LazyMediaActivator::default();

        let stats = activator.activate(doc.root(), &host).unwrap();
        assert_eq!(stats.observed, 4);
        assert_eq!(stats.activated, 1);
        assert_eq!(get(&doc, "near").attr("src").as_deref(), Some("near.jpg"));
        assert!(get(&doc, "far").attr("src").is_none());
        // Frames only load through the observer callback.
        assert!(get(&doc, "frame").attr("src").is_none());

        let observer = activator.observer().unwrap();
        assert_eq!(observer.len(), 3);
        assert!(!observer.is_observing(&get(&doc, "near")));
    }

    #[test]
    fn test_viewport_change_uses_margin() {
        let doc = Document::parse(PAGE);
        let mut host = FakeHost::new(&[("near", 5000.0), ("far", 3000.0), ("frame", 200.0), ("bg", 1500.0)]);
        let mut activator = LazyMediaActivator::default();
        activator.activate(doc.root(), &host).unwrap();

        assert_eq!(activator.on_viewport_change(&host), 1);
        assert_eq!(
            get(&doc, "frame").attr("src").as_deref(),
            Some("https://x.test/a.pdf")
        );

        // bg top 1500 - 200 = 1300, inside 800 + 600.
        host.scroll_by(200.0);
        assert_eq!(activator.on_viewport_change(&host), 1);
        assert!(get(&doc, "bg").attr("style").is_some());
        assert!(get(&doc, "far").attr("src").is_none());

        host.scroll_by(2000.0);
        assert_eq!(activator.on_viewport_change(&host), 1);
        assert_eq!(get(&doc, "far").attr("src").as_deref(), Some("far.jpg"));
        assert_eq!(activator.on_viewport_change(&host), 0);

        host.scroll_by(1500.0);
        assert_eq!(activator.on_viewport_change(&host), 1);
        assert!(activator.observer().unwrap().is_empty());
    }

    #[test]
    fn test_single_shared_observer() {
        let doc = Document::parse(PAGE);
        let host = FakeHost::new(&[]);
        let mut activator = LazyMediaActivator::default();

        assert_eq!(activator.activate(doc.root(), &host).unwrap().observed, 4);
        let again = activator.activate(doc.root(), &host).unwrap();
        assert_eq!(again.observed, 0);
        assert_eq!(activator.observer().unwrap().len(), 4);
    }

    #[test]
    fn test_fallback_viewport_height() {
        let doc = Document::parse(r#"<img id="near" data-src="a.jpg">"#);
        let mut host = FakeHost::new(&[("near", 1050.0)]);
        host.height = None;
        let mut activator = LazyMediaActivator::default();

        assert_eq!(activator.activate(doc.root(), &host).unwrap().activated, 1);
    }

    #[test]
    fn test_fast_path_skips_loaded_source() {
        let doc = Document::parse(r#"<img id="real" src="real.jpg" data-src="other.jpg">"#);
        let host = FakeHost::new(&[("real", 0.0)]);
        let mut activator = LazyMediaActivator::default();

        assert_eq!(activator.activate(doc.root(), &host).unwrap().activated, 0);
        assert_eq!(activator.on_viewport_change(&host), 1);
        assert_eq!(get(&doc, "real").attr("src").as_deref(), Some("real.jpg"));
    }
}
