//! Shared viewport observer.

use iqraa_dom::{NodeExt, NodeRef};

use crate::viewport::{RootMargin, ViewportHost};

/// Set of elements waiting to enter the margin-expanded viewport.
///
/// An element is reported at most once: [`ViewportObserver::take_intersecting`]
/// stops watching every element it returns.
#[derive(Debug, Default)]
pub struct ViewportObserver {
    margin: RootMargin,
    watched: Vec<NodeRef>,
}

impl ViewportObserver {
    /// Create an observer with the given root margin.
    #[must_use]
    pub fn new(margin: RootMargin) -> Self {
        Self {
            margin,
            watched: Vec::new(),
        }
    }

    /// The configured root margin.
    #[must_use]
    pub fn margin(&self) -> RootMargin {
        self.margin
    }

    /// Start watching `element`.
    ///
    /// Returns `false` if the element was already watched.
    pub fn observe(&mut self, element: &NodeRef) -> bool {
        if self.is_observing(element) {
            return false;
        }
        self.watched.push(element.clone());
        true
    }

    /// Stop watching `element`.
    pub fn unobserve(&mut self, element: &NodeRef) {
        self.watched.retain(|watched| watched != element);
    }

    /// Whether `element` is being watched.
    #[must_use]
    pub fn is_observing(&self, element: &NodeRef) -> bool {
        self.watched.iter().any(|watched| watched == element)
    }

    /// Number of watched elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.watched.len()
    }

    /// Whether nothing is watched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.watched.is_empty()
    }

    /// Remove and return watched elements that now intersect.
    ///
    /// Elements removed from the document are dropped silently.
    pub fn take_intersecting(
        &mut self,
        host: &dyn ViewportHost,
        viewport_height: f64,
    ) -> Vec<NodeRef> {
        let mut intersecting = Vec::new();
        let margin = self.margin;
        self.watched.retain(|element| {
            if !element.is_attached() {
                return false;
            }
            let hit = host
                .element_rect(element)
                .is_some_and(|rect| margin.intersects(rect, viewport_height));
            if hit {
                intersecting.push(element.clone());
            }
            !hit
        });
        intersecting
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::Rect;
    use iqraa_dom::Document;

    struct Fixed(f64);

    impl ViewportHost for Fixed {
        fn supports_intersection(&self) -> bool {
            true
        }

        fn viewport_height(&self) -> Option<f64> {
            Some(800.0)
        }

        fn element_rect(&self, _element: &NodeRef) -> Option<Rect> {
            Some(Rect::new(self.0, 100.0))
        }
    }

    #[test]
    fn test_observe_once() {
        let doc = Document::parse("<img>");
        let img = doc.query_first("img").unwrap().unwrap();
        let mut observer = ViewportObserver::default();
        assert!(observer.observe(&img));
        assert!(!observer.observe(&img));
        assert_eq!(observer.len(), 1);
        observer.unobserve(&img);
        assert!(observer.is_empty());
    }

    #[test]
    fn test_take_intersecting_unobserves() {
        let doc = Document::parse("<img>");
        let img = doc.query_first("img").unwrap().unwrap();
        let mut observer = ViewportObserver::new(RootMargin::vertical(0.0));
        observer.observe(&img);

        assert!(observer.take_intersecting(&Fixed(900.0), 800.0).is_empty());
        assert!(observer.is_observing(&img));

        let hits = observer.take_intersecting(&Fixed(700.0), 800.0);
        assert_eq!(hits.len(), 1);
        assert!(observer.is_empty());
        assert!(observer.take_intersecting(&Fixed(700.0), 800.0).is_empty());
    }

    #[test]
    fn test_detached_elements_dropped() {
        let doc = Document::parse("<div><img></div>");
        let img = doc.query_first("img").unwrap().unwrap();
        let mut observer = ViewportObserver::default();
        observer.observe(&img);
        img.detach();
        assert!(observer.take_intersecting(&Fixed(0.0), 800.0).is_empty());
        assert!(observer.is_empty());
    }
}
