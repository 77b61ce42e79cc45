//! Page orchestration.
//!
//! A [`Page`] owns one parsed document and everything attached to it: the
//! resolved content scope, the shortcode engine, the media activator, the
//! mutation coordinator and the widget event binder. Surfaces drive it through
//! [`Page::init`], [`Page::tick`] and the event methods.

use std::time::Duration;

use iqraa_config::Config;
use iqraa_dom::{Document, DomError, NodeExt, NodeRef, parse_fragment};
use iqraa_media::{ActivationStats, LazyMediaActivator, MediaSettings, RootMargin, ViewportHost};
use iqraa_shortcodes::{Catalog, PassStats, ShortcodeEngine, WidgetOptions};

use crate::binder::{CopyLabels, EventOutcome, UiEventBinder};
use crate::clipboard::Clipboard;
use crate::clock::{Clock, SystemClock};
use crate::coordinator::MutationCoordinator;
use crate::error::PassError;
use crate::product::{ProductFeed, hydrate_product_boxes};
use crate::state::InitState;

/// Resolve the content scope: the first element matching the earliest selector
/// that matches anything.
///
/// Invalid selectors are logged and skipped. Falls back to `<body>`, then to
/// the document root.
pub fn resolve_scope(document: &Document, selectors: &[String]) -> NodeRef {
    for selector in selectors {
        match document.query_first(selector) {
            Ok(Some(scope)) => return scope,
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Skipping scope selector"),
        }
    }
    document.body().unwrap_or_else(|| document.root().clone())
}

/// Everything a [`Page`] is configured with.
#[derive(Clone, Debug)]
pub struct PageSettings {
    pub scope_selectors: Vec<String>,
    pub done_attr: String,
    pub debounce: Duration,
    pub media: MediaSettings,
    pub widgets: WidgetOptions,
    pub copy_labels: CopyLabels,
    pub copy_revert: Duration,
}

impl From<&Config> for PageSettings {
    fn from(config: &Config) -> Self {
        let mut widgets = WidgetOptions {
            copy_label: config.ui.copy_label.clone(),
            ..WidgetOptions::default()
        };
        if let Some(icon) = &config.ui.copy_icon {
            widgets.copy_icon.clone_from(icon);
        }

        Self {
            scope_selectors: config.scope.selectors.clone(),
            done_attr: config.scope.done_attr.clone(),
            debounce: Duration::from_millis(config.observer.debounce_ms),
            media: MediaSettings {
                root_margin: RootMargin::vertical(f64::from(config.media.root_margin_px)),
                near_viewport_px: f64::from(config.media.near_viewport_px),
                fallback_viewport_height: f64::from(config.media.fallback_viewport_height),
            },
            widgets,
            copy_labels: CopyLabels {
                copied: config.ui.copied_label.clone(),
                failed: config.ui.copy_failed_label.clone(),
            },
            copy_revert: Duration::from_millis(config.ui.copy_revert_ms),
        }
    }
}

impl Default for PageSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// Counts from one full pass (media, shortcodes, media).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassReport {
    pub shortcodes: PassStats,
    pub media: ActivationStats,
}

/// One loaded page.
#[derive(Debug)]
pub struct Page<C = SystemClock> {
    document: Document,
    scope_selectors: Vec<String>,
    scope: NodeRef,
    engine: ShortcodeEngine,
    media: LazyMediaActivator,
    coordinator: MutationCoordinator<C>,
    binder: UiEventBinder<C>,
    state: InitState,
}

impl Page<SystemClock> {
    /// Load `document` with wall-clock timers.
    #[must_use]
    pub fn new(document: Document, settings: PageSettings) -> Self {
        Self::with_clock(document, settings, SystemClock)
    }
}

impl<C: Clock + Clone> Page<C> {
    /// Load `document` with timers driven by `clock`.
    pub fn with_clock(document: Document, settings: PageSettings, clock: C) -> Self {
        let scope = resolve_scope(&document, &settings.scope_selectors);
        let engine = ShortcodeEngine::new(Catalog::standard())
            .with_options(settings.widgets)
            .with_done_attr(settings.done_attr);
        let binder = UiEventBinder::new(clock.clone())
            .with_labels(settings.copy_labels)
            .with_revert_after(settings.copy_revert);

        Self {
            document,
            scope_selectors: settings.scope_selectors,
            scope,
            engine,
            media: LazyMediaActivator::new(settings.media),
            coordinator: MutationCoordinator::new(settings.debounce, clock),
            binder,
            state: InitState::new(),
        }
    }

    /// Bring the page up: bind widget handlers, run the first pass, then start
    /// observing mutations.
    ///
    /// Handlers and observation attach at most once, however often this runs.
    /// Observation starts even when the first pass fails.
    ///
    /// # Errors
    ///
    /// Returns the first pass's error.
    pub fn init(&mut self, host: &dyn ViewportHost) -> Result<PassReport, PassError> {
        self.binder.bind(&mut self.state);
        let result = self.run_pass(host);
        self.coordinator.observe(&mut self.state);
        result
    }

    /// Run media, shortcode and media passes over the scope.
    ///
    /// # Errors
    ///
    /// Returns an error if a selector fails to compile.
    pub fn run_pass(&mut self, host: &dyn ViewportHost) -> Result<PassReport, PassError> {
        full_pass(
            &self.document,
            &self.scope_selectors,
            &mut self.scope,
            &self.engine,
            &mut self.media,
            host,
        )
    }

    /// Report a change below the scope.
    pub fn notify_mutation(&mut self) {
        self.coordinator.record_mutation();
    }

    /// Append markup to the scope, as late-loaded content would.
    pub fn append_to_scope(&mut self, markup: &str) {
        for node in parse_fragment(markup) {
            self.scope.append(node);
        }
        self.notify_mutation();
    }

    /// Advance timers: run a due re-processing pass and revert copy buttons.
    ///
    /// Returns the pass result if one was due.
    pub fn tick(&mut self, host: &dyn ViewportHost) -> Option<Result<PassReport, PassError>> {
        let reverted = self.binder.tick();
        if reverted > 0 {
            tracing::debug!(reverted, "Restored copy buttons");
        }

        let Self {
            document,
            scope_selectors,
            scope,
            engine,
            media,
            coordinator,
            ..
        } = self;
        coordinator.run_due(|| full_pass(document, scope_selectors, scope, engine, media, host))
    }

    /// Run the pending re-processing pass without waiting for the quiet period.
    pub fn flush(&mut self, host: &dyn ViewportHost) -> Option<Result<PassReport, PassError>> {
        let Self {
            document,
            scope_selectors,
            scope,
            engine,
            media,
            coordinator,
            ..
        } = self;
        coordinator.flush(|| full_pass(document, scope_selectors, scope, engine, media, host))
    }

    /// Viewport callback: activate watched media that came into range.
    pub fn on_viewport_change(&mut self, host: &dyn ViewportHost) -> usize {
        self.media.on_viewport_change(host)
    }

    /// Deliver a click to the widget handlers.
    ///
    /// # Errors
    ///
    /// Returns an error if a widget selector fails to compile.
    pub fn click(
        &mut self,
        target: &NodeRef,
        clipboard: &dyn Clipboard,
    ) -> Result<EventOutcome, DomError> {
        self.binder.handle_click(target, clipboard)
    }

    /// Deliver a key press to the widget handlers.
    ///
    /// # Errors
    ///
    /// Returns an error if a widget selector fails to compile.
    pub fn key(&mut self, target: &NodeRef, key: &str) -> Result<(EventOutcome, bool), DomError> {
        self.binder.handle_key(target, key)
    }

    /// Fill related-product boxes anywhere in the document from `feed`.
    ///
    /// # Errors
    ///
    /// Returns an error if a selector fails to compile.
    pub fn hydrate_products(&self, feed: &dyn ProductFeed) -> Result<usize, DomError> {
        hydrate_product_boxes(self.document.root(), feed)
    }

    /// Whether a re-processing pass is waiting.
    #[must_use]
    pub fn has_pending_pass(&self) -> bool {
        self.coordinator.is_pending()
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    #[must_use]
    pub fn scope(&self) -> &NodeRef {
        &self.scope
    }

    #[must_use]
    pub fn state(&self) -> &InitState {
        &self.state
    }

    #[must_use]
    pub fn into_document(self) -> Document {
        self.document
    }
}

fn full_pass(
    document: &Document,
    scope_selectors: &[String],
    scope: &mut NodeRef,
    engine: &ShortcodeEngine,
    media: &mut LazyMediaActivator,
    host: &dyn ViewportHost,
) -> Result<PassReport, PassError> {
    let mut report = PassReport {
        media: media.activate(scope, host)?,
        shortcodes: engine.process(scope)?,
    };
    report.shortcodes += engine.process_strikes(scope)?;

    // A scope that was itself a marker quote is gone now.
    if !scope.is_attached() {
        *scope = resolve_scope(document, scope_selectors);
        tracing::debug!(scope = ?scope.tag_name(), "Scope replaced, resolved again");
    }
    report.media += media.activate(scope, host)?;

    tracing::info!(
        rewritten = report.shortcodes.rewritten,
        rejected = report.shortcodes.rejected,
        skipped = report.shortcodes.skipped,
        activated = report.media.activated,
        observed = report.media.observed,
        "Processed page scope"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::VirtualClock;
    use crate::error::ClipboardError;
    use iqraa_media::{NoViewport, Rect};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    /// Layout taken from a `data-top` attribute on each element.
    struct AttrLayout;

    impl ViewportHost for AttrLayout {
        fn supports_intersection(&self) -> bool {
            true
        }

        fn viewport_height(&self) -> Option<f64> {
            Some(800.0)
        }

        fn element_rect(&self, element: &NodeRef) -> Option<Rect> {
            let top = element.attr("data-top")?.parse().ok()?;
            Some(Rect::new(top, 100.0))
        }
    }

    #[derive(Default)]
    struct Recording(RefCell<Vec<String>>);

    impl Clipboard for Recording {
        fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
            self.0.borrow_mut().push(text.to_owned());
            Ok(())
        }
    }

    fn page<'a>(html: &str, clock: &'a VirtualClock) -> Page<&'a VirtualClock> {
        Page::with_clock(Document::parse(html), PageSettings::default(), clock)
    }

    fn selectors(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_resolve_scope_order() {
        let doc = Document::parse(
            r#"<article id="a"></article><div class="post-body" id="p"></div>"#,
        );
        let scope = resolve_scope(&doc, &PageSettings::default().scope_selectors);
        assert_eq!(scope.attr("id").as_deref(), Some("p"));
    }

    #[test]
    fn test_resolve_scope_skips_invalid_and_falls_back() {
        let doc = Document::parse("<p>x</p>");
        let scope = resolve_scope(&doc, &selectors(&["[[", ".missing"]));
        assert_eq!(scope.tag_name().as_deref(), Some("body"));
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = Config::default();
        config.observer.debounce_ms = 250;
        config.media.root_margin_px = 100;
        config.ui.copy_icon = Some("<i></i>".to_owned());

        let settings = PageSettings::from(&config);
        assert_eq!(settings.debounce, Duration::from_millis(250));
        assert_eq!(settings.media.root_margin, RootMargin::vertical(100.0));
        assert_eq!(settings.widgets.copy_icon, "<i></i>");
        assert_eq!(settings.copy_revert, Duration::from_millis(1200));
        assert_eq!(settings.copy_labels, CopyLabels::default());
    }

    #[test]
    fn test_init_runs_full_pass() {
        let clock = VirtualClock::new();
        let mut page = page(
            concat!(
                r#"<div class="post-body"><img data-src="a.jpg">"#,
                "<blockquote>-success- done</blockquote>",
                "<blockquote>-video- https://youtu.be/dQw4w9WgXcQ</blockquote>",
                "<s>بدون جدول محتويات</s></div>"
            ),
            &clock,
        );

        let report = page.init(&NoViewport).unwrap();
        assert_eq!(report.shortcodes.rewritten, 3);
        // The image before shortcodes, the video frame after.
        assert_eq!(report.media.activated, 2);

        let frame = page.document().query_first("iframe").unwrap().unwrap();
        assert_eq!(
            frame.attr("src").as_deref(),
            Some("https://www.youtube.com/embed/dQw4w9WgXcQ")
        );
        assert!(page.state().is_bound());
        assert!(page.state().is_observing());
    }

    #[test]
    fn test_init_twice_is_idempotent() {
        let clock = VirtualClock::new();
        let mut page = page(
            r#"<div class="post-body"><blockquote>plain</blockquote></div>"#,
            &clock,
        );
        let first = page.init(&NoViewport).unwrap();
        assert_eq!(first.shortcodes.rejected, 1);

        let html = page.document().to_html();
        let second = page.init(&NoViewport).unwrap();
        assert_eq!(second, PassReport::default());
        assert_eq!(page.document().to_html(), html);
    }

    #[test]
    fn test_late_content_processed_after_quiet_period() {
        let clock = VirtualClock::new();
        let mut page = page(r#"<div class="post-body"></div>"#, &clock);
        page.init(&NoViewport).unwrap();

        page.append_to_scope("<blockquote>-info- one</blockquote>");
        clock.advance(Duration::from_millis(40));
        page.append_to_scope("<blockquote>-info- two</blockquote>");
        clock.advance(Duration::from_millis(40));
        assert!(page.tick(&NoViewport).is_none());

        clock.advance(Duration::from_millis(40));
        let report = page.tick(&NoViewport).unwrap().unwrap();
        assert_eq!(report.shortcodes.rewritten, 2);
        assert!(!page.has_pending_pass());
        assert_eq!(page.document().query_all(".iqraa-message").unwrap().len(), 2);
    }

    #[test]
    fn test_mutations_before_init_ignored() {
        let clock = VirtualClock::new();
        let mut page = page(r#"<div class="post-body"></div>"#, &clock);
        page.append_to_scope("<blockquote>-info- early</blockquote>");
        assert!(!page.has_pending_pass());
        assert!(page.flush(&NoViewport).is_none());
    }

    #[test]
    fn test_scope_replaced_by_its_own_widget() {
        let clock = VirtualClock::new();
        let settings = PageSettings {
            scope_selectors: selectors(&["blockquote", ".post-body"]),
            ..PageSettings::default()
        };
        let doc = Document::parse(
            r#"<div class="post-body"><blockquote>-error- bad</blockquote><img data-src="b.jpg"></div>"#,
        );
        let mut page = Page::with_clock(doc, settings, &clock);

        let report = page.init(&NoViewport).unwrap();
        assert_eq!(report.shortcodes.rewritten, 1);
        assert!(page.scope().has_class("post-body"));
        // The image outside the original scope is reached after resolving again.
        assert_eq!(report.media.activated, 1);
    }

    #[test]
    fn test_viewport_change_reaches_media() {
        let clock = VirtualClock::new();
        let mut page = page(
            r#"<div class="post-body"><img data-src="far.jpg" data-top="5000"></div>"#,
            &clock,
        );
        let report = page.init(&AttrLayout).unwrap();
        assert_eq!(report.media.activated, 0);
        assert_eq!(page.on_viewport_change(&AttrLayout), 0);

        let img = page.document().query_first("img").unwrap().unwrap();
        img.set_attr("data-top", "500");
        assert_eq!(page.on_viewport_change(&AttrLayout), 1);
        assert_eq!(img.attr("src").as_deref(), Some("far.jpg"));
    }

    #[test]
    fn test_copy_widget_end_to_end() {
        let clock = VirtualClock::new();
        let mut page = page(
            r#"<div class="post-body"><blockquote>-كود css- a { color: red; }</blockquote></div>"#,
            &clock,
        );
        page.init(&NoViewport).unwrap();

        let button = page.document().query_first(".iCS__copy_btn").unwrap().unwrap();
        let original = button.inner_html();
        let clipboard = Recording::default();
        assert_eq!(page.click(&button, &clipboard).unwrap(), EventOutcome::Copied);
        assert_eq!(clipboard.0.borrow().as_slice(), ["a { color: red; }"]);

        clock.advance(Duration::from_millis(1200));
        assert!(page.tick(&NoViewport).is_none());
        assert_eq!(button.inner_html(), original);
    }

    #[test]
    fn test_accordion_key_end_to_end() {
        let clock = VirtualClock::new();
        let mut page = page(
            r#"<div class="post-body"><blockquote>Title -أكورديون- Body</blockquote></div>"#,
            &clock,
        );
        page.init(&NoViewport).unwrap();

        let header = page.document().query_first(".iACC__header").unwrap().unwrap();
        let (outcome, suppress) = page.key(&header, "Enter").unwrap();
        assert_eq!(outcome, EventOutcome::Toggled { expanded: true });
        assert!(suppress);
    }

    #[test]
    fn test_hydrate_products() {
        struct OneEntry;
        impl ProductFeed for OneEntry {
            fn entry_html(&self, _post_id: &str) -> Option<String> {
                Some(r#"<meta itemprop="price" content="10">"#.to_owned())
            }
        }

        let clock = VirtualClock::new();
        let page = page(
            r#"<div class="iRelatedPosts" data-id="3"><span class="price"></span></div>"#,
            &clock,
        );
        assert_eq!(page.hydrate_products(&OneEntry).unwrap(), 1);
        assert!(page.into_document().to_html().contains(r#"<span class="price">10</span>"#));
    }
}
