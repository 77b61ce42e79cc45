//! Page lifecycle for the iqraa content engine.
//!
//! Ties the shortcode engine and the lazy media activator to a loaded page:
//! the first pass on page ready, debounced re-processing when the scope
//! mutates, and the delegated handlers the generated widgets rely on.
//!
//! # Architecture
//!
//! - [`Page`]: owns the document and runs media, shortcode and media passes
//! - [`InitState`]: per-page registration flags (handlers, mutation observer)
//! - [`MutationCoordinator`]: debounced pass scheduling over a [`CoalescingTrigger`]
//! - [`UiEventBinder`]: copy buttons and accordions
//! - [`Clock`]: time source; [`VirtualClock`] drives timers in tests
//!
//! Surfaces provide capabilities as trait objects: [`iqraa_media::ViewportHost`],
//! [`Clipboard`] and [`ProductFeed`].
//!
//! # Example
//!
//! ```
//! use iqraa_dom::Document;
//! use iqraa_media::NoViewport;
//! use iqraa_runtime::{Page, PageSettings};
//!
//! let doc = Document::parse(r#"<div class="post-body"><blockquote>-info- hi</blockquote></div>"#);
//! let mut page = Page::new(doc, PageSettings::default());
//! let report = page.init(&NoViewport).unwrap();
//! assert_eq!(report.shortcodes.rewritten, 1);
//! ```

mod binder;
mod clipboard;
mod clock;
mod coordinator;
mod error;
mod page;
mod product;
mod state;
mod trigger;

pub use binder::{CopyLabels, DEFAULT_COPY_REVERT, EventOutcome, UiEventBinder};
pub use clipboard::{Clipboard, NoClipboard, copy_text};
pub use clock::{Clock, SystemClock, VirtualClock};
pub use coordinator::{DEFAULT_DEBOUNCE, MutationCoordinator};
pub use error::{ClipboardError, PassError};
pub use page::{Page, PageSettings, PassReport, resolve_scope};
pub use product::{
    ProductFeed, ProductInfo, hydrate_product_boxes, parse_price_and_description,
    populate_product_box,
};
pub use state::InitState;
pub use trigger::CoalescingTrigger;
