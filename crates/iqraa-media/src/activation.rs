//! One-shot activation of a single deferred element.

use iqraa_dom::{NodeExt, NodeRef};

/// Attribute flagging an element as activated.
pub const LOADED_ATTR: &str = "data-iqraa-loaded";

/// Deferred image candidates.
pub const IMAGE_SELECTOR: &str = "img[data-src], img[data-srcset], img[data-lazy-src], img.lazyload";
/// Deferred frame candidates.
pub const FRAME_SELECTOR: &str = "iframe[data-src]";
/// Deferred background candidates.
pub const BACKGROUND_SELECTOR: &str = "[data-bg], [data-background]";

const DATA_SRC: &str = "data-src";
const DATA_SRCSET: &str = "data-srcset";
const DATA_LAZY_SRC: &str = "data-lazy-src";
const DATA_SIZES: &str = "data-sizes";
const BACKGROUND_ATTRS: [&str; 2] = ["data-bg", "data-background"];

/// How an element is activated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Frame,
    Background,
}

impl MediaKind {
    /// Kind of a candidate element, decided by its tag.
    #[must_use]
    pub fn of(element: &NodeRef) -> Self {
        match element.tag_name().as_deref() {
            Some("img") => Self::Image,
            Some("iframe") => Self::Frame,
            _ => Self::Background,
        }
    }
}

/// Whether a live `src` value is a stand-in rather than real content.
///
/// Missing, blank, `data:image/` URIs and anything mentioning `placeholder`
/// count as placeholders.
///
/// # Examples
///
/// ```
/// use iqraa_media::looks_like_placeholder;
///
/// assert!(looks_like_placeholder(None));
/// assert!(looks_like_placeholder(Some("data:image/gif;base64,R0lGOD")));
/// assert!(!looks_like_placeholder(Some("https://x.test/photo.jpg")));
/// ```
#[must_use]
pub fn looks_like_placeholder(src: Option<&str>) -> bool {
    let src = src.unwrap_or_default().trim();
    src.is_empty() || src.starts_with("data:image/") || src.contains("placeholder")
}

/// Whether `element` was already activated.
#[must_use]
pub fn is_loaded(element: &NodeRef) -> bool {
    element.attr(LOADED_ATTR).is_some()
}

/// Whether an image still waits for a primary source.
pub(crate) fn awaits_source(image: &NodeRef) -> bool {
    looks_like_placeholder(image.attr("src").as_deref())
        && (image.attr(DATA_SRC).is_some() || image.attr(DATA_LAZY_SRC).is_some())
}

/// Activate `element` unless it already was.
///
/// Returns `true` if the element was activated by this call.
pub fn activate(element: &NodeRef) -> bool {
    if is_loaded(element) {
        return false;
    }
    let kind = MediaKind::of(element);
    match kind {
        MediaKind::Image => activate_image(element),
        MediaKind::Frame => activate_frame(element),
        MediaKind::Background => activate_background(element),
    }
    element.set_attr(LOADED_ATTR, "1");
    tracing::debug!(?kind, "Activated deferred media");
    true
}

fn activate_image(image: &NodeRef) {
    for deferred in [DATA_LAZY_SRC, DATA_SRC] {
        if let Some(src) = image.attr(deferred)
            && looks_like_placeholder(image.attr("src").as_deref())
        {
            image.set_attr("src", &src);
        }
    }
    if let Some(srcset) = image.attr(DATA_SRCSET) {
        image.set_attr("srcset", &srcset);
    }
    if let Some(sizes) = image.attr(DATA_SIZES)
        && image.attr("sizes").is_none_or(|current| current.is_empty())
    {
        image.set_attr("sizes", &sizes);
    }

    for deferred in [DATA_SRC, DATA_SRCSET, DATA_LAZY_SRC] {
        image.remove_attr(deferred);
    }
    image.remove_class("lazyload");
    image.add_class("lazyloaded");
}

fn activate_frame(frame: &NodeRef) {
    if let Some(src) = frame.attr(DATA_SRC)
        && frame.attr("src").is_none_or(|current| current.is_empty())
    {
        frame.set_attr("src", &src);
    }
    frame.remove_attr(DATA_SRC);
}

fn activate_background(element: &NodeRef) {
    let Some(url) = BACKGROUND_ATTRS
        .iter()
        .filter_map(|name| element.attr(name))
        .find(|url| !url.is_empty())
    else {
        return;
    };
    element.set_style_property("background-image", &format!("url(\"{url}\")"));
    for name in BACKGROUND_ATTRS {
        element.remove_attr(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iqraa_dom::Document;
    use pretty_assertions::assert_eq;

    fn element(html: &str, selector: &str) -> (Document, NodeRef) {
        let doc = Document::parse(html);
        let element = doc.query_first(selector).unwrap().unwrap();
        (doc, element)
    }

    #[test]
    fn test_placeholder_detection() {
        assert!(looks_like_placeholder(Some("  ")));
        assert!(looks_like_placeholder(Some("/img/placeholder.png")));
        assert!(!looks_like_placeholder(Some("data:text/plain,x")));
    }

    #[test]
    fn test_image_promotes_and_clears() {
        let (_doc, img) = element(
            r#"<img class="thumb lazyload" src="data:image/gif;base64,AA" data-src="a.jpg" data-srcset="a.jpg 1x, b.jpg 2x" data-sizes="100vw">"#,
            "img",
        );
        assert!(activate(&img));
        assert_eq!(img.attr("src").as_deref(), Some("a.jpg"));
        assert_eq!(img.attr("srcset").as_deref(), Some("a.jpg 1x, b.jpg 2x"));
        assert_eq!(img.attr("sizes").as_deref(), Some("100vw"));
        assert_eq!(img.attr("class").as_deref(), Some("thumb lazyloaded"));
        assert!(img.attr("data-src").is_none());
        assert!(img.attr("data-srcset").is_none());
        assert!(is_loaded(&img));
    }

    #[test]
    fn test_lazy_src_outranks_src() {
        let (_doc, img) = element(r#"<img data-src="low.jpg" data-lazy-src="high.jpg">"#, "img");
        activate(&img);
        assert_eq!(img.attr("src").as_deref(), Some("high.jpg"));
        assert!(img.attr("data-lazy-src").is_none());
    }

    #[test]
    fn test_real_source_never_overwritten() {
        let (_doc, img) = element(r#"<img src="real.jpg" data-src="other.jpg">"#, "img");
        activate(&img);
        assert_eq!(img.attr("src").as_deref(), Some("real.jpg"));
        assert!(img.attr("data-src").is_none());
    }

    #[test]
    fn test_existing_sizes_kept() {
        let (_doc, img) = element(r#"<img sizes="50vw" data-sizes="100vw" data-src="a.jpg">"#, "img");
        activate(&img);
        assert_eq!(img.attr("sizes").as_deref(), Some("50vw"));
    }

    #[test]
    fn test_frame() {
        let (_doc, frame) = element(r#"<iframe class="lazyload" data-src="https://x.test/a.pdf"></iframe>"#, "iframe");
        activate(&frame);
        assert_eq!(frame.attr("src").as_deref(), Some("https://x.test/a.pdf"));
        assert!(frame.attr("data-src").is_none());

        let (_doc, frame) = element(r#"<iframe src="kept" data-src="other"></iframe>"#, "iframe");
        activate(&frame);
        assert_eq!(frame.attr("src").as_deref(), Some("kept"));
    }

    #[test]
    fn test_background_first_attribute_wins() {
        let (_doc, div) = element(r#"<div style="color: red" data-bg="a.png" data-background="b.png"></div>"#, "div");
        activate(&div);
        assert_eq!(
            div.attr("style").as_deref(),
            Some(r#"color: red; background-image: url("a.png")"#)
        );
        assert!(div.attr("data-bg").is_none());
        assert!(div.attr("data-background").is_none());

        let (_doc, div) = element(r#"<div data-background="b.png"></div>"#, "div");
        activate(&div);
        assert_eq!(div.attr("style").as_deref(), Some(r#"background-image: url("b.png")"#));
    }

    #[test]
    fn test_activation_is_one_shot() {
        let (_doc, img) = element(r#"<img data-src="a.jpg">"#, "img");
        assert!(activate(&img));
        img.set_attr("src", "");
        img.set_attr("data-src", "b.jpg");
        assert!(!activate(&img));
        assert_eq!(img.attr("src").as_deref(), Some(""));
    }

    #[test]
    fn test_media_kind() {
        let (_doc, img) = element("<img>", "img");
        assert_eq!(MediaKind::of(&img), MediaKind::Image);
        let (_doc, section) = element("<section data-bg=x></section>", "section");
        assert_eq!(MediaKind::of(&section), MediaKind::Background);
    }
}
