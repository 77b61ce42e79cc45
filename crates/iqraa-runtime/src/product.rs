//! Related-product box hydration.
//!
//! Product posts publish their price and description as microdata inside the
//! post body. Pages listing related products carry an empty box per product,
//! keyed by post id, that is filled from the product's feed entry.

use iqraa_dom::{Document, DomError, NodeExt, NodeRef};

/// Price and description of a product post, each optional.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductInfo {
    pub price: Option<String>,
    pub description: Option<String>,
}

impl ProductInfo {
    /// Whether neither field is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.price.is_none() && self.description.is_none()
    }
}

/// Source of product feed entries.
///
/// Fetching is the surface's concern; the runtime only consumes the entry body.
pub trait ProductFeed {
    /// Markup of the entry body for `post_id`, `None` if unavailable.
    fn entry_html(&self, post_id: &str) -> Option<String>;
}

/// Extract price and description microdata from a feed entry.
///
/// # Errors
///
/// Returns an error if a selector fails to compile.
pub fn parse_price_and_description(html: &str) -> Result<ProductInfo, DomError> {
    let doc = Document::parse(html);
    let price = doc
        .query_first(r#"meta[itemprop="price"]"#)?
        .and_then(|meta| meta.attr("content"))
        .and_then(non_empty);
    let description = doc
        .query_first(r#"div[itemprop="description"]"#)?
        .and_then(|div| non_empty(div.text_contents()));
    Ok(ProductInfo { price, description })
}

/// Fill the related-product box for `post_id` under `root`.
///
/// Returns `false` when the page has no box for that post.
///
/// # Errors
///
/// Returns an error if a selector fails to compile.
pub fn populate_product_box(
    root: &NodeRef,
    post_id: &str,
    info: &ProductInfo,
) -> Result<bool, DomError> {
    let selector = format!(r#".iRelatedPosts[data-id="{}"]"#, escape_attr_value(post_id));
    let Some(product_box) = root.query_first(&selector)? else {
        return Ok(false);
    };

    if let Some(price) = &info.price
        && let Some(field) = product_box.query_first(".price")?
    {
        field.set_text(price);
    }
    if let Some(description) = &info.description
        && let Some(field) = product_box.query_first(".description")?
    {
        field.set_text(description);
    }
    Ok(true)
}

/// Hydrate every related-product box under `root` from `feed`.
///
/// Boxes without a `data-id`, without a feed entry, or whose entry carries no
/// microdata are left untouched. Returns the number of boxes filled.
///
/// # Errors
///
/// Returns an error if a selector fails to compile.
pub fn hydrate_product_boxes(root: &NodeRef, feed: &dyn ProductFeed) -> Result<usize, DomError> {
    let mut filled = 0;
    for product_box in root.query_all(".iRelatedPosts[data-id]")? {
        let Some(post_id) = product_box.attr("data-id") else {
            continue;
        };
        let Some(entry) = feed.entry_html(&post_id) else {
            tracing::debug!(post_id = %post_id, "No feed entry for product box");
            continue;
        };
        let info = parse_price_and_description(&entry)?;
        if info.is_empty() {
            continue;
        }
        if populate_product_box(root, &post_id, &info)? {
            filled += 1;
        }
    }
    Ok(filled)
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn escape_attr_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    const ENTRY: &str = r#"<div class="post"><meta itemprop="price" content=" 25$ "><div itemprop="description">  Offline course  </div></div>"#;

    const PAGE: &str = concat!(
        r#"<div class="iRelatedPosts" data-id="42"><span class="price"></span><p class="description"></p></div>"#,
        r#"<div class="iRelatedPosts" data-id="7"><span class="price"></span></div>"#,
        r#"<div class="iRelatedPosts" data-id="9"><span class="price">old</span></div>"#
    );

    struct MapFeed(HashMap<&'static str, &'static str>);

    impl ProductFeed for MapFeed {
        fn entry_html(&self, post_id: &str) -> Option<String> {
            self.0.get(post_id).map(|html| (*html).to_owned())
        }
    }

    fn text(doc: &Document, selector: &str) -> String {
        doc.query_first(selector)
            .unwrap()
            .unwrap()
            .text_contents()
    }

    #[test]
    fn test_parse_price_and_description() {
        let info = parse_price_and_description(ENTRY).unwrap();
        assert_eq!(
            info,
            ProductInfo {
                price: Some("25$".to_owned()),
                description: Some("Offline course".to_owned()),
            }
        );
    }

    #[test]
    fn test_parse_missing_fields() {
        let info = parse_price_and_description(
            r#"<meta itemprop="price" content="  "><p>no microdata</p>"#,
        )
        .unwrap();
        assert!(info.is_empty());
    }

    #[test]
    fn test_populate_box() {
        let doc = Document::parse(PAGE);
        let info = parse_price_and_description(ENTRY).unwrap();

        assert!(populate_product_box(doc.root(), "42", &info).unwrap());
        assert_eq!(text(&doc, r#"[data-id="42"] .price"#), "25$");
        assert_eq!(text(&doc, r#"[data-id="42"] .description"#), "Offline course");
    }

    #[test]
    fn test_populate_tolerates_missing_parts() {
        let doc = Document::parse(PAGE);
        let info = ProductInfo {
            price: None,
            description: Some("d".to_owned()),
        };

        // Box without a description field, info without a price.
        assert!(populate_product_box(doc.root(), "9", &info).unwrap());
        assert_eq!(text(&doc, r#"[data-id="9"] .price"#), "old");

        assert!(!populate_product_box(doc.root(), "100", &info).unwrap());
    }

    #[test]
    fn test_post_id_is_escaped() {
        let doc = Document::parse(r#"<div class="iRelatedPosts" data-id="a&quot;b"><b class="price"></b></div>"#);
        let info = ProductInfo {
            price: Some("1".to_owned()),
            description: None,
        };
        assert!(populate_product_box(doc.root(), "a\"b", &info).unwrap());
        assert_eq!(text(&doc, ".price"), "1");
    }

    #[test]
    fn test_hydrate_from_feed() {
        let doc = Document::parse(PAGE);
        let feed = MapFeed(HashMap::from([("42", ENTRY), ("7", "<p>nothing</p>")]));

        assert_eq!(hydrate_product_boxes(doc.root(), &feed).unwrap(), 1);
        assert_eq!(text(&doc, r#"[data-id="42"] .price"#), "25$");
        assert_eq!(text(&doc, r#"[data-id="7"] .price"#), "");
        assert_eq!(text(&doc, r#"[data-id="9"] .price"#), "old");
    }
}
