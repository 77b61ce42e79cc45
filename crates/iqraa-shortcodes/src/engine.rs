//! Shortcode rewriting over a live document scope.

use std::ops::AddAssign;

use iqraa_dom::{DomError, NodeExt, NodeRef};

use crate::candidate::{CandidateKind, CandidateState, RawContent, resolve};
use crate::catalog::Catalog;
use crate::widget::WidgetOptions;

/// Default attribute flagging an examined candidate.
pub const DEFAULT_DONE_ATTR: &str = "data-iqraa-done";

const QUOTE_SELECTOR: &str = "blockquote";
const STRIKE_SELECTOR: &str = "strike, s, del";

/// Upper bound on re-scans within one pass.
///
/// A rewrite may produce fresh candidates (a message wrapping a nested quote);
/// those are picked up by the next scan.
const MAX_SCANS: usize = 16;

/// Outcome counts of one pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Candidates replaced by widget markup.
    pub rewritten: usize,
    /// Candidates flagged done without a match.
    pub rejected: usize,
    /// Candidates detached by an earlier rewrite before being examined.
    pub skipped: usize,
}

impl PassStats {
    /// Whether the pass changed nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rewritten == 0 && self.rejected == 0
    }
}

impl AddAssign for PassStats {
    fn add_assign(&mut self, other: Self) {
        self.rewritten += other.rewritten;
        self.rejected += other.rejected;
        self.skipped += other.skipped;
    }
}

/// Rewrites marker-bearing quote and strike-through elements into widgets.
///
/// Every examined element is either replaced or flagged with the done
/// attribute, so running a pass again over the same scope is a no-op.
///
/// # Example
///
/// ```
/// use iqraa_dom::Document;
/// use iqraa_shortcodes::{Catalog, ShortcodeEngine};
///
/// let doc = Document::parse("<blockquote>-info- hello</blockquote>");
/// let engine = ShortcodeEngine::new(Catalog::standard());
/// let stats = engine.process(doc.root()).unwrap();
/// assert_eq!(stats.rewritten, 1);
/// assert!(doc.to_html().contains(r#"<div class="iqraa-message info">hello</div>"#));
/// ```
#[derive(Clone, Debug)]
pub struct ShortcodeEngine {
    catalog: Catalog,
    options: WidgetOptions,
    done_attr: String,
}

impl ShortcodeEngine {
    /// Create an engine over `catalog` with default widget options.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            options: WidgetOptions::default(),
            done_attr: DEFAULT_DONE_ATTR.to_owned(),
        }
    }

    /// Set widget presentation options.
    #[must_use]
    pub fn with_options(mut self, options: WidgetOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the attribute used to flag examined candidates.
    #[must_use]
    pub fn with_done_attr(mut self, done_attr: impl Into<String>) -> Self {
        self.done_attr = done_attr.into();
        self
    }

    /// The injected marker catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Attribute flagging examined candidates.
    #[must_use]
    pub fn done_attr(&self) -> &str {
        &self.done_attr
    }

    /// Rewrite quote blocks at or under `scope`.
    ///
    /// # Errors
    ///
    /// Returns an error if the candidate selector fails to compile.
    pub fn process(&self, scope: &NodeRef) -> Result<PassStats, DomError> {
        self.run(scope, CandidateKind::Quote)
    }

    /// Apply hide/layout directives from strike-through elements at or under `scope`.
    ///
    /// # Errors
    ///
    /// Returns an error if the candidate selector fails to compile.
    pub fn process_strikes(&self, scope: &NodeRef) -> Result<PassStats, DomError> {
        self.run(scope, CandidateKind::Strike)
    }

    fn run(&self, scope: &NodeRef, kind: CandidateKind) -> Result<PassStats, DomError> {
        let selector = match kind {
            CandidateKind::Quote => QUOTE_SELECTOR,
            CandidateKind::Strike => STRIKE_SELECTOR,
        };
        let tree = tree_root(scope);
        let mut stats = PassStats::default();

        for _ in 0..MAX_SCANS {
            let pending: Vec<NodeRef> = scope
                .query_all(selector)?
                .into_iter()
                .filter(|element| !self.is_done(element) && tree_root(element) == tree)
                .collect();
            if pending.is_empty() {
                break;
            }

            for element in pending {
                // An enclosing candidate may have been replaced earlier in this scan.
                if tree_root(&element) != tree {
                    stats.skipped += 1;
                    continue;
                }
                self.apply(&element, kind, &mut stats);
            }
        }

        tracing::debug!(
            ?kind,
            rewritten = stats.rewritten,
            rejected = stats.rejected,
            skipped = stats.skipped,
            "Shortcode pass complete"
        );
        Ok(stats)
    }

    fn apply(&self, element: &NodeRef, kind: CandidateKind, stats: &mut PassStats) {
        let raw = RawContent::new(&element.text_contents(), element.inner_html());
        match resolve(
            CandidateState::Unprocessed(raw),
            kind,
            &self.catalog,
            &self.options,
        ) {
            CandidateState::Rewritten(markup) => {
                tracing::debug!(?kind, len = markup.len(), "Rewrote candidate");
                element.replace_with_html(&markup);
                stats.rewritten += 1;
            }
            CandidateState::Rejected | CandidateState::Unprocessed(_) => {
                element.set_attr(&self.done_attr, "1");
                stats.rejected += 1;
            }
        }
    }

    fn is_done(&self, element: &NodeRef) -> bool {
        element.attr(&self.done_attr).as_deref() == Some("1")
    }
}

impl Default for ShortcodeEngine {
    fn default() -> Self {
        Self::new(Catalog::standard())
    }
}

/// Outermost ancestor of `node`; differs from the scope's once the node is cut out.
fn tree_root(node: &NodeRef) -> NodeRef {
    node.inclusive_ancestors()
        .last()
        .unwrap_or_else(|| node.clone())
}
