//! Static marker catalog.
//!
//! Markers are literal tokens wrapped in hyphens (`-success-`). The catalog is
//! built once, is immutable, and lists quote-block markers in the order they
//! take precedence: messages, buttons, code, video, PDF, accordion.
//! Strike-through markers (hide/layout phrases) form a separate list.

/// Marker family, used for grouping and reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkerFamily {
    /// Styled alert boxes.
    Message,
    /// Call-to-action link buttons.
    Button,
    /// Code snippets with a copy button.
    Code,
    /// Hide and layout directives (strike-through elements only).
    Hide,
    /// Video, PDF and accordion embeds.
    Structural,
}

impl MarkerFamily {
    /// Human-readable family name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Button => "button",
            Self::Code => "code",
            Self::Hide => "hide",
            Self::Structural => "structural",
        }
    }
}

/// Message severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
    Warning,
}

impl Severity {
    /// All severities in matching order.
    pub const ALL: [Self; 4] = [Self::Info, Self::Success, Self::Error, Self::Warning];

    /// Primary marker keyword, also the container class.
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }

    fn synonym(self) -> &'static str {
        match self {
            Self::Info => "رسالة معلومات",
            Self::Success => "رسالة إيجابية",
            Self::Error => "رسالة خطأ",
            Self::Warning => "رسالة تحذير",
        }
    }
}

/// Button kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonKind {
    Download,
    Demo,
    Buy,
    Link,
}

impl ButtonKind {
    /// All button kinds in matching order.
    pub const ALL: [Self; 4] = [Self::Download, Self::Demo, Self::Buy, Self::Link];

    /// Primary marker keyword, also the button class.
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Download => "download",
            Self::Demo => "demo",
            Self::Buy => "buy",
            Self::Link => "link",
        }
    }

    /// Localized synonyms; the first one doubles as the default label.
    fn synonyms(self) -> &'static [&'static str] {
        match self {
            Self::Download => &["تحميل", "زر تحميل"],
            Self::Demo => &["معاينة", "زر معاينة"],
            Self::Buy => &["شراء", "زر شراء"],
            Self::Link => &["زيارة الرابط", "زر رابط"],
        }
    }
}

/// Code snippet language.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodeLanguage {
    Html,
    Css,
    JavaScript,
}

impl CodeLanguage {
    /// All languages in matching order.
    pub const ALL: [Self; 3] = [Self::Html, Self::Css, Self::JavaScript];

    /// Language identifier used in the `language-*` class.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Css => "css",
            Self::JavaScript => "javascript",
        }
    }

    /// Icon label shown in the snippet header.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Html => "Html",
            Self::Css => "Css",
            Self::JavaScript => "Js",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Html => "كود html",
            Self::Css => "كود css",
            Self::JavaScript => "كود js",
        }
    }
}

/// What a hide/layout phrase does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HideTarget {
    /// Hide every element matching the selector.
    Selector(&'static str),
    /// Drop the sidebar and widen the main column.
    FullWidth,
}

/// Fixed hide/layout phrases and their effect.
const HIDE_PHRASES: [(&str, HideTarget); 6] = [
    ("بدون مقالات ذات صلة", HideTarget::Selector(".iRelatedPosts")),
    ("بدون جدول محتويات", HideTarget::Selector(".iqraatoc")),
    ("بدون أداة كاتب الموضوع", HideTarget::Selector(".iauthorbox")),
    ("بدون أداة اقرأ أيضاً", HideTarget::Selector(".iAlsoRead")),
    (
        "بدون أداة المقال التالي والسابق",
        HideTarget::Selector(".iPostsPagination"),
    ),
    ("شاشة كاملة", HideTarget::FullWidth),
];

/// Prefixes of the dynamic hide form (`hideElements:.ads,.promo`).
pub const DYNAMIC_HIDE_PREFIXES: [&str; 2] = ["hideElement:", "hideElements:"];

/// Suffix that turns a message marker into its titled variant.
const TITLED_SUFFIX: &str = " بعنوان";

/// The transformation a marker triggers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerKind {
    Message { severity: Severity, titled: bool },
    Button(ButtonKind),
    Code(CodeLanguage),
    Video,
    Pdf,
    Accordion,
    Hide(HideTarget),
}

/// One recognized marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkerDefinition {
    /// Stable identifier (e.g. `success-titled`, `download`).
    pub key: String,
    /// Literal forms in matching order.
    pub match_forms: Vec<String>,
    /// Family the marker belongs to.
    pub family: MarkerFamily,
    /// Transformation to apply on match.
    pub kind: MarkerKind,
}

impl MarkerDefinition {
    fn new(key: impl Into<String>, forms: &[&str], family: MarkerFamily, kind: MarkerKind) -> Self {
        Self {
            key: key.into(),
            match_forms: forms.iter().copied().map(delimit).collect(),
            family,
            kind,
        }
    }
}

/// Wrap a keyword in marker delimiters.
fn delimit(keyword: &str) -> String {
    format!("-{keyword}-")
}

/// The full set of markers, in precedence order.
///
/// # Example
///
/// ```
/// use iqraa_shortcodes::{Catalog, MarkerFamily};
///
/// let catalog = Catalog::standard();
/// assert_eq!(catalog.quote_markers()[0].family, MarkerFamily::Message);
/// assert!(catalog.strike_markers().iter().all(|m| m.family == MarkerFamily::Hide));
/// ```
#[derive(Clone, Debug)]
pub struct Catalog {
    quote: Vec<MarkerDefinition>,
    strike: Vec<MarkerDefinition>,
}

impl Catalog {
    /// Build the standard catalog.
    #[must_use]
    pub fn standard() -> Self {
        let mut quote = Vec::new();

        for severity in Severity::ALL {
            let (primary, synonym) = (severity.class(), severity.synonym());
            let titled_primary = format!("{primary}{TITLED_SUFFIX}");
            let titled_synonym = format!("{synonym}{TITLED_SUFFIX}");
            quote.push(MarkerDefinition::new(
                primary,
                &[primary, synonym],
                MarkerFamily::Message,
                MarkerKind::Message {
                    severity,
                    titled: false,
                },
            ));
            quote.push(MarkerDefinition::new(
                format!("{primary}-titled"),
                &[titled_primary.as_str(), titled_synonym.as_str()],
                MarkerFamily::Message,
                MarkerKind::Message {
                    severity,
                    titled: true,
                },
            ));
        }

        for kind in ButtonKind::ALL {
            let mut forms = vec![kind.class()];
            forms.extend_from_slice(kind.synonyms());
            quote.push(MarkerDefinition::new(
                kind.class(),
                &forms,
                MarkerFamily::Button,
                MarkerKind::Button(kind),
            ));
        }

        for language in CodeLanguage::ALL {
            quote.push(MarkerDefinition::new(
                format!("code-{}", language.id()),
                &[language.label()],
                MarkerFamily::Code,
                MarkerKind::Code(language),
            ));
        }

        quote.push(MarkerDefinition::new(
            "video",
            &["تضمين فيديو", "video"],
            MarkerFamily::Structural,
            MarkerKind::Video,
        ));
        quote.push(MarkerDefinition::new(
            "pdf",
            &["تضمين pdf", "pdf"],
            MarkerFamily::Structural,
            MarkerKind::Pdf,
        ));
        quote.push(MarkerDefinition::new(
            "accordion",
            &["أكورديون"],
            MarkerFamily::Structural,
            MarkerKind::Accordion,
        ));

        let strike = HIDE_PHRASES
            .iter()
            .map(|(phrase, target)| MarkerDefinition {
                key: match target {
                    HideTarget::Selector(selector) => format!("hide{selector}"),
                    HideTarget::FullWidth => "full-width".to_owned(),
                },
                match_forms: vec![(*phrase).to_owned()],
                family: MarkerFamily::Hide,
                kind: MarkerKind::Hide(*target),
            })
            .collect();

        Self { quote, strike }
    }

    /// Quote-block markers in precedence order.
    #[must_use]
    pub fn quote_markers(&self) -> &[MarkerDefinition] {
        &self.quote
    }

    /// Strike-through hide/layout phrases in matching order.
    #[must_use]
    pub fn strike_markers(&self) -> &[MarkerDefinition] {
        &self.strike
    }

    /// Every marker, quote markers first.
    pub fn iter(&self) -> impl Iterator<Item = &MarkerDefinition> {
        self.quote.iter().chain(&self.strike)
    }

    /// Default visible label for a button kind.
    #[must_use]
    pub fn default_button_label(kind: ButtonKind) -> &'static str {
        kind.synonyms().first().copied().unwrap_or(kind.class())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}
