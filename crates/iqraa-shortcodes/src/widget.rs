//! Widget markup.
//!
//! Class names emitted here are a public contract: theme stylesheets and the
//! UI event binder select on them.

use std::fmt::Write;

use crate::catalog::{ButtonKind, CodeLanguage, Severity};
use crate::text::escape_html;
use crate::youtube::embed_url;

/// Default copy-button icon.
pub const DEFAULT_COPY_ICON: &str = "<svg class='iCS__icon' viewBox='0 0 24 24' width='18' height='18' aria-hidden='true'><path d='M16 1H4c-1.1 0-2 .9-2 2v14h2V3h12V1zm3 4H8c-1.1 0-2 .9-2 2v14c0 1.1.9 2 2 2h11c1.1 0 2-.9 2-2V7c0-1.1-.9-2-2-2zm0 16H8V7h11v14z'/></svg>";

/// Default copy-button label.
pub const DEFAULT_COPY_LABEL: &str = "نسخ الكود";

const ACCORDION_ARROW: &str = r#"<svg class="iACC__arrow" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path d="M0 7.33 2.83 4.5 12 13.84l9.17-9.34L24 7.33 12 19.5z"/></svg>"#;

const FULL_WIDTH_STYLE: &str =
    "<style>.item #main-wrapper{width:100%}.item #sidebar-wrapper{display:none}</style>";

/// Page-level presentation settings for widgets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetOptions {
    /// Markup placed before the copy-button label.
    pub copy_icon: String,
    /// Copy-button label.
    pub copy_label: String,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            copy_icon: DEFAULT_COPY_ICON.to_owned(),
            copy_label: DEFAULT_COPY_LABEL.to_owned(),
        }
    }
}

/// A matched marker together with its captured content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Widget {
    /// Alert box; `content` is markup and is inserted verbatim.
    Message {
        severity: Severity,
        titled: bool,
        content: String,
    },
    /// Link button.
    Button {
        kind: ButtonKind,
        url: String,
        label: String,
    },
    /// Code snippet; `code` is plain text.
    Code { language: CodeLanguage, code: String },
    /// Deferred YouTube embed.
    Video { id: String },
    /// Deferred document frame.
    Pdf { url: String },
    /// Collapsible section; `body` is markup and is inserted verbatim.
    Accordion { title: String, body: String },
    /// Style rule hiding a selector list.
    Hide { selectors: String },
    /// Style rules removing the sidebar.
    FullWidth,
}

impl Widget {
    /// Render the widget markup.
    #[must_use]
    pub fn render(&self, options: &WidgetOptions) -> String {
        let mut out = String::new();
        match self {
            Self::Message {
                severity,
                titled,
                content,
            } => {
                let title = if *titled {
                    r#"<span class="imtitle"></span>"#
                } else {
                    ""
                };
                write!(
                    out,
                    r#"<div class="iqraa-message {}">{title}{content}</div>"#,
                    severity.class()
                )
                .unwrap();
            }
            Self::Button { kind, url, label } => {
                write!(
                    out,
                    r#"<a class="button {} soft-rounded" href="{}" target="_blank" rel="noopener noreferrer"><span>{}</span></a>"#,
                    escape_html(kind.class()),
                    escape_html(url),
                    escape_html(label)
                )
                .unwrap();
            }
            Self::Code { language, code } => {
                let icon = language.icon();
                write!(
                    out,
                    concat!(
                        r#"<div class="iCodeSnippet">"#,
                        r#"<div class="iCS__header">"#,
                        r##"<span class="iCS__type"><svg><use xlink:href="#i{icon}Icon"></use></svg> {icon_label}</span>"##,
                        r#"<button class="iCS__copy_btn" type="button">{copy_icon}{copy_label}</button>"#,
                        "</div>",
                        r#"<pre class="iCS__pre"><code class="iCS__code language-{lang}">{code}</code></pre>"#,
                        "</div>"
                    ),
                    icon = icon,
                    icon_label = escape_html(icon),
                    copy_icon = options.copy_icon,
                    copy_label = escape_html(&options.copy_label),
                    lang = escape_html(language.id()),
                    code = escape_html(code),
                )
                .unwrap();
            }
            Self::Video { id } => {
                write!(
                    out,
                    concat!(
                        r#"<div class="iYouTubeiFrame"><iframe allow="accelerometer; autoplay; encrypted-media; gyroscope; picture-in-picture" "#,
                        r#"allowfullscreen="" class="iframe-video iYTBLazy" data-src="{}" "#,
                        r#"frameborder="0" title="YouTube video player"></iframe></div>"#
                    ),
                    escape_html(&embed_url(id))
                )
                .unwrap();
            }
            Self::Pdf { url } => {
                write!(
                    out,
                    r#"<iframe class="lazyload" data-src="{}" width="100%" height="600px"></iframe>"#,
                    escape_html(url)
                )
                .unwrap();
            }
            Self::Accordion { title, body } => {
                write!(
                    out,
                    concat!(
                        r#"<div class="iAccordion">"#,
                        r#"<div aria-expanded="false" class="iACC__header" tabindex="0">{title}{arrow}</div>"#,
                        r#"<div aria-hidden="true" class="iACC__body"><div class="iACC__content">{body}</div></div>"#,
                        "</div>"
                    ),
                    title = escape_html(title),
                    arrow = ACCORDION_ARROW,
                    body = body,
                )
                .unwrap();
            }
            Self::Hide { selectors } => {
                write!(out, "<style>{selectors}{{display:none!important;}}</style>").unwrap();
            }
            Self::FullWidth => out.push_str(FULL_WIDTH_STYLE),
        }
        out
    }
}
