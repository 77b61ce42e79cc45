//! `iqraa render` command implementation.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use iqraa_config::{CliSettings, Config};
use iqraa_dom::Document;
use iqraa_media::NoViewport;
use iqraa_runtime::{Page, PageSettings, PassError, PassReport, ProductFeed};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// HTML page to process.
    input: PathBuf,

    /// Where to write the result (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover iqraa.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content scope selector (overrides config).
    #[arg(long)]
    scope: Option<String>,

    /// Mutation debounce in milliseconds (overrides config).
    #[arg(long, env = "IQRAA_DEBOUNCE_MS")]
    debounce_ms: Option<u64>,

    /// Directory of `<post-id>.html` feed entries for related-product boxes.
    #[arg(long)]
    product_feed: Option<PathBuf>,

    /// Enable verbose output (pass summaries).
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the input cannot be read, the
    /// pass fails or the result cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            scope: self.scope,
            debounce_ms: self.debounce_ms,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            output.info(&format!("Config: {}", path.display()));
        }

        let html = std::fs::read_to_string(&self.input)?;
        let feed = self.product_feed.map(DirFeed::new);
        let rendered = render(
            &html,
            PageSettings::from(&config),
            feed.as_ref().map(|feed| feed as &dyn ProductFeed),
        )?;

        match &self.output {
            Some(path) => std::fs::write(path, &rendered.html)?,
            None => std::io::stdout().lock().write_all(rendered.html.as_bytes())?,
        }

        let report = rendered.report;
        output.success(&format!(
            "Rewrote {} marker(s), left {} unmatched, activated {} media element(s)",
            report.shortcodes.rewritten, report.shortcodes.rejected, report.media.activated
        ));
        if feed.is_some() {
            output.info(&format!("Filled {} product box(es)", rendered.products));
        }
        if let Some(path) = &self.output {
            output.info(&format!("Output: {}", path.display()));
        }
        Ok(())
    }
}

/// Result of rendering one page.
struct Rendered {
    html: String,
    report: PassReport,
    products: usize,
}

/// Run a full page initialization on a surface without layout, so every
/// deferred media element activates eagerly.
fn render(
    html: &str,
    settings: PageSettings,
    feed: Option<&dyn ProductFeed>,
) -> Result<Rendered, CliError> {
    let mut page = Page::new(Document::parse(html), settings);
    let report = page.init(&NoViewport)?;
    let products = match feed {
        Some(feed) => page.hydrate_products(feed).map_err(PassError::from)?,
        None => 0,
    };
    Ok(Rendered {
        html: page.into_document().to_html(),
        report,
        products,
    })
}

/// Feed entries stored as `<post-id>.html` files in a directory.
struct DirFeed {
    dir: PathBuf,
}

impl DirFeed {
    fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn entry_path(&self, post_id: &str) -> Option<PathBuf> {
        let valid = !post_id.is_empty()
            && post_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then(|| self.dir.join(format!("{post_id}.html")))
    }
}

impl ProductFeed for DirFeed {
    fn entry_html(&self, post_id: &str) -> Option<String> {
        let path = self.entry_path(post_id)?;
        read_entry(&path)
    }
}

fn read_entry(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(html) => Some(html),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Feed entry unavailable");
            None
        }
    }
}
