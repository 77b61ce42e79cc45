//! `iqraa markers` command implementation.

use clap::Args;
use iqraa_shortcodes::{Catalog, DYNAMIC_HIDE_PREFIXES, MarkerFamily};

use crate::error::CliError;
use crate::output::Output;

/// Families in listing order.
const FAMILIES: [MarkerFamily; 5] = [
    MarkerFamily::Message,
    MarkerFamily::Button,
    MarkerFamily::Code,
    MarkerFamily::Structural,
    MarkerFamily::Hide,
];

/// Arguments for the markers command.
#[derive(Args)]
pub(crate) struct MarkersArgs {
    /// Only list this family (message, button, code, structural, hide).
    #[arg(short, long)]
    family: Option<String>,
}

impl MarkersArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let catalog = Catalog::standard();

        for family in FAMILIES {
            if self.family.as_deref().is_some_and(|name| name != family.name()) {
                continue;
            }
            output.heading(family.name());
            for (key, forms) in family_entries(&catalog, family) {
                output.entry(&key, &forms);
            }
        }
        output.detail("Quote markers match inside <blockquote>; hide phrases inside <s>, <strike>, <del>.");
        Ok(())
    }
}

/// One entry per marker: key, then its forms in matching order.
fn family_entries(catalog: &Catalog, family: MarkerFamily) -> Vec<(String, String)> {
    let mut entries: Vec<(String, String)> = catalog
        .iter()
        .filter(|marker| marker.family == family)
        .map(|marker| (marker.key.clone(), marker.match_forms.join(" | ")))
        .collect();
    if family == MarkerFamily::Hide {
        entries.extend(
            DYNAMIC_HIDE_PREFIXES
                .iter()
                .map(|prefix| ("hide-dynamic".to_owned(), format!("{prefix}<selector>"))),
        );
    }
    entries
}
