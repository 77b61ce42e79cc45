//! CLI error types.

use iqraa_config::ConfigError;
use iqraa_runtime::PassError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Pass(#[from] PassError),
}
