//! Boot: logging init and config resolution.

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use super::cli::Cli;
use crate::conf::AnalyzerConfig;
use crate::error::ConfigError;

/// Initialise the tracing / logging subsystem. Logs go to stderr so stdout
/// carries only results.
pub fn init_logging(quiet: bool) {
    let default_filter = if quiet { "flowscan=warn" } else { "flowscan=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

/// Load config (file, then environment), apply CLI flags, validate.
pub fn boot(cli: &Cli) -> Result<AnalyzerConfig, ConfigError> {
    info!("Starting flowscan v{}", env!("CARGO_PKG_VERSION"));

    let mut config = AnalyzerConfig::load_from(cli.config.as_deref())?;
    cli.apply(&mut config);
    config.validate()?;

    info!(
        parse_mode = config.parse.mode.as_str(),
        in_effect_rule = config.parse.in_effect_rule.as_str(),
        sort = config.query.sort.as_str(),
        "configuration loaded"
    );
    Ok(config)
}
