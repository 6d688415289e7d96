use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

/// Installs the global subscriber. Logs go to stderr so that command output
/// on stdout stays machine-readable.
///
/// `RUST_LOG` wins over everything; otherwise the filter is the more verbose
/// of the configured level and the `-v` level (`-v` info, `-vv` debug,
/// `-vvv` trace).
///
/// # Errors
///
/// Fails on an invalid filter directive or if a subscriber is already set.
pub fn init_logging(cfg: &LoggingConfig, verbose: u8) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive(&cfg.level, verbose))?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    if cfg.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()?;
    }
    Ok(())
}

/// A configured directive that is not a plain level (e.g. `info,sea_orm=warn`)
/// is kept unless `-v` is given.
fn default_directive(configured: &str, verbose: u8) -> &str {
    let requested = match verbose {
        0 => return configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    match configured.trim().parse::<LevelFilter>() {
        Ok(level) if requested.parse::<LevelFilter>().is_ok_and(|r| level >= r) => configured,
        _ => requested,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flag_keeps_configured_directive() {
        assert_eq!(default_directive("warn", 0), "warn");
        assert_eq!(default_directive("info,sea_orm=warn", 0), "info,sea_orm=warn");
    }

    #[test]
    fn test_flag_raises_quieter_configured_level() {
        assert_eq!(default_directive("warn", 1), "info");
        assert_eq!(default_directive("info", 2), "debug");
        assert_eq!(default_directive("error", 5), "trace");
    }

    #[test]
    fn test_flag_never_lowers_configured_level() {
        assert_eq!(default_directive("trace", 1), "trace");
        assert_eq!(default_directive("debug", 1), "debug");
        assert_eq!(default_directive("DEBUG", 2), "DEBUG");
    }

    #[test]
    fn test_flag_replaces_composite_directive() {
        assert_eq!(default_directive("info,sea_orm=warn", 2), "debug");
    }
}
