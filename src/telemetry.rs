use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log level/filter '{value}': unable to build EnvFilter")]
    EnvFilter {
        value: String,
        #[source]
        source: ParseError,
    },
    #[error("telemetry error: {0}")]
    Subscriber(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Pick the event filter: `--verbose` wins, then `RUST_LOG`, then `log_level`.
fn build_filter(log_level: &str, verbose: bool) -> Result<EnvFilter, TelemetryError> {
    if verbose {
        return Ok(EnvFilter::new("debug"));
    }
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(log_level).map_err(|source| TelemetryError::EnvFilter {
            value: log_level.to_string(),
            source,
        }),
    }
}

/// Install the global subscriber. Events go to stderr so stdout stays
/// clean for results.
pub fn init(log_level: &str, verbose: bool) -> Result<(), TelemetryError> {
    let env_filter = build_filter(log_level, verbose)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_forces_debug() {
        let filter = build_filter("not a [valid filter", true).unwrap();
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn test_invalid_level_is_reported() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let err = build_filter("pmml_tree=loud", false).unwrap_err();
        assert!(err.to_string().contains("pmml_tree=loud"));
    }
}
