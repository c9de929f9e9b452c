use super::schema::Config;

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.log_level.trim().is_empty() {
        errors.push("log_level: must not be empty".to_string());
    }

    for (i, pattern) in config.models.iter().enumerate() {
        if let Err(e) = glob::Pattern::new(pattern) {
            errors.push(format!("models[{}]: invalid pattern '{}' - {}", i, pattern, e));
        }
    }

    if let Some(missing_value) = config.strategies.and_then(|s| s.missing_value) {
        if !missing_value.is_supported() {
            errors.push(format!(
                "strategies.missing_value: '{}' is not supported (use nullPrediction or lastPrediction)",
                missing_value
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StrategyOverrides;
    use crate::tree::MissingValueStrategy;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let config = Config {
            log_level: "  ".to_string(),
            models: vec!["models/*.xml".to_string(), "models/[".to_string()],
            strategies: Some(StrategyOverrides {
                missing_value: Some(MissingValueStrategy::WeightedConfidence),
                no_true_child: None,
            }),
            ..Config::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].starts_with("log_level"));
        assert!(errors[1].starts_with("models[1]"));
        assert!(errors[2].contains("weightedConfidence"));
    }

    #[test]
    fn test_supported_override_is_valid() {
        let config = Config {
            strategies: Some(StrategyOverrides {
                missing_value: Some(MissingValueStrategy::NullPrediction),
                no_true_child: None,
            }),
            ..Config::default()
        };
        assert!(validate_config(&config).is_ok());
    }
}
