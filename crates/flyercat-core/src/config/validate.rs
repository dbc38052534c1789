//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch.batch_size == 0 {
            return Err(ConfigError::ValidationError(
                "batch.batch_size must be > 0".into(),
            ));
        }
        if self.batch.max_concurrent_batches == Some(0) {
            return Err(ConfigError::ValidationError(
                "batch.max_concurrent_batches must be > 0 when set".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.inspect_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.inspect_timeout_ms must be > 0".into(),
            ));
        }
        for (key, name) in [
            ("output.catalog_file", &self.output.catalog_file),
            ("output.metadata_file", &self.output.metadata_file),
            ("output.combined_file", &self.output.combined_file),
        ] {
            if name.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "{key} must not be empty"
                )));
            }
        }
        if self.output.catalog_file == self.output.metadata_file {
            return Err(ConfigError::ValidationError(
                "output.catalog_file and output.metadata_file must differ".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_batch_size() {
        let mut config = Config::default();
        config.batch.batch_size = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("batch_size"));
    }

    #[test]
    fn test_validate_rejects_zero_concurrency_cap() {
        let mut config = Config::default();
        config.batch.max_concurrent_batches = Some(0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_concurrent_batches"));

        config.batch.max_concurrent_batches = Some(2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.limits.inspect_timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("inspect_timeout_ms"));
    }

    #[test]
    fn test_validate_rejects_empty_file_name() {
        let mut config = Config::default();
        config.output.metadata_file = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("metadata_file"));
    }

    #[test]
    fn test_validate_rejects_colliding_split_files() {
        let mut config = Config::default();
        config.output.metadata_file = config.output.catalog_file.clone();
        assert!(config.validate().is_err());
    }
}
