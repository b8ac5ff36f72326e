//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{BotConfig, LogOutput, LoggingConfig, PollingConfig, TelestageConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &TelestageConfig) -> ConfigResult<()> {
    validate_bot_config(&config.bot)?;
    validate_polling_config(&config.polling)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

fn validate_bot_config(bot: &BotConfig) -> ConfigResult<()> {
    if bot.token.trim().is_empty() {
        return Err(ConfigError::missing_field("bot.token"));
    }

    validate_url(&bot.api_url)?;

    if bot.request_timeout_secs == 0 {
        return Err(ConfigError::validation(
            "Request timeout must be greater than 0",
        ));
    }

    Ok(())
}

fn validate_polling_config(polling: &PollingConfig) -> ConfigResult<()> {
    if !(1..=100).contains(&polling.limit) {
        return Err(ConfigError::validation(format!(
            "Polling limit must be between 1 and 100, got {}",
            polling.limit
        )));
    }
    Ok(())
}

fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }
    Ok(())
}

fn validate_url(url: &str) -> ConfigResult<()> {
    if url.is_empty() {
        return Err(ConfigError::missing_field("bot.api_url"));
    }

    let valid_schemes = ["http://", "https://"];
    if !valid_schemes.iter().any(|s| url.starts_with(s)) {
        return Err(ConfigError::invalid_url(
            url,
            format!("URL must start with one of: {:?}", valid_schemes),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> TelestageConfig {
        let mut config = TelestageConfig::default();
        config.bot.token = "123:abc".to_string();
        config
    }

    #[test]
    fn test_validate_defaults_with_token() {
        assert!(validate_config(&valid()).is_ok());
    }

    #[test]
    fn test_validate_missing_token() {
        let result = validate_config(&TelestageConfig::default());
        assert!(matches!(
            result,
            Err(ConfigError::MissingField { ref field }) if field == "bot.token"
        ));
    }

    #[test]
    fn test_validate_api_url_scheme() {
        let mut config = valid();
        config.bot.api_url = "ftp://api.telegram.org".to_string();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::InvalidUrl { .. })
        ));

        config.bot.api_url = "http://localhost:8081".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_polling_limit() {
        let mut config = valid();
        config.polling.limit = 0;
        assert!(validate_config(&config).is_err());

        config.polling.limit = 101;
        assert!(validate_config(&config).is_err());

        config.polling.limit = 1;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_zero_request_timeout() {
        let mut config = valid();
        config.bot.request_timeout_secs = 0;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_validate_file_output_needs_path() {
        let mut config = valid();
        config.logging.output = LogOutput::File;
        assert!(validate_config(&config).is_err());

        config.logging.file_path = Some("telestage.log".into());
        assert!(validate_config(&config).is_ok());
    }
}
