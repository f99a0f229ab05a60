use crate::{ConfigError, FromEnv, env_list, env_or_default, env_parse};

/// Localization settings for user-facing messages
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct I18nConfig {
    /// Locale used when a request asks for nothing supported
    pub default_locale: String,
    /// Locales a request may negotiate
    pub supported_locales: Vec<String>,
    /// Return the message code itself when no message is found
    pub use_code_as_default_message: bool,
}

impl FromEnv for I18nConfig {
    /// Reads from environment variables:
    /// - DEFAULT_LOCALE: defaults to "en"
    /// - SUPPORTED_LOCALES: comma-separated, defaults to "en,fi"
    /// - MESSAGES_USE_CODE_AS_DEFAULT: defaults to false
    ///
    /// The default locale is always supported.
    fn from_env() -> Result<Self, ConfigError> {
        let default_locale = env_or_default("DEFAULT_LOCALE", "en").trim().to_string();
        if default_locale.is_empty() {
            return Err(ConfigError::ParseError {
                key: "DEFAULT_LOCALE".to_string(),
                details: "locale cannot be empty".to_string(),
            });
        }

        let mut supported_locales = env_list("SUPPORTED_LOCALES", "en,fi");
        if !supported_locales
            .iter()
            .any(|locale| locale.eq_ignore_ascii_case(&default_locale))
        {
            supported_locales.insert(0, default_locale.clone());
        }

        let use_code_as_default_message = env_parse("MESSAGES_USE_CODE_AS_DEFAULT", false)?;

        Ok(Self {
            default_locale,
            supported_locales,
            use_code_as_default_message,
        })
    }
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_locale: "en".to_string(),
            supported_locales: vec!["en".to_string(), "fi".to_string()],
            use_code_as_default_message: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 3] = [
        "DEFAULT_LOCALE",
        "SUPPORTED_LOCALES",
        "MESSAGES_USE_CODE_AS_DEFAULT",
    ];

    #[test]
    fn test_i18n_config_defaults() {
        temp_env::with_vars_unset(VARS, || {
            assert_eq!(I18nConfig::from_env().unwrap(), I18nConfig::default());
        });
    }

    #[test]
    fn test_i18n_config_custom_values() {
        temp_env::with_vars(
            [
                ("DEFAULT_LOCALE", Some("fi")),
                ("SUPPORTED_LOCALES", Some("fi, en-US")),
                ("MESSAGES_USE_CODE_AS_DEFAULT", Some("true")),
            ],
            || {
                let config = I18nConfig::from_env().unwrap();
                assert_eq!(config.default_locale, "fi");
                assert_eq!(config.supported_locales, vec!["fi", "en-US"]);
                assert!(config.use_code_as_default_message);
            },
        );
    }

    #[test]
    fn test_default_locale_is_always_supported() {
        temp_env::with_vars(
            [
                ("DEFAULT_LOCALE", Some("sv")),
                ("SUPPORTED_LOCALES", Some("en,fi")),
                ("MESSAGES_USE_CODE_AS_DEFAULT", None),
            ],
            || {
                let config = I18nConfig::from_env().unwrap();
                assert_eq!(config.supported_locales, vec!["sv", "en", "fi"]);
            },
        );
    }

    #[test]
    fn test_malformed_flag_is_rejected() {
        temp_env::with_var("MESSAGES_USE_CODE_AS_DEFAULT", Some("yes"), || {
            let err = I18nConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("MESSAGES_USE_CODE_AS_DEFAULT"));
        });
    }

    #[test]
    fn test_blank_default_locale_is_rejected() {
        temp_env::with_var("DEFAULT_LOCALE", Some("  "), || {
            assert!(I18nConfig::from_env().is_err());
        });
    }
}
