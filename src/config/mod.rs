//! Client configuration.
//!
//! A [`Config`] is validated before any client is built from it,
//! see [`crate::api::Gelbooru::from_config`].

use std::time::Duration;

use serde::Deserialize;
pub use validator::Validate;
use validator::ValidationError;

use crate::error::{Error, Result};

/// A documented configuration file, which is also a valid one.
pub const DEFAULT_CONFIG_STR: &str = include_str!("default.toml");

/// The base URL of the Gelbooru.
pub const BASE_URL: &str = "https://gelbooru.com/index.php";

const DEFAULT_TIMEOUT: u64 = 30;

/// The static credentials appended to every request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub(crate) api_key: String,
    pub(crate) user_id: String,
}

impl Credentials {
    /// Pair an API key with its user ID.
    ///
    /// Empty strings count as absent.
    ///
    /// # Errors
    ///
    /// If exactly one of them is given, this function will return [`Error::Validation`].
    pub fn new(api_key: Option<String>, user_id: Option<String>) -> Result<Option<Self>> {
        let api_key = api_key.filter(|s| !s.is_empty());
        let user_id = user_id.filter(|s| !s.is_empty());
        match (api_key, user_id) {
            (Some(api_key), Some(user_id)) => Ok(Some(Self { api_key, user_id })),
            (None, None) => Ok(None),
            _ => Err(Error::validation(CREDENTIALS_MESSAGE)),
        }
    }
}

// never print the key
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"***")
            .field("user_id", &self.user_id)
            .finish()
    }
}

const CREDENTIALS_MESSAGE: &str = "both api key and user id must be specified if either is";

fn validate_credentials(config: &Config) -> Result<(), ValidationError> {
    Credentials::new(config.api_key.clone(), config.user_id.clone())
        .map(|_| ())
        .map_err(|_| ValidationError::new("credentials").with_message(CREDENTIALS_MESSAGE.into()))
}

/// Where and how to reach the API.
#[non_exhaustive]
#[derive(Debug, Deserialize, Clone, Validate)]
#[validate(schema(function = "validate_credentials"))]
#[serde(default)]
pub struct Config {
    /// The API entry point, e.g. [`BASE_URL`].
    #[validate(url(message = "base_url must be a valid URL"))]
    pub base_url: String,
    /// Must be given together with [`Self::user_id`].
    pub api_key: Option<String>,
    /// Must be given together with [`Self::api_key`].
    pub user_id: Option<String>,
    /// Request timeout in seconds, `0` disables it.
    pub timeout: u64,
    /// The `User-Agent` header sent with every request.
    #[validate(length(min = 1, message = "user_agent must not be empty"))]
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            api_key: None,
            user_id: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    /// Set the credentials.
    pub fn with_credentials(
        mut self,
        api_key: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        self.api_key = Some(api_key.into());
        self.user_id = Some(user_id.into());
        self
    }

    /// Set the timeout in seconds, `0` disables it.
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    /// Parse and validate a TOML document. See [`DEFAULT_CONFIG_STR`] for the format.
    ///
    /// # Errors
    ///
    /// If the document is not valid TOML, or the config is invalid,
    /// this function will return [`Error::Validation`].
    #[cfg(feature = "toml")]
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|err| Error::validation(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// The validated credentials.
    pub(crate) fn credentials(&self) -> Result<Option<Credentials>> {
        Credentials::new(self.api_key.clone(), self.user_id.clone())
    }

    #[inline]
    fn timeout(&self) -> Option<Duration> {
        (self.timeout > 0).then(|| Duration::from_secs(self.timeout))
    }

    /// Build the async HTTP client for this config.
    pub(crate) fn build_client(&self) -> reqwest::Result<reqwest::Client> {
        let client_builder = reqwest::Client::builder().user_agent(&self.user_agent);
        let client_builder = match self.timeout() {
            Some(timeout) => client_builder.timeout(timeout),
            None => client_builder,
        };
        client_builder.build()
    }

    /// Build the blocking HTTP client for this config.
    pub(crate) fn build_blocking_client(&self) -> reqwest::Result<reqwest::blocking::Client> {
        // the blocking client defaults to a 30s timeout, so always set it explicitly
        reqwest::blocking::Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.timeout())
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        Config::default().validate().unwrap();
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_parse_default_config() -> anyhow::Result<()> {
        let config = Config::from_toml_str(DEFAULT_CONFIG_STR)?;
        assert_eq!(config.base_url, BASE_URL);
        assert_eq!(config.api_key, None);
        assert_eq!(config.timeout, 30);
        Ok(())
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_parse_half_credentials() {
        let toml = r#"
            api_key = "abc"
        "#;
        let err = Config::from_toml_str(toml).expect_err("half credentials should be invalid");
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_invalid_base_url() {
        let config = Config {
            base_url: "not a url".into(),
            ..Config::default()
        };
        config.validate().expect_err("base_url should be a URL");
    }

    #[test]
    fn test_credentials_both_or_neither() {
        assert!(Credentials::new(None, None).unwrap().is_none());
        assert!(Credentials::new(Some("key".into()), Some("42".into()))
            .unwrap()
            .is_some());
        assert!(Credentials::new(Some("key".into()), None).is_err());
        assert!(Credentials::new(None, Some("42".into())).is_err());
        // empty counts as absent
        assert!(Credentials::new(Some("key".into()), Some(String::new())).is_err());

        let config = Config::default().with_credentials("key", "");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_credentials_debug_hides_key() {
        let credentials = Credentials::new(Some("secret".into()), Some("42".into()))
            .unwrap()
            .unwrap();
        assert!(!format!("{credentials:?}").contains("secret"));
    }
}
