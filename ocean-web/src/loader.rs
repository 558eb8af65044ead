//! Configuration embedded from `static/assets/data`.
use once_cell::sync::OnceCell;
use ocean_game::{DataLoader, SUITE_CONFIG, SuiteConfig};
use serde::de::DeserializeOwned;

/// Data loader over the JSON assets compiled into the bundle.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebDataLoader;

#[derive(Debug, thiserror::Error)]
pub enum WebDataError {
    #[error("Unknown config: {0}")]
    UnknownConfig(String),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(#[from] ocean_game::ConfigError),
}

impl WebDataLoader {
    /// Raw JSON for a named asset.
    ///
    /// # Errors
    ///
    /// Returns [`WebDataError::UnknownConfig`] for a name with no embedded asset.
    pub fn asset(config_name: &str) -> Result<&'static str, WebDataError> {
        match config_name {
            SUITE_CONFIG => Ok(include_str!("../static/assets/data/suite.json")),
            _ => Err(WebDataError::UnknownConfig(config_name.to_string())),
        }
    }
}

impl DataLoader for WebDataLoader {
    type Error = WebDataError;

    fn load_config<T>(&self, config_name: &str) -> Result<T, Self::Error>
    where
        T: DeserializeOwned,
    {
        Ok(serde_json::from_str(Self::asset(config_name)?)?)
    }
}

static SUITE: OnceCell<SuiteConfig> = OnceCell::new();

/// The embedded suite configuration, parsed and validated once.
///
/// # Errors
///
/// Returns [`WebDataError`] if the embedded asset is malformed or invalid.
pub fn suite_config() -> Result<&'static SuiteConfig, WebDataError> {
    SUITE.get_or_try_init(|| {
        let config: SuiteConfig = WebDataLoader.load_config(SUITE_CONFIG)?;
        config.validate()?;
        Ok(config)
    })
}
