use std::fs;
use std::io;
use std::path::PathBuf;

use ocean_game::{DataLoader, SuiteConfig};

/// Reads named configuration documents from the web crate's asset directory.
#[derive(Debug, Clone)]
pub struct AssetDir {
    root: PathBuf,
}

impl Default for AssetDir {
    fn default() -> Self {
        Self {
            root: PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("..")
                .join("ocean-web")
                .join("static")
                .join("assets")
                .join("data"),
        }
    }
}

impl AssetDir {
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read asset: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse asset: {0}")]
    Json(#[from] serde_json::Error),
}

impl DataLoader for AssetDir {
    type Error = AssetError;

    fn load_config<T>(&self, config_name: &str) -> Result<T, Self::Error>
    where
        T: serde::de::DeserializeOwned,
    {
        let path = self.root.join(format!("{config_name}.json"));
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Configuration every simulation runs against.
#[derive(Debug, Clone)]
pub struct TesterAssets {
    pub config: SuiteConfig,
}

impl TesterAssets {
    /// Load the shipped suite configuration, falling back to built-in defaults
    /// when the asset is missing or invalid.
    #[must_use]
    pub fn load_default() -> Self {
        Self::load_from(&AssetDir::default())
    }

    #[must_use]
    pub fn load_from(dir: &AssetDir) -> Self {
        let config = dir
            .load_config::<SuiteConfig>(ocean_game::SUITE_CONFIG)
            .map_err(|err| err.to_string())
            .and_then(|config| {
                config.validate().map_err(|err| err.to_string())?;
                Ok(config)
            })
            .unwrap_or_else(|err| {
                eprintln!("⚠️ Falling back to default suite config: {err}");
                SuiteConfig::default()
            });
        Self { config }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_assets_load() {
        let assets = TesterAssets::load_default();
        assert_eq!(assets.config, SuiteConfig::default());
    }

    #[test]
    fn missing_directory_falls_back_to_defaults() {
        let assets = TesterAssets::load_from(&AssetDir::new(PathBuf::from("/nonexistent/ocean")));
        assert_eq!(assets.config.sentence_sea.total_rounds, 5);
    }
}
