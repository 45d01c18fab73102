//! Format-agnostic document loading and saving

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, NormalizedPath, Result, io};

/// Loads and saves serde documents, picking the format from the extension.
///
/// - `.toml` -> TOML
/// - `.json` -> JSON
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Load a document from a file.
    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        match format_of(path)? {
            Format::Json => io::read_json(path),
            Format::Toml => {
                let content = io::read_text(path)?;
                toml::from_str(&content).map_err(|e| Error::ConfigParse {
                    path: path.to_native(),
                    format: "TOML".into(),
                    message: e.to_string(),
                })
            }
        }
    }

    /// Save a document atomically.
    pub fn save<T: Serialize>(&self, path: &NormalizedPath, value: &T) -> Result<()> {
        match format_of(path)? {
            Format::Json => io::write_json(path, value),
            Format::Toml => {
                let content = toml::to_string_pretty(value).map_err(|e| Error::ConfigSerialize {
                    path: path.to_native(),
                    format: "TOML".into(),
                    message: e.to_string(),
                })?;
                io::write_text(path, &content)
            }
        }
    }
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &NormalizedPath) -> Result<Format> {
    let extension = path.extension().unwrap_or("");
    match extension.to_lowercase().as_str() {
        "toml" => Ok(Format::Toml),
        "json" => Ok(Format::Json),
        _ => Err(Error::UnsupportedFormat {
            extension: extension.to_string(),
        }),
    }
}
