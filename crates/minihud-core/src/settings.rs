use std::path::Path;

use minihud_store::{ChunkLimits, DEFAULT_CHUNK_WIDTH, DEFAULT_MAX_PAYLOAD};
use serde::{Deserialize, Serialize};

use crate::error::HudResult;

/// Process-wide persistence settings shared by every registered HUD.
///
/// ```toml
/// key_prefix = "trh:hud"
/// chunk_width = 1000
/// max_payload = 63000
/// version = "1"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HudSettings {
    /// Namespace for the two record keys (`<prefix>.config`, `<prefix>.store`).
    pub key_prefix: String,
    /// Split width for chunked records, in characters.
    pub chunk_width: usize,
    /// Largest encoded record accepted, in characters.
    pub max_payload: usize,
    /// Optional version tag written into record metadata.
    pub version: Option<String>,
}

impl Default for HudSettings {
    fn default() -> Self {
        Self {
            key_prefix: "trh:hud".into(),
            chunk_width: DEFAULT_CHUNK_WIDTH,
            max_payload: DEFAULT_MAX_PAYLOAD,
            version: None,
        }
    }
}

impl HudSettings {
    /// Parse settings from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> HudResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read settings from a TOML file.
    pub fn load(path: &Path) -> HudResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn config_key(&self) -> String {
        format!("{}.config", self.key_prefix)
    }

    pub fn store_key(&self) -> String {
        format!("{}.store", self.key_prefix)
    }

    pub fn limits(&self) -> ChunkLimits {
        ChunkLimits {
            width: self.chunk_width.max(1),
            max_payload: self.max_payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = HudSettings::default();
        assert_eq!(s.config_key(), "trh:hud.config");
        assert_eq!(s.store_key(), "trh:hud.store");
        assert_eq!(s.limits(), ChunkLimits { width: 1000, max_payload: 63_000 });
        assert!(s.version.is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let s = HudSettings::from_toml_str("key_prefix = \"game:hud\"\nversion = \"3\"").unwrap();
        assert_eq!(s.config_key(), "game:hud.config");
        assert_eq!(s.version.as_deref(), Some("3"));
        assert_eq!(s.chunk_width, 1000);
    }

    #[test]
    fn zero_width_is_raised() {
        let s = HudSettings::from_toml_str("chunk_width = 0").unwrap();
        assert_eq!(s.limits().width, 1);
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(HudSettings::from_toml_str("chunk_width = \"wide\"").is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hud.toml");
        std::fs::write(&path, "max_payload = 500\n").unwrap();
        let s = HudSettings::load(&path).unwrap();
        assert_eq!(s.max_payload, 500);
    }
}
