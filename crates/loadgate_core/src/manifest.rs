//! Scenario manifest serialization
//!
//! A [`ScenarioManifest`] lists the assets a scenario needs preloaded,
//! plus an optional description shown on the welcome screen. Manifests
//! are loaded from and saved to RON files.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use crate::orchestrator::ScenarioIntro;

/// Reference to one asset a scenario needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRef {
    /// Opaque asset identifier, passed through to the source unchanged
    pub path: String,
    /// Optional human-readable label (for progress display/debugging)
    #[serde(default)]
    pub label: Option<String>,
}

/// A loadable scenario: its preload list and welcome-screen description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioManifest {
    /// Scenario name (for display/debugging)
    pub name: String,
    /// Welcome screen title
    #[serde(default)]
    pub description_title: Option<String>,
    /// Welcome screen body text
    #[serde(default)]
    pub description_content: Option<String>,
    /// Assets to preload before the scenario starts
    pub assets: Vec<AssetRef>,
}

impl ScenarioManifest {
    /// Create a new empty manifest
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description_title: None,
            description_content: None,
            assets: Vec::new(),
        }
    }

    /// Load a manifest from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ManifestLoadError> {
        let contents = fs::read_to_string(path)?;
        let manifest = ron::from_str(&contents)?;
        Ok(manifest)
    }

    /// Save a manifest to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ManifestSaveError> {
        let pretty = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(false);
        let contents = ron::ser::to_string_pretty(self, pretty)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Set the welcome screen description
    pub fn with_description(
        mut self,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        self.description_title = Some(title.into());
        self.description_content = Some(content.into());
        self
    }

    /// Add an asset reference to this manifest
    pub fn add_asset(&mut self, path: impl Into<String>) {
        self.assets.push(AssetRef {
            path: path.into(),
            label: None,
        });
    }

    /// Welcome screen content, when this scenario carries a description
    ///
    /// Returns `None` when no title is set; a missing body yields empty
    /// content.
    pub fn intro(&self) -> Option<ScenarioIntro> {
        let title = self.description_title.clone()?;
        let content = self.description_content.clone().unwrap_or_default();
        Some(ScenarioIntro { title, content })
    }
}

/// Error loading a manifest
#[derive(Debug)]
pub enum ManifestLoadError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid RON syntax)
    Parse(ron::error::SpannedError),
}

impl From<io::Error> for ManifestLoadError {
    fn from(e: io::Error) -> Self {
        ManifestLoadError::Io(e)
    }
}

impl From<ron::error::SpannedError> for ManifestLoadError {
    fn from(e: ron::error::SpannedError) -> Self {
        ManifestLoadError::Parse(e)
    }
}

impl std::fmt::Display for ManifestLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManifestLoadError::Io(e) => write!(f, "IO error: {}", e),
            ManifestLoadError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for ManifestLoadError {}

/// Error saving a manifest
#[derive(Debug)]
pub enum ManifestSaveError {
    /// IO error (permission denied, disk full, etc.)
    Io(io::Error),
    /// Serialization error
    Serialize(ron::Error),
}

impl From<io::Error> for ManifestSaveError {
    fn from(e: io::Error) -> Self {
        ManifestSaveError::Io(e)
    }
}

impl From<ron::Error> for ManifestSaveError {
    fn from(e: ron::Error) -> Self {
        ManifestSaveError::Serialize(e)
    }
}

impl std::fmt::Display for ManifestSaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManifestSaveError::Io(e) => write!(f, "IO error: {}", e),
            ManifestSaveError::Serialize(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for ManifestSaveError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("loadgate_manifest_tests");
        fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn test_new_manifest_is_empty() {
        let manifest = ScenarioManifest::new("Test Track");
        assert_eq!(manifest.name, "Test Track");
        assert!(manifest.assets.is_empty());
        assert!(manifest.intro().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let mut manifest = ScenarioManifest::new("Downtown")
            .with_description("Downtown", "Explore the city block.");
        manifest.add_asset("models/city.glb");
        manifest.add_asset("models/car.glb");

        let path = temp_path("roundtrip.ron");
        manifest.save(&path).unwrap();

        let reloaded = ScenarioManifest::load(&path).unwrap();
        assert_eq!(reloaded.name, "Downtown");
        assert_eq!(reloaded.assets.len(), 2);
        assert_eq!(reloaded.assets[0].path, "models/city.glb");
        assert_eq!(
            reloaded.description_content.as_deref(),
            Some("Explore the city block.")
        );

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = ScenarioManifest::load("/nonexistent/manifest.ron");
        assert!(matches!(result, Err(ManifestLoadError::Io(_))));
    }

    #[test]
    fn test_load_invalid_ron_is_parse_error() {
        let path = temp_path("broken.ron");
        fs::write(&path, "(name: \"x\", assets: [").unwrap();

        let result = ScenarioManifest::load(&path);
        assert!(matches!(result, Err(ManifestLoadError::Parse(_))));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_optional_fields_default() {
        let manifest: ScenarioManifest =
            ron::from_str("(name: \"Bare\", assets: [(path: \"a.glb\")])").unwrap();
        assert_eq!(manifest.name, "Bare");
        assert!(manifest.description_title.is_none());
        assert!(manifest.assets[0].label.is_none());
    }

    #[test]
    fn test_intro_requires_title() {
        let mut manifest = ScenarioManifest::new("NoTitle");
        manifest.description_content = Some("body only".to_string());
        assert!(manifest.intro().is_none());

        manifest.description_title = Some("Title".to_string());
        let intro = manifest.intro().unwrap();
        assert_eq!(intro.title, "Title");
        assert_eq!(intro.content, "body only");
    }

    #[test]
    fn test_intro_with_missing_content_is_empty() {
        let mut manifest = ScenarioManifest::new("TitleOnly");
        manifest.description_title = Some("Title".to_string());
        let intro = manifest.intro().unwrap();
        assert_eq!(intro.content, "");
    }
}
