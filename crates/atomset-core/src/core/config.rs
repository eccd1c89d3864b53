use crate::core::models::simbox::LengthUnit;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Recognised settings for a new [`AtomSelection`](crate::core::models::selection::AtomSelection).
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionConfig {
    /// Unit of all stored coordinates and box vectors.
    pub unit: LengthUnit,
    /// Box edge vectors, one per row. `None` means no periodic box.
    #[serde(rename = "box")]
    pub box_vectors: Option<[[f64; 3]; 3]>,
    /// Default title for written files.
    pub title: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

impl SelectionConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content).map_err(|e| ConfigError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }
}

#[derive(Default)]
pub struct SelectionConfigBuilder {
    unit: Option<LengthUnit>,
    box_vectors: Option<[[f64; 3]; 3]>,
    title: Option<String>,
}

impl SelectionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unit(mut self, unit: LengthUnit) -> Self {
        self.unit = Some(unit);
        self
    }
    pub fn box_vectors(mut self, rows: [[f64; 3]; 3]) -> Self {
        self.box_vectors = Some(rows);
        self
    }
    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn build(self) -> SelectionConfig {
        SelectionConfig {
            unit: self.unit.unwrap_or_default(),
            box_vectors: self.box_vectors,
            title: self.title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = SelectionConfig::from_toml_str("").unwrap();
        assert_eq!(config, SelectionConfig::default());
        assert_eq!(config.unit, LengthUnit::Angstrom);
    }

    #[test]
    fn parses_all_recognised_fields() {
        let config = SelectionConfig::from_toml_str(
            r#"
            unit = "nm"
            title = "Lysozyme in water"
            box = [[7.0, 0.0, 0.0], [0.0, 7.0, 0.0], [0.0, 0.0, 7.0]]
            "#,
        )
        .unwrap();
        assert_eq!(config.unit, LengthUnit::Nanometer);
        assert_eq!(config.title.as_deref(), Some("Lysozyme in water"));
        assert_eq!(config.box_vectors.unwrap()[2][2], 7.0);
    }

    #[test]
    fn rejects_unknown_fields_and_units() {
        assert!(SelectionConfig::from_toml_str("colour = \"red\"").is_err());
        assert!(SelectionConfig::from_toml_str("unit = \"pm\"").is_err());
    }

    #[test]
    fn from_path_reads_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("selection.toml");
        fs::write(&path, "unit = \"A\"\ntitle = \"t\"\n").unwrap();
        let config = SelectionConfig::from_path(&path).unwrap();
        assert_eq!(config.title.as_deref(), Some("t"));
    }

    #[test]
    fn from_path_reports_missing_and_malformed_files() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            SelectionConfig::from_path(&missing),
            Err(ConfigError::Io { .. })
        ));

        let malformed = dir.path().join("malformed.toml");
        fs::write(&malformed, "this is not toml").unwrap();
        assert!(matches!(
            SelectionConfig::from_path(&malformed),
            Err(ConfigError::Toml { .. })
        ));
    }

    #[test]
    fn builder_sets_fields() {
        let config = SelectionConfigBuilder::new()
            .unit(LengthUnit::Nanometer)
            .box_vectors([[1.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 3.0]])
            .title("built")
            .build();
        assert_eq!(config.unit, LengthUnit::Nanometer);
        assert_eq!(config.title.as_deref(), Some("built"));
        assert_eq!(config.box_vectors.unwrap()[1][1], 2.0);

        assert_eq!(SelectionConfigBuilder::new().build(), SelectionConfig::default());
    }
}
