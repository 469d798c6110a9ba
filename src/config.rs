use std::path::Path;

use crate::error::Error;

/// Viewer configuration loaded from `.schemaview.toml` next to the schema.
/// Everything here is a display default; command-line flags override it.
pub struct Config {
    /// Maximum tree depth rendered by `view`; 0 means unlimited.
    pub max_depth: usize,
    /// Whether `view` prints property descriptions.
    pub show_descriptions: bool,
}

/// Raw TOML structure for `.schemaview.toml`.
#[derive(serde::Deserialize)]
struct SchemaviewTomlConfig {
    #[serde(default)]
    view: ViewSection,
}

#[derive(Default, serde::Deserialize)]
struct ViewSection {
    #[serde(default)]
    max_depth: Option<usize>,
    #[serde(default)]
    show_descriptions: Option<bool>,
}

impl Config {
    /// Load config from `.schemaview.toml` in the given directory.
    /// Returns display defaults if the file doesn't exist. Returns an error
    /// if the file exists but is malformed — never silently falls back to
    /// defaults when the user wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(directory: &Path) -> Result<Self, Error> {
        let path = directory.join(".schemaview.toml");
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::defaults()),
            Err(e) => return Err(Error::Io(e)),
        };

        let raw: SchemaviewTomlConfig = toml::from_str(&content)?;
        let defaults = Self::defaults();
        Ok(Self {
            max_depth: raw.view.max_depth.unwrap_or(defaults.max_depth),
            show_descriptions: raw.view.show_descriptions.unwrap_or(defaults.show_descriptions),
        })
    }

    fn defaults() -> Self {
        Self {
            max_depth: 0,
            show_descriptions: true,
        }
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::Config;

    #[test]
    fn absent_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.max_depth, 0);
        assert!(config.show_descriptions);
    }

    #[test]
    fn view_section_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".schemaview.toml"),
            "[view]\nmax_depth = 4\nshow_descriptions = false\n",
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.max_depth, 4);
        assert!(!config.show_descriptions);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".schemaview.toml"), "[view\nmax_depth = ").unwrap();
        assert!(Config::load(dir.path()).is_err());
    }
}
