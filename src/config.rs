use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Where the licensing service lives unless told otherwise.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5001";

/// Client configuration.
///
/// Holds the service address and the settings of the print pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Root URL of the licensing service.
    ///
    /// Endpoints are resolved against it, so `http://host/prefix` serves the
    /// report from `http://host/prefix/api/report`.
    base_url: String,

    /// Command that receives a written report for printing.
    ///
    /// The first element is the program, the rest are leading arguments.
    /// The path of the document is appended. For example
    /// `["lp", "-o", "media=A4"]`.
    pub print_command: Option<Vec<String>>,

    /// Directory that printable reports are written to.
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            print_command: None,
            output_dir: default_output_dir(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the root URL of the licensing service.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Points the client at a different service.
    ///
    /// Trailing slashes are dropped.
    pub fn set_base_url(&mut self, url: impl Into<String>) {
        let url = url.into();
        self.base_url = url.trim_end_matches('/').to_string();
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_base_url")]
        base_url: String,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        print_command: Option<Vec<String>>,

        #[serde(default = "default_output_dir")]
        output_dir: PathBuf,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                base_url,
                print_command,
                output_dir,
            } => Self {
                base_url,
                print_command,
                output_dir,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            base_url: config.base_url,
            print_command: config.print_command,
            output_dir: config.output_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\nbase_url = \"https://licensing.example\"\nprint_command = [\"lp\", \"-o\", \"media=A4\"]\noutput_dir = \"reports\"\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.base_url(), "https://licensing.example");
        assert_eq!(
            config.print_command,
            Some(vec![
                "lp".to_string(),
                "-o".to_string(),
                "media=A4".to_string()
            ])
        );
        assert_eq!(config.output_dir, PathBuf::from("reports"));
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nprint_command = \"lp\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let result: Result<Config, _> = toml::from_str(r#"_version = "2""#);
        assert!(result.is_err());
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
        assert_eq!(actual.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(".licensing.toml");

        let mut config = Config::default();
        config.set_base_url("http://10.0.0.5:5001/");
        config.print_command = Some(vec!["xdg-open".to_string()]);
        config.save(&path).unwrap();

        let saved = std::fs::read_to_string(&path).unwrap();
        assert!(saved.contains("_version = \"1\""));

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.base_url(), "http://10.0.0.5:5001");
    }
}
