//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use wordstream::{WordStreamError, config::AppConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for WordStreamError {
    fn from(err: ConfigError) -> Self {
        WordStreamError::Io(io::Error::other(err.to_string()))
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (wordstream/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, WordStreamError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("wordstream/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "wordstream", "wordstream") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load configuration from a TOML file
///
/// # Errors
///
/// Returns error if the file is missing, unreadable, or not valid TOML.
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, WordStreamError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use wordstream::layout::{FontScale, StackOffset};

    use super::*;

    #[test]
    fn test_load_explicit_config() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"
[layout]
width = 800
height = 400
font_scale = "log"
offset = "zero"
topics = ["politics", "sports"]

[text]
glyph_width = 0.5

[corpus]
min_word_length = 4
extra_stopwords = ["breaking"]
"#
        )
        .expect("write");

        let config = load_config(Some(file.path())).expect("valid config");

        assert_eq!(config.layout().width(), 800.0);
        assert_eq!(config.layout().height(), 400.0);
        assert_eq!(config.layout().font_scale(), FontScale::Log);
        assert_eq!(config.layout().offset(), StackOffset::Zero);
        assert_eq!(config.layout().min_font_size(), 10.0);
        assert_eq!(config.text().glyph_width(), 0.5);
        assert_eq!(config.corpus().min_word_length(), 4);
        assert_eq!(config.corpus().extra_stopwords(), ["breaking".to_string()]);
    }

    #[test]
    fn test_missing_explicit_config() {
        let err = load_config(Some("/nonexistent/wordstream.toml")).expect_err("missing");
        assert!(err.to_string().contains("Missing configuration file"));
    }

    #[test]
    fn test_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "[layout]\nwidth = \"wide\"\n").expect("write");

        let err = load_config(Some(file.path())).expect_err("invalid");
        assert!(err.to_string().contains("Failed to parse TOML configuration"));
    }
}
