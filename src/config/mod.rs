use crate::models::QuizConfig;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, Environment, File, FileFormat};
use std::fs;

/// File name of the service configuration inside the config directory.
pub const CONFIG_FILE_NAME: &str = "trivia.yaml";

/// Prefix for environment overrides, e.g. `TRIVIA_CORPUS_PATH` or
/// `TRIVIA_LOGGING__DEBUG_MODE`.
pub const ENV_PREFIX: &str = "TRIVIA";

/// Configuration manager for loading and saving the YAML configuration file.
///
/// Loading layers, lowest precedence first:
/// - built-in defaults ([`QuizConfig::default`])
/// - `trivia.yaml` in the configuration directory (optional)
/// - `TRIVIA_*` environment variables
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    config_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the specified configuration directory.
    ///
    /// The directory is created if it doesn't exist.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            config_path: config_dir.join(CONFIG_FILE_NAME),
            config_dir,
        })
    }

    /// Load the configuration.
    ///
    /// # Returns
    /// The layered QuizConfig; defaults fill anything the file and environment leave out.
    pub fn load_config(&self) -> Result<QuizConfig> {
        if !self.config_file_exists() {
            tracing::warn!(
                "Config file not found at {}, using defaults",
                self.config_path
            );
        }

        let layered = Config::builder()
            .add_source(File::new(self.config_path.as_str(), FileFormat::Yaml).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read config: {}", self.config_path))?;

        let config: QuizConfig = layered
            .try_deserialize()
            .with_context(|| format!("Failed to parse config: {}", self.config_path))?;

        tracing::info!("Loaded config (corpus: {})", config.corpus_path);
        Ok(config)
    }

    /// Save the configuration file.
    pub fn save_config(&self, config: &QuizConfig) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(config).context("Failed to serialize config to YAML")?;

        fs::write(&self.config_path, yaml_string)
            .with_context(|| format!("Failed to write config: {}", self.config_path))?;

        tracing::info!("Saved config to {}", self.config_path);
        Ok(())
    }

    /// Resolve the corpus path; relative paths are taken from the config directory.
    pub fn corpus_path(&self, config: &QuizConfig) -> Utf8PathBuf {
        let path = Utf8Path::new(&config.corpus_path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config_dir.join(path)
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    pub fn config_path(&self) -> &Utf8Path {
        &self.config_path
    }

    /// Whether `trivia.yaml` is present, i.e. whether loading used more than defaults and environment.
    pub fn config_file_exists(&self) -> bool {
        self.config_path.is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_config_manager() -> (ConfigManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let manager = ConfigManager::new(&config_path).unwrap();
        (manager, temp_dir)
    }

    #[test]
    fn test_create_config_manager() {
        let (manager, _temp_dir) = create_test_config_manager();
        assert!(manager.config_path().ends_with(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_load_save_config() {
        let (manager, _temp_dir) = create_test_config_manager();

        let mut config = QuizConfig::default();
        config.corpus_path = "capitals.txt".to_string();
        config.logging.debug_mode = true;
        manager.save_config(&config).unwrap();

        let loaded = manager.load_config().unwrap();
        assert_eq!(loaded.corpus_path, "capitals.txt");
        assert!(loaded.logging.debug_mode);
        assert_eq!(loaded.worker_threads, 4);
    }

    #[test]
    fn test_relative_corpus_path_resolves_against_config_dir() {
        let (manager, _temp_dir) = create_test_config_manager();
        let config = QuizConfig::default();

        let resolved = manager.corpus_path(&config);
        assert_eq!(resolved, manager.config_dir().join("questions.txt"));
    }

    #[test]
    fn test_absolute_corpus_path_is_kept() {
        let (manager, temp_dir) = create_test_config_manager();
        let absolute = Utf8PathBuf::try_from(temp_dir.path().join("elsewhere.txt")).unwrap();

        let config = QuizConfig {
            corpus_path: absolute.to_string(),
            ..QuizConfig::default()
        };
        assert_eq!(manager.corpus_path(&config), absolute);
    }
}
