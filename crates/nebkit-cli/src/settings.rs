use crate::error::{CliError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const SETTINGS_FILE: &str = "settings.toml";
const PROFILES_DIR: &str = "profiles";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_root: Option<PathBuf>,
}

/// Where the profile root came from, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootSource {
    CommandLine,
    Settings,
    Default,
}

#[derive(Debug)]
pub struct SettingsManager {
    settings_file: PathBuf,
    default_profile_root: PathBuf,
}

impl SettingsManager {
    pub fn new() -> Result<Self> {
        let dirs = ProjectDirs::from("org", "nebkit", "nebkit").ok_or_else(|| {
            CliError::Config("Could not determine the user configuration directory.".to_string())
        })?;
        let manager = Self {
            settings_file: dirs.config_dir().join(SETTINGS_FILE),
            default_profile_root: dirs.config_dir().join(PROFILES_DIR),
        };
        debug!("SettingsManager initialized with {:?}", manager.settings_file);
        Ok(manager)
    }

    #[cfg(test)]
    fn with_paths(settings_file: PathBuf, default_profile_root: PathBuf) -> Self {
        Self {
            settings_file,
            default_profile_root,
        }
    }

    pub fn settings_file(&self) -> &Path {
        &self.settings_file
    }

    pub fn load(&self) -> Result<Settings> {
        if !self.settings_file.exists() {
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&self.settings_file)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: self.settings_file.clone(),
            source: e.into(),
        })
    }

    fn store(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.settings_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string(settings)
            .map_err(|e| CliError::Config(format!("Failed to serialize settings: {}", e)))?;
        fs::write(&self.settings_file, content)?;
        Ok(())
    }

    /// Picks the profile root: command-line override, then the stored
    /// setting, then the per-user default.
    pub fn resolve_profile_root(&self, cli_override: Option<&Path>) -> Result<(PathBuf, RootSource)> {
        if let Some(path) = cli_override {
            return Ok((path.to_path_buf(), RootSource::CommandLine));
        }
        match self.load()?.profile_root {
            Some(path) if path.as_os_str().is_empty() => {
                warn!("Stored profile root is empty, falling back to the default location.");
                Ok((self.default_profile_root.clone(), RootSource::Default))
            }
            Some(path) => Ok((path, RootSource::Settings)),
            None => Ok((self.default_profile_root.clone(), RootSource::Default)),
        }
    }

    /// Persists `path` (made absolute) as the profile root.
    pub fn set_profile_root(&self, path: &Path) -> Result<PathBuf> {
        let absolute = std::path::absolute(path)?;
        let mut settings = self.load()?;
        settings.profile_root = Some(absolute.clone());
        self.store(&settings)?;
        info!("Profile root set to {:?}", absolute);
        Ok(absolute)
    }

    pub fn reset_profile_root(&self) -> Result<()> {
        let mut settings = self.load()?;
        if settings.profile_root.take().is_some() {
            self.store(&settings)?;
            info!("Profile root reset to the default location.");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn manager(dir: &Path) -> SettingsManager {
        SettingsManager::with_paths(
            dir.join("config").join(SETTINGS_FILE),
            dir.join("default-profiles"),
        )
    }

    #[test]
    fn resolve_falls_back_to_default_without_settings_file() {
        let dir = tempdir().unwrap();
        let manager = manager(dir.path());

        let (root, source) = manager.resolve_profile_root(None).unwrap();

        assert_eq!(root, dir.path().join("default-profiles"));
        assert_eq!(source, RootSource::Default);
    }

    #[test]
    fn set_root_is_persisted_as_kebab_case_key() {
        let dir = tempdir().unwrap();
        let manager = manager(dir.path());
        let custom = dir.path().join("custom");

        manager.set_profile_root(&custom).unwrap();

        let content = fs::read_to_string(manager.settings_file()).unwrap();
        assert!(content.contains("profile-root"));
        let (root, source) = manager.resolve_profile_root(None).unwrap();
        assert_eq!(root, custom);
        assert_eq!(source, RootSource::Settings);
    }

    #[test]
    fn command_line_override_wins_over_settings() {
        let dir = tempdir().unwrap();
        let manager = manager(dir.path());
        manager.set_profile_root(&dir.path().join("custom")).unwrap();
        let override_root = dir.path().join("override");

        let (root, source) = manager.resolve_profile_root(Some(&override_root)).unwrap();

        assert_eq!(root, override_root);
        assert_eq!(source, RootSource::CommandLine);
    }

    #[test]
    fn reset_root_restores_default() {
        let dir = tempdir().unwrap();
        let manager = manager(dir.path());
        manager.set_profile_root(&dir.path().join("custom")).unwrap();

        manager.reset_profile_root().unwrap();

        let (_, source) = manager.resolve_profile_root(None).unwrap();
        assert_eq!(source, RootSource::Default);
    }

    #[test]
    fn empty_stored_root_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let manager = manager(dir.path());
        fs::create_dir_all(manager.settings_file().parent().unwrap()).unwrap();
        fs::write(manager.settings_file(), "profile-root = \"\"\n").unwrap();

        let (root, source) = manager.resolve_profile_root(None).unwrap();

        assert_eq!(root, dir.path().join("default-profiles"));
        assert_eq!(source, RootSource::Default);
    }

    #[test]
    fn malformed_settings_file_is_a_parsing_error() {
        let dir = tempdir().unwrap();
        let manager = manager(dir.path());
        fs::create_dir_all(manager.settings_file().parent().unwrap()).unwrap();
        fs::write(manager.settings_file(), "profile-root = [").unwrap();

        let result = manager.resolve_profile_root(None);

        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }
}
