//! Layered configuration for the `taskdeck` binary.
//!
//! Sources, lowest to highest priority:
//!
//! 1. Built-in defaults
//! 2. User config at `<config_dir>/taskdeck/config.toml`
//! 3. Project config at `./.taskdeck.toml`
//! 4. A file passed with `--config`
//! 5. `TASKDECK_*` environment variables (`TASKDECK_CLOSING_STATUS=cancelled`)
//! 6. Command-line flags

use crate::task::{
    domain::{ClosingStatus, Status},
    services::{MalformedRowPolicy, SessionSettings, SortKey, SortSpec},
};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Application directory name under the platform config and data roots.
pub const APP_DIR: &str = "taskdeck";

/// Project-local config file name, resolved against the working directory.
pub const PROJECT_CONFIG_FILE: &str = ".taskdeck.toml";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "TASKDECK_";

/// Errors raised while assembling configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be parsed or a value has the wrong shape.
    #[error("configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    /// A config file named explicitly does not exist.
    #[error("config file not found: {}", .0.display())]
    MissingFile(PathBuf),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// `SQLite` database file.
    pub database_path: PathBuf,
    /// File receiving log output.
    pub log_path: PathBuf,
    /// Status that stamps `completed_at`.
    pub closing_status: Status,
    /// Handling of undecodable stored rows.
    pub malformed_rows: MalformedRowPolicy,
    /// Initial sort key.
    pub default_sort: Option<SortKey>,
    /// Initial sort direction.
    pub default_sort_reverse: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR);
        Self {
            database_path: data_dir.join("tasks.db"),
            log_path: data_dir.join("taskdeck.log"),
            closing_status: ClosingStatus::default().status(),
            malformed_rows: MalformedRowPolicy::default(),
            default_sort: None,
            default_sort_reverse: false,
        }
    }
}

impl Settings {
    /// Loads settings from every source.
    ///
    /// `config_file` is merged above the project file; `database` overrides
    /// every other source for the database path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] when `config_file` does not exist
    /// and [`ConfigError::Figment`] when a source is malformed.
    pub fn load(config_file: Option<&Path>, database: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Self::figment(config_file)?;
        if let Some(path) = database {
            figment = figment.merge(Serialized::default("database_path", path));
        }
        Ok(figment.extract()?)
    }

    /// Builds the provider chain without the command-line layer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] when `config_file` does not exist.
    pub fn figment(config_file: Option<&Path>) -> Result<Figment, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(user) = Self::user_config_path().filter(|path| path.exists()) {
            figment = figment.merge(Toml::file(user));
        }

        let project = PathBuf::from(PROJECT_CONFIG_FILE);
        if project.exists() {
            figment = figment.merge(Toml::file(project));
        }

        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ConfigError::MissingFile(path.to_path_buf()));
            }
            figment = figment.merge(Toml::file(path));
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Path to the user-level config file.
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    /// Session options derived from these settings.
    #[must_use]
    pub const fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            closing: ClosingStatus::new(self.closing_status),
            malformed_rows: self.malformed_rows,
            sort: SortSpec::new(self.default_sort, self.default_sort_reverse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn isolate(jail: &mut Jail) {
        jail.set_env("XDG_CONFIG_HOME", jail.directory().join("xdg").display());
    }

    #[test]
    fn defaults_apply_without_sources() {
        Jail::expect_with(|jail| {
            isolate(jail);
            let settings = Settings::load(None, None).map_err(|err| err.to_string())?;
            assert_eq!(settings.closing_status, Status::Completed);
            assert_eq!(settings.malformed_rows, MalformedRowPolicy::Skip);
            assert_eq!(settings.default_sort, None);
            assert!(settings.database_path.ends_with("taskdeck/tasks.db"));
            Ok(())
        });
    }

    #[test]
    fn project_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_file(
                PROJECT_CONFIG_FILE,
                r#"
                closing_status = "cancelled"
                malformed_rows = "abort"
                default_sort = "status"
                default_sort_reverse = true
                "#,
            )?;
            let settings = Settings::load(None, None).map_err(|err| err.to_string())?;
            assert_eq!(settings.closing_status, Status::Cancelled);
            assert_eq!(settings.malformed_rows, MalformedRowPolicy::Abort);
            assert_eq!(settings.default_sort, Some(SortKey::Status));
            assert!(settings.default_sort_reverse);
            Ok(())
        });
    }

    #[test]
    fn env_beats_files_and_flag_beats_env() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_file(PROJECT_CONFIG_FILE, r#"database_path = "from-file.db""#)?;
            jail.set_env("TASKDECK_DATABASE_PATH", "from-env.db");
            jail.set_env("TASKDECK_CLOSING_STATUS", "hold");

            let from_env = Settings::load(None, None).map_err(|err| err.to_string())?;
            assert_eq!(from_env.database_path, PathBuf::from("from-env.db"));
            assert_eq!(from_env.closing_status, Status::Hold);

            let from_flag = Settings::load(None, Some(Path::new("from-flag.db")))
                .map_err(|err| err.to_string())?;
            assert_eq!(from_flag.database_path, PathBuf::from("from-flag.db"));
            Ok(())
        });
    }

    #[test]
    fn explicit_config_file_must_exist() {
        Jail::expect_with(|jail| {
            isolate(jail);
            let result = Settings::load(Some(Path::new("absent.toml")), None);
            assert!(matches!(result, Err(ConfigError::MissingFile(_))));
            Ok(())
        });
    }

    #[test]
    fn unknown_status_is_rejected() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_file(PROJECT_CONFIG_FILE, r#"closing_status = "archived""#)?;
            let result = Settings::load(None, None);
            assert!(matches!(result, Err(ConfigError::Figment(_))));
            Ok(())
        });
    }

    #[test]
    fn session_settings_carry_configured_values() {
        let settings = Settings {
            closing_status: Status::Cancelled,
            default_sort: Some(SortKey::Name),
            default_sort_reverse: true,
            ..Settings::default()
        };
        let session = settings.session_settings();
        assert!(session.closing.closes(Status::Cancelled));
        assert_eq!(session.sort, SortSpec::new(Some(SortKey::Name), true));
    }
}
