//! Runtime settings.
//!
//! # Responsibility
//! - Merge defaults, an optional TOML file and `NOTES_*` environment
//!   variables into one `Settings` value.
//! - Reject settings that would fail later at runtime.
//!
//! Later sources override earlier ones: defaults < file < environment.

use crate::logging::{default_log_level, normalize_level};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Environment variable prefix, e.g. `NOTES_DATABASE_PATH`.
pub const ENV_PREFIX: &str = "NOTES_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// SQLite file. `None` keeps everything in memory.
    pub database_path: Option<PathBuf>,
    pub log_level: String,
    /// Absolute log directory. `None` disables file logging.
    pub log_dir: Option<PathBuf>,
    /// bcrypt work factor for new password hashes.
    pub password_hash_cost: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
            password_hash_cost: bcrypt::DEFAULT_COST,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    MissingFile(PathBuf),
    Figment(Box<figment::Error>),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFile(path) => write!(f, "config file `{}` does not exist", path.display()),
            Self::Figment(err) => write!(f, "{err}"),
            Self::Invalid(message) => write!(f, "invalid configuration: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Figment(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(value: figment::Error) -> Self {
        Self::Figment(Box::new(value))
    }
}

/// Loads settings from defaults, `path` (if given) and the environment.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(Settings::default()));
    if let Some(path) = path {
        if !path.exists() {
            return Err(ConfigError::MissingFile(path.to_path_buf()));
        }
        figment = figment.merge(Toml::file(path));
    }
    figment = figment.merge(Env::prefixed(ENV_PREFIX));

    let mut settings: Settings = figment.extract()?;
    settings.validate()?;
    Ok(settings)
}

impl Settings {
    /// Normalizes the log level and checks value ranges.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        self.log_level = normalize_level(&self.log_level)
            .map_err(ConfigError::Invalid)?
            .to_string();

        if !(4..=31).contains(&self.password_hash_cost) {
            return Err(ConfigError::Invalid(format!(
                "password_hash_cost must be within 4..=31, got {}",
                self.password_hash_cost
            )));
        }

        if let Some(dir) = self.log_dir.as_ref() {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "log_dir must be an absolute path, got `{}`",
                    dir.display()
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{load_settings, ConfigError, Settings};
    use figment::Jail;
    use std::path::{Path, PathBuf};

    #[test]
    fn defaults_are_valid() {
        let mut settings = Settings::default();
        settings.validate().expect("defaults should validate");
        assert_eq!(settings.database_path, None);
        assert_eq!(settings.password_hash_cost, bcrypt::DEFAULT_COST);
    }

    #[test]
    fn file_values_are_overridden_by_environment() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "notes.toml",
                r#"
                database_path = "notes.sqlite3"
                log_level = "INFO"
                password_hash_cost = 6
                "#,
            )?;
            jail.set_env("NOTES_PASSWORD_HASH_COST", "5");

            let settings =
                load_settings(Some(Path::new("notes.toml"))).map_err(|err| err.to_string())?;
            assert_eq!(
                settings.database_path,
                Some(PathBuf::from("notes.sqlite3"))
            );
            assert_eq!(settings.log_level, "info");
            assert_eq!(settings.password_hash_cost, 5);
            Ok(())
        });
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_settings(Some(Path::new("/definitely/not/here/notes.toml")))
            .expect_err("missing file must fail");
        assert!(matches!(err, ConfigError::MissingFile(_)));
    }

    #[test]
    fn out_of_range_cost_is_rejected() {
        let mut settings = Settings {
            password_hash_cost: 2,
            ..Settings::default()
        };
        let err = settings.validate().expect_err("cost 2 must be rejected");
        assert!(err.to_string().contains("password_hash_cost"));
    }

    #[test]
    fn relative_log_dir_is_rejected() {
        let mut settings = Settings {
            log_dir: Some(PathBuf::from("logs")),
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Invalid(_))
        ));
    }
}
