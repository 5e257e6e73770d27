// Configuration loading and parsing (config/scoutval.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file inside `config/` and `defaults/`.
pub const CONFIG_FILE_NAME: &str = "scoutval.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

/// Fully loaded and validated application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub model: ModelConfig,
    pub database: DatabaseConfig,
    pub search: SearchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Path to the trained regression artifact.
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the reference player database.
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Row cap for the plain database comparison search.
    pub compare_limit: usize,
    /// Row cap for the scouting comparison (real vs predicted).
    pub scout_limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub dir: String,
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            dir: "logs".into(),
            filter: "scoutval_core=info,scoutval_tui=info,warn".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/scoutval.toml` relative to `base_dir`.
///
/// This does not seed from defaults; prefer `load_config()` for application use.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE_NAME);
    let text = read_file(&path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Seed `config/scoutval.toml` from `defaults/` when the user has none yet.
/// Returns the path written, or `None` when an existing file was kept.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE_NAME);
    if target.exists() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(CONFIG_FILE_NAME);
    if !source.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "neither config/{CONFIG_FILE_NAME} nor defaults/{CONFIG_FILE_NAME} found in {}",
                base_dir.display()
            ),
        });
    }

    let copy_err = |e: std::io::Error| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {} to {}: {e}", source.display(), target.display()),
    };
    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(copy_err)?;
    }
    std::fs::copy(&source, &target).map_err(copy_err)?;
    Ok(Some(target))
}

/// Load config relative to the current working directory, seeding it from
/// `defaults/` first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_file(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    let paths: &[(&str, &str)] = &[
        ("model.path", &config.model.path),
        ("database.path", &config.database.path),
        ("logging.dir", &config.logging.dir),
    ];
    for (name, val) in paths {
        if val.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must not be empty".into(),
            });
        }
    }

    let limits: &[(&str, usize)] = &[
        ("search.compare_limit", config.search.compare_limit),
        ("search.scout_limit", config.search.scout_limit),
    ];
    for (name, val) in limits {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be > 0".into(),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Locate the workspace directory holding `defaults/`, whether tests run
    /// from the crate directory or the workspace root.
    fn project_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        cwd.ancestors()
            .find(|dir| dir.join("defaults").join(CONFIG_FILE_NAME).exists())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| panic!("Cannot locate defaults/ directory from CWD {:?}", cwd))
    }

    /// Fresh temp dir with `config/` holding the default config file.
    fn temp_with_default_config(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::copy(
            project_root().join("defaults").join(CONFIG_FILE_NAME),
            tmp.join("config").join(CONFIG_FILE_NAME),
        )
        .unwrap();
        tmp
    }

    fn rewrite_config(tmp: &Path, from: &str, to: &str) {
        let path = tmp.join("config").join(CONFIG_FILE_NAME);
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains(from), "default config should contain {from:?}");
        fs::write(&path, text.replace(from, to)).unwrap();
    }

    #[test]
    fn load_default_config() {
        let tmp = temp_with_default_config("scoutval_config_defaults");
        let config = load_config_from(&tmp).expect("default config should load");

        assert_eq!(config.model.path, "player_value_model.json");
        assert_eq!(config.database.path, "final_data.db");
        assert_eq!(config.search.compare_limit, 5);
        assert_eq!(config.search.scout_limit, 100);
        assert_eq!(config.logging.dir, "logs");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn logging_section_is_optional() {
        let tmp = std::env::temp_dir().join("scoutval_config_no_logging");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(
            tmp.join("config").join(CONFIG_FILE_NAME),
            r#"
[model]
path = "model.json"

[database]
path = "players.db"

[search]
compare_limit = 3
scout_limit = 50
"#,
        )
        .unwrap();

        let config = load_config_from(&tmp).expect("should load without [logging]");
        assert_eq!(config.logging.dir, "logs");
        assert!(config.logging.filter.contains("scoutval_core"));
        assert_eq!(config.search.compare_limit, 3);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_scout_limit() {
        let tmp = temp_with_default_config("scoutval_config_zero_scout");
        rewrite_config(&tmp, "scout_limit = 100", "scout_limit = 0");

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "search.scout_limit");
            }
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_empty_model_path() {
        let tmp = temp_with_default_config("scoutval_config_empty_model");
        rewrite_config(
            &tmp,
            "path = \"player_value_model.json\"",
            "path = \"  \"",
        );

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "model.path");
            }
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_config() {
        let tmp = std::env::temp_dir().join("scoutval_config_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::FileNotFound { path } => {
                assert!(path.ends_with(CONFIG_FILE_NAME));
            }
            other => panic!("expected FileNotFound, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = std::env::temp_dir().join("scoutval_config_invalid");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(
            tmp.join("config").join(CONFIG_FILE_NAME),
            "this is not valid [[[ toml",
        )
        .unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }), "got: {err}");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn seeds_config_from_defaults() {
        let tmp = std::env::temp_dir().join("scoutval_config_seed");
        let _ = fs::remove_dir_all(&tmp);
        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::copy(
            project_root().join("defaults").join(CONFIG_FILE_NAME),
            defaults_dir.join(CONFIG_FILE_NAME),
        )
        .unwrap();
        fs::write(defaults_dir.join("notes.txt"), "unrelated\n").unwrap();

        let written = ensure_config_file(&tmp).expect("should seed");
        assert_eq!(written, Some(tmp.join("config").join(CONFIG_FILE_NAME)));
        assert!(!tmp.join("config").join("notes.txt").exists());

        load_config_from(&tmp).expect("seeded defaults should load");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn keeps_existing_user_config() {
        let tmp = temp_with_default_config("scoutval_config_keep_user");
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::write(tmp.join("defaults").join(CONFIG_FILE_NAME), "# shipped\n").unwrap();
        rewrite_config(&tmp, "scout_limit = 100", "scout_limit = 42");

        assert_eq!(ensure_config_file(&tmp).expect("should succeed"), None);
        assert_eq!(load_config_from(&tmp).unwrap().search.scout_limit, 42);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn seeding_fails_without_defaults_or_config() {
        let tmp = std::env::temp_dir().join("scoutval_config_nothing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        let err = ensure_config_file(&tmp).unwrap_err();
        match &err {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("neither config/scoutval.toml"), "{message}");
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }
}
