//! Configuration types and loading

use crate::error::{ConfigError, ConfigResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Class name used when nothing else is configured
pub const DEFAULT_CLASS_NAME: &str = "ParameterObject";

/// Configuration files probed under the project root, first match wins
const CONFIG_FILES: [&str; 2] = ["pobj.toml", ".pobj/config.toml"];

/// Environment prefix; `POBJ__REFACTOR__CLASS_NAME=Options` sets `refactor.className`
const ENV_PREFIX: &str = "POBJ__";

// Optional verbatim `@`, then letter or underscore, then word characters
static IDENTIFIER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^@?[A-Za-z_][A-Za-z0-9_]*$").expect("Invalid regex for identifiers")
});

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Extraction behaviour
    pub refactor: ExtractConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// What to do when the generated file name is already taken
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Refuse to touch the project and report the collision
    #[default]
    Abort,
    /// Pick the first free `<ClassName>N`
    Rename,
}

/// Settings for the extract-parameter-object refactoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractConfig {
    /// Name of the generated type (and of its file)
    pub class_name: String,
    /// Copy the originating document's file-level imports into the new unit
    ///
    /// Off by default: the generated unit is self-contained.
    pub carry_imports: bool,
    /// Remove import directives flagged as unused or duplicate
    pub prune_imports: bool,
    pub on_collision: CollisionPolicy,
    /// Name of the single parameter produced by the signature rewrite stage
    pub parameter_name: String,
    pub diagnostics: DiagnosticCodesConfig,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            class_name: DEFAULT_CLASS_NAME.to_string(),
            carry_imports: false,
            prune_imports: true,
            on_collision: CollisionPolicy::Abort,
            parameter_name: "parameterObject".to_string(),
            diagnostics: DiagnosticCodesConfig::default(),
        }
    }
}

/// Diagnostic codes that mark an import directive as removable
///
/// Defaults are the C# compiler's codes; other toolchains map their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiagnosticCodesConfig {
    /// "Unnecessary using directive"
    pub unused_import_codes: Vec<String>,
    /// "Using directive appeared previously"
    pub duplicate_import_codes: Vec<String>,
}

impl Default for DiagnosticCodesConfig {
    fn default() -> Self {
        Self {
            unused_import_codes: vec!["CS8019".to_string()],
            duplicate_import_codes: vec!["CS0105".to_string()],
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format for development
    #[default]
    Pretty,
    /// Structured JSON format for hosts that collect logs
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl ExtractConfig {
    /// Config with a caller-chosen class name and defaults for everything else
    pub fn with_class_name(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            ..Self::default()
        }
    }

    /// Validate the extraction settings
    pub fn validate(&self) -> ConfigResult<()> {
        if !is_valid_identifier(&self.class_name) {
            return Err(ConfigError::invalid(
                "refactor.className",
                format!("'{}' is not a valid type identifier", self.class_name),
            ));
        }
        if !is_valid_identifier(&self.parameter_name) {
            return Err(ConfigError::invalid(
                "refactor.parameterName",
                format!("'{}' is not a valid identifier", self.parameter_name),
            ));
        }
        let codes = self
            .diagnostics
            .unused_import_codes
            .iter()
            .chain(&self.diagnostics.duplicate_import_codes);
        for code in codes {
            if code.trim().is_empty() {
                return Err(ConfigError::invalid(
                    "refactor.diagnostics",
                    "diagnostic codes cannot be empty",
                ));
            }
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load configuration for a project
    ///
    /// Configuration is loaded in the following priority order (highest to lowest):
    /// 1. Environment variables (`POBJ__*`)
    /// 2. `pobj.toml` or `.pobj/config.toml` under `project_root`
    /// 3. Default values
    pub fn load(project_root: &Path) -> ConfigResult<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Toml},
            Figment,
        };

        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        for file in CONFIG_FILES {
            let path = project_root.join(file);
            if path.exists() {
                tracing::info!(path = %path.display(), "Loading TOML configuration");
                figment = figment.merge(Toml::file(path));
                break; // Use first found TOML file
            }
        }

        let figment = figment.merge(
            Env::prefixed(ENV_PREFIX).map(|key| env_key_to_path(key.as_str()).into()),
        );

        let config: AppConfig = figment.extract()?;
        config.validate()?;

        tracing::debug!(
            class_name = %config.refactor.class_name,
            prune_imports = config.refactor.prune_imports,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        self.refactor.validate()?;
        if self.logging.level.parse::<tracing::Level>().is_err() {
            return Err(ConfigError::invalid(
                "logging.level",
                format!("unknown log level '{}'", self.logging.level),
            ));
        }
        Ok(())
    }
}

/// Whether `name` can be used as a type or member identifier
pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER_REGEX.is_match(name)
}

/// `refactor__class_name` → `refactor.className`
fn env_key_to_path(key: &str) -> String {
    key.split("__")
        .map(|segment| {
            let mut out = String::with_capacity(segment.len());
            let mut upper_next = false;
            for ch in segment.chars() {
                if ch == '_' {
                    upper_next = !out.is_empty();
                } else if upper_next {
                    out.push(ch.to_ascii_uppercase());
                    upper_next = false;
                } else {
                    out.push(ch.to_ascii_lowercase());
                }
            }
            out
        })
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.refactor.class_name, "ParameterObject");
        assert!(!config.refactor.carry_imports);
        assert!(config.refactor.prune_imports);
        assert_eq!(config.refactor.on_collision, CollisionPolicy::Abort);
        assert_eq!(config.refactor.diagnostics.unused_import_codes, vec!["CS8019"]);
        assert_eq!(config.refactor.diagnostics.duplicate_import_codes, vec!["CS0105"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_key_mapping() {
        assert_eq!(env_key_to_path("refactor__class_name"), "refactor.className");
        assert_eq!(
            env_key_to_path("REFACTOR__DIAGNOSTICS__UNUSED_IMPORT_CODES"),
            "refactor.diagnostics.unusedImportCodes"
        );
        assert_eq!(env_key_to_path("logging__level"), "logging.level");
    }

    #[test]
    fn test_identifier_validation() {
        assert!(is_valid_identifier("ParameterObject"));
        assert!(is_valid_identifier("_args"));
        assert!(is_valid_identifier("@class"));
        assert!(!is_valid_identifier("9Lives"));
        assert!(!is_valid_identifier("Foo.Bar"));
        assert!(!is_valid_identifier(""));
    }

    #[test]
    fn test_rejects_invalid_class_name() {
        let config = ExtractConfig::with_class_name("Not A Name");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("refactor.className"));
    }

    #[test]
    #[serial]
    fn test_load_without_files_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(dir.path()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    #[serial]
    fn test_load_reads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("pobj.toml"),
            r#"
[refactor]
className = "SearchOptions"
onCollision = "rename"
carryImports = true

[refactor.diagnostics]
unusedImportCodes = ["IDE0005", "CS8019"]

[logging]
format = "json"
"#,
        )
        .unwrap();

        let config = AppConfig::load(dir.path()).unwrap();
        assert_eq!(config.refactor.class_name, "SearchOptions");
        assert_eq!(config.refactor.on_collision, CollisionPolicy::Rename);
        assert!(config.refactor.carry_imports);
        assert_eq!(
            config.refactor.diagnostics.unused_import_codes,
            vec!["IDE0005", "CS8019"]
        );
        // Untouched keys keep their defaults
        assert_eq!(config.refactor.diagnostics.duplicate_import_codes, vec!["CS0105"]);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".pobj")).unwrap();
        std::fs::write(
            dir.path().join(".pobj/config.toml"),
            "[refactor]\nclassName = \"FromFile\"\n",
        )
        .unwrap();

        std::env::set_var("POBJ__REFACTOR__CLASS_NAME", "FromEnv");
        let loaded = AppConfig::load(dir.path());
        std::env::remove_var("POBJ__REFACTOR__CLASS_NAME");

        assert_eq!(loaded.unwrap().refactor.class_name, "FromEnv");
    }

    #[test]
    #[serial]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pobj.toml"), "[logging]\nlevel = \"loud\"\n").unwrap();
        let err = AppConfig::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let config = AppConfig::default();
        let text = toml::to_string(&config).unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
