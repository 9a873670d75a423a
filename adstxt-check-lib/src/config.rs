//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files and ADSTXT_*
//! environment variables, and merging configurations with proper precedence
//! rules (CLI > environment > local file > home file > defaults).

use crate::error::AdsTxtError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration loaded from TOML files.
///
/// This represents the structure of configuration files that users can
/// create to set default values:
///
/// ```toml
/// [defaults]
/// signature = "google.com|DIRECT"
/// concurrency = 10
/// timeout = "5s"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Default values for CLI options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    /// Output formatting preferences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputConfig>,
}

/// Default configuration values that map to CLI options.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DefaultsConfig {
    /// Default signature to scan for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,

    /// Default concurrency level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// Default per-request timeout (as string, e.g., "3s", "30s", "2m")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Default pretty output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretty: Option<bool>,
}

/// Output formatting configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Default output format ("text", "json", "csv")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,

    /// Pretty-print JSON by default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_pretty: Option<bool>,
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to emit warnings for config issues
    pub verbose: bool,
}

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file does not exist, cannot be read, or
    /// fails validation.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, AdsTxtError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(AdsTxtError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            AdsTxtError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content).map_err(|e| {
            AdsTxtError::config(format!("Failed to parse TOML configuration: {}", e))
        })?;

        self.validate_config(&config)?;

        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// Looks for configuration files in standard locations and merges them,
    /// the local file winning over the home-directory file.
    pub fn discover_and_load(&self) -> Result<FileConfig, AdsTxtError> {
        let mut merged_config = FileConfig::default();
        let mut loaded_files = Vec::new();

        // 1. Load home-directory config (lower precedence)
        if let Some(global_path) = self.get_global_config_path() {
            if let Ok(config) = self.load_file(&global_path) {
                merged_config = self.merge_configs(merged_config, config);
                loaded_files.push(global_path);
            }
        }

        // 2. Load local config (highest precedence)
        if let Some(local_path) = self.get_local_config_path() {
            if let Ok(config) = self.load_file(&local_path) {
                merged_config = self.merge_configs(merged_config, config);
                loaded_files.push(local_path);
            }
        }

        if self.verbose && loaded_files.len() > 1 {
            eprintln!("Multiple config files found. Using precedence:");
            for (i, path) in loaded_files.iter().enumerate() {
                let status = if i == loaded_files.len() - 1 {
                    "active"
                } else {
                    "ignored"
                };
                eprintln!("   {} ({})", path.display(), status);
            }
        }

        Ok(merged_config)
    }

    /// Get the local configuration file path.
    fn get_local_config_path(&self) -> Option<PathBuf> {
        let candidates = ["./adstxt-check.toml", "./.adstxt-check.toml"];

        for candidate in &candidates {
            let path = Path::new(candidate);
            if path.exists() {
                return Some(path.to_path_buf());
            }
        }

        None
    }

    /// Get the home-directory configuration file path.
    fn get_global_config_path(&self) -> Option<PathBuf> {
        if let Some(home) = env::var_os("HOME") {
            let candidates = [".adstxt-check.toml", "adstxt-check.toml"];

            for candidate in &candidates {
                let path = Path::new(&home).join(candidate);
                if path.exists() {
                    return Some(path);
                }
            }
        }

        None
    }

    /// Merge two configurations, values from `higher` winning.
    fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            defaults: match (lower.defaults, higher.defaults) {
                (Some(mut lower_defaults), Some(higher_defaults)) => {
                    if higher_defaults.signature.is_some() {
                        lower_defaults.signature = higher_defaults.signature;
                    }
                    if higher_defaults.concurrency.is_some() {
                        lower_defaults.concurrency = higher_defaults.concurrency;
                    }
                    if higher_defaults.timeout.is_some() {
                        lower_defaults.timeout = higher_defaults.timeout;
                    }
                    if higher_defaults.pretty.is_some() {
                        lower_defaults.pretty = higher_defaults.pretty;
                    }
                    Some(lower_defaults)
                }
                (None, Some(higher_defaults)) => Some(higher_defaults),
                (Some(lower_defaults), None) => Some(lower_defaults),
                (None, None) => None,
            },
            output: higher.output.or(lower.output),
        }
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), AdsTxtError> {
        if let Some(defaults) = &config.defaults {
            if let Some(concurrency) = defaults.concurrency {
                if concurrency == 0 || concurrency > 100 {
                    return Err(AdsTxtError::config(
                        "Concurrency must be between 1 and 100",
                    ));
                }
            }

            if let Some(timeout_str) = &defaults.timeout {
                if parse_timeout_string(timeout_str).is_none() {
                    return Err(AdsTxtError::config(format!(
                        "Invalid timeout format '{}'. Use format like '3s', '30s', '2m'",
                        timeout_str
                    )));
                }
            }

            if let Some(signature) = &defaults.signature {
                if !signature.contains('|') {
                    return Err(AdsTxtError::config(format!(
                        "Invalid signature '{}'. Use format '<publisher-id>|<relationship>'",
                        signature
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Environment variable configuration that mirrors CLI options.
///
/// This represents configuration values that can be set via ADSTXT_*
/// environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub signature: Option<String>,
    pub concurrency: Option<usize>,
    pub timeout: Option<String>,
    pub pretty: Option<bool>,
    pub json: Option<bool>,
    pub csv: Option<bool>,
    pub file: Option<String>,
    pub config: Option<String>,
}

impl EnvConfig {
    /// Check whether conflicting output formats were requested.
    pub fn has_output_format_conflict(&self) -> bool {
        self.json == Some(true) && self.csv == Some(true)
    }
}

/// Load configuration from environment variables.
///
/// Parses all ADSTXT_* environment variables and returns a structured
/// configuration. Invalid values are logged as warnings and ignored.
pub fn load_env_config(verbose: bool) -> EnvConfig {
    let mut env_config = EnvConfig::default();

    // ADSTXT_SIGNATURE - default signature to scan for
    if let Ok(signature) = env::var("ADSTXT_SIGNATURE") {
        if !signature.trim().is_empty() {
            if verbose {
                println!("Using ADSTXT_SIGNATURE={}", signature);
            }
            env_config.signature = Some(signature);
        }
    }

    // ADSTXT_CONCURRENCY - concurrent fetches
    if let Ok(val) = env::var("ADSTXT_CONCURRENCY") {
        match val.parse::<usize>() {
            Ok(concurrency) if concurrency > 0 && concurrency <= 100 => {
                env_config.concurrency = Some(concurrency);
                if verbose {
                    println!("Using ADSTXT_CONCURRENCY={}", concurrency);
                }
            }
            _ => {
                if verbose {
                    eprintln!("Invalid ADSTXT_CONCURRENCY='{}', must be 1-100", val);
                }
            }
        }
    }

    // ADSTXT_TIMEOUT - per-request timeout
    if let Ok(timeout_str) = env::var("ADSTXT_TIMEOUT") {
        if parse_timeout_string(&timeout_str).is_some() {
            env_config.timeout = Some(timeout_str.clone());
            if verbose {
                println!("Using ADSTXT_TIMEOUT={}", timeout_str);
            }
        } else if verbose {
            eprintln!(
                "Invalid ADSTXT_TIMEOUT='{}', use format like '3s', '30s', '2m'",
                timeout_str
            );
        }
    }

    // Boolean flags
    env_config.pretty = parse_env_bool("ADSTXT_PRETTY", verbose);
    env_config.json = parse_env_bool("ADSTXT_JSON", verbose);
    env_config.csv = parse_env_bool("ADSTXT_CSV", verbose);

    // ADSTXT_FILE - domain list file
    if let Ok(file) = env::var("ADSTXT_FILE") {
        if !file.trim().is_empty() {
            env_config.file = Some(file);
        }
    }

    // ADSTXT_CONFIG - explicit config file path
    if let Ok(config) = env::var("ADSTXT_CONFIG") {
        if !config.trim().is_empty() {
            env_config.config = Some(config);
        }
    }

    env_config
}

/// Parse a boolean environment variable, warning on junk values.
fn parse_env_bool(name: &str, verbose: bool) -> Option<bool> {
    match env::var(name) {
        Ok(val) => match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => {
                if verbose {
                    println!("Using {}=true", name);
                }
                Some(true)
            }
            "false" | "0" | "no" | "off" => {
                if verbose {
                    println!("Using {}=false", name);
                }
                Some(false)
            }
            _ => {
                if verbose {
                    eprintln!("Invalid {}='{}', use true/false", name, val);
                }
                None
            }
        },
        Err(_) => None,
    }
}

/// Parse a timeout string like "3s", "30s", "2m" into seconds.
///
/// A bare number is treated as seconds. Returns `None` on junk input.
pub fn parse_timeout_string(timeout_str: &str) -> Option<u64> {
    let timeout_str = timeout_str.trim().to_lowercase();

    if let Some(seconds) = timeout_str.strip_suffix('s') {
        seconds.parse::<u64>().ok()
    } else if let Some(minutes) = timeout_str.strip_suffix('m') {
        minutes.parse::<u64>().ok().map(|m| m * 60)
    } else {
        timeout_str.parse::<u64>().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_timeout_string() {
        assert_eq!(parse_timeout_string("3s"), Some(3));
        assert_eq!(parse_timeout_string("30s"), Some(30));
        assert_eq!(parse_timeout_string("2m"), Some(120));
        assert_eq!(parse_timeout_string("10"), Some(10));
        assert_eq!(parse_timeout_string(" 5S "), Some(5));
        assert_eq!(parse_timeout_string("abc"), None);
        assert_eq!(parse_timeout_string(""), None);
        assert_eq!(parse_timeout_string("5h"), None);
    }

    #[test]
    fn test_load_file_parses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[defaults]\nsignature = \"google.com|DIRECT\"\nconcurrency = 10\ntimeout = \"5s\""
        )
        .unwrap();

        let manager = ConfigManager::new(false);
        let config = manager.load_file(file.path()).unwrap();
        let defaults = config.defaults.unwrap();
        assert_eq!(defaults.signature.as_deref(), Some("google.com|DIRECT"));
        assert_eq!(defaults.concurrency, Some(10));
        assert_eq!(defaults.timeout.as_deref(), Some("5s"));
    }

    #[test]
    fn test_load_file_rejects_bad_concurrency() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[defaults]\nconcurrency = 0").unwrap();

        let manager = ConfigManager::new(false);
        assert!(manager.load_file(file.path()).is_err());
    }

    #[test]
    fn test_load_file_rejects_bad_signature() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[defaults]\nsignature = \"no-separator\"").unwrap();

        let manager = ConfigManager::new(false);
        assert!(manager.load_file(file.path()).is_err());
    }

    #[test]
    fn test_load_file_missing() {
        let manager = ConfigManager::new(false);
        assert!(manager.load_file("/nonexistent/adstxt-check.toml").is_err());
    }

    #[test]
    fn test_merge_configs_higher_wins() {
        let manager = ConfigManager::new(false);

        let lower = FileConfig {
            defaults: Some(DefaultsConfig {
                signature: Some("low.com|DIRECT".into()),
                concurrency: Some(5),
                timeout: Some("3s".into()),
                pretty: None,
            }),
            output: None,
        };
        let higher = FileConfig {
            defaults: Some(DefaultsConfig {
                signature: Some("high.com|RESELLER".into()),
                concurrency: None,
                timeout: None,
                pretty: Some(true),
            }),
            output: None,
        };

        let merged = manager.merge_configs(lower, higher);
        let defaults = merged.defaults.unwrap();
        assert_eq!(defaults.signature.as_deref(), Some("high.com|RESELLER"));
        assert_eq!(defaults.concurrency, Some(5));
        assert_eq!(defaults.timeout.as_deref(), Some("3s"));
        assert_eq!(defaults.pretty, Some(true));
    }
}
