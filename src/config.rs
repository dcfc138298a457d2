use anyhow::Result;
use clap::Parser;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shelf")]
#[command(about = "Runs the shelf books service", long_about = None)]
pub struct Cli {
    #[arg(short = 'c', long = "config")]
    pub config_path: Option<String>,
}

pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".shelf")
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.yaml")
}

#[derive(Debug, Deserialize, Clone)]
pub struct App {
    #[serde(default = "default_port")]
    port: u16,
}

impl Default for App {
    fn default() -> Self {
        App { port: default_port() }
    }
}

fn default_port() -> u16 {
    8080
}

impl App {
    pub fn get_port(&self) -> u16 {
        self.port
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Libsql,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Store {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default = "default_database")]
    database: String,
    #[serde(default)]
    pub turso_url: Option<String>,
    #[serde(default)]
    pub turso_auth_token: Option<String>,
    #[serde(default = "default_sync_interval")]
    pub sync_interval_seconds: u64,
}

impl Default for Store {
    fn default() -> Self {
        Store {
            backend: Backend::default(),
            database: default_database(),
            turso_url: None,
            turso_auth_token: None,
            sync_interval_seconds: default_sync_interval(),
        }
    }
}

fn default_database() -> String {
    "shelf.db".to_owned()
}

fn default_sync_interval() -> u64 {
    60
}

impl Store {
    pub fn get_db(&self) -> &str {
        &self.database
    }

    /// Remote primary url and token, present only when both are non-empty.
    pub fn remote(&self) -> Option<(&str, &str)> {
        let url = self.turso_url.as_deref().filter(|s| !s.is_empty())?;
        let token = self.turso_auth_token.as_deref().filter(|s| !s.is_empty())?;
        Some((url, token))
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub store: Store,
}

impl Config {
    pub fn new(path: &str) -> Result<Self> {
        let cfg = Config::load_config(path)?;
        Ok(cfg)
    }

    fn load_config(path: &str) -> Result<Config> {
        let yaml_str = fs::read_to_string(path)?;
        Config::from_yaml(&yaml_str)
    }

    pub fn from_yaml(yaml_str: &str) -> Result<Config> {
        let yaml_with_env = Config::substitute_env_vars(yaml_str)?;
        let config: Config = serde_yaml::from_str(&yaml_with_env)?;
        Ok(config)
    }

    fn substitute_env_vars(yaml_str: &str) -> Result<String> {
        let mut result = yaml_str.to_string();
        let mut offset = 0;

        while let Some(start) = result[offset..].find("${") {
            let actual_start = offset + start;
            if let Some(end) = result[actual_start..].find("}") {
                let var_name = &result[actual_start + 2..actual_start + end];

                // ${VAR:-default}
                let env_value = if let Some(default_start) = var_name.find(":-") {
                    let actual_var = &var_name[..default_start];
                    let default_val = &var_name[default_start + 2..];
                    env::var(actual_var).unwrap_or_else(|_| default_val.to_string())
                } else {
                    env::var(var_name).unwrap_or_else(|_| {
                        tracing::warn!(var = %var_name, "environment variable not found");
                        String::new()
                    })
                };

                result.replace_range(actual_start..actual_start + end + 1, &env_value);
                offset = actual_start + env_value.len();
            } else {
                break;
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_sections_missing() {
        let cfg = Config::from_yaml("{}").unwrap();
        assert_eq!(cfg.app.get_port(), 8080);
        assert_eq!(cfg.store.backend, Backend::Libsql);
        assert_eq!(cfg.store.get_db(), "shelf.db");
        assert!(cfg.store.remote().is_none());
    }

    #[test]
    fn test_memory_backend() {
        let cfg = Config::from_yaml("app:\n  port: 9090\nstore:\n  backend: memory\n").unwrap();
        assert_eq!(cfg.app.get_port(), 9090);
        assert_eq!(cfg.store.backend, Backend::Memory);
    }

    #[test]
    fn test_substitutes_default_value() {
        let out = Config::substitute_env_vars("url: ${SHELF_TEST_SURELY_UNSET_VAR:-libsql://x}").unwrap();
        assert_eq!(out, "url: libsql://x");
    }

    #[test]
    fn test_empty_remote_is_local() {
        let yaml = "store:\n  turso_url: \"${SHELF_TEST_SURELY_UNSET_URL:-}\"\n  turso_auth_token: abc\n";
        let cfg = Config::from_yaml(yaml).unwrap();
        assert_eq!(cfg.store.turso_url.as_deref(), Some(""));
        assert!(cfg.store.remote().is_none());
    }

    #[test]
    fn test_remote_requires_both() {
        let yaml = "store:\n  turso_url: libsql://db.turso.io\n  turso_auth_token: secret\n";
        let cfg = Config::from_yaml(yaml).unwrap();
        assert_eq!(cfg.store.remote(), Some(("libsql://db.turso.io", "secret")));
    }
}
