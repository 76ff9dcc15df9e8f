use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::gate::{AccessGate, AccessPolicy, Secret};
use crate::store::{CandidateExtensions, ExtensionError, ScriptDir, DEFAULT_EXTENSIONS};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid extensions: {0}")]
    Extensions(#[from] ExtensionError),
    #[error("set either access.key or access.key_file, not both")]
    ConflictingKeySources,
    #[error("cannot read key file {path}: {source}")]
    KeyFileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed key file {path}: {source}")]
    KeyFileFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Which access policy protects raw content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Browsers get a decoy, programmatic clients get content.
    #[default]
    Classifier,
    /// Raw content requires POSTing the shared key.
    SharedKey,
}

/// `[access]` section of config.toml.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AccessConfig {
    #[serde(default)]
    pub mode: PolicyKind,
    /// Inline shared key (shared_key mode).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// JSON file holding `{"key": "..."}` (shared_key mode).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_file: Option<PathBuf>,
}

// Hand-written so `{:?}` of a loaded config never prints the key.
impl fmt::Debug for AccessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessConfig")
            .field("mode", &self.mode)
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .field("key_file", &self.key_file)
            .finish()
    }
}

#[derive(Deserialize)]
struct KeyFile {
    #[serde(default)]
    key: String,
}

fn default_scripts_dir() -> PathBuf {
    PathBuf::from("scripts")
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

/// Global configuration loaded from `~/.config/sgate/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Directory holding the scripts. Relative paths resolve against the working directory.
    #[serde(default = "default_scripts_dir")]
    pub scripts_dir: PathBuf,
    /// Candidate extensions in precedence order.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Listen address for `sgate serve`.
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default)]
    pub access: AccessConfig,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            scripts_dir: default_scripts_dir(),
            extensions: default_extensions(),
            bind: default_bind(),
            access: AccessConfig::default(),
        }
    }
}

impl GateConfig {
    pub fn candidate_extensions(&self) -> Result<CandidateExtensions, ConfigError> {
        Ok(CandidateExtensions::new(self.extensions.iter().cloned())?)
    }

    pub fn script_dir(&self) -> Result<ScriptDir, ConfigError> {
        Ok(ScriptDir::new(
            self.scripts_dir.clone(),
            self.candidate_extensions()?,
        ))
    }

    /// Resolves the access policy, loading the shared key once.
    ///
    /// A missing or blank key is not an error here: the gate fails closed on
    /// every key check instead.
    pub fn access_policy(&self) -> Result<AccessPolicy, ConfigError> {
        match self.access.mode {
            PolicyKind::Classifier => Ok(AccessPolicy::Classifier),
            PolicyKind::SharedKey => {
                let secret = match (&self.access.key, &self.access.key_file) {
                    (Some(_), Some(_)) => return Err(ConfigError::ConflictingKeySources),
                    (Some(key), None) => Secret::new(key),
                    (None, Some(path)) => load_key_file(path)?,
                    (None, None) => Secret::unset(),
                };
                if !secret.is_configured() {
                    tracing::warn!("shared_key mode without a key; key submissions will fail");
                }
                Ok(AccessPolicy::SharedKey(secret))
            }
        }
    }

    pub fn build_gate(&self) -> Result<AccessGate<ScriptDir>, ConfigError> {
        Ok(AccessGate::new(self.script_dir()?, self.access_policy()?))
    }
}

fn load_key_file(path: &Path) -> Result<Secret, ConfigError> {
    let data = fs::read_to_string(path).map_err(|source| ConfigError::KeyFileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: KeyFile =
        serde_json::from_str(&data).map_err(|source| ConfigError::KeyFileFormat {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Secret::new(parsed.key))
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("sgate")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<GateConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = GateConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit file.
pub fn load_from(path: &Path) -> Result<GateConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: GateConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_values() {
        let cfg = GateConfig::default();
        assert_eq!(cfg.scripts_dir, PathBuf::from("scripts"));
        assert_eq!(cfg.extensions, vec![".lua", ".txt"]);
        assert_eq!(cfg.bind, "127.0.0.1:8080");
        assert_eq!(cfg.access.mode, PolicyKind::Classifier);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = GateConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: GateConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.scripts_dir, cfg.scripts_dir);
        assert_eq!(parsed.extensions, cfg.extensions);
        assert_eq!(parsed.bind, cfg.bind);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let cfg: GateConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.extensions, vec![".lua", ".txt"]);
        assert!(matches!(cfg.access_policy().unwrap(), AccessPolicy::Classifier));
    }

    #[test]
    fn config_toml_shared_key_inline() {
        let toml = r#"
            scripts_dir = "/srv/scripts"
            extensions = [".txt"]

            [access]
            mode = "shared_key"
            key = "s3cret"
        "#;
        let cfg: GateConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.scripts_dir, PathBuf::from("/srv/scripts"));
        match cfg.access_policy().unwrap() {
            AccessPolicy::SharedKey(secret) => assert!(secret.verify("s3cret")),
            other => panic!("expected SharedKey, got {:?}", other),
        }
    }

    #[test]
    fn shared_key_without_key_fails_closed() {
        let cfg: GateConfig = toml::from_str("[access]\nmode = \"shared_key\"\n").unwrap();
        match cfg.access_policy().unwrap() {
            AccessPolicy::SharedKey(secret) => assert!(!secret.is_configured()),
            other => panic!("expected SharedKey, got {:?}", other),
        }
    }

    #[test]
    fn key_file_json() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(br#"{"key": "from-file"}"#).unwrap();
        f.flush().unwrap();
        let mut cfg = GateConfig::default();
        cfg.access.mode = PolicyKind::SharedKey;
        cfg.access.key_file = Some(f.path().to_path_buf());
        match cfg.access_policy().unwrap() {
            AccessPolicy::SharedKey(secret) => assert!(secret.verify("from-file")),
            other => panic!("expected SharedKey, got {:?}", other),
        }
    }

    #[test]
    fn malformed_key_file_is_error() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"key = nope").unwrap();
        f.flush().unwrap();
        let mut cfg = GateConfig::default();
        cfg.access.mode = PolicyKind::SharedKey;
        cfg.access.key_file = Some(f.path().to_path_buf());
        assert!(matches!(
            cfg.access_policy(),
            Err(ConfigError::KeyFileFormat { .. })
        ));
    }

    #[test]
    fn missing_key_file_is_error() {
        let mut cfg = GateConfig::default();
        cfg.access.mode = PolicyKind::SharedKey;
        cfg.access.key_file = Some(PathBuf::from("/nonexistent/sgate-key.json"));
        assert!(matches!(
            cfg.access_policy(),
            Err(ConfigError::KeyFileRead { .. })
        ));
    }

    #[test]
    fn conflicting_key_sources() {
        let mut cfg = GateConfig::default();
        cfg.access.mode = PolicyKind::SharedKey;
        cfg.access.key = Some("a".into());
        cfg.access.key_file = Some(PathBuf::from("k.json"));
        assert!(matches!(
            cfg.access_policy(),
            Err(ConfigError::ConflictingKeySources)
        ));
    }

    #[test]
    fn invalid_extension_rejected() {
        let cfg: GateConfig = toml::from_str("extensions = [\"/../etc\"]").unwrap();
        assert!(matches!(cfg.script_dir(), Err(ConfigError::Extensions(_))));
    }

    #[test]
    fn debug_output_redacts_key() {
        let mut cfg = GateConfig::default();
        cfg.access.key = Some("do-not-print".into());
        assert!(!format!("{:?}", cfg).contains("do-not-print"));
    }

    #[test]
    fn load_from_explicit_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"bind = \"0.0.0.0:9000\"\n").unwrap();
        f.flush().unwrap();
        let cfg = load_from(f.path()).unwrap();
        assert_eq!(cfg.bind, "0.0.0.0:9000");
        assert_eq!(cfg.scripts_dir, PathBuf::from("scripts"));
    }
}
