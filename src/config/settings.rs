use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::crypto::{KdfAlgorithm, KdfSettings};
use crate::errors::{Result, TodoVaultError};
use crate::vault::DEFAULT_VAULT_NAME;

/// User-level configuration, loaded from `todovault.toml`.
///
/// Every field has a sensible default so todovault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory where vault files are stored.  Falls back to the
    /// per-user data directory when unset.
    #[serde(default)]
    pub vault_dir: Option<PathBuf>,

    /// Which vault to use when none is specified.
    #[serde(default = "default_vault")]
    pub default_vault: String,

    /// KDF used for new envelopes: "scrypt" or "argon2id".
    #[serde(default = "default_kdf")]
    pub kdf: KdfAlgorithm,

    /// scrypt cost as a power of two (default: 15, i.e. N = 32768).
    #[serde(default = "default_scrypt_log_n")]
    pub scrypt_log_n: u8,

    /// scrypt block size (default: 8).
    #[serde(default = "default_scrypt_r")]
    pub scrypt_r: u32,

    /// scrypt parallelism (default: 1).
    #[serde(default = "default_scrypt_p")]
    pub scrypt_p: u32,

    /// Argon2 memory cost in KiB (default: 64 MB).
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count (default: 3).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2 parallelism degree (default: 4).
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault() -> String {
    DEFAULT_VAULT_NAME.to_string()
}

fn default_kdf() -> KdfAlgorithm {
    KdfAlgorithm::Scrypt
}

fn default_scrypt_log_n() -> u8 {
    15
}

fn default_scrypt_r() -> u32 {
    8
}

fn default_scrypt_p() -> u32 {
    1
}

fn default_argon2_memory_kib() -> u32 {
    65_536 // 64 MB
}

fn default_argon2_iterations() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    4
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_dir: None,
            default_vault: default_vault(),
            kdf: default_kdf(),
            scrypt_log_n: default_scrypt_log_n(),
            scrypt_r: default_scrypt_r(),
            scrypt_p: default_scrypt_p(),
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
        }
    }
}

impl Settings {
    /// Name of the config file.
    pub const FILE_NAME: &'static str = "todovault.toml";

    /// Load settings from the config file at `path`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            TodoVaultError::ConfigError(format!("Failed to parse {}: {e}", path.display()))
        })?;

        Ok(settings)
    }

    /// Load settings from an explicit path, or from the default config
    /// location when `path` is `None`.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Self::load(&default_config_path()?),
        }
    }

    /// Resolve the vault directory.
    ///
    /// An explicit override (command-line flag or `TODOVAULT_DIR`) wins,
    /// then `vault_dir` from the config file, then the per-user data dir.
    pub fn vault_dir(&self, override_dir: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = override_dir {
            return Ok(dir.to_path_buf());
        }
        if let Some(dir) = &self.vault_dir {
            return Ok(dir.clone());
        }
        default_data_dir()
    }

    /// Convert the KDF settings into crypto-layer settings.
    ///
    /// Out-of-range values are rejected here so a bad config fails before
    /// any file is written.
    pub fn kdf_settings(&self) -> Result<KdfSettings> {
        let settings = match self.kdf {
            KdfAlgorithm::Scrypt => {
                let n = 1u64.checked_shl(u32::from(self.scrypt_log_n)).ok_or_else(|| {
                    TodoVaultError::ConfigError(format!(
                        "scrypt_log_n {} is too large",
                        self.scrypt_log_n
                    ))
                })?;
                KdfSettings {
                    algorithm: KdfAlgorithm::Scrypt,
                    n,
                    r: self.scrypt_r,
                    p: self.scrypt_p,
                }
            }
            KdfAlgorithm::Argon2id => KdfSettings {
                algorithm: KdfAlgorithm::Argon2id,
                n: u64::from(self.argon2_memory_kib),
                r: self.argon2_iterations,
                p: self.argon2_parallelism,
            },
        };

        settings
            .validate()
            .map_err(|e| TodoVaultError::ConfigError(e.to_string()))?;
        Ok(settings)
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "todovault").ok_or_else(|| {
        TodoVaultError::ConfigError("could not determine the home directory".into())
    })
}

/// Per-user data directory where vaults live by default.
pub fn default_data_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}

/// Default location of `todovault.toml`.
pub fn default_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join(Settings::FILE_NAME))
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.default_vault, "vault");
        assert_eq!(s.kdf, KdfAlgorithm::Scrypt);
        assert_eq!(s.kdf_settings().unwrap(), KdfSettings::scrypt());
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(&tmp.path().join(Settings::FILE_NAME)).unwrap();
        assert_eq!(settings.default_vault, "vault");
        assert!(settings.vault_dir.is_none());
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(Settings::FILE_NAME);
        let config = r#"
vault_dir = "/srv/tasks"
default_vault = "work"
kdf = "argon2id"
argon2_memory_kib = 131072
argon2_iterations = 5
argon2_parallelism = 2
"#;
        fs::write(&path, config).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.default_vault, "work");
        assert_eq!(settings.vault_dir, Some(PathBuf::from("/srv/tasks")));
        assert_eq!(
            settings.kdf_settings().unwrap(),
            KdfSettings {
                algorithm: KdfAlgorithm::Argon2id,
                n: 131_072,
                r: 5,
                p: 2,
            }
        );
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(Settings::FILE_NAME);
        fs::write(&path, "scrypt_log_n = 12\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.default_vault, "vault");
        let kdf = settings.kdf_settings().unwrap();
        assert_eq!(kdf.n, 4096);
        assert_eq!(kdf.r, 8);
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(Settings::FILE_NAME);
        fs::write(&path, "not valid {{toml").unwrap();
        assert!(matches!(
            Settings::load(&path),
            Err(TodoVaultError::ConfigError(_))
        ));
    }

    #[test]
    fn weak_kdf_settings_are_rejected() {
        let s = Settings {
            scrypt_log_n: 4,
            ..Settings::default()
        };
        assert!(matches!(
            s.kdf_settings(),
            Err(TodoVaultError::ConfigError(_))
        ));

        let s = Settings {
            scrypt_log_n: 200,
            ..Settings::default()
        };
        assert!(s.kdf_settings().is_err());
    }

    #[test]
    fn vault_dir_precedence() {
        let s = Settings {
            vault_dir: Some(PathBuf::from("/from/config")),
            ..Settings::default()
        };
        assert_eq!(
            s.vault_dir(Some(Path::new("/from/flag"))).unwrap(),
            PathBuf::from("/from/flag")
        );
        assert_eq!(s.vault_dir(None).unwrap(), PathBuf::from("/from/config"));
    }
}
