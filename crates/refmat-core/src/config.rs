use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Root the primary external-storage volume is mounted under.
pub const DEFAULT_EXTERNAL_STORAGE_ROOT: &str = "/storage/emulated/0";

/// Global configuration loaded from `~/.config/refmat/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefmatConfig {
    /// Where external-storage document paths are rooted.
    pub external_storage_root: PathBuf,
    /// Directory receiving materialized copies; unset means the XDG cache
    /// home (`~/.cache/refmat/cached`).
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

impl Default for RefmatConfig {
    fn default() -> Self {
        Self {
            external_storage_root: PathBuf::from(DEFAULT_EXTERNAL_STORAGE_ROOT),
            cache_dir: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("refmat")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RefmatConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RefmatConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: RefmatConfig = toml::from_str(&data)?;
    Ok(cfg)
}

/// Directory for materialized copies: the configured override, or
/// `<xdg-cache>/refmat/cached`.
pub fn cache_dir(cfg: &RefmatConfig) -> Result<PathBuf> {
    if let Some(dir) = &cfg.cache_dir {
        return Ok(dir.clone());
    }
    let xdg_dirs = xdg::BaseDirectories::with_prefix("refmat")?;
    Ok(xdg_dirs.get_cache_home().join("cached"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = RefmatConfig::default();
        assert_eq!(
            cfg.external_storage_root,
            PathBuf::from("/storage/emulated/0")
        );
        assert!(cfg.cache_dir.is_none());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = RefmatConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: RefmatConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.external_storage_root, cfg.external_storage_root);
        assert_eq!(parsed.cache_dir, cfg.cache_dir);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            external_storage_root = "/mnt/sdcard"
            cache_dir = "/var/tmp/refmat"
        "#;
        let cfg: RefmatConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.external_storage_root, PathBuf::from("/mnt/sdcard"));
        assert_eq!(cfg.cache_dir, Some(PathBuf::from("/var/tmp/refmat")));
    }

    #[test]
    fn cache_dir_override_honored() {
        let cfg = RefmatConfig {
            cache_dir: Some(PathBuf::from("/var/tmp/refmat")),
            ..Default::default()
        };
        assert_eq!(cache_dir(&cfg).unwrap(), PathBuf::from("/var/tmp/refmat"));
    }
}
