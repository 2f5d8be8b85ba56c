use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::collision::CollisionSet;
use crate::gate::GateSettings;
use crate::url_model::SiteRoot;

/// Global configuration loaded from `~/.config/cleanurls/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanUrlsConfig {
    /// Site base URL; every cleaned or uncleaned URL lives under it.
    pub wwwroot: String,
    /// Clean outgoing URLs and unclean incoming paths.
    #[serde(default)]
    pub cleaningon: bool,
    /// Whether the host delegates URL rewriting to the engine at all.
    #[serde(default = "default_true")]
    pub enableurlrewrite: bool,
    /// Put usernames in user profile paths.
    #[serde(default)]
    pub cleanusernames: bool,
    /// Optional code directory used to detect path collisions on disk.
    #[serde(default)]
    pub dirroot: Option<PathBuf>,
    /// Extra top-level names that short names must never take.
    #[serde(default)]
    pub extra_reserved: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl Default for CleanUrlsConfig {
    fn default() -> Self {
        Self {
            wwwroot: "http://localhost/moodle".to_string(),
            cleaningon: false,
            enableurlrewrite: true,
            cleanusernames: false,
            dirroot: None,
            extra_reserved: Vec::new(),
        }
    }
}

impl CleanUrlsConfig {
    pub fn gate_settings(&self) -> GateSettings {
        GateSettings {
            cleaningon: self.cleaningon,
            enableurlrewrite: self.enableurlrewrite,
            cleanusernames: self.cleanusernames,
        }
    }

    pub fn site_root(&self) -> Result<SiteRoot> {
        SiteRoot::parse(&self.wwwroot).with_context(|| "invalid wwwroot in config".to_string())
    }

    pub fn collision_set(&self) -> CollisionSet {
        CollisionSet::with_extra(self.extra_reserved.iter().cloned())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("cleanurls")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<CleanUrlsConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = CleanUrlsConfig::default();
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
pub fn load_from(path: &Path) -> Result<CleanUrlsConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: CleanUrlsConfig =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    // Validate early so a bad root surfaces at load time, not on first use.
    cfg.site_root()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::RewriteMode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_config_values() {
        let cfg = CleanUrlsConfig::default();
        assert_eq!(cfg.wwwroot, "http://localhost/moodle");
        assert!(!cfg.cleaningon);
        assert!(cfg.enableurlrewrite);
        assert!(!cfg.cleanusernames);
        assert_eq!(cfg.gate_settings().mode(), RewriteMode::SelfTestOnly);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = CleanUrlsConfig {
            cleaningon: true,
            dirroot: Some(PathBuf::from("/var/www/moodle")),
            extra_reserved: vec!["blocks".to_string()],
            ..CleanUrlsConfig::default()
        };
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: CleanUrlsConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_toml_minimal() {
        let toml = r#"
            wwwroot = "https://lms.example.edu"
        "#;
        let cfg: CleanUrlsConfig = toml::from_str(toml).unwrap();
        assert!(!cfg.cleaningon);
        assert!(cfg.enableurlrewrite);
        assert!(cfg.dirroot.is_none());
        assert!(cfg.extra_reserved.is_empty());
        assert_eq!(cfg.site_root().unwrap().as_str(), "https://lms.example.edu/");
    }

    #[test]
    fn config_toml_all_switches() {
        let toml = r#"
            wwwroot = "http://www.example.com/moodle"
            cleaningon = true
            enableurlrewrite = false
            cleanusernames = true
            extra_reserved = ["blocks", "mod"]
        "#;
        let cfg: CleanUrlsConfig = toml::from_str(toml).unwrap();
        let gate = cfg.gate_settings();
        assert!(gate.is_inconsistent());
        assert_eq!(gate.mode(), RewriteMode::Off);
        assert!(gate.cleanusernames);
        let reserved = cfg.collision_set();
        assert!(reserved.contains("mod"));
        assert!(reserved.contains("admin"));
    }

    #[test]
    fn load_from_rejects_bad_root() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(b"wwwroot = \"ftp://example.com\"\n").unwrap();
        f.flush().unwrap();
        assert!(load_from(f.path()).is_err());
    }

    #[test]
    fn load_from_reads_file() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(b"wwwroot = \"http://www.example.com/moodle\"\ncleaningon = true\n")
            .unwrap();
        f.flush().unwrap();
        let cfg = load_from(f.path()).unwrap();
        assert!(cfg.cleaningon);
    }
}
