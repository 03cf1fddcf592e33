use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cli::Cli;

/// Root configuration structure, deserialized from `.bom-merge/config.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Merge-stage defaults.
    pub merge: MergeConfig,
    /// VCS root discovery.
    pub vcs: VcsConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Module prefixes always dropped from the resolved BOM.
    pub filter_modules: Vec<String>,
    /// Override file used when `--override-file` is not given.
    pub override_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct VcsConfig {
    /// Directory holding checkouts laid out by import path.
    pub search_root: PathBuf,
    /// Query hosting servers with `?go-get=1`. `--offline` turns it off.
    pub online: bool,
    /// Per-request timeout for online lookups.
    pub timeout_secs: u64,
    /// Hosts whose identifiers fall back to `host/owner/repo`.
    pub fallback_hosts: Vec<String>,
}

impl Default for VcsConfig {
    fn default() -> Self {
        VcsConfig {
            search_root: PathBuf::from("."),
            online: true,
            timeout_secs: 10,
            fallback_hosts: vec!["github.com".to_string()],
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override`, the path passed via `--config`
/// 2. `./.bom-merge/config.toml`
/// 3. `~/.config/bom-merge/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let local_config = Path::new(".bom-merge").join("config.toml");
    if local_config.exists() {
        return read_config(&local_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("bom-merge").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
}

/// Effective settings for one run: CLI flags layered over the config file.
#[derive(Debug, Clone)]
pub struct Settings {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub override_file: Option<PathBuf>,
    pub filter_modules: Vec<String>,
    pub search_root: PathBuf,
    pub online: bool,
    pub timeout: Duration,
    pub fallback_hosts: Vec<String>,
    pub progress: bool,
}

impl Settings {
    /// `--override-file` and `--vcs-search-root` replace config values,
    /// `--filter-modules` adds to them, `--offline` wins over `online`.
    pub fn resolve(cli: &Cli, config: Config) -> Self {
        let mut filter_modules = config.merge.filter_modules;
        filter_modules.extend(cli.filter_modules.iter().cloned());

        let online = config.vcs.online && !cli.offline;
        Settings {
            input_dir: cli.input.clone(),
            output_dir: cli.output.clone(),
            override_file: cli.override_file.clone().or(config.merge.override_file),
            filter_modules,
            search_root: cli.vcs_search_root.clone().unwrap_or(config.vcs.search_root),
            online,
            timeout: Duration::from_secs(config.vcs.timeout_secs),
            fallback_hosts: config.vcs.fallback_hosts,
            progress: online && !cli.quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert!(cfg.merge.filter_modules.is_empty());
        assert!(cfg.merge.override_file.is_none());
        assert_eq!(cfg.vcs.search_root, PathBuf::from("."));
        assert_eq!(cfg.vcs.fallback_hosts, vec!["github.com".to_string()]);
        assert_eq!(cfg.vcs.timeout_secs, 10);
        assert!(cfg.vcs.online);
    }

    #[test]
    fn test_partial_toml() {
        let cfg: Config = toml::from_str(
            r#"
[merge]
filter_modules = ["k8s.io/"]

[vcs]
online = false
"#,
        )
        .unwrap();
        assert_eq!(cfg.merge.filter_modules, vec!["k8s.io/".to_string()]);
        assert!(!cfg.vcs.online);
        assert_eq!(cfg.vcs.timeout_secs, 10);
        assert_eq!(cfg.vcs.fallback_hosts, vec!["github.com".to_string()]);
    }

    #[test]
    fn test_explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[vcs]\nfallback_hosts = [\"github.com\", \"gitlab.com\"]\n").unwrap();
        let cfg = load_config(Some(path.as_path())).unwrap();
        assert_eq!(cfg.vcs.fallback_hosts.len(), 2);

        std::fs::write(&path, "[vcs\n").unwrap();
        assert!(load_config(Some(path.as_path())).is_err());
        assert!(load_config(Some(dir.path().join("missing.toml").as_path())).is_err());
    }

    #[test]
    fn test_cli_layers_over_config() {
        let cli = Cli::parse_from([
            "bom-merge",
            "--in",
            "in",
            "--out",
            "out",
            "--override-file",
            "cli.json",
            "--filter-modules",
            "a/,b/",
            "--filter-modules",
            "c/",
        ]);
        let mut config = Config::default();
        config.merge.filter_modules = vec!["cfg/".to_string()];
        config.merge.override_file = Some(PathBuf::from("cfg.json"));

        let settings = Settings::resolve(&cli, config);
        assert_eq!(settings.override_file, Some(PathBuf::from("cli.json")));
        assert_eq!(settings.filter_modules, vec!["cfg/", "a/", "b/", "c/"]);
        assert!(settings.online);
        assert!(settings.progress);
        assert_eq!(settings.search_root, PathBuf::from("."));
    }

    #[test]
    fn test_offline_flag_disables_lookups() {
        let cli = Cli::parse_from(["bom-merge", "--in", "in", "--out", "out", "--offline"]);
        let settings = Settings::resolve(&cli, Config::default());
        assert!(!settings.online);
        assert!(!settings.progress);

        let cli = Cli::parse_from(["bom-merge", "--in", "in", "--out", "out", "-q"]);
        let settings = Settings::resolve(&cli, Config::default());
        assert!(settings.online);
        assert!(!settings.progress);
    }
}
