// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use accord_app::{DEFAULT_PAGE_SIZE, PAGE_SIZES, Section};
use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_NAME: &str = "accord";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_STATUS_CLEAR_SECS: u64 = 4;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub data: Data,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            ui: Ui::default(),
            data: Data::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub start_section: Option<String>,
    pub page_size: Option<usize>,
    pub status_clear_secs: Option<u64>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            start_section: Some(Section::Dashboard.as_str().to_owned()),
            page_size: Some(DEFAULT_PAGE_SIZE),
            status_clear_secs: Some(DEFAULT_STATUS_CLEAR_SECS),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Data {
    pub seed_dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
            file: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("ACCORD_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set ACCORD_CONFIG_PATH to the config file")
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version. Add `version = 1` and keep values under [ui], [data], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(section) = &self.ui.start_section
            && Section::parse(section).is_none()
        {
            bail!(
                "ui.start_section in {} must be one of dashboard, accounts, contacts, reports; got {:?}",
                path.display(),
                section
            );
        }

        if let Some(size) = self.ui.page_size
            && !PAGE_SIZES.contains(&size)
        {
            bail!(
                "ui.page_size in {} must be one of {:?}, got {}",
                path.display(),
                PAGE_SIZES,
                size
            );
        }

        if self.ui.status_clear_secs == Some(0) {
            bail!(
                "ui.status_clear_secs in {} must be positive, got 0",
                path.display()
            );
        }

        if let Some(dir) = &self.data.seed_dir
            && dir.trim().is_empty()
        {
            bail!(
                "data.seed_dir in {} is empty; remove it to use the bundled seed data",
                path.display()
            );
        }

        if let Some(level) = &self.log.level {
            tracing_subscriber::EnvFilter::try_new(level).with_context(|| {
                format!(
                    "log.level in {} is not a valid filter directive: {level:?}",
                    path.display()
                )
            })?;
        }

        Ok(())
    }

    pub fn start_section(&self) -> Section {
        self.ui
            .start_section
            .as_deref()
            .and_then(Section::parse)
            .unwrap_or(Section::Dashboard)
    }

    pub fn page_size(&self) -> usize {
        self.ui.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn status_clear(&self) -> Duration {
        Duration::from_secs(
            self.ui
                .status_clear_secs
                .unwrap_or(DEFAULT_STATUS_CLEAR_SECS),
        )
    }

    pub fn seed_dir(&self) -> Option<PathBuf> {
        self.data.seed_dir.as_deref().map(PathBuf::from)
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_file(&self) -> Result<PathBuf> {
        match &self.log.file {
            Some(path) => Ok(PathBuf::from(path)),
            None => default_log_path(),
        }
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# accord config\n# Place this file at: {}\n\nversion = 1\n\n[ui]\n# dashboard, accounts, contacts or reports\nstart_section = \"dashboard\"\n# one of {:?}\npage_size = {}\nstatus_clear_secs = {}\n\n[data]\n# Optional. Directory holding {}\n# seed_dir = \"/absolute/path/to/seed\"\n\n[log]\n# tracing filter directive; RUST_LOG overrides it\nlevel = \"{}\"\n# Optional. Default is the platform data dir (for example ~/.local/share/accord/accord.log)\n# file = \"/absolute/path/to/accord.log\"\n",
            path.display(),
            PAGE_SIZES,
            DEFAULT_PAGE_SIZE,
            DEFAULT_STATUS_CLEAR_SECS,
            accord_store::SEED_FILES.join(", "),
            DEFAULT_LOG_LEVEL,
        )
    }
}

pub fn default_log_path() -> Result<PathBuf> {
    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set [log].file in the config")
    })?;
    Ok(data_root.join(APP_NAME).join(format!("{APP_NAME}.log")))
}

#[cfg(test)]
mod tests {
    use super::Config;
    use accord_app::Section;
    use anyhow::Result;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert_eq!(config.start_section(), Section::Dashboard);
        assert_eq!(config.page_size(), 10);
        assert_eq!(config.status_clear(), Duration::from_secs(4));
        assert_eq!(config.seed_dir(), None);
        assert_eq!(config.log_level(), "info");
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[ui]\npage_size = 20\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"));
        assert!(message.contains("[ui], [data], and [log]"));
        Ok(())
    }

    #[test]
    fn full_config_parses() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[ui]\nstart_section = \"contacts\"\npage_size = 30\nstatus_clear_secs = 9\n[data]\nseed_dir = \"/srv/accord/seed\"\n[log]\nlevel = \"accord_store=debug\"\nfile = \"/tmp/accord-test.log\"\n",
        )?;

        let config = Config::load(&path)?;
        assert_eq!(config.start_section(), Section::Contacts);
        assert_eq!(config.page_size(), 30);
        assert_eq!(config.status_clear(), Duration::from_secs(9));
        assert_eq!(config.seed_dir(), Some(PathBuf::from("/srv/accord/seed")));
        assert_eq!(config.log_level(), "accord_store=debug");
        assert_eq!(config.log_file()?, PathBuf::from("/tmp/accord-test.log"));
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 2\n")?;
        let error = Config::load(&path).expect_err("v2 config should fail");
        assert!(error.to_string().contains("unsupported config version 2"));
        Ok(())
    }

    #[test]
    fn unknown_start_section_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\nstart_section = \"inbox\"\n")?;
        let error = Config::load(&path).expect_err("unknown section should fail");
        assert!(error.to_string().contains("ui.start_section"));
        Ok(())
    }

    #[test]
    fn page_size_must_be_offered() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\npage_size = 25\n")?;
        let error = Config::load(&path).expect_err("page size 25 should fail");
        assert!(error.to_string().contains("ui.page_size"));
        Ok(())
    }

    #[test]
    fn status_clear_must_be_positive() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\nstatus_clear_secs = 0\n")?;
        let error = Config::load(&path).expect_err("zero status clear should fail");
        assert!(error.to_string().contains("must be positive"));
        Ok(())
    }

    #[test]
    fn blank_seed_dir_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[data]\nseed_dir = \"  \"\n")?;
        let error = Config::load(&path).expect_err("blank seed dir should fail");
        assert!(error.to_string().contains("data.seed_dir"));
        Ok(())
    }

    #[test]
    fn invalid_log_level_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[log]\nlevel = \"accord=loud\"\n")?;
        let error = Config::load(&path).expect_err("bad filter should fail");
        assert!(error.to_string().contains("log.level"));
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("ACCORD_CONFIG_PATH", &override_path);
        }
        let resolved = Config::default_path();
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("ACCORD_CONFIG_PATH");
        }
        assert_eq!(resolved?, override_path);
        Ok(())
    }

    #[test]
    fn default_path_uses_config_toml_suffix_when_no_env_override() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var("ACCORD_CONFIG_PATH");
        }
        let path = Config::default_path()?;
        assert!(path.ends_with("accord/config.toml"));
        Ok(())
    }

    #[test]
    fn example_config_round_trips_through_load() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        let example = Config::example_config(&path);
        assert!(example.contains("version = 1"));
        assert!(example.contains("[ui]"));
        assert!(example.contains("[data]"));
        assert!(example.contains("[log]"));

        std::fs::write(&path, example)?;
        let config = Config::load(&path)?;
        assert_eq!(config.page_size(), 10);
        Ok(())
    }
}
