use crate::errors::{AppError, AppResult};
use crate::models::{BillingCycle, BillingPolicy};
use crate::utils::date::parse_date;
use crate::utils::path::{expand_tilde, resolve_against};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub mod migrate;

pub const APP_DIR: &str = ".rtimeclock";
pub const CONFIG_FILE: &str = "rtimeclock.conf";
pub const DB_FILE: &str = "rtimeclock.sqlite";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_hourly_rate")]
    pub hourly_rate: f64,
    #[serde(default = "default_billing_cycle")]
    pub billing_cycle_type: String,
    #[serde(default = "default_anchor")]
    pub pay_period_anchor: String,
    #[serde(default = "default_true")]
    pub auto_clock_in: bool,
    #[serde(default = "default_true")]
    pub auto_clock_out: bool,
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
}

fn default_hourly_rate() -> f64 {
    50.0
}
fn default_billing_cycle() -> String {
    BillingCycle::Biweekly.as_str().to_string()
}
fn default_anchor() -> String {
    BillingPolicy::default_anchor().format("%Y-%m-%d").to_string()
}
fn default_true() -> bool {
    true
}
fn default_database_path() -> String {
    DB_FILE.to_string()
}
fn default_refresh_interval() -> u64 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hourly_rate: default_hourly_rate(),
            billing_cycle_type: default_billing_cycle(),
            pay_period_anchor: default_anchor(),
            auto_clock_in: default_true(),
            auto_clock_out: default_true(),
            database_path: default_database_path(),
            refresh_interval_secs: default_refresh_interval(),
        }
    }
}

impl Config {
    /// `~/.rtimeclock`
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    /// Return the full path of the default config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join(CONFIG_FILE)
    }

    /// Load the configuration at `path`. A missing file is created with the
    /// defaults; a file that exists but cannot be read, parsed or validated
    /// is an error.
    pub fn load_or_create(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            let cfg = Config::default();
            cfg.save(path)?;
            log::info!("Created default configuration at {}", path.display());
            return Ok(cfg);
        }

        let content = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
        let cfg = Self::parse(&content).map_err(|e| match e {
            AppError::Config(msg) => AppError::Config(format!("{}: {msg}", path.display())),
            other => other,
        })?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(cfg)
    }

    /// Parse and validate YAML content. Absent keys take their defaults.
    pub fn parse(content: &str) -> AppResult<Self> {
        let cfg: Config = if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| AppError::Config(e.to_string()))?
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> AppResult<()> {
        if !self.hourly_rate.is_finite() || self.hourly_rate <= 0.0 {
            return Err(AppError::Config(format!(
                "hourly_rate must be a positive number, got {}",
                self.hourly_rate
            )));
        }
        if self.refresh_interval_secs == 0 {
            return Err(AppError::Config(
                "refresh_interval_secs must be at least 1".into(),
            ));
        }
        if self.database_path.trim().is_empty() {
            return Err(AppError::Config("database_path must not be empty".into()));
        }
        self.billing_policy()?;
        Ok(())
    }

    pub fn billing_policy(&self) -> AppResult<BillingPolicy> {
        let cycle = BillingCycle::from_config(&self.billing_cycle_type).ok_or_else(|| {
            AppError::Config(format!(
                "unsupported billing_cycle_type '{}' (expected biweekly or weekly)",
                self.billing_cycle_type
            ))
        })?;

        let anchor = parse_date(&self.pay_period_anchor).ok_or_else(|| {
            AppError::Config(format!(
                "pay_period_anchor '{}' is not a YYYY-MM-DD date",
                self.pay_period_anchor
            ))
        })?;

        BillingPolicy::new(cycle, anchor).ok_or_else(|| {
            AppError::Config(format!(
                "pay_period_anchor {} is not a Friday",
                self.pay_period_anchor
            ))
        })
    }

    /// Database location; relative paths are anchored to `config_dir`.
    pub fn database_file(&self, config_dir: &Path) -> PathBuf {
        resolve_against(config_dir, &self.database_path)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_yaml()?)?;
        Ok(())
    }
}

/// File locations resolved once at start-up from the CLI overrides and the
/// configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppPaths {
    pub config_file: PathBuf,
    pub config_dir: PathBuf,
    pub database: PathBuf,
}

impl AppPaths {
    /// The config file defaults to `~/.rtimeclock/rtimeclock.conf`.
    pub fn config_location(config_override: Option<&str>) -> (PathBuf, PathBuf) {
        match config_override {
            Some(p) => {
                let file = expand_tilde(p);
                let dir = file
                    .parent()
                    .filter(|d| !d.as_os_str().is_empty())
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."));
                (file, dir)
            }
            None => (Config::config_file(), Config::config_dir()),
        }
    }

    pub fn resolve(
        config_file: PathBuf,
        config_dir: PathBuf,
        cfg: &Config,
        db_override: Option<&str>,
    ) -> Self {
        let database = match db_override {
            Some(db) => expand_tilde(db),
            None => cfg.database_file(&config_dir),
        };
        Self {
            config_file,
            config_dir,
            database,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let cfg = Config::load_or_create(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());

        // and reads back identically
        assert_eq!(Config::load_or_create(&path).unwrap(), cfg);
    }

    #[test]
    fn partial_file_takes_defaults_for_absent_keys() {
        let cfg = Config::parse("hourly_rate: 45\nauto_clock_in: false\n").unwrap();
        assert_eq!(cfg.hourly_rate, 45.0);
        assert!(!cfg.auto_clock_in);
        assert!(cfg.auto_clock_out);
        assert_eq!(cfg.billing_cycle_type, "biweekly");
        assert_eq!(cfg.refresh_interval(), Duration::from_secs(1));
    }

    #[test]
    fn malformed_file_is_an_error_not_a_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "hourly_rate: [not, a, number\n").unwrap();

        let err = Config::load_or_create(&path).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        // the broken file is left untouched
        assert!(fs::read_to_string(&path).unwrap().contains("not, a, number"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(Config::parse("hourly_rate: 0").is_err());
        assert!(Config::parse("hourly_rate: -12.5").is_err());
        assert!(Config::parse("billing_cycle_type: monthly").is_err());
        assert!(Config::parse("pay_period_anchor: 2024-01-04").is_err());
        assert!(Config::parse("pay_period_anchor: yesterday").is_err());
        assert!(Config::parse("refresh_interval_secs: 0").is_err());
    }

    #[test]
    fn billing_policy_follows_the_file() {
        let cfg = Config::parse("billing_cycle_type: weekly\npay_period_anchor: 2024-01-05\n").unwrap();
        let policy = cfg.billing_policy().unwrap();
        assert_eq!(policy.cycle, BillingCycle::Weekly);
        assert_eq!(policy.anchor, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());

        assert_eq!(Config::default().billing_policy().unwrap(), BillingPolicy::biweekly());
    }

    #[test]
    fn overrides_win_over_defaults() {
        let (file, dir) = AppPaths::config_location(Some("/etc/clock/custom.conf"));
        assert_eq!(file, PathBuf::from("/etc/clock/custom.conf"));
        assert_eq!(dir, PathBuf::from("/etc/clock"));

        let paths = AppPaths::resolve(file.clone(), dir.clone(), &Config::default(), None);
        assert_eq!(paths.database, PathBuf::from("/etc/clock/rtimeclock.sqlite"));

        let paths = AppPaths::resolve(file, dir, &Config::default(), Some("/tmp/t.sqlite"));
        assert_eq!(paths.database, PathBuf::from("/tmp/t.sqlite"));
    }

    #[test]
    fn database_path_is_resolved_against_config_dir() {
        let cfg = Config::default();
        assert_eq!(
            cfg.database_file(Path::new("/home/me/.rtimeclock")),
            PathBuf::from("/home/me/.rtimeclock/rtimeclock.sqlite")
        );

        let abs = Config {
            database_path: "/var/lib/clock.sqlite".into(),
            ..Config::default()
        };
        assert_eq!(
            abs.database_file(Path::new("/home/me/.rtimeclock")),
            PathBuf::from("/var/lib/clock.sqlite")
        );
    }
}
