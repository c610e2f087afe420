//! Bring an older configuration file up to the current key set.
//!
//! Values already present are never touched; only absent keys are appended
//! with their default value.

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

fn read_mapping(path: &Path) -> AppResult<Mapping> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    if content.trim().is_empty() {
        return Ok(Mapping::new());
    }

    match serde_yaml::from_str::<Value>(&content) {
        Ok(Value::Mapping(map)) => Ok(map),
        Ok(_) => Err(AppError::Config(format!(
            "{} is not a YAML mapping",
            path.display()
        ))),
        Err(e) => Err(AppError::Config(format!("{}: {e}", path.display()))),
    }
}

fn defaults() -> AppResult<Mapping> {
    match serde_yaml::to_value(Config::default()) {
        Ok(Value::Mapping(map)) => Ok(map),
        Ok(_) => Err(AppError::Config("default configuration is not a mapping".into())),
        Err(e) => Err(AppError::Config(e.to_string())),
    }
}

/// Keys of the current configuration absent from the file at `path`.
pub fn missing_keys(path: &Path) -> AppResult<Vec<String>> {
    let current = read_mapping(path)?;

    Ok(defaults()?
        .keys()
        .filter(|k| !current.contains_key(*k))
        .filter_map(|k| k.as_str().map(str::to_string))
        .collect())
}

/// Append the missing keys with their default values and return them.
/// The file is only rewritten when something was added.
pub fn fill_missing_keys(path: &Path) -> AppResult<Vec<String>> {
    let mut current = read_mapping(path)?;
    let mut added = Vec::new();

    for (key, value) in defaults()? {
        if !current.contains_key(&key) {
            if let Some(name) = key.as_str() {
                added.push(name.to_string());
            }
            current.insert(key, value);
        }
    }

    if !added.is_empty() {
        let serialized = serde_yaml::to_string(&Value::Mapping(current))
            .map_err(|e| AppError::Config(e.to_string()))?;
        fs::write(path, serialized)?;
        log::info!("Config {}: added {}", path.display(), added.join(", "));
    }

    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_and_fills_absent_keys_without_touching_others() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rtimeclock.conf");
        fs::write(&path, "hourly_rate: 72.5\nbilling_cycle_type: weekly\n").unwrap();

        let missing = missing_keys(&path).unwrap();
        assert!(missing.contains(&"auto_clock_in".to_string()));
        assert!(!missing.contains(&"hourly_rate".to_string()));

        let added = fill_missing_keys(&path).unwrap();
        assert_eq!(added, missing);
        assert!(missing_keys(&path).unwrap().is_empty());

        let cfg = Config::load_or_create(&path).unwrap();
        assert_eq!(cfg.hourly_rate, 72.5);
        assert_eq!(cfg.billing_cycle_type, "weekly");
    }

    #[test]
    fn complete_file_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rtimeclock.conf");
        Config::default().save(&path).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        assert!(fill_missing_keys(&path).unwrap().is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }
}
