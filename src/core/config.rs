use crate::config::{Config, migrate};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use std::fs;
use std::path::Path;
use std::process::Command;

pub struct ConfigLogic;

impl ConfigLogic {
    pub fn print(path: &Path, cfg: &Config) -> AppResult<()> {
        println!("📄 Current configuration ({}):\n", path.display());
        println!("{}", cfg.to_yaml()?);
        Ok(())
    }

    /// Validate the file and list the keys it does not set.
    pub fn check(path: &Path) -> AppResult<()> {
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
        Config::parse(&content)?;

        let missing = migrate::missing_keys(path)?;
        if missing.is_empty() {
            success(format!("Configuration {} is complete.", path.display()));
        } else {
            warning(format!(
                "Configuration {} is missing: {} (run `config --migrate` to add the defaults)",
                path.display(),
                missing.join(", ")
            ));
        }
        Ok(())
    }

    /// Returns the keys that were added.
    pub fn migrate(path: &Path) -> AppResult<Vec<String>> {
        let added = migrate::fill_missing_keys(path)?;
        if added.is_empty() {
            info("Configuration already up to date.");
        } else {
            success(format!("Configuration updated, added: {}", added.join(", ")));
        }
        Ok(added)
    }

    /// Open `path` in `editor`, or `$EDITOR`/`$VISUAL`, falling back to the
    /// platform default when the requested one cannot be run. Returns the
    /// editor that was used.
    pub fn edit(path: &Path, editor: Option<&str>) -> AppResult<String> {
        let default_editor = std::env::var("EDITOR")
            .or_else(|_| std::env::var("VISUAL"))
            .unwrap_or_else(|_| {
                if cfg!(target_os = "windows") {
                    "notepad".to_string()
                } else {
                    "nano".to_string()
                }
            });

        let editor_to_use = editor.map(str::to_string).unwrap_or_else(|| default_editor.clone());

        match Command::new(&editor_to_use).arg(path).status() {
            Ok(s) if s.success() => {
                success(format!(
                    "Configuration file edited successfully using '{editor_to_use}'"
                ));
                return Ok(editor_to_use);
            }
            _ if editor_to_use == default_editor => {
                return Err(AppError::Config(format!(
                    "failed to edit {} using '{editor_to_use}'",
                    path.display()
                )));
            }
            _ => warning(format!(
                "Editor '{editor_to_use}' not available, falling back to '{default_editor}'"
            )),
        }

        match Command::new(&default_editor).arg(path).status() {
            Ok(s) if s.success() => {
                success(format!(
                    "Configuration file edited successfully using fallback '{default_editor}'"
                ));
                Ok(default_editor)
            }
            _ => Err(AppError::Config(format!(
                "failed to edit {} using fallback '{default_editor}'",
                path.display()
            ))),
        }
    }
}
