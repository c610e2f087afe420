//! Path utilities: expand ~, resolve relative paths against a base directory.

use std::path::{Path, PathBuf};

pub fn expand_tilde(path: &str) -> PathBuf {
    if path.starts_with("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path.trim_start_matches("~/"));
    }
    PathBuf::from(path)
}

/// Expand `~/` and anchor relative paths to `base`.
pub fn resolve_against(base: &Path, path: &str) -> PathBuf {
    let p = expand_tilde(path);
    if p.is_absolute() { p } else { base.join(p) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_are_anchored_to_base() {
        let base = Path::new("/srv/clock");
        assert_eq!(
            resolve_against(base, "rtimeclock.sqlite"),
            PathBuf::from("/srv/clock/rtimeclock.sqlite")
        );
        assert_eq!(
            resolve_against(base, "/tmp/other.sqlite"),
            PathBuf::from("/tmp/other.sqlite")
        );
    }
}
