//! Grid configuration loading.
//!
//! An explicit `--config` path must exist and parse. Otherwise the user's
//! `grid.toml` in the platform config dir is used when present, and problems
//! with it are reported as warnings.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use sheetgrid_core::GridConfig;
use tracing::debug;

use crate::error::{AppError, Result};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "sheetgrid")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("grid.toml");
    Some(path)
}

fn read_config(path: &Path) -> Result<GridConfig> {
    let config_error = |message: String| AppError::Config {
        path: path.display().to_string(),
        message,
    };
    let meta = std::fs::metadata(path)?;
    if meta.len() > MAX_CONFIG_FILE_BYTES {
        return Err(config_error(format!(
            "file too large ({} bytes, max {})",
            meta.len(),
            MAX_CONFIG_FILE_BYTES
        )));
    }
    let content = std::fs::read_to_string(path)?;
    toml::from_str::<GridConfig>(&content).map_err(|e| config_error(e.to_string()))
}

/// Load the grid configuration, returning it with any warnings to show.
pub fn load_config(explicit: Option<&Path>) -> Result<(GridConfig, Vec<String>)> {
    let mut warnings = Vec::new();
    if let Some(path) = explicit {
        debug!(target: "config", path = %path.display(), "loading config");
        return Ok((read_config(path)?, warnings));
    }

    let Some(path) = user_config_path().filter(|p| p.exists()) else {
        return Ok((GridConfig::default(), warnings));
    };
    debug!(target: "config", path = %path.display(), "loading user config");
    match read_config(&path) {
        Ok(config) => Ok((config, warnings)),
        Err(err) => {
            warnings.push(format!("Ignoring {}: {}", path.display(), err));
            Ok((GridConfig::default(), warnings))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetgrid_core::{ColumnKind, PagingMode};
    use sheetgrid_script::Aggregate;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("sheetgrid-{}-{}", std::process::id(), name));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_full_config() {
        let path = temp_file(
            "full.toml",
            r##"
editable = true
sort_new_rows = true

[paging]
mode = "server"
page_size = 20

[[columns]]
key = "city"
label = "City"
default = "SEL"
kind = { type = "combo", lookup = [{ key = "SEL", label = "Seoul" }] }

[[columns]]
key = "amount"
kind = { type = "number", format = "#,##0.00" }
footer = "sum"

[[columns]]
key = "note"
footer = { custom = "values.len()" }
"##,
        );
        let (config, warnings) = load_config(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(warnings.is_empty());
        assert!(config.sort_new_rows);
        assert_eq!(config.paging.mode, PagingMode::Server);
        assert_eq!(config.columns.len(), 3);
        assert!(matches!(config.columns[0].kind, ColumnKind::Combo { .. }));
        assert_eq!(config.columns[1].footer, Some(Aggregate::Sum));
        assert_eq!(
            config.columns[2].footer,
            Some(Aggregate::Custom("values.len()".into()))
        );
    }

    #[test]
    fn test_unknown_field_is_an_error() {
        let path = temp_file("bad.toml", "pagesize = 3\n");
        let err = load_config(Some(&path)).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, AppError::Config { .. }));
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let path = std::env::temp_dir().join("sheetgrid-does-not-exist.toml");
        assert!(matches!(load_config(Some(&path)), Err(AppError::Io(_))));
    }
}
