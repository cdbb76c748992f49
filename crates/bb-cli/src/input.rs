//! Input file loading

use anyhow::{Context, Result};
use bb_core::EngineConfig;
use bb_model::{CapacityConfig, RawWorkItem, WorkItem};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Exported items, either a bare array or wrapped under `items` / `issues`
#[derive(Deserialize)]
#[serde(untagged)]
enum ItemsFile {
    List(Vec<RawWorkItem>),
    Wrapped {
        #[serde(alias = "issues")]
        items: Vec<RawWorkItem>,
    },
}

/// Read and normalize a JSON work item export
///
/// # Errors
/// Fails when the file is unreadable or not a JSON list of records.
pub fn load_items(path: &Path) -> Result<Vec<WorkItem>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading items {}", path.display()))?;
    let file: ItemsFile =
        serde_json::from_str(&text).with_context(|| format!("parsing items {}", path.display()))?;
    let records = match file {
        ItemsFile::List(records) | ItemsFile::Wrapped { items: records } => records,
    };
    tracing::debug!("Loaded {} items from {}", records.len(), path.display());
    Ok(records.into_iter().map(WorkItem::from).collect())
}

/// Read a capacity file: TOML for `.toml`, JSON otherwise
///
/// # Errors
/// Fails when the file is unreadable or does not parse. Shape problems are
/// reported later, when the engine validates the configuration.
pub fn load_capacity(path: &Path) -> Result<CapacityConfig> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading capacity {}", path.display()))?;
    let parsed = if is_toml(path) {
        toml::from_str(&text).map_err(anyhow::Error::from)
    } else {
        serde_json::from_str(&text).map_err(anyhow::Error::from)
    };
    parsed.with_context(|| format!("parsing capacity {}", path.display()))
}

/// Read engine configuration, or the defaults when no path is given
///
/// # Errors
/// Fails when the file is unreadable or not valid engine TOML.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    EngineConfig::from_toml_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn file(suffix: &str, body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn items_accept_bare_and_wrapped_lists() {
        let bare = file(".json", r#"[{"key": "A"}, {"key": "B"}]"#);
        assert_eq!(load_items(bare.path()).unwrap().len(), 2);

        let wrapped = file(".json", r#"{"issues": [{"key": "A"}]}"#);
        assert_eq!(load_items(wrapped.path()).unwrap()[0].key, "A");
    }

    #[test]
    fn capacity_format_follows_extension() {
        let toml = file(".toml", "team_hours = 80.0\nperiod = \"month\"\n");
        let config = load_capacity(toml.path()).unwrap();
        assert_eq!(config.team_hours, Some(80.0));

        let json = file(".json", r#"{"team_hours": 40}"#);
        assert_eq!(load_capacity(json.path()).unwrap().team_hours, Some(40.0));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_items(Path::new("/nonexistent/items.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/items.json"));
    }

    #[test]
    fn no_config_path_is_default() {
        assert_eq!(load_config(None).unwrap(), EngineConfig::default());
    }
}
