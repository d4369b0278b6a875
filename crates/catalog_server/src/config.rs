use std::{
    collections::{HashMap, HashSet},
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use serde::Deserialize;
use shared::domain::CatalogItem;

const SETTINGS_FILE: &str = "catalog_server.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub bind_addr: String,
    pub catalog_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".into(),
            catalog_path: PathBuf::from("./data/catalog.json"),
        }
    }
}

pub fn load_settings() -> Settings {
    let file = fs::read_to_string(SETTINGS_FILE).ok();
    resolve_settings(file.as_deref(), |key| std::env::var(key).ok())
}

/// Defaults, then the TOML file, then environment variables. Later sources
/// win; unreadable or malformed values are skipped.
pub(crate) fn resolve_settings(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
            if let Some(v) = file_cfg.get("bind_addr") {
                settings.bind_addr = v.clone();
            }
            if let Some(v) = file_cfg.get("catalog_path") {
                settings.catalog_path = PathBuf::from(v);
            }
        }
    }

    if let Some(v) = env("CATALOG_BIND") {
        settings.bind_addr = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.bind_addr = v;
    }

    if let Some(v) = env("CATALOG_PATH") {
        settings.catalog_path = PathBuf::from(v);
    }
    if let Some(v) = env("APP__CATALOG_PATH") {
        settings.catalog_path = PathBuf::from(v);
    }

    settings
}

pub fn load_catalog(path: &Path) -> anyhow::Result<Vec<CatalogItem>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog file '{}'", path.display()))?;
    let items: Vec<CatalogItem> = serde_json::from_str(&raw)
        .with_context(|| format!("catalog file '{}' is not a JSON item list", path.display()))?;

    let mut seen = HashSet::new();
    for item in &items {
        if !seen.insert(item.id) {
            bail!(
                "catalog file '{}' lists item id {} more than once",
                path.display(),
                item.id
            );
        }
    }

    Ok(items)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
