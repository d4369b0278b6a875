use std::{fs, path::PathBuf, time::Duration};

use cart::TaxRule;
use checkout_core::{CheckoutOptions, DEFAULT_LOAD_TIMEOUT};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::warn;

pub const DEFAULT_CATALOG_URL: &str = "http://127.0.0.1:8080";
pub const MIN_LOAD_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogLocation {
    Url(String),
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub catalog: CatalogLocation,
    pub load_timeout: Duration,
    pub tax_rule: TaxRule,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog: CatalogLocation::Url(DEFAULT_CATALOG_URL.into()),
            load_timeout: DEFAULT_LOAD_TIMEOUT,
            tax_rule: TaxRule::default(),
        }
    }
}

impl Settings {
    pub fn checkout_options(&self) -> CheckoutOptions {
        CheckoutOptions {
            load_timeout: self.load_timeout,
            tax_rule: self.tax_rule,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    catalog_url: Option<String>,
    catalog_file: Option<PathBuf>,
    load_timeout_secs: Option<u64>,
    tax_threshold: Option<Decimal>,
    tax_rate: Option<Decimal>,
}

/// Values given on the command line; they override everything else.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub catalog_url: Option<String>,
    pub catalog_file: Option<PathBuf>,
    pub load_timeout_secs: Option<u64>,
}

pub fn load_settings(config_path: &str, overrides: Overrides) -> Settings {
    let file = fs::read_to_string(config_path).ok();
    resolve_settings(file.as_deref(), |key| std::env::var(key).ok(), overrides)
}

pub(crate) fn resolve_settings(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
    overrides: Overrides,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        match toml::from_str::<FileSettings>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.catalog_url {
                    settings.catalog = CatalogLocation::Url(v);
                }
                if let Some(v) = file_cfg.catalog_file {
                    settings.catalog = CatalogLocation::File(v);
                }
                if let Some(v) = file_cfg.load_timeout_secs {
                    settings.load_timeout = load_timeout_from_secs(v, "config file");
                }
                if let Some(v) = file_cfg.tax_threshold {
                    settings.tax_rule.threshold = v;
                }
                if let Some(v) = file_cfg.tax_rate {
                    settings.tax_rule.rate = v;
                }
            }
            Err(error) => warn!(%error, "ignoring malformed checkout config file"),
        }
    }

    if let Some(v) = env("CHECKOUT__CATALOG_URL") {
        settings.catalog = CatalogLocation::Url(v);
    }
    if let Some(v) = env("CHECKOUT__CATALOG_FILE") {
        settings.catalog = CatalogLocation::File(PathBuf::from(v));
    }
    if let Some(v) = env("CHECKOUT__LOAD_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.load_timeout = load_timeout_from_secs(parsed, "CHECKOUT__LOAD_TIMEOUT_SECS");
        }
    }
    if let Some(v) = env("CHECKOUT__TAX_THRESHOLD") {
        if let Ok(parsed) = v.parse::<Decimal>() {
            settings.tax_rule.threshold = parsed;
        }
    }
    if let Some(v) = env("CHECKOUT__TAX_RATE") {
        if let Ok(parsed) = v.parse::<Decimal>() {
            settings.tax_rule.rate = parsed;
        }
    }

    if let Some(v) = overrides.catalog_url {
        settings.catalog = CatalogLocation::Url(v);
    }
    if let Some(v) = overrides.catalog_file {
        settings.catalog = CatalogLocation::File(v);
    }
    if let Some(v) = overrides.load_timeout_secs {
        settings.load_timeout = load_timeout_from_secs(v, "--load-timeout-secs");
    }

    settings
}

/// Zero is raised to [`MIN_LOAD_TIMEOUT`].
fn load_timeout_from_secs(secs: u64, origin: &str) -> Duration {
    if secs == 0 {
        warn!(origin, "load timeout of 0 seconds raised to {MIN_LOAD_TIMEOUT:?}");
        return MIN_LOAD_TIMEOUT;
    }
    Duration::from_secs(secs)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
