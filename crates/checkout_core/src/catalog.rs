//! Sources the checkout screen can load its product list from.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::domain::CatalogItem;
use url::Url;

/// The store item feed.
///
/// `Ok(None)` means the source answered but had nothing to offer; the caller
/// treats that the same way as an empty list.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_items(&self) -> Result<Option<Vec<CatalogItem>>>;
    fn describe(&self) -> String;
}

pub struct HttpCatalogSource {
    http: Client,
    items_url: Url,
}

impl HttpCatalogSource {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self> {
        Ok(Self {
            http,
            items_url: items_url(base_url)?,
        })
    }

    pub fn items_url(&self) -> &Url {
        &self.items_url
    }
}

fn items_url(base_url: &str) -> Result<Url> {
    let mut base = Url::parse(base_url.trim())
        .with_context(|| format!("invalid catalog url '{base_url}'"))?;
    if !matches!(base.scheme(), "http" | "https") {
        bail!(
            "catalog url '{base_url}' must use http or https, got '{}'",
            base.scheme()
        );
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join("items")
        .with_context(|| format!("failed to build items url from '{base_url}'"))
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_items(&self) -> Result<Option<Vec<CatalogItem>>> {
        let res = self
            .http
            .get(self.items_url.clone())
            .send()
            .await
            .with_context(|| format!("failed to reach {}", self.items_url))?;
        if res.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let body = res.error_for_status()?.bytes().await?;
        parse_items(&body).with_context(|| format!("malformed catalog from {}", self.items_url))
    }

    fn describe(&self) -> String {
        self.items_url.to_string()
    }
}

pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    async fn fetch_items(&self) -> Result<Option<Vec<CatalogItem>>> {
        let raw = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("failed to read catalog file '{}'", self.path.display()))?;
        parse_items(&raw)
            .with_context(|| format!("malformed catalog file '{}'", self.path.display()))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[derive(Default)]
pub struct StaticCatalogSource {
    items: Option<Vec<CatalogItem>>,
}

impl StaticCatalogSource {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items: Some(items) }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogSource for StaticCatalogSource {
    async fn fetch_items(&self) -> Result<Option<Vec<CatalogItem>>> {
        Ok(self.items.clone())
    }

    fn describe(&self) -> String {
        "static catalog".to_string()
    }
}

/// A blank body or a JSON `null` both mean "no data".
pub fn parse_items(raw: &[u8]) -> Result<Option<Vec<CatalogItem>>> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    Ok(serde_json::from_slice(raw)?)
}
