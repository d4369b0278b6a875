use std::{sync::Arc, time::Duration};

use cart::{Cart, CartRow, CartTotals, TaxRule};
use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::{
    domain::{Direction, ItemId},
    error::CartError,
};
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

pub mod catalog;
pub mod error;
pub mod view;

pub use catalog::{CatalogSource, FileCatalogSource, HttpCatalogSource, StaticCatalogSource};
pub use error::CatalogLoadError;

pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum CheckoutPhase {
    Loading,
    Ready,
    Empty,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSnapshot {
    pub phase: CheckoutPhase,
    pub rows: Vec<CartRow>,
    #[serde(flatten)]
    pub totals: CartTotals,
    pub revision: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loaded_at: Option<DateTime<Utc>>,
}

impl CheckoutSnapshot {
    pub fn is_loading(&self) -> bool {
        self.phase == CheckoutPhase::Loading
    }

    pub fn row(&self, id: ItemId) -> Option<&CartRow> {
        self.rows.iter().find(|row| row.id == id)
    }
}

#[derive(Debug, Clone)]
pub enum CheckoutEvent {
    SnapshotChanged(CheckoutSnapshot),
    AdjustmentRejected { item_id: ItemId, error: CartError },
}

#[derive(Debug, Clone, Copy)]
pub struct CheckoutOptions {
    pub load_timeout: Duration,
    pub tax_rule: TaxRule,
}

impl Default for CheckoutOptions {
    fn default() -> Self {
        Self {
            load_timeout: DEFAULT_LOAD_TIMEOUT,
            tax_rule: TaxRule::default(),
        }
    }
}

struct CheckoutState {
    phase: CheckoutPhase,
    load_in_flight: bool,
    cart: Cart,
    loaded_at: Option<DateTime<Utc>>,
}

impl CheckoutState {
    fn snapshot(&self) -> CheckoutSnapshot {
        CheckoutSnapshot {
            phase: self.phase.clone(),
            rows: self.cart.rows().to_vec(),
            totals: self.cart.totals(),
            revision: self.cart.revision(),
            loaded_at: self.loaded_at,
        }
    }

    fn publish(&self, events: &broadcast::Sender<CheckoutEvent>) {
        let _ = events.send(CheckoutEvent::SnapshotChanged(self.snapshot()));
    }
}

/// Owns the cart for one checkout screen.
///
/// All mutations go through the internal mutex, so adjustments are applied
/// one at a time. The lock is not held while the catalog is being fetched.
pub struct CheckoutClient {
    source: Arc<dyn CatalogSource>,
    options: CheckoutOptions,
    inner: Arc<Mutex<CheckoutState>>,
    events: broadcast::Sender<CheckoutEvent>,
}

impl CheckoutClient {
    pub fn new(source: Arc<dyn CatalogSource>) -> Arc<Self> {
        Self::new_with_options(source, CheckoutOptions::default())
    }

    pub fn new_with_options(source: Arc<dyn CatalogSource>, options: CheckoutOptions) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            source,
            options,
            inner: Arc::new(Mutex::new(CheckoutState {
                phase: CheckoutPhase::Loading,
                load_in_flight: false,
                cart: Cart::default().with_tax_rule(options.tax_rule),
                loaded_at: None,
            })),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<CheckoutEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> CheckoutSnapshot {
        self.inner.lock().await.snapshot()
    }

    /// Fetches the catalog and replaces the cart with fresh zero-quantity rows.
    ///
    /// Allowed while nothing has been loaded yet, or to retry after an empty
    /// or failed load. A stalled source is cut off after the configured
    /// timeout and leaves the screen in [`CheckoutPhase::Failed`].
    ///
    /// The fetch runs on its own task, so dropping the returned future does
    /// not strand the screen in [`CheckoutPhase::Loading`]: the task still
    /// records its outcome and a later call can retry.
    pub async fn load(&self) -> Result<CheckoutSnapshot, CatalogLoadError> {
        {
            let mut guard = self.inner.lock().await;
            if guard.load_in_flight {
                return Err(CatalogLoadError::InFlight);
            }
            if guard.phase == CheckoutPhase::Ready {
                return Err(CatalogLoadError::AlreadyLoaded);
            }
            guard.load_in_flight = true;
            guard.phase = CheckoutPhase::Loading;
            guard.publish(&self.events);
        }

        let task = tokio::spawn(run_load(
            Arc::clone(&self.source),
            self.options,
            Arc::clone(&self.inner),
            self.events.clone(),
        ));

        match task.await {
            Ok(outcome) => outcome,
            Err(join_error) => {
                let err = CatalogLoadError::Source {
                    source_name: self.source.describe(),
                    source: anyhow::Error::new(join_error),
                };
                warn!(error = %err, "catalog load task aborted");
                let mut guard = self.inner.lock().await;
                guard.load_in_flight = false;
                guard.phase = CheckoutPhase::Failed(err.to_string());
                guard.publish(&self.events);
                Err(err)
            }
        }
    }

    pub async fn increase(&self, id: ItemId) -> CheckoutSnapshot {
        self.apply(Direction::Increase, id).await
    }

    pub async fn decrease(&self, id: ItemId) -> CheckoutSnapshot {
        self.apply(Direction::Decrease, id).await
    }

    /// Untyped entry point for UI callbacks. An unknown direction is reported
    /// to subscribers and returned, and the cart is left as it was.
    pub async fn adjust(&self, direction: &str, id: ItemId) -> Result<CheckoutSnapshot, CartError> {
        let mut guard = self.inner.lock().await;
        let adjusted = guard.cart.adjust_named(direction, id);
        match adjusted {
            Ok(next) => Ok(self.commit(&mut guard, next)),
            Err(error) => {
                let _ = self.events.send(CheckoutEvent::AdjustmentRejected {
                    item_id: id,
                    error: error.clone(),
                });
                Err(error)
            }
        }
    }

    async fn apply(&self, direction: Direction, id: ItemId) -> CheckoutSnapshot {
        let mut guard = self.inner.lock().await;
        let next = guard.cart.adjust(direction, id);
        self.commit(&mut guard, next)
    }

    fn commit(&self, guard: &mut CheckoutState, next: Cart) -> CheckoutSnapshot {
        if next.revision() != guard.cart.revision() {
            guard.cart = next;
            guard.publish(&self.events);
        }
        guard.snapshot()
    }
}

async fn run_load(
    source: Arc<dyn CatalogSource>,
    options: CheckoutOptions,
    inner: Arc<Mutex<CheckoutState>>,
    events: broadcast::Sender<CheckoutEvent>,
) -> Result<CheckoutSnapshot, CatalogLoadError> {
    let source_name = source.describe();
    info!(source = %source_name, "loading catalog");
    let fetched = tokio::time::timeout(options.load_timeout, source.fetch_items()).await;

    let mut guard = inner.lock().await;
    guard.load_in_flight = false;
    let outcome = match fetched {
        Err(_) => Err(CatalogLoadError::TimedOut {
            source_name: source_name.clone(),
            timeout: options.load_timeout,
        }),
        Ok(Err(error)) => Err(CatalogLoadError::Source {
            source_name: source_name.clone(),
            source: error,
        }),
        Ok(Ok(items)) => Ok(items.unwrap_or_default()),
    };

    match outcome {
        Ok(items) if items.is_empty() => {
            warn!(source = %source_name, "catalog source returned no items");
            guard.phase = CheckoutPhase::Empty;
            guard.cart = Cart::default().with_tax_rule(options.tax_rule);
            guard.loaded_at = Some(Utc::now());
        }
        Ok(items) => {
            info!(items = items.len(), "catalog loaded");
            guard.phase = CheckoutPhase::Ready;
            guard.cart = Cart::new(items).with_tax_rule(options.tax_rule);
            guard.loaded_at = Some(Utc::now());
        }
        Err(err) => {
            warn!(error = %err, "catalog load failed");
            guard.phase = CheckoutPhase::Failed(err.to_string());
            guard.publish(&events);
            return Err(err);
        }
    }

    guard.publish(&events);
    Ok(guard.snapshot())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
