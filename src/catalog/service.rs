//! Catalog operations.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::catalog::types::{CatalogError, Item, NewItem, Quote};
use crate::trace::{Outcome, Traced, Tracer};

const MAX_NAME_LEN: usize = 64;

type PriceFn = fn((u64, u32)) -> Result<u64, CatalogError>;

/// Shared, cloneable handle to the catalog.
#[derive(Clone)]
pub struct Catalog {
    items: Arc<RwLock<BTreeMap<u64, Item>>>,
    next_id: Arc<AtomicU64>,
    tracer: Tracer,
    total_price: Arc<Traced<PriceFn>>,
    latency: Duration,
}

impl Catalog {
    pub fn new(tracer: Tracer) -> Self {
        let total_price = tracer.wrap("Catalog::total_price", total_price as PriceFn);
        Self {
            items: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            tracer,
            total_price: Arc::new(total_price),
            latency: Duration::ZERO,
        }
    }

    /// Simulated storage latency applied to every read and write.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub async fn get(&self, id: u64) -> Result<Item, CatalogError> {
        let this = self.clone();
        self.tracer
            .trace("Catalog::get", (id,), move |(id,)| {
                Outcome::deferred(async move {
                    this.pause().await;
                    let found = this.items.read().await.get(&id).cloned();
                    found.ok_or(CatalogError::NotFound(id))
                })
            })
            .await
    }

    pub async fn list(&self, limit: Option<usize>) -> Result<Vec<Item>, CatalogError> {
        let this = self.clone();
        self.tracer
            .trace("Catalog::list", (limit,), move |(limit,)| {
                Outcome::deferred(async move {
                    this.pause().await;
                    let items = this.items.read().await;
                    let listed: Vec<Item> = items
                        .values()
                        .take(limit.unwrap_or(usize::MAX))
                        .cloned()
                        .collect();
                    Ok::<_, CatalogError>(listed)
                })
            })
            .await
    }

    pub async fn create(&self, new: NewItem) -> Result<Item, CatalogError> {
        self.validate(&new)?;

        let this = self.clone();
        self.tracer
            .trace("Catalog::create", (new,), move |(new,)| {
                Outcome::deferred(async move {
                    this.pause().await;
                    let id = this.next_id.fetch_add(1, Ordering::Relaxed);
                    let item = Item {
                        id,
                        name: new.name,
                        price_cents: new.price_cents,
                        tags: new.tags,
                    };
                    this.items.write().await.insert(id, item.clone());
                    Ok::<_, CatalogError>(item)
                })
            })
            .await
    }

    /// Check a new item before it is stored.
    pub fn validate(&self, new: &NewItem) -> Result<(), CatalogError> {
        self.tracer
            .trace_sync("Catalog::validate", (new,), |(new,)| check(new))
    }

    pub async fn quote(&self, id: u64, quantity: u32) -> Result<Quote, CatalogError> {
        let item = self.get(id).await?;
        let total_cents = self.total_price.call((item.price_cents, quantity)).await?;
        Ok(Quote {
            item_id: id,
            quantity,
            total_cents,
        })
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn pause(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

fn check(new: &NewItem) -> Result<(), CatalogError> {
    let name = new.name.trim();
    if name.is_empty() {
        return Err(CatalogError::Invalid("name must not be empty".into()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(CatalogError::Invalid(format!(
            "name longer than {MAX_NAME_LEN} bytes"
        )));
    }
    if new.price_cents == 0 {
        return Err(CatalogError::Invalid("price must be positive".into()));
    }
    Ok(())
}

fn total_price((unit_cents, quantity): (u64, u32)) -> Result<u64, CatalogError> {
    unit_cents
        .checked_mul(u64::from(quantity))
        .ok_or(CatalogError::PriceOverflow(quantity))
}
