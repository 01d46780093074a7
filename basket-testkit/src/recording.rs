//! Recording store double.
//!
//! Wraps a `MemoryStore`, logs every call in order, and can be told to fail
//! or stall individual operations.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use basket_domain::CustomerBasket;
use basket_store::{BasketRepository, MemoryStore, StoreError};

/// Store operation as seen by the double.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// `BasketRepository::get`
    Get,
    /// `BasketRepository::update`
    Update,
    /// `BasketRepository::delete`
    Delete,
}

#[derive(Debug, Clone)]
enum Failure {
    Connection(String),
    NotFound,
}

type ReadHook = fn(CustomerBasket) -> CustomerBasket;

/// `BasketRepository` double that records calls.
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    calls: Mutex<Vec<StoreOperation>>,
    failures: Mutex<HashMap<StoreOperation, Failure>>,
    hold_writes: AtomicBool,
    read_hook: Option<ReadHook>,
}

impl RecordingStore {
    /// Create an empty recording store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewrite every basket returned by `get`, simulating a backend that
    /// normalizes what it stores.
    pub fn with_read_hook(mut self, hook: ReadHook) -> Self {
        self.read_hook = Some(hook);
        self
    }

    /// Make `op` fail with a connection error carrying `message`.
    pub fn fail(&self, op: StoreOperation, message: impl Into<String>) {
        self.failures()
            .insert(op, Failure::Connection(message.into()));
    }

    /// Make `get` report every key as absent, even ones just written.
    pub fn fail_get_with_not_found(&self) {
        self.failures().insert(StoreOperation::Get, Failure::NotFound);
    }

    /// Clear injected failures.
    pub fn heal(&self) {
        self.failures().clear();
    }

    /// Make `update` park forever after being recorded, before writing.
    pub fn hold_writes(&self) {
        self.hold_writes.store(true, Ordering::SeqCst);
    }

    /// Calls seen so far, in order.
    pub fn calls(&self) -> Vec<StoreOperation> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of calls of one kind.
    pub fn call_count(&self, op: StoreOperation) -> usize {
        self.calls().into_iter().filter(|c| *c == op).count()
    }

    /// True when no call reached the store.
    pub fn untouched(&self) -> bool {
        self.calls().is_empty()
    }

    /// Number of stored baskets.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn failures(&self) -> std::sync::MutexGuard<'_, HashMap<StoreOperation, Failure>> {
        self.failures.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, op: StoreOperation, customer_id: &str) -> Result<(), StoreError> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).push(op);

        match self.failures().get(&op) {
            Some(Failure::Connection(message)) => Err(StoreError::Connection(message.clone())),
            Some(Failure::NotFound) => Err(StoreError::not_found(customer_id)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BasketRepository for RecordingStore {
    async fn get(&self, customer_id: &str) -> Result<CustomerBasket, StoreError> {
        self.record(StoreOperation::Get, customer_id)?;
        let basket = self.inner.get(customer_id).await?;
        Ok(match self.read_hook {
            Some(hook) => hook(basket),
            None => basket,
        })
    }

    async fn update(&self, basket: &CustomerBasket) -> Result<(), StoreError> {
        self.record(StoreOperation::Update, &basket.customer_id)?;
        if self.hold_writes.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        self.inner.update(basket).await
    }

    async fn delete(&self, customer_id: &str) -> Result<(), StoreError> {
        self.record(StoreOperation::Delete, customer_id)?;
        self.inner.delete(customer_id).await
    }
}
