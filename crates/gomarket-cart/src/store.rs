//! The cart store: exclusively owned cart state mirrored to a persistence
//! adapter.
//!
//! Every mutation runs in three steps:
//!
//! 1. compute the new state under the state lock,
//! 2. publish it (readers see it as soon as the lock is released),
//! 3. queue the encoded snapshot for the background writer.
//!
//! The snapshot is queued while the lock is still held, so the writer receives
//! snapshots in mutation order and the adapter always ends up holding the
//! latest state. A failed write is logged and reported through the returned
//! [`PendingWrite`]; it never rolls back the in-memory cart.
//!
//! A [`load`](CartStore::load) that lands after mutations have already been
//! queued replaces the in-memory cart and queues the loaded snapshot too, so
//! the adapter never keeps a state that memory has dropped.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use gomarket_storage::{StorageError, Store};
use parking_lot::RwLock;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::cart::{CartItem, CartState, NewCartItem};
use crate::config::CartConfig;
use crate::error::CartError;
use crate::ids::ProductId;

type WriteResult = Result<(), CartError>;

enum WriterMessage {
    Write {
        snapshot: Vec<u8>,
        done: oneshot::Sender<WriteResult>,
    },
    Flush(oneshot::Sender<()>),
}

struct Inner {
    state: RwLock<CartState>,
    adapter: Arc<dyn Store>,
    key: String,
    writer: mpsc::UnboundedSender<WriterMessage>,
    active: AtomicBool,
    /// Set once a mutation has queued a write that a later load would discard.
    written: AtomicBool,
}

/// Handle to the session's cart.
///
/// Cloning is cheap and every clone sees the same cart. After
/// [`close`](Self::close) every operation returns
/// [`CartError::NotInitialized`].
///
/// # Example
///
/// ```rust,ignore
/// let adapter = Arc::new(FileStore::open(".gomarket/store.json"));
/// let cart = CartStore::open(adapter, &CartConfig::default()).await?;
///
/// // Fire and forget...
/// cart.add_to_cart(NewCartItem::new("p1", "Shoe", "https://img/p1.png", 10.0))?;
/// // ...or wait for the adapter.
/// cart.increment(&ProductId::new("p1"))?.persisted().await?;
///
/// assert_eq!(cart.products()?[0].quantity, 2);
/// ```
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<Inner>,
}

impl CartStore {
    /// Create an empty store using the default storage key.
    ///
    /// Must be called from within a Tokio runtime: the persistence writer is
    /// spawned onto it.
    pub fn new(adapter: Arc<dyn Store>) -> Self {
        Self::with_config(adapter, &CartConfig::default())
    }

    /// Create an empty store with explicit settings.
    pub fn with_config(adapter: Arc<dyn Store>, config: &CartConfig) -> Self {
        let (writer, queue) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(
            Arc::clone(&adapter),
            config.storage_key.clone(),
            queue,
        ));

        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(CartState::new()),
                adapter,
                key: config.storage_key.clone(),
                writer,
                active: AtomicBool::new(true),
                written: AtomicBool::new(false),
            }),
        }
    }

    /// Create a store and load the previously persisted cart.
    pub async fn open(adapter: Arc<dyn Store>, config: &CartConfig) -> Result<Self, CartError> {
        let store = Self::with_config(adapter, config);
        store.load().await?;
        Ok(store)
    }

    /// Read the persisted cart and make it the current state.
    ///
    /// Returns the number of lines loaded. An absent value leaves the cart
    /// empty. Until this completes readers observe whatever the cart held
    /// before, normally nothing.
    ///
    /// If mutations were persisted while the read was in flight, the loaded
    /// cart still wins and is written back over them.
    pub async fn load(&self) -> Result<usize, CartError> {
        self.ensure_active()?;

        let stored = self
            .inner
            .adapter
            .get(&self.inner.key)
            .await
            .map_err(CartError::PersistenceRead)?;

        let Some(bytes) = stored else {
            debug!(key = %self.inner.key, "no stored cart");
            return Ok(0);
        };

        let loaded = CartState::decode(&bytes)?;
        let lines = loaded.len();

        let mut state = self.inner.state.write();
        if !self.inner.active.load(Ordering::SeqCst) {
            return Err(CartError::NotInitialized);
        }
        if self.inner.written.swap(false, Ordering::SeqCst) {
            let snapshot = loaded.encode()?;
            let (done, _outcome) = oneshot::channel();
            let _ = self
                .inner
                .writer
                .send(WriterMessage::Write { snapshot, done });
            warn!(key = %self.inner.key, "cart changed before load finished, writing loaded cart back");
        }
        *state = loaded;
        drop(state);

        info!(key = %self.inner.key, lines, "cart loaded");
        Ok(lines)
    }

    /// Add one unit of a product, appending a new line if it is not in the
    /// cart yet.
    ///
    /// Fails with [`CartError::InvalidItem`] for a non-finite price, leaving
    /// the cart unchanged.
    pub fn add_to_cart(&self, item: NewCartItem) -> Result<PendingWrite, CartError> {
        let id = item.id.clone();
        self.mutate(|state| {
            let quantity = state.add(item)?;
            debug!(%id, quantity, "added to cart");
            Ok(Some(quantity))
        })
    }

    /// Raise a line's quantity by one. Unknown ids are ignored.
    pub fn increment(&self, id: &ProductId) -> Result<PendingWrite, CartError> {
        self.mutate(|state| {
            let quantity = state.increment(id);
            debug!(%id, ?quantity, "incremented");
            Ok(quantity)
        })
    }

    /// Lower a line's quantity by one, never below zero and never removing
    /// the line. Unknown ids are ignored.
    pub fn decrement(&self, id: &ProductId) -> Result<PendingWrite, CartError> {
        self.mutate(|state| {
            let quantity = state.decrement(id);
            debug!(%id, ?quantity, "decremented");
            Ok(quantity)
        })
    }

    /// Snapshot of the cart lines in insertion order.
    pub fn products(&self) -> Result<Vec<CartItem>, CartError> {
        self.read(|state| state.items().to_vec())
    }

    /// Get a single line by product id.
    pub fn item(&self, id: &ProductId) -> Result<Option<CartItem>, CartError> {
        self.read(|state| state.get(id).cloned())
    }

    /// Number of distinct lines.
    pub fn len(&self) -> Result<usize, CartError> {
        self.read(CartState::len)
    }

    /// Check if the cart has no lines.
    pub fn is_empty(&self) -> Result<bool, CartError> {
        self.read(CartState::is_empty)
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> Result<u64, CartError> {
        self.read(CartState::item_count)
    }

    /// The storage key this store reads and writes.
    pub fn storage_key(&self) -> &str {
        &self.inner.key
    }

    /// Check if the store still accepts operations.
    pub fn is_active(&self) -> bool {
        self.inner.active.load(Ordering::SeqCst)
    }

    /// End the store's lifecycle.
    ///
    /// Waits for every queued write to reach the adapter, then rejects all
    /// further operations on this handle and its clones.
    pub async fn close(&self) -> Result<(), CartError> {
        let (ack, flushed) = oneshot::channel();
        {
            let _state = self.inner.state.write();
            if !self.inner.active.swap(false, Ordering::SeqCst) {
                return Err(CartError::NotInitialized);
            }
            // Queued behind every write issued before the swap.
            let _ = self.inner.writer.send(WriterMessage::Flush(ack));
        }

        // A closed channel means the writer is gone and there is nothing to wait for.
        let _ = flushed.await;
        info!(key = %self.inner.key, "cart store closed");
        Ok(())
    }

    fn ensure_active(&self) -> Result<(), CartError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(CartError::NotInitialized)
        }
    }

    fn read<T>(&self, f: impl FnOnce(&CartState) -> T) -> Result<T, CartError> {
        let state = self.inner.state.read();
        self.ensure_active()?;
        Ok(f(&state))
    }

    /// Apply `f` and queue the resulting snapshot. `f` returns `None` when it
    /// left the cart untouched, in which case nothing is written. An error
    /// from `f` must leave the state as it was.
    fn mutate<R>(
        &self,
        f: impl FnOnce(&mut CartState) -> Result<Option<R>, CartError>,
    ) -> Result<PendingWrite, CartError> {
        let mut state = self.inner.state.write();
        self.ensure_active()?;

        if f(&mut state)?.is_none() {
            return Ok(PendingWrite::skipped());
        }

        let snapshot = state.encode()?;
        let (done, outcome) = oneshot::channel();
        // A send error drops `done`, which `PendingWrite` reports as a failed write.
        let _ = self
            .inner
            .writer
            .send(WriterMessage::Write { snapshot, done });
        self.inner.written.store(true, Ordering::SeqCst);

        Ok(PendingWrite {
            outcome: Some(outcome),
        })
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.inner.key)
            .field("lines", &self.inner.state.read().len())
            .field("active", &self.is_active())
            .finish()
    }
}

/// Outcome of one queued persistence write.
///
/// Dropping it is fine: the write still happens. Await
/// [`persisted`](Self::persisted) to learn whether the adapter accepted it.
#[derive(Debug)]
pub struct PendingWrite {
    outcome: Option<oneshot::Receiver<WriteResult>>,
}

impl PendingWrite {
    fn skipped() -> Self {
        Self { outcome: None }
    }

    /// Whether the mutation changed the cart and queued a write.
    pub fn is_queued(&self) -> bool {
        self.outcome.is_some()
    }

    /// Wait until the adapter has handled this write.
    pub async fn persisted(self) -> Result<(), CartError> {
        let Some(outcome) = self.outcome else {
            return Ok(());
        };

        outcome.await.unwrap_or_else(|_| {
            Err(CartError::PersistenceWrite(StorageError::Unavailable(
                "cart writer stopped".to_string(),
            )))
        })
    }
}

async fn run_writer(
    adapter: Arc<dyn Store>,
    key: String,
    mut queue: mpsc::UnboundedReceiver<WriterMessage>,
) {
    while let Some(message) = queue.recv().await {
        match message {
            WriterMessage::Write { snapshot, done } => {
                let bytes = snapshot.len();
                let result = adapter
                    .set(&key, snapshot)
                    .await
                    .map_err(CartError::PersistenceWrite);

                match &result {
                    Ok(()) => debug!(%key, bytes, "cart persisted"),
                    Err(e) => warn!(%key, error = %e, "cart write failed, keeping in-memory state"),
                }
                let _ = done.send(result);
            }
            WriterMessage::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
}
