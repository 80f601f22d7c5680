use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::framework::{ChannelTransport, SessionEntity, TransportError, TransportRequest};

/// An in-process remote store for one entity kind.
///
/// # Architecture Note
/// This is the "server" a [`ChannelTransport`] talks to. It owns the records
/// and the receiving end of the channel and processes requests *sequentially*
/// in its own task, so the `records` vector needs no lock.
///
/// It behaves like the REST backend: records keep insertion order, `create`
/// assigns the next id, and `get`/`update`/`delete` of an unknown id fail with
/// [`TransportError::NotFound`].
pub struct MemoryStore<T: SessionEntity> {
    receiver: mpsc::Receiver<TransportRequest<T>>,
    records: Vec<T>,
    next_id_fn: Box<dyn Fn() -> String + Send + Sync>,
}

impl<T: SessionEntity> MemoryStore<T> {
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> String + Send + Sync + 'static,
    ) -> (Self, ChannelTransport<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let store = Self {
            receiver,
            records: Vec::new(),
            next_id_fn: Box::new(next_id_fn),
        };
        (store, ChannelTransport::new(sender))
    }

    /// A store whose ids are `prefix` followed by a counter starting at 1.
    pub fn with_prefix(buffer_size: usize, prefix: &'static str) -> (Self, ChannelTransport<T>) {
        let counter = Arc::new(AtomicU64::new(1));
        Self::new(buffer_size, move || {
            let id = counter.fetch_add(1, Ordering::SeqCst);
            format!("{prefix}{id}")
        })
    }

    /// Pre-populates the store. Records without an id get one assigned.
    pub fn seed(mut self, records: impl IntoIterator<Item = T>) -> Self {
        for mut record in records {
            if record.id().is_none() {
                record.set_id((self.next_id_fn)());
            }
            self.records.push(record);
        }
        self
    }

    fn position_of(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.id() == Some(id))
    }

    /// Serves requests until every transport handle has been dropped.
    pub async fn run(mut self) {
        let entity_type = T::KIND;
        info!(entity_type, size = self.records.len(), "Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                TransportRequest::List { respond_to } => {
                    debug!(entity_type, size = self.records.len(), "List");
                    let _ = respond_to.send(Ok(self.records.clone()));
                }
                TransportRequest::Get { id, respond_to } => {
                    let found = self.position_of(&id).map(|i| self.records[i].clone());
                    debug!(entity_type, %id, found = found.is_some(), "Get");
                    let _ = respond_to.send(found.ok_or(TransportError::NotFound(id)));
                }
                TransportRequest::Create {
                    mut draft,
                    respond_to,
                } => {
                    let id = (self.next_id_fn)();
                    draft.set_id(id.clone());
                    self.records.push(draft.clone());
                    info!(entity_type, %id, size = self.records.len(), "Stored");
                    let _ = respond_to.send(Ok(draft));
                }
                TransportRequest::Update {
                    id,
                    mut draft,
                    respond_to,
                } => match self.position_of(&id) {
                    Some(index) => {
                        draft.set_id(id.clone());
                        self.records[index] = draft.clone();
                        info!(entity_type, %id, "Replaced");
                        let _ = respond_to.send(Ok(draft));
                    }
                    None => {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(TransportError::NotFound(id)));
                    }
                },
                TransportRequest::Delete { id, respond_to } => match self.position_of(&id) {
                    Some(index) => {
                        self.records.remove(index);
                        info!(entity_type, %id, size = self.records.len(), "Removed");
                        let _ = respond_to.send(Ok(()));
                    }
                    None => {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(TransportError::NotFound(id)));
                    }
                },
            }
        }

        info!(entity_type, size = self.records.len(), "Store shutdown");
    }
}
