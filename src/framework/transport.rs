//! # Transport
//!
//! The request/response contract between a [`ResourceSession`](super::ResourceSession)
//! and the remote store. One [`Transport`] exists per entity kind and maps the
//! five resource operations onto whatever carries them (HTTP, an in-process
//! store, a test double).
//!
//! [`ChannelTransport`] is the message-passing implementation: every call becomes
//! a [`TransportRequest`] carrying a one-shot responder, which lets an actor
//! (see [`MemoryStore`](crate::clients::MemoryStore)) or a test own the other end.

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use super::core::SessionEntity;

/// A failed request. Every variant is terminal for that attempt.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum TransportError {
    /// The remote end could not be reached (connect, timeout, reset).
    #[error("Network error: {0}")]
    Network(String),
    /// The remote store has no record with this id.
    #[error("Not found: {0}")]
    NotFound(String),
    /// Any other non-2xx answer.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// A 2xx answer whose body could not be decoded.
    #[error("Malformed response: {0}")]
    Malformed(String),
    /// The base URL cannot address a collection.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// The serving task has gone away.
    #[error("Transport closed")]
    Closed,
}

/// Resource operations for one entity kind.
#[async_trait]
pub trait Transport<T: SessionEntity>: Send + Sync {
    /// Fetches the whole collection in server order.
    async fn list(&self) -> Result<Vec<T>, TransportError>;

    /// Fetches one record.
    async fn get(&self, id: &str) -> Result<T, TransportError>;

    /// Persists a new record; the answer carries the assigned id.
    async fn create(&self, draft: &T) -> Result<T, TransportError>;

    /// Replaces the record stored under `id`.
    async fn update(&self, id: &str, draft: &T) -> Result<T, TransportError>;

    /// Removes the record stored under `id`.
    async fn delete(&self, id: &str) -> Result<(), TransportError>;
}

/// One-shot response channel used by [`TransportRequest`].
pub type Responder<R> = oneshot::Sender<Result<R, TransportError>>;

/// A transport call in message form.
#[derive(Debug)]
pub enum TransportRequest<T: SessionEntity> {
    List {
        respond_to: Responder<Vec<T>>,
    },
    Get {
        id: String,
        respond_to: Responder<T>,
    },
    Create {
        draft: T,
        respond_to: Responder<T>,
    },
    Update {
        id: String,
        draft: T,
        respond_to: Responder<T>,
    },
    Delete {
        id: String,
        respond_to: Responder<()>,
    },
}

/// [`Transport`] that forwards every call over an `mpsc` channel.
pub struct ChannelTransport<T: SessionEntity> {
    sender: mpsc::Sender<TransportRequest<T>>,
}

impl<T: SessionEntity> Clone for ChannelTransport<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: SessionEntity> ChannelTransport<T> {
    pub fn new(sender: mpsc::Sender<TransportRequest<T>>) -> Self {
        Self { sender }
    }

    async fn call<R: Send>(
        &self,
        build: impl FnOnce(Responder<R>) -> TransportRequest<T> + Send,
    ) -> Result<R, TransportError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| TransportError::Closed)?;
        response.await.map_err(|_| TransportError::Closed)?
    }
}

#[async_trait]
impl<T: SessionEntity> Transport<T> for ChannelTransport<T> {
    async fn list(&self) -> Result<Vec<T>, TransportError> {
        self.call(|respond_to| TransportRequest::List { respond_to })
            .await
    }

    async fn get(&self, id: &str) -> Result<T, TransportError> {
        let id = id.to_string();
        self.call(|respond_to| TransportRequest::Get { id, respond_to })
            .await
    }

    async fn create(&self, draft: &T) -> Result<T, TransportError> {
        let draft = draft.clone();
        self.call(|respond_to| TransportRequest::Create { draft, respond_to })
            .await
    }

    async fn update(&self, id: &str, draft: &T) -> Result<T, TransportError> {
        let (id, draft) = (id.to_string(), draft.clone());
        self.call(|respond_to| TransportRequest::Update {
            id,
            draft,
            respond_to,
        })
        .await
    }

    async fn delete(&self, id: &str) -> Result<(), TransportError> {
        let id = id.to_string();
        self.call(|respond_to| TransportRequest::Delete { id, respond_to })
            .await
    }
}
