//! # Core Session Framework
//!
//! This module defines the generic building blocks every screen is made of.
//!
//! ## Key Types
//!
//! - [`SessionEntity`]: The trait that all record kinds must implement.
//! - [`ResourceSession`]: The generic state machine that owns one screen's state.
//! - [`SessionClient`]: The handle the presentation layer drives it through.
//! - [`SessionSnapshot`]: What the presentation layer renders.
//! - [`SessionError`]: The session task is gone.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::{self, JoinSet};
use tracing::{debug, error, info, warn};

use super::confirm::{ConfirmationService, Notice, Prompt};
use super::transport::{Transport, TransportError};
use crate::model::FieldValue;

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// User-facing texts for one entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    pub delete_title: &'static str,
    pub delete_message: &'static str,
    pub created: &'static str,
    pub updated: &'static str,
    pub deleted: &'static str,
    pub load_failed: &'static str,
    pub create_failed: &'static str,
    pub update_failed: &'static str,
    pub delete_failed: &'static str,
}

/// Trait that any record kind must implement to be managed by a [`ResourceSession`].
///
/// # Architecture Note
/// The three screens differ only in their record shape, endpoint and wording.
/// Everything that differs lives behind this trait, so the state machine in
/// [`ResourceSession`] is written once and reused for products, employees and
/// customers.
///
/// `Default` is the kind's blank form: every field present, set to its zero value.
pub trait SessionEntity:
    Clone + Default + PartialEq + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Enum naming the editable fields (e.g. `ProductField`).
    type Field: Copy + Debug + Send + Sync + 'static;

    /// Collection name; also the path segment under the API base URL.
    const KIND: &'static str;

    /// Wording for prompts and notices.
    const LABELS: Labels;

    /// Server-assigned identifier, if the record has been persisted.
    fn id(&self) -> Option<&str>;

    fn set_id(&mut self, id: String);

    /// Writes one form value into the matching field.
    fn set_field(&mut self, field: Self::Field, value: FieldValue);
}

/// Tunables shared by every session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Capacity of the intent channel.
    pub buffer_size: usize,
    /// How long create/update success notices stay up.
    pub notice_dismiss: Duration,
    /// How long delete success notices stay up.
    pub delete_notice_dismiss: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            buffer_size: 32,
            notice_dismiss: Duration::from_millis(1300),
            delete_notice_dismiss: Duration::from_millis(1200),
        }
    }
}

// =============================================================================
// 2. STATE, MESSAGES & ERRORS
// =============================================================================

/// Whether the form creates a new record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    IdleCreate,
    Editing,
}

/// Everything the presentation layer needs to render a screen.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot<T> {
    /// Last server-confirmed list, in server order.
    pub records: Vec<T>,
    /// The create/edit form buffer.
    pub form: T,
    /// The record being edited. Never aliases an entry of `records`.
    pub edit_target: Option<T>,
    /// True while a list, create or update request is outstanding.
    pub loading: bool,
    /// Every in-flight operation, including deletes awaiting confirmation.
    pub outstanding: usize,
}

impl<T: Default> Default for SessionSnapshot<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            form: T::default(),
            edit_target: None,
            loading: false,
            outstanding: 0,
        }
    }
}

impl<T> SessionSnapshot<T> {
    pub fn mode(&self) -> SessionMode {
        if self.edit_target.is_some() {
            SessionMode::Editing
        } else {
            SessionMode::IdleCreate
        }
    }
}

/// Errors raised by [`SessionClient`] when the session task is no longer running.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum SessionError {
    #[error("Session closed")]
    SessionClosed,
    #[error("Session dropped the request")]
    SessionDropped,
}

/// Acknowledgement sent once an intent has been applied and published.
pub type Ack = oneshot::Sender<()>;

/// User intents forwarded by the presentation layer.
///
/// Each carries an [`Ack`] so the caller can await the moment the intent has
/// been applied (not the moment any resulting request completes).
#[derive(Debug)]
pub enum SessionRequest<T: SessionEntity> {
    Load {
        respond_to: Ack,
    },
    FieldChanged {
        field: T::Field,
        value: FieldValue,
        respond_to: Ack,
    },
    SelectForEdit {
        record: T,
        respond_to: Ack,
    },
    Submit {
        respond_to: Ack,
    },
    CancelEdit {
        respond_to: Ack,
    },
    RequestDelete {
        id: String,
        respond_to: Ack,
    },
}

/// Result of an operation task, fed back into the session loop.
#[derive(Debug)]
enum Completion<T> {
    Loaded(Result<Vec<T>, TransportError>),
    Created(Result<T, TransportError>),
    Updated(Result<T, TransportError>),
    Deleted {
        id: String,
        result: Result<(), TransportError>,
    },
    Declined {
        id: String,
    },
}

/// What an in-flight task is doing, kept so a task that dies without a
/// [`Completion`] can still be accounted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Load,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// List, create and update hold the loading flag; delete does not.
    fn holds_loading(self) -> bool {
        !matches!(self, Operation::Delete)
    }

    fn failure_message(self, labels: &Labels) -> &'static str {
        match self {
            Operation::Load => labels.load_failed,
            Operation::Create => labels.create_failed,
            Operation::Update => labels.update_failed,
            Operation::Delete => labels.delete_failed,
        }
    }
}

// =============================================================================
// 3. THE GENERIC SESSION
// =============================================================================

/// The state machine behind one screen.
///
/// # Architecture Note
/// This struct is the "server" half of a screen. It owns the records, the form
/// buffer and the edit target, and it is the only code that ever mutates them.
///
/// **Concurrency Model**:
/// The session runs in its own Tokio task and handles one event at a time:
/// either a user intent from a [`SessionClient`] or the completion of a
/// transport call it started earlier. Transport calls run as separate tasks in
/// a [`JoinSet`], so a slow request never blocks new intents, and two requests
/// may be outstanding at once. Whichever completes last wins.
///
/// After every event the session publishes a fresh [`SessionSnapshot`] on a
/// `watch` channel before looking at the next one.
pub struct ResourceSession<T: SessionEntity> {
    receiver: mpsc::Receiver<SessionRequest<T>>,
    transport: Arc<dyn Transport<T>>,
    confirmer: Arc<dyn ConfirmationService>,
    config: SessionConfig,
    state: watch::Sender<SessionSnapshot<T>>,
    records: Vec<T>,
    form: T,
    edit_target: Option<T>,
    /// Outstanding list/create/update requests.
    loading_requests: usize,
    tasks: JoinSet<Completion<T>>,
    in_flight: HashMap<task::Id, Operation>,
}

impl<T: SessionEntity> ResourceSession<T> {
    pub fn new(
        transport: impl Transport<T> + 'static,
        confirmer: Arc<dyn ConfirmationService>,
        config: SessionConfig,
    ) -> (Self, SessionClient<T>) {
        let (sender, receiver) = mpsc::channel(config.buffer_size);
        // `run` starts with a full load; observers see it as pending from the start.
        let (state, state_rx) = watch::channel(SessionSnapshot {
            loading: true,
            outstanding: 1,
            ..SessionSnapshot::default()
        });
        let session = Self {
            receiver,
            transport: Arc::new(transport),
            confirmer,
            config,
            state,
            records: Vec::new(),
            form: T::default(),
            edit_target: None,
            loading_requests: 0,
            tasks: JoinSet::new(),
            in_flight: HashMap::new(),
        };
        let client = SessionClient::new(sender, state_rx);
        (session, client)
    }

    /// Runs the session until every [`SessionClient`] has been dropped.
    ///
    /// The initial full load is issued before the first intent is read.
    /// Requests still in flight when the loop ends are aborted.
    pub async fn run(mut self) {
        let entity_type = T::KIND;
        info!(entity_type, "Session started");

        self.load_all();
        self.publish();

        loop {
            tokio::select! {
                request = self.receiver.recv() => match request {
                    Some(request) => self.handle_request(request),
                    None => break,
                },
                Some(joined) = self.tasks.join_next_with_id() => {
                    match joined {
                        Ok((id, completion)) => {
                            self.finish(id);
                            self.complete(completion);
                        }
                        Err(e) if e.is_cancelled() => {
                            self.finish(e.id());
                        }
                        Err(e) => {
                            error!(entity_type, error = %e, "Operation task failed");
                            if let Some(operation) = self.finish(e.id()) {
                                self.confirmer
                                    .notify(Notice::error(operation.failure_message(&T::LABELS)));
                            }
                        }
                    }
                    self.publish();
                }
            }
        }

        self.tasks.abort_all();
        info!(entity_type, size = self.records.len(), "Shutdown");
    }

    fn handle_request(&mut self, request: SessionRequest<T>) {
        let entity_type = T::KIND;
        let respond_to = match request {
            SessionRequest::Load { respond_to } => {
                debug!(entity_type, "Load");
                self.load_all();
                respond_to
            }
            SessionRequest::FieldChanged {
                field,
                value,
                respond_to,
            } => {
                debug!(entity_type, ?field, ?value, "FieldChanged");
                self.form.set_field(field, value);
                respond_to
            }
            SessionRequest::SelectForEdit { record, respond_to } => {
                debug!(entity_type, id = ?record.id(), "SelectForEdit");
                self.form = record.clone();
                self.edit_target = Some(record);
                respond_to
            }
            SessionRequest::Submit { respond_to } => {
                self.submit();
                respond_to
            }
            SessionRequest::CancelEdit { respond_to } => {
                debug!(entity_type, "CancelEdit");
                self.cancel_edit();
                respond_to
            }
            SessionRequest::RequestDelete { id, respond_to } => {
                self.request_delete(id);
                respond_to
            }
        };
        self.publish();
        let _ = respond_to.send(());
    }

    // --- Operations ---

    fn spawn(
        &mut self,
        operation: Operation,
        work: impl Future<Output = Completion<T>> + Send + 'static,
    ) {
        if operation.holds_loading() {
            self.loading_requests += 1;
        }
        let handle = self.tasks.spawn(work);
        self.in_flight.insert(handle.id(), operation);
    }

    /// Forgets a joined task, releasing its hold on the loading flag.
    fn finish(&mut self, id: task::Id) -> Option<Operation> {
        let operation = self.in_flight.remove(&id)?;
        if operation.holds_loading() {
            self.loading_requests = self.loading_requests.saturating_sub(1);
        }
        Some(operation)
    }

    fn load_all(&mut self) {
        let transport = self.transport.clone();
        self.spawn(Operation::Load, async move {
            Completion::Loaded(transport.list().await)
        });
    }

    fn submit(&mut self) {
        let entity_type = T::KIND;
        let draft = self.form.clone();
        let transport = self.transport.clone();

        let target_id = self
            .edit_target
            .as_ref()
            .map(|target| target.id().map(str::to_string));

        match target_id {
            None => {
                debug!(entity_type, ?draft, "Submit create");
                self.spawn(Operation::Create, async move {
                    Completion::Created(transport.create(&draft).await)
                });
            }
            Some(Some(id)) => {
                debug!(entity_type, %id, ?draft, "Submit update");
                self.spawn(Operation::Update, async move {
                    Completion::Updated(transport.update(&id, &draft).await)
                });
            }
            Some(None) => {
                // Only records from the server can be selected; an id-less
                // edit target has nothing to address on the remote side.
                warn!(entity_type, "Edit target has no id");
                self.confirmer
                    .notify(Notice::error(T::LABELS.update_failed));
            }
        }
    }

    fn request_delete(&mut self, id: String) {
        debug!(entity_type = T::KIND, %id, "RequestDelete");
        let prompt = Prompt::destructive(T::LABELS.delete_title, T::LABELS.delete_message);
        let transport = self.transport.clone();
        let confirmer = self.confirmer.clone();

        self.spawn(Operation::Delete, async move {
            if !confirmer.confirm(prompt).await.confirmed {
                return Completion::Declined { id };
            }
            let result = transport.delete(&id).await;
            Completion::Deleted { id, result }
        });
    }

    fn cancel_edit(&mut self) {
        self.edit_target = None;
        self.form = T::default();
    }

    // --- Completions ---

    fn complete(&mut self, completion: Completion<T>) {
        let entity_type = T::KIND;
        let labels = T::LABELS;

        match completion {
            Completion::Loaded(Ok(records)) => {
                info!(entity_type, size = records.len(), "Loaded");
                self.records = records;
            }
            Completion::Loaded(Err(e)) => {
                warn!(entity_type, error = %e, "Load failed");
                self.confirmer.notify(Notice::error(labels.load_failed));
            }
            Completion::Created(Ok(record)) => {
                self.insert_confirmed(record);
                info!(entity_type, size = self.records.len(), "Created");
                self.confirmer.notify(Notice::success(
                    "Created",
                    labels.created,
                    self.config.notice_dismiss,
                ));
                self.cancel_edit();
            }
            Completion::Created(Err(e)) => {
                warn!(entity_type, error = %e, "Create failed");
                self.confirmer.notify(Notice::error(labels.create_failed));
            }
            Completion::Updated(Ok(record)) => {
                let position = record.id().and_then(|id| self.position_of(id));
                match position {
                    Some(index) => {
                        info!(entity_type, id = ?record.id(), "Updated");
                        self.records[index] = record;
                    }
                    None => warn!(entity_type, id = ?record.id(), "Updated record not in list"),
                }
                self.confirmer.notify(Notice::success(
                    "Updated",
                    labels.updated,
                    self.config.notice_dismiss,
                ));
                self.cancel_edit();
            }
            Completion::Updated(Err(e)) => {
                warn!(entity_type, error = %e, "Update failed");
                self.confirmer.notify(Notice::error(labels.update_failed));
            }
            Completion::Deleted { id, result: Ok(()) } => {
                self.records.retain(|record| record.id() != Some(id.as_str()));
                info!(entity_type, %id, size = self.records.len(), "Deleted");
                self.confirmer.notify(Notice::success(
                    "Deleted",
                    labels.deleted,
                    self.config.delete_notice_dismiss,
                ));
            }
            Completion::Deleted { id, result: Err(e) } => {
                warn!(entity_type, %id, error = %e, "Delete failed");
                self.confirmer.notify(Notice::error(labels.delete_failed));
            }
            Completion::Declined { id } => {
                debug!(entity_type, %id, "Delete declined");
            }
        }
    }

    /// Appends a record the server just created, keeping ids unique.
    fn insert_confirmed(&mut self, record: T) {
        match record.id().and_then(|id| self.position_of(id)) {
            Some(index) => {
                warn!(entity_type = T::KIND, id = ?record.id(), "Created id already listed");
                self.records[index] = record;
            }
            None => self.records.push(record),
        }
    }

    fn position_of(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.id() == Some(id))
    }

    fn publish(&self) {
        self.state.send_replace(SessionSnapshot {
            records: self.records.clone(),
            form: self.form.clone(),
            edit_target: self.edit_target.clone(),
            loading: self.loading_requests > 0,
            outstanding: self.tasks.len(),
        });
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

/// Handle used by the presentation layer to drive a [`ResourceSession`].
///
/// Every intent method returns once the session has applied the intent and
/// published the resulting snapshot.
pub struct SessionClient<T: SessionEntity> {
    sender: mpsc::Sender<SessionRequest<T>>,
    state: watch::Receiver<SessionSnapshot<T>>,
}

impl<T: SessionEntity> Clone for SessionClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            state: self.state.clone(),
        }
    }
}

impl<T: SessionEntity> SessionClient<T> {
    pub fn new(
        sender: mpsc::Sender<SessionRequest<T>>,
        state: watch::Receiver<SessionSnapshot<T>>,
    ) -> Self {
        Self { sender, state }
    }

    async fn send(
        &self,
        build: impl FnOnce(Ack) -> SessionRequest<T> + Send,
    ) -> Result<(), SessionError> {
        let (respond_to, applied) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| SessionError::SessionClosed)?;
        applied.await.map_err(|_| SessionError::SessionDropped)
    }

    /// Reloads the full list from the server.
    pub async fn load(&self) -> Result<(), SessionError> {
        self.send(|respond_to| SessionRequest::Load { respond_to })
            .await
    }

    pub async fn field_changed(
        &self,
        field: T::Field,
        value: impl Into<FieldValue>,
    ) -> Result<(), SessionError> {
        let value = value.into();
        self.send(|respond_to| SessionRequest::FieldChanged {
            field,
            value,
            respond_to,
        })
        .await
    }

    /// Switches to edit mode with a copy of `record` in the form.
    pub async fn select_for_edit(&self, record: T) -> Result<(), SessionError> {
        self.send(|respond_to| SessionRequest::SelectForEdit { record, respond_to })
            .await
    }

    /// Creates or updates from the form, depending on the mode.
    pub async fn submit(&self) -> Result<(), SessionError> {
        self.send(|respond_to| SessionRequest::Submit { respond_to })
            .await
    }

    pub async fn cancel_edit(&self) -> Result<(), SessionError> {
        self.send(|respond_to| SessionRequest::CancelEdit { respond_to })
            .await
    }

    /// Asks for confirmation, then deletes. Returns before the user answers.
    pub async fn request_delete(&self, id: impl Into<String>) -> Result<(), SessionError> {
        let id = id.into();
        self.send(|respond_to| SessionRequest::RequestDelete { id, respond_to })
            .await
    }

    /// The latest published state.
    pub fn snapshot(&self) -> SessionSnapshot<T> {
        self.state.borrow().clone()
    }

    /// A receiver that wakes on every published state.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot<T>> {
        self.state.clone()
    }

    /// Waits until the published state satisfies `predicate`.
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&SessionSnapshot<T>) -> bool,
    ) -> Result<SessionSnapshot<T>, SessionError> {
        let mut state = self.state.clone();
        let snapshot = state
            .wait_for(predicate)
            .await
            .map_err(|_| SessionError::SessionClosed)?;
        Ok(snapshot.clone())
    }

    /// Waits until no operation is in flight.
    pub async fn settled(&self) -> Result<SessionSnapshot<T>, SessionError> {
        self.wait_for(|snapshot| snapshot.outstanding == 0).await
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================
