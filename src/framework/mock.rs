//! # Mock Framework
//!
//! Utilities for testing sessions without a remote store or a user.
//!
//! - [`MockTransport`] answers transport calls from a queue of expectations
//!   (fluent API, [`MockTransport::verify`] at the end).
//! - [`create_mock_transport`] hands the test the receiving end of a
//!   [`ChannelTransport`], so the test decides *when* each request completes.
//!   Use it to observe state while a request is still outstanding.
//! - [`ScriptedConfirmer`] answers prompts from a script and records every
//!   prompt and notice.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{mpsc, Notify};

use crate::framework::confirm::{ConfirmationService, Decision, Notice, Prompt, Severity};
use crate::framework::transport::{
    ChannelTransport, Responder, Transport, TransportError, TransportRequest,
};
use crate::framework::SessionEntity;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// Represents an expected call to the mock transport.
enum Expectation<T> {
    List {
        response: Result<Vec<T>, TransportError>,
    },
    Get {
        id: String,
        response: Result<T, TransportError>,
    },
    Create {
        response: Result<T, TransportError>,
    },
    Update {
        id: String,
        response: Result<T, TransportError>,
    },
    Delete {
        id: String,
        response: Result<(), TransportError>,
    },
}

impl<T> Expectation<T> {
    fn describe(&self) -> String {
        match self {
            Expectation::List { .. } => "list".to_string(),
            Expectation::Get { id, .. } => format!("get({id})"),
            Expectation::Create { .. } => "create".to_string(),
            Expectation::Update { id, .. } => format!("update({id})"),
            Expectation::Delete { id, .. } => format!("delete({id})"),
        }
    }
}

type Expectations<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A transport with expectation tracking for fluent testing.
///
/// Calls must arrive in the order the expectations were registered; anything
/// else panics, which fails the test.
///
/// # Example
/// ```ignore
/// let mock = MockTransport::<Product>::new();
/// mock.expect_list().return_ok(vec![]);
/// mock.expect_create().return_ok(saved);
///
/// let (session, client) = ResourceSession::new(mock.clone(), confirmer, config);
/// // drive the session...
/// mock.verify(); // Ensures all expectations were met
/// ```
pub struct MockTransport<T> {
    expectations: Expectations<T>,
    received: Arc<Mutex<Vec<String>>>,
}

impl<T> Clone for MockTransport<T> {
    fn clone(&self) -> Self {
        Self {
            expectations: self.expectations.clone(),
            received: self.received.clone(),
        }
    }
}

impl<T: SessionEntity> Default for MockTransport<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SessionEntity> MockTransport<T> {
    /// Creates a new mock with no expectations.
    pub fn new() -> Self {
        Self {
            expectations: Arc::new(Mutex::new(VecDeque::new())),
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Expects a `list` call.
    pub fn expect_list(&self) -> ExpectationBuilder<T, Vec<T>> {
        ExpectationBuilder::new(self.expectations.clone(), |response| {
            Expectation::List { response }
        })
    }

    /// Expects a `get` call.
    pub fn expect_get(&self, id: impl Into<String>) -> ExpectationBuilder<T, T> {
        let id = id.into();
        ExpectationBuilder::new(self.expectations.clone(), move |response| {
            Expectation::Get { id, response }
        })
    }

    /// Expects a `create` call.
    pub fn expect_create(&self) -> ExpectationBuilder<T, T> {
        ExpectationBuilder::new(self.expectations.clone(), |response| {
            Expectation::Create { response }
        })
    }

    /// Expects an `update` call for `id`.
    pub fn expect_update(&self, id: impl Into<String>) -> ExpectationBuilder<T, T> {
        let id = id.into();
        ExpectationBuilder::new(self.expectations.clone(), move |response| {
            Expectation::Update { id, response }
        })
    }

    /// Expects a `delete` call for `id`.
    pub fn expect_delete(&self, id: impl Into<String>) -> ExpectationBuilder<T, ()> {
        let id = id.into();
        ExpectationBuilder::new(self.expectations.clone(), move |response| {
            Expectation::Delete { id, response }
        })
    }

    /// Calls received so far, e.g. `["list", "create", "delete(c3)"]`.
    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            let remaining: Vec<String> = exps.iter().map(Expectation::describe).collect();
            panic!("Not all expectations were met. Remaining: {:?}", remaining);
        }
    }

    fn next(&self, call: String) -> Expectation<T> {
        self.received.lock().unwrap().push(call.clone());
        let expectation = self.expectations.lock().unwrap().pop_front();
        match expectation {
            Some(expectation) => expectation,
            None => panic!("Unexpected transport call: {call}"),
        }
    }
}

#[async_trait]
impl<T: SessionEntity> Transport<T> for MockTransport<T> {
    async fn list(&self) -> Result<Vec<T>, TransportError> {
        match self.next("list".to_string()) {
            Expectation::List { response } => response,
            other => panic!("Expected {}, got list", other.describe()),
        }
    }

    async fn get(&self, id: &str) -> Result<T, TransportError> {
        match self.next(format!("get({id})")) {
            Expectation::Get { id: expected, response } if expected == id => response,
            other => panic!("Expected {}, got get({id})", other.describe()),
        }
    }

    async fn create(&self, _draft: &T) -> Result<T, TransportError> {
        match self.next("create".to_string()) {
            Expectation::Create { response } => response,
            other => panic!("Expected {}, got create", other.describe()),
        }
    }

    async fn update(&self, id: &str, _draft: &T) -> Result<T, TransportError> {
        match self.next(format!("update({id})")) {
            Expectation::Update { id: expected, response } if expected == id => response,
            other => panic!("Expected {}, got update({id})", other.describe()),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), TransportError> {
        match self.next(format!("delete({id})")) {
            Expectation::Delete { id: expected, response } if expected == id => response,
            other => panic!("Expected {}, got delete({id})", other.describe()),
        }
    }
}

/// Builder returned by the `expect_*` methods of [`MockTransport`].
pub struct ExpectationBuilder<T, R> {
    expectations: Expectations<T>,
    build: Box<dyn FnOnce(Result<R, TransportError>) -> Expectation<T> + Send>,
}

impl<T, R> ExpectationBuilder<T, R> {
    fn new(
        expectations: Expectations<T>,
        build: impl FnOnce(Result<R, TransportError>) -> Expectation<T> + Send + 'static,
    ) -> Self {
        Self {
            expectations,
            build: Box::new(build),
        }
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        let expectation = (self.build)(Ok(value));
        self.expectations.lock().unwrap().push_back(expectation);
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: TransportError) {
        let expectation = (self.build)(Err(error));
        self.expectations.lock().unwrap().push_back(expectation);
    }
}

// =============================================================================
// CHANNEL HELPERS
// =============================================================================

/// Creates a channel-backed transport and the receiver for asserting requests.
///
/// # Testing Strategy
/// The session under test sends every transport call down this channel and
/// waits. The test picks each request off the receiver, inspects it, and
/// answers through its responder whenever it likes. Between the two, the
/// request is outstanding, which is how tests observe the `loading` span.
pub fn create_mock_transport<T: SessionEntity>(
    buffer_size: usize,
) -> (ChannelTransport<T>, mpsc::Receiver<TransportRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ChannelTransport::new(sender), receiver)
}

/// Helper to verify that the next message is a List request
pub async fn expect_list<T: SessionEntity>(
    receiver: &mut mpsc::Receiver<TransportRequest<T>>,
) -> Option<Responder<Vec<T>>> {
    match receiver.recv().await {
        Some(TransportRequest::List { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: SessionEntity>(
    receiver: &mut mpsc::Receiver<TransportRequest<T>>,
) -> Option<(T, Responder<T>)> {
    match receiver.recv().await {
        Some(TransportRequest::Create { draft, respond_to }) => Some((draft, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Update request
pub async fn expect_update<T: SessionEntity>(
    receiver: &mut mpsc::Receiver<TransportRequest<T>>,
) -> Option<(String, T, Responder<T>)> {
    match receiver.recv().await {
        Some(TransportRequest::Update {
            id,
            draft,
            respond_to,
        }) => Some((id, draft, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Delete request
pub async fn expect_delete<T: SessionEntity>(
    receiver: &mut mpsc::Receiver<TransportRequest<T>>,
) -> Option<(String, Responder<()>)> {
    match receiver.recv().await {
        Some(TransportRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

// =============================================================================
// CONFIRMATION
// =============================================================================

#[derive(Default)]
struct Script {
    answers: VecDeque<bool>,
    prompts: Vec<Prompt>,
    notices: Vec<Notice>,
}

/// A [`ConfirmationService`] that answers from a script and records everything.
///
/// Prompts beyond the script are declined.
#[derive(Clone, Default)]
pub struct ScriptedConfirmer {
    script: Arc<Mutex<Script>>,
    noticed: Arc<Notify>,
}

impl ScriptedConfirmer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the answers for the next prompts, in order.
    pub fn answering(answers: impl IntoIterator<Item = bool>) -> Self {
        let confirmer = Self::new();
        confirmer.script.lock().unwrap().answers.extend(answers);
        confirmer
    }

    pub fn push_answer(&self, confirmed: bool) {
        self.script.lock().unwrap().answers.push_back(confirmed);
    }

    pub fn prompts(&self) -> Vec<Prompt> {
        self.script.lock().unwrap().prompts.clone()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.script.lock().unwrap().notices.clone()
    }

    pub fn errors(&self) -> Vec<Notice> {
        self.notices()
            .into_iter()
            .filter(|notice| notice.severity == Severity::Error)
            .collect()
    }

    /// Waits until at least `count` notices have been raised.
    pub async fn wait_for_notices(&self, count: usize) -> Vec<Notice> {
        loop {
            let notified = self.noticed.notified();
            let notices = self.notices();
            if notices.len() >= count {
                return notices;
            }
            notified.await;
        }
    }
}

#[async_trait]
impl ConfirmationService for ScriptedConfirmer {
    async fn confirm(&self, prompt: Prompt) -> Decision {
        let mut script = self.script.lock().unwrap();
        script.prompts.push(prompt);
        Decision {
            confirmed: script.answers.pop_front().unwrap_or(false),
        }
    }

    fn notify(&self, notice: Notice) {
        self.script.lock().unwrap().notices.push(notice);
        self.noticed.notify_waiters();
    }
}
