use std::sync::Arc;
use std::time::Duration;

use resource_session::framework::mock::{
    create_mock_transport, expect_create, expect_delete, expect_list, expect_update,
    MockTransport, ScriptedConfirmer,
};
use resource_session::framework::{
    ResourceSession, SessionClient, SessionConfig, SessionEntity, SessionMode, Severity, Transport,
    TransportError,
};
use resource_session::model::{
    Customer, CustomerField, Employee, EmployeeField, Product, ProductField,
};

fn start<T: SessionEntity>(
    transport: impl Transport<T> + 'static,
    confirmer: &ScriptedConfirmer,
) -> SessionClient<T> {
    let (session, client) = ResourceSession::new(
        transport,
        Arc::new(confirmer.clone()),
        SessionConfig::default(),
    );
    tokio::spawn(session.run());
    client
}

fn with_id<T: SessionEntity>(mut record: T, id: &str) -> T {
    record.set_id(id.to_string());
    record
}

fn ana() -> Employee {
    with_id(
        Employee::new("Ana", "Ruiz", "ana@example.com", "555-0101", "Cashier"),
        "e7",
    )
}

fn customers() -> Vec<Customer> {
    vec![
        with_id(Customer::new("Luis", "Pérez", "luis@example.com", "1", "Calle 1"), "c1"),
        with_id(Customer::new("Marta", "Gil", "marta@example.com", "2", "Calle 2"), "c3"),
    ]
}

#[tokio::test]
async fn test_empty_store_loads_empty_list() {
    let mock = MockTransport::<Product>::new();
    mock.expect_list().return_ok(vec![]);
    let confirmer = ScriptedConfirmer::new();

    let client = start(mock.clone(), &confirmer);
    let snapshot = client.settled().await.unwrap();

    assert!(snapshot.records.is_empty());
    assert!(!snapshot.loading);
    assert_eq!(snapshot.mode(), SessionMode::IdleCreate);
    assert_eq!(snapshot.form, Product::default());
    assert!(confirmer.notices().is_empty());
    mock.verify();
}

#[tokio::test]
async fn test_create_appends_server_record_and_resets_form() {
    let (transport, mut requests) = create_mock_transport::<Product>(10);
    let confirmer = ScriptedConfirmer::new();
    let client = start(transport, &confirmer);

    let existing = with_id(Product::new("Hammer", "", 12.5, 40, "tools"), "p0");
    expect_list(&mut requests)
        .await
        .expect("initial load")
        .send(Ok(vec![existing.clone()]))
        .unwrap();
    client.settled().await.unwrap();

    client.field_changed(ProductField::Name, "Widget").await.unwrap();
    client.field_changed(ProductField::Price, 9.99).await.unwrap();
    client.field_changed(ProductField::Stock, "5").await.unwrap();
    client.field_changed(ProductField::Category, "tools").await.unwrap();
    client.submit().await.unwrap();

    let (draft, responder) = expect_create(&mut requests).await.expect("create request");
    assert_eq!(draft.id, None);
    assert_eq!(draft.name, "Widget");
    assert_eq!(draft.price, 9.99);
    assert_eq!(draft.stock, 5);

    let saved = with_id(draft, "p1");
    responder.send(Ok(saved.clone())).unwrap();
    let snapshot = client.settled().await.unwrap();

    assert_eq!(snapshot.records, vec![existing, saved]);
    assert_eq!(
        snapshot.records.last().unwrap(),
        &Product {
            id: Some("p1".to_string()),
            name: "Widget".to_string(),
            description: String::new(),
            price: 9.99,
            stock: 5,
            category: "tools".to_string(),
        }
    );
    assert_eq!(snapshot.form, Product::default());
    assert_eq!(snapshot.mode(), SessionMode::IdleCreate);

    let notices = confirmer.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Success);
    assert_eq!(notices[0].message, Product::LABELS.created);
    assert_eq!(notices[0].auto_dismiss, Some(Duration::from_millis(1300)));
}

#[tokio::test]
async fn test_loading_spans_list_and_create_even_on_failure() {
    let (transport, mut requests) = create_mock_transport::<Product>(10);
    let confirmer = ScriptedConfirmer::new();
    let client = start(transport, &confirmer);

    let responder = expect_list(&mut requests).await.expect("initial load");
    assert!(client.snapshot().loading, "loading while the list is outstanding");
    responder.send(Ok(vec![])).unwrap();
    let snapshot = client.wait_for(|s| !s.loading).await.unwrap();
    assert!(snapshot.records.is_empty());

    client.field_changed(ProductField::Name, "Widget").await.unwrap();
    client.submit().await.unwrap();
    assert!(client.snapshot().loading, "loading right after submit");

    let (_, responder) = expect_create(&mut requests).await.expect("create request");
    assert!(client.snapshot().loading, "loading while the create is outstanding");
    responder
        .send(Err(TransportError::Status {
            status: 500,
            body: "boom".to_string(),
        }))
        .unwrap();

    let snapshot = client.settled().await.unwrap();
    assert!(!snapshot.loading);
    assert!(snapshot.records.is_empty());
    assert_eq!(snapshot.form.name, "Widget", "draft survives a failed create");

    let errors = confirmer.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, Product::LABELS.create_failed);
    assert_eq!(errors[0].auto_dismiss, None);
}

#[tokio::test]
async fn test_overlapping_submits_keep_loading_until_both_complete() {
    let (transport, mut requests) = create_mock_transport::<Product>(10);
    let confirmer = ScriptedConfirmer::new();
    let client = start(transport, &confirmer);

    expect_list(&mut requests)
        .await
        .expect("initial load")
        .send(Ok(vec![]))
        .unwrap();
    client.settled().await.unwrap();

    client.field_changed(ProductField::Name, "First").await.unwrap();
    client.submit().await.unwrap();
    client.submit().await.unwrap();

    let (first, first_responder) = expect_create(&mut requests).await.expect("first create");
    let (second, second_responder) = expect_create(&mut requests).await.expect("second create");

    first_responder.send(Ok(with_id(first, "p1"))).unwrap();
    let snapshot = client.wait_for(|s| s.records.len() == 1).await.unwrap();
    assert!(snapshot.loading, "second create still outstanding");

    second_responder.send(Ok(with_id(second, "p2"))).unwrap();
    let snapshot = client.settled().await.unwrap();
    assert!(!snapshot.loading);
    let ids: Vec<_> = snapshot.records.iter().map(|p| p.id.clone()).collect();
    assert_eq!(ids, vec![Some("p1".to_string()), Some("p2".to_string())]);
}

#[tokio::test]
async fn test_update_replaces_in_place_and_returns_to_create_mode() {
    let before = with_id(Employee::new("Before", "", "", "", ""), "e1");
    let after = with_id(Employee::new("After", "", "", "", ""), "e9");
    let mut updated = ana();
    updated.first_name = "Ana-2".to_string();

    let mock = MockTransport::<Employee>::new();
    mock.expect_list()
        .return_ok(vec![before.clone(), ana(), after.clone()]);
    mock.expect_update("e7").return_ok(updated.clone());
    let confirmer = ScriptedConfirmer::new();

    let client = start(mock.clone(), &confirmer);
    let loaded = client.settled().await.unwrap();

    client.select_for_edit(loaded.records[1].clone()).await.unwrap();
    assert_eq!(client.snapshot().mode(), SessionMode::Editing);
    client
        .field_changed(EmployeeField::FirstName, "Ana-2")
        .await
        .unwrap();
    client.submit().await.unwrap();

    let snapshot = client.settled().await.unwrap();
    assert_eq!(snapshot.records, vec![before, updated, after]);
    assert_eq!(snapshot.mode(), SessionMode::IdleCreate);
    assert_eq!(snapshot.form, Employee::default());
    assert_eq!(confirmer.notices()[0].message, Employee::LABELS.updated);
    assert_eq!(mock.received(), vec!["list", "update(e7)"]);
    mock.verify();
}

#[tokio::test]
async fn test_update_sends_form_draft_under_target_id() {
    let (transport, mut requests) = create_mock_transport::<Employee>(10);
    let confirmer = ScriptedConfirmer::new();
    let client = start(transport, &confirmer);

    expect_list(&mut requests)
        .await
        .expect("initial load")
        .send(Ok(vec![ana()]))
        .unwrap();
    client.settled().await.unwrap();

    client.select_for_edit(ana()).await.unwrap();
    client
        .field_changed(EmployeeField::Position, "Supervisor")
        .await
        .unwrap();
    client.submit().await.unwrap();

    let (id, draft, responder) = expect_update(&mut requests).await.expect("update request");
    assert_eq!(id, "e7");
    assert_eq!(draft.position, "Supervisor");
    assert_eq!(draft.first_name, "Ana");
    assert!(client.snapshot().loading);
    responder.send(Ok(draft)).unwrap();

    let snapshot = client.settled().await.unwrap();
    assert!(!snapshot.loading);
    assert_eq!(snapshot.records[0].position, "Supervisor");
}

#[tokio::test]
async fn test_failed_update_stays_in_edit_mode_with_draft() {
    let mock = MockTransport::<Employee>::new();
    mock.expect_list().return_ok(vec![ana()]);
    mock.expect_update("e7")
        .return_err(TransportError::Network("connection reset".to_string()));
    let confirmer = ScriptedConfirmer::new();

    let client = start(mock.clone(), &confirmer);
    client.settled().await.unwrap();

    client.select_for_edit(ana()).await.unwrap();
    client
        .field_changed(EmployeeField::FirstName, "Ana-2")
        .await
        .unwrap();
    client.submit().await.unwrap();

    let snapshot = client.settled().await.unwrap();
    assert_eq!(snapshot.mode(), SessionMode::Editing);
    assert_eq!(snapshot.form.first_name, "Ana-2");
    assert_eq!(snapshot.edit_target, Some(ana()));
    assert_eq!(snapshot.records, vec![ana()]);

    let errors = confirmer.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, Employee::LABELS.update_failed);
    mock.verify();
}

#[tokio::test]
async fn test_editing_the_form_never_touches_the_listed_record() {
    let mock = MockTransport::<Employee>::new();
    mock.expect_list().return_ok(vec![ana()]);
    let confirmer = ScriptedConfirmer::new();

    let client = start(mock, &confirmer);
    let loaded = client.settled().await.unwrap();

    client.select_for_edit(loaded.records[0].clone()).await.unwrap();
    for field in EmployeeField::ALL {
        client.field_changed(*field, "changed").await.unwrap();
    }

    let snapshot = client.snapshot();
    assert_eq!(snapshot.records, vec![ana()]);
    assert_eq!(snapshot.edit_target, Some(ana()));
    assert_eq!(snapshot.form.email, "changed");

    client.cancel_edit().await.unwrap();
    let snapshot = client.snapshot();
    assert_eq!(snapshot.edit_target, None);
    assert_eq!(snapshot.form, Employee::default());
    assert_eq!(snapshot.records, vec![ana()]);
}

#[tokio::test]
async fn test_confirmed_delete_removes_record_without_loading() {
    let (transport, mut requests) = create_mock_transport::<Customer>(10);
    let confirmer = ScriptedConfirmer::answering([true]);
    let client = start(transport, &confirmer);

    expect_list(&mut requests)
        .await
        .expect("initial load")
        .send(Ok(customers()))
        .unwrap();
    client.settled().await.unwrap();

    client.request_delete("c3").await.unwrap();
    let (id, responder) = expect_delete(&mut requests).await.expect("delete request");
    assert_eq!(id, "c3");

    let pending = client.snapshot();
    assert!(!pending.loading, "delete does not hold the loading flag");
    assert_eq!(pending.outstanding, 1);
    responder.send(Ok(())).unwrap();

    let snapshot = client.settled().await.unwrap();
    assert_eq!(snapshot.records.len(), 1);
    assert!(snapshot.records.iter().all(|c| c.id.as_deref() != Some("c3")));

    let prompts = confirmer.prompts();
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0].title, Customer::LABELS.delete_title);
    assert_eq!(prompts[0].severity, Severity::Warning);
    assert_eq!(prompts[0].confirm_label, "Yes, delete");

    let notices = confirmer.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, Customer::LABELS.deleted);
    assert_eq!(notices[0].auto_dismiss, Some(Duration::from_millis(1200)));
}

#[tokio::test]
async fn test_declined_delete_sends_nothing() {
    let (transport, mut requests) = create_mock_transport::<Customer>(10);
    let confirmer = ScriptedConfirmer::answering([false]);
    let client = start(transport, &confirmer);

    expect_list(&mut requests)
        .await
        .expect("initial load")
        .send(Ok(customers()))
        .unwrap();
    client.settled().await.unwrap();

    client.request_delete("c3").await.unwrap();
    let snapshot = client.settled().await.unwrap();

    assert_eq!(snapshot.records, customers());
    assert!(requests.try_recv().is_err(), "no transport call after a decline");
    assert_eq!(confirmer.prompts().len(), 1);
    assert!(confirmer.notices().is_empty());
}

#[tokio::test]
async fn test_delete_not_found_keeps_record_and_raises_one_error() {
    let mock = MockTransport::<Customer>::new();
    mock.expect_list().return_ok(customers());
    mock.expect_delete("c3")
        .return_err(TransportError::NotFound("c3".to_string()));
    let confirmer = ScriptedConfirmer::answering([true]);

    let client = start(mock.clone(), &confirmer);
    client.settled().await.unwrap();

    client.request_delete("c3").await.unwrap();
    let snapshot = client.settled().await.unwrap();

    assert!(snapshot
        .records
        .iter()
        .any(|c| c.id.as_deref() == Some("c3")));
    assert_eq!(snapshot.records.len(), 2);

    let errors = confirmer.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, Customer::LABELS.delete_failed);
    assert_eq!(confirmer.notices().len(), 1);
    mock.verify();
}

#[tokio::test]
async fn test_failed_load_keeps_records_and_notifies() {
    let mock = MockTransport::<Customer>::new();
    mock.expect_list().return_ok(customers());
    mock.expect_list()
        .return_err(TransportError::Network("timed out".to_string()));
    let confirmer = ScriptedConfirmer::new();

    let client = start(mock.clone(), &confirmer);
    client.settled().await.unwrap();

    client.load().await.unwrap();
    let snapshot = client.settled().await.unwrap();

    assert!(!snapshot.loading);
    assert_eq!(snapshot.records, customers());
    let errors = confirmer.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, Customer::LABELS.load_failed);
    mock.verify();
}

#[tokio::test]
async fn test_customer_form_fields_reach_the_create_request() {
    let (transport, mut requests) = create_mock_transport::<Customer>(10);
    let confirmer = ScriptedConfirmer::new();
    let client = start(transport, &confirmer);

    expect_list(&mut requests)
        .await
        .expect("initial load")
        .send(Ok(vec![]))
        .unwrap();
    client.settled().await.unwrap();

    client
        .field_changed(CustomerField::FirstName, "Ada")
        .await
        .unwrap();
    client
        .field_changed(CustomerField::Address, "London")
        .await
        .unwrap();
    client.submit().await.unwrap();

    let (draft, responder) = expect_create(&mut requests).await.expect("create request");
    assert_eq!(draft.first_name, "Ada");
    assert_eq!(draft.address, "London");
    assert_eq!(draft.email, "");
    drop(responder);

    // A dropped responder reads as a closed transport.
    let snapshot = client.settled().await.unwrap();
    assert!(snapshot.records.is_empty());
    assert_eq!(confirmer.errors()[0].message, Customer::LABELS.create_failed);
}

#[tokio::test]
async fn test_panicking_load_still_clears_loading_and_notifies() {
    // No expectations: the first `list` call panics inside its task.
    let mock = MockTransport::<Product>::new();
    let confirmer = ScriptedConfirmer::new();

    let client = start(mock.clone(), &confirmer);
    let snapshot = tokio::time::timeout(Duration::from_secs(2), client.settled())
        .await
        .expect("session settles after a panicking task")
        .unwrap();

    assert!(!snapshot.loading);
    assert_eq!(snapshot.outstanding, 0);
    assert!(snapshot.records.is_empty());
    let errors = confirmer.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, Product::LABELS.load_failed);
    assert_eq!(mock.received(), vec!["list"]);
}

#[tokio::test]
async fn test_panicking_create_keeps_draft_and_session_alive() {
    let mock = MockTransport::<Product>::new();
    mock.expect_list().return_ok(vec![]);
    let confirmer = ScriptedConfirmer::new();

    let client = start(mock.clone(), &confirmer);
    client.settled().await.unwrap();

    client.field_changed(ProductField::Name, "Widget").await.unwrap();
    client.submit().await.unwrap();
    let snapshot = tokio::time::timeout(Duration::from_secs(2), client.settled())
        .await
        .expect("session settles after a panicking task")
        .unwrap();

    assert!(!snapshot.loading);
    assert_eq!(snapshot.form.name, "Widget");
    assert_eq!(confirmer.errors()[0].message, Product::LABELS.create_failed);

    // The session keeps serving intents.
    client.cancel_edit().await.unwrap();
    assert_eq!(client.snapshot().form, Product::default());
}

#[tokio::test]
async fn test_create_reply_with_listed_id_replaces_entry() {
    let hammer = with_id(Product::new("Hammer", "", 12.5, 40, "tools"), "p1");
    let widget = with_id(Product::new("Widget", "", 9.99, 5, "tools"), "p1");

    let mock = MockTransport::<Product>::new();
    mock.expect_list().return_ok(vec![hammer]);
    mock.expect_create().return_ok(widget.clone());
    let confirmer = ScriptedConfirmer::new();

    let client = start(mock.clone(), &confirmer);
    client.settled().await.unwrap();

    client.field_changed(ProductField::Name, "Widget").await.unwrap();
    client.submit().await.unwrap();
    let snapshot = client.settled().await.unwrap();

    assert_eq!(snapshot.records, vec![widget]);
    assert_eq!(snapshot.form, Product::default());
    let notices = confirmer.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, Product::LABELS.created);
    assert_eq!(mock.received(), vec!["list", "create"]);
    mock.verify();
}

#[tokio::test]
async fn test_update_reply_with_unknown_id_leaves_list_alone() {
    let mut stray = ana();
    stray.id = Some("e99".to_string());
    stray.first_name = "Ana-2".to_string();

    let mock = MockTransport::<Employee>::new();
    mock.expect_list().return_ok(vec![ana()]);
    mock.expect_update("e7").return_ok(stray);
    let confirmer = ScriptedConfirmer::new();

    let client = start(mock.clone(), &confirmer);
    client.settled().await.unwrap();

    client.select_for_edit(ana()).await.unwrap();
    client
        .field_changed(EmployeeField::FirstName, "Ana-2")
        .await
        .unwrap();
    client.submit().await.unwrap();
    let snapshot = client.settled().await.unwrap();

    assert_eq!(snapshot.records, vec![ana()]);
    assert_eq!(snapshot.mode(), SessionMode::IdleCreate);
    assert_eq!(snapshot.form, Employee::default());
    let notices = confirmer.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Success);
    assert_eq!(notices[0].message, Employee::LABELS.updated);
    assert_eq!(mock.received(), vec!["list", "update(e7)"]);
    mock.verify();
}

#[tokio::test]
async fn test_submit_with_unsaved_edit_target_sends_nothing() {
    let mock = MockTransport::<Employee>::new();
    mock.expect_list().return_ok(vec![]);
    let confirmer = ScriptedConfirmer::new();

    let client = start(mock.clone(), &confirmer);
    client.settled().await.unwrap();

    let unsaved = Employee::new("Ana", "Ruiz", "ana@example.com", "555-0101", "Cashier");
    client.select_for_edit(unsaved.clone()).await.unwrap();
    client.submit().await.unwrap();
    let snapshot = client.settled().await.unwrap();

    assert!(snapshot.records.is_empty());
    assert!(!snapshot.loading);
    assert_eq!(snapshot.mode(), SessionMode::Editing);
    assert_eq!(snapshot.edit_target, Some(unsaved));
    let errors = confirmer.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, Employee::LABELS.update_failed);
    assert_eq!(confirmer.notices().len(), 1);
    assert_eq!(mock.received(), vec!["list"]);
    mock.verify();
}
