use std::sync::Arc;
use std::time::Duration;

use resource_session::config::AppConfig;
use resource_session::framework::mock::ScriptedConfirmer;
use resource_session::framework::SessionMode;
use resource_session::lifecycle::AdminConsole;
use resource_session::model::{
    Customer, Employee, EmployeeField, Product, ProductField,
};

/// Full end-to-end integration test with all three screens over in-memory stores.
#[tokio::test]
async fn test_full_console_integration() {
    let confirmer = ScriptedConfirmer::answering([false, true]);
    let console = AdminConsole::in_memory_seeded(
        Arc::new(confirmer.clone()),
        &AppConfig::default(),
        vec![],
        vec![Employee::new("Ana", "Ruiz", "ana@example.com", "555", "Cashier")],
        vec![
            Customer::new("Luis", "Pérez", "luis@example.com", "1", "Calle 1"),
            Customer::new("Marta", "Gil", "marta@example.com", "2", "Calle 2"),
        ],
    );

    // Products: create from an empty store
    let products = console.products.settled().await.expect("products loaded");
    assert!(products.records.is_empty());

    console
        .products
        .field_changed(ProductField::Name, "Widget")
        .await
        .unwrap();
    console
        .products
        .field_changed(ProductField::Price, "9.99")
        .await
        .unwrap();
    console.products.submit().await.unwrap();
    let products = console.products.settled().await.unwrap();
    assert_eq!(products.records.len(), 1);
    assert_eq!(products.records[0].id.as_deref(), Some("p1"));
    assert_eq!(products.records[0].price, 9.99);

    // Employees: edit the seeded record
    let employees = console.employees.settled().await.unwrap();
    let ana = employees.records[0].clone();
    assert_eq!(ana.id.as_deref(), Some("e1"));

    console.employees.select_for_edit(ana).await.unwrap();
    console
        .employees
        .field_changed(EmployeeField::Position, "Supervisor")
        .await
        .unwrap();
    console.employees.submit().await.unwrap();
    let employees = console.employees.settled().await.unwrap();
    assert_eq!(employees.mode(), SessionMode::IdleCreate);
    assert_eq!(employees.records[0].position, "Supervisor");

    // Verify the store kept the change
    console.employees.load().await.unwrap();
    let employees = console.employees.settled().await.unwrap();
    assert_eq!(employees.records[0].position, "Supervisor");

    // Customers: first delete declined, second confirmed
    console.customers.settled().await.unwrap();
    console.customers.request_delete("c2").await.unwrap();
    let customers = console.customers.settled().await.unwrap();
    assert_eq!(customers.records.len(), 2, "declined delete keeps the record");

    console.customers.request_delete("c2").await.unwrap();
    let customers = console.customers.settled().await.unwrap();
    assert_eq!(customers.records.len(), 1);
    assert_eq!(customers.records[0].first_name, "Luis");

    assert_eq!(confirmer.prompts().len(), 2);
    assert!(confirmer.errors().is_empty());
    // created, updated, deleted
    assert_eq!(confirmer.notices().len(), 3);

    console.shutdown().await.expect("clean shutdown");
}

/// Failures stay inside the screen that caused them.
#[tokio::test]
async fn test_failed_delete_on_one_screen_leaves_others_alone() {
    let confirmer = ScriptedConfirmer::answering([true]);
    let console = AdminConsole::in_memory_seeded(
        Arc::new(confirmer.clone()),
        &AppConfig::default(),
        vec![Product::new("Hammer", "", 12.5, 40, "tools")],
        vec![],
        vec![],
    );

    console.products.settled().await.unwrap();
    console.products.request_delete("p404").await.unwrap();
    let products = console.products.settled().await.unwrap();
    assert_eq!(products.records.len(), 1);

    let errors = confirmer.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "Could not delete the product.");

    assert!(console.employees.settled().await.unwrap().records.is_empty());
    assert!(console.customers.settled().await.unwrap().records.is_empty());

    console.shutdown().await.expect("clean shutdown");
}

/// With nothing listening, every screen reports its own load failure.
#[tokio::test]
async fn test_unreachable_backend_raises_one_load_error_per_screen() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut config = AppConfig::default().with_api_url(format!("http://{addr}/api"));
    config.request_timeout = Duration::from_secs(2);

    let confirmer = ScriptedConfirmer::new();
    let console = AdminConsole::from_config(Arc::new(confirmer.clone()), &config)
        .expect("valid base URL");

    let notices = confirmer.wait_for_notices(3).await;
    let mut messages: Vec<_> = notices.iter().map(|n| n.message.as_str()).collect();
    messages.sort();
    assert_eq!(
        messages,
        vec![
            "Could not load the customers.",
            "Could not load the employees.",
            "Could not load the products.",
        ]
    );

    console.shutdown().await.expect("clean shutdown");
}

/// Without an API URL the seeded stores back the console.
#[tokio::test]
async fn test_from_config_seeded_uses_memory_stores_without_url() {
    let confirmer = ScriptedConfirmer::new();
    let console = AdminConsole::from_config_seeded(
        Arc::new(confirmer.clone()),
        &AppConfig::default(),
        vec![Product::new("Hammer", "", 12.5, 40, "tools")],
        vec![],
        vec![Customer::new("Luis", "Pérez", "luis@example.com", "1", "Calle 1")],
    )
    .expect("in-memory console");

    let products = console.products.settled().await.unwrap();
    assert_eq!(products.records.len(), 1);
    assert_eq!(products.records[0].id.as_deref(), Some("p1"));
    assert!(console.employees.settled().await.unwrap().records.is_empty());
    assert_eq!(console.customers.settled().await.unwrap().records.len(), 1);
    assert!(confirmer.notices().is_empty());

    console.shutdown().await.expect("clean shutdown");
}
