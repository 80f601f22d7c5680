//! # Resource Session Demo
//!
//! Drives the three screens of the [`AdminConsole`] through one round of
//! create, edit and delete:
//! 1.  Creating a [`Product`] from an empty form.
//! 2.  Editing the first [`Employee`].
//! 3.  Deleting the first [`Customer`] after confirmation.
//!
//! Without `RESOURCE_API_URL` the console runs against seeded in-memory stores.

use std::sync::Arc;

use resource_session::config::AppConfig;
use resource_session::framework::{ConfirmationService, LogConfirmer, SessionError};
use resource_session::lifecycle::{setup_tracing, AdminConsole};
use resource_session::model::{Customer, Employee, EmployeeField, Product, ProductField};
use tracing::{info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = AppConfig::from_env().map_err(|e| e.to_string())?;
    let confirmer: Arc<dyn ConfirmationService> = Arc::new(LogConfirmer::new(config.auto_confirm));

    let console = AdminConsole::from_config_seeded(
        confirmer,
        &config,
        vec![Product::new("Hammer", "Claw hammer", 12.5, 40, "tools")],
        vec![Employee::new(
            "Ana",
            "Ruiz",
            "ana@example.com",
            "555-0101",
            "Cashier",
        )],
        vec![Customer::new(
            "Luis",
            "Pérez",
            "luis@example.com",
            "555-0199",
            "Calle Mayor 1",
        )],
    )
    .map_err(|e| e.to_string())?;

    let span = tracing::info_span!("product_screen");
    async {
        let products = &console.products;
        products.settled().await?;
        info!("Filling the product form");
        products.field_changed(ProductField::Name, "Widget").await?;
        products.field_changed(ProductField::Description, "Blue").await?;
        products.field_changed(ProductField::Price, "9.99").await?;
        products.field_changed(ProductField::Stock, "5").await?;
        products.field_changed(ProductField::Category, "tools").await?;
        products.submit().await?;

        let snapshot = products.settled().await?;
        info!(size = snapshot.records.len(), "Products listed");
        Ok::<(), SessionError>(())
    }
    .instrument(span)
    .await
    .map_err(|e| e.to_string())?;

    let span = tracing::info_span!("employee_screen");
    async {
        let employees = &console.employees;
        let snapshot = employees.settled().await?;
        match snapshot.records.first() {
            Some(employee) => {
                info!(id = ?employee.id, "Editing employee");
                employees.select_for_edit(employee.clone()).await?;
                employees
                    .field_changed(EmployeeField::Position, "Supervisor")
                    .await?;
                employees.submit().await?;
                let snapshot = employees.settled().await?;
                info!(mode = ?snapshot.mode(), "Employee form reset");
            }
            None => warn!("No employee to edit"),
        }
        Ok::<(), SessionError>(())
    }
    .instrument(span)
    .await
    .map_err(|e| e.to_string())?;

    let span = tracing::info_span!("customer_screen");
    async {
        let customers = &console.customers;
        let snapshot = customers.settled().await?;
        match snapshot.records.first().and_then(|c| c.id.clone()) {
            Some(id) => {
                info!(%id, "Deleting customer");
                customers.request_delete(id).await?;
                let snapshot = customers.settled().await?;
                info!(size = snapshot.records.len(), "Customers listed");
            }
            None => warn!("No customer to delete"),
        }
        Ok::<(), SessionError>(())
    }
    .instrument(span)
    .await
    .map_err(|e| e.to_string())?;

    // Shutdown console gracefully
    console.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
