use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::clients::HttpTransport;
use crate::config::AppConfig;
use crate::customers::CustomersClient;
use crate::employees::EmployeesClient;
use crate::framework::{ConfirmationService, SessionConfig, Transport, TransportError};
use crate::model::{Customer, Employee, Product};
use crate::products::ProductsClient;

/// The three record-management screens, running side by side.
///
/// `AdminConsole` is responsible for:
/// - **Lifecycle Management**: Starting and stopping every session (and, in
///   memory mode, the stores behind them)
/// - **Dependency Wiring**: Handing each session its transport and the shared
///   confirmation service
///
/// # Architecture
///
/// The console holds one session per entity kind:
/// - **Products**: catalogue records with price and stock
/// - **Employees**: staff records
/// - **Customers**: customer records
///
/// The sessions never talk to each other. Each one owns its own state in its
/// own task.
///
/// # Example
///
/// ```ignore
/// let console = AdminConsole::in_memory(confirmer, &AppConfig::default());
///
/// console.products.field_changed(ProductField::Name, "Widget").await?;
/// console.products.submit().await?;
///
/// // Gracefully shut down when done
/// console.shutdown().await?;
/// ```
pub struct AdminConsole {
    /// Client for the products screen
    pub products: ProductsClient,

    /// Client for the employees screen
    pub employees: EmployeesClient,

    /// Client for the customers screen
    pub customers: CustomersClient,

    /// Session tasks first, then store tasks (used for graceful shutdown)
    handles: Vec<JoinHandle<()>>,
}

impl AdminConsole {
    /// Starts the three sessions over the given transports.
    ///
    /// Each session issues its initial load as soon as it starts.
    pub fn with_transports(
        products: impl Transport<Product> + 'static,
        employees: impl Transport<Employee> + 'static,
        customers: impl Transport<Customer> + 'static,
        confirmer: Arc<dyn ConfirmationService>,
        config: SessionConfig,
    ) -> Self {
        let (product_session, products) =
            crate::products::new(products, confirmer.clone(), config.clone());
        let (employee_session, employees) =
            crate::employees::new(employees, confirmer.clone(), config.clone());
        let (customer_session, customers) = crate::customers::new(customers, confirmer, config);

        let handles = vec![
            tokio::spawn(product_session.run()),
            tokio::spawn(employee_session.run()),
            tokio::spawn(customer_session.run()),
        ];

        Self {
            products,
            employees,
            customers,
            handles,
        }
    }

    /// Starts the console against empty in-memory stores.
    pub fn in_memory(confirmer: Arc<dyn ConfirmationService>, config: &AppConfig) -> Self {
        Self::in_memory_seeded(confirmer, config, Vec::new(), Vec::new(), Vec::new())
    }

    /// Starts the console against in-memory stores holding the given records.
    pub fn in_memory_seeded(
        confirmer: Arc<dyn ConfirmationService>,
        config: &AppConfig,
        products: Vec<Product>,
        employees: Vec<Employee>,
        customers: Vec<Customer>,
    ) -> Self {
        let buffer = config.channel_buffer;
        let (product_store, product_transport) = crate::products::memory_store(buffer);
        let (employee_store, employee_transport) = crate::employees::memory_store(buffer);
        let (customer_store, customer_transport) = crate::customers::memory_store(buffer);

        // Stores first, so the initial loads find them running.
        let store_handles = vec![
            tokio::spawn(product_store.seed(products).run()),
            tokio::spawn(employee_store.seed(employees).run()),
            tokio::spawn(customer_store.seed(customers).run()),
        ];

        let mut console = Self::with_transports(
            product_transport,
            employee_transport,
            customer_transport,
            confirmer,
            config.session_config(),
        );
        console.handles.extend(store_handles);
        console
    }

    /// Starts the console against the REST backend.
    pub fn http(
        confirmer: Arc<dyn ConfirmationService>,
        config: &AppConfig,
    ) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        let base_url = config.api_url_or_default();
        info!(%base_url, "Connecting to backend");

        Ok(Self::with_transports(
            HttpTransport::<Product>::with_client(client.clone(), base_url)?,
            HttpTransport::<Employee>::with_client(client.clone(), base_url)?,
            HttpTransport::<Customer>::with_client(client, base_url)?,
            confirmer,
            config.session_config(),
        ))
    }

    /// HTTP when an API URL is configured, empty in-memory stores otherwise.
    pub fn from_config(
        confirmer: Arc<dyn ConfirmationService>,
        config: &AppConfig,
    ) -> Result<Self, TransportError> {
        Self::from_config_seeded(confirmer, config, Vec::new(), Vec::new(), Vec::new())
    }

    /// Like [`from_config`](Self::from_config), seeding the in-memory stores.
    ///
    /// The seed records are ignored when an API URL is configured.
    pub fn from_config_seeded(
        confirmer: Arc<dyn ConfirmationService>,
        config: &AppConfig,
        products: Vec<Product>,
        employees: Vec<Employee>,
        customers: Vec<Customer>,
    ) -> Result<Self, TransportError> {
        match config.api_base_url {
            Some(_) => Self::http(confirmer, config),
            None => {
                info!("No API URL configured, using in-memory stores");
                Ok(Self::in_memory_seeded(
                    confirmer, config, products, employees, customers,
                ))
            }
        }
    }

    /// Gracefully shuts down every session and store.
    ///
    /// # Shutdown Process
    ///
    /// Dropping the clients closes each session's intent channel; the session
    /// loop exits and aborts whatever requests it still had in flight. Dropping
    /// the sessions drops their transports, which in turn stops the stores.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if all tasks shut down cleanly
    /// - `Err(String)` if any task panicked
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down console...");

        drop(self.products);
        drop(self.employees);
        drop(self.customers);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Task failed: {:?}", e);
                return Err(format!("Task failed: {:?}", e));
            }
        }

        info!("Console shutdown complete.");
        Ok(())
    }
}
