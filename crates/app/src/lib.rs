//! Catalog Admin - command-line front end
//!
//! Wires the configuration, the HTTP product gateway and the tabular sheet
//! reader into the application use cases, and renders their results as
//! text lines.

mod command;

use std::path::Path;
use std::sync::Arc;

use catalog_application::{
    ApplicationError, CatalogSession, FetchOutcome, ImportError, ImportSession, MutationCoordinator,
    MutationError,
};
use catalog_domain::{PaginationState, Product, ProductId};
use catalog_infrastructure::{ClientConfig, ConfigError, ReqwestProductGateway, TabularSheetReader};
use thiserror::Error;

pub use command::{Cli, Command};

/// Errors reported by the command-line front end.
#[derive(Debug, Error)]
pub enum AppError {
    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The product service could not be reached or refused a call.
    #[error("{message}")]
    Service {
        /// Message for the user.
        message: String,
        /// Underlying failure.
        source: ApplicationError,
    },

    /// An import failed.
    #[error(transparent)]
    Import(#[from] ImportError),

    /// A mutation failed.
    #[error(transparent)]
    Mutation(#[from] MutationError),
}

impl AppError {
    fn service(source: ApplicationError, fallback: &str) -> Self {
        Self::Service {
            message: source.user_message(fallback),
            source,
        }
    }

    /// Extra lines to print under the error message.
    #[must_use]
    pub fn details(&self) -> Vec<String> {
        match self {
            Self::Service { source, .. } => {
                source.load_error_kind().suggestions().iter().map(ToString::to_string).collect()
            }
            Self::Import(ImportError::NoValidRows { errors }) => errors.clone(),
            _ => Vec::new(),
        }
    }
}

/// The wired-up client.
pub struct App {
    config: ClientConfig,
    gateway: Arc<ReqwestProductGateway>,
}

impl App {
    /// Builds the client from its configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, AppError> {
        let gateway = ReqwestProductGateway::new(&config)
            .map_err(|e| AppError::service(e, "Failed to create the HTTP client."))?;
        tracing::debug!(base_url = %gateway.base_url(), "product gateway ready");
        Ok(Self {
            config,
            gateway: Arc::new(gateway),
        })
    }

    /// Returns the configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn session(&self, query: &str) -> Arc<CatalogSession<ReqwestProductGateway>> {
        Arc::new(CatalogSession::restore(
            Arc::clone(&self.gateway),
            query,
            self.config.query_policy(),
        ))
    }

    /// Runs a command and returns the lines to print.
    ///
    /// # Errors
    ///
    /// Returns the failure of the underlying use case.
    pub async fn run(&self, command: Command) -> Result<Vec<String>, AppError> {
        match command {
            Command::List { query } => {
                self.list(query.as_deref().unwrap_or_default().trim_start_matches('?'))
                    .await
            }
            Command::Categories => self.categories().await,
            Command::Import { path } => self.import(&path).await,
            Command::Delete { id } => self.delete(id).await,
        }
    }

    async fn list(&self, query: &str) -> Result<Vec<String>, AppError> {
        let session = self.session(query);
        if let FetchOutcome::Failed(error) = session.refresh_list().await {
            return Err(AppError::service(error, catalog_application::LOAD_FAILED));
        }

        let view = session.view();
        let mut lines: Vec<String> = view.products.iter().map(product_line).collect();
        if lines.is_empty() {
            lines.push("No products found.".to_string());
        }
        lines.push(pagination_line(&session.pagination()));
        let link = session
            .link()
            .map_err(|e| AppError::service(e, "Failed to encode the query."))?;
        if !link.is_empty() {
            lines.push(format!("Link: ?{link}"));
        }
        Ok(lines)
    }

    async fn categories(&self) -> Result<Vec<String>, AppError> {
        Ok(self.session("").reload_categories().await)
    }

    async fn import(&self, path: &Path) -> Result<Vec<String>, AppError> {
        let reader = TabularSheetReader::with_max_file_size(self.config.max_import_bytes);
        let (file_name, bytes) = reader.load(path).await.map_err(ImportError::from)?;
        let import = ImportSession::new(reader, self.config.header_rules());
        let rows = import.select_file(&file_name, &bytes)?;

        let mut lines = vec![format!("Selected {file_name}: {rows} rows")];
        for row in import.snapshot().preview {
            let cells: Vec<String> = row
                .cells
                .iter()
                .map(|(header, value)| format!("{header}={}", value.as_text().unwrap_or_default()))
                .collect();
            lines.push(format!("  {}", cells.join(", ")));
        }

        let coordinator = MutationCoordinator::new(self.session(""));
        let report = import.upload(&coordinator).await?;
        lines.extend(report.row_errors);
        lines.extend(report.stats.summary());
        Ok(lines)
    }

    async fn delete(&self, id: ProductId) -> Result<Vec<String>, AppError> {
        let coordinator = MutationCoordinator::new(self.session(""));
        let name = coordinator.edit_form(id).await?.name;
        coordinator.request_delete(id, &name)?;
        coordinator.confirm_delete().await?;
        Ok(vec![format!("Deleted product {id} ({name})")])
    }
}

fn product_line(product: &Product) -> String {
    format!(
        "{:>6}  {:<32}  {:>10}  {}",
        product.id, product.name, product.price, product.category
    )
}

fn pagination_line(pagination: &PaginationState) -> String {
    format!(
        "Showing {}-{} of {} products (page {} of {})",
        pagination.first_row(),
        pagination.last_row(),
        pagination.total,
        pagination.page,
        pagination.total_pages.max(1)
    )
}
