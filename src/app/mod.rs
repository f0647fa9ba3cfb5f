// Application layer: wires the production adapters into the exporter.

use crate::adapters::{LocalStorage, ServiceAccountAuth, SheetsClient};
use crate::config::ExportConfig;
use crate::core::exporter::SheetExporter;
use crate::domain::model::ExportSummary;
use crate::utils::error::Result;
use crate::utils::validation::Validate;

/// Validates the config, authenticates with the service account and exports.
///
/// Configuration and credential parsing errors are raised before any request
/// is sent.
pub async fn run(config: ExportConfig) -> Result<ExportSummary> {
    config.validate()?;

    let auth = ServiceAccountAuth::from_json(&config.credentials_json)?;
    tracing::info!("Authenticating as {}", auth.client_email());

    let client = SheetsClient::connect(&config, &auth).await?;
    SheetExporter::new(client, LocalStorage::default(), config)
        .run()
        .await
}
