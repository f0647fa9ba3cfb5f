use crate::config::ExportConfig;
use crate::core::csv_output::encode_csv;
use crate::core::table::to_table;
use crate::domain::model::ExportSummary;
use crate::domain::ports::{SheetSource, Storage};
use crate::utils::error::Result;

/// Runs one export: open spreadsheet, open worksheet, fetch, tabulate, write.
///
/// The output file is only touched after every remote call has succeeded, so
/// a failed run leaves any previous export in place.
pub struct SheetExporter<P: SheetSource, S: Storage> {
    source: P,
    storage: S,
    config: ExportConfig,
}

impl<P: SheetSource, S: Storage> SheetExporter<P, S> {
    pub fn new(source: P, storage: S, config: ExportConfig) -> Self {
        Self {
            source,
            storage,
            config,
        }
    }

    pub async fn run(&self) -> Result<ExportSummary> {
        let config = &self.config;

        tracing::info!(
            "Attempting to open spreadsheet with ID: {}",
            config.spreadsheet_id
        );
        let spreadsheet = self.source.open_spreadsheet(&config.spreadsheet_id).await?;

        tracing::info!("Attempting to open worksheet: {}", config.sheet_name);
        let worksheet = self
            .source
            .open_worksheet(&spreadsheet, &config.sheet_name)
            .await?;

        tracing::info!("Fetching all records from the worksheet...");
        let records = self.source.fetch_all_records(&worksheet).await?;

        if records.is_empty() {
            tracing::info!(
                "No data found in sheet '{}'. Creating an empty CSV.",
                config.sheet_name
            );
        } else {
            tracing::info!("Successfully fetched {} rows.", records.len());
        }

        let table = to_table(&records);
        let data = encode_csv(&table)?;
        tracing::debug!(
            "Encoded {} column(s) into {} bytes",
            table.columns.len(),
            data.len()
        );

        self.storage.write_file(&config.output_path, &data).await?;
        tracing::info!(
            "Successfully saved sheet '{}' to '{}'",
            config.sheet_name,
            config.output_path.display()
        );

        Ok(ExportSummary {
            spreadsheet_title: spreadsheet.title,
            worksheet: worksheet.title,
            rows: table.rows.len(),
            columns: table.columns.len(),
            output_path: config.output_path.clone(),
        })
    }
}
