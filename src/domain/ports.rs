use crate::domain::model::{Record, Spreadsheet, Worksheet};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Writes finished output. Implementations create missing parent directories.
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &Path,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Supplies a bearer token for the spreadsheet API.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}

#[async_trait]
pub trait SheetSource: Send + Sync {
    async fn open_spreadsheet(&self, spreadsheet_id: &str) -> Result<Spreadsheet>;
    async fn open_worksheet(&self, spreadsheet: &Spreadsheet, title: &str) -> Result<Worksheet>;
    async fn fetch_all_records(&self, worksheet: &Worksheet) -> Result<Vec<Record>>;
}
