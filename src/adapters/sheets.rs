use crate::config::{ExportConfig, ValueRenderOption, API_BASE_ENV};
use crate::core::records::build_records;
use crate::domain::model::{Record, Spreadsheet, Worksheet};
use crate::domain::ports::{SheetSource, TokenProvider};
use crate::utils::error::{ExportError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use url::Url;

const METADATA_FIELDS: &str = "spreadsheetId,properties.title,sheets.properties(sheetId,title,index)";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpreadsheetMetadata {
    spreadsheet_id: String,
    #[serde(default)]
    properties: SpreadsheetProperties,
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct SpreadsheetProperties {
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    #[serde(default)]
    sheet_id: i64,
    title: String,
    #[serde(default)]
    index: i64,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

/// Google Sheets REST v4 client holding a bearer token for one run.
pub struct SheetsClient {
    client: Client,
    base: Url,
    token: String,
    header_row: usize,
    value_render: ValueRenderOption,
}

impl SheetsClient {
    /// Authenticates through `auth`, then builds a client for the configured API.
    pub async fn connect<T: TokenProvider + ?Sized>(config: &ExportConfig, auth: &T) -> Result<Self> {
        tracing::debug!("Authenticating against the Sheets API");
        let token = auth.access_token().await?;
        Self::with_token(config, token)
    }

    pub fn with_token(config: &ExportConfig, token: impl Into<String>) -> Result<Self> {
        let base = Url::parse(&config.api_base).map_err(|e| ExportError::InvalidConfigValueError {
            field: API_BASE_ENV.to_string(),
            value: config.api_base.clone(),
            reason: format!("Invalid URL format: {}", e),
        })?;
        if base.cannot_be_a_base() {
            return Err(ExportError::InvalidConfigValueError {
                field: API_BASE_ENV.to_string(),
                value: config.api_base.clone(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("sheet-export/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base,
            token: token.into(),
            header_row: config.header_row,
            value_render: config.value_render,
        })
    }

    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base.clone();
        // cannot_be_a_base was rejected in with_token, so segments are always available.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(["v4", "spreadsheets"]).extend(segments);
        }
        url
    }

    pub(crate) fn metadata_url(&self, spreadsheet_id: &str) -> Url {
        let mut url = self.endpoint([spreadsheet_id]);
        url.query_pairs_mut().append_pair("fields", METADATA_FIELDS);
        url
    }

    pub(crate) fn values_url(&self, worksheet: &Worksheet) -> Url {
        let range = quote_sheet_title(&worksheet.title);
        let mut url = self.endpoint([worksheet.spreadsheet_id.as_str(), "values", range.as_str()]);
        url.query_pairs_mut()
            .append_pair("majorDimension", "ROWS")
            .append_pair("valueRenderOption", self.value_render.as_api_str());
        url
    }

    async fn get(&self, url: Url) -> Result<Response> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).bearer_auth(&self.token).send().await?;
        tracing::debug!("API response status: {}", response.status());
        Ok(response)
    }
}

/// Wraps a sheet title as an A1 range naming the whole sheet.
pub fn quote_sheet_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// Maps a non-success response to an error. 404 is left to the caller since
/// its meaning depends on the request.
async fn error_for_status(response: Response) -> ExportError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|b| b.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ExportError::AuthError {
            message: format!("request was rejected ({}): {}", status, message),
        },
        _ => ExportError::ApiStatusError {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl SheetSource for SheetsClient {
    async fn open_spreadsheet(&self, spreadsheet_id: &str) -> Result<Spreadsheet> {
        let response = self.get(self.metadata_url(spreadsheet_id)).await?;
        match response.status() {
            StatusCode::NOT_FOUND => {
                return Err(ExportError::SpreadsheetNotFound {
                    spreadsheet_id: spreadsheet_id.to_string(),
                })
            }
            s if !s.is_success() => return Err(error_for_status(response).await),
            _ => {}
        }

        let metadata: SpreadsheetMetadata = serde_json::from_slice(&response.bytes().await?)?;
        let worksheets = metadata
            .sheets
            .into_iter()
            .map(|entry| Worksheet {
                spreadsheet_id: metadata.spreadsheet_id.clone(),
                sheet_id: entry.properties.sheet_id,
                title: entry.properties.title,
                index: entry.properties.index,
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            "Spreadsheet '{}' has {} worksheet(s)",
            metadata.properties.title,
            worksheets.len()
        );

        Ok(Spreadsheet {
            id: metadata.spreadsheet_id,
            title: metadata.properties.title,
            worksheets,
        })
    }

    async fn open_worksheet(&self, spreadsheet: &Spreadsheet, title: &str) -> Result<Worksheet> {
        spreadsheet
            .worksheet(title)
            .cloned()
            .ok_or_else(|| ExportError::WorksheetNotFound {
                worksheet: title.to_string(),
                spreadsheet_id: spreadsheet.id.clone(),
            })
    }

    async fn fetch_all_records(&self, worksheet: &Worksheet) -> Result<Vec<Record>> {
        let response = self.get(self.values_url(worksheet)).await?;
        if !response.status().is_success() {
            return Err(error_for_status(response).await);
        }

        let range: ValueRange = serde_json::from_slice(&response.bytes().await?)?;
        tracing::debug!("Fetched {} raw row(s) including header", range.values.len());
        build_records(range.values, self.header_row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ErrorKind;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(base: &str) -> SheetsClient {
        let mut config = ExportConfig::new("{}", "sheet-123");
        config.api_base = base.to_string();
        SheetsClient::with_token(&config, "test-token").unwrap()
    }

    fn worksheet(title: &str) -> Worksheet {
        Worksheet {
            spreadsheet_id: "sheet-123".to_string(),
            sheet_id: 0,
            title: title.to_string(),
            index: 0,
        }
    }

    struct FixedToken(std::result::Result<&'static str, &'static str>);

    #[async_trait]
    impl TokenProvider for FixedToken {
        async fn access_token(&self) -> Result<String> {
            self.0
                .map(str::to_string)
                .map_err(|message| ExportError::AuthError {
                    message: message.to_string(),
                })
        }
    }

    #[tokio::test]
    async fn test_connect_uses_issued_token() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v4/spreadsheets/sheet-123")
                .header("authorization", "Bearer issued-token");
            then.status(200).json_body(json!({
                "spreadsheetId": "sheet-123",
                "properties": {"title": "Budget"},
                "sheets": []
            }));
        });

        let mut config = ExportConfig::new("{}", "sheet-123");
        config.api_base = server.base_url();
        let c = SheetsClient::connect(&config, &FixedToken(Ok("issued-token")))
            .await
            .unwrap();
        c.open_spreadsheet("sheet-123").await.unwrap();

        mock.assert();
    }

    #[tokio::test]
    async fn test_connect_token_rejection_sends_no_sheet_request() {
        let server = MockServer::start();
        let any = server.mock(|when, then| {
            when.path_contains("/");
            then.status(200);
        });

        let mut config = ExportConfig::new("{}", "sheet-123");
        config.api_base = server.base_url();
        let err = SheetsClient::connect(&config, &FixedToken(Err("invalid_grant")))
            .await
            .err()
            .unwrap();

        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert!(err.to_string().contains("invalid_grant"));
        any.assert_hits(0);
    }

    #[test]
    fn test_quote_sheet_title() {
        assert_eq!(quote_sheet_title("Sheet1"), "'Sheet1'");
        assert_eq!(quote_sheet_title("Bob's data"), "'Bob''s data'");
    }

    #[test]
    fn test_values_url_encodes_title() {
        let c = client("https://sheets.googleapis.com");
        let url = c.values_url(&worksheet("Q3 / Sales"));
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-123/values/'Q3%20%2F%20Sales'\
             ?majorDimension=ROWS&valueRenderOption=FORMATTED_VALUE"
        );
    }

    #[test]
    fn test_base_with_path_prefix() {
        let c = client("http://localhost:9000/proxy");
        let url = c.metadata_url("abc");
        assert!(url.as_str().starts_with("http://localhost:9000/proxy/v4/spreadsheets/abc?fields="));
    }

    #[tokio::test]
    async fn test_open_spreadsheet_lists_worksheets() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v4/spreadsheets/sheet-123")
                .header("authorization", "Bearer test-token");
            then.status(200).json_body(json!({
                "spreadsheetId": "sheet-123",
                "properties": {"title": "Budget"},
                "sheets": [
                    {"properties": {"sheetId": 0, "title": "Sheet1", "index": 0}},
                    {"properties": {"sheetId": 77, "title": "Archive", "index": 1}}
                ]
            }));
        });

        let c = client(&server.base_url());
        let spreadsheet = c.open_spreadsheet("sheet-123").await.unwrap();

        mock.assert();
        assert_eq!(spreadsheet.title, "Budget");
        assert_eq!(spreadsheet.worksheets.len(), 2);

        let ws = c.open_worksheet(&spreadsheet, "Archive").await.unwrap();
        assert_eq!(ws.sheet_id, 77);

        let err = c.open_worksheet(&spreadsheet, "archive").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WorksheetNotFound);
    }

    #[tokio::test]
    async fn test_open_spreadsheet_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v4/spreadsheets/missing");
            then.status(404).json_body(json!({
                "error": {"code": 404, "message": "Requested entity was not found.", "status": "NOT_FOUND"}
            }));
        });

        let err = client(&server.base_url())
            .open_spreadsheet("missing")
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::SpreadsheetNotFound { ref spreadsheet_id } if spreadsheet_id == "missing"));
    }

    #[tokio::test]
    async fn test_forbidden_is_auth_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v4/spreadsheets/locked");
            then.status(403).json_body(json!({
                "error": {"code": 403, "message": "The caller does not have permission", "status": "PERMISSION_DENIED"}
            }));
        });

        let err = client(&server.base_url())
            .open_spreadsheet("locked")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert!(err.to_string().contains("does not have permission"));
    }

    #[tokio::test]
    async fn test_fetch_all_records() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v4/spreadsheets/sheet-123/values/'Sheet1'")
                .query_param("valueRenderOption", "FORMATTED_VALUE");
            then.status(200).json_body(json!({
                "range": "Sheet1!A1:Z1000",
                "majorDimension": "ROWS",
                "values": [["name", "qty"], ["apple", "3"], ["pear"]]
            }));
        });

        let records = client(&server.base_url())
            .fetch_all_records(&worksheet("Sheet1"))
            .await
            .unwrap();

        mock.assert();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("qty"), Some("3"));
        assert_eq!(records[1].get("qty"), Some(""));
    }

    #[tokio::test]
    async fn test_fetch_empty_sheet() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v4/spreadsheets/sheet-123/values/'Sheet1'");
            then.status(200).json_body(json!({
                "range": "Sheet1!A1:Z1000",
                "majorDimension": "ROWS"
            }));
        });

        let records = client(&server.base_url())
            .fetch_all_records(&worksheet("Sheet1"))
            .await
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_server_error_is_transport() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v4/spreadsheets/sheet-123/values/'Sheet1'");
            then.status(500).body("backend unavailable");
        });

        let err = client(&server.base_url())
            .fetch_all_records(&worksheet("Sheet1"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(matches!(err, ExportError::ApiStatusError { status: 500, .. }));
    }
}
