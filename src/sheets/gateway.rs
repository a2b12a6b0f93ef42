use async_trait::async_trait;
use chrono::NaiveDate;
use derive_more::{Display, Error};

/// Failure surfaced by a spreadsheet backend. Callers treat every variant
/// as a generic persistence failure; nothing here is retried.
#[derive(Debug, Display, Error)]
pub enum GatewayError {
    #[display(fmt = "sheets api returned {}: {}", status, message)]
    Api { status: u16, message: String },

    #[display(fmt = "sheets request failed: {}", source)]
    Transport { source: reqwest::Error },

    #[display(fmt = "could not obtain an access token: {}", message)]
    Auth { message: String },
}

impl From<reqwest::Error> for GatewayError {
    fn from(source: reqwest::Error) -> Self {
        GatewayError::Transport { source }
    }
}

/// Vendor-facing spreadsheet operations. Row and column indices are
/// 0-based positions within the attendance grid.
#[async_trait]
pub trait SpreadsheetGateway: Send + Sync {
    /// Column holding the given day, if the day is tracked at all.
    async fn find_column_for_date(&self, date: NaiveDate) -> Result<Option<usize>, GatewayError>;

    /// Row whose first cell matches the driver name exactly.
    async fn find_row_for_name(&self, name: &str) -> Result<Option<usize>, GatewayError>;

    /// Overwrite a single cell of the attendance grid.
    async fn write_cell(&self, row: usize, column: usize, value: &str)
    -> Result<(), GatewayError>;

    /// Append one row to the named tab.
    async fn append_row(&self, sheet: &str, values: Vec<String>) -> Result<(), GatewayError>;

    /// Create the named tab with a header row when it does not exist yet.
    async fn ensure_sheet_exists(&self, sheet: &str, headers: &[&str])
    -> Result<(), GatewayError>;
}
