use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::gateway::{GatewayError, SpreadsheetGateway};
use super::token::TokenProvider;
use crate::config::Config;

const SHEETS_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Google Sheets v4 REST client. The attendance grid lives on one tab
/// (names down column A, dates across the third header row); site visits
/// go to their own append-only tab.
pub struct GoogleSheetsGateway {
    http: reqwest::Client,
    tokens: TokenProvider,
    spreadsheet_id: String,
    attendance_sheet: String,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Header cells carry dates as `M/D`, no zero padding.
fn format_sheet_date(date: NaiveDate) -> String {
    format!("{}/{}", date.month(), date.day())
}

/// A1 column letter. The tracked grid never grows past column Z.
fn column_letter(index: usize) -> Result<char, GatewayError> {
    if index >= 26 {
        return Err(GatewayError::Api {
            status: 400,
            message: format!("column {} is outside the tracked A..Z range", index),
        });
    }
    Ok((b'A' + index as u8) as char)
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(GatewayError::Api {
        status: status.as_u16(),
        message,
    })
}

impl GoogleSheetsGateway {
    pub fn new(http: reqwest::Client, config: &Config) -> Result<Self, GatewayError> {
        let tokens = TokenProvider::new(
            http.clone(),
            config.google_client_email.clone(),
            &config.google_private_key,
        )?;
        Ok(Self {
            http,
            tokens,
            spreadsheet_id: config.spreadsheet_id.clone(),
            attendance_sheet: config.attendance_sheet.clone(),
        })
    }

    /// Mint a token ahead of the first submission.
    pub async fn warmup(&self) -> Result<(), GatewayError> {
        self.tokens.access_token().await.map(|_| ())
    }

    async fn get_values(&self, range: &str) -> Result<Vec<Vec<String>>, GatewayError> {
        let token = self.tokens.access_token().await?;
        let url = format!("{}/{}/values/{}", SHEETS_BASE, self.spreadsheet_id, range);
        let response = self.http.get(&url).bearer_auth(&token).send().await?;
        let response = check_status(response).await?;
        let body: ValueRange = response.json().await?;
        Ok(body.values)
    }
}

#[async_trait]
impl SpreadsheetGateway for GoogleSheetsGateway {
    async fn find_column_for_date(&self, date: NaiveDate) -> Result<Option<usize>, GatewayError> {
        let range = format!("{}!A1:Z3", self.attendance_sheet);
        let rows = self.get_values(&range).await?;
        // Dates live in the third header row.
        let header = match rows.get(2) {
            Some(row) => row,
            None => return Ok(None),
        };
        let wanted = format_sheet_date(date);
        Ok(header.iter().position(|cell| cell == &wanted))
    }

    async fn find_row_for_name(&self, name: &str) -> Result<Option<usize>, GatewayError> {
        let range = format!("{}!A:A", self.attendance_sheet);
        let rows = self.get_values(&range).await?;
        Ok(rows
            .iter()
            .position(|row| row.first().map(String::as_str) == Some(name)))
    }

    async fn write_cell(
        &self,
        row: usize,
        column: usize,
        value: &str,
    ) -> Result<(), GatewayError> {
        let token = self.tokens.access_token().await?;
        let range = format!(
            "{}!{}{}",
            self.attendance_sheet,
            column_letter(column)?,
            row + 1
        );
        let url = format!(
            "{}/{}/values/{}?valueInputOption=USER_ENTERED",
            SHEETS_BASE, self.spreadsheet_id, range
        );
        let response = self
            .http
            .put(&url)
            .bearer_auth(&token)
            .json(&json!({ "values": [[value]] }))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn append_row(&self, sheet: &str, values: Vec<String>) -> Result<(), GatewayError> {
        let token = self.tokens.access_token().await?;
        let last = column_letter(values.len().saturating_sub(1))?;
        let url = format!(
            "{}/{}/values/{}!A:{}:append?valueInputOption=USER_ENTERED&insertDataOption=INSERT_ROWS",
            SHEETS_BASE, self.spreadsheet_id, sheet, last
        );
        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .json(&json!({ "values": [values] }))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn ensure_sheet_exists(
        &self,
        sheet: &str,
        headers: &[&str],
    ) -> Result<(), GatewayError> {
        let token = self.tokens.access_token().await?;
        let url = format!("{}/{}:batchUpdate", SHEETS_BASE, self.spreadsheet_id);
        let body = json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": sheet,
                        "gridProperties": { "rowCount": 1000, "columnCount": 26 }
                    }
                }
            }]
        });
        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            // The API rejects addSheet when the tab is already there.
            debug!(sheet, "addSheet rejected, assuming the tab exists");
            return Ok(());
        }

        let last = column_letter(headers.len().saturating_sub(1))?;
        let range = format!("{}!A1:{}1", sheet, last);
        let url = format!(
            "{}/{}/values/{}?valueInputOption=USER_ENTERED",
            SHEETS_BASE, self.spreadsheet_id, range
        );
        let response = self
            .http
            .put(&url)
            .bearer_auth(&token)
            .json(&json!({ "values": [headers] }))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}
