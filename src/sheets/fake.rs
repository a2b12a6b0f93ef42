use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use super::gateway::{GatewayError, SpreadsheetGateway};

/// One recorded vendor call, in submission order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FindColumn(NaiveDate),
    FindRow(String),
    Write {
        row: usize,
        column: usize,
        value: String,
    },
    Append {
        sheet: String,
        values: Vec<String>,
    },
    Ensure {
        sheet: String,
    },
}

/// Scripted in-memory gateway that records every vendor call.
#[derive(Default)]
pub struct FakeGateway {
    pub date_column: Option<usize>,
    pub name_rows: Vec<(String, usize)>,
    pub fail_writes: bool,
    pub calls: Mutex<Vec<Call>>,
}

impl FakeGateway {
    /// A grid where today lives in `date_column` and each `(name, row)`
    /// pair is present in column A.
    pub fn with_roster(date_column: usize, names: &[(&str, usize)]) -> Self {
        Self {
            date_column: Some(date_column),
            name_rows: names.iter().map(|(n, r)| (n.to_string(), *r)).collect(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn write_failure() -> GatewayError {
        GatewayError::Api {
            status: 500,
            message: "backend unavailable".to_string(),
        }
    }
}

#[async_trait]
impl SpreadsheetGateway for FakeGateway {
    async fn find_column_for_date(&self, date: NaiveDate) -> Result<Option<usize>, GatewayError> {
        self.record(Call::FindColumn(date));
        Ok(self.date_column)
    }

    async fn find_row_for_name(&self, name: &str) -> Result<Option<usize>, GatewayError> {
        self.record(Call::FindRow(name.to_string()));
        Ok(self
            .name_rows
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, r)| *r))
    }

    async fn write_cell(
        &self,
        row: usize,
        column: usize,
        value: &str,
    ) -> Result<(), GatewayError> {
        self.record(Call::Write {
            row,
            column,
            value: value.to_string(),
        });
        if self.fail_writes {
            return Err(Self::write_failure());
        }
        Ok(())
    }

    async fn append_row(&self, sheet: &str, values: Vec<String>) -> Result<(), GatewayError> {
        self.record(Call::Append {
            sheet: sheet.to_string(),
            values,
        });
        if self.fail_writes {
            return Err(Self::write_failure());
        }
        Ok(())
    }

    async fn ensure_sheet_exists(
        &self,
        sheet: &str,
        _headers: &[&str],
    ) -> Result<(), GatewayError> {
        self.record(Call::Ensure {
            sheet: sheet.to_string(),
        });
        Ok(())
    }
}
