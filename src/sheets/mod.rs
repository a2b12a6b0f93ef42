mod gateway;
mod google;
mod token;

#[cfg(test)]
pub mod fake;

pub use gateway::{GatewayError, SpreadsheetGateway};
pub use google::GoogleSheetsGateway;
