use derive_more::{Display, Error};

use crate::sheets::GatewayError;

/// Why a submission was not persisted. Everything here is surfaced to the
/// caller exactly once and converted to the uniform `{success: false}`
/// response at the HTTP boundary; nothing is retried.
#[derive(Debug, Display, Error)]
pub enum SubmitError {
    #[display(fmt = "{} must not be empty", field)]
    MissingField { field: &'static str },

    #[display(fmt = "invalid time {:?}, expected HH:MM", value)]
    InvalidTime { value: String },

    #[display(fmt = "{} not found in the spreadsheet", subject)]
    Lookup { subject: String },

    #[display(fmt = "failed to persist record: {}", source)]
    Persistence { source: GatewayError },
}
