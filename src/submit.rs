use std::sync::Arc;

use chrono::Local;
use tracing::info;

use crate::errors::SubmitError;
use crate::model::record::{AttendanceRecord, SiteVisitRecord};
use crate::model::status::{ClockTime, derive_status};
use crate::sheets::SpreadsheetGateway;

/// Header row written when the site-visit tab is first created.
pub const SITE_VISIT_HEADERS: [&str; 4] = ["Driver Name", "Location", "Purpose", "Visit Time"];

/// Submission acknowledgement. Carries nothing beyond success itself.
#[derive(Debug, Clone, Copy)]
pub struct Ack;

/// Validates a record and forwards it to the spreadsheet backend.
/// One persistence attempt per call; a failure is surfaced once.
#[derive(Clone)]
pub struct RecordSubmitter {
    gateway: Arc<dyn SpreadsheetGateway>,
    site_visit_sheet: String,
}

impl RecordSubmitter {
    pub fn new(gateway: Arc<dyn SpreadsheetGateway>, site_visit_sheet: impl Into<String>) -> Self {
        Self {
            gateway,
            site_visit_sheet: site_visit_sheet.into(),
        }
    }

    /// Derive the attendance status from the submitted time and write it
    /// into today's column next to the driver's name.
    pub async fn submit_attendance(&self, name: &str, time: &str) -> Result<Ack, SubmitError> {
        let time = parse_time(time)?;
        let record = AttendanceRecord {
            name: required(name, "name")?,
            time,
            status: derive_status(time),
        };

        let today = Local::now().date_naive();
        let column = self
            .gateway
            .find_column_for_date(today)
            .await
            .map_err(|source| SubmitError::Persistence { source })?
            .ok_or_else(|| SubmitError::Lookup {
                subject: "today's date".to_string(),
            })?;

        let row = self
            .gateway
            .find_row_for_name(&record.name)
            .await
            .map_err(|source| SubmitError::Persistence { source })?
            .ok_or_else(|| SubmitError::Lookup {
                subject: format!("driver {:?}", record.name),
            })?;

        self.gateway
            .write_cell(row, column, &record.status.to_string())
            .await
            .map_err(|source| SubmitError::Persistence { source })?;

        info!(name = %record.name, time = %record.time, status = %record.status, "attendance recorded");
        Ok(Ack)
    }

    /// Append the visit verbatim to the site-visit tab, creating the tab
    /// on first use.
    pub async fn submit_site_visit(
        &self,
        driver_name: &str,
        location: &str,
        purpose: &str,
        visit_time: &str,
    ) -> Result<Ack, SubmitError> {
        let record = SiteVisitRecord {
            driver_name: required(driver_name, "driver name")?,
            location: required(location, "location")?,
            purpose: required(purpose, "purpose")?,
            visit_time: parse_time(visit_time)?,
        };

        self.gateway
            .ensure_sheet_exists(&self.site_visit_sheet, &SITE_VISIT_HEADERS)
            .await
            .map_err(|source| SubmitError::Persistence { source })?;

        self.gateway
            .append_row(&self.site_visit_sheet, record.row_values())
            .await
            .map_err(|source| SubmitError::Persistence { source })?;

        info!(driver = %record.driver_name, location = %record.location, "site visit recorded");
        Ok(Ack)
    }
}

fn required(value: &str, field: &'static str) -> Result<String, SubmitError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(SubmitError::MissingField { field });
    }
    Ok(value.to_string())
}

fn parse_time(value: &str) -> Result<ClockTime, SubmitError> {
    value.trim().parse().map_err(|_| SubmitError::InvalidTime {
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::fake::{Call, FakeGateway};

    fn submitter(gateway: Arc<FakeGateway>) -> RecordSubmitter {
        RecordSubmitter::new(gateway, "Site Visits")
    }

    #[actix_web::test]
    async fn on_time_attendance_writes_p() {
        let gateway = Arc::new(FakeGateway::with_roster(4, &[("Alex", 7)]));
        let result = submitter(gateway.clone())
            .submit_attendance("Alex", "08:50")
            .await;
        assert!(result.is_ok());

        let calls = gateway.calls();
        assert!(matches!(
            calls.last(),
            Some(Call::Write { row: 7, column: 4, value }) if value.as_str() == "P"
        ));
    }

    #[actix_web::test]
    async fn late_attendance_writes_l() {
        let gateway = Arc::new(FakeGateway::with_roster(2, &[("Jordan", 3)]));
        submitter(gateway.clone())
            .submit_attendance("Jordan", "09:30")
            .await
            .unwrap();

        let calls = gateway.calls();
        assert!(matches!(
            calls.last(),
            Some(Call::Write { row: 3, column: 2, value }) if value.as_str() == "L"
        ));
    }

    #[actix_web::test]
    async fn unknown_driver_writes_nothing() {
        let gateway = Arc::new(FakeGateway::with_roster(2, &[]));
        let err = submitter(gateway.clone())
            .submit_attendance("Jordan", "08:00")
            .await
            .unwrap_err();

        assert!(matches!(err, SubmitError::Lookup { .. }));
        let calls = gateway.calls();
        assert!(!calls.iter().any(|c| matches!(c, Call::Write { .. })));
    }

    #[actix_web::test]
    async fn untracked_date_short_circuits() {
        let gateway = Arc::new(FakeGateway {
            date_column: None,
            ..FakeGateway::default()
        });
        let err = submitter(gateway.clone())
            .submit_attendance("Alex", "08:00")
            .await
            .unwrap_err();

        assert!(matches!(err, SubmitError::Lookup { .. }));
        assert_eq!(gateway.calls().len(), 1);
    }

    #[actix_web::test]
    async fn validation_happens_before_any_vendor_call() {
        let gateway = Arc::new(FakeGateway::with_roster(0, &[("Alex", 1)]));
        let sub = submitter(gateway.clone());

        assert!(matches!(
            sub.submit_attendance("   ", "08:00").await.unwrap_err(),
            SubmitError::MissingField { field: "name" }
        ));
        assert!(matches!(
            sub.submit_attendance("Alex", "8 am").await.unwrap_err(),
            SubmitError::InvalidTime { .. }
        ));
        assert!(matches!(
            sub.submit_site_visit("Sam", "Depot 3", "", "13:00")
                .await
                .unwrap_err(),
            SubmitError::MissingField { field: "purpose" }
        ));

        assert!(gateway.calls().is_empty());
    }

    #[actix_web::test]
    async fn site_visit_is_appended_verbatim() {
        let gateway = Arc::new(FakeGateway::default());
        submitter(gateway.clone())
            .submit_site_visit("Sam", "Depot 3", "Delivery", "13:00")
            .await
            .unwrap();

        assert_eq!(
            gateway.calls(),
            vec![
                Call::Ensure {
                    sheet: "Site Visits".to_string()
                },
                Call::Append {
                    sheet: "Site Visits".to_string(),
                    values: vec![
                        "Sam".to_string(),
                        "Depot 3".to_string(),
                        "Delivery".to_string(),
                        "13:00".to_string(),
                    ],
                },
            ]
        );
    }

    #[actix_web::test]
    async fn failed_write_is_not_retried() {
        let gateway = Arc::new(FakeGateway {
            fail_writes: true,
            ..FakeGateway::with_roster(1, &[("Alex", 2)])
        });
        let err = submitter(gateway.clone())
            .submit_attendance("Alex", "09:00")
            .await
            .unwrap_err();

        assert!(matches!(err, SubmitError::Persistence { .. }));
        let writes = gateway
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::Write { .. }))
            .count();
        assert_eq!(writes, 1);
    }
}
