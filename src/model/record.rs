use serde::Serialize;

use crate::model::status::{AttendanceStatus, ClockTime};

/// A single check-in/check-out destined for the day's attendance column.
/// Immutable once created; the status is always derived from the time.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceRecord {
    pub name: String,
    pub time: ClockTime,
    pub status: AttendanceStatus,
}

/// An off-site visit, appended verbatim to the site-visit sheet.
#[derive(Debug, Clone, Serialize)]
pub struct SiteVisitRecord {
    pub driver_name: String,
    pub location: String,
    pub purpose: String,
    pub visit_time: ClockTime,
}

impl SiteVisitRecord {
    /// Row layout: Driver Name | Location | Purpose | Visit Time.
    pub fn row_values(&self) -> Vec<String> {
        vec![
            self.driver_name.clone(),
            self.location.clone(),
            self.purpose.clone(),
            self.visit_time.to_string(),
        ]
    }
}
