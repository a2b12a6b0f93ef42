//! Headless model of the submitting form: explicit state transitions
//! driving a view projection, independent of any rendering technology.
//! The busy flag keeps one submission in flight per form at a time.

use serde::Serialize;
use uuid::Uuid;

/// Which form is on screen. Check-in and check-out share the attendance
/// wire shape; only the marker sent in the third data slot differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTab {
    CheckIn,
    CheckOut,
    SiteVisit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum CheckDirection {
    #[strum(serialize = "in")]
    In,
    #[strum(serialize = "out")]
    Out,
}

/// Wire envelope a client dispatches for one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitPayload {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceEntry {
    pub id: String,
    pub name: String,
    pub time: String,
    pub direction: CheckDirection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteVisitEntry {
    pub id: String,
    pub driver_name: String,
    pub location: String,
    pub purpose: String,
    pub visit_time: String,
}

#[derive(Debug, Clone)]
enum PendingRecord {
    Attendance(AttendanceEntry),
    SiteVisit(SiteVisitEntry),
}

/// Outcome banner for the last finished submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone)]
pub enum FormEvent {
    TabSelected(FormTab),
    NameChanged(String),
    TimeChanged(String),
    LocationChanged(String),
    PurposeChanged(String),
    SubmitStarted,
    SubmitSucceeded,
    SubmitFailed(String),
}

/// Projection of the session log for the active tab.
#[derive(Debug)]
pub enum RecordsView<'a> {
    Attendance(&'a [AttendanceEntry]),
    SiteVisits(&'a [SiteVisitEntry]),
}

/// Form state plus the session's append-only record lists. The lists are
/// ordered by submission order and die with this value.
#[derive(Debug)]
pub struct FormState {
    tab: FormTab,
    name: String,
    time: String,
    location: String,
    purpose: String,
    busy: bool,
    pending: Option<PendingRecord>,
    attendance: Vec<AttendanceEntry>,
    site_visits: Vec<SiteVisitEntry>,
    notice: Option<Notice>,
}

impl FormState {
    pub fn new() -> Self {
        Self {
            tab: FormTab::CheckIn,
            name: String::new(),
            time: String::new(),
            location: String::new(),
            purpose: String::new(),
            busy: false,
            pending: None,
            attendance: Vec::new(),
            site_visits: Vec::new(),
            notice: None,
        }
    }

    /// Apply one transition. Returns the wire payload to dispatch when the
    /// event starts a submission; every other event returns `None`.
    pub fn apply(&mut self, event: FormEvent) -> Option<SubmitPayload> {
        match event {
            FormEvent::TabSelected(tab) => {
                self.tab = tab;
                None
            }
            FormEvent::NameChanged(value) => {
                self.name = value;
                None
            }
            FormEvent::TimeChanged(value) => {
                self.time = value;
                None
            }
            FormEvent::LocationChanged(value) => {
                self.location = value;
                None
            }
            FormEvent::PurposeChanged(value) => {
                self.purpose = value;
                None
            }
            FormEvent::SubmitStarted => self.start_submission(),
            FormEvent::SubmitSucceeded => {
                self.finish_success();
                None
            }
            FormEvent::SubmitFailed(reason) => {
                self.finish_failure(reason);
                None
            }
        }
    }

    fn start_submission(&mut self) -> Option<SubmitPayload> {
        // A second click while a request is pending is ignored.
        if self.busy {
            return None;
        }

        match self.tab {
            FormTab::CheckIn | FormTab::CheckOut => {
                if self.name.is_empty() || self.time.is_empty() {
                    return None;
                }
                let direction = if self.tab == FormTab::CheckIn {
                    CheckDirection::In
                } else {
                    CheckDirection::Out
                };
                let entry = AttendanceEntry {
                    id: Uuid::new_v4().to_string(),
                    name: self.name.clone(),
                    time: self.time.clone(),
                    direction,
                };
                // The third element is positional filler; the server
                // derives the real status from the time.
                let payload = SubmitPayload {
                    kind: "attendance",
                    data: vec![entry.name.clone(), entry.time.clone(), direction.to_string()],
                };
                self.pending = Some(PendingRecord::Attendance(entry));
                self.busy = true;
                Some(payload)
            }
            FormTab::SiteVisit => {
                if self.name.is_empty()
                    || self.time.is_empty()
                    || self.location.is_empty()
                    || self.purpose.is_empty()
                {
                    return None;
                }
                let entry = SiteVisitEntry {
                    id: Uuid::new_v4().to_string(),
                    driver_name: self.name.clone(),
                    location: self.location.clone(),
                    purpose: self.purpose.clone(),
                    visit_time: self.time.clone(),
                };
                let payload = SubmitPayload {
                    kind: "site-visit",
                    data: vec![
                        entry.driver_name.clone(),
                        entry.location.clone(),
                        entry.purpose.clone(),
                        entry.visit_time.clone(),
                    ],
                };
                self.pending = Some(PendingRecord::SiteVisit(entry));
                self.busy = true;
                Some(payload)
            }
        }
    }

    fn finish_success(&mut self) {
        self.busy = false;
        match self.pending.take() {
            Some(PendingRecord::Attendance(entry)) => {
                self.attendance.push(entry);
                self.name.clear();
                self.time.clear();
                self.notice = Some(Notice {
                    success: true,
                    message: "Attendance recorded successfully".to_string(),
                });
            }
            Some(PendingRecord::SiteVisit(entry)) => {
                self.site_visits.push(entry);
                self.name.clear();
                self.time.clear();
                self.location.clear();
                self.purpose.clear();
                self.notice = Some(Notice {
                    success: true,
                    message: "Site visit recorded successfully".to_string(),
                });
            }
            None => {}
        }
    }

    fn finish_failure(&mut self, reason: String) {
        // Fields stay populated so the driver can resubmit.
        self.busy = false;
        self.pending = None;
        self.notice = Some(Notice {
            success: false,
            message: reason,
        });
    }

    pub fn busy(&self) -> bool {
        self.busy
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn visible_records(&self) -> RecordsView<'_> {
        match self.tab {
            FormTab::SiteVisit => RecordsView::SiteVisits(&self.site_visits),
            _ => RecordsView::Attendance(&self.attendance),
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}
