use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use once_cell::sync::Lazy;
use serde::Serialize;

/// Latest clock-in that still counts as on time.
static LATE_CUTOFF: Lazy<NaiveTime> =
    Lazy::new(|| NaiveTime::from_hms_opt(9, 15, 0).unwrap());

/// Wall-clock "HH:MM" value as submitted by the form's time input.
///
/// Only the hour and minute are compared, so a check-in entered after
/// midnight reads as earlier than the cutoff (no day-rollover handling).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime(NaiveTime);

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display(fmt = "expected a 24-hour HH:MM time")]
pub struct InvalidClockTime;

impl FromStr for ClockTime {
    type Err = InvalidClockTime;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // %H:%M alone would also accept single-digit hours
        if s.len() != 5 {
            return Err(InvalidClockTime);
        }
        NaiveTime::parse_from_str(s, "%H:%M")
            .map(ClockTime)
            .map_err(|_| InvalidClockTime)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl Serialize for ClockTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Cell code written into the day's attendance column.
///
/// Excused/unexcused absence codes (E/U) are entered in the sheet by hand;
/// the form only ever produces P or L.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
pub enum AttendanceStatus {
    #[strum(serialize = "P")]
    Present,
    #[strum(serialize = "L")]
    Late,
}

/// Classify a submitted clock-in. Strictly after 09:15 is late; the cutoff
/// itself is on time.
pub fn derive_status(time: ClockTime) -> AttendanceStatus {
    if time.0 > *LATE_CUTOFF {
        AttendanceStatus::Late
    } else {
        AttendanceStatus::Present
    }
}
