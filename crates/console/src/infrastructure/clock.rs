//! Clock implementations.

use chrono::{DateTime, Local};

use crate::infrastructure::ports::ClockPort;

/// System clock - uses real local time.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Fixed clock for testing.
#[cfg(test)]
pub struct FixedClock(pub DateTime<Local>);

#[cfg(test)]
impl FixedClock {
    /// Today at the given local time of day.
    pub fn at(h: u32, m: u32, s: u32) -> Self {
        use chrono::TimeZone;

        let naive = Local::now()
            .date_naive()
            .and_hms_opt(h, m, s)
            .expect("valid time of day");
        Self(Local.from_local_datetime(&naive).earliest().expect("representable local time"))
    }
}

#[cfg(test)]
impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}
