//! Process-wide time source, abstracted so due-date stamping and the monthly
//! trigger boundary are testable.

use chrono::{Local, NaiveDate, NaiveDateTime};

pub trait Clock {
    fn today(&self) -> NaiveDate;
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock pinned to a single date, for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }

    fn now(&self) -> NaiveDateTime {
        self.0.and_hms_opt(12, 0, 0).expect("noon is a valid time")
    }
}
