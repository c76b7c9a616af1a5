//! Campaign calendar: day/seconds-of-day arithmetic
//!
//! A `Date` is an absolute day count plus seconds into that day. The
//! seconds field is always kept in `[0, 86400)`; arithmetic carries
//! overflow into the day field. The calendar year is a fixed 365 days
//! with no leap adjustment.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::{DAYS_PER_YEAR, SECONDS_PER_DAY};

/// Length of each month in the fixed display calendar
const MONTH_LENGTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

const MONTH_NAME: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// An instant of campaign time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Date {
    /// Absolute day count since campaign epoch
    #[serde(default)]
    pub day: u32,
    /// Seconds into the day, in `[0, 86400)`
    #[serde(default)]
    pub sec: u32,
}

impl Date {
    pub fn new(day: u32, sec: u32) -> Self {
        Self { day, sec }.normalized()
    }

    /// Carry any whole days in `sec` into `day`
    fn normalized(mut self) -> Self {
        self.day += self.sec / SECONDS_PER_DAY;
        self.sec %= SECONDS_PER_DAY;
        self
    }

    /// Sum of two dates, renormalized
    pub fn add(self, other: Date) -> Date {
        Date {
            day: self.day + other.day,
            sec: self.sec + other.sec,
        }
        .normalized()
    }

    /// Strict lexicographic day-then-seconds comparison
    pub fn later_than(self, other: Date) -> bool {
        if self.day != other.day {
            return self.day > other.day;
        }
        self.sec > other.sec
    }

    /// Uniformly random instant inside `[zero, self)`, treating self as
    /// a time window. Used to jitter scripted event timing.
    pub fn random_within<R: Rng>(self, rng: &mut R) -> Date {
        let window = self.day as u64 * SECONDS_PER_DAY as u64 + self.sec as u64;
        if window == 0 {
            return Date::default();
        }
        let total = rng.gen_range(0..window);
        Date {
            day: (total / SECONDS_PER_DAY as u64) as u32,
            sec: (total % SECONDS_PER_DAY as u64) as u32,
        }
    }

    /// Day-of-month (1-based) and month index (0-based) for display.
    ///
    /// The absolute day count is folded into a 365-day year and walked
    /// through the fixed month table.
    pub fn day_in_month(self) -> (u32, usize) {
        let mut d = self.day % DAYS_PER_YEAR;
        let mut month = 0;
        while d >= MONTH_LENGTH[month] {
            d -= MONTH_LENGTH[month];
            month += 1;
        }
        (d + 1, month)
    }

    /// Year count since campaign epoch
    pub fn year(self) -> u32 {
        self.day / DAYS_PER_YEAR
    }

    /// Hour of day, 0-23
    pub fn hour(self) -> u32 {
        self.sec / 3600
    }

    /// Minute of hour, 0-59
    pub fn minute(self) -> u32 {
        (self.sec % 3600) / 60
    }

    /// True if this date carries any time at all. Definition fields use
    /// a zero date to mean "unset".
    pub fn is_set(self) -> bool {
        self.day != 0 || self.sec != 0
    }
}

/// Abbreviated month name for a month index from [`Date::day_in_month`]
pub fn month_name(month: usize) -> &'static str {
    MONTH_NAME[month]
}
