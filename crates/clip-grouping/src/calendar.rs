//! Calendar conventions and clock used to place clips on days and months.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc, Weekday};

/// Source of "now" for clips that carry no creation date
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant, for reproducible grouping
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Time zone plus the locale's first day of the week
#[derive(Debug, Clone)]
pub struct CalendarContext<Tz: TimeZone> {
    pub timezone: Tz,
    pub first_weekday: Weekday,
}

impl CalendarContext<Utc> {
    /// UTC days, weeks starting on Sunday
    pub fn utc() -> Self {
        Self::new(Utc, Weekday::Sun)
    }
}

impl<Tz: TimeZone> CalendarContext<Tz> {
    pub fn new(timezone: Tz, first_weekday: Weekday) -> Self {
        Self {
            timezone,
            first_weekday,
        }
    }

    /// Calendar day containing `instant` in this time zone
    pub fn local_day(&self, instant: &DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.timezone).date_naive()
    }

    /// First instant of `day` in this time zone.
    ///
    /// Zones that skip midnight on a transition day start at the first hour
    /// that exists locally. `None` only if no hour of the day resolves.
    pub fn start_of_day(&self, day: NaiveDate) -> Option<DateTime<Utc>> {
        (0..24)
            .find_map(|hour| {
                let local = day.and_hms_opt(hour, 0, 0)?;
                self.timezone.from_local_datetime(&local).earliest()
            })
            .map(|start| start.with_timezone(&Utc))
    }

    /// Empty grid cells before day 1 in a seven-column month grid, in 0..=6
    pub fn leading_blank_cells(&self, first_of_month: NaiveDate) -> u32 {
        let weekday = first_of_month.weekday().num_days_from_sunday();
        let first = self.first_weekday.num_days_from_sunday();
        (weekday + 7 - first) % 7
    }
}

/// Number of days in the given month, `None` for an invalid year/month
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from(next.signed_duration_since(first).num_days()).ok()
}
