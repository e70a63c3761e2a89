//! Month sections for the calendar grid view.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::{days_in_month, CalendarContext};
use crate::day::DayBucket;
use crate::record::MediaRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthSection {
    pub year: i32,
    /// 1-based month
    pub month: u32,
    /// Start of the first day of the month in the grouping time zone
    pub first_day: DateTime<Utc>,
    pub number_of_days: u32,
    /// Empty cells before day 1, always in 0..=6
    pub leading_blank_cells: u32,
    /// Day of month (1..=number_of_days) to that day's assets
    pub assets_by_day: BTreeMap<u32, Vec<MediaRecord>>,
}

impl MonthSection {
    /// Cells needed for a seven-column grid, without trailing padding
    pub fn total_cells(&self) -> u32 {
        self.leading_blank_cells + self.number_of_days
    }

    pub fn asset_count(&self) -> usize {
        self.assets_by_day.values().map(Vec::len).sum()
    }

    pub fn assets_on(&self, day_of_month: u32) -> &[MediaRecord] {
        self.assets_by_day
            .get(&day_of_month)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Build one section per month that has at least one day bucket, newest first.
///
/// A month whose first day or length cannot be resolved in the calendar is
/// skipped; the remaining months are still returned.
pub fn build_month_sections<Tz: TimeZone>(
    buckets: &[DayBucket],
    calendar: &CalendarContext<Tz>,
) -> Vec<MonthSection> {
    let mut months: HashMap<(i32, u32), Vec<&DayBucket>> = HashMap::new();
    for bucket in buckets {
        months.entry((bucket.day.year(), bucket.day.month()))
            .or_default()
            .push(bucket);
    }

    let mut sections: Vec<MonthSection> = months
        .into_iter()
        .filter_map(|((year, month), days)| build_section(year, month, &days, calendar))
        .collect();

    sections.sort_by(|a, b| b.first_day.cmp(&a.first_day));
    sections
}

fn build_section<Tz: TimeZone>(
    year: i32,
    month: u32,
    days: &[&DayBucket],
    calendar: &CalendarContext<Tz>,
) -> Option<MonthSection> {
    let resolved = NaiveDate::from_ymd_opt(year, month, 1).and_then(|first| {
        let first_day = calendar.start_of_day(first)?;
        let number_of_days = days_in_month(year, month)?;
        Some((first, first_day, number_of_days))
    });

    let Some((first, first_day, number_of_days)) = resolved else {
        tracing::debug!(year, month, "skipping month with unresolvable calendar data");
        return None;
    };

    let mut assets_by_day: BTreeMap<u32, Vec<MediaRecord>> = BTreeMap::new();
    for bucket in days {
        assets_by_day
            .entry(bucket.day.day())
            .or_default()
            .extend(bucket.assets.iter().cloned());
    }

    Some(MonthSection {
        year,
        month,
        first_day,
        number_of_days,
        leading_blank_cells: calendar.leading_blank_cells(first),
        assets_by_day,
    })
}
