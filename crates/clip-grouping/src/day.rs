//! Grouping of clips into calendar days.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::{CalendarContext, Clock};
use crate::record::{Coordinate, MediaRecord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayBucket {
    /// Local calendar day shared by every asset
    pub day: NaiveDate,
    /// Start of `day` in the grouping time zone
    pub date: DateTime<Utc>,
    /// Assets in library fetch order
    pub assets: Vec<MediaRecord>,
}

impl DayBucket {
    /// Mean coordinate of the geotagged assets; `None` when no asset is geotagged
    pub fn centroid(&self) -> Option<Coordinate> {
        Coordinate::mean(self.assets.iter().filter_map(MediaRecord::coordinate))
    }

    pub fn geotagged_count(&self) -> usize {
        self.assets.iter().filter(|a| a.is_geotagged()).count()
    }

    /// Combined length of every clip recorded that day
    pub fn duration_seconds(&self) -> f64 {
        self.assets.iter().map(|a| a.duration_seconds).sum()
    }

    pub fn asset_ids(&self) -> Vec<&str> {
        self.assets.iter().map(|a| a.id.as_str()).collect()
    }

    /// Assets ordered by capture time, oldest first. Undated assets keep
    /// their relative order at the end.
    pub fn chronological(&self) -> Vec<&MediaRecord> {
        let mut ordered: Vec<&MediaRecord> = self.assets.iter().collect();
        ordered.sort_by_key(|a| (a.created_at.is_none(), a.created_at));
        ordered
    }
}

/// Group records by the local calendar day of their creation time.
///
/// Records without a creation time are placed on the day containing
/// `clock.now()`, read once per call. Buckets are returned newest day first.
pub fn group_by_day<Tz: TimeZone>(
    records: &[MediaRecord],
    calendar: &CalendarContext<Tz>,
    clock: &dyn Clock,
) -> Vec<DayBucket> {
    let now = clock.now();
    let mut days: BTreeMap<NaiveDate, Vec<MediaRecord>> = BTreeMap::new();

    for record in records {
        let instant = record.created_at.unwrap_or(now);
        days.entry(calendar.local_day(&instant))
            .or_default()
            .push(record.clone());
    }

    days.into_iter()
        .rev()
        .map(|(day, assets)| {
            let date = calendar.start_of_day(day).unwrap_or_else(|| {
                tracing::debug!(%day, "no local start of day, falling back to UTC midnight");
                day.and_time(NaiveTime::MIN).and_utc()
            });
            DayBucket { day, date, assets }
        })
        .collect()
}
