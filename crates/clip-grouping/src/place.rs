//! Place clustering of geotagged days for the map view.
//!
//! Each day is reduced to the mean coordinate of its geotagged clips and
//! snapped onto a fixed grid of `resolution` degrees. Days sharing a grid
//! cell form one place. The grid is not corrected for latitude, so cells are
//! narrower in longitude away from the equator.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::day::DayBucket;
use crate::error::GroupingError;
use crate::record::{Coordinate, MediaRecord};

/// Roughly 100m of latitude
pub const DEFAULT_GRID_RESOLUTION_DEGREES: f64 = 0.001;

/// Integer grid cell, ordered by latitude then longitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridKey {
    pub lat: i64,
    pub lon: i64,
}

impl GridKey {
    pub fn for_coordinate(coordinate: Coordinate, scale: f64) -> Self {
        Self {
            lat: (coordinate.latitude * scale).round() as i64,
            lon: (coordinate.longitude * scale).round() as i64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCluster {
    pub key: GridKey,
    /// Member days, newest first
    pub days: Vec<DayBucket>,
    /// Mean of the member day centroids, each day weighted equally
    pub centroid: Coordinate,
}

impl PlaceCluster {
    pub fn most_recent_date(&self) -> Option<DateTime<Utc>> {
        self.days.first().map(|d| d.date)
    }

    /// Every clip of every member day, newest day first. Untagged clips
    /// recorded on a member day are included.
    pub fn assets(&self) -> impl Iterator<Item = &MediaRecord> {
        self.days.iter().flat_map(|d| d.assets.iter())
    }

    pub fn asset_count(&self) -> usize {
        self.days.iter().map(|d| d.assets.len()).sum()
    }
}

/// Cluster day buckets into places on a grid of `resolution_degrees`.
///
/// Days without a geotagged clip have no centroid and are left out.
/// Clusters are ordered by most recent member day, newest first, with the
/// grid key breaking ties, so the same input always yields the same output.
pub fn cluster_by_place(
    buckets: &[DayBucket],
    resolution_degrees: f64,
) -> Result<Vec<PlaceCluster>, GroupingError> {
    if !resolution_degrees.is_finite() || resolution_degrees <= 0.0 {
        return Err(GroupingError::InvalidGridResolution(resolution_degrees));
    }
    let scale = 1.0 / resolution_degrees;

    let mut cells: BTreeMap<GridKey, Vec<(&DayBucket, Coordinate)>> = BTreeMap::new();
    for bucket in buckets {
        let Some(centroid) = bucket.centroid() else {
            tracing::debug!(day = %bucket.day, "day has no geotagged clips, not clustered");
            continue;
        };
        cells.entry(GridKey::for_coordinate(centroid, scale))
            .or_default()
            .push((bucket, centroid));
    }

    let mut clusters: Vec<PlaceCluster> = cells
        .into_iter()
        .filter_map(|(key, mut members)| {
            members.sort_by(|(a, _), (b, _)| b.date.cmp(&a.date).then(b.day.cmp(&a.day)));
            let centroid = Coordinate::mean(members.iter().map(|(_, c)| *c))?;
            Some(PlaceCluster {
                key,
                days: members.into_iter().map(|(d, _)| d.clone()).collect(),
                centroid,
            })
        })
        .collect();

    clusters.sort_by(|a, b| {
        b.most_recent_date()
            .cmp(&a.most_recent_date())
            .then(a.key.cmp(&b.key))
    });

    tracing::debug!(
        days = buckets.len(),
        places = clusters.len(),
        resolution_degrees,
        "clustered days into places"
    );
    Ok(clusters)
}
