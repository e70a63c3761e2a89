//! Clip grouping library for Clipbook
//!
//! Groups captured clips into calendar days and month grids, clusters
//! geotagged days into places on a coarse coordinate grid, and tracks the
//! user's multi-selection across those views. Every grouping function is a
//! pure function of its inputs plus the supplied calendar and clock.

pub mod calendar;
pub mod day;
pub mod error;
pub mod geometry;
pub mod library;
pub mod month;
pub mod place;
pub mod record;
pub mod selection;

pub use calendar::{days_in_month, CalendarContext, Clock, FixedClock, SystemClock};
pub use day::{group_by_day, DayBucket};
pub use error::GroupingError;
pub use geometry::{AffineTransform, Point, Rect, Size};
pub use library::{InMemoryLibrary, PhotoLibrary};
pub use month::{build_month_sections, MonthSection};
pub use place::{cluster_by_place, GridKey, PlaceCluster, DEFAULT_GRID_RESOLUTION_DEGREES};
pub use record::{Coordinate, Location, MediaRecord};
pub use selection::SelectionSet;
