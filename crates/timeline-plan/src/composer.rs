//! Concatenation planning for a sequence of clips.
//!
//! The first clip fixes the render frame: its natural size after applying its
//! preferred transform. Every clip, the first included, is then mapped into
//! that frame with a uniform fit-inside scale and centered. Clips are laid
//! end to end starting at zero.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone, Utc};
use clip_grouping::{AffineTransform, MediaRecord, Rect, Size};
use serde::{Deserialize, Serialize};

use crate::error::CompositionError;
use crate::overlay::{Overlay, OverlayTiming};

pub const DEFAULT_DATE_STAMP_FORMAT: &str = "%Y/%m/%d";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineSegment {
    /// Id of the source clip
    pub source_id: String,
    /// Start in composition seconds
    pub start: f64,
    pub duration: f64,
    /// Source pixel space to render frame space
    pub transform: AffineTransform,
    /// Uniform fit scale applied to the oriented clip
    pub scale: f64,
    /// Whether an extra half turn was added for an upside-down capture
    pub upside_down_corrected: bool,
}

impl TimelineSegment {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionPlan {
    pub render_size: Size,
    pub timeline: Vec<TimelineSegment>,
    pub overlay: Option<Overlay>,
}

impl CompositionPlan {
    /// Total length, the end of the last segment
    pub fn duration(&self) -> f64 {
        self.timeline.last().map(TimelineSegment::end).unwrap_or(0.0)
    }

    /// Segment playing at composition time `t`. Ranges are half-open, so the
    /// end of the composition maps to `None`.
    pub fn segment_at(&self, t: f64) -> Option<&TimelineSegment> {
        let index = self.timeline.partition_point(|s| s.end() <= t);
        self.timeline.get(index).filter(|s| s.start <= t && t < s.end())
    }
}

/// Request for a date stamp overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateStamp {
    /// strftime-style pattern, e.g. `%Y/%m/%d`
    pub format: String,
    /// Instant to print; defaults to the earliest clip creation time
    #[serde(default)]
    pub reference: Option<DateTime<Utc>>,
}

impl Default for DateStamp {
    fn default() -> Self {
        Self {
            format: DEFAULT_DATE_STAMP_FORMAT.to_string(),
            reference: None,
        }
    }
}

/// Builds composition plans, formatting date stamps in `timezone`
#[derive(Debug, Clone)]
pub struct TimelineComposer<Tz: TimeZone> {
    timezone: Tz,
    overlay_timing: OverlayTiming,
}

impl TimelineComposer<Utc> {
    pub fn utc() -> Self {
        Self::new(Utc)
    }
}

impl<Tz: TimeZone> TimelineComposer<Tz>
where
    Tz::Offset: std::fmt::Display,
{
    pub fn new(timezone: Tz) -> Self {
        Self {
            timezone,
            overlay_timing: OverlayTiming::default(),
        }
    }

    pub fn with_overlay_timing(mut self, timing: OverlayTiming) -> Self {
        self.overlay_timing = timing;
        self
    }

    /// Plan the concatenation of `records` in the given order.
    ///
    /// Same inputs always give the same plan, so a failed export can simply
    /// ask for a fresh one.
    pub fn compose(
        &self,
        records: &[MediaRecord],
        stamp: Option<&DateStamp>,
    ) -> Result<CompositionPlan, CompositionError> {
        let first = records.first().ok_or(CompositionError::EmptyInput)?;
        let render_size = oriented_rect(first)?.size;

        let mut timeline = Vec::with_capacity(records.len());
        let mut cursor = 0.0;
        for record in records {
            let segment = plan_segment(record, render_size, cursor)?;
            cursor = segment.end();
            timeline.push(segment);
        }

        let overlay = match stamp {
            Some(stamp) => self.date_stamp(records, stamp)?,
            None => None,
        };

        tracing::debug!(
            segments = timeline.len(),
            duration = cursor,
            width = render_size.width,
            height = render_size.height,
            "planned composition"
        );

        Ok(CompositionPlan {
            render_size,
            timeline,
            overlay,
        })
    }

    fn date_stamp(
        &self,
        records: &[MediaRecord],
        stamp: &DateStamp,
    ) -> Result<Option<Overlay>, CompositionError> {
        let items: Vec<Item> = StrftimeItems::new(&stamp.format).collect();
        if items.iter().any(|item| matches!(item, Item::Error)) {
            return Err(CompositionError::InvalidOverlayFormat(stamp.format.clone()));
        }

        let reference = stamp
            .reference
            .or_else(|| records.iter().filter_map(|r| r.created_at).min());
        let Some(reference) = reference else {
            tracing::debug!("no clip has a creation date, omitting date stamp");
            return Ok(None);
        };

        let text = reference
            .with_timezone(&self.timezone)
            .format_with_items(items.into_iter())
            .to_string();
        Ok(Some(Overlay::new(text, self.overlay_timing)))
    }
}

/// Plan with UTC date stamps and default overlay timing
pub fn compose_plan(
    records: &[MediaRecord],
    stamp: Option<&DateStamp>,
) -> Result<CompositionPlan, CompositionError> {
    TimelineComposer::utc().compose(records, stamp)
}

/// Bounding box of the clip after its preferred transform
fn oriented_rect(record: &MediaRecord) -> Result<Rect, CompositionError> {
    let invalid = |reason: &str| CompositionError::InvalidRecord {
        id: record.id.clone(),
        reason: reason.to_string(),
    };

    if !record.natural_size.is_drawable() {
        return Err(invalid("natural size must be positive"));
    }
    if !record.preferred_transform.is_invertible() {
        return Err(invalid("preferred transform is singular"));
    }
    let rect = record
        .preferred_transform
        .apply_to_rect(Rect::from_size(record.natural_size));
    if !rect.size.is_drawable() {
        return Err(invalid("preferred transform collapses the frame"));
    }
    Ok(rect)
}

fn plan_segment(
    record: &MediaRecord,
    render_size: Size,
    start: f64,
) -> Result<TimelineSegment, CompositionError> {
    if !record.duration_seconds.is_finite() || record.duration_seconds < 0.0 {
        return Err(CompositionError::InvalidRecord {
            id: record.id.clone(),
            reason: format!("duration {} is not a non-negative length", record.duration_seconds),
        });
    }

    let rect = oriented_rect(record)?;
    let scale = (render_size.width / rect.size.width).min(render_size.height / rect.size.height);

    // Oriented clip moved to the origin, occupying (0, 0)..rect.size
    let mut transform = record
        .preferred_transform
        .then(&AffineTransform::translation(-rect.min_x(), -rect.min_y()));

    let upside_down = record.preferred_transform.is_upside_down();
    if upside_down {
        tracing::warn!(id = %record.id, "clip is upside down, adding a half turn");
        let oriented = Rect::from_size(rect.size);
        transform = transform.then(&AffineTransform::half_turn_about(oriented.center()));
    }

    let tx = (render_size.width - rect.size.width * scale) / 2.0;
    let ty = (render_size.height - rect.size.height * scale) / 2.0;
    let transform = transform
        .then(&AffineTransform::scale(scale, scale))
        .then(&AffineTransform::translation(tx, ty));

    Ok(TimelineSegment {
        source_id: record.id.clone(),
        start,
        duration: record.duration_seconds,
        transform,
        scale,
        upside_down_corrected: upside_down,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use clip_grouping::Point;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn create_test_record(id: &str, duration: f64, width: f64, height: f64) -> MediaRecord {
        MediaRecord::new(id, None, duration, Size::new(width, height))
    }

    fn assert_point(actual: Point, x: f64, y: f64) {
        assert!(
            (actual.x - x).abs() < 1e-9 && (actual.y - y).abs() < 1e-9,
            "{:?} != ({}, {})",
            actual,
            x,
            y
        );
    }

    #[test]
    fn test_empty_input() {
        let result = compose_plan(&[], None);
        assert!(matches!(result, Err(CompositionError::EmptyInput)));
    }

    #[test]
    fn test_starts_are_running_sum() {
        let records = vec![
            create_test_record("a", 2.0, 1920.0, 1080.0),
            create_test_record("b", 3.5, 1920.0, 1080.0),
            create_test_record("c", 1.0, 1920.0, 1080.0),
        ];

        let plan = compose_plan(&records, None).unwrap();

        let starts: Vec<f64> = plan.timeline.iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![0.0, 2.0, 5.5]);
        assert_eq!(plan.duration(), 6.5);
        assert!(plan.overlay.is_none());
    }

    #[test]
    fn test_first_clip_sets_portrait_frame() {
        let portrait = create_test_record("p", 1.0, 1920.0, 1080.0)
            .with_transform(AffineTransform::rotation(FRAC_PI_2));
        let landscape = create_test_record("l", 1.0, 1920.0, 1080.0);

        let plan = compose_plan(&[portrait, landscape], None).unwrap();

        assert_eq!(plan.render_size, Size::new(1080.0, 1920.0));

        // First clip fills the frame exactly
        let first = &plan.timeline[0];
        assert_eq!(first.scale, 1.0);
        assert_point(first.transform.apply(Point::new(0.0, 0.0)), 1080.0, 0.0);
        assert_point(first.transform.apply(Point::new(1920.0, 1080.0)), 0.0, 1920.0);

        // Landscape clip is letterboxed: 1080 wide, 607.5 tall, centered
        let second = &plan.timeline[1];
        assert_eq!(second.scale, 1080.0 / 1920.0);
        assert_point(second.transform.apply(Point::new(0.0, 0.0)), 0.0, 656.25);
        assert_point(second.transform.apply(Point::new(1920.0, 1080.0)), 1080.0, 1263.75);
    }

    #[test]
    fn test_smaller_clip_scaled_up_to_fit() {
        let records = vec![
            create_test_record("big", 1.0, 1920.0, 1080.0),
            create_test_record("small", 1.0, 640.0, 480.0),
        ];

        let plan = compose_plan(&records, None).unwrap();
        let small = &plan.timeline[1];

        assert_eq!(small.scale, 1080.0 / 480.0);
        assert_point(small.transform.apply(Point::new(0.0, 0.0)), 240.0, 0.0);
        assert_point(small.transform.apply(Point::new(640.0, 480.0)), 1680.0, 1080.0);
    }

    #[test]
    fn test_upside_down_clip_gets_half_turn() {
        let flipped = create_test_record("f", 1.0, 1920.0, 1080.0)
            .with_transform(AffineTransform::rotation(PI));

        let plan = compose_plan(&[flipped], None).unwrap();
        let segment = &plan.timeline[0];

        assert!(segment.upside_down_corrected);
        assert_eq!(plan.render_size, Size::new(1920.0, 1080.0));
        // Two half turns cancel out
        assert_point(segment.transform.apply(Point::new(0.0, 0.0)), 0.0, 0.0);
        assert_point(segment.transform.apply(Point::new(1920.0, 1080.0)), 1920.0, 1080.0);
    }

    #[test]
    fn test_upside_down_clip_after_larger_first_clip() {
        let first = create_test_record("first", 1.0, 1920.0, 1080.0);
        let flipped = create_test_record("flipped", 1.0, 640.0, 480.0)
            .with_transform(AffineTransform::rotation(PI));

        let plan = compose_plan(&[first, flipped], None).unwrap();
        let segment = &plan.timeline[1];

        assert!(segment.upside_down_corrected);
        assert_eq!(segment.scale, 2.25);
        // Letterboxed into (240, 0)..(1680, 1080), half turns cancelling
        assert_point(segment.transform.apply(Point::new(0.0, 0.0)), 240.0, 0.0);
        assert_point(segment.transform.apply(Point::new(640.0, 0.0)), 1680.0, 0.0);
        assert_point(segment.transform.apply(Point::new(0.0, 480.0)), 240.0, 1080.0);
        assert_point(segment.transform.apply(Point::new(640.0, 480.0)), 1680.0, 1080.0);

        let frame = segment
            .transform
            .apply_to_rect(Rect::from_size(Size::new(640.0, 480.0)));
        assert!(frame.min_x() >= 0.0 && frame.max_x() <= plan.render_size.width);
        assert!(frame.min_y() >= 0.0 && frame.max_y() <= plan.render_size.height);
    }

    #[test]
    fn test_mirrored_clip_not_flipped() {
        let mirrored = create_test_record("selfie", 1.0, 1920.0, 1080.0)
            .with_transform(AffineTransform::scale(-1.0, 1.0));

        let plan = compose_plan(&[mirrored], None).unwrap();
        let segment = &plan.timeline[0];

        assert!(!segment.upside_down_corrected);
        // Left-right swapped, top stays on top
        assert_point(segment.transform.apply(Point::new(0.0, 0.0)), 1920.0, 0.0);
        assert_point(segment.transform.apply(Point::new(1920.0, 1080.0)), 0.0, 1080.0);
    }

    #[test]
    fn test_singular_transform_rejected() {
        let collapsed = create_test_record("line", 1.0, 100.0, 100.0)
            .with_transform(AffineTransform::new(1.0, 1.0, 1.0, 1.0, 0.0, 0.0));

        assert!(matches!(
            compose_plan(&[collapsed], None),
            Err(CompositionError::InvalidRecord { id, .. }) if id == "line"
        ));
    }

    #[test]
    fn test_uniform_scale() {
        let records = vec![
            create_test_record("a", 1.0, 1280.0, 720.0),
            create_test_record("b", 1.0, 720.0, 1280.0)
                .with_transform(AffineTransform::rotation(-FRAC_PI_2)),
            create_test_record("c", 1.0, 3840.0, 2160.0),
        ];

        let plan = compose_plan(&records, None).unwrap();

        for segment in &plan.timeline {
            let (sx, sy) = segment.transform.axis_scales();
            assert!((sx - sy).abs() < 1e-12);
            assert!((sx - segment.scale).abs() < 1e-12);
        }
    }

    #[test]
    fn test_invalid_records() {
        let zero = create_test_record("zero", 1.0, 0.0, 1080.0);
        assert!(matches!(
            compose_plan(&[zero], None),
            Err(CompositionError::InvalidRecord { id, .. }) if id == "zero"
        ));

        let negative = create_test_record("neg", -1.0, 1920.0, 1080.0);
        assert!(matches!(
            compose_plan(&[negative], None),
            Err(CompositionError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn test_date_stamp_uses_earliest_clip() {
        let day = |d: u32| Some(Utc.with_ymd_and_hms(2024, 3, d, 22, 0, 0).unwrap());
        let mut late = create_test_record("late", 1.0, 1920.0, 1080.0);
        late.created_at = day(9);
        let mut early = create_test_record("early", 1.0, 1920.0, 1080.0);
        early.created_at = day(2);

        let composer = TimelineComposer::new(FixedOffset::east_opt(9 * 3600).unwrap());
        let plan = composer
            .compose(&[late, early], Some(&DateStamp::default()))
            .unwrap();

        let overlay = plan.overlay.unwrap();
        // 22:00 UTC on the 2nd is already the 3rd at +09:00
        assert_eq!(overlay.text, "2024/03/03");
        assert_eq!(overlay.visible_from, 0.0);
        assert_eq!(overlay.visible_until, 2.0);
        assert_eq!(overlay.fade_out_duration, 0.5);
    }

    #[test]
    fn test_date_stamp_reference_and_missing_dates() {
        let records = vec![create_test_record("a", 1.0, 1920.0, 1080.0)];

        let plan = compose_plan(&records, Some(&DateStamp::default())).unwrap();
        assert!(plan.overlay.is_none());

        let stamp = DateStamp {
            format: "%d.%m.%Y".to_string(),
            reference: Some(Utc.with_ymd_and_hms(2023, 12, 31, 10, 0, 0).unwrap()),
        };
        let plan = compose_plan(&records, Some(&stamp)).unwrap();
        assert_eq!(plan.overlay.unwrap().text, "31.12.2023");
    }

    #[test]
    fn test_bad_stamp_format() {
        let records = vec![create_test_record("a", 1.0, 1920.0, 1080.0)];
        let stamp = DateStamp {
            format: "%Q".to_string(),
            reference: None,
        };

        assert!(matches!(
            compose_plan(&records, Some(&stamp)),
            Err(CompositionError::InvalidOverlayFormat(_))
        ));
    }

    #[test]
    fn test_segment_at() {
        let records = vec![
            create_test_record("a", 2.0, 1920.0, 1080.0),
            create_test_record("b", 0.0, 1920.0, 1080.0),
            create_test_record("c", 1.0, 1920.0, 1080.0),
        ];

        let plan = compose_plan(&records, None).unwrap();

        assert_eq!(plan.segment_at(0.0).map(|s| s.source_id.as_str()), Some("a"));
        assert_eq!(plan.segment_at(1.99).map(|s| s.source_id.as_str()), Some("a"));
        assert_eq!(plan.segment_at(2.0).map(|s| s.source_id.as_str()), Some("c"));
        assert!(plan.segment_at(3.0).is_none());
        assert!(plan.segment_at(-1.0).is_none());
    }
}
