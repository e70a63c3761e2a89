//! Photo library collaborator.
//!
//! The engine never talks to a platform library directly; callers hand it a
//! `PhotoLibrary` that can list the clip album and delete from it.

use anyhow::Result;

use crate::record::MediaRecord;

pub trait PhotoLibrary {
    /// All clips in the album, oldest first. Clips without a creation date
    /// come last.
    fn fetch_clips(&self) -> Result<Vec<MediaRecord>>;

    /// Remove the given clips, returning how many were removed. Unknown ids
    /// are ignored.
    fn delete(&mut self, ids: &[String]) -> Result<usize>;
}

/// Library held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryLibrary {
    records: Vec<MediaRecord>,
}

impl InMemoryLibrary {
    pub fn new(records: Vec<MediaRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[MediaRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<MediaRecord> {
        self.records
    }
}

impl PhotoLibrary for InMemoryLibrary {
    fn fetch_clips(&self) -> Result<Vec<MediaRecord>> {
        let mut clips = self.records.clone();
        clips.sort_by_key(|c| (c.created_at.is_none(), c.created_at));
        Ok(clips)
    }

    fn delete(&mut self, ids: &[String]) -> Result<usize> {
        let before = self.records.len();
        self.records.retain(|r| !ids.contains(&r.id));
        let removed = before - self.records.len();
        tracing::debug!(requested = ids.len(), removed, "deleted clips from library");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use chrono::{TimeZone, Utc};

    fn create_test_record(id: &str, secs: Option<i64>) -> MediaRecord {
        MediaRecord::new(
            id,
            secs.map(|s| Utc.timestamp_opt(s, 0).unwrap()),
            1.0,
            Size::new(1920.0, 1080.0),
        )
    }

    #[test]
    fn test_fetch_sorted_by_creation() -> Result<()> {
        let library = InMemoryLibrary::new(vec![
            create_test_record("undated", None),
            create_test_record("new", Some(2000)),
            create_test_record("old", Some(1000)),
        ]);

        let ids: Vec<String> = library.fetch_clips()?.into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["old", "new", "undated"]);
        Ok(())
    }

    #[test]
    fn test_delete_ignores_unknown() -> Result<()> {
        let mut library = InMemoryLibrary::new(vec![
            create_test_record("a", Some(1)),
            create_test_record("b", Some(2)),
        ]);

        let removed = library.delete(&["a".to_string(), "zzz".to_string()])?;

        assert_eq!(removed, 1);
        assert_eq!(library.records().len(), 1);
        assert_eq!(library.records()[0].id, "b");
        Ok(())
    }
}
