pub mod candidate;
pub mod job;
pub mod matching;
pub mod upload;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One page of a backend listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Wraps a flat list as a single page.
    pub fn single(items: Vec<T>) -> Self {
        let total_items = items.len() as u64;
        Self {
            page: 1,
            page_size: items.len() as u32,
            items,
            total_items,
            total_pages: if total_items == 0 { 0 } else { 1 },
        }
    }

    /// The last page of the listing when this page lies past it, as happens
    /// after deleting the only item of the final page.
    pub fn past_end(&self) -> Option<u32> {
        (self.total_pages > 0 && self.page > self.total_pages).then_some(self.total_pages)
    }

    /// Zero-based position of the first item of this page in the full listing.
    pub fn offset(&self) -> usize {
        (self.page.max(1) as usize - 1) * self.page_size as usize
    }
}

/// Accepts RFC 3339 timestamps as well as the naive ISO-8601 form the backend
/// emits for UTC datetimes (`2024-05-01T09:30:00.123000`).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

pub(crate) fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}
