// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! The assembled content item handed to the presentation layer.

use crate::category::Category;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;

/// When an item was published, as authored.
///
/// Sources without a `date` are `Undated` rather than stamped with the load
/// time, so ordering never depends on when the process started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishedAt {
    Dated { raw: String, at: DateTime<Utc> },
    Undated,
}

impl PublishedAt {
    /// Parse an authored date. Accepts `YYYY-MM-DD`, RFC 3339, and naive
    /// `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS` (taken as UTC).
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let at = if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            date.and_hms_opt(0, 0, 0)?.and_utc()
        } else if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            ts.with_timezone(&Utc)
        } else if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
            ts.and_utc()
        } else if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
            ts.and_utc()
        } else {
            return None;
        };
        Some(PublishedAt::Dated {
            raw: raw.to_string(),
            at,
        })
    }

    /// The date string exactly as the author wrote it.
    pub fn raw(&self) -> Option<&str> {
        match self {
            PublishedAt::Dated { raw, .. } => Some(raw),
            PublishedAt::Undated => None,
        }
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            PublishedAt::Dated { at, .. } => Some(*at),
            PublishedAt::Undated => None,
        }
    }

    /// Newest-first ordering: later instants first, undated last.
    pub fn newest_first(a: &PublishedAt, b: &PublishedAt) -> Ordering {
        match (a.instant(), b.instant()) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl Serialize for PublishedAt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.raw() {
            Some(raw) => serializer.serialize_str(raw),
            None => serializer.serialize_none(),
        }
    }
}

/// One rendered content document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub slug: String,
    pub category: Category,
    pub title: String,
    pub description: String,
    pub published_at: PublishedAt,
    pub body_html: String,
    pub target_keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idea_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
