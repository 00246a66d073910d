// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Fail-soft listing results.
//!
//! A missing or unreadable category directory is not an error for the
//! site: it yields an empty listing that records why it is empty.

use std::ops::Deref;

/// State of the backing directory when a listing was built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    Available,
    Missing,
    Unreadable(String),
}

/// Entries discovered for one category plus the status of their source.
#[derive(Debug, Clone)]
pub struct Listing<T> {
    entries: Vec<T>,
    source: SourceStatus,
}

impl<T> Listing<T> {
    pub fn available(entries: Vec<T>) -> Self {
        Self {
            entries,
            source: SourceStatus::Available,
        }
    }

    pub fn missing() -> Self {
        Self {
            entries: Vec::new(),
            source: SourceStatus::Missing,
        }
    }

    pub fn unreadable(reason: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            source: SourceStatus::Unreadable(reason.into()),
        }
    }

    pub fn source(&self) -> &SourceStatus {
        &self.source
    }

    pub fn into_vec(self) -> Vec<T> {
        self.entries
    }

    /// Replace the entries, keeping the source status.
    pub(crate) fn with_entries<U>(self, entries: Vec<U>) -> Listing<U> {
        Listing {
            entries,
            source: self.source,
        }
    }
}

impl<T> Deref for Listing<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.entries
    }
}

impl<T> IntoIterator for Listing<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
