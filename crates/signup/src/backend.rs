use crate::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Keyed storage the signup store is built on: ordered lists, counters and
/// small string hashes. Implementations must make `append_if_absent` a
/// single atomic step; everything else may be a plain request.
#[async_trait]
pub trait SignupBackend: Send + Sync {
    /// Is `member` in the list at `list`?
    async fn contains(&self, list: &str, member: &str) -> Result<bool>;

    /// Append `member` unless already present. Returns `true` if appended.
    async fn append_if_absent(&self, list: &str, member: &str) -> Result<bool>;

    /// The whole list in append order. A missing list is empty.
    async fn members(&self, list: &str) -> Result<Vec<String>>;

    /// Add one to the counter, creating it at zero. Returns the new value.
    async fn increment(&self, counter: &str) -> Result<i64>;

    /// Current counter value, `None` if it was never set.
    async fn get_counter(&self, counter: &str) -> Result<Option<i64>>;

    /// Set fields on the hash at `key`, keeping fields not mentioned.
    async fn put_record(&self, key: &str, fields: &[(&str, &str)]) -> Result<()>;

    /// All fields of the hash at `key`, `None` if it does not exist.
    async fn get_record(&self, key: &str) -> Result<Option<BTreeMap<String, String>>>;
}
