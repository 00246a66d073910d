use crate::backend::SignupBackend;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;

/// In-process backend for development and tests. State is lost on exit.
#[derive(Clone, Default)]
pub struct MemoryBackend(Arc<Mutex<State>>);

#[derive(Default)]
struct State {
    lists: HashMap<String, Vec<String>>,
    counters: HashMap<String, i64>,
    records: HashMap<String, BTreeMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SignupBackend for MemoryBackend {
    async fn contains(&self, list: &str, member: &str) -> Result<bool> {
        let state = self.0.lock().await;
        Ok(state
            .lists
            .get(list)
            .is_some_and(|members| members.iter().any(|m| m == member)))
    }

    async fn append_if_absent(&self, list: &str, member: &str) -> Result<bool> {
        // Check and append under one lock acquisition.
        let mut state = self.0.lock().await;
        let members = state.lists.entry(list.to_string()).or_default();
        if members.iter().any(|m| m == member) {
            return Ok(false);
        }
        members.push(member.to_string());
        Ok(true)
    }

    async fn members(&self, list: &str) -> Result<Vec<String>> {
        let state = self.0.lock().await;
        Ok(state.lists.get(list).cloned().unwrap_or_default())
    }

    async fn increment(&self, counter: &str) -> Result<i64> {
        let mut state = self.0.lock().await;
        let value = state.counters.entry(counter.to_string()).or_insert(0);
        *value += 1;
        Ok(*value)
    }

    async fn get_counter(&self, counter: &str) -> Result<Option<i64>> {
        let state = self.0.lock().await;
        Ok(state.counters.get(counter).copied())
    }

    async fn put_record(&self, key: &str, fields: &[(&str, &str)]) -> Result<()> {
        let mut state = self.0.lock().await;
        let record = state.records.entry(key.to_string()).or_default();
        for (field, value) in fields {
            record.insert((*field).to_string(), (*value).to_string());
        }
        Ok(())
    }

    async fn get_record(&self, key: &str) -> Result<Option<BTreeMap<String, String>>> {
        let state = self.0.lock().await;
        Ok(state.records.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_if_absent() {
        let backend = MemoryBackend::new();
        assert!(backend.append_if_absent("l", "a").await.expect("append"));
        assert!(backend.append_if_absent("l", "b").await.expect("append"));
        assert!(!backend.append_if_absent("l", "a").await.expect("append"));
        assert_eq!(backend.members("l").await.expect("members"), vec!["a", "b"]);
        assert!(backend.contains("l", "b").await.expect("contains"));
        assert!(!backend.contains("other", "b").await.expect("contains"));
    }

    #[tokio::test]
    async fn test_counter_and_records() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.get_counter("c").await.expect("get"), None);
        assert_eq!(backend.increment("c").await.expect("incr"), 1);
        assert_eq!(backend.increment("c").await.expect("incr"), 2);
        assert_eq!(backend.get_counter("c").await.expect("get"), Some(2));

        backend
            .put_record("r", &[("email", "a@b.com"), ("ip", "1.2.3.4")])
            .await
            .expect("put");
        backend.put_record("r", &[("ip", "5.6.7.8")]).await.expect("put");
        let record = backend.get_record("r").await.expect("get").expect("exists");
        assert_eq!(record.get("email").map(String::as_str), Some("a@b.com"));
        assert_eq!(record.get("ip").map(String::as_str), Some("5.6.7.8"));
        assert!(backend.get_record("missing").await.expect("get").is_none());
    }
}
