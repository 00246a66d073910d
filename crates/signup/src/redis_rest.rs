//! Backend speaking the Redis-over-HTTP protocol used by hosted Redis
//! services such as Upstash.
//!
//! Each command is a `POST` to the base URL whose body is the command as a
//! JSON array of strings, authenticated with a bearer token. Replies are a
//! JSON object carrying either `result` or `error`.

use crate::backend::SignupBackend;
use crate::error::{ConfigError, Result, StoreError};
use async_trait::async_trait;
use diagnostics::*;
use reqwest::StatusCode;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

/// Appends only when the member is not already in the list, evaluated
/// server-side so concurrent submissions cannot both append.
const APPEND_IF_ABSENT_SCRIPT: &str = "if redis.call('LPOS', KEYS[1], ARGV[1]) then return 0 end \
     redis.call('RPUSH', KEYS[1], ARGV[1]) return 1";

pub struct RedisRestBackend {
    http: reqwest::Client,
    url: String,
    token: String,
    timeout: Duration,
}

impl RedisRestBackend {
    pub fn new(url: &str, token: &str, timeout: Duration) -> std::result::Result<Self, ConfigError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            timeout,
        })
    }

    /// Run one command and return its `result` value.
    async fn command(&self, args: &[&str]) -> Result<Value> {
        let name = args.first().copied().unwrap_or("");
        debug!("redis command {name}", name: name);

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(args)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        decode_reply(status, &body)
    }

    fn transport_error(&self, e: reqwest::Error) -> StoreError {
        if e.is_timeout() {
            StoreError::Timeout(self.timeout)
        } else {
            StoreError::Unavailable(e.to_string())
        }
    }
}

/// Any non-2xx status is a store failure whatever the body says. A 2xx
/// reply must carry `result` (possibly `null`) or `error`.
fn decode_reply(status: StatusCode, body: &str) -> Result<Value> {
    let reply = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(fields)) => Some(fields),
        _ => None,
    };
    let error = reply
        .as_ref()
        .and_then(|fields| fields.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string);

    if !status.is_success() {
        return Err(StoreError::Unavailable(match error {
            Some(message) => format!("HTTP {status}: {message}"),
            None => format!("HTTP {status}"),
        }));
    }
    if let Some(message) = error {
        return Err(StoreError::Unavailable(message));
    }

    let Some(mut fields) = reply else {
        return Err(StoreError::Protocol(format!("malformed reply: {body:?}")));
    };
    fields
        .remove("result")
        .ok_or_else(|| StoreError::Protocol("reply has neither result nor error".to_string()))
}

fn as_integer(value: &Value) -> Result<Option<i64>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| StoreError::Protocol(format!("not an integer: {n}"))),
        // GET hands back counters as strings
        Value::String(s) => s
            .parse()
            .map(Some)
            .map_err(|_| StoreError::Protocol(format!("not an integer: {s:?}"))),
        other => Err(StoreError::Protocol(format!("expected integer, got {other}"))),
    }
}

fn as_strings(value: Value) -> Result<Vec<String>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Err(StoreError::Protocol(format!("expected string, got {other}"))),
            })
            .collect(),
        other => Err(StoreError::Protocol(format!("expected array, got {other}"))),
    }
}

/// HGETALL replies are a flat `[field, value, field, value, ...]` array.
fn as_hash(value: Value) -> Result<Option<BTreeMap<String, String>>> {
    let flat = as_strings(value)?;
    if flat.is_empty() {
        return Ok(None);
    }
    if flat.len() % 2 != 0 {
        return Err(StoreError::Protocol(
            "hash reply has an odd number of entries".to_string(),
        ));
    }
    let mut record = BTreeMap::new();
    let mut it = flat.into_iter();
    while let (Some(field), Some(value)) = (it.next(), it.next()) {
        _ = record.insert(field, value);
    }
    Ok(Some(record))
}

#[async_trait]
impl SignupBackend for RedisRestBackend {
    async fn contains(&self, list: &str, member: &str) -> Result<bool> {
        let position = self.command(&["LPOS", list, member]).await?;
        Ok(as_integer(&position)?.is_some())
    }

    async fn append_if_absent(&self, list: &str, member: &str) -> Result<bool> {
        let appended = self
            .command(&["EVAL", APPEND_IF_ABSENT_SCRIPT, "1", list, member])
            .await?;
        match as_integer(&appended)? {
            Some(1) => Ok(true),
            Some(0) => Ok(false),
            other => Err(StoreError::Protocol(format!(
                "append script returned {other:?}"
            ))),
        }
    }

    async fn members(&self, list: &str) -> Result<Vec<String>> {
        as_strings(self.command(&["LRANGE", list, "0", "-1"]).await?)
    }

    async fn increment(&self, counter: &str) -> Result<i64> {
        let value = self.command(&["INCR", counter]).await?;
        as_integer(&value)?
            .ok_or_else(|| StoreError::Protocol("INCR returned null".to_string()))
    }

    async fn get_counter(&self, counter: &str) -> Result<Option<i64>> {
        as_integer(&self.command(&["GET", counter]).await?)
    }

    async fn put_record(&self, key: &str, fields: &[(&str, &str)]) -> Result<()> {
        if fields.is_empty() {
            return Ok(());
        }
        let mut args = vec!["HSET", key];
        for (field, value) in fields {
            args.push(*field);
            args.push(*value);
        }
        _ = self.command(&args).await?;
        Ok(())
    }

    async fn get_record(&self, key: &str) -> Result<Option<BTreeMap<String, String>>> {
        as_hash(self.command(&["HGETALL", key]).await?)
    }
}
