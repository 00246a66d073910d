//! Email signup capture with per-site duplicate suppression.
//!
//! [`SignupStore`] validates addresses, appends each new one to a per-site
//! list exactly once, keeps a counter and records where the signup came
//! from. Storage goes through [`SignupBackend`], with an in-process
//! [`MemoryBackend`] and a [`RedisRestBackend`] for Redis-over-HTTP
//! services.

mod backend;
mod config;
mod email;
mod error;
mod keys;
mod memory;
mod redis_rest;
mod store;

pub use backend::SignupBackend;
pub use config::{BackendKind, SignupConfig, TOKEN_ENV, URL_ENV};
pub use email::{EmailAddress, InvalidEmail, MAX_EMAIL_LEN};
pub use error::{ConfigError, Result, StoreError};
pub use keys::SiteId;
pub use memory::MemoryBackend;
pub use redis_rest::RedisRestBackend;
pub use store::{
    Provenance, Registration, SignupOutcome, SignupRecord, SignupStore, UNKNOWN,
};
