//! Diagnostics for the site workspace
//!
//! Thin layer over `emit` so every crate logs the same way.
//!
//! Usage:
//! - Set SITE_LOG=off - no logs
//! - Set SITE_LOG=info - request and signup logs
//! - Set SITE_LOG=debug - per-item content loading detail
//!
//! Properties are passed emit-style: `info!("loaded {slug}", slug: slug)`.

use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

/// Environment variable consulted by [`init_diagnostics`].
pub const LOG_ENV: &str = "SITE_LOG";

static INIT: Once = Once::new();

/// How much the process should log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Off,
    Min(emit::Level),
}

/// Parse a `SITE_LOG` value. Unknown values return `None`.
pub fn parse_verbosity(value: &str) -> Option<Verbosity> {
    match value.trim().to_ascii_lowercase().as_str() {
        "off" | "none" => Some(Verbosity::Off),
        "error" => Some(Verbosity::Min(emit::Level::Error)),
        "warn" | "warning" => Some(Verbosity::Min(emit::Level::Warn)),
        "info" => Some(Verbosity::Min(emit::Level::Info)),
        "debug" | "trace" => Some(Verbosity::Min(emit::Level::Debug)),
        _ => None,
    }
}

/// Initialize diagnostics from `SITE_LOG`, falling back to `default`.
///
/// Safe to call more than once; only the first call installs the emitter.
pub fn init_diagnostics(default: &str) {
    INIT.call_once(|| {
        let raw = std::env::var(LOG_ENV).unwrap_or_else(|_| default.to_string());

        let (verbosity, unknown) = match parse_verbosity(&raw) {
            Some(v) => (v, false),
            None => (Verbosity::Min(emit::Level::Info), true),
        };

        let level = match verbosity {
            Verbosity::Off => return,
            Verbosity::Min(level) => level,
        };

        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(level))
            .init();

        if unknown {
            emit::warn!("Unknown {var} value '{raw}', using 'info'", var: LOG_ENV, raw: raw.as_str());
        }

        // The runtime is global once installed; the guard only offers flushing.
        std::mem::forget(rt);
    });
}

/// Re-export the init function for convenience
pub use init_diagnostics as init;

/// Log normal operations (requests served, signups accepted, listings built)
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Log detail useful when chasing a content or store problem
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Log degraded-but-handled conditions (skipped item, counter fallback)
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Log failures surfaced to a caller (store unavailable, bind failure)
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}
