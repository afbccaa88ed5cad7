//! Zero-cost tracing helpers.
//!
//! With the `tracing` feature enabled these macros forward to the `tracing`
//! crate. Without it (the default) they expand to nothing, so the balancing
//! loops carry no logging overhead.
//!
//! # Usage
//!
//! ```bash
//! # Normal build - no tracing overhead
//! cargo build --release
//!
//! # Watch every rotation and fixup case while a test runs
//! RUST_LOG=redblack::tree=trace cargo test --features tracing scenario_
//! ```
//!
//! Levels used by the crate:
//! - `trace`: rotations and the individual insert/remove fixup cases
//! - `debug`: structural inserts, removals and teardown

#![allow(unused_macros, unused_imports)]

/// Trace-level logging (most verbose). Compiles to no-op without `tracing` feature.
#[cfg(feature = "tracing")]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

/// Debug-level logging. Compiles to no-op without `tracing` feature.
#[cfg(feature = "tracing")]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

/// Warn-level logging. Compiles to no-op without `tracing` feature.
#[cfg(feature = "tracing")]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        tracing::warn!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! warn_log {
    ($($arg:tt)*) => {};
}

pub(crate) use debug_log;
pub(crate) use trace_log;
pub(crate) use warn_log;
