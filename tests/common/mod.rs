//! Common test utilities: tracing setup and tree inspection helpers.
//!
//! # Usage
//!
//! ```rust,ignore
//! mod common;
//!
//! #[test]
//! fn my_test() {
//!     common::init_tracing();
//!     // ... test code
//! }
//! ```
//!
//! # Configuration
//!
//! Environment variables:
//! - `RUST_LOG`: Filter directives (e.g., `redblack=debug,redblack::tree=trace`)
//! - `REDBLACK_LOG_DIR`: Log directory (default: `logs/`)
//! - `REDBLACK_LOG_CONSOLE`: Set to "0" to disable console output
//!
//! The crate only emits events when built with `--features tracing`.
//!
//! # Log Files
//!
//! Logs are appended to `logs/redblack.jsonl` as newline-delimited JSON:
//!
//! ```bash
//! cat logs/redblack.jsonl | jq 'select(.fields.message | test("fixup"))'
//! ```

#![allow(dead_code)]

use std::env;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Once;

use redblack::{Color, Node, NodeAllocator, RbTree};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Ensures tracing is only initialized once across all tests.
static INIT: Once = Once::new();

/// Initialize the tracing subscriber with file and console logging.
///
/// Safe to call multiple times - only the first call takes effect.
pub fn init_tracing() {
    INIT.call_once(|| {
        setup_tracing();
    });
}

/// Configuration for tracing setup.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Directory for log files.
    pub log_dir: PathBuf,
    /// Log file name.
    pub log_file: String,
    /// Enable console output.
    pub console_enabled: bool,
    /// Default log level if RUST_LOG is not set.
    pub default_level: Level,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            log_file: "redblack.jsonl".to_string(),
            console_enabled: true,
            default_level: Level::INFO,
        }
    }
}

impl TracingConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("REDBLACK_LOG_DIR") {
            config.log_dir = PathBuf::from(dir);
        }

        if env::var("REDBLACK_LOG_CONSOLE").is_ok_and(|v| v == "0") {
            config.console_enabled = false;
        }

        config
    }
}

/// Create an EnvFilter from RUST_LOG or use default level.
fn make_filter(default_level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("{default_level}")))
}

fn setup_tracing() {
    let config = TracingConfig::from_env();

    // Fall back to console-only logging if the log file cannot be opened.
    let file = std::fs::create_dir_all(&config.log_dir).ok().and_then(|()| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(config.log_dir.join(&config.log_file))
            .ok()
    });

    let console_layer = config.console_enabled.then(|| {
        tracing_subscriber::fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(FmtSpan::CLOSE)
            .compact()
            .with_filter(make_filter(config.default_level))
    });

    let file_layer = file.map(|file| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::sync::Mutex::new(file))
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .json()
            .with_filter(make_filter(config.default_level))
    });

    // try_init: another test binary helper may already have installed one.
    let _ = Registry::default()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

// ============================================================================
//  Tree inspection
// ============================================================================

/// Elements in in-order sequence, read through the structural accessors.
pub fn in_order<T: Clone, C, A>(tree: &RbTree<T, C, A>) -> Vec<T>
where
    C: Fn(&T, &T) -> std::cmp::Ordering,
    A: NodeAllocator<T>,
{
    fn walk<T: Clone>(node: Option<&Node<T>>, out: &mut Vec<T>) {
        if let Some(n) = node {
            walk(n.left(), out);
            out.push(n.value().clone());
            walk(n.right(), out);
        }
    }

    let mut out = Vec::with_capacity(tree.len());
    walk(tree.root_node(), &mut out);
    out
}

/// Value and color of the root and its two children.
pub fn top_three<T: Copy, C, A>(
    tree: &RbTree<T, C, A>,
) -> Option<((T, Color), Option<(T, Color)>, Option<(T, Color)>)>
where
    C: Fn(&T, &T) -> std::cmp::Ordering,
    A: NodeAllocator<T>,
{
    let root = tree.root_node()?;
    let pair = |n: &Node<T>| (*n.value(), n.color());
    Some((pair(root), root.left().map(pair), root.right().map(pair)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_init() {
        init_tracing();
        tracing::info!("Tracing initialized successfully");
        tracing::debug!(key = 7, "Debug event");
    }
}
