//! Runtime core: wiring and lifecycle.
//!
//! This module contains the glue that runs the decision core as a process.
//! The public API from here is [`Monitor`], which registers the listeners,
//! drives events to subscribers, and performs graceful shutdown, plus its
//! [`Config`].
//!
//! Internal modules:
//! - [`monitor`]: listener wiring, fan-out, shutdown orchestration;
//! - [`config`]: runtime settings;
//! - [`shutdown`]: cross-platform termination signal handling.

mod config;
mod monitor;
mod shutdown;

pub use config::Config;
pub use monitor::Monitor;
