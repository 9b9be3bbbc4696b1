//! # Publish/subscribe topic surface.
//!
//! The monitor publishes its verdict to, and consumes acknowledgments from,
//! a bus it does not own. This module provides:
//! - [`TopicBus`] - the contract with that bus
//! - [`MemoryTopicBus`] - an in-process stand-in for demos and tests
//! - the fixed topic names of the crash-event surface

mod topic;

pub use topic::{MemoryTopicBus, TopicBus, CRASH_ACK_TOPIC, CRASH_EVENT_TOPIC};
