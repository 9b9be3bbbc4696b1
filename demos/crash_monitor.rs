//! # Example: crash_monitor
//!
//! Runs the fully wired monitor against in-process transports.
//!
//! Shows how to:
//! - Implement the [`Subscribe`] trait for a console observer.
//! - Feed telemetry through a [`ChannelStream`].
//! - Close the loop downstream: acknowledge each announced crash on the
//!   response topic, which clears the verdict.
//!
//! ## Flow
//! ```text
//! feeder task ──► ChannelStream ──► Monitor listeners ──► CrashProtocol
//!                                                              │
//!         ┌──────────────── "crashdetect/crashed" ◄────────────┘
//!         ▼
//! downstream handler ──► "crashdetect/crashed/response" ──► verdict cleared
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example crash_monitor
//! ```
//! Press Ctrl-C to stop.

use std::{sync::Arc, time::Duration};

use crashvisor::{
    ChannelStream, Config, Event, EventKind, MemoryTopicBus, Monitor, SignalSample, Subscribe,
    TopicBus, CRASH_ACK_TOPIC, CRASH_EVENT_TOPIC,
};

/// A simple console subscriber that prints the interesting events.
/// In real life, you could export metrics, ship logs, or trigger alerts.
struct ConsoleSubscriber;

#[async_trait::async_trait]
impl Subscribe for ConsoleSubscriber {
    async fn on_event(&self, ev: &Event) {
        match ev.kind {
            EventKind::MonitorStarted => {
                println!("[demo] monitor started");
            }
            EventKind::SampleObserved => {
                println!(
                    "[demo] sample:  path={} value={}",
                    ev.path.as_deref().unwrap_or("<unknown>"),
                    ev.value.unwrap_or(f64::NAN)
                );
            }
            EventKind::TriggerFired => {
                println!(
                    "[demo] TRIGGER: path={} value={}",
                    ev.path.as_deref().unwrap_or("<unknown>"),
                    ev.value.unwrap_or(f64::NAN)
                );
            }
            EventKind::CrashAnnounced => {
                println!("[demo] crash announced (status=1)");
            }
            EventKind::AckReceived => {
                println!("[demo] acknowledgment received");
            }
            EventKind::CrashCleared => {
                println!("[demo] crash cleared (status=0)");
            }
            EventKind::ShutdownRequested => {
                println!("[demo] shutdown requested");
            }
            _ => {}
        }
    }

    fn name(&self) -> &'static str {
        "console"
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::default();
    let stream = ChannelStream::new(cfg.queue_capacity_clamped());
    let topics = MemoryTopicBus::new(cfg.bus_capacity_clamped());

    // Downstream handler: acknowledges every announced crash after a beat.
    {
        let topics = Arc::clone(&topics);
        let mut crashes = topics.subscribe(CRASH_EVENT_TOPIC).await?;
        tokio::spawn(async move {
            while let Some(payload) = crashes.recv().await {
                let status = serde_json::from_str::<serde_json::Value>(&payload)
                    .ok()
                    .and_then(|v| v["result"]["status"].as_u64());
                if status == Some(1) {
                    tokio::time::sleep(Duration::from_millis(500)).await;
                    topics.publish(CRASH_ACK_TOPIC, String::from("handled"));
                }
            }
        });
    }

    // Telemetry feeder: calm driving with a hard-braking episode every
    // eighth sample.
    {
        let stream = Arc::clone(&stream);
        tokio::spawn(async move {
            let mut n: u64 = 0;
            loop {
                n += 1;
                let sample = if n % 8 == 0 {
                    SignalSample::LongitudinalAcceleration(-62.5)
                } else {
                    SignalSample::LongitudinalAcceleration((n % 5) as f64 - 2.0)
                };
                stream.feed(sample).await;
                tokio::time::sleep(Duration::from_millis(400)).await;
            }
        });
    }

    println!("crash monitor demo running; press Ctrl-C to stop");
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(ConsoleSubscriber)];
    let monitor = Monitor::new(cfg, stream, topics, subs);
    monitor.run().await?;
    Ok(())
}
