//! End-to-end tests of the fully wired monitor: in-process transports on
//! both sides, real listener tasks, real protocol.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, timeout};

use crashvisor::{
    ChannelStream, Config, MemoryTopicBus, Monitor, SignalPath, SignalSample, TopicBus,
    CRASH_ACK_TOPIC, CRASH_EVENT_TOPIC,
};

const RECV_WINDOW: Duration = Duration::from_secs(2);
const QUIET_WINDOW: Duration = Duration::from_millis(200);

struct Harness {
    stream: Arc<ChannelStream>,
    topics: Arc<MemoryTopicBus>,
    crashes: tokio::sync::mpsc::Receiver<String>,
    _monitor: tokio::task::JoinHandle<()>,
}

/// Wires a monitor over in-process transports and waits until its
/// listeners are registered.
async fn start() -> Harness {
    let cfg = Config::default();
    let stream = ChannelStream::new(cfg.queue_capacity_clamped());
    let topics = MemoryTopicBus::new(cfg.bus_capacity_clamped());
    let crashes = topics.subscribe(CRASH_EVENT_TOPIC).await.unwrap();

    let monitor = Arc::new(Monitor::new(
        cfg,
        Arc::clone(&stream) as Arc<dyn crashvisor::SignalStream>,
        Arc::clone(&topics) as Arc<dyn TopicBus>,
        Vec::new(),
    ));
    let handle = tokio::spawn(async move {
        let _ = monitor.run().await;
    });

    // run() registers listeners asynchronously; wait until both signal
    // paths have one.
    for _ in 0..100 {
        let registered = stream.listener_count(SignalPath::ObstacleWarning).await >= 1
            && stream
                .listener_count(SignalPath::LongitudinalAcceleration)
                .await
                >= 1;
        if registered {
            break;
        }
        sleep(Duration::from_millis(10)).await;
    }

    Harness {
        stream,
        topics,
        crashes,
        _monitor: handle,
    }
}

fn status_of(payload: &str) -> u64 {
    serde_json::from_str::<serde_json::Value>(payload).unwrap()["result"]["status"]
        .as_u64()
        .unwrap()
}

async fn expect_status(h: &mut Harness, expected: u64) {
    let payload = timeout(RECV_WINDOW, h.crashes.recv())
        .await
        .expect("timed out waiting for a crash-event publish")
        .expect("crash-event subscription closed");
    assert_eq!(status_of(&payload), expected);
}

async fn expect_quiet(h: &mut Harness) {
    if let Ok(msg) = timeout(QUIET_WINDOW, h.crashes.recv()).await {
        panic!("unexpected crash-event publish: {msg:?}");
    }
}

#[tokio::test]
async fn test_hard_braking_is_announced_then_acknowledged() {
    let mut h = start().await;

    h.stream
        .feed(SignalSample::LongitudinalAcceleration(-60.0))
        .await;
    expect_status(&mut h, 1).await;

    // Calm sample produces nothing.
    h.stream
        .feed(SignalSample::LongitudinalAcceleration(10.0))
        .await;
    expect_quiet(&mut h).await;

    // Acknowledgment clears.
    h.topics
        .publish(CRASH_ACK_TOPIC, String::from("handled"));
    expect_status(&mut h, 0).await;
}

#[tokio::test]
async fn test_boundary_acceleration_is_silent() {
    let mut h = start().await;

    for a in [-50.0, 50.0] {
        h.stream
            .feed(SignalSample::LongitudinalAcceleration(a))
            .await;
    }
    expect_quiet(&mut h).await;
}

#[tokio::test]
async fn test_repeated_warnings_reannounce() {
    let mut h = start().await;

    h.stream.feed(SignalSample::ObstacleWarning(true)).await;
    h.stream.feed(SignalSample::ObstacleWarning(true)).await;

    expect_status(&mut h, 1).await;
    expect_status(&mut h, 1).await;
    expect_quiet(&mut h).await;
}

#[tokio::test]
async fn test_lowered_warning_flag_is_silent() {
    let mut h = start().await;

    h.stream.feed(SignalSample::ObstacleWarning(false)).await;
    expect_quiet(&mut h).await;
}

#[tokio::test]
async fn test_acknowledgment_without_crash_still_clears() {
    let mut h = start().await;

    h.topics
        .publish(CRASH_ACK_TOPIC, String::from("spurious"));
    expect_status(&mut h, 0).await;
}
