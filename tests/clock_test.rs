use examera::session::clock::{ClockEvent, SessionClock};
use tokio::sync::mpsc;

#[tokio::test(start_paused = true)]
async fn counts_down_once_per_second_then_expires() {
    let (tx, mut rx) = mpsc::channel(8);
    let mut clock = SessionClock::new();
    clock.start(3, tx).unwrap();

    assert_eq!(rx.recv().await, Some(ClockEvent::Tick(2)));
    assert_eq!(rx.recv().await, Some(ClockEvent::Tick(1)));
    assert_eq!(rx.recv().await, Some(ClockEvent::Tick(0)));
    assert_eq!(rx.recv().await, Some(ClockEvent::Expired));

    // The clock task finishes after expiry and drops its sender.
    assert_eq!(rx.recv().await, None);
}

#[tokio::test(start_paused = true)]
async fn stop_cancels_the_countdown() {
    let (tx, mut rx) = mpsc::channel(8);
    let mut clock = SessionClock::new();
    clock.start(120, tx).unwrap();

    assert_eq!(rx.recv().await, Some(ClockEvent::Tick(119)));
    clock.stop();
    assert!(!clock.is_running());

    assert_eq!(rx.recv().await, None);
}

#[tokio::test(start_paused = true)]
async fn starting_a_running_clock_is_an_error() {
    let (tx, _rx) = mpsc::channel(8);
    let mut clock = SessionClock::new();
    clock.start(120, tx.clone()).unwrap();

    assert!(clock.is_running());
    assert!(clock.start(120, tx).is_err());
}

#[tokio::test(start_paused = true)]
async fn restart_after_stop_is_allowed() {
    let (tx, mut rx) = mpsc::channel(8);
    let mut clock = SessionClock::new();
    clock.start(120, tx).unwrap();
    clock.stop();

    let (tx2, mut rx2) = mpsc::channel(8);
    clock.start(5, tx2).unwrap();
    assert_eq!(rx2.recv().await, Some(ClockEvent::Tick(4)));

    // The first channel saw at most what was sent before the abort.
    while let Some(event) = rx.recv().await {
        assert!(matches!(event, ClockEvent::Tick(_)));
    }
}

#[tokio::test(start_paused = true)]
async fn dropping_the_clock_stops_the_task() {
    let (tx, mut rx) = mpsc::channel(8);
    {
        let mut clock = SessionClock::new();
        clock.start(120, tx).unwrap();
        assert_eq!(rx.recv().await, Some(ClockEvent::Tick(119)));
    }

    assert_eq!(rx.recv().await, None);
}
