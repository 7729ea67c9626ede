use super::*;

#[test]
fn base_speed_gives_base_timing() {
    let t = StreamTiming::for_speed(500.0).unwrap();
    assert_eq!(t.traversal_ms, 15_000.0);
    assert_eq!(t.creation_interval_ms, 1000.0);
}

#[test]
fn doubling_speed_halves_durations() {
    let t = StreamTiming::for_speed(1000.0).unwrap();
    assert_eq!(t.traversal_ms, 7_500.0);
    assert_eq!(t.creation_interval_ms, 500.0);
    assert!(StreamTiming::for_speed(0.0).is_err());
    assert!(StreamTiming::for_speed(f64::INFINITY).is_err());
}

#[test]
fn clock_fires_immediately_then_per_interval() {
    let mut clock = CreationClock::new(300.0);
    assert!(clock.poll(Timestamp::from_millis(1000.0)));
    assert!(!clock.poll(Timestamp::from_millis(1299.0)));
    assert!(clock.poll(Timestamp::from_millis(1300.0)));
    assert!(!clock.poll(Timestamp::from_millis(1300.0)));

    clock.reset();
    assert!(clock.poll(Timestamp::from_millis(1301.0)));
    clock.set_interval(10.0);
    assert_eq!(clock.interval_ms(), 10.0);
    assert!(clock.poll(Timestamp::from_millis(1311.0)));
}
