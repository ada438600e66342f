use countdown_core::{
    compute_remaining, CountdownEngine, CountdownState, ManualClock, RemainingDuration,
    TargetTimestamp,
};

const DAY_MS: i64 = 86_400_000;

#[test]
fn past_or_equal_target_yields_terminal_snapshot() {
    for (target, now) in [(0, 0), (1_000, 1_000), (-5, 1_000), (0, i64::MAX), (i64::MIN, 0)] {
        let remaining = compute_remaining(TargetTimestamp::from_epoch_ms(target), now);
        assert_eq!(remaining, RemainingDuration::ZERO, "target={target} now={now}");
    }
}

#[test]
fn decomposition_only_drops_sub_second_remainder() {
    let now = 1_700_000_000_000_i64;
    let differences = [
        1,
        999,
        1_000,
        59_999,
        60_000,
        3_599_999,
        3_600_000,
        DAY_MS - 1,
        DAY_MS,
        45 * DAY_MS + 12_345_678,
        400 * DAY_MS + 23 * 3_600_000 + 59 * 60_000 + 59_999,
    ];

    for difference in differences {
        let r = compute_remaining(TargetTimestamp::from_epoch_ms(now + difference), now);
        assert_eq!(r.total, difference as u64);
        assert!(r.hours < 24 && r.minutes < 60 && r.seconds < 60, "{r:?}");

        let recomposed = r.days * 86_400_000 + r.hours * 3_600_000 + r.minutes * 60_000 + r.seconds * 1_000;
        assert!(recomposed <= r.total, "{r:?}");
        assert!(r.total - recomposed < 1_000, "{r:?}");
    }
}

#[test]
fn ninety_seconds_decomposes_to_one_minute_thirty() {
    let r = compute_remaining(TargetTimestamp::from_epoch_ms(90_000), 0);
    assert_eq!(
        r,
        RemainingDuration {
            total: 90_000,
            days: 0,
            hours: 0,
            minutes: 1,
            seconds: 30,
        }
    );
    let fields = r.display();
    assert_eq!(
        (fields.days.as_str(), fields.hours.as_str(), fields.minutes.as_str(), fields.seconds.as_str()),
        ("0", "00", "01", "30")
    );
}

#[test]
fn forty_five_days_decomposes_to_whole_days() {
    let r = compute_remaining(TargetTimestamp::from_epoch_ms(45 * DAY_MS), 0);
    assert_eq!(
        r,
        RemainingDuration {
            total: 3_888_000_000,
            days: 45,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    );
}

#[test]
fn sub_second_remainder_is_still_counting() {
    let target = TargetTimestamp::from_epoch_ms(10_000);
    let engine = CountdownEngine::with_target(ManualClock::new(10_000 - 500), target);

    let state = engine.snapshot();
    let expected = RemainingDuration {
        total: 500,
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };
    assert_eq!(state, CountdownState::Counting(expected));
    assert!(!state.is_complete());
}

#[test]
fn complete_is_sticky_even_if_clock_moves_backward() {
    let clock = ManualClock::new(0);
    let engine = CountdownEngine::with_target(clock.clone(), TargetTimestamp::from_epoch_ms(2_000));

    assert!(matches!(engine.snapshot(), CountdownState::Counting(_)));
    clock.set(2_000);
    assert_eq!(engine.snapshot(), CountdownState::Complete);

    clock.set(5_000);
    assert_eq!(engine.snapshot(), CountdownState::Complete);
    clock.set(0);
    assert_eq!(engine.snapshot(), CountdownState::Complete);
    assert_eq!(engine.snapshot().remaining(), Some(RemainingDuration::ZERO));
}

#[test]
fn counting_recomputes_from_fresh_clock_reading() {
    let clock = ManualClock::new(0);
    let engine = CountdownEngine::with_target(clock.clone(), TargetTimestamp::from_epoch_ms(DAY_MS));

    let first = engine.snapshot().remaining().unwrap();
    clock.advance(1_000);
    let second = engine.snapshot().remaining().unwrap();

    assert_eq!(first.total - second.total, 1_000);
    assert_eq!(second.to_string(), "0d 23:59:59");
}

#[test]
fn state_serializes_for_renderers() {
    let counting = CountdownState::Counting(RemainingDuration::from_millis(90_000));
    let json = serde_json::to_value(counting).unwrap();
    assert_eq!(json["state"], "counting");
    assert_eq!(json["remaining"]["minutes"], 1);
    assert_eq!(json["remaining"]["seconds"], 30);

    let complete = serde_json::to_value(CountdownState::Complete).unwrap();
    assert_eq!(complete, serde_json::json!({ "state": "complete" }));

    let unresolved = serde_json::to_value(CountdownState::Unresolved).unwrap();
    assert_eq!(unresolved, serde_json::json!({ "state": "unresolved" }));
}
