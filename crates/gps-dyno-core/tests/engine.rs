use gps_dyno_core::config::{TestThresholds, VehicleProfile};
use gps_dyno_core::engine::{MeasurementEngine, Phase, RunState};
use gps_dyno_core::gps::SpeedSample;
use gps_dyno_core::input::Command;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

fn vehicle() -> VehicleProfile {
    VehicleProfile {
        name: "Test Car".to_string(),
        weight_lbs: 3000.0,
    }
}

fn thresholds() -> TestThresholds {
    TestThresholds {
        start_mph: 20.0,
        end_mph: 60.0,
    }
}

fn engine() -> MeasurementEngine {
    MeasurementEngine::new(vehicle(), thresholds())
}

/// Feed speeds at one-second spacing, returning the phase after each tick
fn drive(engine: &mut MeasurementEngine, t0: Instant, speeds: &[f64]) -> Vec<Phase> {
    speeds
        .iter()
        .enumerate()
        .map(|(i, &speed)| {
            let now = t0 + Duration::from_secs(i as u64);
            engine
                .step_at(SpeedSample::with_speed(speed), Command::None, now)
                .phase
        })
        .collect()
}

#[test]
fn test_full_run_from_standstill() {
    let mut engine = engine();
    let t0 = Instant::now();

    let phases = drive(&mut engine, t0, &[0.0, 15.0, 18.0, 22.0, 30.0, 45.0, 61.0]);

    assert_eq!(
        phases,
        vec![
            Phase::Idle,
            Phase::Idle,
            Phase::Idle,
            Phase::Recording,
            Phase::Recording,
            Phase::Recording,
            Phase::Complete,
        ]
    );

    let result = engine.state().last_result.expect("run should have completed");
    assert!((result.elapsed_secs - 3.0).abs() < 1e-9);
    assert_eq!(result.max_speed_mph, 61.0);
    let expected_hp = 3000.0 * (60.0_f64.powi(2) - 20.0_f64.powi(2)) / (3.0 * 750.0);
    assert!((result.wheel_hp - expected_hp).abs() < 1e-9);
}

#[test]
fn test_snapshot_carries_elapsed_and_result() {
    let mut engine = engine();
    let t0 = Instant::now();
    drive(&mut engine, t0, &[10.0, 25.0]);

    let recording = engine.step_at(
        SpeedSample::with_speed(40.0),
        Command::None,
        t0 + Duration::from_millis(2500),
    );
    assert_eq!(recording.phase, Phase::Recording);
    assert_eq!(recording.elapsed, Some(Duration::from_millis(1500)));
    assert!(recording.result.is_none());

    let complete = engine.step_at(
        SpeedSample::with_speed(62.0),
        Command::None,
        t0 + Duration::from_secs(4),
    );
    assert_eq!(complete.phase, Phase::Complete);
    assert!(complete.elapsed.is_none());
    let result = complete.result.expect("complete snapshot has a result");
    assert!((result.elapsed_secs - 3.0).abs() < 1e-9);
    assert_eq!(result.max_speed_mph, 62.0);
}

#[test]
fn test_first_sample_above_start_waits() {
    let mut engine = engine();
    let phases = drive(&mut engine, Instant::now(), &[25.0]);
    assert_eq!(phases, vec![Phase::WaitingBelowStart]);
    assert!(engine.state().start.is_none());
}

#[test]
fn test_previous_above_start_is_not_a_crossing() {
    let state = RunState {
        previous_speed: Some(25.0),
        ..RunState::default()
    };
    let next = state.advance(
        &SpeedSample::with_speed(25.0),
        Command::None,
        Instant::now(),
        &vehicle(),
        &thresholds(),
    );
    assert_eq!(next.phase, Phase::WaitingBelowStart);
    assert!(next.start.is_none());
}

#[test]
fn test_waiting_requires_drop_below_then_crossing() {
    let mut engine = engine();
    let phases = drive(
        &mut engine,
        Instant::now(),
        &[30.0, 35.0, 25.0, 19.0, 19.5, 21.0],
    );
    assert_eq!(
        phases,
        vec![
            Phase::WaitingBelowStart,
            Phase::WaitingBelowStart,
            Phase::WaitingBelowStart,
            Phase::Idle,
            Phase::Idle,
            Phase::Recording,
        ]
    );
}

#[test]
fn test_complete_holds_until_reset() {
    let mut engine = engine();
    let t0 = Instant::now();
    drive(&mut engine, t0, &[10.0, 25.0, 65.0]);
    assert_eq!(engine.state().phase, Phase::Complete);
    let result = engine.state().last_result;

    // Slowing down and crossing the start threshold again does nothing
    let phases = drive(&mut engine, t0 + Duration::from_secs(3), &[40.0, 10.0, 30.0, 70.0]);
    assert_eq!(phases, vec![Phase::Complete; 4]);
    assert_eq!(engine.state().last_result, result);
}

#[test]
fn test_lost_fix_does_not_end_run() {
    let mut engine = engine();
    let t0 = Instant::now();
    drive(&mut engine, t0, &[10.0, 25.0]);

    for i in 2..30 {
        let snapshot = engine.step_at(
            SpeedSample::no_data(),
            Command::None,
            t0 + Duration::from_secs(i),
        );
        assert_eq!(snapshot.phase, Phase::Recording);
        assert_eq!(snapshot.speed_mph, 0.0);
    }
    assert_eq!(engine.state().max_speed_seen, 25.0);

    let done = engine.step_at(
        SpeedSample::with_speed(60.0),
        Command::None,
        t0 + Duration::from_secs(31),
    );
    assert_eq!(done.phase, Phase::Complete);
    let result = done.result.expect("run completes after the fix returns");
    assert!((result.elapsed_secs - 30.0).abs() < 1e-9);
}

#[test]
fn test_no_data_never_starts_a_run() {
    let mut engine = engine();
    let t0 = Instant::now();
    for i in 0..10 {
        let snapshot = engine.step_at(
            SpeedSample::no_data(),
            Command::None,
            t0 + Duration::from_secs(i),
        );
        assert_eq!(snapshot.phase, Phase::Idle);
    }
}

#[test]
fn test_reset_from_every_phase() {
    let t0 = Instant::now();
    let setups: [(&[f64], Phase); 4] = [
        (&[5.0], Phase::Idle),
        (&[30.0], Phase::WaitingBelowStart),
        (&[5.0, 30.0], Phase::Recording),
        (&[5.0, 30.0, 61.0], Phase::Complete),
    ];

    for (speeds, phase) in setups {
        let mut engine = engine();
        drive(&mut engine, t0, speeds);
        assert_eq!(engine.state().phase, phase);

        let snapshot = engine.step_at(
            SpeedSample::with_speed(10.0),
            Command::Reset,
            t0 + Duration::from_secs(10),
        );

        assert_eq!(snapshot.phase, Phase::Idle);
        assert!(snapshot.result.is_none());
        assert!(snapshot.elapsed.is_none());
        let expected = RunState {
            previous_speed: Some(10.0),
            ..RunState::default()
        };
        assert_eq!(engine.state(), &expected, "reset from {:?}", phase);
    }
}

#[test]
fn test_reset_above_start_waits_for_drop() {
    let mut engine = engine();
    let t0 = Instant::now();
    drive(&mut engine, t0, &[5.0, 30.0]);

    let snapshot = engine.step_at(
        SpeedSample::with_speed(45.0),
        Command::Reset,
        t0 + Duration::from_secs(2),
    );
    assert_eq!(snapshot.phase, Phase::WaitingBelowStart);
    assert!(engine.state().start.is_none());
    assert!(engine.state().last_result.is_none());
    assert_eq!(engine.state().previous_speed, Some(45.0));
}

#[test]
fn test_reset_below_start_arms_next_crossing() {
    let mut engine = engine();
    let t0 = Instant::now();
    drive(&mut engine, t0, &[5.0, 30.0]);

    engine.step_at(
        SpeedSample::with_speed(10.0),
        Command::Reset,
        t0 + Duration::from_secs(2),
    );
    let snapshot = engine.step_at(
        SpeedSample::with_speed(25.0),
        Command::None,
        t0 + Duration::from_secs(3),
    );

    assert_eq!(snapshot.phase, Phase::Recording);
    assert_eq!(engine.state().start, Some(t0 + Duration::from_secs(3)));
}

#[test]
fn test_reset_then_new_run() {
    let mut engine = engine();
    let t0 = Instant::now();
    drive(&mut engine, t0, &[5.0, 30.0, 61.0]);

    engine.step_at(
        SpeedSample::with_speed(10.0),
        Command::Reset,
        t0 + Duration::from_secs(3),
    );

    let phases = drive(&mut engine, t0 + Duration::from_secs(4), &[25.0, 40.0, 63.0]);
    assert_eq!(
        phases,
        vec![Phase::Recording, Phase::Recording, Phase::Complete]
    );
    let result = engine.state().last_result.expect("second run completes");
    assert!((result.elapsed_secs - 2.0).abs() < 1e-9);
    assert_eq!(result.max_speed_mph, 63.0);
}

#[test]
fn test_quit_command_leaves_state_alone() {
    let mut engine = engine();
    let t0 = Instant::now();
    drive(&mut engine, t0, &[5.0, 30.0]);
    let before = engine.state().clone();

    engine.step_at(
        SpeedSample::with_speed(35.0),
        Command::Quit,
        t0 + Duration::from_secs(2),
    );
    assert_eq!(engine.state().phase, before.phase);
    assert_eq!(engine.state().start, before.start);
}

fn allowed(from: Phase, to: Phase) -> bool {
    use Phase::*;
    matches!(
        (from, to),
        (Idle, Idle)
            | (Idle, WaitingBelowStart)
            | (Idle, Recording)
            | (WaitingBelowStart, WaitingBelowStart)
            | (WaitingBelowStart, Idle)
            | (Recording, Recording)
            | (Recording, Complete)
            | (Complete, Complete)
    )
}

#[test]
fn test_random_streams_respect_invariants() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let thresholds = thresholds();

    for _ in 0..200 {
        let mut engine = engine();
        let t0 = Instant::now();
        let mut phase = Phase::Idle;
        let mut last_max = 0.0_f64;

        for tick in 0..300u64 {
            let command = if rng.gen_ratio(1, 100) {
                Command::Reset
            } else {
                Command::None
            };
            let sample = if rng.gen_ratio(1, 10) {
                SpeedSample::no_data()
            } else {
                SpeedSample::with_speed(rng.gen_range(0.0..80.0))
            };
            let previous = engine.state().previous_speed;
            let speed = sample.speed_mph;

            let snapshot =
                engine.step_at(sample, command, t0 + Duration::from_millis(100 * tick));
            let state = engine.state();

            if command == Command::Reset {
                let expected = if speed >= thresholds.start_mph {
                    Phase::WaitingBelowStart
                } else {
                    Phase::Idle
                };
                assert_eq!(state.phase, expected);
                assert!(state.last_result.is_none());
            } else {
                assert!(
                    allowed(phase, state.phase),
                    "illegal transition {:?} -> {:?}",
                    phase,
                    state.phase
                );
                if phase == Phase::Idle && state.phase == Phase::Recording {
                    let previous = previous.expect("a run needs a previous sample");
                    assert!(previous < thresholds.start_mph);
                }
                if phase == Phase::Recording && state.phase == Phase::Recording {
                    assert!(state.max_speed_seen >= last_max);
                }
            }

            assert_eq!(
                state.start.is_some(),
                matches!(state.phase, Phase::Recording | Phase::Complete)
            );
            assert_eq!(snapshot.elapsed.is_some(), state.phase == Phase::Recording);
            assert_eq!(snapshot.result.is_some(), state.phase == Phase::Complete);

            assert_eq!(state.previous_speed, Some(speed));

            phase = state.phase;
            last_max = state.max_speed_seen;
        }
    }
}
