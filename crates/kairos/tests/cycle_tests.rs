mod common;

use chrono::Duration;
use common::{business_sky, epoch};
use kairos::aspects::AspectTable;
use kairos::cycles::{lunar_phase, LunarPhase, VoidCalculator};
use kairos::ephemeris::{snapshot, Body, LinearMotionSource};
use kairos::western::ZodiacSign;
use kairos::{PhaseError, VoidWindowError};

#[test]
fn test_phase_buckets_partition_the_cycle() {
    let mut ranges: Vec<(f64, f64)> = LunarPhase::CYCLE
        .iter()
        .map(|p| p.angle_range().unwrap())
        .collect();
    ranges.sort_by(|a, b| a.0.total_cmp(&b.0));

    assert_eq!(ranges.len(), 8);
    assert_eq!(ranges[0].0, 0.0);
    assert_eq!(ranges[7].1, 360.0);
    for pair in ranges.windows(2) {
        assert_eq!(pair[0].1, pair[1].0);
        assert_eq!(pair[0].1 - pair[0].0, 45.0);
    }
    assert_eq!(LunarPhase::Unknown.angle_range(), None);

    // Every angle lands in the bucket whose range holds it
    for tenth in 0..3600 {
        let angle = tenth as f64 / 10.0;
        let (lo, hi) = LunarPhase::from_angle(angle).angle_range().unwrap();
        assert!(lo <= angle && angle < hi, "{angle} outside [{lo}, {hi})");
    }
}

#[tokio::test]
async fn test_phase_from_snapshot() {
    let sky = snapshot(&business_sky(1.2), epoch(), &Body::ALL).await;
    let phase = lunar_phase(&sky).unwrap();
    assert_eq!(phase.phase, LunarPhase::WaxingGibbous);
    assert!((phase.angle - 162.0).abs() < 1e-9);
    assert!(phase.illumination > 0.9 && phase.illumination < 1.0);
}

#[tokio::test]
async fn test_phase_needs_both_luminaries() {
    let source = LinearMotionSource::new(epoch()).with_body(Body::Moon, 10.0, 13.0);
    let sky = snapshot(&source, epoch(), &[Body::Sun, Body::Moon]).await;
    assert_eq!(sky.missing, vec![Body::Sun]);
    assert_eq!(lunar_phase(&sky), Err(PhaseError::MissingBody(Body::Sun)));
}

#[tokio::test]
async fn test_void_runs_from_last_aspect_to_ingress() {
    let sky = snapshot(&business_sky(1.2), epoch(), &Body::ALL).await;
    let table = AspectTable::standard();
    let void = VoidCalculator::new(&table, 48.0).compute(&sky).unwrap();

    // Last contact is the Saturn conjunction at 27°; ingress at 30°
    let start_hours = 25.0 / 13.0 * 24.0;
    let end_hours = 28.0 / 13.0 * 24.0;
    let start_err = (void.start - (epoch() + Duration::milliseconds((start_hours * 3_600_000.0) as i64)))
        .num_seconds()
        .abs();
    let end_err = (void.end - (epoch() + Duration::milliseconds((end_hours * 3_600_000.0) as i64)))
        .num_seconds()
        .abs();
    assert!(start_err <= 1, "start off by {start_err}s");
    assert!(end_err <= 1, "end off by {end_err}s");
    assert!((void.duration_hours - (end_hours - start_hours)).abs() < 1e-6);
    assert_eq!(void.sign, ZodiacSign::Aries);
}

#[tokio::test]
async fn test_void_is_stable_across_the_day() {
    let table = AspectTable::standard();
    let calculator = VoidCalculator::new(&table, 48.0);
    let source = business_sky(1.2);

    let morning = calculator
        .compute(&snapshot(&source, epoch(), &Body::ALL).await)
        .unwrap();
    let evening = calculator
        .compute(&snapshot(&source, epoch() + Duration::hours(20), &Body::ALL).await)
        .unwrap();
    assert!((morning.start - evening.start).num_seconds().abs() <= 1);
    assert!((morning.end - evening.end).num_seconds().abs() <= 1);
}

#[tokio::test]
async fn test_void_past_ceiling_is_implausible() {
    let source = LinearMotionSource::new(epoch()).with_body(Body::Moon, 0.0, 14.4);
    let sky = snapshot(&source, epoch(), &[Body::Moon]).await;
    let table = AspectTable::standard();
    let calculator = VoidCalculator::new(&table, 48.0);

    match calculator.compute(&sky) {
        Err(VoidWindowError::Implausible { hours, ceiling_hours }) => {
            assert!((hours - 50.0).abs() < 1e-9);
            assert_eq!(ceiling_hours, 48.0);
        }
        other => panic!("expected an implausible void, got {other:?}"),
    }
    assert!(calculator.window_at(&sky).is_none());
}

#[tokio::test]
async fn test_void_needs_a_moving_moon() {
    let table = AspectTable::standard();
    let calculator = VoidCalculator::new(&table, 48.0);

    let stalled = LinearMotionSource::new(epoch()).with_body(Body::Moon, 10.0, -0.1);
    let sky = snapshot(&stalled, epoch(), &[Body::Moon]).await;
    assert_eq!(calculator.compute(&sky), Err(VoidWindowError::NotProgressing(Body::Moon)));

    let empty = snapshot(&stalled, epoch(), &[Body::Sun]).await;
    assert_eq!(calculator.compute(&empty), Err(VoidWindowError::MissingReference(Body::Moon)));
}
