use kairos::aspects::{angular_separation, AspectCalculator, AspectKind, AspectOrb, AspectTable};
use kairos::ephemeris::{Body, CelestialPosition, NatalChart, RawPosition, SkySnapshot};
use chrono::{TimeZone, Utc};

fn position(body: Body, longitude: f64) -> CelestialPosition {
    CelestialPosition::from_raw(
        body,
        RawPosition { longitude, latitude: 0.0, distance: 1.0, speed: 1.0 },
    )
}

#[test]
fn test_classify_conjunction() {
    let calculator = AspectCalculator::default();

    let aspect = calculator.classify(100.0, 102.0).unwrap();
    assert_eq!(aspect.kind, AspectKind::Conjunction);
    assert!((aspect.orb - 2.0).abs() < 1e-9);
    assert!((aspect.strength - 0.75).abs() < 1e-9);
    assert!(aspect.is_applying);
}

#[test]
fn test_classify_opposition_across_zero() {
    let calculator = AspectCalculator::default();

    // 10° and 188°: 178° apart
    let aspect = calculator.classify(188.0, 10.0).unwrap();
    assert_eq!(aspect.kind, AspectKind::Opposition);
    assert!((aspect.orb - 2.0).abs() < 1e-9);
    assert!(!aspect.is_applying);
}

#[test]
fn test_gaps_between_tolerances_have_no_aspect() {
    let calculator = AspectCalculator::default();
    for gap in [20.0, 45.0, 75.0, 105.0, 150.0] {
        assert!(calculator.classify(0.0, gap).is_none(), "{gap}° should be unaspected");
    }
}

#[test]
fn test_at_most_one_aspect_for_every_separation() {
    let calculator = AspectCalculator::default();
    let mut d = 0.0;
    while d <= 180.0 {
        if let Some(aspect) = calculator.classify(0.0, d) {
            let tolerance = calculator.table().tolerance(aspect.kind).unwrap();
            assert!(aspect.orb <= tolerance);
            assert!((0.0..=1.0).contains(&aspect.strength));
        }
        d += 0.25;
    }
}

#[test]
fn test_strength_decays_linearly_with_orb() {
    let calculator = AspectCalculator::default();

    assert!((calculator.classify(0.0, 120.0).unwrap().strength - 1.0).abs() < 1e-12);
    assert!((calculator.classify(0.0, 124.0).unwrap().strength - 0.5).abs() < 1e-12);
    assert!(calculator.classify(0.0, 128.0).unwrap().strength.abs() < 1e-12);

    let mut last = f64::INFINITY;
    for tenth in 0..=60 {
        let strength = calculator.classify(0.0, 60.0 + tenth as f64 / 10.0).unwrap().strength;
        assert!(strength <= last);
        last = strength;
    }
}

#[test]
fn test_first_matching_row_wins() {
    // Overlapping tolerances: a wide square listed before the trine
    let table = AspectTable::new(vec![
        AspectOrb { kind: AspectKind::Square, exact_angle: 90.0, tolerance: 25.0 },
        AspectOrb { kind: AspectKind::Trine, exact_angle: 120.0, tolerance: 8.0 },
    ]);
    let calculator = AspectCalculator::new(table);
    assert_eq!(calculator.classify(0.0, 112.0).unwrap().kind, AspectKind::Square);
}

#[test]
fn test_separation_is_symmetric() {
    for (a, b) in [(10.0, 350.0), (0.0, 180.0), (359.0, 1.0), (90.0, 300.0)] {
        assert!((angular_separation(a, b) - angular_separation(b, a)).abs() < 1e-12);
        assert!((0.0..=180.0).contains(&angular_separation(a, b)));
    }
}

#[test]
fn test_snapshot_relationships_in_body_order() {
    let mut sky = SkySnapshot::new(Utc.with_ymd_and_hms(2024, 1, 7, 0, 0, 0).unwrap());
    sky.insert(position(Body::Sun, 10.0));
    sky.insert(position(Body::Moon, 70.0));
    sky.insert(position(Body::Mars, 100.0));

    let calculator = AspectCalculator::default();
    let rels = calculator.relationships(&sky);

    // Sun-Moon sextile, Sun-Mars square, Moon-Mars has no aspect (30°)
    assert_eq!(rels.len(), 2);
    assert_eq!((rels[0].from, rels[0].to, rels[0].kind), (Body::Sun, Body::Moon, AspectKind::Sextile));
    assert_eq!((rels[1].from, rels[1].to, rels[1].kind), (Body::Sun, Body::Mars, AspectKind::Square));
}

#[test]
fn test_transit_to_natal() {
    let mut sky = SkySnapshot::new(Utc.with_ymd_and_hms(2024, 1, 7, 0, 0, 0).unwrap());
    sky.insert(position(Body::Venus, 240.0));
    let natal = NatalChart::from_longitudes([(Body::Venus, 0.0), (Body::Moon, 238.0)]);

    let rels = AspectCalculator::default().transit_to_natal(&sky, &natal);
    let kinds: Vec<_> = rels.iter().map(|r| (r.to, r.kind)).collect();
    assert!(kinds.contains(&(Body::Venus, AspectKind::Trine)));
    assert!(kinds.contains(&(Body::Moon, AspectKind::Conjunction)));
}
