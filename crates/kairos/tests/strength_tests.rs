use kairos::aspects::AspectCalculator;
use kairos::ephemeris::{Body, CelestialPosition, NatalChart, RawPosition};
use kairos::timing::{ActivityCategory, ProfileTable};
use kairos::western::{DignityState, DignityTable, StrengthAnalyzer, ZodiacSign};

fn at(body: Body, longitude: f64) -> CelestialPosition {
    CelestialPosition::from_raw(
        body,
        RawPosition { longitude, latitude: 0.0, distance: 1.0, speed: 1.0 },
    )
}

#[test]
fn test_dignity_radii() {
    let table = DignityTable::standard();

    // Sun: exaltation 19°, detriment 315°, fall 199°
    assert_eq!(table.assess(Body::Sun, 24.0), DignityState::Exaltation);
    assert_eq!(table.assess(Body::Sun, 24.5), DignityState::Peregrine);
    assert_eq!(table.assess(Body::Sun, 325.0), DignityState::Detriment);
    assert_eq!(table.assess(Body::Sun, 189.0), DignityState::Fall);
    assert_eq!(table.assess(Body::Sun, 120.0), DignityState::Peregrine);
}

#[test]
fn test_dignity_wraps_across_aries_point() {
    let table = DignityTable::standard();
    // Venus exalted at 27° Pisces
    assert_eq!(table.assess(Body::Venus, 1.0), DignityState::Exaltation);
    // Mercury falls at 15° Pisces
    assert_eq!(table.assess(Body::Mercury, 354.0), DignityState::Fall);
}

#[test]
fn test_outer_bodies_have_no_dignities() {
    let table = DignityTable::standard();
    for body in [Body::Uranus, Body::Neptune, Body::Pluto] {
        assert!(table.points(body).is_none());
        assert_eq!(table.assess(body, 0.0), DignityState::Peregrine);
    }
}

#[test]
fn test_strength_components_add_up() {
    let dignities = DignityTable::standard();
    let aspects = AspectCalculator::default();
    let analyzer = StrengthAnalyzer::new(&dignities, &aspects);
    let profiles = ProfileTable::standard();
    let business = profiles.get(ActivityCategory::Business).unwrap();

    // Jupiter at 75° sits on its detriment point, in Gemini
    let result = analyzer.analyze(&at(Body::Jupiter, 75.0), &business.segment_weights, None);
    assert_eq!(result.dignity, DignityState::Detriment);
    assert_eq!(ZodiacSign::from_longitude(75.0), ZodiacSign::Gemini);
    let expected_segment = 0.2 * business.segment_weights[2];
    assert!((result.segment_bonus - expected_segment).abs() < 1e-12);
    assert!((result.total - (0.5 - 0.3 + expected_segment)).abs() < 1e-12);
    assert_eq!(result.natal_bonus, 0.0);
}

#[test]
fn test_strength_is_always_clamped() {
    let dignities = DignityTable::standard();
    let aspects = AspectCalculator::default();
    let analyzer = StrengthAnalyzer::new(&dignities, &aspects);

    for body in Body::ALL {
        let natal = NatalChart::from_longitudes([(body, 0.0)]);
        for step in 0..72 {
            let lon = step as f64 * 5.0;
            for weights in [[0.0; 12], [1.0; 12]] {
                let total = analyzer.analyze(&at(body, lon), &weights, Some(&natal)).total;
                assert!((0.0..=1.0).contains(&total), "{body} at {lon}: {total}");
            }
        }
    }
}

#[test]
fn test_hard_natal_contact_still_adds_strength() {
    let dignities = DignityTable::standard();
    let aspects = AspectCalculator::default();
    let analyzer = StrengthAnalyzer::new(&dignities, &aspects);
    let natal = NatalChart::from_longitudes([(Body::Mars, 40.0)]);

    // Exact square to natal Mars: any contact counts toward strength
    let result = analyzer.analyze(&at(Body::Mars, 130.0), &[0.0; 12], Some(&natal));
    assert!((result.natal_bonus - 0.3).abs() < 1e-9);
}
