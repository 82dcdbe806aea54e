use platte_game::hazards::resolve_hazard;
use platte_game::{
    CrossingConfig, CrossingOutcome, GameState, HazardConfig, HazardKind, JourneySetup,
    RiverConditions, Weather, WeatherConfig, WeatherState, attempt_ford, ford_success_chance,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::convert::TryFrom;

const SAMPLE_SIZE: usize = 5000;
const TOLERANCE: f64 = 0.025;

fn ratio(hits: usize, total: usize) -> f64 {
    let hits = u32::try_from(hits).expect("hits fit u32");
    let total = u32::try_from(total).expect("total fits u32");
    f64::from(hits) / f64::from(total)
}

#[test]
fn deep_ford_with_weak_wagon_succeeds_a_quarter_of_the_time() {
    const TRIALS: usize = 10_000;
    let cfg = CrossingConfig::default();
    let conditions = RiverConditions {
        depth: 6.2,
        width: 15.0,
    };
    assert_eq!(ford_success_chance(conditions, 40.0, &cfg), 25);

    let mut base = GameState::new(&JourneySetup::default(), 99).unwrap();
    base.wagon.restore_condition(40.0);
    let mut rng = SmallRng::seed_from_u64(0x00F0_2D00);
    let mut successes = 0usize;
    for _ in 0..TRIALS {
        let mut state = base.clone();
        if let CrossingOutcome::Forded { chance } =
            attempt_ford(&mut state, conditions, &cfg, &mut rng)
        {
            assert_eq!(chance, 25);
            successes += 1;
        }
    }
    // Four standard deviations of a binomial(10_000, 0.25) proportion.
    let sigma = (0.25_f64 * 0.75 / 10_000.0).sqrt();
    let observed = ratio(successes, TRIALS);
    assert!(
        (observed - 0.25).abs() <= 4.0 * sigma,
        "observed ford success rate {observed:.4} outside 0.25 +/- {:.4}",
        4.0 * sigma
    );
}

#[test]
fn hazard_trigger_rates_track_the_table() {
    let cfg = HazardConfig::default();
    let base = GameState::new(&JourneySetup::default(), 7).unwrap();
    let mut rng = SmallRng::seed_from_u64(1234);
    for (kind, expected) in [
        (HazardKind::Accident, 0.30),
        (HazardKind::Illness, 0.25),
        (HazardKind::Weather, 0.30),
        (HazardKind::Resource, 0.20),
    ] {
        let mut hits = 0usize;
        for _ in 0..SAMPLE_SIZE {
            let mut state = base.clone();
            if let Some(event) = resolve_hazard(kind, &mut state, &cfg, &mut rng) {
                assert_eq!(event.kind(), kind);
                hits += 1;
            }
        }
        let observed = ratio(hits, SAMPLE_SIZE);
        assert!(
            (observed - expected).abs() <= TOLERANCE,
            "{} triggered at {observed:.3}, expected {expected:.2}",
            kind.as_str()
        );
    }
}

#[test]
fn daily_weather_frequencies_track_configuration() {
    let cfg = WeatherConfig::default();
    let mut weather = WeatherState::default();
    let mut rng = SmallRng::seed_from_u64(0xC10D);
    let (mut rain, mut snow) = (0usize, 0usize);
    for _ in 0..SAMPLE_SIZE {
        match weather.roll_daily(&mut rng, 5, &cfg) {
            Weather::Rain => rain += 1,
            Weather::Snow => snow += 1,
            Weather::Clear => {}
        }
        assert!((1..=10).contains(&weather.strength));
    }
    assert!((ratio(rain, SAMPLE_SIZE) - 0.30).abs() <= TOLERANCE);
    assert!((ratio(snow, SAMPLE_SIZE) - 0.15).abs() <= TOLERANCE);
}
