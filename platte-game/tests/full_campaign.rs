use platte_game::{
    AutoHooks, Direction, GameError, GameState, JourneyCfg, JourneySession, JourneySetup,
    TrailVariant, TurnReport,
};

const MAX_DAYS: usize = 400;
const DAILY_MILES: i64 = 20;

fn setup_for(trail: TrailVariant) -> JourneySetup {
    JourneySetup {
        player_name: String::from("Campaigner"),
        trail,
        ..JourneySetup::default()
    }
}

fn assert_gauges(state: &GameState) {
    let player = &state.player;
    assert!((0..=100).contains(&player.health()), "health {}", player.health());
    assert!((0..=100).contains(&player.fatigue()), "fatigue {}", player.fatigue());
    assert!((0..=100).contains(&player.hunger()), "hunger {}", player.hunger());
    let condition = state.wagon.condition();
    assert!((0.0..=100.0).contains(&condition), "wagon {condition}");
    assert!(state.trail.miles_traveled() <= state.trail.total_miles());
    for ox in state.oxen.oxen() {
        assert!((0..=100).contains(&ox.health()));
    }
}

/// Free actions first (trading, medicine), then exactly one day-consuming action.
fn play_day(session: &mut JourneySession, hooks: &mut AutoHooks) -> Result<TurnReport, GameError> {
    let state = session.state();
    let at_post = state.trail.current_landmark().is_trade_post;
    if at_post && state.food_lbs() < 100 && state.money() >= 100 {
        let _ = session.buy("rations", 100);
    }
    if session.state().player.health() < 50 && session.state().inventory.quantity_of("medicine") > 0
    {
        session.use_item("medicine")?;
    }

    let state = session.state();
    if state.player.fatigue() > 70 {
        session.rest()
    } else if state.food_lbs() < 20 && state.inventory.ammunition() > 0 {
        session.hunt()
    } else {
        session.travel(Direction::West, DAILY_MILES, hooks)
    }
}

fn run_campaign(trail: TrailVariant, seed: u64) -> (GameState, Vec<TurnReport>) {
    let mut session = JourneySession::new(&setup_for(trail), seed, JourneyCfg::default())
        .expect("default journey sets up");
    let mut hooks = AutoHooks::default();
    let mut reports = Vec::new();
    for _ in 0..MAX_DAYS {
        if session.is_over() {
            break;
        }
        let report = play_day(&mut session, &mut hooks).expect("policy only issues legal commands");
        assert_gauges(session.state());
        reports.push(report);
    }
    (session.into_state(), reports)
}

#[test]
fn every_trail_reaches_exactly_one_ending() {
    for (offset, trail) in TrailVariant::ALL.into_iter().enumerate() {
        let seed = 0x00C0_FFEE + offset as u64;
        let (state, reports) = run_campaign(trail, seed);
        assert!(state.is_over(), "{trail} campaign never ended");
        let endings = reports.iter().filter(|report| report.ending.is_some()).count();
        assert_eq!(endings, 1, "{trail} recorded {endings} endings");
        assert_eq!(
            reports.last().and_then(|report| report.ending.clone()),
            state.ending
        );
    }
}

#[test]
fn finished_journeys_refuse_further_commands() {
    let (state, _) = run_campaign(TrailVariant::Oregon, 17);
    let mut session = JourneySession::from_state(state, JourneyCfg::default()).unwrap();
    let mut hooks = AutoHooks::default();
    assert!(matches!(
        session.travel(Direction::West, 10, &mut hooks),
        Err(GameError::GameOver(_))
    ));
    assert!(matches!(session.rest(), Err(GameError::GameOver(_))));
    assert!(matches!(session.hunt(), Err(GameError::GameOver(_))));
}

#[test]
fn identical_seeds_replay_identically() {
    for trail in TrailVariant::ALL {
        let (first, first_reports) = run_campaign(trail, 0xD00D);
        let (second, second_reports) = run_campaign(trail, 0xD00D);
        assert_eq!(first, second);
        assert_eq!(first_reports, second_reports);
    }
}

#[test]
fn different_seeds_diverge() {
    let (first, _) = run_campaign(TrailVariant::California, 1);
    let (second, _) = run_campaign(TrailVariant::California, 2);
    assert_ne!(first.logs, second.logs);
}

#[test]
fn mid_journey_snapshot_roundtrips_and_resumes() {
    let mut session =
        JourneySession::new(&setup_for(TrailVariant::Mormon), 4242, JourneyCfg::default())
            .unwrap();
    let mut hooks = AutoHooks::default();
    for _ in 0..15 {
        if session.is_over() {
            break;
        }
        play_day(&mut session, &mut hooks).unwrap();
    }
    let json = session.state().to_snapshot().unwrap();
    let restored = GameState::from_snapshot(&json).unwrap();
    assert_eq!(&restored, session.state());

    let mut resumed = JourneySession::from_state(restored, JourneyCfg::default()).unwrap();
    let mut twin = JourneySession::from_state(
        GameState::from_snapshot(&json).unwrap(),
        JourneyCfg::default(),
    )
    .unwrap();
    if !resumed.is_over() {
        let a = resumed.travel(Direction::West, DAILY_MILES, &mut hooks).unwrap();
        let b = twin.travel(Direction::West, DAILY_MILES, &mut hooks).unwrap();
        assert_eq!(a, b);
        assert_eq!(resumed.state(), twin.state());
    }
}
