use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{Action, CabDriver, EnvConfig, EnvError, Episode, State, TimeMatrix};

fn env() -> CabDriver {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    CabDriver::new(&mut rng).expect("default config is valid")
}

#[test]
fn ride_from_pickup_location_skips_approach_leg() {
    let env = env();
    let mut matrix = TimeMatrix::constant(env.config(), 9);
    matrix.set(0, 2, 10, 3, 4).expect("in range");

    let state = State::new(0, 10, 3);
    let action = Action::ride(0, 2);

    let trip = env
        .plan(state, action, &matrix)
        .expect("plan should succeed")
        .expect("ride has a plan");
    assert_eq!(trip.approach_hours, 0);
    assert_eq!(trip.ride_hours, 4);

    let reward = env.reward(state, action, &matrix).expect("reward");
    assert_eq!(reward, 16.0);

    let mut episode = Episode::new();
    let transition = env
        .transition(&mut episode, state, action, &matrix)
        .expect("transition");
    assert_eq!(transition.next_state, State::new(2, 14, 3));
    assert_eq!(transition.hours, 4);
    assert!(!transition.terminal);
    assert_eq!(episode.elapsed_hours(), 4);
}

#[test]
fn idle_at_end_of_week_wraps_hour_and_day() {
    let env = env();
    let matrix = TimeMatrix::constant(env.config(), 1);
    let state = State::new(1, 23, 6);

    assert_eq!(env.reward(state, Action::NoRide, &matrix).expect("reward"), -5.0);

    let mut episode = Episode::new();
    let transition = env
        .transition(&mut episode, state, Action::NoRide, &matrix)
        .expect("transition");
    assert_eq!(transition.next_state, State::new(1, 0, 0));
    assert_eq!(episode.elapsed_hours(), 1);
}

#[test]
fn ride_leg_is_looked_up_at_pickup_arrival_clock() {
    let env = env();
    let mut matrix = TimeMatrix::constant(env.config(), 1);
    // Approach crosses midnight into Sunday -> Monday wrap.
    matrix.set(1, 2, 22, 6, 3).expect("in range");
    matrix.set(2, 3, 1, 0, 5).expect("in range");

    let state = State::new(1, 22, 6);
    let action = Action::ride(2, 3);

    let trip = env
        .plan(state, action, &matrix)
        .expect("plan")
        .expect("ride has a plan");
    assert_eq!(trip.approach_hours, 3);
    assert_eq!((trip.pickup_at.hour, trip.pickup_at.day), (1, 0));
    assert_eq!(trip.ride_hours, 5);
    assert_eq!((trip.drop_at.hour, trip.drop_at.day), (6, 0));

    // 9 * 5 - 5 * (3 + 5)
    assert_eq!(env.reward(state, action, &matrix).expect("reward"), 5.0);

    let mut episode = Episode::new();
    let transition = env
        .transition(&mut episode, state, action, &matrix)
        .expect("transition");
    assert_eq!(transition.next_state, State::new(3, 6, 0));
    assert_eq!(episode.elapsed_hours(), 8);
}

#[test]
fn invalid_actions_and_states_are_rejected() {
    let env = env();
    let matrix = TimeMatrix::constant(env.config(), 2);
    let state = State::new(0, 0, 0);

    let err = env
        .reward(state, Action::ride(2, 2), &matrix)
        .expect_err("same pickup and drop is not an action");
    assert!(matches!(err, EnvError::InvalidAction { .. }));

    let err = env
        .reward(state, Action::ride(0, 5), &matrix)
        .expect_err("drop outside the map");
    assert!(matches!(err, EnvError::InvalidAction { .. }));

    let mut episode = Episode::new();
    let err = env
        .transition(&mut episode, State::new(0, 24, 0), Action::NoRide, &matrix)
        .expect_err("hour 24 is outside the day");
    assert!(matches!(err, EnvError::InvalidState { .. }));
    assert_eq!(episode, Episode::new());
}

#[test]
fn undersized_time_matrix_reports_out_of_range_lookup() {
    let env = env();
    let small = EnvConfig {
        hours_per_day: 12,
        ..EnvConfig::default()
    };
    let matrix = TimeMatrix::constant(&small, 2);

    let err = env
        .reward(State::new(0, 20, 0), Action::ride(1, 2), &matrix)
        .expect_err("hour 20 is not covered");
    assert!(matches!(
        err,
        EnvError::TimeMatrixOutOfRange { hour: 20, .. }
    ));
    assert!(matrix.check_covers(env.config()).is_err());
}

#[test]
fn episode_terminates_exactly_at_horizon_and_stays_terminal() {
    let env = env();
    let matrix = TimeMatrix::constant(env.config(), 3);
    let mut episode = Episode::new();
    let mut state = env.state_init();

    for _ in 0..719 {
        let transition = env
            .transition(&mut episode, state, Action::NoRide, &matrix)
            .expect("transition");
        assert!(!transition.terminal);
        state = transition.next_state;
    }

    let transition = env
        .transition(&mut episode, state, Action::NoRide, &matrix)
        .expect("transition");
    assert!(transition.terminal);
    assert_eq!(episode.elapsed_hours(), 720);

    let transition = env
        .transition(&mut episode, transition.next_state, Action::ride(0, 1), &matrix)
        .expect("transition");
    assert!(transition.terminal);
    assert!(episode.elapsed_hours() > 720);
}

#[test]
fn reset_clears_episode_and_keeps_initial_state() {
    let env = env();
    let matrix = TimeMatrix::constant(env.config(), 400);
    let mut episode = Episode::new();

    let transition = env
        .transition(&mut episode, State::new(0, 5, 1), Action::ride(1, 2), &matrix)
        .expect("transition");
    assert!(transition.terminal);

    let (states, actions, init) = env.reset(&mut episode);
    assert_eq!(states.len(), 5 * 24 * 7);
    assert_eq!(actions.len(), 21);
    assert_eq!(init, env.state_init());
    assert_eq!(episode.elapsed_hours(), 0);
    assert!(!episode.is_terminal());
}

#[test]
fn spaces_follow_enumeration_order() {
    let env = env();
    let actions = env.action_space();

    assert_eq!(actions.len(), 21);
    assert_eq!(actions.get(0).expect("first"), Action::ride(0, 1));
    assert_eq!(actions.get(3).expect("fourth"), Action::ride(0, 4));
    assert_eq!(actions.get(4).expect("fifth"), Action::ride(1, 0));
    assert_eq!(actions.get(19).expect("last ride"), Action::ride(4, 3));
    assert_eq!(actions.get(20).expect("sentinel"), Action::NoRide);
    assert_eq!(actions.no_ride_index(), 20);
    assert!(matches!(
        actions.get(21),
        Err(EnvError::UnknownActionIndex { index: 21, len: 21 })
    ));

    let states = env.state_space();
    assert_eq!(states.get(0), Some(State::new(0, 0, 0)));
    assert_eq!(states.get(1), Some(State::new(0, 0, 1)));
    assert_eq!(states.get(7), Some(State::new(0, 1, 0)));
    assert_eq!(states.get(168), Some(State::new(1, 0, 0)));
    for (idx, state) in states.states().iter().enumerate() {
        assert_eq!(states.index_of(*state), Some(idx));
    }
    for (idx, action) in actions.actions().iter().enumerate() {
        assert_eq!(actions.index_of(*action), Some(idx));
    }
    assert_eq!(actions.index_of(Action::ride(2, 2)), None);
    assert_eq!(actions.index_of(Action::ride(5, 0)), None);
    assert!(states.contains(env.state_init()));
}

#[test]
fn state_action_encoding_appends_pickup_and_drop() {
    let env = env();
    let encoded = env
        .encode_state_action(State::new(3, 0, 6), Action::ride(1, 4))
        .expect("valid input");

    assert_eq!(encoded.len(), 5 + 24 + 7 + 5 + 5);
    let ones: Vec<usize> = encoded
        .iter()
        .enumerate()
        .filter(|(_, v)| **v == 1)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(ones, vec![3, 5, 5 + 24 + 6, 36 + 1, 36 + 5 + 4]);

    let no_ride = env
        .encode_state_action(State::new(3, 0, 6), Action::NoRide)
        .expect("valid input");
    assert_eq!(no_ride[36], 1);
    assert_eq!(no_ride[41], 1);
}
