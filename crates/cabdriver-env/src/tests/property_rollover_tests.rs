use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{Action, CabDriver, Episode, State, TimeMatrix, clock::Clock};

fn env() -> CabDriver {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    CabDriver::new(&mut rng).expect("default config is valid")
}

fn state_strategy() -> impl Strategy<Value = State> {
    (0usize..5, 0usize..24, 0usize..7).prop_map(State::from)
}

proptest! {
    #[test]
    fn clock_advance_matches_modular_arithmetic(hour in 0usize..24, day in 0usize..7, delta in 0u64..2000) {
        let next = Clock::new(hour, day).advance(delta, 24, 7);
        let total = hour as u64 + delta;

        prop_assert_eq!(next.hour as u64, total % 24);
        prop_assert_eq!(next.day as u64, (day as u64 + total / 24) % 7);
    }

    #[test]
    fn idle_costs_one_hour_everywhere(state in state_strategy()) {
        let env = env();
        let matrix = TimeMatrix::constant(env.config(), 1);

        prop_assert_eq!(env.reward(state, Action::NoRide, &matrix).unwrap(), -5.0);

        let mut episode = Episode::new();
        let transition = env.transition(&mut episode, state, Action::NoRide, &matrix).unwrap();
        let wrapped = state.hour == 23;

        prop_assert_eq!(transition.next_state.location, state.location);
        prop_assert_eq!(transition.next_state.hour, (state.hour + 1) % 24);
        let expected_day = if wrapped { (state.day + 1) % 7 } else { state.day };
        prop_assert_eq!(transition.next_state.day, expected_day);
        prop_assert_eq!(episode.elapsed_hours(), 1);
    }

    #[test]
    fn both_trip_legs_roll_over_independently(
        state in state_strategy(),
        action_idx in 0usize..20,
        seed in any::<u64>(),
    ) {
        let env = env();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let matrix = TimeMatrix::random(env.config(), &mut rng, 1..=40);
        let action = env.action_space().get(action_idx).unwrap();
        let (pickup, drop) = action.as_pair();

        let t1 = if state.location == pickup {
            0
        } else {
            matrix.get(state.location, pickup, state.hour, state.day).unwrap() as u64
        };
        let p_total = state.hour as u64 + t1;
        let p_hour = (p_total % 24) as usize;
        let p_day = ((state.day as u64 + p_total / 24) % 7) as usize;

        let t2 = matrix.get(pickup, drop, p_hour, p_day).unwrap() as u64;
        let q_total = p_hour as u64 + t2;
        let q_hour = (q_total % 24) as usize;
        let q_day = ((p_day as u64 + q_total / 24) % 7) as usize;

        let reward = env.reward(state, action, &matrix).unwrap();
        prop_assert_eq!(reward, 9.0 * t2 as f64 - 5.0 * (t1 + t2) as f64);

        let mut episode = Episode::new();
        let transition = env.transition(&mut episode, state, action, &matrix).unwrap();
        prop_assert_eq!(transition.next_state, State::new(drop, q_hour, q_day));
        prop_assert_eq!(episode.elapsed_hours(), t1 + t2);
    }

    #[test]
    fn elapsed_time_is_monotone_and_terminal_is_sticky(
        choices in proptest::collection::vec(0usize..21, 1..200),
        seed in any::<u64>(),
    ) {
        let env = env();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let matrix = TimeMatrix::random(env.config(), &mut rng, 1..=11);
        let mut episode = Episode::new();
        let mut state = env.state_init();
        let mut previous = 0;
        let mut seen_terminal = false;

        for choice in choices {
            let action = env.action_space().get(choice).unwrap();
            let transition = env.transition(&mut episode, state, action, &matrix).unwrap();

            prop_assert!(episode.elapsed_hours() >= previous);
            if seen_terminal {
                prop_assert!(transition.terminal);
            } else {
                prop_assert_eq!(transition.terminal, episode.elapsed_hours() >= 720);
            }
            seen_terminal |= transition.terminal;
            previous = episode.elapsed_hours();
            state = transition.next_state;
        }
    }

    #[test]
    fn state_encoding_is_deterministic_one_hot(state in state_strategy()) {
        let env = env();
        let first = env.encode_state(state).unwrap();
        let second = env.encode_state(state).unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), 36);
        prop_assert_eq!(first.iter().map(|v| *v as usize).sum::<usize>(), 3);
        prop_assert_eq!(first[state.location], 1);
        prop_assert_eq!(first[5 + state.hour], 1);
        prop_assert_eq!(first[5 + 24 + state.day], 1);
    }
}
