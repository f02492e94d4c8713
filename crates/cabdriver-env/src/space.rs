use std::collections::HashMap;

use crate::{Action, EnvConfig, EnvError, State};

#[derive(Debug, Clone)]
/// Every `(location, hour, day)` triple, enumerated location-major then hour then day.
pub struct StateSpace {
    locations: usize,
    hours: usize,
    days: usize,
    states: Vec<State>,
}

impl StateSpace {
    pub fn new(config: &EnvConfig) -> Self {
        let (locations, hours, days) = (
            config.locations,
            config.hours_per_day,
            config.days_per_week,
        );

        let size = locations.checked_mul(hours).and_then(|n| n.checked_mul(days));
        let mut states = Vec::with_capacity(size.unwrap_or(0));
        for location in 0..locations {
            for hour in 0..hours {
                for day in 0..days {
                    states.push(State::new(location, hour, day));
                }
            }
        }

        Self {
            locations,
            hours,
            days,
            states,
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn get(&self, index: usize) -> Option<State> {
        self.states.get(index).copied()
    }

    pub fn contains(&self, state: State) -> bool {
        state.location < self.locations && state.hour < self.hours && state.day < self.days
    }

    /// Dense index of a state, following the enumeration order.
    pub fn index_of(&self, state: State) -> Option<usize> {
        self.contains(state)
            .then(|| (state.location * self.hours + state.hour) * self.days + state.day)
    }

    /// Return `state` unchanged if it lies inside the space.
    pub fn check(&self, state: State) -> Result<State, EnvError> {
        if self.contains(state) {
            Ok(state)
        } else {
            Err(EnvError::InvalidState {
                state,
                locations: self.locations,
                hours: self.hours,
                days: self.days,
            })
        }
    }
}

#[derive(Debug, Clone)]
/// All rides between distinct locations followed by the no-ride action.
pub struct ActionSpace {
    actions: Vec<Action>,
    action_to_index: HashMap<Action, usize>,
}

impl ActionSpace {
    pub fn new(config: &EnvConfig) -> Self {
        let locations = config.locations;
        let mut actions = Vec::with_capacity(config.ride_action_count() + 1);
        for pickup in 0..locations {
            for drop in 0..locations {
                if pickup != drop {
                    actions.push(Action::ride(pickup, drop));
                }
            }
        }
        actions.push(Action::NoRide);

        let action_to_index = actions
            .iter()
            .enumerate()
            .map(|(idx, action)| (*action, idx))
            .collect();

        Self {
            actions,
            action_to_index,
        }
    }

    /// Total number of actions, including no-ride.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Number of ride actions; they occupy indices `0..ride_count()`.
    pub fn ride_count(&self) -> usize {
        self.actions.len() - 1
    }

    /// Index of the no-ride action, always the last one.
    pub fn no_ride_index(&self) -> usize {
        self.ride_count()
    }

    pub fn get(&self, index: usize) -> Result<Action, EnvError> {
        self.actions
            .get(index)
            .copied()
            .ok_or(EnvError::UnknownActionIndex {
                index,
                len: self.actions.len(),
            })
    }

    /// Dense index of an action, or `None` if it is not in the space.
    pub fn index_of(&self, action: Action) -> Option<usize> {
        self.action_to_index.get(&action).copied()
    }

    pub fn contains(&self, action: Action) -> bool {
        self.action_to_index.contains_key(&action)
    }

    /// Return `action` unchanged if it belongs to the space.
    pub fn check(&self, action: Action) -> Result<Action, EnvError> {
        if self.contains(action) {
            Ok(action)
        } else {
            Err(EnvError::InvalidAction { action })
        }
    }
}
