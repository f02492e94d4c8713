use std::fmt;

use serde::{Deserialize, Serialize};

/// Driver position in space-time: `(location, hour of day, day of week)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct State {
    pub location: usize,
    pub hour: usize,
    pub day: usize,
}

impl State {
    pub fn new(location: usize, hour: usize, day: usize) -> Self {
        Self {
            location,
            hour,
            day,
        }
    }

    /// Return the state as a `(location, hour, day)` tuple.
    pub fn as_tuple(self) -> (usize, usize, usize) {
        (self.location, self.hour, self.day)
    }
}

impl From<(usize, usize, usize)> for State {
    fn from((location, hour, day): (usize, usize, usize)) -> Self {
        Self::new(location, hour, day)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.location, self.hour, self.day)
    }
}

/// A driver decision: carry a passenger from `pickup` to `drop`, or idle for an hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    NoRide,
    Ride { pickup: usize, drop: usize },
}

impl Action {
    /// Tuple form of the no-ride action.
    pub const NO_RIDE_PAIR: (usize, usize) = (0, 0);

    pub fn ride(pickup: usize, drop: usize) -> Self {
        Action::Ride { pickup, drop }
    }

    /// Return the `(pickup, drop)` pair; the no-ride action maps to `(0, 0)`.
    pub fn as_pair(self) -> (usize, usize) {
        match self {
            Action::NoRide => Self::NO_RIDE_PAIR,
            Action::Ride { pickup, drop } => (pickup, drop),
        }
    }
}

impl From<(usize, usize)> for Action {
    /// `(0, 0)` is the no-ride sentinel; any other pair is a ride.
    /// Pairs with `pickup == drop` are still rejected by the environment.
    fn from(pair: (usize, usize)) -> Self {
        if pair == Self::NO_RIDE_PAIR {
            Action::NoRide
        } else {
            Action::Ride {
                pickup: pair.0,
                drop: pair.1,
            }
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::NoRide => write!(f, "no-ride"),
            Action::Ride { pickup, drop } => write!(f, "({pickup}, {drop})"),
        }
    }
}
