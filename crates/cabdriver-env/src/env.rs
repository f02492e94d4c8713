use log::{debug, info, trace};
use rand::Rng;

use crate::{
    Action, EnvConfig, EnvError, Episode, RideRequests, State, TimeMatrix, TripPlan,
    clock::Clock,
    encoding,
    requests::RequestSampler,
    space::{ActionSpace, StateSpace},
};

/// Result of applying one action to a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next_state: State,
    /// Hours the action consumed.
    pub hours: u64,
    pub terminal: bool,
}

#[derive(Debug, Clone)]
/// Cab driver environment definition: spaces, economics, and request model.
///
/// Immutable after construction. Episode progress lives in an `Episode`
/// passed to `transition`, so a single definition can be shared across
/// parallel rollouts.
pub struct CabDriver {
    config: EnvConfig,
    state_space: StateSpace,
    action_space: ActionSpace,
    state_init: State,
    requests: RequestSampler,
}

impl CabDriver {
    /// Build the environment with default hyperparameters.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Result<Self, EnvError> {
        Self::with_config(EnvConfig::default(), rng)
    }

    /// Build the environment from `config`, drawing the initial state from `rng`.
    pub fn with_config<R: Rng + ?Sized>(config: EnvConfig, rng: &mut R) -> Result<Self, EnvError> {
        config.validate()?;

        let state_space = StateSpace::new(&config);
        let action_space = ActionSpace::new(&config);
        let requests = RequestSampler::new(&config)?;

        let state_init = state_space
            .get(rng.gen_range(0..state_space.len()))
            .ok_or_else(|| EnvError::InvalidConfig("state space is empty".to_string()))?;

        debug!(
            "built cab driver environment: {} states, {} actions, initial state {}",
            state_space.len(),
            action_space.len(),
            state_init
        );

        Ok(Self {
            config,
            state_space,
            action_space,
            state_init,
            requests,
        })
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn state_space(&self) -> &StateSpace {
        &self.state_space
    }

    pub fn action_space(&self) -> &ActionSpace {
        &self.action_space
    }

    pub fn state_init(&self) -> State {
        self.state_init
    }

    /// Reset `episode` and return the spaces and the initial state.
    pub fn reset(&self, episode: &mut Episode) -> (&StateSpace, &ActionSpace, State) {
        episode.reset();
        debug!("reset episode at initial state {}", self.state_init);
        (&self.state_space, &self.action_space, self.state_init)
    }

    /// One-hot encoding of `state` with length `m + t + d`.
    pub fn encode_state(&self, state: State) -> Result<Vec<u8>, EnvError> {
        let state = self.state_space.check(state)?;
        Ok(encoding::encode_state(&self.config, state))
    }

    /// One-hot encoding of `(state, action)` with length `m + t + d + 2m`.
    pub fn encode_state_action(&self, state: State, action: Action) -> Result<Vec<u8>, EnvError> {
        let state = self.state_space.check(state)?;
        let action = self.action_space.check(action)?;
        Ok(encoding::encode_state_action(&self.config, state, action))
    }

    /// Sample the ride requests offered at `state`, always including no-ride.
    pub fn requests<R: Rng + ?Sized>(
        &self,
        state: State,
        rng: &mut R,
    ) -> Result<RideRequests, EnvError> {
        let state = self.state_space.check(state)?;
        self.requests.sample(state.location, &self.action_space, rng)
    }

    /// Plan the legs of `action` from `state`; `None` for no-ride.
    pub fn plan(
        &self,
        state: State,
        action: Action,
        matrix: &TimeMatrix,
    ) -> Result<Option<TripPlan>, EnvError> {
        let state = self.state_space.check(state)?;
        match self.action_space.check(action)? {
            Action::NoRide => Ok(None),
            Action::Ride { pickup, drop } => {
                TripPlan::plan(&self.config, matrix, state, pickup, drop).map(Some)
            }
        }
    }

    /// Reward for taking `action` in `state`.
    ///
    /// Must be evaluated on the pre-transition state.
    pub fn reward(
        &self,
        state: State,
        action: Action,
        matrix: &TimeMatrix,
    ) -> Result<f64, EnvError> {
        Ok(match self.plan(state, action, matrix)? {
            None => -self.config.hourly_cost,
            Some(trip) => trip.reward(&self.config),
        })
    }

    /// Compute the next state without touching any episode.
    pub fn peek_next_state(
        &self,
        state: State,
        action: Action,
        matrix: &TimeMatrix,
    ) -> Result<(State, u64), EnvError> {
        Ok(match self.plan(state, action, matrix)? {
            None => {
                let idle = Clock::from(state).advance(
                    1,
                    self.config.hours_per_day,
                    self.config.days_per_week,
                );
                (State::new(state.location, idle.hour, idle.day), 1)
            }
            Some(trip) => {
                let (_, drop) = action.as_pair();
                (
                    State::new(drop, trip.drop_at.hour, trip.drop_at.day),
                    trip.total_hours(),
                )
            }
        })
    }

    /// Apply `action` in `state`, advancing `episode` by the hours it takes.
    pub fn transition(
        &self,
        episode: &mut Episode,
        state: State,
        action: Action,
        matrix: &TimeMatrix,
    ) -> Result<Transition, EnvError> {
        let (next_state, hours) = self.peek_next_state(state, action, matrix)?;

        let was_terminal = episode.is_terminal();
        let terminal = episode.advance(hours, self.config.episode_hours);
        trace!(
            "{} --{}--> {} in {}h (elapsed {}h)",
            state,
            action,
            next_state,
            hours,
            episode.elapsed_hours()
        );
        if terminal && !was_terminal {
            info!(
                "episode terminated after {}h at state {}",
                episode.elapsed_hours(),
                next_state
            );
        }

        Ok(Transition {
            next_state,
            hours,
            terminal,
        })
    }
}
