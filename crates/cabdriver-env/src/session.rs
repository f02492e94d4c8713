use std::sync::Arc;

use log::debug;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{
    Action, CabDriver, EnvConfig, EnvError, Episode, RideRequests, State, TimeMatrix,
    space::{ActionSpace, StateSpace},
};

/// Reward and transition produced by one decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub reward: f64,
    pub next_state: State,
    pub hours: u64,
    pub terminal: bool,
    pub elapsed_hours: u64,
}

/// Totals for one driven episode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeSummary {
    pub steps: usize,
    pub total_reward: f64,
    pub elapsed_hours: u64,
    pub final_state: State,
    /// `true` when the step cap was hit before the horizon.
    pub truncated: bool,
}

#[derive(Debug, Clone)]
/// Seeded episode runner over a shared `CabDriver`.
///
/// Each session owns its episode clock and RNG; the environment definition
/// is shared through an `Arc`, so parallel rollouts each get their own session.
pub struct CabSession {
    env: Arc<CabDriver>,
    episode: Episode,
    rng: ChaCha8Rng,
}

impl CabSession {
    /// Create a session over an existing environment with deterministic RNG seed.
    pub fn new(env: Arc<CabDriver>, seed: u64) -> Self {
        Self {
            env,
            episode: Episode::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Build a fresh environment from `config`, drawing its initial state from `seed`.
    pub fn from_config(config: EnvConfig, seed: u64) -> Result<Self, EnvError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let env = CabDriver::with_config(config, &mut rng)?;
        Ok(Self {
            env: Arc::new(env),
            episode: Episode::new(),
            rng,
        })
    }

    pub fn env(&self) -> &Arc<CabDriver> {
        &self.env
    }

    pub fn episode(&self) -> &Episode {
        &self.episode
    }

    pub fn elapsed_hours(&self) -> u64 {
        self.episode.elapsed_hours()
    }

    pub fn is_terminal(&self) -> bool {
        self.episode.is_terminal()
    }

    /// Start a new episode: clear the clock and return spaces plus initial state.
    pub fn reset(&mut self) -> (&StateSpace, &ActionSpace, State) {
        self.env.reset(&mut self.episode)
    }

    pub fn requests(&mut self, state: State) -> Result<RideRequests, EnvError> {
        self.env.requests(state, &mut self.rng)
    }

    pub fn reward(
        &self,
        state: State,
        action: Action,
        matrix: &TimeMatrix,
    ) -> Result<f64, EnvError> {
        self.env.reward(state, action, matrix)
    }

    /// Advance the episode and return `(next_state, terminal)`.
    pub fn next_state(
        &mut self,
        state: State,
        action: Action,
        matrix: &TimeMatrix,
    ) -> Result<(State, bool), EnvError> {
        let transition = self.env.transition(&mut self.episode, state, action, matrix)?;
        Ok((transition.next_state, transition.terminal))
    }

    /// Compute the reward on `state`, then apply the transition.
    pub fn step(
        &mut self,
        state: State,
        action: Action,
        matrix: &TimeMatrix,
    ) -> Result<StepOutcome, EnvError> {
        let reward = self.env.reward(state, action, matrix)?;
        let transition = self.env.transition(&mut self.episode, state, action, matrix)?;
        Ok(StepOutcome {
            reward,
            next_state: transition.next_state,
            hours: transition.hours,
            terminal: transition.terminal,
            elapsed_hours: self.episode.elapsed_hours(),
        })
    }

    /// Reset and drive one episode with `policy`, for at most `max_steps` decisions.
    ///
    /// At every step the policy picks one of the sampled requests; picking an
    /// action that was not offered is an `InvalidAction` error.
    pub fn run_episode<F>(
        &mut self,
        matrix: &TimeMatrix,
        max_steps: usize,
        mut policy: F,
    ) -> Result<EpisodeSummary, EnvError>
    where
        F: FnMut(State, &RideRequests) -> Action,
    {
        matrix.check_covers(self.env.config())?;
        let (_, _, mut state) = self.reset();

        let mut steps = 0;
        let mut total_reward = 0.0;
        while steps < max_steps && !self.is_terminal() {
            let requests = self.requests(state)?;
            let action = policy(state, &requests);
            let offered = self
                .env
                .action_space()
                .index_of(action)
                .is_some_and(|index| requests.indices.contains(&index));
            if !offered {
                return Err(EnvError::InvalidAction { action });
            }

            let outcome = self.step(state, action, matrix)?;
            total_reward += outcome.reward;
            state = outcome.next_state;
            steps += 1;
        }

        let summary = EpisodeSummary {
            steps,
            total_reward,
            elapsed_hours: self.elapsed_hours(),
            final_state: state,
            truncated: !self.is_terminal(),
        };
        debug!(
            "episode finished: {} steps, {}h, reward {:.1}, truncated {}",
            summary.steps, summary.elapsed_hours, summary.total_reward, summary.truncated
        );
        Ok(summary)
    }
}
