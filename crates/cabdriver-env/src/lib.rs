mod clock;
mod config;
mod encoding;
mod env;
mod episode;
mod error;
mod io;
mod requests;
mod session;
mod space;
mod time_matrix;
mod trip;
mod types;

pub use clock::Clock;
pub use config::{EnvConfig, MAX_GRID_CELLS};
pub use env::{CabDriver, Transition};
pub use episode::Episode;
pub use error::EnvError;
pub use io::{
    load_time_matrix_json, load_time_matrix_yaml, save_time_matrix_json, save_time_matrix_yaml,
};
pub use requests::RideRequests;
pub use session::{CabSession, EpisodeSummary, StepOutcome};
pub use space::{ActionSpace, StateSpace};
pub use time_matrix::{NestedHours, TimeMatrix};
pub use trip::TripPlan;
pub use types::{Action, State};

#[cfg(test)]
mod tests;
