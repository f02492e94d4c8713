use thiserror::Error;

use crate::{Action, State};

#[derive(Debug, Error)]
/// Error type for configuration, time-matrix IO, and environment operations.
pub enum EnvError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid environment config: {0}")]
    InvalidConfig(String),

    #[error("action {action} is not in the action space")]
    InvalidAction { action: Action },

    #[error("action index {index} is out of range for {len} actions")]
    UnknownActionIndex { index: usize, len: usize },

    #[error("state {state} is outside the {locations}x{hours}x{days} state space")]
    InvalidState {
        state: State,
        locations: usize,
        hours: usize,
        days: usize,
    },

    #[error(
        "time matrix lookup ({origin}, {dest}, {hour}, {day}) is outside shape {shape:?}"
    )]
    TimeMatrixOutOfRange {
        origin: usize,
        dest: usize,
        hour: usize,
        day: usize,
        shape: [usize; 4],
    },

    #[error("time matrix shape {actual:?} does not match expected {expected:?}")]
    TimeMatrixShape {
        expected: [usize; 4],
        actual: [usize; 4],
    },

    #[error("time matrix has {actual} values but shape {shape:?} requires {expected}")]
    TimeMatrixLength {
        shape: [usize; 4],
        expected: usize,
        actual: usize,
    },

    #[error("time matrix shape {shape:?} exceeds the addressable cell count")]
    TimeMatrixTooLarge { shape: [usize; 4] },

    #[error("time matrix rows along axis {axis} have inconsistent lengths")]
    TimeMatrixRagged { axis: usize },

    #[error("cannot sample {requested} distinct requests from {available} ride actions")]
    SamplingOverflow { requested: usize, available: usize },

    #[error("failed to build request distribution for mean {mean}")]
    RequestDistribution { mean: f64 },
}
