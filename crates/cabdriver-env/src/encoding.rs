//! One-hot encoders that turn states (and state-action pairs) into network inputs.
//!
//! Both encoders expect inputs already checked against the state and action
//! spaces; `CabDriver` performs that check before delegating here.

use crate::{Action, EnvConfig, State};

/// Encode a state as `m + t + d` indicators: location, then hour, then day.
pub fn encode_state(config: &EnvConfig, state: State) -> Vec<u8> {
    let mut encoded = vec![0; config.state_size()];
    write_state(config, state, &mut encoded);
    encoded
}

/// Encode a state-action pair as `m + t + d + m + m` indicators.
///
/// The state block is followed by a one-hot pickup block and a one-hot drop
/// block. No-ride uses its `(0, 0)` tuple form.
pub fn encode_state_action(config: &EnvConfig, state: State, action: Action) -> Vec<u8> {
    let m = config.locations;
    let offset = config.state_size();
    let mut encoded = vec![0; offset + 2 * m];
    write_state(config, state, &mut encoded);

    let (pickup, drop) = action.as_pair();
    encoded[offset + pickup] = 1;
    encoded[offset + m + drop] = 1;
    encoded
}

fn write_state(config: &EnvConfig, state: State, encoded: &mut [u8]) {
    let m = config.locations;
    let t = config.hours_per_day;
    encoded[state.location] = 1;
    encoded[m + state.hour] = 1;
    encoded[m + t + state.day] = 1;
}
