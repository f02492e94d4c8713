use rand::{Rng, seq::index};
use rand_distr::{Distribution, Poisson};

use crate::{Action, EnvConfig, EnvError, space::ActionSpace};

/// Ride requests offered to the driver at one decision point.
///
/// `indices[i]` is the action-space index of `actions[i]`. The last entry is
/// always the no-ride action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RideRequests {
    pub indices: Vec<usize>,
    pub actions: Vec<Action>,
}

impl RideRequests {
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Number of ride offers, excluding no-ride.
    pub fn ride_count(&self) -> usize {
        self.actions.len().saturating_sub(1)
    }
}

#[derive(Debug, Clone)]
/// Location-dependent Poisson model of incoming ride requests.
pub(crate) struct RequestSampler {
    // `None` for a zero mean: that location never sees requests.
    per_location: Vec<Option<Poisson<f64>>>,
    max_requests: usize,
}

impl RequestSampler {
    pub(crate) fn new(config: &EnvConfig) -> Result<Self, EnvError> {
        let per_location = config
            .request_means
            .iter()
            .map(|&mean| {
                if mean == 0.0 {
                    Ok(None)
                } else {
                    Poisson::new(mean)
                        .map(Some)
                        .map_err(|_| EnvError::RequestDistribution { mean })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            per_location,
            max_requests: config.max_requests,
        })
    }

    /// Draw a capped request count for `location`, then that many distinct rides.
    pub(crate) fn sample<R: Rng + ?Sized>(
        &self,
        location: usize,
        actions: &ActionSpace,
        rng: &mut R,
    ) -> Result<RideRequests, EnvError> {
        let distribution = self.per_location.get(location).ok_or_else(|| {
            EnvError::InvalidConfig(format!("no request mean for location {location}"))
        })?;

        let drawn = match distribution {
            Some(poisson) => poisson.sample(rng) as usize,
            None => 0,
        };
        let count = drawn.min(self.max_requests);

        let available = actions.ride_count();
        if count > available {
            return Err(EnvError::SamplingOverflow {
                requested: count,
                available,
            });
        }

        let mut indices = index::sample(rng, available, count).into_vec();
        indices.push(actions.no_ride_index());

        let actions = indices
            .iter()
            .map(|&idx| actions.get(idx))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RideRequests { indices, actions })
    }
}
