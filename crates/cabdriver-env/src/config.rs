use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{EnvError, time_matrix::cell_count};

const DEFAULT_ENV_CONFIG_YAML: &str = include_str!("../config/env.default.yaml");

/// Largest `m * m * t * d` grid accepted; the state space, ride actions and
/// encoding length are all bounded by it.
pub const MAX_GRID_CELLS: usize = 1 << 28;

/// Hyperparameters of the cab driver environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Number of locations `m`.
    pub locations: usize,
    /// Hours in a day `t`.
    pub hours_per_day: usize,
    /// Days in a week `d`.
    pub days_per_week: usize,
    /// Cost `C` charged per driven or idle hour.
    pub hourly_cost: f64,
    /// Revenue `R` earned per hour with a passenger on board.
    pub hourly_revenue: f64,
    /// Episode horizon in elapsed hours.
    pub episode_hours: u64,
    /// Upper bound on sampled ride requests per step.
    pub max_requests: usize,
    /// Poisson mean of ride requests, indexed by location.
    pub request_means: Vec<f64>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        EnvConfig {
            locations: 5,
            hours_per_day: 24,
            days_per_week: 7,
            hourly_cost: 5.0,
            hourly_revenue: 9.0,
            episode_hours: 24 * 30,
            max_requests: 15,
            request_means: vec![2.0, 12.0, 4.0, 7.0, 8.0],
        }
    }
}

impl EnvConfig {
    /// Parse a config from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, EnvError> {
        let config: EnvConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config from a YAML file path.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, EnvError> {
        let yaml = fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Return the default YAML config included with this crate.
    pub fn default_yaml() -> &'static str {
        DEFAULT_ENV_CONFIG_YAML
    }

    /// Parse the default YAML config included with this crate.
    pub fn from_default_yaml() -> Result<Self, EnvError> {
        Self::from_yaml_str(Self::default_yaml())
    }

    /// Number of ride actions, i.e. ordered pairs of distinct locations.
    pub fn ride_action_count(&self) -> usize {
        self.locations.saturating_mul(self.locations.saturating_sub(1))
    }

    /// Length of the state encoding vector, `m + t + d`.
    pub fn state_size(&self) -> usize {
        self.locations
            .saturating_add(self.hours_per_day)
            .saturating_add(self.days_per_week)
    }

    /// Expected `[origin, dest, hour, day]` shape of a time matrix.
    pub fn time_matrix_shape(&self) -> [usize; 4] {
        [
            self.locations,
            self.locations,
            self.hours_per_day,
            self.days_per_week,
        ]
    }

    /// Check dimensions, economics, and request sampling bounds.
    pub fn validate(&self) -> Result<(), EnvError> {
        if self.locations < 2 {
            return Err(invalid("locations must be at least 2"));
        }
        if self.hours_per_day == 0 {
            return Err(invalid("hours_per_day must be greater than 0"));
        }
        if self.days_per_week == 0 {
            return Err(invalid("days_per_week must be greater than 0"));
        }
        match cell_count(self.time_matrix_shape()) {
            Some(cells) if cells <= MAX_GRID_CELLS => {}
            _ => {
                return Err(EnvError::InvalidConfig(format!(
                    "{} locations x {} hours x {} days exceeds {MAX_GRID_CELLS} time matrix cells",
                    self.locations, self.hours_per_day, self.days_per_week
                )));
            }
        }
        if !self.hourly_cost.is_finite() || self.hourly_cost < 0.0 {
            return Err(invalid("hourly_cost must be finite and >= 0"));
        }
        if !self.hourly_revenue.is_finite() || self.hourly_revenue < 0.0 {
            return Err(invalid("hourly_revenue must be finite and >= 0"));
        }
        if self.episode_hours == 0 {
            return Err(invalid("episode_hours must be greater than 0"));
        }
        if self.request_means.len() != self.locations {
            return Err(EnvError::InvalidConfig(format!(
                "request_means has {} entries but there are {} locations",
                self.request_means.len(),
                self.locations
            )));
        }
        if let Some(mean) = self
            .request_means
            .iter()
            .find(|mean| !mean.is_finite() || **mean < 0.0)
        {
            return Err(EnvError::InvalidConfig(format!(
                "request mean {mean} must be finite and >= 0"
            )));
        }
        // Requests are drawn without replacement from the ride actions.
        if self.max_requests > self.ride_action_count() {
            return Err(EnvError::SamplingOverflow {
                requested: self.max_requests,
                available: self.ride_action_count(),
            });
        }
        Ok(())
    }
}

fn invalid(message: &str) -> EnvError {
    EnvError::InvalidConfig(message.to_string())
}
