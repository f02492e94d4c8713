use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{EnvConfig, EnvError};

/// Nested `[origin][dest][hour][day]` layout used for serialization.
pub type NestedHours = Vec<Vec<Vec<Vec<u32>>>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NestedHours", into = "NestedHours")]
/// Travel time in whole hours, indexed by `(origin, dest, hour, day)`.
///
/// Stored densely in row-major order. Instances are read-only once built and
/// can be shared between any number of environments and sessions.
pub struct TimeMatrix {
    shape: [usize; 4],
    hours: Vec<u32>,
}

impl TimeMatrix {
    /// Build a matrix from a flat row-major buffer.
    pub fn new(shape: [usize; 4], hours: Vec<u32>) -> Result<Self, EnvError> {
        let expected = cell_count(shape).ok_or(EnvError::TimeMatrixTooLarge { shape })?;
        if hours.len() != expected {
            return Err(EnvError::TimeMatrixLength {
                shape,
                expected,
                actual: hours.len(),
            });
        }
        Ok(Self { shape, hours })
    }

    /// Build a matrix from nested vectors, e.g. a numpy array's `tolist()`.
    ///
    /// The extents are read from the first row at each level and every other
    /// row must match them. The flat buffer grows only with rows already checked.
    pub fn from_nested(nested: NestedHours) -> Result<Self, EnvError> {
        let origins = nested.len();
        let dests = nested.first().map_or(0, Vec::len);
        let hours = nested
            .first()
            .and_then(|row| row.first())
            .map_or(0, Vec::len);
        let days = nested
            .first()
            .and_then(|row| row.first())
            .and_then(|row| row.first())
            .map_or(0, Vec::len);

        let shape = [origins, dests, hours, days];
        let mut flat = Vec::new();
        for by_dest in nested {
            if by_dest.len() != dests {
                return Err(EnvError::TimeMatrixRagged { axis: 1 });
            }
            for by_hour in by_dest {
                if by_hour.len() != hours {
                    return Err(EnvError::TimeMatrixRagged { axis: 2 });
                }
                for by_day in by_hour {
                    if by_day.len() != days {
                        return Err(EnvError::TimeMatrixRagged { axis: 3 });
                    }
                    flat.extend(by_day);
                }
            }
        }

        Self::new(shape, flat)
    }

    /// A matrix where every trip between distinct locations takes `hours`.
    pub fn constant(config: &EnvConfig, hours: u32) -> Self {
        Self::from_fn(config, |origin, dest, _, _| {
            if origin == dest { 0 } else { hours }
        })
    }

    /// A matrix with uniformly random trip times drawn from `range`.
    /// Trips from a location to itself take zero hours.
    pub fn random<R: Rng + ?Sized>(
        config: &EnvConfig,
        rng: &mut R,
        range: RangeInclusive<u32>,
    ) -> Self {
        Self::from_fn(config, |origin, dest, _, _| {
            if origin == dest {
                0
            } else {
                rng.gen_range(range.clone())
            }
        })
    }

    /// Fill a matrix shaped for `config` by calling `f(origin, dest, hour, day)`.
    pub fn from_fn<F>(config: &EnvConfig, mut f: F) -> Self
    where
        F: FnMut(usize, usize, usize, usize) -> u32,
    {
        let shape = config.time_matrix_shape();
        let mut hours = Vec::with_capacity(cell_count(shape).unwrap_or(0));
        for origin in 0..shape[0] {
            for dest in 0..shape[1] {
                for hour in 0..shape[2] {
                    for day in 0..shape[3] {
                        hours.push(f(origin, dest, hour, day));
                    }
                }
            }
        }
        Self { shape, hours }
    }

    /// `[origin, dest, hour, day]` extents.
    pub fn shape(&self) -> [usize; 4] {
        self.shape
    }

    /// Travel time from `origin` to `dest` when departing at `(hour, day)`.
    pub fn get(
        &self,
        origin: usize,
        dest: usize,
        hour: usize,
        day: usize,
    ) -> Result<u32, EnvError> {
        let [o, d, h, w] = self.shape;
        if origin >= o || dest >= d || hour >= h || day >= w {
            return Err(EnvError::TimeMatrixOutOfRange {
                origin,
                dest,
                hour,
                day,
                shape: self.shape,
            });
        }
        Ok(self.hours[((origin * d + dest) * h + hour) * w + day])
    }

    /// Mutable access for callers that patch individual entries.
    pub fn set(
        &mut self,
        origin: usize,
        dest: usize,
        hour: usize,
        day: usize,
        value: u32,
    ) -> Result<(), EnvError> {
        self.get(origin, dest, hour, day)?;
        let [_, d, h, w] = self.shape;
        self.hours[((origin * d + dest) * h + hour) * w + day] = value;
        Ok(())
    }

    /// Ensure the matrix covers every `(origin, dest, hour, day)` the environment can reach.
    pub fn check_covers(&self, config: &EnvConfig) -> Result<(), EnvError> {
        let expected = config.time_matrix_shape();
        let covers = self
            .shape
            .iter()
            .zip(expected.iter())
            .all(|(actual, needed)| actual >= needed);
        if covers {
            Ok(())
        } else {
            Err(EnvError::TimeMatrixShape {
                expected,
                actual: self.shape,
            })
        }
    }

    /// Convert back to the nested `[origin][dest][hour][day]` layout.
    pub fn to_nested(&self) -> NestedHours {
        // Built from the shape rather than the buffer so zero extents survive.
        let [o, d, h, w] = self.shape;
        (0..o)
            .map(|origin| {
                (0..d)
                    .map(|dest| {
                        (0..h)
                            .map(|hour| {
                                let start = ((origin * d + dest) * h + hour) * w;
                                self.hours[start..start + w].to_vec()
                            })
                            .collect()
                    })
                    .collect()
            })
            .collect()
    }
}

/// Number of cells in `shape`, or `None` if it does not fit in `usize`.
pub(crate) fn cell_count(shape: [usize; 4]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, n| acc.checked_mul(*n))
}

impl TryFrom<NestedHours> for TimeMatrix {
    type Error = EnvError;

    fn try_from(nested: NestedHours) -> Result<Self, Self::Error> {
        Self::from_nested(nested)
    }
}

impl From<TimeMatrix> for NestedHours {
    fn from(matrix: TimeMatrix) -> Self {
        matrix.to_nested()
    }
}
