use crate::{EnvConfig, EnvError, State, TimeMatrix, clock::Clock};

/// Timing of one ride: drive to the pickup, then carry the passenger to the drop.
///
/// Reward and transition both read from the same plan, so the clock they
/// observe for each leg is always identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripPlan {
    /// Hours driven empty from the current location to the pickup (`t1`).
    pub approach_hours: u32,
    /// Clock when the driver reaches the pickup.
    pub pickup_at: Clock,
    /// Hours driven with the passenger from pickup to drop (`t2`).
    pub ride_hours: u32,
    /// Clock when the passenger is dropped off.
    pub drop_at: Clock,
}

impl TripPlan {
    /// Plan a ride from `from` via `pickup` to `drop`.
    ///
    /// The approach leg is free when the driver already stands at the pickup;
    /// otherwise it is looked up at the departure clock. The ride leg is
    /// looked up at the pickup arrival clock.
    pub fn plan(
        config: &EnvConfig,
        matrix: &TimeMatrix,
        from: State,
        pickup: usize,
        drop: usize,
    ) -> Result<Self, EnvError> {
        let (hours, days) = (config.hours_per_day, config.days_per_week);

        let approach_hours = if from.location == pickup {
            0
        } else {
            matrix.get(from.location, pickup, from.hour, from.day)?
        };
        let pickup_at = Clock::from(from).advance(u64::from(approach_hours), hours, days);

        let ride_hours = matrix.get(pickup, drop, pickup_at.hour, pickup_at.day)?;
        let drop_at = pickup_at.advance(u64::from(ride_hours), hours, days);

        Ok(Self {
            approach_hours,
            pickup_at,
            ride_hours,
            drop_at,
        })
    }

    /// Hours spent on both legs.
    pub fn total_hours(&self) -> u64 {
        u64::from(self.approach_hours) + u64::from(self.ride_hours)
    }

    /// Revenue for the carrying leg minus cost for both legs.
    pub fn reward(&self, config: &EnvConfig) -> f64 {
        config.hourly_revenue * f64::from(self.ride_hours)
            - config.hourly_cost * self.total_hours() as f64
    }
}
