use crate::State;

/// Position on the weekly clock: hour of day and day of week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Clock {
    pub hour: usize,
    pub day: usize,
}

impl Clock {
    pub fn new(hour: usize, day: usize) -> Self {
        Self { hour, day }
    }

    /// Move the clock forward by `hours`.
    ///
    /// The hour wraps modulo `hours_per_day` and every wrap carries one day,
    /// which itself wraps modulo `days_per_week`. A duration spanning several
    /// days carries `(hour + hours) / hours_per_day` days at once.
    pub fn advance(self, hours: u64, hours_per_day: usize, days_per_week: usize) -> Clock {
        let per_day = hours_per_day as u64;
        let per_week = days_per_week as u64;
        let total = self.hour as u64 + hours;
        let carried_days = total / per_day;

        Clock {
            hour: (total % per_day) as usize,
            day: ((self.day as u64 + carried_days % per_week) % per_week) as usize,
        }
    }
}

impl From<State> for Clock {
    fn from(state: State) -> Self {
        Clock::new(state.hour, state.day)
    }
}

#[cfg(test)]
mod tests {
    use super::Clock;

    #[test]
    fn same_day_advance_keeps_day() {
        assert_eq!(Clock::new(10, 3).advance(4, 24, 7), Clock::new(14, 3));
    }

    #[test]
    fn last_hour_of_week_wraps_to_start() {
        assert_eq!(Clock::new(23, 6).advance(1, 24, 7), Clock::new(0, 0));
    }

    #[test]
    fn multi_day_duration_carries_every_day() {
        // 20 + 53 = 73 hours -> hour 1, three days later.
        assert_eq!(Clock::new(20, 5).advance(53, 24, 7), Clock::new(1, 1));
    }
}
