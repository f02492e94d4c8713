/// Per-episode clock: elapsed hours and the sticky terminal flag.
///
/// Kept apart from `CabDriver` so one environment definition can drive many
/// independent episodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Episode {
    elapsed_hours: u64,
    terminal: bool,
}

impl Episode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed_hours(&self) -> u64 {
        self.elapsed_hours
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Add `hours` to the elapsed time and return the terminal flag.
    ///
    /// The flag is set once elapsed time reaches `horizon` and never cleared
    /// except by `reset`.
    pub fn advance(&mut self, hours: u64, horizon: u64) -> bool {
        self.elapsed_hours = self.elapsed_hours.saturating_add(hours);
        if self.elapsed_hours >= horizon {
            self.terminal = true;
        }
        self.terminal
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
