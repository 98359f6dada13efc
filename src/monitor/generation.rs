//! Generation tokens for discarding results of abandoned runs

use std::fmt;

/// Identifies one monitoring run
///
/// Tokens are compared by value. A response is only applied when the
/// token it was issued under is still the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen-{}", self.0)
    }
}

/// Issues strictly increasing generations and tracks the current one
///
/// Starts at generation 0, which is never handed to a run.
#[derive(Debug, Default)]
pub struct GenerationGuard {
    current: u64,
}

impl GenerationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh token and make it current; every older token goes stale
    pub fn new_generation(&mut self) -> Generation {
        self.current += 1;
        Generation(self.current)
    }

    /// Whether `token` is the most recently issued generation
    pub fn is_current(&self, token: Generation) -> bool {
        token.0 == self.current
    }

    pub fn current(&self) -> Generation {
        Generation(self.current)
    }
}
