//! Unit of work configuration.

/// Configuration for a unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Whether a failed commit discards the tracked changes.
    ///
    /// When false, the object store is left exactly as it was before the
    /// commit, so the caller can inspect it or retry.
    pub clear_on_failure: bool,

    /// Whether every tracked entity's mapper is resolved before the first
    /// mapper call.
    ///
    /// With preflight on, a missing mapper aborts the commit before any
    /// storage statement runs.
    pub preflight_mappers: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            clear_on_failure: false,
            preflight_mappers: true,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether a failed commit clears tracked changes.
    #[must_use]
    pub const fn clear_on_failure(mut self, value: bool) -> Self {
        self.clear_on_failure = value;
        self
    }

    /// Sets whether mappers are resolved before dispatch.
    #[must_use]
    pub const fn preflight_mappers(mut self, value: bool) -> Self {
        self.preflight_mappers = value;
        self
    }
}
