//! Run-environment context consumed by the filtering pass
//!
//! The registry never reads ambient process-wide state: the environment is
//! passed explicitly into every filtering call, so the same registry can be
//! exercised under different environments without global setup/teardown.

use std::collections::HashSet;

/// What the current test run's environment looks like, as far as
/// fault-injection targeting is concerned
pub trait EnvironmentContext {
    /// Whether profiling instrumentation is attached this run
    fn profiling_active(&self) -> bool;

    /// Whether the named process is under the profiler.
    ///
    /// Only consulted when [`profiling_active`](Self::profiling_active)
    /// returns `true`.
    fn is_profiled(&self, process: &str) -> bool;

    /// Whether the isolation/fencing feature is enabled this run
    fn fencing_enabled(&self) -> bool;
}

/// Concrete environment context built from the run's flags
///
/// # Example
/// ```
/// use derribar::environment::{EnvironmentContext, RunEnvironment};
///
/// let env = RunEnvironment::new()
///     .with_profiled_processes(["svc-b"])
///     .with_profiling(true)
///     .with_fencing(false);
///
/// assert!(env.profiling_active());
/// assert!(env.is_profiled("svc-b"));
/// assert!(!env.is_profiled("svc-a"));
/// assert!(!env.fencing_enabled());
/// ```
#[derive(Debug, Clone)]
pub struct RunEnvironment {
    profiling_active: bool,
    profiled_processes: HashSet<String>,
    fencing_enabled: bool,
}

impl Default for RunEnvironment {
    fn default() -> Self {
        Self {
            profiling_active: false,
            profiled_processes: HashSet::new(),
            // fencing defaults to on; runs opt out explicitly
            fencing_enabled: true,
        }
    }
}

impl RunEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable profiling for this run
    pub fn with_profiling(mut self, active: bool) -> Self {
        self.profiling_active = active;
        self
    }

    /// Set the process names currently under the profiler
    pub fn with_profiled_processes<I, S>(mut self, processes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.profiled_processes = processes.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable the isolation/fencing feature for this run
    pub fn with_fencing(mut self, enabled: bool) -> Self {
        self.fencing_enabled = enabled;
        self
    }
}

impl EnvironmentContext for RunEnvironment {
    fn profiling_active(&self) -> bool {
        self.profiling_active
    }

    fn is_profiled(&self, process: &str) -> bool {
        self.profiled_processes.contains(process)
    }

    fn fencing_enabled(&self) -> bool {
        self.fencing_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_profiling_off_fencing_on() {
        let env = RunEnvironment::new();
        assert!(!env.profiling_active());
        assert!(env.fencing_enabled());
        assert!(!env.is_profiled("anything"));
    }

    #[test]
    fn test_profiled_set_membership() {
        let env = RunEnvironment::new()
            .with_profiling(true)
            .with_profiled_processes(["svc-a", "svc-b"]);

        assert!(env.is_profiled("svc-a"));
        assert!(env.is_profiled("svc-b"));
        assert!(!env.is_profiled("svc-c"));
    }

    #[test]
    fn test_profiled_set_without_profiling_active() {
        // The set can be populated while profiling itself is off; the
        // filtering pass checks the flag first.
        let env = RunEnvironment::new().with_profiled_processes(["svc-a"]);
        assert!(!env.profiling_active());
        assert!(env.is_profiled("svc-a"));
    }

    #[test]
    fn test_fencing_toggle() {
        let env = RunEnvironment::new().with_fencing(false);
        assert!(!env.fencing_enabled());
    }
}
