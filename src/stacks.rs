//! Per-stack component topology
//!
//! A [`StackSpec`] names the processes that make up one cluster-manager
//! stack: the fixed ordered set of standard components, the distinguished
//! decision component, the fencing component gated by the isolation feature,
//! and any stack-specific extras (such as the messaging layer the cluster
//! manager rides on).

use serde::{Deserialize, Serialize};

/// Component topology of one cluster-manager stack
///
/// # Example
/// ```
/// use derribar::stacks::StackSpec;
///
/// let stack = StackSpec::new("demo", ["svc-a", "svc-b"], "svc-sched")
///     .with_fence("svc-fence")
///     .with_extra("svc-transport");
///
/// assert_eq!(stack.name(), "demo");
/// assert!(stack.is_fence("svc-fence"));
/// assert_eq!(stack.extras(), ["svc-transport"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackSpec {
    name: String,
    standard: Vec<String>,
    scheduler: String,
    fence: Option<String>,
    extras: Vec<String>,
}

impl StackSpec {
    /// A stack with its fixed ordered standard components and its decision
    /// component; fence and extras are added with the `with_*` methods
    pub fn new<I, S>(name: impl Into<String>, standard: I, scheduler: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            standard: standard.into_iter().map(Into::into).collect(),
            scheduler: scheduler.into(),
            fence: None,
            extras: Vec::new(),
        }
    }

    /// Mark one component as the isolation/fencing component
    pub fn with_fence(mut self, name: impl Into<String>) -> Self {
        self.fence = Some(name.into());
        self
    }

    /// Append a stack-specific extra component; extras are registered after
    /// the standard set and replace a standard entry of the same name
    pub fn with_extra(mut self, name: impl Into<String>) -> Self {
        self.extras.push(name.into());
        self
    }

    /// Stack identifier used for pattern-catalog lookups
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Standard components in their fixed registration order
    pub fn standard(&self) -> &[String] {
        &self.standard
    }

    /// The decision component, whose failure signature uses the
    /// scheduler-specific pattern set
    pub fn scheduler(&self) -> &str {
        &self.scheduler
    }

    /// The fencing component, if this stack has one
    pub fn fence(&self) -> Option<&str> {
        self.fence.as_deref()
    }

    /// Stack-specific extra components in registration order
    pub fn extras(&self) -> &[String] {
        &self.extras
    }

    /// Whether `name` is this stack's fencing component
    pub fn is_fence(&self, name: &str) -> bool {
        self.fence.as_deref() == Some(name)
    }

    /// The corosync-based Pacemaker stack: five standard daemons, the
    /// scheduler special-cased, fencing gated on the run's isolation flag,
    /// and the corosync membership layer as the stack-specific extra.
    pub fn corosync2() -> Self {
        Self::new(
            "corosync2",
            [
                "pacemaker-based",
                "pacemaker-controld",
                "pacemaker-attrd",
                "pacemaker-execd",
                "pacemaker-fenced",
            ],
            "pacemaker-schedulerd",
        )
        .with_fence("pacemaker-fenced")
        .with_extra("corosync")
    }
}
