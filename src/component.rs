//! Component descriptors: one monitorable process and its pattern sets
//!
//! A descriptor carries everything the fault-injection and log-audit
//! subsystems need to know about one process: the name the kill primitive
//! targets, the signatures of its normal and failing log output, and the
//! noise patterns that must not be flagged as failures.

use crate::patterns::PatternRule;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Caller error during descriptor construction: a descriptor must carry
/// exactly one of the two detection-pattern sets
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidDescriptorError {
    #[error("component {0}: both activity and scheduler pattern sets supplied")]
    BothPatternSets(String),

    #[error("component {0}: neither activity nor scheduler pattern set supplied")]
    NoPatternSet(String),
}

/// Detection-pattern set of a component
///
/// Most components fail with the generic log shape (`Activity`); the
/// decision component reports failures through a scheduler-specific shape
/// (`Scheduler`). A component has exactly one of the two, which this
/// tagged union enforces at the type level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternKind {
    /// Generic normal-activity and failure signatures
    Activity(Vec<PatternRule>),
    /// Decision-engine-specific failure signatures
    Scheduler(Vec<PatternRule>),
}

impl PatternKind {
    /// The rules, whichever variant carries them
    pub fn rules(&self) -> &[PatternRule] {
        match self {
            PatternKind::Activity(rules) | PatternKind::Scheduler(rules) => rules,
        }
    }

    pub fn is_scheduler(&self) -> bool {
        matches!(self, PatternKind::Scheduler(_))
    }
}

/// One monitorable process of a cluster-manager stack
///
/// Immutable once constructed: the registry builds descriptors during its
/// one-time build phase and nothing mutates them afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    name: String,
    patterns: PatternKind,
    ignore_specific: Vec<PatternRule>,
    ignore_common: Vec<PatternRule>,
}

impl ComponentDescriptor {
    /// Construct a descriptor from an already-tagged pattern set
    pub fn new(
        name: impl Into<String>,
        patterns: PatternKind,
        ignore_specific: Vec<PatternRule>,
        ignore_common: Vec<PatternRule>,
    ) -> Self {
        Self {
            name: name.into(),
            patterns,
            ignore_specific,
            ignore_common,
        }
    }

    /// Construct a descriptor from optional activity/scheduler parts.
    ///
    /// Exactly one of `activity` and `scheduler` must be `Some`; supplying
    /// both or neither is a caller error. An empty-but-present rule vector is
    /// legal — some components legitimately have no patterns to match, and
    /// that absence is surfaced later as [`has_patterns`](Self::has_patterns)
    /// returning `false`, not as a construction failure.
    pub fn from_parts(
        name: impl Into<String>,
        activity: Option<Vec<PatternRule>>,
        scheduler: Option<Vec<PatternRule>>,
        ignore_specific: Vec<PatternRule>,
        ignore_common: Vec<PatternRule>,
    ) -> Result<Self, InvalidDescriptorError> {
        let name = name.into();
        let patterns = match (activity, scheduler) {
            (Some(rules), None) => PatternKind::Activity(rules),
            (None, Some(rules)) => PatternKind::Scheduler(rules),
            (Some(_), Some(_)) => return Err(InvalidDescriptorError::BothPatternSets(name)),
            (None, None) => return Err(InvalidDescriptorError::NoPatternSet(name)),
        };
        Ok(Self::new(name, patterns, ignore_specific, ignore_common))
    }

    /// Process name, unique within one registry's built set
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The detection-pattern set, tagged by kind
    pub fn patterns(&self) -> &PatternKind {
        &self.patterns
    }

    /// Benign-noise patterns specific to this component
    pub fn ignore_specific(&self) -> &[PatternRule] {
        &self.ignore_specific
    }

    /// Benign-noise patterns shared by all components of the stack
    pub fn ignore_common(&self) -> &[PatternRule] {
        &self.ignore_common
    }

    /// Whether this component has any detection patterns at all.
    ///
    /// `false` means "no patterns to match": the component can still be a
    /// fault-injection target, but log-audit has nothing to look for.
    pub fn has_patterns(&self) -> bool {
        !self.patterns.rules().is_empty()
    }
}
