//! Derribar - Process-component registry and fault-injection targeting engine
//!
//! This library decides, for a named cluster-manager stack under test, which
//! operating-system processes exist, which log signatures indicate their
//! normal activity or failure, and which of them are legitimate
//! fault-injection targets under the current run's environment (profiling
//! tools attached, isolation feature on/off).
//!
//! It carries pattern *data* only: regex evaluation, process supervision,
//! and scenario driving belong to the surrounding harness.

pub mod component;
pub mod environment;
pub mod patterns;
pub mod registry;
pub mod stacks;
