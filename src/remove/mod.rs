//! Deletion strategies for a single attempt
//!
//! One call into this module is one attempt of the retry loop: classify the
//! path, run the matching strategy, and report the outcome. Remediation here
//! is local and one-shot; repetition over time belongs to the retry driver.
//!
//! # Module Organization
//!
//! - [`dispatch`] - Path classification and routing
//! - [`file`] - Resilient single-file delete
//! - [`directory`] - Resilient recursive directory delete
//! - [`attributes`] - Read-only attribute clearing

pub mod attributes;
pub mod directory;
pub mod dispatch;
pub mod file;

pub use dispatch::{classify, remove_once, PathKind};
