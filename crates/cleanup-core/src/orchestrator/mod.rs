//! Cleanup pass orchestration.
//!
//! Provides `Orchestrator`, which lists open visits, gathers evidence for the
//! ones old enough to matter, classifies them and closes or reminds as
//! needed. Every visit ends up with exactly one `Decision` in the pass log.

pub mod pass;


pub use pass::Orchestrator;
