//! Member roster and budget management for a mosque organization.
//!
//! The member table lives in one CSV file. [`application::services::RosterService`]
//! adds, edits and deletes members and rewrites the file after every change;
//! [`domain::report`] aggregates the table for charts, summaries and filtered
//! reports.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
