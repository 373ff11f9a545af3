//! Command implementations for the autolog tools
//!
//! Each binary is a thin layer over one command here. Both share the status
//! log, directory listing and summary types in [`shared`].

pub mod autolog;
pub mod red_report;
pub mod shared;

pub use autolog::{run_autolog, run_autolog_with};
pub use red_report::{run_red_report, run_red_report_with};
pub use shared::RunSummary;
