pub mod diagnostics;
pub mod domain;
pub mod engine;
pub mod import;
pub mod report;

pub use diagnostics::{Diagnostics, RosterEvent, SkipReason};
pub use domain::{Booth, Roster, Shift, Volunteer, DEFAULT_BOOTH_CAPACITY};
pub use engine::{
    AssignmentEngine, AssignmentSummary, BreakRule, ContinuityPolicy, CursorMode, ShiftCounting,
};
pub use report::RosterSummary;
