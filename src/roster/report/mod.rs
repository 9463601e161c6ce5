mod summary;
mod tables;

pub use summary::{BoothView, RosterSummary, ShiftCoverage, ShiftOccupantsView};
pub use tables::{write_booth_roster, write_volunteer_roster};

/// Label shown for a shift that has no booth.
pub const UNASSIGNED_LABEL: &str = "Unassigned";
