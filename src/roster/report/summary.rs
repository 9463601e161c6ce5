use crate::roster::diagnostics::Diagnostics;
use crate::roster::domain::{Roster, Shift};
use crate::roster::engine::AssignmentSummary;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ShiftOccupantsView {
    pub shift: Shift,
    pub volunteers: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoothView {
    pub name: String,
    pub shifts: Vec<ShiftOccupantsView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShiftCoverage {
    pub shift: Shift,
    pub filled_slots: usize,
    pub open_slots: usize,
    pub unfilled_booths: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unassigned: Vec<String>,
}

/// Everything the console and JSON outputs show after a run.
#[derive(Debug, Clone, Serialize)]
pub struct RosterSummary {
    pub total_volunteers: usize,
    pub total_filled_slots: usize,
    pub breaks: usize,
    pub skipped_rows: usize,
    pub coverage: Vec<ShiftCoverage>,
    pub booths: Vec<BoothView>,
}

impl RosterSummary {
    pub fn build(
        roster: &Roster,
        assignment: &AssignmentSummary,
        diagnostics: &Diagnostics,
    ) -> Self {
        let coverage: Vec<ShiftCoverage> = Shift::assignable()
            .into_iter()
            .map(|shift| ShiftCoverage {
                shift,
                filled_slots: roster.filled_slots(shift),
                open_slots: roster.booths.iter().map(|booth| booth.open_slots(shift)).sum(),
                unfilled_booths: roster.unfilled_booths(shift).len(),
                unassigned: assignment.unassigned_for(shift).to_vec(),
            })
            .collect();

        let mut booths: Vec<BoothView> = roster
            .booths
            .iter()
            .map(|booth| BoothView {
                name: booth.name.clone(),
                shifts: Shift::assignable()
                    .into_iter()
                    .map(|shift| ShiftOccupantsView {
                        shift,
                        volunteers: booth
                            .occupants(shift)
                            .iter()
                            .map(|email| {
                                roster
                                    .volunteer(email)
                                    .map(|volunteer| volunteer.display_name())
                                    .unwrap_or_else(|| email.clone())
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();
        booths.sort_by(|left, right| left.name.cmp(&right.name));

        Self {
            total_volunteers: roster.volunteers.len(),
            total_filled_slots: coverage.iter().map(|entry| entry.filled_slots).sum(),
            breaks: assignment.breaks,
            skipped_rows: diagnostics.skipped_rows(),
            coverage,
            booths,
        }
    }

    pub fn has_unassigned(&self) -> bool {
        self.coverage.iter().any(|entry| !entry.unassigned.is_empty())
    }
}
