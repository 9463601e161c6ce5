use super::policy::ShiftCounting;
use crate::roster::diagnostics::{Diagnostics, RosterEvent};
use crate::roster::domain::{Shift, Volunteer};
use std::collections::BTreeMap;
use tracing::info;

pub const DEFAULT_BREAK_THRESHOLD: usize = 4;
/// Lower thresholds would remove a volunteer's only shift.
pub const MIN_BREAK_THRESHOLD: usize = 2;

/// Volunteers at or above `threshold` counted shifts lose their latest counted shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakRule {
    pub threshold: usize,
    pub counting: ShiftCounting,
}

impl Default for BreakRule {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_BREAK_THRESHOLD,
            counting: ShiftCounting::All,
        }
    }
}

impl BreakRule {
    pub fn new(threshold: usize, counting: ShiftCounting) -> Self {
        Self {
            threshold,
            counting,
        }
    }

    fn counted(&self, volunteer: &Volunteer) -> Vec<Shift> {
        volunteer
            .shifts
            .iter()
            .copied()
            .filter(|shift| match self.counting {
                ShiftCounting::All => true,
                ShiftCounting::Assignable => shift.is_assignable(),
            })
            .collect()
    }

    /// The shift this rule would remove, if the volunteer qualifies.
    pub fn break_shift(&self, volunteer: &Volunteer) -> Option<Shift> {
        let counted = self.counted(volunteer);
        if counted.len() < self.threshold {
            return None;
        }
        counted.last().copied()
    }

    /// Removes one shift from every qualifying volunteer. Returns how many were given a break.
    pub fn apply(
        &self,
        volunteers: &mut BTreeMap<String, Volunteer>,
        diagnostics: &mut Diagnostics,
    ) -> usize {
        let mut breaks = 0;
        for volunteer in volunteers.values_mut() {
            let Some(shift) = self.break_shift(volunteer) else {
                continue;
            };

            volunteer.remove_shift(shift);
            breaks += 1;
            info!(
                email = %volunteer.email,
                name = %volunteer.display_name(),
                shift = %shift,
                "volunteer should take a break"
            );
            diagnostics.record(RosterEvent::BreakScheduled {
                email: volunteer.email.clone(),
                shift,
            });
        }
        breaks
    }
}
