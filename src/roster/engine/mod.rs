mod break_rule;
mod policy;

pub use break_rule::{BreakRule, DEFAULT_BREAK_THRESHOLD, MIN_BREAK_THRESHOLD};
pub use policy::{ContinuityPolicy, CursorMode, ShiftCounting};

use crate::roster::diagnostics::{Diagnostics, RosterEvent};
use crate::roster::domain::{Booth, Roster, Shift, Volunteer};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn};

/// Outcome of one engine run. Unassigned volunteers are reported, not treated as failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssignmentSummary {
    pub breaks: usize,
    pub placements: usize,
    pub continuity_placements: usize,
    pub fallback_placements: usize,
    pub unassigned: BTreeMap<Shift, Vec<String>>,
    pub final_cursor: usize,
}

impl AssignmentSummary {
    pub fn unassigned_count(&self) -> usize {
        self.unassigned.values().map(Vec::len).sum()
    }

    pub fn unassigned_for(&self, shift: Shift) -> &[String] {
        self.unassigned
            .get(&shift)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Break rule plus booth assignment over a [`Roster`].
///
/// The fallback cursor belongs to the engine value, so it carries over between shifts of
/// one run but never between separate engines.
#[derive(Debug, Clone)]
pub struct AssignmentEngine {
    break_rule: BreakRule,
    continuity: ContinuityPolicy,
    cursor_mode: CursorMode,
    cursor: usize,
}

impl Default for AssignmentEngine {
    fn default() -> Self {
        Self::new(ContinuityPolicy::default(), CursorMode::default())
    }
}

impl AssignmentEngine {
    pub fn new(continuity: ContinuityPolicy, cursor_mode: CursorMode) -> Self {
        Self {
            break_rule: BreakRule::default(),
            continuity,
            cursor_mode,
            cursor: 0,
        }
    }

    pub fn with_break_rule(mut self, break_rule: BreakRule) -> Self {
        self.break_rule = break_rule;
        self
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Applies the break rule, then assigns booths for every assignable shift.
    pub fn run(
        &mut self,
        roster: &mut Roster,
        diagnostics: &mut Diagnostics,
    ) -> AssignmentSummary {
        let breaks = self.break_rule.apply(&mut roster.volunteers, diagnostics);
        let mut summary = self.assign(roster, diagnostics);
        summary.breaks = breaks;
        summary
    }

    /// Booth assignment only; expects the break rule to have run already.
    pub fn assign(
        &mut self,
        roster: &mut Roster,
        diagnostics: &mut Diagnostics,
    ) -> AssignmentSummary {
        let Roster { volunteers, booths } = roster;
        let booth_index = index_booths(booths);
        let ordered = candidate_order(volunteers);
        let mut summary = AssignmentSummary::default();

        for shift in Shift::assignable() {
            let candidates: Vec<&String> = ordered
                .iter()
                .filter(|email| volunteers[email.as_str()].is_signed_up(shift))
                .collect();
            debug!(%shift, candidates = candidates.len(), "assigning shift");

            for email in candidates {
                let Some(volunteer) = volunteers.get_mut(email.as_str()) else {
                    continue;
                };

                if let Some(name) =
                    self.place_with_continuity(volunteer, shift, booths, &booth_index, diagnostics)
                {
                    volunteer.booths.insert(shift, name);
                    summary.placements += 1;
                    summary.continuity_placements += 1;
                    continue;
                }

                match self.place_with_fallback(booths, shift, email) {
                    Some(index) => {
                        volunteer.booths.insert(shift, booths[index].name.clone());
                        summary.placements += 1;
                        summary.fallback_placements += 1;
                    }
                    None => {
                        warn!(%email, %shift, "no booth has capacity; volunteer left unassigned");
                        diagnostics.record(RosterEvent::Unassigned {
                            email: email.clone(),
                            shift,
                        });
                        summary
                            .unassigned
                            .entry(shift)
                            .or_default()
                            .push(email.clone());
                    }
                }
            }
        }

        summary.final_cursor = self.cursor;
        info!(
            placements = summary.placements,
            continuity = summary.continuity_placements,
            fallback = summary.fallback_placements,
            unassigned = summary.unassigned_count(),
            "booth assignment finished"
        );
        summary
    }

    fn preferred_booths(&self, volunteer: &Volunteer, shift: Shift) -> Vec<String> {
        let mut earlier = volunteer.booths.range(..shift);
        match self.continuity {
            ContinuityPolicy::PreviousShift => shift
                .previous_assignable()
                .and_then(|previous| volunteer.booth_for(previous))
                .map(str::to_string)
                .into_iter()
                .collect(),
            ContinuityPolicy::MostRecent => earlier
                .next_back()
                .map(|(_, name)| name.clone())
                .into_iter()
                .collect(),
            ContinuityPolicy::AnyPrior => {
                let mut preferred: Vec<String> = Vec::new();
                for (_, name) in earlier.rev() {
                    if !preferred.contains(name) {
                        preferred.push(name.clone());
                    }
                }
                preferred
            }
        }
    }

    fn place_with_continuity(
        &self,
        volunteer: &Volunteer,
        shift: Shift,
        booths: &mut [Booth],
        booth_index: &HashMap<String, usize>,
        diagnostics: &mut Diagnostics,
    ) -> Option<String> {
        let preferred = self.preferred_booths(volunteer, shift);

        for name in &preferred {
            let Some(&index) = booth_index.get(name) else {
                continue;
            };
            if booths[index].try_assign(shift, &volunteer.email) {
                return Some(name.clone());
            }
        }

        if let Some(first) = preferred.into_iter().next() {
            debug!(email = %volunteer.email, %shift, booth = %first, "preferred booth is full");
            diagnostics.record(RosterEvent::ContinuityBlocked {
                email: volunteer.email.clone(),
                shift,
                preferred_booth: first,
            });
        }
        None
    }

    fn place_with_fallback(
        &mut self,
        booths: &mut [Booth],
        shift: Shift,
        email: &str,
    ) -> Option<usize> {
        let count = booths.len();
        for _ in 0..count {
            let index = self.cursor % count;
            if booths[index].try_assign(shift, email) {
                self.cursor = match self.cursor_mode {
                    CursorMode::RoundRobin => (index + 1) % count,
                    CursorMode::FillFirst => index,
                };
                return Some(index);
            }
            self.cursor = (index + 1) % count;
        }
        None
    }
}

/// Name to position, first occurrence winning for duplicate names.
fn index_booths(booths: &[Booth]) -> HashMap<String, usize> {
    let mut index = HashMap::with_capacity(booths.len());
    for (position, booth) in booths.iter().enumerate() {
        index.entry(booth.name.clone()).or_insert(position);
    }
    index
}

/// Emails sorted by case-insensitive (last, first) name. The map's email order breaks ties.
fn candidate_order(volunteers: &BTreeMap<String, Volunteer>) -> Vec<String> {
    let mut ordered: Vec<&Volunteer> = volunteers.values().collect();
    ordered.sort_by_key(|volunteer| volunteer.sort_key());
    ordered
        .into_iter()
        .map(|volunteer| volunteer.email.clone())
        .collect()
}
