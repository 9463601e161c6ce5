use super::domain::Shift;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    InvalidEmail,
    MissingShift,
    UnknownShift,
}

impl SkipReason {
    pub const fn label(self) -> &'static str {
        match self {
            Self::InvalidEmail => "invalid email",
            Self::MissingShift => "missing shift name",
            Self::UnknownShift => "unknown shift",
        }
    }
}

/// Something worth reporting that did not stop the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RosterEvent {
    RowSkipped {
        source: String,
        line: u64,
        reason: SkipReason,
        value: String,
    },
    VolunteerMerged {
        email: String,
    },
    BreakScheduled {
        email: String,
        shift: Shift,
    },
    ContinuityBlocked {
        email: String,
        shift: Shift,
        preferred_booth: String,
    },
    Unassigned {
        email: String,
        shift: Shift,
    },
}

/// Collects events from the importer and the engine in the order they happened.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    events: Vec<RosterEvent>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: RosterEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[RosterEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn skipped_rows(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, RosterEvent::RowSkipped { .. }))
            .count()
    }

    pub fn breaks(&self) -> Vec<(&str, Shift)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                RosterEvent::BreakScheduled { email, shift } => Some((email.as_str(), *shift)),
                _ => None,
            })
            .collect()
    }

    pub fn unassigned_by_shift(&self) -> BTreeMap<Shift, Vec<&str>> {
        let mut by_shift: BTreeMap<Shift, Vec<&str>> = BTreeMap::new();
        for event in &self.events {
            if let RosterEvent::Unassigned { email, shift } = event {
                by_shift.entry(*shift).or_default().push(email);
            }
        }
        by_shift
    }
}
