use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

/// Volunteers a booth can hold per shift unless configured otherwise.
pub const DEFAULT_BOOTH_CAPACITY: usize = 2;

/// The five event periods, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    Setup,
    Shift1,
    Shift2,
    Shift3,
    Cleanup,
}

impl Shift {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Setup,
            Self::Shift1,
            Self::Shift2,
            Self::Shift3,
            Self::Cleanup,
        ]
    }

    /// Shifts that occupy booth capacity, earliest first.
    pub const fn assignable() -> [Self; 3] {
        [Self::Shift1, Self::Shift2, Self::Shift3]
    }

    pub const fn is_assignable(self) -> bool {
        matches!(self, Self::Shift1 | Self::Shift2 | Self::Shift3)
    }

    /// Start hour on the event clock; doubles as the sort code.
    pub const fn code(self) -> u8 {
        match self {
            Self::Setup => 4,
            Self::Shift1 => 5,
            Self::Shift2 => 6,
            Self::Shift3 => 7,
            Self::Cleanup => 8,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Shift1 => "shift1",
            Self::Shift2 => "shift2",
            Self::Shift3 => "shift3",
            Self::Cleanup => "cleanup",
        }
    }

    /// Text used for this shift in the signup sheet's `What` column.
    pub const fn signup_name(self) -> &'static str {
        match self {
            Self::Setup => "set up",
            Self::Shift1 => "shift #1",
            Self::Shift2 => "shift #2",
            Self::Shift3 => "shift #3",
            Self::Cleanup => "clean up",
        }
    }

    pub fn from_signup_name(raw: &str) -> Option<Self> {
        let wanted = raw.trim().to_lowercase();
        Self::ordered()
            .into_iter()
            .find(|shift| shift.signup_name() == wanted)
    }

    /// The assignable shift right before this one, if any.
    pub fn previous_assignable(self) -> Option<Self> {
        Self::assignable()
            .into_iter()
            .rev()
            .find(|shift| *shift < self)
    }
}

impl std::fmt::Display for Shift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Volunteer {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub shifts: BTreeSet<Shift>,
    pub booths: BTreeMap<Shift, String>,
}

impl Volunteer {
    /// Builds a volunteer keyed by the normalized form of `email`.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: &str,
        phone: Option<String>,
    ) -> Self {
        Self {
            email: normalize_email(email),
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: phone.filter(|value| !value.trim().is_empty()),
            shifts: BTreeSet::new(),
            booths: BTreeMap::new(),
        }
    }

    pub fn with_shifts(mut self, shifts: impl IntoIterator<Item = Shift>) -> Self {
        self.shifts.extend(shifts);
        self
    }

    pub fn add_shift(&mut self, shift: Shift) {
        self.shifts.insert(shift);
    }

    /// Drops the shift along with any booth already recorded for it.
    pub fn remove_shift(&mut self, shift: Shift) -> bool {
        self.booths.remove(&shift);
        self.shifts.remove(&shift)
    }

    pub fn is_signed_up(&self, shift: Shift) -> bool {
        self.shifts.contains(&shift)
    }

    pub fn booth_for(&self, shift: Shift) -> Option<&str> {
        self.booths.get(&shift).map(String::as_str)
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Case-insensitive (last, first) ordering key.
    pub fn sort_key(&self) -> (String, String) {
        (self.last_name.to_lowercase(), self.first_name.to_lowercase())
    }
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Booth {
    pub name: String,
    pub capacity: usize,
    pub assignments: BTreeMap<Shift, Vec<String>>,
}

impl Booth {
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            capacity,
            assignments: BTreeMap::new(),
        }
    }

    pub fn occupants(&self, shift: Shift) -> &[String] {
        self.assignments
            .get(&shift)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn open_slots(&self, shift: Shift) -> usize {
        self.capacity.saturating_sub(self.occupants(shift).len())
    }

    pub fn has_space(&self, shift: Shift) -> bool {
        self.open_slots(shift) > 0
    }

    /// Appends the volunteer when capacity allows; returns whether it did.
    pub fn try_assign(&mut self, shift: Shift, email: &str) -> bool {
        if !self.has_space(shift) {
            return false;
        }
        self.assignments
            .entry(shift)
            .or_default()
            .push(email.to_string());
        true
    }
}

/// Volunteers keyed by normalized email plus the ordered booth list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    pub volunteers: BTreeMap<String, Volunteer>,
    pub booths: Vec<Booth>,
}

impl Roster {
    pub fn new(booths: Vec<Booth>) -> Self {
        Self {
            volunteers: BTreeMap::new(),
            booths,
        }
    }

    /// Inserts a volunteer, unioning shifts into an existing record with the same email.
    /// Returns `true` when an existing record absorbed the shifts.
    pub fn merge_volunteer(&mut self, volunteer: Volunteer) -> bool {
        match self.volunteers.get_mut(&volunteer.email) {
            Some(existing) => {
                info!(email = %existing.email, "merging shifts for existing volunteer");
                existing.shifts.extend(volunteer.shifts);
                true
            }
            None => {
                self.volunteers.insert(volunteer.email.clone(), volunteer);
                false
            }
        }
    }

    pub fn volunteer(&self, email: &str) -> Option<&Volunteer> {
        self.volunteers.get(email)
    }

    pub fn booth(&self, name: &str) -> Option<&Booth> {
        self.booths.iter().find(|booth| booth.name == name)
    }

    /// Volunteers sorted by (last, first) name, email breaking ties.
    pub fn volunteers_by_name(&self) -> Vec<&Volunteer> {
        let mut sorted: Vec<&Volunteer> = self.volunteers.values().collect();
        sorted.sort_by_key(|volunteer| volunteer.sort_key());
        sorted
    }

    pub fn filled_slots(&self, shift: Shift) -> usize {
        self.booths
            .iter()
            .map(|booth| booth.occupants(shift).len())
            .sum()
    }

    pub fn unfilled_booths(&self, shift: Shift) -> Vec<&Booth> {
        self.booths
            .iter()
            .filter(|booth| booth.has_space(shift))
            .collect()
    }

    pub fn max_capacity(&self) -> usize {
        self.booths
            .iter()
            .map(|booth| booth.capacity)
            .max()
            .unwrap_or(DEFAULT_BOOTH_CAPACITY)
    }
}
