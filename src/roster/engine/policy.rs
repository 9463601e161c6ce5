use serde::Serialize;

/// Which earlier booth a volunteer is steered back to before the fallback scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContinuityPolicy {
    /// Booth held in the immediately preceding assignable shift.
    #[default]
    PreviousShift,
    /// Any booth held earlier in the run, most recent first.
    AnyPrior,
    /// Booth from the latest earlier assignment, ignoring gaps.
    MostRecent,
}

impl ContinuityPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "previous-shift" | "previous" => Some(Self::PreviousShift),
            "any-prior" | "any" => Some(Self::AnyPrior),
            "most-recent" | "latest" => Some(Self::MostRecent),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PreviousShift => "previous-shift",
            Self::AnyPrior => "any-prior",
            Self::MostRecent => "most-recent",
        }
    }
}

/// How the shared booth cursor moves after a successful fallback placement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CursorMode {
    /// Every inspected booth advances the cursor, so placements rotate across booths.
    #[default]
    RoundRobin,
    /// The cursor stays on the receiving booth until it is full.
    FillFirst,
}

impl CursorMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "round-robin" | "roundrobin" => Some(Self::RoundRobin),
            "fill-first" | "fill" => Some(Self::FillFirst),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::RoundRobin => "round-robin",
            Self::FillFirst => "fill-first",
        }
    }
}

/// Which shifts count toward the break threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShiftCounting {
    #[default]
    All,
    Assignable,
}

impl ShiftCounting {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "assignable" => Some(Self::Assignable),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Assignable => "assignable",
        }
    }
}
