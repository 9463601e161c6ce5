mod parser;

use crate::roster::diagnostics::{Diagnostics, RosterEvent, SkipReason};
use crate::roster::domain::{normalize_email, Booth, Roster, Shift, Volunteer};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid CSV data in {source_name}: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },
    #[error("no booths found in {0}")]
    NoBooths(String),
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+").expect("email pattern compiles"))
}

/// Accepts `local@domain.tld` shaped addresses; expects an already normalized value.
pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

/// Reads signup sheets into validated [`Volunteer`] records.
pub struct SignupImporter;

impl SignupImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        diagnostics: &mut Diagnostics,
    ) -> Result<BTreeMap<String, Volunteer>, ImportError> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let file = File::open(path).map_err(|source_err| ImportError::Io {
            path: source.clone(),
            source: source_err,
        })?;
        Self::from_reader(file, &source, diagnostics)
    }

    /// Parses one sheet. Rows with a bad email or shift are skipped and recorded; the first row
    /// for an email supplies the names and phone, later rows only add shifts.
    pub fn from_reader<R: Read>(
        reader: R,
        source: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<BTreeMap<String, Volunteer>, ImportError> {
        let records = parser::parse_signups(reader).map_err(|err| ImportError::Csv {
            source_name: source.to_string(),
            source: err,
        })?;
        let mut volunteers: BTreeMap<String, Volunteer> = BTreeMap::new();

        for record in records {
            let email = normalize_email(&record.email);
            if !is_valid_email(&email) {
                skip_row(diagnostics, source, record.line, SkipReason::InvalidEmail, &email);
                continue;
            }
            let Some(what) = record.what.as_deref() else {
                skip_row(diagnostics, source, record.line, SkipReason::MissingShift, "");
                continue;
            };
            let Some(shift) = Shift::from_signup_name(what) else {
                skip_row(diagnostics, source, record.line, SkipReason::UnknownShift, what);
                continue;
            };

            let volunteer = volunteers.entry(email.clone()).or_insert_with(|| {
                debug!(
                    %email,
                    first = %record.first_name,
                    last = %record.last_name,
                    "added new volunteer"
                );
                Volunteer::new(
                    record.first_name.clone(),
                    record.last_name.clone(),
                    &email,
                    record.phone.clone(),
                )
            });
            volunteer.add_shift(shift);
        }

        info!(source, volunteers = volunteers.len(), "parsed signup sheet");
        Ok(volunteers)
    }

    /// Imports every sheet in order and merges repeated emails into one record.
    pub fn load_all<P: AsRef<Path>>(
        paths: &[P],
        roster: &mut Roster,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), ImportError> {
        for path in paths {
            let volunteers = Self::from_path(path, diagnostics)?;
            merge_into(roster, volunteers, diagnostics);
        }
        info!(volunteers = roster.volunteers.len(), "signup import finished");
        Ok(())
    }
}

fn skip_row(
    diagnostics: &mut Diagnostics,
    source: &str,
    line: u64,
    reason: SkipReason,
    value: &str,
) {
    warn!(source, line, value, "skipping row: {}", reason.label());
    diagnostics.record(RosterEvent::RowSkipped {
        source: source.to_string(),
        line,
        reason,
        value: value.to_string(),
    });
}

/// Folds one sheet's volunteers into the roster, recording each merge.
pub fn merge_into(
    roster: &mut Roster,
    volunteers: BTreeMap<String, Volunteer>,
    diagnostics: &mut Diagnostics,
) {
    for (email, volunteer) in volunteers {
        if roster.merge_volunteer(volunteer) {
            diagnostics.record(RosterEvent::VolunteerMerged { email });
        }
    }
}

/// Reads the booth list; every booth gets the same per-shift capacity.
pub struct BoothLoader;

impl BoothLoader {
    pub fn from_path<P: AsRef<Path>>(path: P, capacity: usize) -> Result<Vec<Booth>, ImportError> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let file = File::open(path).map_err(|source_err| ImportError::Io {
            path: source.clone(),
            source: source_err,
        })?;
        Self::from_reader(file, &source, capacity)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        source: &str,
        capacity: usize,
    ) -> Result<Vec<Booth>, ImportError> {
        let names = parser::parse_booth_names(reader).map_err(|err| ImportError::Csv {
            source_name: source.to_string(),
            source: err,
        })?;
        if names.is_empty() {
            return Err(ImportError::NoBooths(source.to_string()));
        }

        info!(source, booths = names.len(), capacity, "loaded booths");
        Ok(names
            .into_iter()
            .map(|name| Booth::new(name, capacity))
            .collect())
    }
}

/// Distinct non-empty emails across the given sheets, normalized but not validated.
pub fn count_unique_emails<P: AsRef<Path>>(paths: &[P]) -> Result<usize, ImportError> {
    let mut unique = BTreeSet::new();
    for path in paths {
        let path = path.as_ref();
        let source = path.display().to_string();
        let file = File::open(path).map_err(|err| ImportError::Io {
            path: source.clone(),
            source: err,
        })?;
        let emails = parser::parse_emails(file).map_err(|err| ImportError::Csv {
            source_name: source,
            source: err,
        })?;
        unique.extend(
            emails
                .iter()
                .map(|email| normalize_email(email))
                .filter(|email| !email.is_empty()),
        );
    }
    Ok(unique.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "Volunteer First Name,Volunteer Last Name,Email,Phone,What\n";

    fn import(body: &str, diagnostics: &mut Diagnostics) -> BTreeMap<String, Volunteer> {
        let csv = format!("{HEADER}{body}");
        SignupImporter::from_reader(Cursor::new(csv), "signups.csv", diagnostics)
            .expect("import succeeds")
    }

    #[test]
    fn email_validation_matches_expected_shapes() {
        assert!(is_valid_email("ann@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.org"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("ann@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ann.example.com"));
    }

    #[test]
    fn rows_for_the_same_email_collapse_into_one_volunteer() {
        let mut diagnostics = Diagnostics::new();
        let volunteers = import(
            "Ann,Lee,Ann@Example.com,555-0100,Shift #1\n\
Annie,Lee, ann@example.com ,,Clean Up\n",
            &mut diagnostics,
        );

        assert_eq!(volunteers.len(), 1);
        let ann = &volunteers["ann@example.com"];
        assert_eq!(ann.first_name, "Ann");
        assert_eq!(ann.phone.as_deref(), Some("555-0100"));
        assert_eq!(
            ann.shifts.iter().copied().collect::<Vec<_>>(),
            vec![Shift::Shift1, Shift::Cleanup]
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn malformed_rows_are_skipped_with_diagnostics() {
        let mut diagnostics = Diagnostics::new();
        let volunteers = import(
            "Bad,Email,not-an-email,,Shift #1\n\
No,Shift,noshift@example.com,,\n\
Odd,Shift,odd@example.com,,Shift #9\n\
Good,Row,good@example.com,,Set Up\n",
            &mut diagnostics,
        );

        assert_eq!(volunteers.len(), 1);
        assert!(volunteers.contains_key("good@example.com"));
        assert_eq!(diagnostics.skipped_rows(), 3);
        assert_eq!(
            diagnostics.events()[2],
            RosterEvent::RowSkipped {
                source: "signups.csv".into(),
                line: 4,
                reason: SkipReason::UnknownShift,
                value: "Shift #9".into(),
            }
        );
    }

    #[test]
    fn merge_into_unions_shifts_across_sheets() {
        let mut diagnostics = Diagnostics::new();
        let mut roster = Roster::default();
        let first = import("Ann,Lee,ann@example.com,,Shift #1\n", &mut diagnostics);
        let second = import(
            "Ann,Lee,ANN@example.com,,Shift #2\nBo,Berg,bo@example.com,,Shift #3\n",
            &mut diagnostics,
        );

        merge_into(&mut roster, first, &mut diagnostics);
        merge_into(&mut roster, second, &mut diagnostics);

        assert_eq!(roster.volunteers.len(), 2);
        assert_eq!(roster.volunteers["ann@example.com"].shifts.len(), 2);
        assert_eq!(
            diagnostics.events(),
            [RosterEvent::VolunteerMerged {
                email: "ann@example.com".into()
            }]
        );
    }

    #[test]
    fn booth_loader_applies_capacity_and_rejects_empty_lists() {
        let booths = BoothLoader::from_reader(Cursor::new("BoothName\nB1\nB2\n"), "booths.csv", 3)
            .expect("booths load");
        assert_eq!(booths.len(), 2);
        assert!(booths.iter().all(|booth| booth.capacity == 3));

        let error = BoothLoader::from_reader(Cursor::new("BoothName\n\n"), "booths.csv", 2)
            .expect_err("empty booth list rejected");
        assert!(matches!(error, ImportError::NoBooths(ref source) if source == "booths.csv"));
    }

    #[test]
    fn from_path_reports_missing_files() {
        let error = SignupImporter::from_path("./does-not-exist.csv", &mut Diagnostics::new())
            .expect_err("expected io error");
        match error {
            ImportError::Io { path, .. } => assert_eq!(path, "./does-not-exist.csv"),
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
