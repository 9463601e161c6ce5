use serde::{Deserialize, Deserializer};
use std::io::Read;

/// One row of a signup sheet with blank cells collapsed to `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SignupRecord {
    pub(crate) line: u64,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) email: String,
    pub(crate) phone: Option<String>,
    pub(crate) what: Option<String>,
}

pub(crate) fn parse_signups<R: Read>(reader: R) -> Result<Vec<SignupRecord>, csv::Error> {
    let mut csv_reader = csv_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut records = Vec::new();

    for result in csv_reader.records() {
        let record = result?;
        let line = record.position().map(|position| position.line()).unwrap_or_default();
        let row: SignupRow = record.deserialize(Some(&headers))?;
        records.push(SignupRecord {
            line,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            what: row.what,
        });
    }

    Ok(records)
}

pub(crate) fn parse_booth_names<R: Read>(reader: R) -> Result<Vec<String>, csv::Error> {
    let mut csv_reader = csv_reader(reader);
    let mut names = Vec::new();

    for result in csv_reader.deserialize::<BoothRow>() {
        let row = result?;
        if let Some(name) = row.booth_name {
            names.push(name);
        }
    }

    Ok(names)
}

/// Raw `Email` cells, for counting distinct volunteers without validation.
pub(crate) fn parse_emails<R: Read>(reader: R) -> Result<Vec<String>, csv::Error> {
    let mut csv_reader = csv_reader(reader);
    let mut emails = Vec::new();

    for result in csv_reader.deserialize::<EmailRow>() {
        let row = result?;
        emails.push(row.email);
    }

    Ok(emails)
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader)
}

#[derive(Debug, Deserialize)]
struct SignupRow {
    #[serde(rename = "Volunteer First Name", default)]
    first_name: String,
    #[serde(rename = "Volunteer Last Name", default)]
    last_name: String,
    #[serde(rename = "Email", default)]
    email: String,
    #[serde(rename = "Phone", default, deserialize_with = "empty_string_as_none")]
    phone: Option<String>,
    #[serde(rename = "What", default, deserialize_with = "empty_string_as_none")]
    what: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BoothRow {
    #[serde(
        rename = "BoothName",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    booth_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EmailRow {
    #[serde(rename = "Email", default)]
    email: String,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
