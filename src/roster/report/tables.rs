use super::UNASSIGNED_LABEL;
use crate::roster::domain::{Roster, Shift};
use std::io::Write;

/// One row per booth and assignable shift: `BoothName,Shift,Volunteer1..VolunteerN`.
pub fn write_booth_roster<W: Write>(roster: &Roster, writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let columns = roster.max_capacity();

    let mut header = vec!["BoothName".to_string(), "Shift".to_string()];
    header.extend((1..=columns).map(|slot| format!("Volunteer{slot}")));
    csv_writer.write_record(&header)?;

    for booth in &roster.booths {
        for shift in Shift::assignable() {
            let mut row = vec![booth.name.clone(), shift.label().to_string()];
            row.extend(booth.occupants(shift).iter().map(|email| {
                roster
                    .volunteer(email)
                    .map(|volunteer| volunteer.display_name())
                    .unwrap_or_else(|| email.clone())
            }));
            row.resize(columns + 2, String::new());
            csv_writer.write_record(&row)?;
        }
    }

    csv_writer.flush()?;
    Ok(())
}

/// One row per volunteer, name-sorted, with `ShiftN,BoothN` pairs in chronological order.
pub fn write_volunteer_roster<W: Write>(roster: &Roster, writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let max_shifts = roster
        .volunteers
        .values()
        .map(|volunteer| volunteer.shifts.len())
        .max()
        .unwrap_or(0);

    let mut header: Vec<String> = ["FirstName", "LastName", "Email", "Phone"]
        .iter()
        .map(|column| column.to_string())
        .collect();
    for slot in 1..=max_shifts {
        header.push(format!("Shift{slot}"));
        header.push(format!("Booth{slot}"));
    }
    csv_writer.write_record(&header)?;

    for volunteer in roster.volunteers_by_name() {
        let mut row = vec![
            volunteer.first_name.clone(),
            volunteer.last_name.clone(),
            volunteer.email.clone(),
            volunteer.phone.clone().unwrap_or_default(),
        ];
        for shift in &volunteer.shifts {
            row.push(shift.label().to_string());
            row.push(
                volunteer
                    .booth_for(*shift)
                    .unwrap_or(UNASSIGNED_LABEL)
                    .to_string(),
            );
        }
        row.resize(4 + max_shifts * 2, String::new());
        csv_writer.write_record(&row)?;
    }

    csv_writer.flush()?;
    Ok(())
}
