use booth_roster::roster::import::{merge_into, BoothLoader, SignupImporter};
use booth_roster::roster::report::{write_booth_roster, write_volunteer_roster};
use booth_roster::roster::{
    AssignmentEngine, Diagnostics, Roster, RosterEvent, RosterSummary, Shift,
};
use std::io::Cursor;

const SIGNUP_HEADER: &str = "Volunteer First Name,Volunteer Last Name,Email,Phone,What\n";

fn load(booths: &str, sheets: &[&str]) -> (Roster, Diagnostics) {
    let booths = BoothLoader::from_reader(Cursor::new(booths.to_string()), "booths.csv", 2)
        .expect("booths load");
    let mut roster = Roster::new(booths);
    let mut diagnostics = Diagnostics::new();
    for (index, body) in sheets.iter().enumerate() {
        let csv = format!("{SIGNUP_HEADER}{body}");
        let source = format!("signups-{index}.csv");
        let volunteers = SignupImporter::from_reader(Cursor::new(csv), &source, &mut diagnostics)
            .expect("signups import");
        merge_into(&mut roster, volunteers, &mut diagnostics);
    }
    (roster, diagnostics)
}

fn booth_of(roster: &Roster, email: &str, shift: Shift) -> Option<String> {
    roster.volunteers[email].booth_for(shift).map(str::to_string)
}

#[test]
fn alice_working_four_shifts_gets_a_break_during_cleanup() {
    let (mut roster, mut diagnostics) = load(
        "BoothName\nB1\nB2\n",
        &[
            "Alice,Anders,alice@example.com,,Shift #1\nAlice,Anders,alice@example.com,,Shift #2\n",
            "Alice,Anders,ALICE@example.com,,Shift #3\nAlice,Anders,alice@example.com,,Clean Up\n",
        ],
    );

    let summary = AssignmentEngine::default().run(&mut roster, &mut diagnostics);

    let alice = &roster.volunteers["alice@example.com"];
    assert_eq!(summary.breaks, 1);
    assert!(!alice.is_signed_up(Shift::Cleanup));
    for shift in Shift::assignable() {
        assert_eq!(booth_of(&roster, "alice@example.com", shift).as_deref(), Some("B1"));
    }
    assert!(diagnostics.events().contains(&RosterEvent::VolunteerMerged {
        email: "alice@example.com".into()
    }));
}

#[test]
fn capacity_is_never_exceeded_and_overflow_is_reported() {
    let mut body = String::new();
    for n in 0..7 {
        body.push_str(&format!("Vol,Person{n},p{n}@example.com,,Shift #2\n"));
    }
    let (mut roster, mut diagnostics) = load("BoothName\nB1\nB2\nB3\n", &[&body]);

    let summary = AssignmentEngine::default().run(&mut roster, &mut diagnostics);

    for booth in &roster.booths {
        for shift in Shift::assignable() {
            assert!(booth.occupants(shift).len() <= booth.capacity);
        }
    }
    assert_eq!(summary.placements, 6);
    assert_eq!(summary.unassigned_for(Shift::Shift2), ["p6@example.com"]);
    assert_eq!(
        diagnostics.unassigned_by_shift()[&Shift::Shift2],
        vec!["p6@example.com"]
    );
}

#[test]
fn continuity_holds_when_the_booth_has_room() {
    let (mut roster, mut diagnostics) = load(
        "BoothName\nB10\nB11\nB12\n",
        &["Ann,Adams,ann@x.org,,Shift #1\n\
Bo,Baker,bo@x.org,,Shift #1\n\
Cy,Cole,cy@x.org,,Shift #1\n\
Cy,Cole,cy@x.org,,Shift #2\n\
Al,Aaron,al@x.org,,Shift #2\n"],
    );

    AssignmentEngine::default().run(&mut roster, &mut diagnostics);

    assert_eq!(booth_of(&roster, "cy@x.org", Shift::Shift1).as_deref(), Some("B12"));
    assert_eq!(booth_of(&roster, "cy@x.org", Shift::Shift2).as_deref(), Some("B12"));
    assert_eq!(booth_of(&roster, "al@x.org", Shift::Shift2).as_deref(), Some("B10"));
}

#[test]
fn identical_input_produces_identical_reports() {
    let sheets = [
        "Mo,Moss,mo@x.org,,Shift #1\nMo,Moss,mo@x.org,,Shift #2\nLi,Lu,li@x.org,,Shift #3\n",
        "Ed,Eng,ed@x.org,555,Set Up\nEd,Eng,ed@x.org,555,Shift #1\nZo,Zu,zo@x.org,,Shift #2\n",
    ];
    let reversed = [sheets[1], sheets[0]];

    let render = |sheets: &[&str]| {
        let (mut roster, mut diagnostics) = load("BoothName\nB1\nB2\n", sheets);
        AssignmentEngine::default().run(&mut roster, &mut diagnostics);
        let mut booths = Vec::new();
        let mut volunteers = Vec::new();
        write_booth_roster(&roster, &mut booths).expect("booth roster");
        write_volunteer_roster(&roster, &mut volunteers).expect("volunteer roster");
        (booths, volunteers)
    };

    assert_eq!(render(&sheets), render(&sheets));
    assert_eq!(render(&sheets), render(&reversed));
}

#[test]
fn summary_reports_unfilled_booths_per_shift() {
    let (mut roster, mut diagnostics) = load(
        "BoothName\nB1\nB2\n",
        &["Ann,Adams,ann@x.org,,Shift #1\nBad,Row,nope,,Shift #1\n"],
    );

    let assignment = AssignmentEngine::default().run(&mut roster, &mut diagnostics);
    let summary = RosterSummary::build(&roster, &assignment, &diagnostics);

    assert_eq!(summary.skipped_rows, 1);
    assert_eq!(summary.total_filled_slots, 1);
    let unfilled: Vec<usize> = summary
        .coverage
        .iter()
        .map(|entry| entry.unfilled_booths)
        .collect();
    assert_eq!(unfilled, vec![2, 2, 2]);
}
