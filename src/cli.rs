use booth_roster::config::{self, AppConfig};
use booth_roster::error::AppError;
use booth_roster::roster::import::{count_unique_emails, BoothLoader, SignupImporter};
use booth_roster::roster::{
    AssignmentEngine, BreakRule, ContinuityPolicy, CursorMode, Diagnostics, Roster, RosterSummary,
    ShiftCounting,
};
use booth_roster::roster::report::{write_booth_roster, write_volunteer_roster};
use booth_roster::telemetry;
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "booth-roster",
    about = "Assign event volunteers to booths and write the shift rosters",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load booths and signup sheets, assign booths, and write both roster CSVs
    Assign(AssignArgs),
    /// Count distinct volunteer emails across signup sheets
    Count(CountArgs),
}

#[derive(Args, Debug)]
struct AssignArgs {
    /// CSV file with a BoothName column
    #[arg(long)]
    booths: PathBuf,
    /// One or more signup CSV exports
    #[arg(required = true)]
    signups: Vec<PathBuf>,
    /// Where to write the per-booth roster
    #[arg(long)]
    roster_out: Option<PathBuf>,
    /// Where to write the per-volunteer roster
    #[arg(long)]
    volunteer_out: Option<PathBuf>,
    /// Volunteers each booth holds per shift
    #[arg(long, value_parser = parse_capacity)]
    capacity: Option<usize>,
    /// Shift count at which a volunteer's latest shift is dropped
    #[arg(long, value_parser = parse_threshold)]
    break_threshold: Option<usize>,
    /// Which shifts count toward the break threshold (all, assignable)
    #[arg(long, value_parser = parse_counting)]
    break_counting: Option<ShiftCounting>,
    /// Continuity policy (previous-shift, any-prior, most-recent)
    #[arg(long, value_parser = parse_continuity)]
    continuity: Option<ContinuityPolicy>,
    /// Fallback cursor mode (round-robin, fill-first)
    #[arg(long, value_parser = parse_cursor)]
    cursor: Option<CursorMode>,
    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct CountArgs {
    /// One or more signup CSV exports
    #[arg(required = true)]
    signups: Vec<PathBuf>,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;

    match cli.command {
        Command::Assign(args) => run_assign(&mut config, args),
        Command::Count(args) => {
            telemetry::init(&config.telemetry)?;
            let unique = count_unique_emails(&args.signups)?;
            println!("Unique volunteers: {unique}");
            Ok(())
        }
    }
}

fn parse_capacity(raw: &str) -> Result<usize, String> {
    config::parse_booth_capacity(raw).map_err(|err| err.to_string())
}

fn parse_threshold(raw: &str) -> Result<usize, String> {
    config::parse_break_threshold(raw).map_err(|err| err.to_string())
}

fn parse_counting(raw: &str) -> Result<ShiftCounting, String> {
    ShiftCounting::parse(raw).ok_or_else(|| format!("unknown break counting '{raw}'"))
}

fn parse_continuity(raw: &str) -> Result<ContinuityPolicy, String> {
    ContinuityPolicy::parse(raw).ok_or_else(|| format!("unknown continuity policy '{raw}'"))
}

fn parse_cursor(raw: &str) -> Result<CursorMode, String> {
    CursorMode::parse(raw).ok_or_else(|| format!("unknown cursor mode '{raw}'"))
}

fn run_assign(config: &mut AppConfig, args: AssignArgs) -> Result<(), AppError> {
    let AssignArgs {
        booths,
        signups,
        roster_out,
        volunteer_out,
        capacity,
        break_threshold,
        break_counting,
        continuity,
        cursor,
        log_file,
        json,
    } = args;

    if let Some(path) = roster_out {
        config.output.booth_roster = path;
    }
    if let Some(path) = volunteer_out {
        config.output.volunteer_roster = path;
    }
    if let Some(capacity) = capacity {
        config.assignment.booth_capacity = capacity;
    }
    if let Some(threshold) = break_threshold {
        config.assignment.break_threshold = threshold;
    }
    if let Some(counting) = break_counting {
        config.assignment.break_counting = counting;
    }
    if let Some(policy) = continuity {
        config.assignment.continuity = policy;
    }
    if let Some(mode) = cursor {
        config.assignment.cursor_mode = mode;
    }
    if log_file.is_some() {
        config.telemetry.log_file = log_file;
    }

    telemetry::init(&config.telemetry)?;
    info!(
        environment = ?config.environment,
        continuity = config.assignment.continuity.label(),
        cursor = config.assignment.cursor_mode.label(),
        "starting roster run"
    );

    let settings = &config.assignment;
    let mut roster = Roster::new(BoothLoader::from_path(&booths, settings.booth_capacity)?);
    let mut diagnostics = Diagnostics::new();
    SignupImporter::load_all(&signups, &mut roster, &mut diagnostics)?;

    let mut engine = AssignmentEngine::new(settings.continuity, settings.cursor_mode)
        .with_break_rule(BreakRule::new(
            settings.break_threshold,
            settings.break_counting,
        ));
    let assignment = engine.run(&mut roster, &mut diagnostics);
    let summary = RosterSummary::build(&roster, &assignment, &diagnostics);

    let booth_file = File::create(&config.output.booth_roster)?;
    write_booth_roster(&roster, BufWriter::new(booth_file))?;
    let volunteer_file = File::create(&config.output.volunteer_roster)?;
    write_volunteer_roster(&roster, BufWriter::new(volunteer_file))?;
    info!(
        filled = summary.total_filled_slots,
        booth_roster = %config.output.booth_roster.display(),
        volunteer_roster = %config.output.volunteer_roster.display(),
        "rosters written"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        render_summary(&summary, config);
    }

    Ok(())
}

fn render_summary(summary: &RosterSummary, config: &AppConfig) {
    println!("=== FINAL BOOTH ROSTER ===");
    for booth in &summary.booths {
        println!("{}:", booth.name);
        for entry in &booth.shifts {
            let names = if entry.volunteers.is_empty() {
                "No volunteers".to_string()
            } else {
                entry.volunteers.join(", ")
            };
            println!("  {}: {}", entry.shift.label(), names);
        }
        println!();
    }

    println!("Total volunteers: {}", summary.total_volunteers);
    if summary.breaks > 0 {
        println!("Breaks scheduled: {}", summary.breaks);
    }
    if summary.skipped_rows > 0 {
        println!("Skipped signup rows: {}", summary.skipped_rows);
    }

    println!("=== UNFILLED BOOTHS ===");
    for coverage in &summary.coverage {
        if coverage.unfilled_booths > 0 {
            println!(
                "{}: {} booths need volunteers",
                coverage.shift.label(),
                coverage.unfilled_booths
            );
        }
    }

    if summary.has_unassigned() {
        println!("=== CAPACITY WARNINGS ===");
        for coverage in summary.coverage.iter().filter(|entry| !entry.unassigned.is_empty()) {
            warn!(
                shift = %coverage.shift,
                unassigned = coverage.unassigned.len(),
                "not enough booth capacity"
            );
            println!(
                "WARNING: {}: {} volunteers could not be placed ({})",
                coverage.shift.label(),
                coverage.unassigned.len(),
                coverage.unassigned.join(", ")
            );
        }
    }

    println!(
        "Roster written to {}",
        config.output.booth_roster.display()
    );
    println!(
        "Volunteer roster written to {}",
        config.output.volunteer_roster.display()
    );
}
