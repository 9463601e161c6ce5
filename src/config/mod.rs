use crate::roster::engine::{
    ContinuityPolicy, CursorMode, ShiftCounting, DEFAULT_BREAK_THRESHOLD, MIN_BREAK_THRESHOLD,
};
use crate::roster::DEFAULT_BOOTH_CAPACITY;
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for a roster run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub assignment: AssignmentConfig,
    pub output: OutputConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let booth_capacity = match env::var("ROSTER_BOOTH_CAPACITY") {
            Ok(raw) => parse_booth_capacity(&raw)?,
            Err(_) => DEFAULT_BOOTH_CAPACITY,
        };
        let break_threshold = match env::var("ROSTER_BREAK_THRESHOLD") {
            Ok(raw) => parse_break_threshold(&raw)?,
            Err(_) => DEFAULT_BREAK_THRESHOLD,
        };
        let break_counting = match env::var("ROSTER_BREAK_COUNTING") {
            Ok(raw) => ShiftCounting::parse(&raw).ok_or(ConfigError::InvalidBreakCounting(raw))?,
            Err(_) => ShiftCounting::default(),
        };
        let continuity = match env::var("ROSTER_CONTINUITY") {
            Ok(raw) => ContinuityPolicy::parse(&raw).ok_or(ConfigError::InvalidContinuity(raw))?,
            Err(_) => ContinuityPolicy::default(),
        };
        let cursor_mode = match env::var("ROSTER_CURSOR") {
            Ok(raw) => CursorMode::parse(&raw).ok_or(ConfigError::InvalidCursorMode(raw))?,
            Err(_) => CursorMode::default(),
        };

        let booth_roster = env::var("ROSTER_BOOTH_CSV_OUT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("roster.csv"));
        let volunteer_roster = env::var("ROSTER_VOLUNTEER_CSV_OUT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("volunteer_roster.csv"));

        let log_level = env::var("ROSTER_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_file = env::var("ROSTER_LOG_FILE")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            assignment: AssignmentConfig {
                booth_capacity,
                break_threshold,
                break_counting,
                continuity,
                cursor_mode,
            },
            output: OutputConfig {
                booth_roster,
                volunteer_roster,
            },
            telemetry: TelemetryConfig {
                log_level,
                log_file,
            },
        })
    }
}

/// Knobs for the break rule and the assignment engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentConfig {
    pub booth_capacity: usize,
    pub break_threshold: usize,
    pub break_counting: ShiftCounting,
    pub continuity: ContinuityPolicy,
    pub cursor_mode: CursorMode,
}

/// Where the CSV reports are written.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub booth_roster: PathBuf,
    pub volunteer_roster: PathBuf,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

pub fn parse_booth_capacity(raw: &str) -> Result<usize, ConfigError> {
    raw.trim()
        .parse::<usize>()
        .ok()
        .filter(|capacity| *capacity > 0)
        .ok_or(ConfigError::InvalidBoothCapacity)
}

pub fn parse_break_threshold(raw: &str) -> Result<usize, ConfigError> {
    raw.trim()
        .parse::<usize>()
        .ok()
        .filter(|threshold| *threshold >= MIN_BREAK_THRESHOLD)
        .ok_or(ConfigError::InvalidBreakThreshold)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidBoothCapacity,
    InvalidBreakThreshold,
    InvalidBreakCounting(String),
    InvalidContinuity(String),
    InvalidCursorMode(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBoothCapacity => {
                write!(f, "ROSTER_BOOTH_CAPACITY must be a positive integer")
            }
            ConfigError::InvalidBreakThreshold => {
                write!(
                    f,
                    "ROSTER_BREAK_THRESHOLD must be an integer of at least {MIN_BREAK_THRESHOLD}"
                )
            }
            ConfigError::InvalidBreakCounting(value) => write!(
                f,
                "ROSTER_BREAK_COUNTING must be 'all' or 'assignable' (got '{value}')"
            ),
            ConfigError::InvalidContinuity(value) => write!(
                f,
                "ROSTER_CONTINUITY must be 'previous-shift', 'any-prior' or 'most-recent' (got '{value}')"
            ),
            ConfigError::InvalidCursorMode(value) => write!(
                f,
                "ROSTER_CURSOR must be 'round-robin' or 'fill-first' (got '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "ROSTER_BOOTH_CAPACITY",
            "ROSTER_BREAK_THRESHOLD",
            "ROSTER_BREAK_COUNTING",
            "ROSTER_CONTINUITY",
            "ROSTER_CURSOR",
            "ROSTER_BOOTH_CSV_OUT",
            "ROSTER_VOLUNTEER_CSV_OUT",
            "ROSTER_LOG_LEVEL",
            "ROSTER_LOG_FILE",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.assignment.booth_capacity, 2);
        assert_eq!(config.assignment.break_threshold, 4);
        assert_eq!(config.assignment.break_counting, ShiftCounting::All);
        assert_eq!(config.assignment.continuity, ContinuityPolicy::PreviousShift);
        assert_eq!(config.assignment.cursor_mode, CursorMode::RoundRobin);
        assert_eq!(config.output.booth_roster, PathBuf::from("roster.csv"));
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.telemetry.log_file.is_none());
    }

    #[test]
    fn reads_overrides_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "prod");
        env::set_var("ROSTER_BOOTH_CAPACITY", "3");
        env::set_var("ROSTER_CONTINUITY", "most-recent");
        env::set_var("ROSTER_CURSOR", "fill-first");
        env::set_var("ROSTER_LOG_FILE", "volunteer_roster.log");
        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.assignment.booth_capacity, 3);
        assert_eq!(config.assignment.continuity, ContinuityPolicy::MostRecent);
        assert_eq!(config.assignment.cursor_mode, CursorMode::FillFirst);
        assert_eq!(
            config.telemetry.log_file,
            Some(PathBuf::from("volunteer_roster.log"))
        );
    }

    #[test]
    fn break_threshold_parser_enforces_the_floor() {
        assert_eq!(parse_break_threshold(" 4 ").ok(), Some(4));
        assert_eq!(parse_break_threshold("2").ok(), Some(2));
        assert!(parse_break_threshold("0").is_err());
        assert!(parse_break_threshold("1").is_err());
        assert!(parse_break_threshold("many").is_err());
    }

    #[test]
    fn rejects_invalid_values() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ROSTER_BOOTH_CAPACITY", "0");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidBoothCapacity)
        ));

        reset_env();
        env::set_var("ROSTER_BREAK_THRESHOLD", "1");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidBreakThreshold)
        ));

        reset_env();
        env::set_var("ROSTER_CONTINUITY", "sticky");
        let error = AppConfig::load().expect_err("unknown policy rejected");
        reset_env();
        assert!(error.to_string().contains("sticky"));
    }
}
