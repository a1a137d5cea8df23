use std::env;
use std::iter::Peekable;
use std::path::Path;
use std::str::FromStr;

use log::LevelFilter;

use crate::constants::{
    DEFAULT_CLUSTER_RESTARTS, DEFAULT_CLUSTER_SEED, DEFAULT_MAX_DAILY_MINUTES,
    DEFAULT_RELOCATION_CAP_KM, DEFAULT_TWO_OPT_PASS_LIMIT,
};
use crate::error::{Error, Result};
use crate::route::TourShape;
use crate::segment::SegmentStrategy;

/// Runtime options for a planning run.
#[derive(Clone, Debug)]
pub struct PlannerOptions {
    /// Number of trip days.
    pub days: u32,
    /// Day partitioning strategy.
    pub segment_strategy: SegmentStrategy,
    /// Per-day route shape.
    pub tour_shape: TourShape,
    /// Stay-time budget per day in minutes.
    pub max_daily_min: u32,
    /// Maximum distance an overflow place may jump to the next day.
    pub relocation_cap_km: f64,
    /// Seed for reproducible clustering.
    pub cluster_seed: u64,
    /// Clustering restarts; best inertia wins.
    pub cluster_restarts: usize,
    /// Improvement-pass budget for the tour solver.
    pub two_opt_passes: usize,
    /// Structured logging level.
    pub log_level: LogLevel,
    /// Logging output format.
    pub log_format: LogFormat,
    /// Include timestamps in log lines.
    pub log_timestamp: bool,
    /// Optional output file path for logs. Empty means stderr.
    pub log_output: String,
    /// Optional input file path for places JSON. Empty means stdin.
    pub input: String,
    /// Optional output file path for the itinerary JSON. Empty means stdout.
    pub output: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            "off" => Ok(Self::Off),
            _ => Err(Error::invalid_input(format!(
                "Invalid log level: {value} (expected error|warn|info|debug|trace|off)"
            ))),
        }
    }

    pub fn to_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
            Self::Off => LevelFilter::Off,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl LogFormat {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            _ => Err(Error::invalid_input(format!(
                "Invalid log format: {value} (expected compact|pretty)"
            ))),
        }
    }
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            days: 1,
            segment_strategy: SegmentStrategy::Cluster,
            tour_shape: TourShape::Closed,
            max_daily_min: DEFAULT_MAX_DAILY_MINUTES,
            relocation_cap_km: DEFAULT_RELOCATION_CAP_KM,
            cluster_seed: DEFAULT_CLUSTER_SEED,
            cluster_restarts: DEFAULT_CLUSTER_RESTARTS,
            two_opt_passes: DEFAULT_TWO_OPT_PASS_LIMIT,
            log_level: LogLevel::Warn,
            log_format: LogFormat::Compact,
            log_timestamp: true,
            log_output: String::new(),
            input: String::new(),
            output: String::new(),
        }
    }
}

impl PlannerOptions {
    pub fn from_args() -> Result<Self> {
        let (options, saw_days) = Self::parse_from_iter(env::args().skip(1))?;
        if !saw_days {
            return Err(Error::invalid_input(format!(
                "Missing required option --days\n\n{}",
                Self::usage()
            )));
        }
        Ok(options)
    }

    fn parse_from_iter<I, S>(args: I) -> Result<(Self, bool)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        let mut saw_days = false;
        let mut args = args
            .into_iter()
            .map(|arg| arg.as_ref().to_owned())
            .peekable();

        while let Some(arg) = args.next() {
            if arg == "--help" || arg == "-h" {
                return Err(Error::invalid_input(Self::usage()));
            }

            let Some(raw_name) = arg.strip_prefix("--") else {
                return Err(Error::invalid_input(format!(
                    "Unexpected argument: {arg}\n\n{}",
                    Self::usage()
                )));
            };

            if raw_name.is_empty() {
                return Err(Error::invalid_input(format!(
                    "Invalid option name: {arg}\n\n{}",
                    Self::usage()
                )));
            }

            let (name, value) = split_arg(raw_name, &mut args);

            match name.as_str() {
                "days" => {
                    options.days = parse_value(&name, value)?;
                    saw_days = true;
                }
                "segment" => {
                    options.segment_strategy = SegmentStrategy::parse(&require_value(&name, value)?)?;
                }
                "tour" => {
                    options.tour_shape = TourShape::parse(&require_value(&name, value)?)?;
                }
                "max-daily-min" => options.max_daily_min = parse_value(&name, value)?,
                "relocation-cap-km" => options.relocation_cap_km = parse_value(&name, value)?,
                "cluster-seed" => options.cluster_seed = parse_value(&name, value)?,
                "cluster-restarts" => options.cluster_restarts = parse_value(&name, value)?,
                "two-opt-passes" => options.two_opt_passes = parse_value(&name, value)?,
                "log-level" => {
                    options.log_level = LogLevel::parse(&require_value(&name, value)?)?;
                }
                "log-format" => {
                    options.log_format = LogFormat::parse(&require_value(&name, value)?)?;
                }
                "log-timestamp" => {
                    options.log_timestamp = match value {
                        Some(v) => parse_bool(&name, &v)?,
                        None => true,
                    };
                }
                "no-log-timestamp" => {
                    if value.is_some() {
                        return Err(Error::invalid_input(format!(
                            "Flag --{name} does not take a value"
                        )));
                    }
                    options.log_timestamp = false;
                }
                "log-output" => options.log_output = require_value(&name, value)?,
                "input" => options.input = require_value(&name, value)?,
                "output" => options.output = require_value(&name, value)?,
                _ => {
                    return Err(Error::invalid_input(format!(
                        "Unknown option: --{name}\n\n{}",
                        Self::usage()
                    )));
                }
            }
        }

        Ok((options, saw_days))
    }

    pub fn usage() -> &'static str {
        concat!(
            "Usage:\n",
            "  tripflow --days <n> [options] [--input places.json]\n",
            "  tripflow --days <n> [options] < places.json\n\n",
            "Options:\n",
            "  --days <u32>                      Trip length in days (required)\n",
            "  --segment <cluster|weighted-span>\n",
            "  --tour <closed|open>\n",
            "  --max-daily-min <u32>\n",
            "  --relocation-cap-km <f64>\n",
            "  --cluster-seed <u64>\n",
            "  --cluster-restarts <usize>\n",
            "  --two-opt-passes <usize>\n",
            "  --log-level <error|warn|info|debug|trace|off>\n",
            "  --log-format <compact|pretty>\n",
            "  --log-timestamp[=<bool>]\n",
            "  --no-log-timestamp\n",
            "  --log-output <path>\n",
            "  --input <path>\n",
            "  --output <path>\n",
            "  --help\n",
            "\n",
            "Examples:\n",
            "  tripflow --days 3 --input places.json --output itinerary.json\n",
            "  tripflow --days 2 --tour open --log-level info < places.json\n",
            "  tripflow --days 4 --segment weighted-span --max-daily-min 480 < places.json\n",
        )
    }

    pub fn log_output_path(&self) -> Option<&Path> {
        non_empty_path(&self.log_output)
    }

    pub fn input_path(&self) -> Option<&Path> {
        non_empty_path(&self.input)
    }

    pub fn output_path(&self) -> Option<&Path> {
        non_empty_path(&self.output)
    }
}

fn non_empty_path(value: &str) -> Option<&Path> {
    let value = value.trim();
    if value.is_empty() || value == "-" {
        None
    } else {
        Some(Path::new(value))
    }
}

/// Accept both `--name=value` and `--name value` forms; a following token
/// starting with `--` is the next option, not a value.
fn split_arg<I>(raw_name: &str, args: &mut Peekable<I>) -> (String, Option<String>)
where
    I: Iterator<Item = String>,
{
    if let Some((name, value)) = raw_name.split_once('=') {
        return (name.to_owned(), Some(value.to_owned()));
    }

    let value = args.peek().filter(|v| !v.starts_with("--")).cloned();
    if value.is_some() {
        args.next();
    }
    (raw_name.to_owned(), value)
}

fn require_value(name: &str, value: Option<String>) -> Result<String> {
    value.ok_or_else(|| Error::invalid_input(format!("Missing value for --{name}")))
}

fn parse_value<T: FromStr>(name: &str, value: Option<String>) -> Result<T> {
    let value = require_value(name, value)?;
    value
        .parse()
        .map_err(|_| Error::invalid_input(format!("Invalid value for --{name}: {value}")))
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value {
        "1" | "true" | "TRUE" | "True" | "yes" | "YES" | "on" | "ON" => Ok(true),
        "0" | "false" | "FALSE" | "False" | "no" | "NO" | "off" | "OFF" => Ok(false),
        _ => Err(Error::invalid_input(format!(
            "Invalid boolean for --{name}: {value} (expected true/false)"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use log::LevelFilter;

    use super::{LogFormat, LogLevel, PlannerOptions, parse_bool};
    use crate::route::TourShape;
    use crate::segment::SegmentStrategy;

    #[test]
    fn parse_from_iter_applies_known_cli_options() {
        let (options, saw_days) = PlannerOptions::parse_from_iter([
            "--days=3",
            "--segment=weighted-span",
            "--tour=open",
            "--max-daily-min=480",
            "--relocation-cap-km=30.5",
            "--cluster-seed=7",
            "--cluster-restarts=4",
            "--two-opt-passes=16",
            "--log-level=debug",
            "--log-format=pretty",
            "--log-timestamp=false",
            "--log-output=run.log",
            "--input=places.json",
            "--output=itinerary.json",
        ])
        .expect("parse options");

        assert!(saw_days);
        assert_eq!(options.days, 3);
        assert_eq!(options.segment_strategy, SegmentStrategy::WeightedSpan);
        assert_eq!(options.tour_shape, TourShape::Open);
        assert_eq!(options.max_daily_min, 480);
        assert_eq!(options.relocation_cap_km, 30.5);
        assert_eq!(options.cluster_seed, 7);
        assert_eq!(options.cluster_restarts, 4);
        assert_eq!(options.two_opt_passes, 16);
        assert_eq!(options.log_level, LogLevel::Debug);
        assert_eq!(options.log_format, LogFormat::Pretty);
        assert!(!options.log_timestamp);
        assert_eq!(options.log_output, "run.log");
        assert_eq!(options.input, "places.json");
        assert_eq!(options.output, "itinerary.json");
    }

    #[test]
    fn parse_from_iter_accepts_space_separated_values() {
        let (options, saw_days) =
            PlannerOptions::parse_from_iter(["--days", "2", "--tour", "open"])
                .expect("parse options");
        assert!(saw_days);
        assert_eq!(options.days, 2);
        assert_eq!(options.tour_shape, TourShape::Open);
    }

    #[test]
    fn parse_from_iter_tracks_missing_days() {
        let (_, saw_days) =
            PlannerOptions::parse_from_iter(["--log-level=info"]).expect("parse options");
        assert!(!saw_days);
    }

    #[test]
    fn parse_from_iter_rejects_unknown_option() {
        let err = PlannerOptions::parse_from_iter(["--unknown-opt=1"])
            .expect_err("expected unknown option error");
        assert!(err.to_string().contains("Unknown option: --unknown-opt"));
    }

    #[test]
    fn parse_from_iter_rejects_unexpected_positional_argument() {
        let err = PlannerOptions::parse_from_iter(["places.json"])
            .expect_err("expected positional error");
        assert!(err.to_string().contains("Unexpected argument: places.json"));
    }

    #[test]
    fn parse_from_iter_requires_value_for_days() {
        let err = PlannerOptions::parse_from_iter(["--days"]).expect_err("missing value");
        assert!(err.to_string().contains("Missing value for --days"));
    }

    #[test]
    fn parse_from_iter_rejects_invalid_enum_values() {
        let err = PlannerOptions::parse_from_iter(["--tour=loop"]).expect_err("invalid tour");
        assert!(err.to_string().contains("Invalid tour shape: loop"));

        let err = PlannerOptions::parse_from_iter(["--segment=grid"]).expect_err("invalid segment");
        assert!(err.to_string().contains("Invalid segment strategy: grid"));
    }

    #[test]
    fn parse_from_iter_help_returns_usage_error() {
        let err = PlannerOptions::parse_from_iter(["--help"]).expect_err("help short-circuits");
        assert!(err.to_string().contains("Usage:"));
    }

    #[test]
    fn parse_from_iter_accepts_no_log_timestamp_flag() {
        let (options, _) =
            PlannerOptions::parse_from_iter(["--no-log-timestamp"]).expect("parse options");
        assert!(!options.log_timestamp);
    }

    #[test]
    fn parse_from_iter_rejects_no_log_timestamp_with_value() {
        let err = PlannerOptions::parse_from_iter(["--no-log-timestamp=true"])
            .expect_err("flag value rejected");
        assert!(err.to_string().contains("does not take a value"));
    }

    #[test]
    fn parse_bool_accepts_common_values() {
        assert!(parse_bool("x", "true").expect("parse"));
        assert!(parse_bool("x", "ON").expect("parse"));
        assert!(!parse_bool("x", "0").expect("parse"));
        assert!(!parse_bool("x", "off").expect("parse"));
    }

    #[test]
    fn parse_bool_rejects_unknown_values() {
        let err = parse_bool("log-timestamp", "maybe").expect_err("invalid bool");
        assert!(
            err.to_string()
                .contains("Invalid boolean for --log-timestamp: maybe")
        );
    }

    #[test]
    fn log_level_maps_to_expected_filter() {
        assert_eq!(LogLevel::Error.to_filter(), LevelFilter::Error);
        assert_eq!(LogLevel::Info.to_filter(), LevelFilter::Info);
        assert_eq!(LogLevel::Off.to_filter(), LevelFilter::Off);
    }

    #[test]
    fn log_level_parse_accepts_warning_alias() {
        assert_eq!(LogLevel::parse("warning").expect("parse"), LogLevel::Warn);
    }

    #[test]
    fn paths_treat_empty_and_dash_as_standard_streams() {
        let options = PlannerOptions::default();
        assert!(options.input_path().is_none());
        assert!(options.output_path().is_none());
        assert!(options.log_output_path().is_none());

        let options = PlannerOptions {
            input: "-".to_string(),
            ..PlannerOptions::default()
        };
        assert!(options.input_path().is_none());
    }

    #[test]
    fn paths_return_values_when_set() {
        let options = PlannerOptions {
            input: "in/places.json".to_string(),
            output: "out/itinerary.json".to_string(),
            ..PlannerOptions::default()
        };
        assert_eq!(
            options.input_path().expect("path"),
            std::path::Path::new("in/places.json")
        );
        assert_eq!(
            options.output_path().expect("path"),
            std::path::Path::new("out/itinerary.json")
        );
    }
}
