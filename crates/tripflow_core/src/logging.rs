use std::fs::File;
use std::io::Write;

use env_logger::{Builder, Target, WriteStyle};

use crate::io::options::{LogFormat, PlannerOptions};
use crate::{Error, Result};

/// Install the process-wide logger from the run options. Call once, before
/// any pipeline stage emits records.
pub fn init_logger(options: &PlannerOptions) -> Result<()> {
    let format = options.log_format;
    let timestamp = options.log_timestamp;

    let mut builder = Builder::new();
    builder
        .filter_level(options.log_level.to_filter())
        .write_style(WriteStyle::Never)
        .format(move |buf, record| {
            if timestamp {
                write!(buf, "{} ", buf.timestamp_millis())?;
            }
            match format {
                LogFormat::Compact => writeln!(buf, "{:5} {}", record.level(), record.args()),
                LogFormat::Pretty => writeln!(
                    buf,
                    "{:5} [{}] {}",
                    record.level(),
                    record.target(),
                    record.args()
                ),
            }
        })
        .target(log_target(options)?);

    builder
        .try_init()
        .map_err(|e| Error::other(format!("logger already installed: {e}")))
}

fn log_target(options: &PlannerOptions) -> Result<Target> {
    match options.log_output_path() {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| Error::other(format!("log file {}: {e}", path.display())))?;
            Ok(Target::Pipe(Box::new(file)))
        }
        None => Ok(Target::Stderr),
    }
}
