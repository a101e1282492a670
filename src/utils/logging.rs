use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::core::constants::LOG_FILTER_ENV;

const DEFAULT_FILTER: &str = "warn";

/// Where diagnostic output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget<'a> {
    /// Append to a file; the only option that leaves the editor screen intact.
    File(&'a Path),
    Stderr,
    Discard,
}

/// Filter from `SHEETKEEP_LOG`, falling back to `warn` when unset or invalid.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Calling this twice is harmless; the
/// second call keeps the first subscriber.
pub fn init(target: LogTarget<'_>) -> Result<(), Box<dyn std::error::Error>> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false);

    let result = match target {
        LogTarget::File(path) => {
            test_file_access(path)?;
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::Discard => builder.with_writer(std::io::sink).try_init(),
    };

    if let Err(err) = result {
        tracing::debug!("logging already initialised: {err}");
    }
    Ok(())
}

/// Make sure the log file can be created and appended to before the
/// terminal is taken over, so a bad path is reported on a normal screen.
fn test_file_access(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(format!("log directory {} does not exist", parent.display()).into());
        }
    }
    OpenOptions::new().create(true).append(true).open(path)?;
    Ok(())
}
