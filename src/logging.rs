use std::path::Path;
use std::sync::Once;

use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_LOG_LEVEL: &str = "info";
const ENV_VAR_NAME: &str = "PARTYPLAN_LOG";

static INIT: Once = Once::new();

/// Install the global tracing subscriber (first call wins).
///
/// Human-readable output goes to stderr, filtered by `PARTYPLAN_LOG`, then
/// `log_level`, then `info`. With `log_file`, every event is also appended
/// there as JSON regardless of the stderr filter.
pub fn init(log_level: Option<&str>, log_file: Option<&Path>) -> anyhow::Result<()> {
    let mut init_err: Option<anyhow::Error> = None;

    INIT.call_once(|| {
        if let Err(e) = try_init(log_level, log_file) {
            init_err = Some(e);
        }
    });

    init_err.map_or(Ok(()), Err)
}

fn try_init(log_level: Option<&str>, log_file: Option<&Path>) -> anyhow::Result<()> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact()
        .with_filter(build_filter(log_level));

    let file_layer = match log_file {
        Some(path) => {
            let file = open_log_file(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(file.with_max_level(Level::TRACE))
                    .with_ansi(false)
                    .json(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))
}

fn build_filter(log_level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_env(ENV_VAR_NAME)
        .unwrap_or_else(|_| EnvFilter::new(log_level.unwrap_or(DEFAULT_LOG_LEVEL)))
}

fn open_log_file(path: &Path) -> anyhow::Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                anyhow::anyhow!(
                    "failed to create log file directory {}: {e}",
                    parent.display()
                )
            })?;
        }
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| anyhow::anyhow!("failed to open log file {}: {e}", path.display()))
}
