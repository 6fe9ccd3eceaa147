use tracing_subscriber::EnvFilter;

use crate::config::LogFormat;

/// Install the global `tracing` subscriber, writing to stderr.
///
/// `RUST_LOG` wins over `default_filter` when set.
pub fn init_tracing(format: LogFormat, default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
