//! Bootstrap utilities for the cursor-ops binary.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LOG_ENV_VAR;

/// Initialize tracing with the CURSOR_LOG environment variable.
///
/// Defaults to "info" level if CURSOR_LOG is not set. Logs go to stderr so
/// command output on stdout stays machine-readable.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Split a `--config <path>` pair out of the command-line arguments.
///
/// Returns the config path, if any, and the remaining arguments in order.
pub fn split_config_arg(args: impl IntoIterator<Item = String>) -> (Option<String>, Vec<String>) {
    let mut config_path = None;
    let mut rest = Vec::new();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--config" {
            config_path = args.next();
        } else if let Some(path) = arg.strip_prefix("--config=") {
            config_path = Some(path.to_string());
        } else {
            rest.push(arg);
        }
    }
    (config_path, rest)
}
