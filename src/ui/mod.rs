//! User interface module - logging setup, CI annotations and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Process-wide output setup

use std::env;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_error, display_outcome, display_proposed_tag,
    display_status, display_success,
};

/// Filter used when `RUST_LOG` is not set, by `-v` count.
pub fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "release_tagger=info",
        1 => "release_tagger=debug",
        _ => "release_tagger=trace",
    }
}

/// Install the tracing subscriber. Logs go to stderr so stdout stays free for
/// outputs.
///
/// `RUST_LOG` takes precedence over the verbosity flag.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    // Already initialised in this process: keep the existing subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

/// Whether we are running as a GitHub Actions step.
pub fn in_github_actions() -> bool {
    env::var("GITHUB_ACTIONS").map(|v| v == "true").unwrap_or(false)
}

/// Workflow command that marks the step's error in the Actions UI.
pub fn error_annotation(message: &str) -> String {
    // Workflow commands end at the first newline; escape per the runner's rules
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::error::{}", escaped)
}

/// Report a fatal error, with an annotation when running in Actions.
pub fn report_failure(message: &str) {
    display_error(message);
    if in_github_actions() {
        println!("{}", error_annotation(message));
    }
}
