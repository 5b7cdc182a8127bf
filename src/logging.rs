//! Logging setup.
//!
//! Installs a `tracing` subscriber that prints to stdout. The filter defaults
//! to `info` with the noisy GPU crates capped at `warn`, and can be overridden
//! through the `GLYPHLOOP_LOG` environment variable using the usual
//! `EnvFilter` directive syntax.

use tracing::metadata::LevelFilter;
use tracing_panic::panic_hook;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, registry};

/// Environment variable holding extra filter directives.
pub const LOG_ENV_VAR: &str = "GLYPHLOOP_LOG";

/// Directives used for every target [`LOG_ENV_VAR`] does not mention.
const DEFAULT_DIRECTIVES: [&str; 4] = ["info", "wgpu_core=warn", "wgpu_hal=warn", "naga=warn"];

/// Installs the global subscriber and routes panics through `tracing`.
///
/// Calling this twice is harmless: the second attempt fails to set the global
/// default and only reports it on stderr.
pub fn init() {
    let filter = build_filter(std::env::var(LOG_ENV_VAR).ok().as_deref());

    let stdout_log = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_filter(filter);

    if let Err(err) = registry().with(stdout_log).try_init() {
        eprintln!("Failed to set logger: {err}");
        return;
    }

    std::panic::set_hook(Box::new(panic_hook));
}

/// Combines the default directives with the user's `directives`.
///
/// A user directive replaces the default for the same target, and a bare level
/// such as `debug` replaces the global `info`.
pub fn build_filter(directives: Option<&str>) -> EnvFilter {
    let user: Vec<&str> = directives
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|directive| !directive.is_empty())
        .collect();
    let overridden: Vec<Option<&str>> = user.iter().map(|directive| directive_target(directive)).collect();

    let combined: Vec<&str> = DEFAULT_DIRECTIVES
        .into_iter()
        .filter(|directive| !overridden.contains(&directive_target(directive)))
        .chain(user.iter().copied())
        .collect();

    EnvFilter::builder().parse_lossy(combined.join(","))
}

/// Target a directive applies to, `None` for a global level.
fn directive_target(directive: &str) -> Option<&str> {
    match directive.split_once('=') {
        Some((target, _)) => Some(target),
        None if directive.parse::<LevelFilter>().is_ok() => None,
        None => Some(directive),
    }
}
