//! `tracing` subscriber setup for hosts embedding the library.

use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber filtered by `RUST_LOG` plus `default_directive`.
///
/// Returns `false` when a global subscriber was already installed, so calling
/// it more than once (e.g. from tests) is harmless. An unparsable directive is
/// reported once the subscriber is up and otherwise ignored.
pub fn init(default_directive: &str) -> bool {
    let parsed = default_directive.parse::<Directive>();
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = &parsed {
        filter = filter.add_directive(directive.clone());
    }

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok();

    if let Err(error) = parsed {
        tracing::warn!("Ignoring invalid log filter {default_directive:?}: {error}");
    }
    if installed {
        tracing::debug!("Logging initialized with {default_directive:?}");
    }
    installed
}
