// ============================================================================
// Logging
// Subscriber setup for the adapter's tracing events
// ============================================================================

use tracing_subscriber::EnvFilter;

/// Default directive when `RUST_LOG` is unset
const DEFAULT_DIRECTIVE: &str = "period_algebra=info";

/// Install a formatting subscriber filtered by `RUST_LOG`.
///
/// Returns `false` if a global subscriber was already set.
pub fn init_logging() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    install(filter)
}

/// Install a formatting subscriber with an explicit directive, e.g. `"period_algebra=trace"`.
pub fn init_logging_with(directive: &str) -> bool {
    install(EnvFilter::new(directive))
}

fn install(filter: EnvFilter) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_install_is_refused() {
        let _ = init_logging_with("period_algebra=trace");
        assert!(!init_logging());
    }
}
