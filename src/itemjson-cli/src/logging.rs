//! Diagnostic logging setup
//!
//! Diagnostics go to stderr through `tracing`; the run report itself is
//! printed to stdout by `main`. The filter level comes from the `-v` count
//! only, never from the environment.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive for a given `-v` count
pub fn filter_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "itemjson=info,warn",
        _ => "itemjson=debug,info",
    }
}

pub fn init(verbose: u8) {
    tracing_subscriber::registry()
        .with(EnvFilter::new(filter_directive(verbose)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive_levels() {
        assert_eq!(filter_directive(0), "warn");
        assert!(filter_directive(1).contains("itemjson=info"));
        assert!(filter_directive(2).contains("itemjson=debug"));
        assert_eq!(filter_directive(5), filter_directive(2));
    }

    #[test]
    fn test_filter_directive_parses() {
        for verbose in 0..3 {
            assert!(EnvFilter::try_new(filter_directive(verbose)).is_ok());
        }
    }
}
