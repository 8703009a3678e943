use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber. Logs go to stderr so reports on stdout
/// stay pipeable. `RUST_LOG` wins over the built-in directives.
pub fn init_tracing(verbose: bool) {
    let default = if verbose {
        "tally=debug,tally_core=debug,tally_ingest=debug,tally_finance=debug"
    } else {
        "tally=info,tally_core=info,tally_ingest=info,tally_finance=info"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // Ignore a second init (tests may call this more than once)
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
