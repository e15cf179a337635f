// Logging and verbosity control

use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter, e.g. `PAYO_LOG=payo_providers=debug`
pub const LOG_ENV: &str = "PAYO_LOG";

/// Verbosity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VerbosityLevel {
    /// Quiet mode - warnings and errors only
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Verbose mode - debug output
    Verbose,
}

impl VerbosityLevel {
    /// Derive the level from CLI flags; quiet wins over verbose
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            VerbosityLevel::Quiet
        } else if verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }

    /// Default filter directive when `PAYO_LOG` is unset
    pub fn directive(&self) -> &'static str {
        match self {
            VerbosityLevel::Quiet => "warn",
            VerbosityLevel::Normal => "info",
            VerbosityLevel::Verbose => "debug",
        }
    }
}

/// Build the tracing filter, preferring `PAYO_LOG` over the CLI flags
pub fn build_filter(level: VerbosityLevel) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level.directive()))
}

/// Initialize logging based on CLI flags
///
/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init_logging(verbose: bool, quiet: bool) {
    let level = VerbosityLevel::from_flags(verbose, quiet);
    let verbose = level == VerbosityLevel::Verbose;

    // A second initialisation (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init();
}
