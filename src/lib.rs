//! nontrivial-param - find by-value class/struct parameters in debug info
//!
//! This library walks the DWARF debug information of a compiled binary and
//! reports, as GCC-style notes, every function parameter whose type is a
//! class or struct (or a const/volatile/typedef form of one). It backs the
//! `nontrivial-param` command line tool and can be driven over any backend
//! that implements [`DebugInfoProvider`].

pub mod analyzer;
pub mod backend;
pub mod config;
pub mod error;

/// Re-export key items for easier access in tests
pub use analyzer::{analyze, AnalysisSummary};
pub use backend::{DebugInfoProvider, DieArena, DwarfProvider};
pub use config::AnalysisConfig;
pub use error::{AnalysisError, BackendError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Initialize the logging system
///
/// Does nothing if a logger is already installed.
pub fn init_logging(level: log::LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp_secs()
        .try_init();
}
