//! Public SDK surface for CogMyra.
//!
//! This crate re-exports the building blocks used by chat front ends and hosts
//! the `cogmyra` command-line interface.

pub mod cli;

/// Re-export for convenience.
pub use cogmyra_config as config;
/// Re-export for convenience.
pub use cogmyra_core as core;
/// Re-export for convenience.
pub use cogmyra_memory as memory;

/// Initialize `env_logger` with millisecond timestamps, honouring `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored. Output goes to
/// stderr so command output on stdout stays machine readable.
pub fn init_logging() {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();
}
