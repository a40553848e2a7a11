//! Runner version information.
//!
//! The value is taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile
//! time; prefer this constant over repeating `env!` in multiple places.

/// The hdlreg version string (for example, `0.1.0`).
pub const HDLREG_VERSION: &str = env!("CARGO_PKG_VERSION");
