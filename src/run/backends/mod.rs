//! Simulator backend variants
//!
//! A fixed set of named adapters, one per simulator tool. Each supplies
//! command templates and classification patterns; everything else is
//! inherited runner behavior. Selection happens once at startup by name.

mod bluesim;
mod ghdl;

pub use bluesim::Bluesim;
pub use ghdl::Ghdl;

use super::runner::SimulatorBackend;
use super::RunError;

/// Names accepted by [`backend_for_name`].
pub const BACKEND_NAMES: &[&str] = &["bluesim", "ghdl"];

/// Look up a backend variant by (case-insensitive) name.
pub fn backend_for_name(name: &str) -> Result<Box<dyn SimulatorBackend>, RunError> {
    match name.to_ascii_lowercase().as_str() {
        "bluesim" => Ok(Box::new(Bluesim::new()?)),
        "ghdl" => Ok(Box::new(Ghdl::new()?)),
        _ => Err(RunError::UnknownSimulator(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_registered_name_resolves() {
        for name in BACKEND_NAMES {
            let backend = backend_for_name(name).unwrap();
            assert_eq!(backend.name(), *name);
        }
    }

    #[test]
    fn selection_is_case_insensitive() {
        assert!(backend_for_name("BLUESIM").is_ok());
        assert!(backend_for_name("Ghdl").is_ok());
    }

    #[test]
    fn unknown_simulator_is_rejected() {
        let err = backend_for_name("spice").unwrap_err();
        assert!(matches!(err, RunError::UnknownSimulator(name) if name == "spice"));
    }
}
