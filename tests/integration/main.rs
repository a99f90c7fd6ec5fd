//! Integration test driver for the `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that exercises a slice of the starter
//! through its public API with recording adapters.  Everything runs in
//! virtual time; no test sleeps.

mod config_tests;
mod mock_ports;
mod scenario_tests;
mod simulation_tests;
