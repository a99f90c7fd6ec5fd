//! Motor physics simulation.
//!
//! Produces the `SetRpm` and `TickRuntime` actions that move the rotor
//! through its ramps and account running time.

pub mod driver;
pub mod ramp;

pub use driver::SimulationDriver;
pub use ramp::{RampProfile, ease_in_out_cubic, ease_out_cubic};
