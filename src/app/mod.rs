//! Starter core: pure domain orchestration, zero I/O.
//!
//! [`service::MotorStarter`] wires the reducer, the simulation driver and
//! the overload relay together.  All interaction with the outside world
//! happens through the **port traits** in [`ports`], keeping this layer
//! testable without a terminal, a file system or a wall clock.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
