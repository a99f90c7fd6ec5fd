//! DOL starter library.
//!
//! Control logic for a Direct-On-Line motor starter: a pure reducer over
//! the motor snapshot, start interlocks and an overload relay, and a
//! virtual-time simulation of the rotor ramps.  Exposed for the host
//! runner, integration tests and fuzzing.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod fsm;
pub mod safety;
pub mod scheduler;
pub mod sim;

pub mod adapters;
