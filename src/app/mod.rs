//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the Nova device behaviour: how button presses,
//! radio subscriptions, app commands and timer expiry turn into light,
//! radio and persistence actions.  All interaction with hardware happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod ports;
pub mod service;
pub mod state;
