//! Peripheral drivers: trigger button, light banks, shutdown timer.

pub mod button;
pub mod lights;
pub mod shutdown_timer;
