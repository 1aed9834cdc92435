//! Main light banks and status LED.
//!
//! Two PWM channels drive the warm and cool LED banks; a plain GPIO
//! drives the status indicator.  Any `embedded-hal` 1.0 implementation
//! works, so the same driver serves the real board and host tests.
//!
//! Peripheral write errors are logged and otherwise ignored: the core
//! treats light actuation as fire-and-forget.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::LightPort;

pub struct PwmLights<W, C, S> {
    warm: W,
    cool: C,
    status: S,
    current: (u8, u8),
    indicator: bool,
}

impl<W, C, S> PwmLights<W, C, S>
where
    W: SetDutyCycle,
    C: SetDutyCycle,
    S: OutputPin,
{
    pub fn new(warm: W, cool: C, status: S) -> Self {
        Self {
            warm,
            cool,
            status,
            current: (0, 0),
            indicator: false,
        }
    }

    /// Last (warm, cool) values written.
    pub fn current(&self) -> (u8, u8) {
        self.current
    }

    pub fn indicator(&self) -> bool {
        self.indicator
    }

    /// Hand the peripherals back.
    pub fn release(self) -> (W, C, S) {
        (self.warm, self.cool, self.status)
    }
}

impl<W, C, S> LightPort for PwmLights<W, C, S>
where
    W: SetDutyCycle,
    C: SetDutyCycle,
    S: OutputPin,
{
    fn set_status_indicator(&mut self, lit: bool) {
        let res = if lit {
            self.status.set_high()
        } else {
            self.status.set_low()
        };
        if let Err(e) = res {
            warn!("status LED write failed: {:?}", e);
        }
        self.indicator = lit;
    }

    fn set_lights(&mut self, warm: u8, cool: u8) {
        if let Err(e) = self.warm.set_duty_cycle_fraction(u16::from(warm), 255) {
            warn!("warm PWM write failed: {:?}", e);
        }
        if let Err(e) = self.cool.set_duty_cycle_fraction(u16::from(cool), 255) {
            warn!("cool PWM write failed: {:?}", e);
        }
        self.current = (warm, cool);
    }
}
