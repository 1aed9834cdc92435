//! Fuzz target: arbitrary event sequences through `FlashService`
//!
//! Each input byte selects one event (commands take their id and settings
//! from the following bytes).  After every event the safety rules must
//! hold: lit only with both banks on, timer armed exactly while lit, and
//! never armed twice.
//!
//! cargo fuzz run fuzz_event_sequence

#![no_main]

use libfuzzer_sys::fuzz_target;
use novaflash::app::ports::{LightPort, PersistencePort, RadioPort, TimerPort};
use novaflash::app::service::FlashService;
use novaflash::config::{FlashDefaults, FlashSettings};
use novaflash::counters::Counters;
use novaflash::events::Event;
use novaflash::protocol::{Command, RawPayload};

#[derive(Default)]
struct Hw {
    lights: (u8, u8),
    timer: Option<u16>,
    counters: Counters,
}

impl PersistencePort for Hw {
    fn load_counters(&mut self) -> Counters {
        self.counters
    }
    fn save_counters(&mut self, counters: &Counters) {
        self.counters = *counters;
    }
    fn load_flash_defaults(&mut self) -> FlashDefaults {
        FlashDefaults::default()
    }
    fn save_flash_defaults(&mut self, _: &FlashDefaults) {}
}

impl RadioPort for Hw {
    fn send_app_command(&mut self, _: &Command) {}
    fn send_hid_key(&mut self, _: u8) {}
}

impl LightPort for Hw {
    fn set_status_indicator(&mut self, _: bool) {}
    fn set_lights(&mut self, warm: u8, cool: u8) {
        self.lights = (warm, cool);
    }
}

impl TimerPort for Hw {
    fn schedule_timer(&mut self, timeout_ms: u16) {
        assert!(self.timer.is_none(), "timer armed twice");
        self.timer = Some(timeout_ms);
    }
    fn cancel_timer(&mut self) {
        self.timer = None;
    }
    fn claim_expiry(&mut self) -> bool {
        self.timer.is_some()
    }
}

fuzz_target!(|data: &[u8]| {
    let mut hw = Hw::default();
    let mut svc = FlashService::new();
    svc.on_reset(&mut hw);

    let mut bytes = data.iter().copied();
    while let Some(op) = bytes.next() {
        let mut next = || bytes.next().unwrap_or(0);
        match op % 10 {
            0 => svc.handle_event(Event::Reset, &mut hw),
            1 => svc.handle_event(Event::AppConnect, &mut hw),
            2 => svc.handle_event(Event::AppDisconnect, &mut hw),
            3 => svc.handle_event(Event::HidConnect, &mut hw),
            4 => svc.handle_event(Event::HidDisconnect, &mut hw),
            5 => svc.handle_event(Event::ButtonPressDown, &mut hw),
            6 => svc.handle_event(Event::ButtonRelease, &mut hw),
            7 => svc.handle_event(Event::TimerComplete, &mut hw),
            _ => {
                let tag = next() % 6;
                let id = u16::from(next());
                let payload = match next() % 3 {
                    0 => RawPayload::None,
                    1 => RawPayload::Flash(FlashSettings::new(
                        u16::from(next()) * 40,
                        next(),
                        next(),
                    )),
                    _ => RawPayload::Trigger(next() & 1 == 1),
                };
                svc.on_raw_app_command(tag, id, payload, &mut hw);
            }
        }

        let (warm, cool) = hw.lights;
        assert_eq!(svc.is_lit(), warm > 0 && cool > 0);
        assert_eq!(svc.is_lit(), hw.timer.is_some());
        if matches!(op % 10, 2 | 4) && !svc.is_app_connected() && !svc.is_hid_connected() {
            assert!(!svc.is_lit(), "lit with no controller connected");
        }
    }
});
