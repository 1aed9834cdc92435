//! End-to-end tests through the host adapters.
//!
//! Raw button samples go through the debouncer, events through the queue,
//! hooks land in the real `NvsPersistence`, `RadioOutbox`, `PwmLights` and
//! `ShutdownTimer`, driven by a manually advanced clock.

use core::cell::Cell;
use core::convert::Infallible;

use embedded_hal::digital::{ErrorType as PinErrorType, OutputPin};
use embedded_hal::pwm::{ErrorType as PwmErrorType, SetDutyCycle};

use novaflash::adapters::file_storage::FileStorage;
use novaflash::adapters::host::HostPlatform;
use novaflash::adapters::nvs::MemoryStorage;
use novaflash::app::ports::{Clock, StoragePort};
use novaflash::app::service::{FlashService, HID_KEY_RELEASE, HID_KEY_VOLUME_UP};
use novaflash::config::FlashSettings;
use novaflash::drivers::button::ButtonDebouncer;
use novaflash::drivers::lights::PwmLights;
use novaflash::events::{Event, EventQueue};
use novaflash::protocol::Command;

// ── Fakes ─────────────────────────────────────────────────────

struct ManualClock(Cell<u64>);

impl ManualClock {
    fn new() -> Self {
        Self(Cell::new(0))
    }

    fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

struct Pwm(u16);

impl PwmErrorType for Pwm {
    type Error = Infallible;
}

impl SetDutyCycle for Pwm {
    fn max_duty_cycle(&self) -> u16 {
        255
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.0 = duty;
        Ok(())
    }
}

struct Led(bool);

impl PinErrorType for Led {
    type Error = Infallible;
}

impl OutputPin for Led {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0 = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0 = true;
        Ok(())
    }
}

type Lights = PwmLights<Pwm, Pwm, Led>;

fn lights() -> Lights {
    PwmLights::new(Pwm(0), Pwm(0), Led(false))
}

/// Device loop pieces for one test.
struct Rig<'c, S: StoragePort> {
    svc: FlashService,
    hw: HostPlatform<S, Lights, &'c ManualClock>,
    queue: EventQueue,
    button: ButtonDebouncer,
    clock: &'c ManualClock,
}

impl<'c, S: StoragePort> Rig<'c, S> {
    fn boot(storage: S, clock: &'c ManualClock) -> Self {
        let mut rig = Self {
            svc: FlashService::new(),
            hw: HostPlatform::new(storage, lights(), clock),
            queue: EventQueue::new(),
            button: ButtonDebouncer::new(),
            clock,
        };
        rig.push(Event::Reset);
        rig
    }

    fn push(&mut self, event: Event) {
        self.enqueue(event);
        self.tick();
    }

    /// Queue an event without running the loop.
    fn enqueue(&mut self, event: Event) {
        assert!(self.queue.push(event));
    }

    /// One main-loop pass: pending events first, then the timer.
    fn tick(&mut self) {
        self.svc.run_pending(&mut self.queue, &mut self.hw);
        self.hw.poll_timer(&mut self.queue);
        self.svc.run_pending(&mut self.queue, &mut self.hw);
    }

    /// Hold the raw button level for `ms`, sampling every millisecond.
    fn hold(&mut self, pressed: bool, ms: u64) {
        for _ in 0..ms {
            self.button
                .sample_into(pressed, self.clock.now_ms(), &mut self.queue);
            self.tick();
            self.clock.advance(1);
        }
    }

    fn drain_commands(&self) -> Vec<Command> {
        std::iter::from_fn(|| self.hw.radio().next_command()).collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────

#[test]
fn app_trigger_ack_roundtrip() {
    let clock = ManualClock::new();
    let mut rig = Rig::boot(MemoryStorage::new(), &clock);
    rig.push(Event::AppConnect);
    assert!(rig.hw.lights().indicator());

    rig.hold(true, 20);
    assert_eq!(rig.hw.lights().current(), (63, 63));
    assert!(!rig.hw.lights().indicator());

    rig.hold(false, 20);
    assert_eq!(rig.hw.lights().current(), (127, 127));

    let sent = rig.drain_commands();
    assert_eq!(sent, vec![Command::trigger(1, true), Command::trigger(2, false)]);

    rig.push(Event::AppCommandReceived(Command::ack(2)));
    assert_eq!(rig.hw.lights().current(), (0, 0));
    assert!(!rig.hw.timer().is_armed());
    assert!(rig.hw.lights().indicator());
}

#[test]
fn bounce_shorter_than_debounce_is_ignored() {
    let clock = ManualClock::new();
    let mut rig = Rig::boot(MemoryStorage::new(), &clock);
    rig.hold(true, 5);
    rig.hold(false, 20);
    assert!(!rig.svc.is_lit());
    assert_eq!(rig.svc.counters().flash_button_disconnected, 0);
}

#[test]
fn unacked_trigger_times_out() {
    let clock = ManualClock::new();
    let mut rig = Rig::boot(MemoryStorage::new(), &clock);
    rig.push(Event::AppConnect);
    rig.hold(true, 20);
    rig.hold(false, 20);
    assert!(rig.svc.pending_trigger_ack().is_some());
    assert_eq!(rig.hw.timer().remaining_ms(), Some(5000 - 10));

    clock.advance(4000);
    rig.tick();
    assert!(rig.svc.is_lit());

    clock.advance(1000);
    rig.tick();
    assert!(!rig.svc.is_lit());
    assert_eq!(rig.svc.pending_trigger_ack(), None);
    assert_eq!(rig.hw.lights().current(), (0, 0));
}

#[test]
fn hid_path_queues_key_press_and_release() {
    let clock = ManualClock::new();
    let mut rig = Rig::boot(MemoryStorage::new(), &clock);
    rig.push(Event::HidConnect);
    rig.hold(true, 20);
    rig.hold(false, 20);

    assert_eq!(rig.hw.radio().next_hid_key(), Some(HID_KEY_VOLUME_UP));
    assert_eq!(rig.hw.radio().next_hid_key(), Some(HID_KEY_RELEASE));
    assert_eq!(rig.hw.radio().next_hid_key(), None);
    assert!(rig.drain_commands().is_empty());
}

#[test]
fn remote_flash_is_bounded_by_its_timeout() {
    let clock = ManualClock::new();
    let mut rig = Rig::boot(MemoryStorage::new(), &clock);
    rig.push(Event::AppConnect);
    rig.push(Event::AppCommandReceived(Command::flash(
        9,
        FlashSettings::new(300, 200, 100),
    )));
    assert_eq!(rig.drain_commands(), vec![Command::ack(9)]);
    assert_eq!(rig.hw.lights().current(), (200, 100));

    clock.advance(300);
    rig.tick();
    assert_eq!(rig.hw.lights().current(), (0, 0));
}

#[test]
fn expiry_queued_behind_a_new_flash_is_ignored() {
    let clock = ManualClock::new();
    let mut rig = Rig::boot(MemoryStorage::new(), &clock);
    rig.push(Event::AppConnect);
    rig.push(Event::AppCommandReceived(Command::flash(
        9,
        FlashSettings::new(300, 200, 100),
    )));
    clock.advance(300);

    // The new flash arrived before the loop noticed the old deadline.
    rig.enqueue(Event::AppCommandReceived(Command::flash(
        10,
        FlashSettings::new(5000, 255, 255),
    )));
    rig.hw.poll_timer(&mut rig.queue);
    assert_eq!(rig.queue.len(), 2);
    rig.tick();

    assert!(rig.svc.is_lit());
    assert_eq!(rig.hw.lights().current(), (255, 255));
    assert_eq!(rig.hw.timer().remaining_ms(), Some(5000));

    clock.advance(5000);
    rig.tick();
    assert!(!rig.svc.is_lit());
}

#[test]
fn expiry_queued_behind_release_keeps_the_pending_ack() {
    let clock = ManualClock::new();
    let mut rig = Rig::boot(MemoryStorage::new(), &clock);
    rig.push(Event::AppConnect);
    rig.push(Event::ButtonPressDown);
    clock.advance(10_000);

    rig.enqueue(Event::ButtonRelease);
    rig.hw.poll_timer(&mut rig.queue);
    rig.tick();

    assert_eq!(rig.svc.pending_trigger_ack(), Some(2));
    assert!(rig.svc.is_lit());
    assert_eq!(rig.hw.lights().current(), (127, 127));

    rig.push(Event::AppCommandReceived(Command::ack(2)));
    assert!(!rig.svc.is_lit());
    assert_eq!(rig.svc.pending_trigger_ack(), None);
}

#[test]
fn expiry_queued_behind_off_is_ignored() {
    let clock = ManualClock::new();
    let mut rig = Rig::boot(MemoryStorage::new(), &clock);
    rig.push(Event::AppConnect);
    rig.hold(true, 20);
    rig.hold(false, 20);
    clock.advance(5000);

    rig.enqueue(Event::AppCommandReceived(Command::off(30)));
    rig.hw.poll_timer(&mut rig.queue);
    rig.tick();

    assert!(!rig.svc.is_lit());
    // Off leaves the pending ack alone; the stale expiry must too.
    assert_eq!(rig.svc.pending_trigger_ack(), Some(2));
}

#[test]
fn counters_persist_across_power_cycles() {
    let clock = ManualClock::new();
    let mut rig = Rig::boot(MemoryStorage::new(), &clock);
    rig.push(Event::AppConnect);
    rig.hold(true, 20);
    rig.hold(false, 20);
    let storage = rig.hw.into_storage();

    let rig = Rig::boot(storage, &clock);
    let counters = rig.svc.counters();
    assert_eq!(counters.boot, 2);
    assert_eq!(counters.app_connect, 1);
    assert_eq!(counters.flash_button_app, 1);
    assert!(!rig.svc.is_app_connected());
}

#[test]
fn file_storage_keeps_counters_and_defaults_on_disk() {
    let dir = std::env::temp_dir().join(format!("novaflash-host-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let clock = ManualClock::new();

    let mut rig = Rig::boot(FileStorage::open(&dir).unwrap(), &clock);
    let defaults = rig
        .svc
        .flash_defaults()
        .with_regular(FlashSettings::new(1200, 255, 255));
    rig.svc.update_flash_defaults(defaults, &mut rig.hw);
    drop(rig);

    let rig = Rig::boot(FileStorage::open(&dir).unwrap(), &clock);
    assert_eq!(rig.svc.counters().boot, 2);
    assert_eq!(rig.svc.flash_defaults().regular, FlashSettings::new(1200, 255, 255));

    let _ = std::fs::remove_dir_all(&dir);
}
