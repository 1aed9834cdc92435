//! Nova flash control core.
//!
//! Platform-independent event handlers for the Nova Bluetooth flash: the
//! button, the companion-app command protocol, the HID camera shortcut,
//! the shutdown timer and the persisted usage counters.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  NvsPersistence   RadioOutbox   PwmLights   ShutdownTimer      │
//! │  (Persistence)    (Radio)       (Light)     (Timer)            │
//! │  FileStorage / MemoryStorage    TracedPlatform  HostPlatform   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            FlashService (pure logic)                   │    │
//! │  │  DeviceState · Counters · Command protocol             │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  EventQueue (serialized, run-to-completion) · ButtonDebouncer  │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The library installs no logger; the embedding binary picks the backend.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod counters;
pub mod error;
pub mod events;
pub mod protocol;

pub mod adapters;
pub mod drivers;
