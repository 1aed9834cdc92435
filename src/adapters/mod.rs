//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to                    |
//! |----------------|--------------------|--------------------------------|
//! | `nvs`          | PersistencePort    | any StoragePort                |
//! |                | StoragePort        | in-memory store                |
//! | `file_storage` | StoragePort        | one file per key on a host     |
//! | `radio`        | RadioPort          | BLE task via bounded channels  |
//! | `time`         | Clock              | std monotonic clock            |
//! | `traced`       | Platform           | wraps another, logs each hook  |
//! | `host`         | Platform           | nvs + lights + radio + timer   |

pub mod file_storage;
pub mod host;
pub mod nvs;
pub mod radio;
pub mod time;
pub mod traced;
