//! Inter-task communication channels
//!
//! Static channels between the Embassy tasks, using embassy-sync
//! primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use rheos_link::{HostMessage, TargetMessage};

/// Channel capacity for host commands (parameter reads/writes)
const HOST_CHANNEL_SIZE: usize = 4;

/// Channel capacity for outbound messages (stats, parameter readbacks)
const TARGET_CHANNEL_SIZE: usize = 8;

/// Host commands from the monitor link to the engine task
pub static HOST_CHANNEL: Channel<CriticalSectionRawMutex, HostMessage, HOST_CHANNEL_SIZE> =
    Channel::new();

/// Outbound messages from the engine task to the monitor link
pub static TARGET_CHANNEL: Channel<CriticalSectionRawMutex, TargetMessage, TARGET_CHANNEL_SIZE> =
    Channel::new();

/// Signal that a PING arrived and a HELLO answer is due
pub static HELLO_REQUESTED: Signal<CriticalSectionRawMutex, ()> = Signal::new();
