//! The statically-wired blink program
//!
//! Block graph: TickSource -> Counter -> Toggle -> DigitalOut(LED).
//! The 1 kHz time base divided by `BLINK_PERIOD_TICKS` toggles the LED.

use embassy_rp::gpio::Output;

use rheos_blocks::{Counter, DigitalOut, TickSource, Toggle};
use rheos_core::block::Block;
use rheos_core::config::Manifest;
use rheos_core::graph::{Connection, Program};

/// Ticks per LED toggle (500 ms at the 1 kHz time base)
pub const BLINK_PERIOD_TICKS: u32 = 500;

/// Block index of the divider (its period is the live-tunable blink rate)
pub const DIVIDER_BLOCK: u8 = 1;

/// The wired program
pub struct Blink {
    timebase: TickSource,
    divider: Counter,
    toggle: Toggle,
    led: DigitalOut<Output<'static>>,
    connections: [Connection; 3],
}

impl Blink {
    /// Wire the program around the LED pin
    pub fn new(led: Output<'static>) -> Self {
        Self {
            timebase: TickSource::new(),
            divider: Counter::new(BLINK_PERIOD_TICKS),
            toggle: Toggle::new(),
            led: DigitalOut::new(led),
            connections: [
                Connection::link(0, 0, 1, 0),
                Connection::link(1, 0, 2, 0),
                Connection::link(2, 0, 3, 0),
            ],
        }
    }

    /// Identity reported over the monitor link
    pub fn manifest() -> Manifest {
        Manifest::new("blink", 1, 4, 3)
    }
}

impl Program for Blink {
    fn block_mut(&mut self, id: u8) -> Option<&mut dyn Block> {
        match id {
            0 => Some(&mut self.timebase),
            1 => Some(&mut self.divider),
            2 => Some(&mut self.toggle),
            3 => Some(&mut self.led),
            _ => None,
        }
    }

    fn block_count(&self) -> u8 {
        4
    }

    fn connections(&self) -> &[Connection] {
        &self.connections
    }

    fn tick_block(&self) -> u8 {
        0
    }
}
