//! Rheos - reference firmware for RP2040 boards
//!
//! Runs the statically-wired blink program through the dataflow engine:
//! a 1 kHz time base drives the block graph, and the monitor link on
//! UART0 exposes live tracing and parameter tuning to a host tool.
//!
//! Named after the Greek "rheos" meaning "flow" - the dataflow through
//! the block graph and the signals it switches.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use crate::program::Blink;

mod channels;
mod program;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Rheos firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Onboard LED drives the end of the blink chain
    let led = Output::new(p.PIN_25, Level::Low);
    let program = Blink::new(led);

    // Monitor link on UART0 (GPIO0 = TX, GPIO1 = RX)
    let uart_config = UartConfig::default(); // 115200 baud default
    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 64]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("Monitor link initialized");

    spawner.spawn(tasks::tick_task()).unwrap();
    spawner.spawn(tasks::engine_task(program)).unwrap();
    spawner.spawn(tasks::monitor_rx_task(rx)).unwrap();
    spawner
        .spawn(tasks::monitor_tx_task(tx, Blink::manifest()))
        .unwrap();

    info!("All tasks spawned, firmware running");
}
