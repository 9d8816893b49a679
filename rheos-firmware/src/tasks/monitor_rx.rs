//! Monitor link receive task
//!
//! Receives frames from the host tool and dispatches commands.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use rheos_link::{FrameParser, HostMessage};

use crate::channels::HOST_CHANNEL;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 32;

/// Monitor RX task - receives and parses frames from the host
#[embassy_executor::task]
pub async fn monitor_rx_task(mut rx: BufferedUartRx<'static>) {
    info!("Monitor RX task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                for &byte in &buf[..n] {
                    match parser.advance(byte) {
                        Ok(Some(frame)) => match HostMessage::from_frame(&frame) {
                            Ok(msg) => {
                                if HOST_CHANNEL.try_send(msg).is_err() {
                                    warn!("Host command dropped, channel full");
                                }
                            }
                            Err(e) => warn!("Bad host frame: {:?}", e),
                        },
                        Ok(None) => {
                            // Need more bytes
                        }
                        Err(e) => warn!("Frame parse error: {:?}", e),
                    }
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}
