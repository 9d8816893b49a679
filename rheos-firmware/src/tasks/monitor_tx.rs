//! Monitor link transmit task
//!
//! Sends engine stats, parameter readbacks and HELLO answers to the
//! host tool.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embassy_time::{Duration, Ticker};
use embedded_io_async::Write;

use rheos_core::config::Manifest;
use rheos_link::frame::MAX_FRAME_LEN;
use rheos_link::TargetMessage;

use crate::channels::{HELLO_REQUESTED, TARGET_CHANNEL};

/// Monitor TX task - sends frames to the host
#[embassy_executor::task]
pub async fn monitor_tx_task(mut tx: BufferedUartTx<'static>, manifest: Manifest) {
    info!("Monitor TX task started");

    let mut ticker = Ticker::every(Duration::from_millis(20));

    loop {
        // Answer a pending PING first so liveness stays snappy
        if HELLO_REQUESTED.signaled() {
            HELLO_REQUESTED.reset();
            send_message(&mut tx, &TargetMessage::Hello(manifest.clone())).await;
        }

        while let Ok(msg) = TARGET_CHANNEL.try_receive() {
            send_message(&mut tx, &msg).await;
        }

        ticker.next().await;
    }
}

/// Encode and transmit one message
async fn send_message(tx: &mut BufferedUartTx<'static>, msg: &TargetMessage) {
    let Ok(frame) = msg.to_frame() else {
        warn!("Message did not fit a frame");
        return;
    };
    let mut buf = [0u8; MAX_FRAME_LEN];
    match frame.encode(&mut buf) {
        Ok(len) => {
            if let Err(e) = tx.write_all(&buf[..len]).await {
                warn!("UART write error: {:?}", e);
            }
        }
        Err(e) => warn!("Frame encode error: {:?}", e),
    }
}
