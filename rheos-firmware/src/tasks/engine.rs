//! Engine task
//!
//! Owns the block program and the event engine. Runs one engine tick per
//! time-base signal, applies host parameter commands between ticks, and
//! latches the first engine fault: a faulted program stops switching
//! outputs until reset, but parameters stay reachable for diagnosis.

use defmt::*;

use rheos_core::config::ParamUpdate;
use rheos_core::engine::Engine;
use rheos_core::graph;
use rheos_core::Program;
use rheos_link::{HostMessage, TargetMessage};

use crate::channels::{HELLO_REQUESTED, HOST_CHANNEL, TARGET_CHANNEL};
use crate::program::Blink;
use crate::tasks::tick::TICK_SIGNAL;

/// Propagation queue depth
const EVENT_QUEUE_DEPTH: usize = 16;

/// Ticks between stats reports (1 s at the 1 kHz time base)
const STATS_INTERVAL_TICKS: u32 = 1000;

/// Engine task - drives the block program
#[embassy_executor::task]
pub async fn engine_task(mut program: Blink) {
    info!("Engine task started");

    if let Err(e) = graph::validate(&mut program) {
        error!("Program graph invalid: {:?}", e);
        return;
    }

    let mut engine: Engine<EVENT_QUEUE_DEPTH> = Engine::new();
    let mut faulted = false;

    loop {
        TICK_SIGNAL.wait().await;

        while let Ok(msg) = HOST_CHANNEL.try_receive() {
            handle_host_message(&mut program, msg);
        }

        if faulted {
            continue;
        }

        if let Err(e) = engine.tick(&mut program) {
            error!("Engine fault: {:?}", e);
            engine.clear();
            faulted = true;
            continue;
        }

        let stats = engine.stats();
        if stats.ticks % STATS_INTERVAL_TICKS == 0 {
            // Stats are best-effort; drop them if the link is backed up
            let _ = TARGET_CHANNEL.try_send(TargetMessage::Stats(stats));
        }
    }
}

/// Apply one host command to the program
fn handle_host_message(program: &mut Blink, msg: HostMessage) {
    match msg {
        HostMessage::Ping => {
            HELLO_REQUESTED.signal(());
        }
        HostMessage::SetParam(update) => {
            let applied = program
                .block_mut(update.block)
                .map(|b| b.set_param(update.index, update.value))
                .unwrap_or(false);
            if applied {
                info!("Param set: block {} index {}", update.block, update.index);
            } else {
                warn!(
                    "Param rejected: block {} index {}",
                    update.block, update.index
                );
            }
        }
        HostMessage::GetParam(request) => {
            let value = program
                .block_mut(request.block)
                .and_then(|b| b.param(request.index));
            match value {
                Some(value) => {
                    let _ = TARGET_CHANNEL.try_send(TargetMessage::ParamValue(ParamUpdate {
                        block: request.block,
                        index: request.index,
                        value,
                    }));
                }
                None => warn!(
                    "Param read rejected: block {} index {}",
                    request.block, request.index
                ),
            }
        }
    }
}
