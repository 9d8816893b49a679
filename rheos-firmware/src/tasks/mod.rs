//! Embassy task modules

pub mod engine;
pub mod monitor_rx;
pub mod monitor_tx;
pub mod tick;

pub use engine::engine_task;
pub use monitor_rx::monitor_rx_task;
pub use monitor_tx::monitor_tx_task;
pub use tick::tick_task;
