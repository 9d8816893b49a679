//! Standard block library for the Rheos runtime
//!
//! Every type here implements [`rheos_core::Block`] and is wired into
//! programs by index. Hardware-facing blocks are generic over
//! `embedded-hal` 1.0 traits (digital, PWM) and `rheos-hal` (ADC), so the
//! same graph runs against mock hardware on the host.

#![no_std]
#![deny(unsafe_code)]

pub mod convert;
pub mod io;
pub mod logic;
pub mod math;
pub mod pid;
pub mod timing;

pub use convert::{Demux2, Mux2, TypeCast};
pub use io::{AnalogIn, DigitalIn, DigitalOut, PwmOut};
pub use logic::{Edge, EdgeDetect, Toggle};
pub use math::{Gain, Integrator, LowPass, Mult2, Offset, Sum2};
pub use pid::{Pid, PidConfig};
pub use timing::{Counter, TickSource};

use rheos_core::Fired;

/// Build a [`Fired`] list from output indices
pub(crate) fn fire(ports: &[u8]) -> Fired {
    let mut fired = Fired::new();
    for p in ports {
        let _ = fired.push(*p);
    }
    fired
}
