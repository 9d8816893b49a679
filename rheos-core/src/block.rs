//! The block trait and its firing rule
//!
//! A block recalculates when every input has received a value since its
//! last evaluation. Delivery and recalculation both report which output
//! ports changed, and the engine turns those reports into further
//! deliveries.

use heapless::Vec;

use crate::port::{InputPort, OutputPort, Value};

/// Maximum ports per side of a block
pub const MAX_PORTS: usize = 8;

/// Output-port indices whose value changed during an evaluation
pub type Fired = Vec<u8, MAX_PORTS>;

/// Borrowed views of one side's ports
pub type PortRefs<'a, T> = Vec<&'a mut T, MAX_PORTS>;

/// Build a [`PortRefs`] list from block fields
///
/// ```ignore
/// fn inputs(&mut self) -> PortRefs<'_, InputPort> {
///     ports![&mut self.setpoint, &mut self.measurement]
/// }
/// ```
#[macro_export]
macro_rules! ports {
    ($($port:expr),* $(,)?) => {{
        let mut refs = $crate::block::PortRefs::new();
        $( let _ = refs.push($port); )*
        refs
    }};
}

/// A dataflow block: typed ports plus a recalculation
///
/// Implementations provide the port lists and [`evaluate`](Block::evaluate);
/// the firing rule in [`accept`](Block::accept) is shared. Blocks with
/// tunable parameters additionally override [`set_param`](Block::set_param)
/// and [`param`](Block::param) so a host tool can adjust them live.
pub trait Block {
    /// Borrow all input ports, in port-index order
    fn inputs(&mut self) -> PortRefs<'_, InputPort>;

    /// Borrow all output ports, in port-index order
    fn outputs(&mut self) -> PortRefs<'_, OutputPort>;

    /// Recalculate from the current input values
    ///
    /// Must write every output it reports as fired.
    fn evaluate(&mut self) -> Fired;

    /// Deliver a value to one input port
    ///
    /// Stores the value, and if every input is now set, clears all input
    /// latches and evaluates. Out-of-range ports deliver nothing (graph
    /// validation rejects them before the first tick).
    fn accept(&mut self, port: u8, value: Value) -> Fired {
        let mut inputs = self.inputs();
        match inputs.get_mut(port as usize) {
            Some(p) => p.set(value),
            None => return Fired::new(),
        }
        let ready = inputs.iter().all(|p| p.is_set);
        if !ready {
            return Fired::new();
        }
        for p in inputs.iter_mut() {
            p.clear();
        }
        drop(inputs);
        self.evaluate()
    }

    /// Update a tunable parameter; returns false if the index is unknown
    /// or the value kind does not fit
    fn set_param(&mut self, _index: u8, _value: Value) -> bool {
        false
    }

    /// Read a tunable parameter
    fn param(&self, _index: u8) -> Option<Value> {
        None
    }
}
