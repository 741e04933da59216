use crate::effect::Effect;
use crate::errors::MachineError;
use crate::hardware::SharedState;

/// A hardware component driven by the global clock.
pub trait Clocked {
    /// Advance the component by exactly one cycle.
    ///
    /// The returned [`Effect`] must be computed from `state` as it was at
    /// the end of the previous tick; the machine merges the effects of all
    /// components and applies them at the cycle boundary, so a component
    /// never observes another's same-tick writes.
    ///
    /// Component-local progress (partial instructions, latched bytes)
    /// persists across calls, which is what makes multi-cycle behavior
    /// suspendable.
    fn clock(&mut self, state: &SharedState) -> Result<Effect, MachineError>;
}
