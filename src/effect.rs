//! Pending hardware writes
//!
//! An [`Effect`] is the value a component produces when it is clocked: a
//! description of the bus/register writes it wants applied at the end of the
//! current tick. Effects are inert data until the machine applies them, so a
//! component can never mutate shared state mid-cycle.

/// Pending writes to the shared bus lines and registers for one clock cycle.
///
/// Each storable location carries `Some(value)` when this effect writes it
/// and `None` when it leaves it alone. The halt request is a one-way latch:
/// once raised it survives every merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Effect {
    pub bus_address: Option<u8>,
    pub bus_data: Option<u8>,
    pub bus_write_enable: Option<bool>,
    pub reg_a: Option<u8>,
    pub reg_pc: Option<u8>,
    pub halt: bool,
}

impl Effect {
    /// The neutral effect: writes nothing, requests nothing.
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn bus_address(value: u8) -> Self {
        Self {
            bus_address: Some(value),
            ..Self::default()
        }
    }

    pub fn bus_data(value: u8) -> Self {
        Self {
            bus_data: Some(value),
            ..Self::default()
        }
    }

    pub fn bus_write_enable(value: bool) -> Self {
        Self {
            bus_write_enable: Some(value),
            ..Self::default()
        }
    }

    pub fn reg_a(value: u8) -> Self {
        Self {
            reg_a: Some(value),
            ..Self::default()
        }
    }

    pub fn reg_pc(value: u8) -> Self {
        Self {
            reg_pc: Some(value),
            ..Self::default()
        }
    }

    pub fn halt() -> Self {
        Self {
            halt: true,
            ..Self::default()
        }
    }

    /// Combine two effects into one. Per location, `later` wins when both
    /// write it. Associative, with [`Effect::identity`] as neutral element
    /// on either side.
    pub fn merge(self, later: Effect) -> Effect {
        Effect {
            bus_address: later.bus_address.or(self.bus_address),
            bus_data: later.bus_data.or(self.bus_data),
            bus_write_enable: later.bus_write_enable.or(self.bus_write_enable),
            reg_a: later.reg_a.or(self.reg_a),
            reg_pc: later.reg_pc.or(self.reg_pc),
            halt: self.halt || later.halt,
        }
    }
}
