//! Machine hardware substrate
//!
//! The storage every component reads from and writes to: the three shared
//! bus lines and the two-register file, plus the halt latch. None of it is
//! owned by a single component; it is only ever mutated by applying a merged
//! [`Effect`] at a tick boundary.

use log::debug;

use crate::effect::Effect;

// Memory - flat byte-addressed RAM, spanning the full range of the 8-bit
// address line so no access can fall outside it
pub const MEMORY_SIZE: usize = 256;

/// The three shared wires connecting the CPU and the memory.
///
/// Only one component usefully drives each line per cycle, but nothing stops
/// two effects from targeting different lines on the same tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bus {
    pub address: u8,
    pub data: u8,
    pub write_enable: bool,
}

/// The CPU-visible register file: accumulator and program counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterFile {
    pub a: u8,
    pub pc: u8,
}

/// All state shared between components, zeroed at machine construction.
///
/// Components receive `&SharedState` when clocked, so within a cycle they
/// can only observe the values applied at the end of the previous tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SharedState {
    pub bus: Bus,
    pub registers: RegisterFile,
    pub halted: bool,
}

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write exactly the locations the effect marks, leaving the rest
    /// untouched. The halt latch is one-way: applying an effect never
    /// clears it.
    pub fn apply(&mut self, effect: &Effect) {
        if let Some(address) = effect.bus_address {
            debug!("Bus address line <- ${address:0>2X}");
            self.bus.address = address;
        }
        if let Some(data) = effect.bus_data {
            debug!("Bus data line <- ${data:0>2X}");
            self.bus.data = data;
        }
        if let Some(write_enable) = effect.bus_write_enable {
            debug!("Bus write-enable line <- {write_enable}");
            self.bus.write_enable = write_enable;
        }
        if let Some(a) = effect.reg_a {
            debug!("Register A <- ${a:0>2X}");
            self.registers.a = a;
        }
        if let Some(pc) = effect.reg_pc {
            debug!("Register PC <- ${pc:0>2X}");
            self.registers.pc = pc;
        }
        if effect.halt {
            debug!("Halt latch raised");
            self.halted = true;
        }
    }
}
