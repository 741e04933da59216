use log::debug;

use crate::effect::Effect;
use crate::errors::MachineError;
use crate::hardware::{SharedState, MEMORY_SIZE};
use crate::interfaces::Clocked;

/// The machine's 256-byte memory unit.
///
/// Ram owns its array outright, so a write transaction mutates it directly
/// when clocked; only the data line answer travels back through an effect.
/// Because the address line is a single byte, every address is in range.
pub struct Ram {
    memory: [u8; MEMORY_SIZE],
    primed: bool,
}

impl Ram {
    pub fn new() -> Self {
        Self {
            memory: [0; MEMORY_SIZE],
            primed: false,
        }
    }

    /// Replace the whole memory image, e.g. when loading a program.
    pub fn load(&mut self, image: &[u8; MEMORY_SIZE]) {
        self.memory = *image;
        self.primed = false;
    }

    pub fn read(&self, address: u8) -> u8 {
        self.memory[address as usize]
    }
}

impl Default for Ram {
    fn default() -> Self {
        Self::new()
    }
}

impl Clocked for Ram {
    /// Service one bus transaction: store the data line if write-enable is
    /// asserted, then answer with the byte at the address line. The answer
    /// reflects the store, so a write-then-read of the same address within
    /// one cycle observes the just-written value.
    fn clock(&mut self, state: &SharedState) -> Result<Effect, MachineError> {
        if !self.primed {
            self.primed = true;
            return Ok(Effect::identity());
        }

        let address = state.bus.address;

        if state.bus.write_enable {
            let data = state.bus.data;
            debug!("Memory store: ${address:0>2X} <- ${data:0>2X}");
            self.memory[address as usize] = data;
        }

        Ok(Effect::bus_data(self.memory[address as usize]))
    }
}
