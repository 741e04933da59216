//! Machine errors
//!
//! All errors the emulated machine can produce

use thiserror::Error;

/// Machine error type
///
/// All emulator errors are encapsuled inside this error type
#[derive(Debug, Error)]
pub enum MachineError {
    #[error("Illegal opcode ${opcode:0>2X} fetched from address ${address:0>2X}")]
    IllegalOpcode { address: u8, opcode: u8 },

    #[error("Program image is {size} bytes but memory holds only {memory_size} bytes")]
    ProgramTooLarge { size: usize, memory_size: usize },
}
