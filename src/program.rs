//! Program images
//!
//! A [`Program`] is a full snapshot of the machine's 256-byte memory, code
//! and data interleaved, assembled in source code. There is no binary file
//! format; images are embedded the way the machine's programs always were.

use crate::errors::MachineError;
use crate::hardware::MEMORY_SIZE;

/// A complete memory image to start the machine from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Program {
    image: [u8; MEMORY_SIZE],
}

/// Assemble a byte stream of opcodes, operands and data into a [`Program`].
///
/// Entries may be [`Opcode`](crate::processor::opcode::Opcode) values or
/// plain byte literals.
#[macro_export]
macro_rules! program {
    ( $( $byte:expr ),+ $(,)? ) => {
        $crate::program::Program::from_bytes(&[
            $(
                $byte as u8,
            )+
        ])
    };
}

impl Program {
    /// Build an image from `bytes`, zero-filling the rest of memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MachineError> {
        if bytes.len() > MEMORY_SIZE {
            return Err(MachineError::ProgramTooLarge {
                size: bytes.len(),
                memory_size: MEMORY_SIZE,
            });
        }

        let mut image = [0; MEMORY_SIZE];
        image[..bytes.len()].copy_from_slice(bytes);
        Ok(Self { image })
    }

    pub fn image(&self) -> &[u8; MEMORY_SIZE] {
        &self.image
    }

    /// The demo the machine ships with: count from 0, printing every value.
    ///
    /// The loop keeps incrementing the counter cell until the wrapping add
    /// comes back around to 0, so it prints 1 through 255 and then 0
    /// (one PRINT per value of the counter) before halting.
    pub fn counter() -> Self {
        use crate::processor::opcode::Opcode::*;

        let program = program![
            Lda, 14,  //       load the counter
            Add, 15,  //       increment
            Print, 0, //       print it
            Sta, 14,  //       store it back
            Eq, 16,   //       wrapped around to 0 yet?
            Jz, 0,    //       no: loop
            Halt, 0,  //
            0,        // #14: counter
            1,        // #15: increment step
            0,        // #16: stop value
        ];

        program.expect("counter image fits in memory")
    }
}
