use std::fmt;

use num_enum::IntoPrimitive;
use num_enum::TryFromPrimitive;

use crate::errors::MachineError;

/// The machine's fixed instruction set.
///
/// Every instruction is two bytes in memory: the opcode byte followed by a
/// one-byte operand (ignored by the operand-less instructions). Decoding is
/// checked; there is no table to index out of range.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
pub enum Opcode {
    /// Load the byte at the operand address into the accumulator
    Lda = 0,
    /// Store the accumulator at the operand address
    Sta = 1,
    /// Add the byte at the operand address to the accumulator, wrapping
    Add = 2,
    /// Emit the accumulator on the diagnostic channel
    Print = 3,
    /// Raise the halt latch
    Halt = 4,
    /// Set the accumulator to 1 if it equals the byte at the operand
    /// address, 0 otherwise
    Eq = 5,
    /// Jump to the operand address
    Jmp = 6,
    /// Jump to the operand address if the accumulator is 0, fall through
    /// otherwise
    Jz = 7,
}

impl Opcode {
    /// Decode a fetched opcode byte. `address` is where the byte was
    /// fetched from, kept for the error report.
    pub fn decode(address: u8, byte: u8) -> Result<Self, MachineError> {
        Self::try_from(byte).map_err(|_| MachineError::IllegalOpcode {
            address,
            opcode: byte,
        })
    }

    /// Whether the CPU appends the standard `PC := PC + 2` cycle after this
    /// instruction. JMP and JZ write the program counter themselves, and
    /// HALT parks it while raising the latch.
    pub fn advances_pc(&self) -> bool {
        !matches!(self, Opcode::Halt | Opcode::Jmp | Opcode::Jz)
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Lda => "LDA",
            Opcode::Sta => "STA",
            Opcode::Add => "ADD",
            Opcode::Print => "PRINT",
            Opcode::Halt => "HALT",
            Opcode::Eq => "EQ",
            Opcode::Jmp => "JMP",
            Opcode::Jz => "JZ",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
