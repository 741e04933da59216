#[cfg(test)]
mod tests;

use std::io::Write;

use log::{debug, error};

use crate::effect::Effect;
use crate::errors::MachineError;
use crate::hardware::SharedState;
use crate::interfaces::Clocked;
use crate::types::SharedSink;

use super::opcode::Opcode;

/// The machine's processor.
///
/// The CPU is a fetch/decode/execute state machine advanced one cycle per
/// clock. Every instruction starts with the same three fetch cycles: the
/// program counter goes onto the address line, then the operand address
/// while the first read completes, then the opcode byte comes back off the
/// data line and is decoded. Execution continues into the opcode's own
/// micro-program, one yielded effect per cycle. A fetched byte outside the
/// instruction set aborts the run instead of being executed.
pub struct Cpu {
    state: CpuState,
    print_sink: Option<SharedSink>,
}

/// Where the CPU is inside its instruction sequence. The variants carry the
/// instruction's base address so later cycles can derive the fall-through
/// program counter without touching the register file early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CpuState {
    /// First clock after construction; consumed before any bus decision
    Priming,
    /// Drive write-enable low and the program counter onto the address line
    FetchOpcode,
    /// Drive the operand address while the opcode read completes
    FetchOperand { base: u8 },
    /// The opcode byte is on the data line; decode it and absorb the
    /// operand read latency
    Decode { base: u8 },
    /// Run one cycle of the decoded opcode's micro-program
    Execute {
        base: u8,
        opcode: Opcode,
        step: ExecStep,
    },
    /// Store the advanced program counter
    AdvancePc { base: u8 },
}

/// Progress inside the three-cycle memory-operand micro-program shared by
/// LDA, ADD and EQ. Single-cycle opcodes only ever see `DriveAddress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExecStep {
    /// Put the operand address on the bus
    DriveAddress,
    /// Absorb the memory read latency
    AwaitData,
    /// Consume the data line into the accumulator
    Commit,
}

impl Cpu {
    /// `print_sink` is where PRINT emits its diagnostic line; `None`
    /// silences the channel entirely.
    pub fn new(print_sink: Option<SharedSink>) -> Self {
        Self {
            state: CpuState::Priming,
            print_sink,
        }
    }

    /// Restart the fetch sequence from whatever the register file says,
    /// with a fresh priming cycle.
    pub fn reset(&mut self) {
        self.state = CpuState::Priming;
    }

    pub fn set_print_sink(&mut self, print_sink: Option<SharedSink>) {
        self.print_sink = print_sink;
    }

    fn execute(
        &self,
        base: u8,
        opcode: Opcode,
        step: ExecStep,
        state: &SharedState,
    ) -> (CpuState, Effect) {
        match opcode {
            Opcode::Lda | Opcode::Add | Opcode::Eq => match step {
                ExecStep::DriveAddress => {
                    // the operand byte is on the data line right now
                    let operand = state.bus.data;
                    (
                        CpuState::Execute {
                            base,
                            opcode,
                            step: ExecStep::AwaitData,
                        },
                        Effect::bus_address(operand),
                    )
                }
                ExecStep::AwaitData => (
                    CpuState::Execute {
                        base,
                        opcode,
                        step: ExecStep::Commit,
                    },
                    Effect::identity(),
                ),
                ExecStep::Commit => {
                    let data = state.bus.data;
                    let a = state.registers.a;
                    let result = match opcode {
                        Opcode::Lda => data,
                        Opcode::Add => a.wrapping_add(data),
                        Opcode::Eq => u8::from(a == data),
                        _ => unreachable!(),
                    };
                    finish(base, opcode, Effect::reg_a(result))
                }
            },

            // One-cycle write transaction; write-enable stays asserted until
            // the next fetch clears it, and memory's repeated store of the
            // same byte is idempotent
            Opcode::Sta => {
                let operand = state.bus.data;
                let effect = Effect::bus_write_enable(true)
                    .merge(Effect::bus_address(operand))
                    .merge(Effect::bus_data(state.registers.a));
                finish(base, opcode, effect)
            }

            Opcode::Print => {
                self.print(state.registers.a);
                finish(base, opcode, Effect::identity())
            }

            // Raises the latch and parks PC past the instruction in the same
            // cycle; the driver stops before an advance cycle could run
            Opcode::Halt => finish(
                base,
                opcode,
                Effect::halt().merge(Effect::reg_pc(base.wrapping_add(2))),
            ),

            Opcode::Jmp => {
                let target = state.bus.data;
                finish(base, opcode, Effect::reg_pc(target))
            }

            Opcode::Jz => {
                let target = state.bus.data;
                let pc = if state.registers.a == 0 {
                    target
                } else {
                    base.wrapping_add(2)
                };
                finish(base, opcode, Effect::reg_pc(pc))
            }
        }
    }

    fn print(&self, value: u8) {
        let Some(sink) = &self.print_sink else {
            return;
        };
        if let Err(err) = writeln!(sink.borrow_mut(), "PRINT: {value}") {
            error!("Diagnostic sink write failed: {err}");
        }
    }
}

/// Close out an instruction's last execute cycle: opcodes that wrote the
/// program counter themselves go straight back to fetching, everything else
/// gets the standard advance cycle.
fn finish(base: u8, opcode: Opcode, effect: Effect) -> (CpuState, Effect) {
    if opcode.advances_pc() {
        (CpuState::AdvancePc { base }, effect)
    } else {
        (CpuState::FetchOpcode, effect)
    }
}

impl Clocked for Cpu {
    fn clock(&mut self, state: &SharedState) -> Result<Effect, MachineError> {
        let (next, effect) = match self.state {
            CpuState::Priming => (CpuState::FetchOpcode, Effect::identity()),

            CpuState::FetchOpcode => {
                let base = state.registers.pc;
                (
                    CpuState::FetchOperand { base },
                    Effect::bus_write_enable(false).merge(Effect::bus_address(base)),
                )
            }

            CpuState::FetchOperand { base } => (
                CpuState::Decode { base },
                Effect::bus_address(base.wrapping_add(1)),
            ),

            CpuState::Decode { base } => {
                let opcode = Opcode::decode(base, state.bus.data)?;
                debug!("${base:0>2X}: {opcode}");
                (
                    CpuState::Execute {
                        base,
                        opcode,
                        step: ExecStep::DriveAddress,
                    },
                    Effect::identity(),
                )
            }

            CpuState::Execute { base, opcode, step } => self.execute(base, opcode, step, state),

            CpuState::AdvancePc { base } => (
                CpuState::FetchOpcode,
                Effect::reg_pc(base.wrapping_add(2)),
            ),
        };

        self.state = next;
        Ok(effect)
    }
}
