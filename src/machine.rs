//! Machine abstraction.
//!
//! This module defines the higher level abstraction that runs the emulated
//! computer. It owns the shared hardware state and the two clocked
//! components, drives them in lock-step with the global clock, and decides
//! when a run is over. To use it, create a `Machine`, load a `Program`
//! image and `run` it to completion.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use log::info;

use crate::effect::Effect;
use crate::errors::MachineError;
use crate::hardware::SharedState;
use crate::interfaces::Clocked;
use crate::metrics;
use crate::processor::cpu::Cpu;
use crate::processor::memory::Ram;
use crate::program::Program;
use crate::settings::MachineSettings;
use crate::types::SharedSink;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The program executed HALT
    Halted,
    /// The cycle budget ran out before the halt latch was raised
    BudgetExhausted,
}

/// What a completed run looked like. Timing figures are informational;
/// the cycle count is exact.
#[derive(Debug)]
pub struct RunSummary {
    pub stop_reason: StopReason,
    pub cycles: u64,
    pub recorded_time: Duration,
    pub cycles_per_second: u64,
}

pub struct Machine {
    state: SharedState,
    cpu: Cpu,
    memory: Ram,
    cycle_budget: Option<u64>,
}

impl Machine {
    pub fn new(settings: MachineSettings) -> Self {
        let print_sink = settings
            .print_output
            .then(|| -> SharedSink { Rc::new(RefCell::new(io::stdout())) });

        Self {
            state: SharedState::new(),
            cpu: Cpu::new(print_sink),
            memory: Ram::new(),
            cycle_budget: settings.cycle_budget,
        }
    }

    /// Load a program image and reset the machine to its power-on state.
    pub fn load_program(&mut self, program: &Program) {
        info!("Program loaded");
        self.memory.load(program.image());
        self.state = SharedState::new();
        self.cpu.reset();
    }

    /// Redirect (or silence) the PRINT diagnostic channel.
    pub fn set_print_sink(&mut self, sink: Option<SharedSink>) {
        self.cpu.set_print_sink(sink);
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn memory(&self) -> &Ram {
        &self.memory
    }

    /// Run until the program halts or the cycle budget is exhausted.
    ///
    /// A decode error aborts the run; there is no recovery, since a broken
    /// instruction stream is a defect of the loaded image.
    pub fn run(&mut self) -> Result<RunSummary, MachineError> {
        info!("Machine running");

        let mut collector = metrics::Collector::new();
        let mut cycles: u64 = 0;

        let stop_reason = loop {
            self.clock()?;
            cycles += 1;
            collector.observe_cycle();

            if self.state.halted {
                break StopReason::Halted;
            }
            if let Some(budget) = self.cycle_budget {
                if cycles >= budget {
                    break StopReason::BudgetExhausted;
                }
            }
        };

        let metrics = collector.collect();
        info!("Machine stopped ({stop_reason:?}) after {cycles} cycles");

        Ok(RunSummary {
            stop_reason,
            cycles,
            recorded_time: metrics.recorded_time,
            cycles_per_second: metrics.cycles_per_second,
        })
    }

    /// Advance the whole machine by one tick: clock every component against
    /// the last tick's state, then apply the merged effect atomically.
    fn clock(&mut self) -> Result<(), MachineError> {
        // Memory is clocked before the CPU, so on overlap the CPU's
        // same-tick writes override memory's answer to a stale address
        let effect = gather_effects(
            &self.state,
            [&mut self.memory as &mut dyn Clocked, &mut self.cpu],
        )?;
        self.state.apply(&effect);
        Ok(())
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new(MachineSettings::default())
    }
}

/// Clock each component once, in order, and merge their effects so that
/// later components win on overlapping writes. The shared state is borrowed
/// immutably for the whole pass; nothing is applied here.
fn gather_effects<'a>(
    state: &SharedState,
    components: impl IntoIterator<Item = &'a mut dyn Clocked>,
) -> Result<Effect, MachineError> {
    let mut merged = Effect::identity();
    for component in components {
        merged = merged.merge(component.clock(state)?);
    }
    Ok(merged)
}
