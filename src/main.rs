use anyhow::Context;

use clocked_emulator::settings::MachineSettings;
use clocked_emulator::{Machine, Program};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut machine = Machine::new(MachineSettings::default());
    machine.load_program(&Program::counter());

    let summary = machine.run().context("machine run aborted")?;

    println!(
        "{} cycles in {:.3} ms ({} cycles/s)",
        summary.cycles,
        summary.recorded_time.as_secs_f64() * 1000.0,
        summary.cycles_per_second,
    );

    Ok(())
}
