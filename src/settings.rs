/// Machine configuration options
pub struct MachineSettings {
    /// Safety cutoff on total ticks, independent of program logic. `None`
    /// lets a program without a reachable HALT run forever.
    pub cycle_budget: Option<u64>,

    /// Whether PRINT writes its diagnostic line to stdout. Tests swap the
    /// sink itself through [`crate::machine::Machine::set_print_sink`].
    pub print_output: bool,
}

pub const DEFAULT_CYCLE_BUDGET: u64 = 1_000_000;

impl Default for MachineSettings {
    fn default() -> Self {
        Self {
            cycle_budget: Some(DEFAULT_CYCLE_BUDGET),
            print_output: true,
        }
    }
}
