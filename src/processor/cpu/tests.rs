use std::cell::RefCell;
use std::rc::Rc;

use super::*;

// Clock the CPU once and apply its effect, standing in for the machine.
fn step(cpu: &mut Cpu, state: &mut SharedState) -> Effect {
    let effect = cpu.clock(state).expect("unexpected decode error");
    state.apply(&effect);
    effect
}

fn primed_cpu() -> (Cpu, SharedState) {
    let mut cpu = Cpu::new(None);
    let mut state = SharedState::new();
    step(&mut cpu, &mut state);
    (cpu, state)
}

// Run the three fetch cycles of the instruction at PC, answering the opcode
// and operand reads on the data line the way the memory unit would.
fn fetch(cpu: &mut Cpu, state: &mut SharedState, opcode: Opcode, operand: u8) {
    step(cpu, state); // write-enable low, PC on the address line
    step(cpu, state); // PC+1 on the address line
    state.bus.data = opcode.into();
    step(cpu, state); // decode, operand read latency
    state.bus.data = operand;
}

#[test]
fn test_first_cycle_yields_identity() {
    let mut cpu = Cpu::new(None);
    let state = SharedState::new();

    assert_eq!(cpu.clock(&state).unwrap(), Effect::identity());
}

#[test]
fn test_fetch_drives_write_enable_low_and_both_read_addresses() {
    let (mut cpu, mut state) = primed_cpu();
    state.registers.pc = 0x04;
    state.bus.write_enable = true; // left over from a previous store

    let first = step(&mut cpu, &mut state);
    assert_eq!(
        first,
        Effect::bus_write_enable(false).merge(Effect::bus_address(0x04))
    );
    assert!(!state.bus.write_enable);

    let second = step(&mut cpu, &mut state);
    assert_eq!(second, Effect::bus_address(0x05));
}

#[test]
fn test_lda_loads_the_data_line_into_the_accumulator() {
    let (mut cpu, mut state) = primed_cpu();
    fetch(&mut cpu, &mut state, Opcode::Lda, 0x09);

    assert_eq!(step(&mut cpu, &mut state), Effect::bus_address(0x09));
    assert_eq!(step(&mut cpu, &mut state), Effect::identity()); // read latency

    state.bus.data = 99; // memory answers
    assert_eq!(step(&mut cpu, &mut state), Effect::reg_a(99));
    assert_eq!(state.registers.a, 99);

    // instructions are two bytes, so the advance is PC+2
    assert_eq!(step(&mut cpu, &mut state), Effect::reg_pc(0x02));
}

#[test]
fn test_sta_drives_a_write_transaction_in_one_cycle() {
    let (mut cpu, mut state) = primed_cpu();
    state.registers.a = 0x2A;
    fetch(&mut cpu, &mut state, Opcode::Sta, 0x0E);

    let effect = step(&mut cpu, &mut state);
    assert_eq!(effect.bus_write_enable, Some(true));
    assert_eq!(effect.bus_address, Some(0x0E));
    assert_eq!(effect.bus_data, Some(0x2A));

    assert_eq!(step(&mut cpu, &mut state), Effect::reg_pc(0x02));
}

#[test]
fn test_add_wraps_on_overflow() {
    let (mut cpu, mut state) = primed_cpu();
    state.registers.a = 250;
    fetch(&mut cpu, &mut state, Opcode::Add, 0x10);

    step(&mut cpu, &mut state); // drive address
    step(&mut cpu, &mut state); // read latency
    state.bus.data = 10;
    step(&mut cpu, &mut state); // commit

    assert_eq!(state.registers.a, 4);
}

#[test]
fn test_eq_only_ever_produces_zero_or_one() {
    for (a, data) in [(0, 0), (0, 1), (42, 42), (42, 43), (255, 255), (255, 0)] {
        let (mut cpu, mut state) = primed_cpu();
        state.registers.a = a;
        fetch(&mut cpu, &mut state, Opcode::Eq, 0x10);

        step(&mut cpu, &mut state);
        step(&mut cpu, &mut state);
        state.bus.data = data;
        step(&mut cpu, &mut state);

        assert_eq!(state.registers.a, u8::from(a == data));
    }
}

#[test]
fn test_jmp_sets_pc_and_skips_the_advance_cycle() {
    let (mut cpu, mut state) = primed_cpu();
    fetch(&mut cpu, &mut state, Opcode::Jmp, 0x30);

    assert_eq!(step(&mut cpu, &mut state), Effect::reg_pc(0x30));

    // straight back into a fetch at the jump target
    assert_eq!(
        step(&mut cpu, &mut state),
        Effect::bus_write_enable(false).merge(Effect::bus_address(0x30))
    );
}

#[test]
fn test_jz_jumps_only_on_zero_accumulator() {
    for a in [0u8, 1, 7, 255] {
        let (mut cpu, mut state) = primed_cpu();
        state.registers.a = a;
        state.registers.pc = 0x0A;
        fetch(&mut cpu, &mut state, Opcode::Jz, 0x00);

        let expected = if a == 0 { 0x00 } else { 0x0C };
        assert_eq!(step(&mut cpu, &mut state), Effect::reg_pc(expected));
    }
}

#[test]
fn test_halt_raises_the_latch_and_parks_pc_past_itself() {
    let (mut cpu, mut state) = primed_cpu();
    state.registers.pc = 0x0C;
    fetch(&mut cpu, &mut state, Opcode::Halt, 0x00);

    let effect = step(&mut cpu, &mut state);
    assert!(effect.halt);
    assert_eq!(effect.reg_pc, Some(0x0E));
    assert!(state.halted);
}

#[test]
fn test_print_emits_decimal_accumulator_line() {
    let buffer = Rc::new(RefCell::new(Vec::new()));
    let sink: SharedSink = buffer.clone();

    let mut cpu = Cpu::new(Some(sink));
    let mut state = SharedState::new();
    step(&mut cpu, &mut state); // priming
    state.registers.a = 42;
    fetch(&mut cpu, &mut state, Opcode::Print, 0x00);

    assert_eq!(step(&mut cpu, &mut state), Effect::identity());
    assert_eq!(state.registers.a, 42);
    assert_eq!(*buffer.borrow(), b"PRINT: 42\n");
}

#[test]
fn test_print_with_no_sink_is_silent() {
    let (mut cpu, mut state) = primed_cpu();
    state.registers.a = 42;
    fetch(&mut cpu, &mut state, Opcode::Print, 0x00);

    assert_eq!(step(&mut cpu, &mut state), Effect::identity());
}

#[test]
fn test_illegal_opcode_byte_aborts_with_decode_error() {
    let (mut cpu, mut state) = primed_cpu();
    state.registers.pc = 0x06;
    step(&mut cpu, &mut state);
    step(&mut cpu, &mut state);
    state.bus.data = 0x09;

    let error = cpu.clock(&state).unwrap_err();
    match error {
        MachineError::IllegalOpcode { address, opcode } => {
            assert_eq!(address, 0x06);
            assert_eq!(opcode, 0x09);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_reset_restarts_with_a_priming_cycle() {
    let (mut cpu, mut state) = primed_cpu();
    fetch(&mut cpu, &mut state, Opcode::Jmp, 0x30);

    cpu.reset();

    assert_eq!(cpu.clock(&state).unwrap(), Effect::identity());
}
