//! Fuzz target for single-instruction execution.
//!
//! Arbitrary registers and memory around the PC, then one `step()`. The
//! CPU must never panic and must always reach a boundary or stall.

#![no_main]

use arbitrary::Arbitrary;
use lib6510::{FlatMemory, MemoryBus, CPU};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Registers {
    a: u8,
    x: u8,
    y: u8,
    sp: u8,
    status: u8,
}

#[derive(Debug, Arbitrary)]
struct Input {
    registers: Registers,
    instruction: [u8; 3],
    zero_page: [u8; 256],
    stack_page: [u8; 256],
    /// Mapped at $4000 for absolute operands
    data: [u8; 256],
}

fuzz_target!(|input: Input| {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    memory.write(0xFFFE, 0x00);
    memory.write(0xFFFF, 0x90);
    memory.load(0x8000, &input.instruction);
    memory.load(0x0000, &input.zero_page);
    memory.load(0x0100, &input.stack_page);
    memory.load(0x4000, &input.data);

    let mut cpu = CPU::new(memory);
    cpu.set_a(input.registers.a);
    cpu.set_x(input.registers.x);
    cpu.set_y(input.registers.y);
    cpu.set_sp(input.registers.sp);
    cpu.set_status(input.registers.status);

    let used = cpu.step();

    // Longest path: 7-cycle instruction plus interrupt entry
    assert!(used >= 1 && used <= 16);
    assert!(cpu.at_instruction_boundary() || cpu.is_stalled());

    let state = cpu.state();
    let mut copy = CPU::new(FlatMemory::new());
    copy.restore_state(&state);
    assert_eq!(copy.state(), state);
});
