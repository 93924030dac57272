//! # Control Flow Instructions
//!
//! This module implements control flow operations:
//! - BRK: Force Interrupt
//! - JMP: Jump to address
//! - JSR, RTS: Subroutine call and return
//! - RTI: Return from interrupt
//!
//! BRK is a software interrupt that:
//! 1. Pushes PC+2 to the stack (high byte first, then low byte)
//! 2. Pushes processor status to stack with B set
//! 3. Sets the I (interrupt disable) flag
//! 4. Loads PC from the IRQ vector at $FFFE/F

use crate::addressing::Operand;
use crate::cpu::Entry;
use crate::{AddressingMode, MemoryBus, CPU};

/// Executes the BRK (Force Interrupt) instruction.
///
/// PC already points one past the opcode, so the pushed return address skips
/// the padding byte that follows BRK.
pub(crate) fn execute_brk<M: MemoryBus>(cpu: &mut CPU<M>) -> u8 {
    let return_address = cpu.pc.wrapping_add(1);
    cpu.enter_interrupt(return_address, Entry::Brk);
    0
}

/// Executes the JMP (Jump) instruction.
///
/// The Indirect form reproduces the NMOS page-wrap bug: `JMP ($10FF)` reads
/// its high byte from $1000.
pub(crate) fn execute_jmp<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) -> u8 {
    if let (Operand::Address(target), _) = cpu.resolve(mode) {
        cpu.pc = target;
    }
    0
}

/// Executes the JSR (Jump to Subroutine) instruction.
///
/// Pushes the address of the last operand byte (return address - 1).
pub(crate) fn execute_jsr<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) -> u8 {
    if let (Operand::Address(target), _) = cpu.resolve(mode) {
        let return_address = cpu.pc.wrapping_sub(1);
        cpu.push((return_address >> 8) as u8);
        cpu.push(return_address as u8);
        cpu.pc = target;
    }
    0
}

/// Executes the RTS (Return from Subroutine) instruction.
pub(crate) fn execute_rts<M: MemoryBus>(cpu: &mut CPU<M>) -> u8 {
    let lo = cpu.pull() as u16;
    let hi = cpu.pull() as u16;
    cpu.pc = ((hi << 8) | lo).wrapping_add(1);
    0
}

/// Executes the RTI (Return from Interrupt) instruction.
pub(crate) fn execute_rti<M: MemoryBus>(cpu: &mut CPU<M>) -> u8 {
    let status = cpu.pull();
    cpu.set_status(status);
    let lo = cpu.pull() as u16;
    let hi = cpu.pull() as u16;
    cpu.pc = (hi << 8) | lo;
    0
}
