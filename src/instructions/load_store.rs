//! # Load and Store Instructions
//!
//! Loads update N and Z and pay the page-crossing penalty on indexed reads.
//! Stores never change flags and have the extra cycle built into their base
//! cost (`STA $1234,X` is always 5 cycles).

use super::page_penalty;
use crate::{AddressingMode, MemoryBus, CPU};

/// Executes the LDA (Load Accumulator) instruction.
pub(crate) fn execute_lda<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) -> u8 {
    let (operand, crossed) = cpu.resolve(mode);
    let value = cpu.read_operand(operand);
    cpu.a = value;
    cpu.set_nz(value);
    page_penalty(crossed)
}

/// Executes the LDX (Load X Register) instruction.
pub(crate) fn execute_ldx<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) -> u8 {
    let (operand, crossed) = cpu.resolve(mode);
    let value = cpu.read_operand(operand);
    cpu.x = value;
    cpu.set_nz(value);
    page_penalty(crossed)
}

/// Executes the LDY (Load Y Register) instruction.
pub(crate) fn execute_ldy<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) -> u8 {
    let (operand, crossed) = cpu.resolve(mode);
    let value = cpu.read_operand(operand);
    cpu.y = value;
    cpu.set_nz(value);
    page_penalty(crossed)
}

/// Executes the STA (Store Accumulator) instruction.
pub(crate) fn execute_sta<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) -> u8 {
    let (operand, _) = cpu.resolve(mode);
    let value = cpu.a;
    cpu.write_operand(operand, value);
    0
}

/// Executes the STX (Store X Register) instruction.
pub(crate) fn execute_stx<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) -> u8 {
    let (operand, _) = cpu.resolve(mode);
    let value = cpu.x;
    cpu.write_operand(operand, value);
    0
}

/// Executes the STY (Store Y Register) instruction.
pub(crate) fn execute_sty<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) -> u8 {
    let (operand, _) = cpu.resolve(mode);
    let value = cpu.y;
    cpu.write_operand(operand, value);
    0
}
