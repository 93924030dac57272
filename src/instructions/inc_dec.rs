//! # Increment and Decrement Instructions
//!
//! INC/DEC are read-modify-write on memory and never take a page-crossing
//! penalty (their AbsoluteX form always costs 7). INX/INY/DEX/DEY work on the
//! index registers. All update N and Z.

use crate::{AddressingMode, MemoryBus, CPU};

pub(crate) fn execute_inc<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) -> u8 {
    let (operand, _) = cpu.resolve(mode);
    let result = cpu.read_operand(operand).wrapping_add(1);
    cpu.write_operand(operand, result);
    cpu.set_nz(result);
    0
}

pub(crate) fn execute_dec<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) -> u8 {
    let (operand, _) = cpu.resolve(mode);
    let result = cpu.read_operand(operand).wrapping_sub(1);
    cpu.write_operand(operand, result);
    cpu.set_nz(result);
    0
}

pub(crate) fn execute_inx<M: MemoryBus>(cpu: &mut CPU<M>) -> u8 {
    cpu.x = cpu.x.wrapping_add(1);
    cpu.set_nz(cpu.x);
    0
}

pub(crate) fn execute_iny<M: MemoryBus>(cpu: &mut CPU<M>) -> u8 {
    cpu.y = cpu.y.wrapping_add(1);
    cpu.set_nz(cpu.y);
    0
}

pub(crate) fn execute_dex<M: MemoryBus>(cpu: &mut CPU<M>) -> u8 {
    cpu.x = cpu.x.wrapping_sub(1);
    cpu.set_nz(cpu.x);
    0
}

pub(crate) fn execute_dey<M: MemoryBus>(cpu: &mut CPU<M>) -> u8 {
    cpu.y = cpu.y.wrapping_sub(1);
    cpu.set_nz(cpu.y);
    0
}
