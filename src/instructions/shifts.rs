//! # Shift and Rotate Instructions
//!
//! ASL, LSR, ROL, ROR. The implied form operates on the accumulator; the
//! memory forms are read-modify-write. C receives the bit shifted out.

use crate::{AddressingMode, MemoryBus, CPU};

fn shift<M: MemoryBus>(
    cpu: &mut CPU<M>,
    mode: AddressingMode,
    op: impl FnOnce(u8, bool) -> (u8, bool),
) -> u8 {
    let (operand, _) = cpu.resolve(mode);
    let value = cpu.read_operand(operand);
    let (result, carry) = op(value, cpu.flag_c);
    cpu.write_operand(operand, result);
    cpu.flag_c = carry;
    cpu.set_nz(result);
    0
}

pub(crate) fn execute_asl<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) -> u8 {
    shift(cpu, mode, |v, _| (v << 1, v & 0x80 != 0))
}

pub(crate) fn execute_lsr<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) -> u8 {
    shift(cpu, mode, |v, _| (v >> 1, v & 0x01 != 0))
}

pub(crate) fn execute_rol<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) -> u8 {
    shift(cpu, mode, |v, c| ((v << 1) | c as u8, v & 0x80 != 0))
}

pub(crate) fn execute_ror<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) -> u8 {
    shift(cpu, mode, |v, c| ((v >> 1) | ((c as u8) << 7), v & 0x01 != 0))
}
