//! # Stack Instructions
//!
//! PHA, PHP, PLA, PLP. The stack lives at $0100-$01FF and grows downward.
//! PHP pushes the status with B and bit 5 set; PLP ignores both bits.

use crate::{MemoryBus, CPU};

pub(crate) fn execute_pha<M: MemoryBus>(cpu: &mut CPU<M>) -> u8 {
    let value = cpu.a;
    cpu.push(value);
    0
}

pub(crate) fn execute_php<M: MemoryBus>(cpu: &mut CPU<M>) -> u8 {
    let status = cpu.status() | 0b0011_0000;
    cpu.push(status);
    0
}

pub(crate) fn execute_pla<M: MemoryBus>(cpu: &mut CPU<M>) -> u8 {
    let value = cpu.pull();
    cpu.a = value;
    cpu.set_nz(value);
    0
}

pub(crate) fn execute_plp<M: MemoryBus>(cpu: &mut CPU<M>) -> u8 {
    let status = cpu.pull();
    cpu.set_status(status);
    0
}
