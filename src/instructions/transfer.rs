//! # Register Transfer Instructions
//!
//! TAX, TAY, TXA, TYA, TSX update N and Z. TXS does not touch flags.

use crate::{MemoryBus, CPU};

pub(crate) fn execute_tax<M: MemoryBus>(cpu: &mut CPU<M>) -> u8 {
    cpu.x = cpu.a;
    cpu.set_nz(cpu.x);
    0
}

pub(crate) fn execute_tay<M: MemoryBus>(cpu: &mut CPU<M>) -> u8 {
    cpu.y = cpu.a;
    cpu.set_nz(cpu.y);
    0
}

pub(crate) fn execute_txa<M: MemoryBus>(cpu: &mut CPU<M>) -> u8 {
    cpu.a = cpu.x;
    cpu.set_nz(cpu.a);
    0
}

pub(crate) fn execute_tya<M: MemoryBus>(cpu: &mut CPU<M>) -> u8 {
    cpu.a = cpu.y;
    cpu.set_nz(cpu.a);
    0
}

pub(crate) fn execute_tsx<M: MemoryBus>(cpu: &mut CPU<M>) -> u8 {
    cpu.x = cpu.sp;
    cpu.set_nz(cpu.x);
    0
}

pub(crate) fn execute_txs<M: MemoryBus>(cpu: &mut CPU<M>) -> u8 {
    cpu.sp = cpu.x;
    0
}
