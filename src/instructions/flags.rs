//! # Status Flag Instructions
//!
//! CLC, SEC, CLI, SEI, CLD, SED, CLV. All take 2 cycles and touch one flag.

use crate::{MemoryBus, CPU};

pub(crate) fn execute_clc<M: MemoryBus>(cpu: &mut CPU<M>) -> u8 {
    cpu.flag_c = false;
    0
}

pub(crate) fn execute_sec<M: MemoryBus>(cpu: &mut CPU<M>) -> u8 {
    cpu.flag_c = true;
    0
}

pub(crate) fn execute_cli<M: MemoryBus>(cpu: &mut CPU<M>) -> u8 {
    cpu.flag_i = false;
    0
}

pub(crate) fn execute_sei<M: MemoryBus>(cpu: &mut CPU<M>) -> u8 {
    cpu.flag_i = true;
    0
}

pub(crate) fn execute_cld<M: MemoryBus>(cpu: &mut CPU<M>) -> u8 {
    cpu.flag_d = false;
    0
}

pub(crate) fn execute_sed<M: MemoryBus>(cpu: &mut CPU<M>) -> u8 {
    cpu.flag_d = true;
    0
}

pub(crate) fn execute_clv<M: MemoryBus>(cpu: &mut CPU<M>) -> u8 {
    cpu.flag_v = false;
    0
}
