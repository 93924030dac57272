//! Fuzz target for the whole machine.
//!
//! An arbitrary program at $C000 runs for a bounded number of ticks with
//! chip registers reachable. Nothing may panic, and a snapshot taken at the
//! end must restore to the same state.

#![no_main]

use arbitrary::Arbitrary;
use c64_core::{Machine, MachineConfig, RomSet};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    program: Vec<u8>,
    ticks: u16,
}

fuzz_target!(|input: Input| {
    let mut machine = Machine::new(&RomSet::blank(0xC000), MachineConfig::default());
    for (i, &byte) in input.program.iter().take(0x1000).enumerate() {
        machine.bus_mut().raw_write(0xC000 + i as u16, byte);
    }

    for _ in 0..input.ticks {
        machine.tick();
    }

    let snapshot = machine.snapshot();
    let mut copy = Machine::new(&RomSet::blank(0xC000), MachineConfig::default());
    copy.restore(&snapshot);
    assert_eq!(copy.cpu().state(), machine.cpu().state());
    assert_eq!(copy.bus().ram(), machine.bus().ram());
});
