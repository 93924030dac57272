//! Breakpoints and trace ranges.
//!
//! The machine consults the monitor once per instruction boundary, before
//! the opcode fetch. Hitting a breakpoint halts the whole machine until the
//! host calls [`crate::Machine::resume`].

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};
use std::ops::RangeInclusive;

/// Trace entries kept for inspection.
pub const TRACE_CAPACITY: usize = 1024;

/// Registers at an instruction boundary inside a trace range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub pc: u16,
    pub opcode: u8,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub status: u8,
    pub cycles: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Monitor {
    breakpoints: BTreeSet<u16>,
    tracepoints: Vec<RangeInclusive<u16>>,
    trace: VecDeque<TraceEntry>,
    halted: Option<u16>,
    /// Let the next boundary pass a breakpoint once after a resume
    skip_break: bool,
}

impl Monitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_breakpoint(&mut self, pc: u16) {
        self.breakpoints.insert(pc);
    }

    pub fn remove_breakpoint(&mut self, pc: u16) -> bool {
        self.breakpoints.remove(&pc)
    }

    pub fn breakpoints(&self) -> impl Iterator<Item = u16> + '_ {
        self.breakpoints.iter().copied()
    }

    pub fn add_tracepoint(&mut self, range: RangeInclusive<u16>) {
        self.tracepoints.push(range);
    }

    pub fn clear_tracepoints(&mut self) {
        self.tracepoints.clear();
    }

    pub fn is_traced(&self, pc: u16) -> bool {
        self.tracepoints.iter().any(|range| range.contains(&pc))
    }

    /// Checks `pc` against the breakpoints and halts on a hit.
    ///
    /// Returns `true` if the machine must stop before this instruction.
    pub fn check_break(&mut self, pc: u16) -> bool {
        if std::mem::take(&mut self.skip_break) {
            return false;
        }
        if self.breakpoints.contains(&pc) {
            self.halted = Some(pc);
            return true;
        }
        false
    }

    /// PC of the breakpoint the machine is halted at.
    pub fn halted_at(&self) -> Option<u16> {
        self.halted
    }

    pub fn is_halted(&self) -> bool {
        self.halted.is_some()
    }

    /// Leaves the halted state; the next boundary ignores breakpoints.
    pub fn resume(&mut self) {
        if self.halted.take().is_some() {
            self.skip_break = true;
        }
    }

    /// Forgets any halt without arming the skip.
    pub fn discard_halt(&mut self) {
        self.halted = None;
        self.skip_break = false;
    }

    pub fn record(&mut self, entry: TraceEntry) {
        if self.trace.len() == TRACE_CAPACITY {
            self.trace.pop_front();
        }
        self.trace.push_back(entry);
    }

    pub fn trace(&self) -> &VecDeque<TraceEntry> {
        &self.trace
    }

    pub fn clear_trace(&mut self) {
        self.trace.clear();
    }
}
