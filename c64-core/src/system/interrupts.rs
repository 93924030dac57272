//! Interrupt line aggregation and bus arbitration.
//!
//! Several chips drive the CPU's two interrupt inputs. Each producer is
//! tracked separately so one chip releasing a line does not drop another
//! chip's request:
//!
//! - **IRQ** is level-triggered: asserted while any producer holds it, and
//!   polling does not consume it.
//! - **NMI** is edge-triggered: a latch is armed when the producer set goes
//!   from empty to non-empty and cleared when the CPU polls it. It cannot fire
//!   again until every producer has released the line.
//!
//! The same aggregator carries the bus-arbitration counter the VIC uses to
//! steal cycles from the CPU.

use serde::{Deserialize, Serialize};

/// A chip (or key) that can drive an interrupt line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    Cia1,
    Cia2,
    Vic,
    Restore,
}

impl Source {
    const fn bit(self) -> u8 {
        match self {
            Source::Cia1 => 0x01,
            Source::Cia2 => 0x02,
            Source::Vic => 0x04,
            Source::Restore => 0x08,
        }
    }
}

/// Which CPU input a producer drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Line {
    Irq,
    Nmi,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterruptLines {
    /// Producers holding IRQ, one bit per [`Source`]
    irq: u8,
    /// Producers holding NMI
    nmi: u8,
    /// Armed on the empty to non-empty NMI transition
    nmi_latch: bool,
    /// Cycles still owned by another bus master
    bus_cycles: u32,
}

impl InterruptLines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `source` to the producers of `line`.
    pub fn set(&mut self, source: Source, line: Line) {
        match line {
            Line::Irq => self.irq |= source.bit(),
            Line::Nmi => {
                if self.nmi == 0 {
                    self.nmi_latch = true;
                }
                self.nmi |= source.bit();
            }
        }
    }

    /// Removes `source` from the producers of `line`.
    pub fn clear(&mut self, source: Source, line: Line) {
        match line {
            Line::Irq => self.irq &= !source.bit(),
            Line::Nmi => self.nmi &= !source.bit(),
        }
    }

    /// Sets or clears according to `asserted`.
    pub fn drive(&mut self, source: Source, line: Line, asserted: bool) {
        if asserted {
            self.set(source, line);
        } else {
            self.clear(source, line);
        }
    }

    /// Samples a line. Destructive for NMI, idempotent for IRQ.
    pub fn poll(&mut self, line: Line) -> bool {
        match line {
            Line::Irq => self.irq != 0,
            Line::Nmi => std::mem::take(&mut self.nmi_latch),
        }
    }

    /// Level of IRQ without side effects.
    pub fn irq_asserted(&self) -> bool {
        self.irq != 0
    }

    /// Returns `true` if `source` currently holds `line`.
    pub fn is_held(&self, source: Source, line: Line) -> bool {
        let producers = match line {
            Line::Irq => self.irq,
            Line::Nmi => self.nmi,
        };
        producers & source.bit() != 0
    }

    /// Claims the bus for at least `cycles` more CPU cycles.
    pub fn request_bus(&mut self, cycles: u32) {
        self.bus_cycles = self.bus_cycles.max(cycles);
    }

    /// Returns `true` while the bus is claimed, counting one cycle down per call.
    pub fn bus_busy(&mut self) -> bool {
        if self.bus_cycles > 0 {
            self.bus_cycles -= 1;
            true
        } else {
            false
        }
    }

    /// Remaining claimed cycles.
    pub fn bus_cycles(&self) -> u32 {
        self.bus_cycles
    }

    /// Drops every producer, the NMI latch and any bus claim.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
