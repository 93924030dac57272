//! CIA (MOS 6526) Complex Interface Adapter.
//!
//! The C64 has two CIA chips:
//! - CIA1 ($DC00-$DCFF): keyboard matrix scan, drives IRQ
//! - CIA2 ($DD00-$DDFF): VIC bank selection, drives NMI
//!
//! Each CIA provides two 8-bit ports, two 16-bit countdown timers and a
//! time-of-day clock. The 16 registers mirror across the whole page.
//!
//! The chip never touches the interrupt lines from inside a register access.
//! Instead [`Cia::step`] re-drives its producer from the interrupt data and
//! mask once per tick, so an acknowledge (ICR read) releases the line on the
//! same tick the CPU performed it.

use crate::system::interrupts::{InterruptLines, Line, Source};
use crate::system::keyboard::KeyMatrix;
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

pub const CIA1_BASE: u16 = 0xDC00;
pub const CIA2_BASE: u16 = 0xDD00;

/// Interrupt data bits.
pub const ICR_TIMER_A: u8 = 0x01;
pub const ICR_TIMER_B: u8 = 0x02;

const CR_START: u8 = 0x01;
const CR_ONE_SHOT: u8 = 0x08;
const CR_FORCE_LOAD: u8 = 0x10;
const CRB_INMODE_MASK: u8 = 0x60;
const CRB_COUNT_TA: u8 = 0x40;

/// Which of the two chips this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CiaKind {
    Cia1,
    Cia2,
}

impl CiaKind {
    pub const fn base(self) -> u16 {
        match self {
            CiaKind::Cia1 => CIA1_BASE,
            CiaKind::Cia2 => CIA2_BASE,
        }
    }

    pub const fn source(self) -> Source {
        match self {
            CiaKind::Cia1 => Source::Cia1,
            CiaKind::Cia2 => Source::Cia2,
        }
    }

    pub const fn line(self) -> Line {
        match self {
            CiaKind::Cia1 => Line::Irq,
            CiaKind::Cia2 => Line::Nmi,
        }
    }
}

/// One I/O port: output latch plus direction register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiaPort {
    pub data: u8,
    /// 1 = output, 0 = input
    pub ddr: u8,
}

impl CiaPort {
    /// Pin levels: outputs drive the latch, inputs float high.
    #[inline]
    pub fn pins(&self) -> u8 {
        self.data | !self.ddr
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiaTimer {
    pub counter: u16,
    pub latch: u16,
    pub running: bool,
    /// Stop at zero instead of reloading.
    pub one_shot: bool,
}

impl Default for CiaTimer {
    fn default() -> Self {
        Self {
            counter: 0xFFFF,
            latch: 0xFFFF,
            running: false,
            one_shot: false,
        }
    }
}

impl CiaTimer {
    /// Counts one pulse. Returns `true` on underflow.
    ///
    /// Underflow happens on the pulse that finds the counter at zero. A
    /// continuous timer reloads from the latch; a one-shot timer halts at zero.
    pub fn clock(&mut self) -> bool {
        if !self.running {
            return false;
        }

        if self.counter == 0 {
            if self.one_shot {
                self.running = false;
            } else {
                self.counter = self.latch;
            }
            true
        } else {
            self.counter -= 1;
            false
        }
    }

    fn write_control(&mut self, value: u8) {
        self.running = value & CR_START != 0;
        self.one_shot = value & CR_ONE_SHOT != 0;
        if value & CR_FORCE_LOAD != 0 {
            self.counter = self.latch;
        }
    }

    fn write_latch_lo(&mut self, value: u8) {
        self.latch = (self.latch & 0xFF00) | value as u16;
    }

    fn write_latch_hi(&mut self, value: u8) {
        self.latch = (self.latch & 0x00FF) | ((value as u16) << 8);
        if !self.running {
            self.counter = self.latch;
        }
    }
}

/// MOS 6526 state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cia {
    kind: CiaKind,
    pub port_a: CiaPort,
    pub port_b: CiaPort,
    pub timer_a: CiaTimer,
    pub timer_b: CiaTimer,
    sdr: u8,
    /// Sticky interrupt sources (ICR read side)
    icr_data: u8,
    /// Enabled interrupt sources (ICR write side)
    icr_mask: u8,
    cra: u8,
    crb: u8,
    keyboard: KeyMatrix,
    #[serde(skip, default = "Instant::now")]
    tod_epoch: Instant,
}

impl Cia {
    pub fn new(kind: CiaKind) -> Self {
        Self {
            kind,
            port_a: CiaPort::default(),
            port_b: CiaPort::default(),
            timer_a: CiaTimer::default(),
            timer_b: CiaTimer::default(),
            sdr: 0,
            icr_data: 0,
            icr_mask: 0,
            cra: 0,
            crb: 0,
            keyboard: KeyMatrix::new(),
            tod_epoch: Instant::now(),
        }
    }

    pub fn kind(&self) -> CiaKind {
        self.kind
    }

    /// Power-on state. The TOD clock restarts from zero.
    pub fn reset(&mut self) {
        *self = Self::new(self.kind);
    }

    /// Advances both timers by one cycle, then re-drives the interrupt line.
    pub fn step(&mut self, lines: &mut InterruptLines) {
        let ta_underflow = self.timer_a.clock();
        if ta_underflow {
            self.icr_data |= ICR_TIMER_A;
        }

        let tb_pulse = if self.crb & CRB_INMODE_MASK == CRB_COUNT_TA {
            ta_underflow
        } else {
            true
        };
        if tb_pulse && self.timer_b.clock() {
            self.icr_data |= ICR_TIMER_B;
        }

        self.sync(lines);
    }

    /// Drives this chip's producer from the current interrupt state.
    pub fn sync(&self, lines: &mut InterruptLines) {
        lines.drive(self.kind.source(), self.kind.line(), self.interrupt_asserted());
    }

    /// Returns `true` while an enabled interrupt source is pending.
    pub fn interrupt_asserted(&self) -> bool {
        self.icr_data & self.icr_mask != 0
    }

    pub fn icr_data(&self) -> u8 {
        self.icr_data
    }

    pub fn icr_mask(&self) -> u8 {
        self.icr_mask
    }

    /// Replaces the set of pressed keys seen on port B.
    pub fn set_keys(&mut self, keys: KeyMatrix) {
        self.keyboard = keys;
    }

    pub fn keys(&self) -> KeyMatrix {
        self.keyboard
    }

    /// VIC bank (0-3) selected by port A bits 0-1, inverted.
    pub fn vic_bank(&self) -> u8 {
        3 - (self.port_a.pins() & 0x03)
    }

    /// Register read. Reading ICR acknowledges all pending sources.
    pub fn read(&mut self, addr: u16) -> u8 {
        match addr & 0x0F {
            0x00 => self.port_a.pins(),
            0x01 => self.keyboard.scan(self.port_a.pins()) & self.port_b.pins(),
            0x02 => self.port_a.ddr,
            0x03 => self.port_b.ddr,
            0x04 => self.timer_a.counter as u8,
            0x05 => (self.timer_a.counter >> 8) as u8,
            0x06 => self.timer_b.counter as u8,
            0x07 => (self.timer_b.counter >> 8) as u8,
            reg @ 0x08..=0x0B => tod_registers(self.tod_epoch.elapsed())[(reg - 0x08) as usize],
            0x0C => self.sdr,
            0x0D => {
                let value = if self.interrupt_asserted() {
                    self.icr_data | 0x80
                } else {
                    self.icr_data
                };
                self.icr_data = 0;
                value
            }
            0x0E => self.cra,
            _ => self.crb,
        }
    }

    /// Register write. TOD writes are ignored; the clock follows the host.
    pub fn write(&mut self, addr: u16, value: u8) {
        match addr & 0x0F {
            0x00 => self.port_a.data = value,
            0x01 => self.port_b.data = value,
            0x02 => self.port_a.ddr = value,
            0x03 => self.port_b.ddr = value,
            0x04 => self.timer_a.write_latch_lo(value),
            0x05 => self.timer_a.write_latch_hi(value),
            0x06 => self.timer_b.write_latch_lo(value),
            0x07 => self.timer_b.write_latch_hi(value),
            0x08..=0x0B => {}
            0x0C => self.sdr = value,
            0x0D => {
                let bits = value & 0x1F;
                if value & 0x80 != 0 {
                    self.icr_mask |= bits;
                } else {
                    self.icr_mask &= !bits;
                }
            }
            0x0E => {
                self.log_start_stop("A", self.timer_a.running, value);
                self.timer_a.write_control(value);
                self.cra = value & !CR_FORCE_LOAD;
            }
            _ => {
                self.log_start_stop("B", self.timer_b.running, value);
                self.timer_b.write_control(value);
                self.crb = value & !CR_FORCE_LOAD;
            }
        }
    }

    fn log_start_stop(&self, timer: &str, was_running: bool, control: u8) {
        let running = control & CR_START != 0;
        if running != was_running {
            debug!(
                "{:?} timer {} {}",
                self.kind,
                timer,
                if running { "started" } else { "stopped" }
            );
        }
    }
}

/// Packs an elapsed time as the four TOD registers: tenths, seconds,
/// minutes, hours. Hours wrap at 24.
pub fn tod_registers(elapsed: Duration) -> [u8; 4] {
    let tenths = elapsed.as_millis() / 100;
    let seconds = tenths / 10;
    let minutes = seconds / 60;
    let hours = minutes / 60;
    [
        (tenths % 10) as u8,
        to_bcd((seconds % 60) as u8),
        to_bcd((minutes % 60) as u8),
        to_bcd((hours % 24) as u8),
    ]
}

fn to_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}
