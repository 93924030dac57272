//! C64 address bus with bank switching.
//!
//! The C64 maps ROMs, RAM and chip registers onto overlapping address ranges.
//! The 6510's on-chip port ($00 direction, $01 data) selects what is visible:
//!
//! - $0000-$9FFF: RAM (always)
//! - $A000-$BFFF: BASIC ROM when LORAM and HIRAM are both set, else RAM
//! - $C000-$CFFF: RAM (always)
//! - $D000-$DFFF: when LORAM or HIRAM is set, I/O (CHAREN set) or the
//!   character ROM (CHAREN clear); otherwise RAM
//! - $E000-$FFFF: KERNAL ROM when HIRAM is set, else RAM
//!
//! Chips are attached through range watchers. A read watcher answers reads in
//! its range (the first registered match wins); write watchers all see a write
//! in registration order. Watchers inside $D000-$DFFF only fire while I/O is
//! banked in. Writes always land in RAM afterwards, which is also where color
//! RAM lives ($D800-$DBFF, low nibble).

use super::interrupts::InterruptLines;
use crate::roms::RomSet;
use lib6510::MemoryBus;
use log::debug;
use std::ops::RangeInclusive;

const BASIC_START: u16 = 0xA000;
const BASIC_END: u16 = 0xBFFF;
const IO_START: u16 = 0xD000;
const IO_END: u16 = 0xDFFF;
const KERNAL_START: u16 = 0xE000;

/// Color RAM base address.
pub const COLOR_RAM: u16 = 0xD800;

/// Power-on value of the port direction register.
pub const DEFAULT_DDR: u8 = 0x2F;
/// Power-on value of the port data register.
pub const DEFAULT_PORT: u8 = 0x37;

const LORAM: u8 = 0x01;
const HIRAM: u8 = 0x02;
const CHAREN: u8 = 0x04;

type ReadCallback = Box<dyn Fn(u16) -> u8>;
type WriteCallback = Box<dyn Fn(u16, u8)>;

struct ReadWatcher {
    range: RangeInclusive<u16>,
    callback: ReadCallback,
}

struct WriteWatcher {
    range: RangeInclusive<u16>,
    callback: WriteCallback,
}

/// Bank-switched memory shared by the CPU and the VIC.
pub struct AddressBus {
    ram: Box<[u8; 0x10000]>,
    basic: Box<[u8; 0x2000]>,
    chargen: Box<[u8; 0x1000]>,
    kernal: Box<[u8; 0x2000]>,

    loram: bool,
    hiram: bool,
    charen: bool,

    read_watchers: Vec<ReadWatcher>,
    write_watchers: Vec<WriteWatcher>,

    interrupts: InterruptLines,
}

impl AddressBus {
    /// Creates a bus with zeroed RAM, the given ROMs and the power-on port state.
    pub fn new(roms: &RomSet) -> Self {
        let mut basic = Box::new([0u8; 0x2000]);
        let mut chargen = Box::new([0u8; 0x1000]);
        let mut kernal = Box::new([0u8; 0x2000]);
        basic.copy_from_slice(roms.basic());
        chargen.copy_from_slice(roms.chargen());
        kernal.copy_from_slice(roms.kernal());

        let mut bus = Self {
            ram: Box::new([0; 0x10000]),
            basic,
            chargen,
            kernal,
            loram: false,
            hiram: false,
            charen: false,
            read_watchers: Vec::new(),
            write_watchers: Vec::new(),
            interrupts: InterruptLines::new(),
        };
        bus.reset_port();
        bus
    }

    /// Restores the power-on port values ($00=$2F, $01=$37).
    pub fn reset_port(&mut self) {
        self.ram[0x0000] = DEFAULT_DDR;
        self.ram[0x0001] = DEFAULT_PORT;
        self.update_banking();
    }

    /// Registers a callback that answers reads in `range`.
    pub fn register_read_watcher(
        &mut self,
        range: RangeInclusive<u16>,
        callback: impl Fn(u16) -> u8 + 'static,
    ) {
        self.read_watchers.push(ReadWatcher {
            range,
            callback: Box::new(callback),
        });
    }

    /// Registers a callback that observes writes in `range`.
    pub fn register_write_watcher(
        &mut self,
        range: RangeInclusive<u16>,
        callback: impl Fn(u16, u8) + 'static,
    ) {
        self.write_watchers.push(WriteWatcher {
            range,
            callback: Box::new(callback),
        });
    }

    /// Reads RAM directly, ignoring banking and watchers.
    pub fn raw_read(&self, addr: u16) -> u8 {
        self.ram[addr as usize]
    }

    /// Writes RAM directly, ignoring banking and watchers.
    ///
    /// Writing the port bytes this way still refreshes the cached banking flags.
    pub fn raw_write(&mut self, addr: u16, value: u8) {
        self.ram[addr as usize] = value;
        if addr <= 0x0001 {
            self.update_banking();
        }
    }

    /// The whole RAM array.
    pub fn ram(&self) -> &[u8] {
        &self.ram[..]
    }

    /// Replaces RAM wholesale (snapshot restore) and re-derives banking.
    ///
    /// Extra bytes are ignored; missing bytes leave RAM untouched.
    pub fn load_ram(&mut self, data: &[u8]) {
        let len = data.len().min(self.ram.len());
        self.ram[..len].copy_from_slice(&data[..len]);
        self.update_banking();
    }

    /// Reads as the VIC sees memory.
    ///
    /// The VIC addresses 16 KiB at a time (`bank` 0-3). It never sees BASIC,
    /// KERNAL or I/O, but the character ROM shadows $1000-$1FFF of banks 0
    /// and 2.
    pub fn vic_read(&self, bank: u8, addr: u16) -> u8 {
        let offset = addr & 0x3FFF;
        if bank & 1 == 0 && (0x1000..0x2000).contains(&offset) {
            return self.chargen[(offset & 0x0FFF) as usize];
        }
        let full = ((bank as u16 & 3) << 14) | offset;
        self.ram[full as usize]
    }

    /// Color RAM nibble for cell `index` (0-1023).
    pub fn color_ram(&self, index: u16) -> u8 {
        self.ram[(COLOR_RAM + (index & 0x03FF)) as usize] & 0x0F
    }

    pub fn loram(&self) -> bool {
        self.loram
    }

    pub fn hiram(&self) -> bool {
        self.hiram
    }

    pub fn charen(&self) -> bool {
        self.charen
    }

    /// Returns `true` when chip registers are visible at $D000-$DFFF.
    pub fn io_visible(&self) -> bool {
        (self.loram || self.hiram) && self.charen
    }

    pub fn interrupts(&self) -> &InterruptLines {
        &self.interrupts
    }

    pub fn interrupts_mut(&mut self) -> &mut InterruptLines {
        &mut self.interrupts
    }

    /// Bits read back as 1 where the port is an input (pulled up).
    fn update_banking(&mut self) {
        let effective = self.ram[0x0001] | !self.ram[0x0000];
        let loram = effective & LORAM != 0;
        let hiram = effective & HIRAM != 0;
        let charen = effective & CHAREN != 0;

        if (loram, hiram, charen) != (self.loram, self.hiram, self.charen) {
            debug!(
                "banking changed: LORAM={} HIRAM={} CHAREN={}",
                loram, hiram, charen
            );
        }
        self.loram = loram;
        self.hiram = hiram;
        self.charen = charen;
    }

    fn watchers_active(&self, addr: u16) -> bool {
        !(IO_START..=IO_END).contains(&addr) || self.io_visible()
    }
}

impl MemoryBus for AddressBus {
    fn read(&self, addr: u16) -> u8 {
        if self.watchers_active(addr) {
            if let Some(watcher) = self.read_watchers.iter().find(|w| w.range.contains(&addr)) {
                return (watcher.callback)(addr);
            }
        }

        match addr {
            BASIC_START..=BASIC_END if self.loram && self.hiram => {
                self.basic[(addr - BASIC_START) as usize]
            }
            KERNAL_START..=0xFFFF if self.hiram => self.kernal[(addr - KERNAL_START) as usize],
            IO_START..=IO_END if (self.loram || self.hiram) && !self.charen => {
                self.chargen[(addr - IO_START) as usize]
            }
            _ => self.ram[addr as usize],
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        if self.watchers_active(addr) {
            for watcher in self.write_watchers.iter().filter(|w| w.range.contains(&addr)) {
                (watcher.callback)(addr, value);
            }
        }

        match addr {
            0x0001 => {
                let ddr = self.ram[0x0000];
                self.ram[0x0001] = (self.ram[0x0001] & !ddr) | (value & ddr);
                self.update_banking();
            }
            0x0000 => {
                self.ram[0x0000] = value;
                self.update_banking();
            }
            _ => self.ram[addr as usize] = value,
        }
    }

    fn irq_active(&self) -> bool {
        self.interrupts.irq_asserted()
    }

    fn poll_nmi(&mut self) -> bool {
        self.interrupts.poll(super::interrupts::Line::Nmi)
    }

    fn bus_busy(&mut self) -> bool {
        self.interrupts.bus_busy()
    }
}
