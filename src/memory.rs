//! # Memory Bus Abstraction
//!
//! This module provides the `MemoryBus` trait that decouples the CPU from specific
//! memory implementations. Besides byte access, the bus carries the three
//! signals the CPU samples every tick:
//!
//! - the level-triggered IRQ line
//! - the edge-triggered NMI latch
//! - bus arbitration (a busy bus stalls the CPU for that tick)
//!
//! The MemoryBus trait follows 6502 hardware behavior: there are no bus errors,
//! reads and writes always succeed.

/// Memory bus trait for CPU to read/write bytes.
///
/// # Examples
///
/// ```
/// use lib6510::{FlatMemory, MemoryBus};
///
/// let mut mem = FlatMemory::new();
/// mem.write(0x1234, 0x42);
/// assert_eq!(mem.read(0x1234), 0x42);
/// ```
///
/// ## Implementing Custom Memory
///
/// ```
/// use lib6510::MemoryBus;
///
/// struct RomRamMemory {
///     ram: [u8; 0x8000],
///     rom: [u8; 0x8000],
/// }
///
/// impl MemoryBus for RomRamMemory {
///     fn read(&self, addr: u16) -> u8 {
///         if addr < 0x8000 {
///             self.ram[addr as usize]
///         } else {
///             self.rom[(addr - 0x8000) as usize]
///         }
///     }
///
///     fn write(&mut self, addr: u16, value: u8) {
///         if addr < 0x8000 {
///             self.ram[addr as usize] = value;
///         }
///     }
/// }
/// ```
pub trait MemoryBus {
    /// Reads a byte from the specified 16-bit address.
    ///
    /// Reads take `&self`; devices with read side effects (clear-on-read
    /// status registers) keep that state behind interior mutability.
    fn read(&self, addr: u16) -> u8;

    /// Writes a byte to the specified 16-bit address.
    fn write(&mut self, addr: u16, value: u8);

    /// Reads a little-endian word.
    fn read_word(&self, addr: u16) -> u16 {
        let lo = self.read(addr) as u16;
        let hi = self.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    /// Reads a little-endian word whose high byte comes from the same page.
    ///
    /// `JMP ($10FF)` takes its high byte from $1000, not $1100.
    fn read_word_page_wrapped(&self, addr: u16) -> u16 {
        let lo = self.read(addr) as u16;
        let hi_addr = (addr & 0xFF00) | (addr.wrapping_add(1) & 0x00FF);
        let hi = self.read(hi_addr) as u16;
        (hi << 8) | lo
    }

    /// Checks if the IRQ (Interrupt Request) line is active.
    ///
    /// The IRQ line is **level-sensitive** and shared: it stays active while
    /// any producer holds it. Polling is non-destructive.
    ///
    /// Returns `false` by default for buses without interrupt sources.
    fn irq_active(&self) -> bool {
        false
    }

    /// Consumes a pending NMI edge.
    ///
    /// NMI is **edge-triggered**: this returns `true` once per edge and clears
    /// the latch.
    fn poll_nmi(&mut self) -> bool {
        false
    }

    /// Returns `true` if another bus master owns this cycle.
    ///
    /// Called once per CPU tick; implementations count the stolen cycle down.
    fn bus_busy(&mut self) -> bool {
        false
    }
}

/// Simple 64KB flat memory implementation.
///
/// All addresses (0x0000-0xFFFF) are writable RAM initialized to 0x00.
///
/// # Examples
///
/// ```
/// use lib6510::{FlatMemory, MemoryBus, CPU};
///
/// let mut memory = FlatMemory::new();
/// memory.write(0xFFFC, 0x00);
/// memory.write(0xFFFD, 0x80);
/// memory.write(0x8000, 0xEA);
///
/// let cpu = CPU::new(memory);
/// assert_eq!(cpu.pc(), 0x8000);
/// ```
pub struct FlatMemory {
    /// 64KB contiguous memory array
    data: Box<[u8; 65536]>,
}

impl FlatMemory {
    /// Creates a new FlatMemory instance with all bytes initialized to zero.
    pub fn new() -> Self {
        Self {
            data: Box::new([0; 65536]),
        }
    }

    /// Copies `bytes` into memory starting at `start`, wrapping at $FFFF.
    pub fn load(&mut self, start: u16, bytes: &[u8]) {
        for (offset, byte) in bytes.iter().enumerate() {
            let addr = start.wrapping_add(offset as u16);
            self.data[addr as usize] = *byte;
        }
    }
}

impl Default for FlatMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBus for FlatMemory {
    fn read(&self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.data[addr as usize] = value;
    }
}
