//! KERNAL routine patches.
//!
//! A patch replaces a firmware routine with native code. When the CPU is
//! about to fetch at a patched address the machine runs the patch instead;
//! every patch finishes the way the routine would, with carry clear for
//! success and an `RTS` back to the caller.
//!
//! The stock table short-circuits the serial bus: the handshake routines
//! report success immediately and ACPTR ($EE13) returns bytes from a
//! [`ByteCursor`] supplied by the disk adapter.

use crate::system::address_bus::AddressBus;
use lib6510::{MemoryBus, CPU};
use log::debug;
use std::collections::HashMap;

/// ACPTR: read one byte from the serial bus into A.
pub const ACPTR: u16 = 0xEE13;

/// Serial bus handshake entry points: LISTEN, TALK, SECOND, TKSA, CIOUT,
/// UNTALK, UNLISTEN.
pub const SERIAL_HANDSHAKE: [u16; 7] = [0xED09, 0xED0C, 0xEDB9, 0xEDC7, 0xEDDD, 0xEDEF, 0xEDFE];

/// KERNAL I/O status byte (ST).
pub const STATUS: u16 = 0x0090;
/// ST bit set on the last byte of a stream.
pub const STATUS_EOI: u8 = 0x40;
/// ST bits set when reading past the end (EOI plus read timeout).
pub const STATUS_READ_ERROR: u8 = 0x42;

/// Next byte of an open stream and whether it is the last one.
pub trait ByteCursor {
    fn next(&mut self) -> Option<(u8, bool)>;
}

/// Cursor over an in-memory byte slice.
#[derive(Debug, Clone, Default)]
pub struct SliceCursor {
    data: Vec<u8>,
    pos: usize,
}

impl SliceCursor {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            pos: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

impl ByteCursor for SliceCursor {
    fn next(&mut self) -> Option<(u8, bool)> {
        let byte = *self.data.get(self.pos)?;
        self.pos += 1;
        Some((byte, self.pos == self.data.len()))
    }
}

/// What a patched address does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Patch {
    /// Load the next cursor byte into A, flagging EOI in ST.
    SerialByte,
    /// Report success without doing anything.
    Succeed,
}

/// PC-indexed patch table.
#[derive(Debug, Clone, Default)]
pub struct PatchTable {
    patches: HashMap<u16, Patch>,
}

impl PatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The serial bus patches: ACPTR plus the handshake routines.
    pub fn kernal_serial() -> Self {
        let mut table = Self::new();
        table.install(ACPTR, Patch::SerialByte);
        for addr in SERIAL_HANDSHAKE {
            table.install(addr, Patch::Succeed);
        }
        table
    }

    pub fn install(&mut self, pc: u16, patch: Patch) {
        self.patches.insert(pc, patch);
    }

    pub fn remove(&mut self, pc: u16) -> Option<Patch> {
        self.patches.remove(&pc)
    }

    pub fn get(&self, pc: u16) -> Option<Patch> {
        self.patches.get(&pc).copied()
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }
}

impl Patch {
    /// Runs the patch and returns to the caller.
    pub fn apply(self, cpu: &mut CPU<AddressBus>, cursor: Option<&mut (dyn ByteCursor + '_)>) {
        if self == Patch::SerialByte {
            let status = cpu.memory().read(STATUS);
            match cursor.and_then(|cursor| cursor.next()) {
                Some((byte, last)) => {
                    cpu.set_a(byte);
                    if last {
                        cpu.memory_mut().write(STATUS, status | STATUS_EOI);
                    }
                }
                None => {
                    debug!("ACPTR past end of stream");
                    cpu.memory_mut().write(STATUS, status | STATUS_READ_ERROR);
                }
            }
        }

        cpu.set_flag_c(false);
        return_from_subroutine(cpu);
    }
}

/// Pops a JSR return address and continues after the call site.
fn return_from_subroutine(cpu: &mut CPU<AddressBus>) {
    let lo = cpu.pull();
    let hi = cpu.pull();
    let ret = u16::from_le_bytes([lo, hi]).wrapping_add(1);
    cpu.set_pc(ret);
}
