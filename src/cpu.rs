//! # CPU State and Execution
//!
//! This module contains the CPU struct representing the 6510 processor state and
//! its tick-stepped fetch/execute state machine.
//!
//! ## CPU State
//!
//! The CPU maintains:
//! - **Registers**: Accumulator (A), index registers (X, Y)
//! - **Program counter** (PC): 16-bit address of next instruction
//! - **Stack pointer** (SP): 8-bit offset into stack page (0x0100-0x01FF)
//! - **Status flags**: N, V, B, D, I, Z, C (individual bool fields)
//! - **Cycle counter**: u64 count of clock ticks seen
//!
//! ## Execution Model
//!
//! One call to [`CPU::tick`] is one clock cycle. An instruction is fetched on
//! one tick, reserves `base_cycles - 2` idle ticks, and executes on the tick
//! after those run out. Page-crossing and branch penalties, plus the 7-cycle
//! interrupt entry sequence, are charged as idle ticks before the next fetch.
//!
//! Every tick first asks the bus whether another master owns it. A busy bus
//! pauses the countdown without resetting it.
//!
//! - `tick()`: Advance one clock cycle
//! - `step()`: Tick until the next instruction boundary
//! - `run_for_cycles()`: Tick a fixed number of cycles

use crate::addressing::{AddressingMode, Operand};
use crate::{instructions, MemoryBus, OPCODE_TABLE};
use log::warn;
use serde::{Deserialize, Serialize};

/// Address of the NMI vector.
pub const NMI_VECTOR: u16 = 0xFFFA;
/// Address of the reset vector.
pub const RESET_VECTOR: u16 = 0xFFFC;
/// Address of the IRQ/BRK vector.
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// Cycles taken by the hardware interrupt entry sequence.
pub const INTERRUPT_CYCLES: u8 = 7;

/// What started an interrupt entry sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Entry {
    Irq,
    Nmi,
    Brk,
}

/// Where the CPU is inside the current instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting to fetch the next opcode (after any idle ticks drain).
    Fetching,
    /// An opcode is latched and its cycles are counting down.
    Executing,
}

/// Serializable copy of the complete CPU state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuState {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub pc: u16,
    pub sp: u8,
    pub flag_n: bool,
    pub flag_v: bool,
    pub flag_b: bool,
    pub flag_d: bool,
    pub flag_i: bool,
    pub flag_z: bool,
    pub flag_c: bool,
    pub cycles: u64,
    pub phase: Phase,
    pub opcode: u8,
    pub remaining: u8,
    pub stalled: bool,
}

/// 6510 CPU state and execution context.
///
/// The CPU owns its memory bus and is generic over it.
///
/// # Examples
///
/// ```
/// use lib6510::{FlatMemory, MemoryBus, CPU};
///
/// let mut memory = FlatMemory::new();
/// memory.write(0xFFFC, 0x00);
/// memory.write(0xFFFD, 0xC0);
/// memory.write(0xC000, 0xA9); // LDA #$42
/// memory.write(0xC001, 0x42);
///
/// let mut cpu = CPU::new(memory);
/// cpu.step();
///
/// assert_eq!(cpu.a(), 0x42);
/// assert_eq!(cpu.pc(), 0xC002);
/// assert_eq!(cpu.cycles(), 2);
/// ```
pub struct CPU<M: MemoryBus> {
    /// Accumulator register
    pub(crate) a: u8,

    /// X index register
    pub(crate) x: u8,

    /// Y index register
    pub(crate) y: u8,

    /// Program counter (address of next instruction)
    pub(crate) pc: u16,

    /// Stack pointer (0x0100 + sp gives full stack address)
    pub(crate) sp: u8,

    pub(crate) flag_n: bool,
    pub(crate) flag_v: bool,
    pub(crate) flag_b: bool,
    pub(crate) flag_d: bool,
    pub(crate) flag_i: bool,
    pub(crate) flag_z: bool,
    pub(crate) flag_c: bool,

    /// Total clock ticks seen, including stolen ones
    pub(crate) cycles: u64,

    phase: Phase,

    /// Opcode latched by the last fetch
    opcode: u8,

    /// Idle ticks left before the next execute (or fetch)
    remaining: u8,

    /// Set while parked on a JAM or unknown opcode
    stalled: bool,

    /// Memory bus implementation
    pub(crate) memory: M,
}

impl<M: MemoryBus> CPU<M> {
    /// Creates a new CPU with the given memory bus.
    ///
    /// The CPU is initialized to the power-on reset state:
    /// - PC is loaded from the reset vector at 0xFFFC/0xFFFD
    /// - SP is 0xFD
    /// - I is set
    /// - A, X, Y and the cycle counter are zero
    pub fn new(memory: M) -> Self {
        let pc = memory.read_word(RESET_VECTOR);

        Self {
            a: 0x00,
            x: 0x00,
            y: 0x00,
            pc,
            sp: 0xFD,
            flag_n: false,
            flag_v: false,
            flag_b: false,
            flag_d: false,
            flag_i: true,
            flag_z: false,
            flag_c: false,
            cycles: 0,
            phase: Phase::Fetching,
            opcode: 0,
            remaining: 0,
            stalled: false,
            memory,
        }
    }

    /// Performs a hardware reset: reloads PC from the reset vector, sets I
    /// and drops any in-flight instruction. Memory is untouched.
    pub fn reset(&mut self) {
        self.pc = self.memory.read_word(RESET_VECTOR);
        self.sp = 0xFD;
        self.flag_i = true;
        self.flag_d = false;
        self.phase = Phase::Fetching;
        self.remaining = 0;
        self.stalled = false;
    }

    /// Advances the CPU by one clock cycle.
    ///
    /// Returns `true` on the tick an instruction finished executing.
    pub fn tick(&mut self) -> bool {
        self.cycles += 1;

        if self.memory.bus_busy() {
            return false;
        }

        if self.remaining > 0 {
            self.remaining -= 1;
            return false;
        }

        match self.phase {
            Phase::Fetching => {
                self.fetch();
                false
            }
            Phase::Executing => {
                self.execute();
                true
            }
        }
    }

    fn fetch(&mut self) {
        let opcode = self.memory.read(self.pc);
        let metadata = &OPCODE_TABLE[opcode as usize];

        if !metadata.legal {
            if !self.stalled {
                match metadata.mnemonic {
                    Some(mnemonic) => warn!(
                        "{} (${:02X}) at ${:04X}: CPU halted",
                        mnemonic, opcode, self.pc
                    ),
                    None => warn!(
                        "unknown opcode ${:02X} at ${:04X}: CPU stalled",
                        opcode, self.pc
                    ),
                }
                self.stalled = true;
            }
            return;
        }

        self.stalled = false;
        self.opcode = opcode;
        self.pc = self.pc.wrapping_add(1);
        self.remaining = metadata.base_cycles.saturating_sub(2);
        self.phase = Phase::Executing;
    }

    fn execute(&mut self) {
        let metadata = OPCODE_TABLE[self.opcode as usize];
        let penalty = match metadata.mnemonic {
            Some(mnemonic) => instructions::execute(self, mnemonic, metadata.addressing_mode),
            None => 0,
        };

        self.phase = Phase::Fetching;
        self.remaining = penalty;
        self.service_interrupts();
    }

    /// Polls NMI, then IRQ (when I is clear), and enters the handler.
    fn service_interrupts(&mut self) {
        let entry = if self.memory.poll_nmi() {
            Entry::Nmi
        } else if !self.flag_i && self.memory.irq_active() {
            Entry::Irq
        } else {
            return;
        };

        self.enter_interrupt(self.pc, entry);
        self.remaining = self.remaining.saturating_add(INTERRUPT_CYCLES);
    }

    /// Pushes the return address and status and jumps through the vector for
    /// `entry`. IRQ and BRK set I; NMI leaves it alone.
    pub(crate) fn enter_interrupt(&mut self, return_address: u16, entry: Entry) {
        self.push((return_address >> 8) as u8);
        self.push(return_address as u8);
        let status = match entry {
            Entry::Brk => self.status() | 0b0001_0000,
            Entry::Irq | Entry::Nmi => self.status() & !0b0001_0000,
        };
        self.push(status);

        let vector = match entry {
            Entry::Nmi => NMI_VECTOR,
            Entry::Irq | Entry::Brk => {
                self.flag_i = true;
                IRQ_VECTOR
            }
        };
        self.pc = self.memory.read_word(vector);
    }

    /// Ticks until the next instruction boundary and returns the ticks used.
    ///
    /// Idle ticks charged after the instruction (page-cross and branch
    /// penalties, interrupt entry) are included. A stalled CPU returns after
    /// a single tick.
    pub fn step(&mut self) -> u64 {
        let start = self.cycles;

        loop {
            let retired = self.tick();
            if retired || self.stalled {
                break;
            }
        }

        while self.phase == Phase::Fetching && self.remaining > 0 && !self.stalled {
            self.tick();
        }

        self.cycles - start
    }

    /// Runs the CPU for exactly `cycle_budget` ticks.
    pub fn run_for_cycles(&mut self, cycle_budget: u64) -> u64 {
        for _ in 0..cycle_budget {
            self.tick();
        }
        cycle_budget
    }

    // ========== Operand Resolution ==========

    /// Reads the operand bytes for `mode` at PC, advances PC past them and
    /// returns the operand plus whether indexing crossed a page.
    pub(crate) fn resolve(&mut self, mode: AddressingMode) -> (Operand, bool) {
        let operand_addr = self.pc;
        self.pc = self.pc.wrapping_add(mode.operand_bytes() as u16);

        match mode {
            AddressingMode::Implied => (Operand::Accumulator, false),
            AddressingMode::Immediate => (Operand::Address(operand_addr), false),
            AddressingMode::Relative => {
                let offset = self.memory.read(operand_addr) as i8;
                let target = self.pc.wrapping_add(offset as u16);
                (Operand::Address(target), (target & 0xFF00) != (self.pc & 0xFF00))
            }
            AddressingMode::Absolute => {
                (Operand::Address(self.memory.read_word(operand_addr)), false)
            }
            AddressingMode::ZeroPage => {
                (Operand::Address(self.memory.read(operand_addr) as u16), false)
            }
            AddressingMode::AbsoluteX => {
                let base = self.memory.read_word(operand_addr);
                Self::indexed(base, self.x)
            }
            AddressingMode::AbsoluteY => {
                let base = self.memory.read_word(operand_addr);
                Self::indexed(base, self.y)
            }
            AddressingMode::ZeroPageX => {
                let zp = self.memory.read(operand_addr).wrapping_add(self.x);
                (Operand::Address(zp as u16), false)
            }
            AddressingMode::ZeroPageY => {
                let zp = self.memory.read(operand_addr).wrapping_add(self.y);
                (Operand::Address(zp as u16), false)
            }
            AddressingMode::Indirect => {
                let ptr = self.memory.read_word(operand_addr);
                (Operand::Address(self.memory.read_word_page_wrapped(ptr)), false)
            }
            AddressingMode::IndirectX => {
                let zp = self.memory.read(operand_addr).wrapping_add(self.x);
                (Operand::Address(self.read_zero_page_word(zp)), false)
            }
            AddressingMode::IndirectY => {
                let zp = self.memory.read(operand_addr);
                let base = self.read_zero_page_word(zp);
                Self::indexed(base, self.y)
            }
        }
    }

    fn indexed(base: u16, index: u8) -> (Operand, bool) {
        let addr = base.wrapping_add(index as u16);
        (Operand::Address(addr), (base & 0xFF00) != (addr & 0xFF00))
    }

    fn read_zero_page_word(&self, zp: u8) -> u16 {
        let lo = self.memory.read(zp as u16) as u16;
        let hi = self.memory.read(zp.wrapping_add(1) as u16) as u16;
        (hi << 8) | lo
    }

    pub(crate) fn read_operand(&self, operand: Operand) -> u8 {
        match operand {
            Operand::Accumulator => self.a,
            Operand::Address(addr) => self.memory.read(addr),
        }
    }

    pub(crate) fn write_operand(&mut self, operand: Operand, value: u8) {
        match operand {
            Operand::Accumulator => self.a = value,
            Operand::Address(addr) => self.memory.write(addr, value),
        }
    }

    pub(crate) fn set_nz(&mut self, value: u8) {
        self.flag_z = value == 0;
        self.flag_n = (value & 0x80) != 0;
    }

    // ========== Stack ==========

    /// Pushes a byte at $0100+SP and decrements SP.
    pub fn push(&mut self, value: u8) {
        self.memory.write(0x0100 | self.sp as u16, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    /// Increments SP and pulls the byte at $0100+SP.
    pub fn pull(&mut self) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        self.memory.read(0x0100 | self.sp as u16)
    }

    // ========== State ==========

    /// Returns `true` when the next tick will fetch an opcode.
    pub fn at_instruction_boundary(&self) -> bool {
        self.phase == Phase::Fetching && self.remaining == 0
    }

    /// Returns `true` while parked on a JAM or unknown opcode.
    pub fn is_stalled(&self) -> bool {
        self.stalled
    }

    /// Returns the current execution phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Captures the complete register and sequencing state.
    pub fn state(&self) -> CpuState {
        CpuState {
            a: self.a,
            x: self.x,
            y: self.y,
            pc: self.pc,
            sp: self.sp,
            flag_n: self.flag_n,
            flag_v: self.flag_v,
            flag_b: self.flag_b,
            flag_d: self.flag_d,
            flag_i: self.flag_i,
            flag_z: self.flag_z,
            flag_c: self.flag_c,
            cycles: self.cycles,
            phase: self.phase,
            opcode: self.opcode,
            remaining: self.remaining,
            stalled: self.stalled,
        }
    }

    /// Restores state captured by [`CPU::state`].
    pub fn restore_state(&mut self, state: &CpuState) {
        self.a = state.a;
        self.x = state.x;
        self.y = state.y;
        self.pc = state.pc;
        self.sp = state.sp;
        self.flag_n = state.flag_n;
        self.flag_v = state.flag_v;
        self.flag_b = state.flag_b;
        self.flag_d = state.flag_d;
        self.flag_i = state.flag_i;
        self.flag_z = state.flag_z;
        self.flag_c = state.flag_c;
        self.cycles = state.cycles;
        self.phase = state.phase;
        self.opcode = state.opcode;
        self.remaining = state.remaining;
        self.stalled = state.stalled;
    }

    /// Borrows the memory bus.
    pub fn memory(&self) -> &M {
        &self.memory
    }

    /// Mutably borrows the memory bus.
    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    // ========== Register Getters ==========

    /// Returns the accumulator register value.
    pub fn a(&self) -> u8 {
        self.a
    }

    /// Returns the X index register value.
    pub fn x(&self) -> u8 {
        self.x
    }

    /// Returns the Y index register value.
    pub fn y(&self) -> u8 {
        self.y
    }

    /// Returns the program counter value.
    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Returns the stack pointer value.
    ///
    /// The full stack address is 0x0100 + SP. The stack grows downward from 0x01FF.
    pub fn sp(&self) -> u8 {
        self.sp
    }

    /// Returns the status register as a packed byte.
    ///
    /// Bit layout (NV-BDIZC); bit 5 always reads as 1.
    pub fn status(&self) -> u8 {
        let mut status: u8 = 0b0010_0000;

        if self.flag_n {
            status |= 0b1000_0000;
        }
        if self.flag_v {
            status |= 0b0100_0000;
        }
        if self.flag_b {
            status |= 0b0001_0000;
        }
        if self.flag_d {
            status |= 0b0000_1000;
        }
        if self.flag_i {
            status |= 0b0000_0100;
        }
        if self.flag_z {
            status |= 0b0000_0010;
        }
        if self.flag_c {
            status |= 0b0000_0001;
        }

        status
    }

    /// Returns the total number of clock ticks seen since initialization.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    // ========== Status Flag Getters ==========

    pub fn flag_n(&self) -> bool {
        self.flag_n
    }

    pub fn flag_v(&self) -> bool {
        self.flag_v
    }

    pub fn flag_b(&self) -> bool {
        self.flag_b
    }

    pub fn flag_d(&self) -> bool {
        self.flag_d
    }

    pub fn flag_i(&self) -> bool {
        self.flag_i
    }

    pub fn flag_z(&self) -> bool {
        self.flag_z
    }

    pub fn flag_c(&self) -> bool {
        self.flag_c
    }

    // ========== Setters ==========

    pub fn set_a(&mut self, value: u8) {
        self.a = value;
    }

    pub fn set_x(&mut self, value: u8) {
        self.x = value;
    }

    pub fn set_y(&mut self, value: u8) {
        self.y = value;
    }

    pub fn set_sp(&mut self, value: u8) {
        self.sp = value;
    }

    /// Moves execution to `pc`, abandoning any in-flight instruction.
    pub fn set_pc(&mut self, pc: u16) {
        self.pc = pc;
        self.phase = Phase::Fetching;
        self.remaining = 0;
        self.stalled = false;
    }

    /// Unpacks a status byte into the flags. Bits 4 and 5 are ignored.
    pub fn set_status(&mut self, value: u8) {
        self.flag_n = (value & 0b1000_0000) != 0;
        self.flag_v = (value & 0b0100_0000) != 0;
        self.flag_d = (value & 0b0000_1000) != 0;
        self.flag_i = (value & 0b0000_0100) != 0;
        self.flag_z = (value & 0b0000_0010) != 0;
        self.flag_c = (value & 0b0000_0001) != 0;
    }

    pub fn set_flag_n(&mut self, value: bool) {
        self.flag_n = value;
    }

    pub fn set_flag_v(&mut self, value: bool) {
        self.flag_v = value;
    }

    pub fn set_flag_b(&mut self, value: bool) {
        self.flag_b = value;
    }

    pub fn set_flag_d(&mut self, value: bool) {
        self.flag_d = value;
    }

    pub fn set_flag_i(&mut self, value: bool) {
        self.flag_i = value;
    }

    pub fn set_flag_z(&mut self, value: bool) {
        self.flag_z = value;
    }

    pub fn set_flag_c(&mut self, value: bool) {
        self.flag_c = value;
    }
}
