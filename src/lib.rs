//! # 6510 CPU Core
//!
//! A tick-stepped NMOS 6502/6510 CPU core. Every call to [`CPU::tick`] is one
//! clock cycle, so the CPU can be interleaved with video and timer chips that
//! share the same clock and steal bus cycles from it.
//!
//! ## Quick Start
//!
//! ```rust
//! use lib6510::{FlatMemory, MemoryBus, CPU};
//!
//! let mut memory = FlatMemory::new();
//! memory.write(0xFFFC, 0x00);
//! memory.write(0xFFFD, 0x80);
//!
//! let cpu = CPU::new(memory);
//!
//! assert_eq!(cpu.pc(), 0x8000);
//! assert_eq!(cpu.sp(), 0xFD);
//! assert_eq!(cpu.flag_i(), true);
//! ```
//!
//! ## Modules
//!
//! - `cpu` - CPU state and the fetch/execute state machine
//! - `memory` - MemoryBus trait (bytes plus IRQ, NMI and bus arbitration)
//! - `opcodes` - Opcode metadata table
//! - `addressing` - Addressing modes and resolved operands

pub mod addressing;
pub mod cpu;
pub mod memory;
pub mod opcodes;

// Internal instruction implementations (not part of public API)
mod instructions;

// Re-export public API
pub use addressing::{AddressingMode, Operand};
pub use cpu::{CpuState, Phase, CPU, IRQ_VECTOR, NMI_VECTOR, RESET_VECTOR};
pub use memory::{FlatMemory, MemoryBus};
pub use opcodes::{Mnemonic, OpcodeMetadata, OPCODE_TABLE};
