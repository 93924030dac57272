//! # Addressing Modes
//!
//! This module defines the 12 addressing modes of the 6502/6510 processor.
//! Each mode determines how the CPU interprets operand bytes and calculates
//! effective addresses.
//!
//! Accumulator-form shifts (`ASL A`, `ROL A`, ...) are encoded as
//! [`AddressingMode::Implied`]: they take no operand bytes, and resolving the
//! mode yields [`Operand::Accumulator`].

use serde::{Deserialize, Serialize};

/// 6502 addressing mode enumeration.
///
/// # Operand Sizes
///
/// - **0 bytes**: Implied
/// - **1 byte**: Immediate, ZeroPage, ZeroPageX, ZeroPageY, Relative, IndirectX, IndirectY
/// - **2 bytes**: Absolute, AbsoluteX, AbsoluteY, Indirect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressingMode {
    /// No operand. Covers register-only instructions and accumulator shifts.
    ///
    /// Examples: CLC, RTS, LSR A
    Implied,

    /// 8-bit constant operand in instruction.
    ///
    /// Example: LDA #$10
    Immediate,

    /// Signed 8-bit offset for branch instructions, relative to the next instruction.
    Relative,

    /// Full 16-bit address.
    Absolute,

    /// 8-bit address in zero page (0x00-0xFF).
    ZeroPage,

    /// 16-bit address indexed by X. +1 cycle for reads that cross a page.
    AbsoluteX,

    /// 16-bit address indexed by Y. +1 cycle for reads that cross a page.
    AbsoluteY,

    /// Zero page address indexed by X, wrapping within zero page.
    ZeroPageX,

    /// Zero page address indexed by Y, wrapping within zero page.
    ZeroPageY,

    /// Indirect jump through a 16-bit pointer.
    ///
    /// The pointer's high byte is fetched from the start of the same page when
    /// the pointer sits at $xxFF, as on the NMOS part.
    Indirect,

    /// Indexed indirect: `($40,X)`. The pointer lives in zero page and never
    /// carries into page 1.
    IndirectX,

    /// Indirect indexed: `($40),Y`. Y is added to the dereferenced pointer with
    /// carry. +1 cycle for reads that cross a page.
    IndirectY,
}

impl AddressingMode {
    /// Number of operand bytes following the opcode.
    pub const fn operand_bytes(self) -> u8 {
        match self {
            AddressingMode::Implied => 0,
            AddressingMode::Immediate
            | AddressingMode::Relative
            | AddressingMode::ZeroPage
            | AddressingMode::ZeroPageX
            | AddressingMode::ZeroPageY
            | AddressingMode::IndirectX
            | AddressingMode::IndirectY => 1,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 2,
        }
    }
}

/// The resolved target of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// The accumulator register (implied-mode shifts).
    Accumulator,
    /// An effective memory address. For immediate mode this is the address of
    /// the operand byte itself; for relative mode it is the branch target.
    Address(u16),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operand_sizes() {
        assert_eq!(AddressingMode::Implied.operand_bytes(), 0);
        assert_eq!(AddressingMode::Immediate.operand_bytes(), 1);
        assert_eq!(AddressingMode::IndirectY.operand_bytes(), 1);
        assert_eq!(AddressingMode::Indirect.operand_bytes(), 2);
        assert_eq!(AddressingMode::AbsoluteX.operand_bytes(), 2);
    }
}
