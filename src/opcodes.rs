//! # Opcode Metadata Table
//!
//! This module contains the 256-entry opcode metadata table that serves as the
//! single source of truth for instruction decoding.
//!
//! The table covers:
//! - **151 documented instructions** - Official NMOS 6502 opcodes
//! - **`$02` (JAM)** - The one undocumented opcode that is modeled: it halts the CPU
//! - **104 unknown opcodes** - `mnemonic: None`; fetching one stalls the CPU
//!
//! Each entry holds the mnemonic, addressing mode, base cycle cost (excluding
//! page-crossing and branch penalties) and a legality flag. Instruction size is
//! derived from the addressing mode.

use crate::addressing::AddressingMode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of instruction mnemonics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mnemonic {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
    /// Undocumented halt (`$02`).
    Jam,
}

impl Mnemonic {
    /// Upper-case assembler name, e.g. `"LDA"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Mnemonic::Adc => "ADC",
            Mnemonic::And => "AND",
            Mnemonic::Asl => "ASL",
            Mnemonic::Bcc => "BCC",
            Mnemonic::Bcs => "BCS",
            Mnemonic::Beq => "BEQ",
            Mnemonic::Bit => "BIT",
            Mnemonic::Bmi => "BMI",
            Mnemonic::Bne => "BNE",
            Mnemonic::Bpl => "BPL",
            Mnemonic::Brk => "BRK",
            Mnemonic::Bvc => "BVC",
            Mnemonic::Bvs => "BVS",
            Mnemonic::Clc => "CLC",
            Mnemonic::Cld => "CLD",
            Mnemonic::Cli => "CLI",
            Mnemonic::Clv => "CLV",
            Mnemonic::Cmp => "CMP",
            Mnemonic::Cpx => "CPX",
            Mnemonic::Cpy => "CPY",
            Mnemonic::Dec => "DEC",
            Mnemonic::Dex => "DEX",
            Mnemonic::Dey => "DEY",
            Mnemonic::Eor => "EOR",
            Mnemonic::Inc => "INC",
            Mnemonic::Inx => "INX",
            Mnemonic::Iny => "INY",
            Mnemonic::Jmp => "JMP",
            Mnemonic::Jsr => "JSR",
            Mnemonic::Lda => "LDA",
            Mnemonic::Ldx => "LDX",
            Mnemonic::Ldy => "LDY",
            Mnemonic::Lsr => "LSR",
            Mnemonic::Nop => "NOP",
            Mnemonic::Ora => "ORA",
            Mnemonic::Pha => "PHA",
            Mnemonic::Php => "PHP",
            Mnemonic::Pla => "PLA",
            Mnemonic::Plp => "PLP",
            Mnemonic::Rol => "ROL",
            Mnemonic::Ror => "ROR",
            Mnemonic::Rti => "RTI",
            Mnemonic::Rts => "RTS",
            Mnemonic::Sbc => "SBC",
            Mnemonic::Sec => "SEC",
            Mnemonic::Sed => "SED",
            Mnemonic::Sei => "SEI",
            Mnemonic::Sta => "STA",
            Mnemonic::Stx => "STX",
            Mnemonic::Sty => "STY",
            Mnemonic::Tax => "TAX",
            Mnemonic::Tay => "TAY",
            Mnemonic::Tsx => "TSX",
            Mnemonic::Txa => "TXA",
            Mnemonic::Txs => "TXS",
            Mnemonic::Tya => "TYA",
            Mnemonic::Jam => "JAM",
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata for a single opcode.
///
/// # Examples
///
/// ```
/// use lib6510::{AddressingMode, Mnemonic, OPCODE_TABLE};
///
/// let lda_imm = &OPCODE_TABLE[0xA9];
/// assert_eq!(lda_imm.mnemonic, Some(Mnemonic::Lda));
/// assert_eq!(lda_imm.addressing_mode, AddressingMode::Immediate);
/// assert_eq!(lda_imm.base_cycles, 2);
/// assert_eq!(lda_imm.size_bytes(), 2);
/// assert!(lda_imm.legal);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeMetadata {
    /// Instruction mnemonic, `None` for unknown opcodes.
    pub mnemonic: Option<Mnemonic>,

    /// Addressing mode for this instruction.
    pub addressing_mode: AddressingMode,

    /// Base cycle cost (before page crossing and branch penalties).
    ///
    /// Documented instructions take 2-7 cycles. Unknown opcodes carry 0.
    pub base_cycles: u8,

    /// Whether this is a documented opcode.
    pub legal: bool,
}

impl OpcodeMetadata {
    /// Total instruction size in bytes (opcode + operands).
    pub const fn size_bytes(&self) -> u8 {
        1 + self.addressing_mode.operand_bytes()
    }
}

const UNKNOWN: OpcodeMetadata = OpcodeMetadata {
    mnemonic: None,
    addressing_mode: AddressingMode::Implied,
    base_cycles: 0,
    legal: false,
};

use AddressingMode::*;
use Mnemonic::*;

const DEFINITIONS: [(u8, Mnemonic, AddressingMode, u8); 152] = [
    (0x69, Adc, Immediate, 2),
    (0x65, Adc, ZeroPage, 3),
    (0x75, Adc, ZeroPageX, 4),
    (0x6D, Adc, Absolute, 4),
    (0x7D, Adc, AbsoluteX, 4),
    (0x79, Adc, AbsoluteY, 4),
    (0x61, Adc, IndirectX, 6),
    (0x71, Adc, IndirectY, 5),
    (0x29, And, Immediate, 2),
    (0x25, And, ZeroPage, 3),
    (0x35, And, ZeroPageX, 4),
    (0x2D, And, Absolute, 4),
    (0x3D, And, AbsoluteX, 4),
    (0x39, And, AbsoluteY, 4),
    (0x21, And, IndirectX, 6),
    (0x31, And, IndirectY, 5),
    (0x0A, Asl, Implied, 2),
    (0x06, Asl, ZeroPage, 5),
    (0x16, Asl, ZeroPageX, 6),
    (0x0E, Asl, Absolute, 6),
    (0x1E, Asl, AbsoluteX, 7),
    (0x90, Bcc, Relative, 2),
    (0xB0, Bcs, Relative, 2),
    (0xF0, Beq, Relative, 2),
    (0x30, Bmi, Relative, 2),
    (0xD0, Bne, Relative, 2),
    (0x10, Bpl, Relative, 2),
    (0x50, Bvc, Relative, 2),
    (0x70, Bvs, Relative, 2),
    (0x24, Bit, ZeroPage, 3),
    (0x2C, Bit, Absolute, 4),
    (0x00, Brk, Implied, 7),
    (0x18, Clc, Implied, 2),
    (0xD8, Cld, Implied, 2),
    (0x58, Cli, Implied, 2),
    (0xB8, Clv, Implied, 2),
    (0xC9, Cmp, Immediate, 2),
    (0xC5, Cmp, ZeroPage, 3),
    (0xD5, Cmp, ZeroPageX, 4),
    (0xCD, Cmp, Absolute, 4),
    (0xDD, Cmp, AbsoluteX, 4),
    (0xD9, Cmp, AbsoluteY, 4),
    (0xC1, Cmp, IndirectX, 6),
    (0xD1, Cmp, IndirectY, 5),
    (0xE0, Cpx, Immediate, 2),
    (0xE4, Cpx, ZeroPage, 3),
    (0xEC, Cpx, Absolute, 4),
    (0xC0, Cpy, Immediate, 2),
    (0xC4, Cpy, ZeroPage, 3),
    (0xCC, Cpy, Absolute, 4),
    (0xC6, Dec, ZeroPage, 5),
    (0xD6, Dec, ZeroPageX, 6),
    (0xCE, Dec, Absolute, 6),
    (0xDE, Dec, AbsoluteX, 7),
    (0xCA, Dex, Implied, 2),
    (0x88, Dey, Implied, 2),
    (0x49, Eor, Immediate, 2),
    (0x45, Eor, ZeroPage, 3),
    (0x55, Eor, ZeroPageX, 4),
    (0x4D, Eor, Absolute, 4),
    (0x5D, Eor, AbsoluteX, 4),
    (0x59, Eor, AbsoluteY, 4),
    (0x41, Eor, IndirectX, 6),
    (0x51, Eor, IndirectY, 5),
    (0xE6, Inc, ZeroPage, 5),
    (0xF6, Inc, ZeroPageX, 6),
    (0xEE, Inc, Absolute, 6),
    (0xFE, Inc, AbsoluteX, 7),
    (0xE8, Inx, Implied, 2),
    (0xC8, Iny, Implied, 2),
    (0x4C, Jmp, Absolute, 3),
    (0x6C, Jmp, Indirect, 5),
    (0x20, Jsr, Absolute, 6),
    (0xA9, Lda, Immediate, 2),
    (0xA5, Lda, ZeroPage, 3),
    (0xB5, Lda, ZeroPageX, 4),
    (0xAD, Lda, Absolute, 4),
    (0xBD, Lda, AbsoluteX, 4),
    (0xB9, Lda, AbsoluteY, 4),
    (0xA1, Lda, IndirectX, 6),
    (0xB1, Lda, IndirectY, 5),
    (0xA2, Ldx, Immediate, 2),
    (0xA6, Ldx, ZeroPage, 3),
    (0xB6, Ldx, ZeroPageY, 4),
    (0xAE, Ldx, Absolute, 4),
    (0xBE, Ldx, AbsoluteY, 4),
    (0xA0, Ldy, Immediate, 2),
    (0xA4, Ldy, ZeroPage, 3),
    (0xB4, Ldy, ZeroPageX, 4),
    (0xAC, Ldy, Absolute, 4),
    (0xBC, Ldy, AbsoluteX, 4),
    (0x4A, Lsr, Implied, 2),
    (0x46, Lsr, ZeroPage, 5),
    (0x56, Lsr, ZeroPageX, 6),
    (0x4E, Lsr, Absolute, 6),
    (0x5E, Lsr, AbsoluteX, 7),
    (0xEA, Nop, Implied, 2),
    (0x09, Ora, Immediate, 2),
    (0x05, Ora, ZeroPage, 3),
    (0x15, Ora, ZeroPageX, 4),
    (0x0D, Ora, Absolute, 4),
    (0x1D, Ora, AbsoluteX, 4),
    (0x19, Ora, AbsoluteY, 4),
    (0x01, Ora, IndirectX, 6),
    (0x11, Ora, IndirectY, 5),
    (0x48, Pha, Implied, 3),
    (0x08, Php, Implied, 3),
    (0x68, Pla, Implied, 4),
    (0x28, Plp, Implied, 4),
    (0x2A, Rol, Implied, 2),
    (0x26, Rol, ZeroPage, 5),
    (0x36, Rol, ZeroPageX, 6),
    (0x2E, Rol, Absolute, 6),
    (0x3E, Rol, AbsoluteX, 7),
    (0x6A, Ror, Implied, 2),
    (0x66, Ror, ZeroPage, 5),
    (0x76, Ror, ZeroPageX, 6),
    (0x6E, Ror, Absolute, 6),
    (0x7E, Ror, AbsoluteX, 7),
    (0x40, Rti, Implied, 6),
    (0x60, Rts, Implied, 6),
    (0xE9, Sbc, Immediate, 2),
    (0xE5, Sbc, ZeroPage, 3),
    (0xF5, Sbc, ZeroPageX, 4),
    (0xED, Sbc, Absolute, 4),
    (0xFD, Sbc, AbsoluteX, 4),
    (0xF9, Sbc, AbsoluteY, 4),
    (0xE1, Sbc, IndirectX, 6),
    (0xF1, Sbc, IndirectY, 5),
    (0x38, Sec, Implied, 2),
    (0xF8, Sed, Implied, 2),
    (0x78, Sei, Implied, 2),
    (0x85, Sta, ZeroPage, 3),
    (0x95, Sta, ZeroPageX, 4),
    (0x8D, Sta, Absolute, 4),
    (0x9D, Sta, AbsoluteX, 5),
    (0x99, Sta, AbsoluteY, 5),
    (0x81, Sta, IndirectX, 6),
    (0x91, Sta, IndirectY, 6),
    (0x86, Stx, ZeroPage, 3),
    (0x96, Stx, ZeroPageY, 4),
    (0x8E, Stx, Absolute, 4),
    (0x84, Sty, ZeroPage, 3),
    (0x94, Sty, ZeroPageX, 4),
    (0x8C, Sty, Absolute, 4),
    (0xAA, Tax, Implied, 2),
    (0xA8, Tay, Implied, 2),
    (0xBA, Tsx, Implied, 2),
    (0x8A, Txa, Implied, 2),
    (0x9A, Txs, Implied, 2),
    (0x98, Tya, Implied, 2),
    (0x02, Jam, Implied, 2),
];

const fn build_table() -> [OpcodeMetadata; 256] {
    let mut table = [UNKNOWN; 256];
    let mut i = 0;
    while i < DEFINITIONS.len() {
        let (opcode, mnemonic, addressing_mode, base_cycles) = DEFINITIONS[i];
        table[opcode as usize] = OpcodeMetadata {
            mnemonic: Some(mnemonic),
            addressing_mode,
            base_cycles,
            legal: !matches!(mnemonic, Jam),
        };
        i += 1;
    }
    table
}

/// Complete 256-entry opcode metadata table indexed by opcode byte value.
///
/// ```
/// use lib6510::{Mnemonic, OPCODE_TABLE};
///
/// let brk = &OPCODE_TABLE[0x00];
/// assert_eq!(brk.mnemonic, Some(Mnemonic::Brk));
/// assert_eq!(brk.base_cycles, 7);
///
/// let jam = &OPCODE_TABLE[0x02];
/// assert_eq!(jam.mnemonic, Some(Mnemonic::Jam));
/// assert!(!jam.legal);
///
/// assert_eq!(OPCODE_TABLE[0x03].mnemonic, None);
/// ```
pub static OPCODE_TABLE: [OpcodeMetadata; 256] = build_table();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_opcode_count() {
        let legal = OPCODE_TABLE.iter().filter(|m| m.legal).count();
        assert_eq!(legal, 151);
    }

    #[test]
    fn test_no_duplicate_definitions() {
        let mut seen = [false; 256];
        for (opcode, _, _, _) in DEFINITIONS.iter() {
            assert!(!seen[*opcode as usize], "duplicate opcode {:02X}", opcode);
            seen[*opcode as usize] = true;
        }
    }

    #[test]
    fn test_legal_opcodes_have_cycles() {
        for (opcode, meta) in OPCODE_TABLE.iter().enumerate() {
            if meta.legal {
                assert!(
                    (2..=7).contains(&meta.base_cycles),
                    "opcode {:02X} has {} cycles",
                    opcode,
                    meta.base_cycles
                );
            }
        }
    }

    #[test]
    fn test_instruction_sizes() {
        assert_eq!(OPCODE_TABLE[0xEA].size_bytes(), 1);
        assert_eq!(OPCODE_TABLE[0xA9].size_bytes(), 2);
        assert_eq!(OPCODE_TABLE[0x6C].size_bytes(), 3);
    }
}
