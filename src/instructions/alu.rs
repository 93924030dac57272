//! # ALU (Arithmetic Logic Unit) Instructions
//!
//! This module implements arithmetic and logical operations:
//! - ADC, SBC: Add/Subtract with Carry (binary and decimal mode)
//! - AND, ORA, EOR: Bitwise logic
//! - CMP, CPX, CPY: Comparisons
//! - BIT: Bit test
//!
//! Decimal mode follows the NMOS part: each BCD digit is corrected separately,
//! N and Z come from the corrected result, and V is always the sign test on
//! the uncorrected binary sum or difference.

use super::page_penalty;
use crate::{AddressingMode, MemoryBus, CPU};

/// Executes the ADC (Add with Carry) instruction.
///
/// V comes from the binary sum even in decimal mode.
pub(crate) fn execute_adc<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) -> u8 {
    let (operand, crossed) = cpu.resolve(mode);
    let value = cpu.read_operand(operand);
    let a = cpu.a;
    let carry_in = cpu.flag_c as u8;

    let sum = a as u16 + value as u16 + carry_in as u16;
    let binary = sum as u8;

    let (result, carry) = if cpu.flag_d {
        add_decimal(a, value, carry_in)
    } else {
        (binary, sum > 0xFF)
    };

    // Overflow: both operands share a sign the result does not
    cpu.flag_v = ((a ^ binary) & (value ^ binary) & 0x80) != 0;
    cpu.flag_c = carry;
    cpu.a = result;
    cpu.set_nz(result);

    page_penalty(crossed)
}

/// Executes the SBC (Subtract with Carry) instruction.
///
/// The carry flag is an inverted borrow: SBC computes `A - M - (1 - C)`.
/// C and V come from the binary difference even in decimal mode.
pub(crate) fn execute_sbc<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) -> u8 {
    let (operand, crossed) = cpu.resolve(mode);
    let value = cpu.read_operand(operand);
    let a = cpu.a;
    let borrow = (!cpu.flag_c) as i16;

    let difference = a as i16 - value as i16 - borrow;
    let binary = difference as u8;

    let result = if cpu.flag_d {
        subtract_decimal(a, value, borrow)
    } else {
        binary
    };

    cpu.flag_v = ((a ^ binary) & (a ^ value) & 0x80) != 0;
    cpu.flag_c = difference >= 0;
    cpu.a = result;
    cpu.set_nz(result);

    page_penalty(crossed)
}

fn add_decimal(a: u8, value: u8, carry_in: u8) -> (u8, bool) {
    let mut lo = (a & 0x0F) as u16 + (value & 0x0F) as u16 + carry_in as u16;
    let mut hi = (a >> 4) as u16 + (value >> 4) as u16;

    if lo > 0x09 {
        lo += 0x06;
    }
    if lo > 0x0F {
        hi += 1;
    }
    if hi > 0x09 {
        hi += 0x06;
    }

    let result = ((hi & 0x0F) << 4) as u8 | (lo & 0x0F) as u8;
    (result, hi > 0x0F)
}

fn subtract_decimal(a: u8, value: u8, borrow: i16) -> u8 {
    let mut lo = (a & 0x0F) as i16 - (value & 0x0F) as i16 - borrow;
    let mut hi = (a >> 4) as i16 - (value >> 4) as i16;

    if lo < 0 {
        lo += 10;
        hi -= 1;
    }
    if hi < 0 {
        hi += 10;
    }

    (((hi & 0x0F) << 4) | (lo & 0x0F)) as u8
}

/// Executes the AND (Logical AND) instruction.
pub(crate) fn execute_and<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) -> u8 {
    let (operand, crossed) = cpu.resolve(mode);
    let result = cpu.a & cpu.read_operand(operand);
    cpu.a = result;
    cpu.set_nz(result);
    page_penalty(crossed)
}

/// Executes the ORA (Logical Inclusive OR) instruction.
pub(crate) fn execute_ora<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) -> u8 {
    let (operand, crossed) = cpu.resolve(mode);
    let result = cpu.a | cpu.read_operand(operand);
    cpu.a = result;
    cpu.set_nz(result);
    page_penalty(crossed)
}

/// Executes the EOR (Exclusive OR) instruction.
pub(crate) fn execute_eor<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) -> u8 {
    let (operand, crossed) = cpu.resolve(mode);
    let result = cpu.a ^ cpu.read_operand(operand);
    cpu.a = result;
    cpu.set_nz(result);
    page_penalty(crossed)
}

fn compare<M: MemoryBus>(cpu: &mut CPU<M>, register: u8, value: u8) {
    let result = register.wrapping_sub(value);
    cpu.flag_c = register >= value;
    cpu.set_nz(result);
}

/// Executes the CMP (Compare Accumulator) instruction.
pub(crate) fn execute_cmp<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) -> u8 {
    let (operand, crossed) = cpu.resolve(mode);
    let value = cpu.read_operand(operand);
    let register = cpu.a;
    compare(cpu, register, value);
    page_penalty(crossed)
}

/// Executes the CPX (Compare X Register) instruction.
pub(crate) fn execute_cpx<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) -> u8 {
    let (operand, _) = cpu.resolve(mode);
    let value = cpu.read_operand(operand);
    let register = cpu.x;
    compare(cpu, register, value);
    0
}

/// Executes the CPY (Compare Y Register) instruction.
pub(crate) fn execute_cpy<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) -> u8 {
    let (operand, _) = cpu.resolve(mode);
    let value = cpu.read_operand(operand);
    let register = cpu.y;
    compare(cpu, register, value);
    0
}

/// Executes the BIT (Bit Test) instruction.
///
/// Z reflects `A & M`; N and V are copied from bits 7 and 6 of the operand.
pub(crate) fn execute_bit<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) -> u8 {
    let (operand, _) = cpu.resolve(mode);
    let value = cpu.read_operand(operand);
    cpu.flag_z = (cpu.a & value) == 0;
    cpu.flag_n = (value & 0x80) != 0;
    cpu.flag_v = (value & 0x40) != 0;
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_decimal_digit_carry() {
        assert_eq!(add_decimal(0x05, 0x05, 0), (0x10, false));
        assert_eq!(add_decimal(0x99, 0x01, 0), (0x00, true));
        assert_eq!(add_decimal(0x99, 0x99, 1), (0x99, true));
        assert_eq!(add_decimal(0x12, 0x34, 1), (0x47, false));
    }

    #[test]
    fn test_subtract_decimal_borrow() {
        assert_eq!(subtract_decimal(0x10, 0x01, 0), 0x09);
        assert_eq!(subtract_decimal(0x00, 0x01, 0), 0x99);
        assert_eq!(subtract_decimal(0x50, 0x25, 1), 0x24);
    }
}
