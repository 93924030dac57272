//! Tests for ADC and SBC in binary and decimal mode.

use lib6510::{FlatMemory, MemoryBus, CPU};

fn setup_cpu() -> CPU<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    CPU::new(memory)
}

/// Runs a single immediate-mode instruction with the given accumulator and carry.
fn run_immediate(opcode: u8, a: u8, operand: u8, carry: bool, decimal: bool) -> CPU<FlatMemory> {
    let mut cpu = setup_cpu();
    cpu.memory_mut().write(0x8000, opcode);
    cpu.memory_mut().write(0x8001, operand);
    cpu.set_a(a);
    cpu.set_flag_c(carry);
    cpu.set_flag_d(decimal);
    cpu.step();
    cpu
}

// ========== Binary ADC ==========

#[test]
fn test_adc_simple_add() {
    let cpu = run_immediate(0x69, 0x10, 0x20, false, false);
    assert_eq!(cpu.a(), 0x30);
    assert!(!cpu.flag_c());
    assert!(!cpu.flag_v());
}

#[test]
fn test_adc_carry_in_and_out() {
    let cpu = run_immediate(0x69, 0xFF, 0x00, true, false);
    assert_eq!(cpu.a(), 0x00);
    assert!(cpu.flag_c());
    assert!(cpu.flag_z());
}

#[test]
fn test_adc_signed_overflow() {
    // 0x50 + 0x50 = 0xA0: positive + positive = negative
    let cpu = run_immediate(0x69, 0x50, 0x50, false, false);
    assert_eq!(cpu.a(), 0xA0);
    assert!(cpu.flag_v());
    assert!(cpu.flag_n());
    assert!(!cpu.flag_c());
}

#[test]
fn test_adc_negative_overflow() {
    // 0x90 + 0x90 = 0x120: negative + negative = positive
    let cpu = run_immediate(0x69, 0x90, 0x90, false, false);
    assert_eq!(cpu.a(), 0x20);
    assert!(cpu.flag_v());
    assert!(cpu.flag_c());
}

// ========== Binary SBC ==========

#[test]
fn test_sbc_no_borrow() {
    let cpu = run_immediate(0xE9, 0x50, 0x20, true, false);
    assert_eq!(cpu.a(), 0x30);
    assert!(cpu.flag_c());
}

#[test]
fn test_sbc_with_borrow_in() {
    let cpu = run_immediate(0xE9, 0x50, 0x20, false, false);
    assert_eq!(cpu.a(), 0x2F);
    assert!(cpu.flag_c());
}

#[test]
fn test_sbc_underflow_clears_carry() {
    let cpu = run_immediate(0xE9, 0x00, 0x01, true, false);
    assert_eq!(cpu.a(), 0xFF);
    assert!(!cpu.flag_c());
    assert!(cpu.flag_n());
}

#[test]
fn test_sbc_signed_overflow() {
    // 0x80 - 0x01 = 0x7F: negative - positive = positive
    let cpu = run_immediate(0xE9, 0x80, 0x01, true, false);
    assert_eq!(cpu.a(), 0x7F);
    assert!(cpu.flag_v());
}

// ========== Decimal mode ==========

#[test]
fn test_adc_decimal_basic() {
    let cpu = run_immediate(0x69, 0x15, 0x27, false, true);
    assert_eq!(cpu.a(), 0x42);
    assert!(!cpu.flag_c());
}

#[test]
fn test_adc_decimal_carry_out() {
    let cpu = run_immediate(0x69, 0x58, 0x46, true, true);
    assert_eq!(cpu.a(), 0x05);
    assert!(cpu.flag_c());
}

#[test]
fn test_adc_decimal_wraps_to_zero() {
    let cpu = run_immediate(0x69, 0x99, 0x01, false, true);
    assert_eq!(cpu.a(), 0x00);
    assert!(cpu.flag_c());
    assert!(cpu.flag_z());
}

#[test]
fn test_sbc_decimal_basic() {
    let cpu = run_immediate(0xE9, 0x42, 0x15, true, true);
    assert_eq!(cpu.a(), 0x27);
    assert!(cpu.flag_c());
}

#[test]
fn test_sbc_decimal_borrow_out() {
    let cpu = run_immediate(0xE9, 0x10, 0x20, true, true);
    assert_eq!(cpu.a(), 0x90);
    assert!(!cpu.flag_c());
}

#[test]
fn test_adc_decimal_overflow_from_binary_sum() {
    // $79 + $00 + 1: binary $7A keeps its sign, BCD result is $80
    let cpu = run_immediate(0x69, 0x79, 0x00, true, true);
    assert_eq!(cpu.a(), 0x80);
    assert!(!cpu.flag_v());
    assert!(cpu.flag_n());
}

#[test]
fn test_sbc_decimal_overflow_from_binary_difference() {
    // $80 - $01: binary $7F flips sign, BCD result is $79
    let cpu = run_immediate(0xE9, 0x80, 0x01, true, true);
    assert_eq!(cpu.a(), 0x79);
    assert!(cpu.flag_v());
    assert!(cpu.flag_c());
}

// ========== Compare and logic ==========

#[test]
fn test_cmp_sets_carry_when_greater_or_equal() {
    let cpu = run_immediate(0xC9, 0x40, 0x40, false, false);
    assert!(cpu.flag_c());
    assert!(cpu.flag_z());

    let cpu = run_immediate(0xC9, 0x30, 0x40, false, false);
    assert!(!cpu.flag_c());
    assert!(cpu.flag_n());
}

#[test]
fn test_bit_copies_operand_bits() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().write(0x8000, 0x24);
    cpu.memory_mut().write(0x8001, 0x10);
    cpu.memory_mut().write(0x0010, 0xC0);
    cpu.set_a(0x01);

    let used = cpu.step();

    assert!(cpu.flag_z());
    assert!(cpu.flag_n());
    assert!(cpu.flag_v());
    assert_eq!(used, 3);
}

#[test]
fn test_eor_and_ora() {
    let cpu = run_immediate(0x49, 0xFF, 0x0F, false, false);
    assert_eq!(cpu.a(), 0xF0);
    let cpu = run_immediate(0x09, 0x80, 0x01, false, false);
    assert_eq!(cpu.a(), 0x81);
    let cpu = run_immediate(0x29, 0xF0, 0x0F, false, false);
    assert!(cpu.flag_z());
}
