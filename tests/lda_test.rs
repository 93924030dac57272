//! Tests for the load instructions (LDA, LDX, LDY).
//!
//! Tests cover:
//! - Addressing modes, including zero page wrap and indirect forms
//! - Flag updates (Z, N)
//! - Cycle counts including page crossing penalties

use lib6510::{FlatMemory, MemoryBus, CPU};

/// Helper function to create a CPU with reset vector at 0x8000
fn setup_cpu() -> CPU<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    CPU::new(memory)
}

#[test]
fn test_lda_immediate_at_c000() {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0xC0);
    memory.write(0xC000, 0xA9);
    memory.write(0xC001, 0x42);
    let mut cpu = CPU::new(memory);

    cpu.step();

    assert_eq!(cpu.a(), 0x42);
    assert_eq!(cpu.pc(), 0xC002);
    assert!(!cpu.flag_n());
    assert!(!cpu.flag_z());
}

#[test]
fn test_lda_immediate_basic() {
    let mut cpu = setup_cpu();

    cpu.memory_mut().write(0x8000, 0xA9);
    cpu.memory_mut().write(0x8001, 0x42);

    let used = cpu.step();

    assert_eq!(cpu.a(), 0x42);
    assert_eq!(cpu.pc(), 0x8002);
    assert_eq!(used, 2);
    assert_eq!(cpu.cycles(), 2);
}

#[test]
fn test_lda_zero_flag() {
    let mut cpu = setup_cpu();

    cpu.memory_mut().write(0x8000, 0xA9);
    cpu.memory_mut().write(0x8001, 0x00);
    cpu.set_a(0xFF);

    cpu.step();

    assert_eq!(cpu.a(), 0x00);
    assert!(cpu.flag_z());
    assert!(!cpu.flag_n());
}

#[test]
fn test_lda_negative_flag() {
    let mut cpu = setup_cpu();

    cpu.memory_mut().write(0x8000, 0xA9);
    cpu.memory_mut().write(0x8001, 0x80);

    cpu.step();

    assert!(cpu.flag_n());
    assert!(!cpu.flag_z());
}

#[test]
fn test_lda_zero_page_x_wraps() {
    let mut cpu = setup_cpu();

    // LDA $F0,X with X=$20 reads $0010, not $0110
    cpu.memory_mut().write(0x8000, 0xB5);
    cpu.memory_mut().write(0x8001, 0xF0);
    cpu.memory_mut().write(0x0010, 0x77);
    cpu.memory_mut().write(0x0110, 0x11);
    cpu.set_x(0x20);

    let used = cpu.step();

    assert_eq!(cpu.a(), 0x77);
    assert_eq!(used, 4);
}

#[test]
fn test_lda_absolute_x_page_cross_penalty() {
    let mut cpu = setup_cpu();

    // LDA $12FF,X with X=1 reads $1300
    cpu.memory_mut().write(0x8000, 0xBD);
    cpu.memory_mut().write(0x8001, 0xFF);
    cpu.memory_mut().write(0x8002, 0x12);
    cpu.memory_mut().write(0x1300, 0x5A);
    cpu.set_x(0x01);

    let used = cpu.step();

    assert_eq!(cpu.a(), 0x5A);
    assert_eq!(used, 5);
    assert_eq!(cpu.pc(), 0x8003);
}

#[test]
fn test_lda_absolute_y_no_penalty_within_page() {
    let mut cpu = setup_cpu();

    cpu.memory_mut().write(0x8000, 0xB9);
    cpu.memory_mut().write(0x8001, 0x10);
    cpu.memory_mut().write(0x8002, 0x12);
    cpu.memory_mut().write(0x1215, 0x33);
    cpu.set_y(0x05);

    let used = cpu.step();

    assert_eq!(cpu.a(), 0x33);
    assert_eq!(used, 4);
}

#[test]
fn test_lda_indirect_x_stays_in_zero_page() {
    let mut cpu = setup_cpu();

    // LDA ($FE,X) with X=1: pointer at $FF/$00
    cpu.memory_mut().write(0x8000, 0xA1);
    cpu.memory_mut().write(0x8001, 0xFE);
    cpu.memory_mut().write(0x00FF, 0x34);
    cpu.memory_mut().write(0x0000, 0x12);
    cpu.memory_mut().write(0x0100, 0x99);
    cpu.memory_mut().write(0x1234, 0xAB);
    cpu.set_x(0x01);

    let used = cpu.step();

    assert_eq!(cpu.a(), 0xAB);
    assert_eq!(used, 6);
}

#[test]
fn test_lda_indirect_y_carries_into_next_page() {
    let mut cpu = setup_cpu();

    // LDA ($40),Y with ($40)=$12F0 and Y=$20 reads $1310
    cpu.memory_mut().write(0x8000, 0xB1);
    cpu.memory_mut().write(0x8001, 0x40);
    cpu.memory_mut().write(0x0040, 0xF0);
    cpu.memory_mut().write(0x0041, 0x12);
    cpu.memory_mut().write(0x1310, 0x66);
    cpu.set_y(0x20);

    let used = cpu.step();

    assert_eq!(cpu.a(), 0x66);
    assert_eq!(used, 6);
}

#[test]
fn test_ldx_zero_page_y() {
    let mut cpu = setup_cpu();

    cpu.memory_mut().write(0x8000, 0xB6);
    cpu.memory_mut().write(0x8001, 0x10);
    cpu.memory_mut().write(0x0013, 0x80);
    cpu.set_y(0x03);

    cpu.step();

    assert_eq!(cpu.x(), 0x80);
    assert!(cpu.flag_n());
}

#[test]
fn test_ldy_absolute() {
    let mut cpu = setup_cpu();

    cpu.memory_mut().write(0x8000, 0xAC);
    cpu.memory_mut().write(0x8001, 0x00);
    cpu.memory_mut().write(0x8002, 0x20);
    cpu.memory_mut().write(0x2000, 0x01);

    let used = cpu.step();

    assert_eq!(cpu.y(), 0x01);
    assert_eq!(used, 4);
}

#[test]
fn test_sta_absolute_x_has_no_penalty() {
    let mut cpu = setup_cpu();

    cpu.memory_mut().write(0x8000, 0x9D);
    cpu.memory_mut().write(0x8001, 0xFF);
    cpu.memory_mut().write(0x8002, 0x12);
    cpu.set_a(0x42);
    cpu.set_x(0x01);

    let used = cpu.step();

    assert_eq!(cpu.memory().read(0x1300), 0x42);
    assert_eq!(used, 5);
}
