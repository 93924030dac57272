//! Property-based tests for CPU invariants.
//!
//! These tests use proptest to verify that CPU operations maintain
//! fundamental arithmetic and sequencing laws across all inputs.

use lib6510::{FlatMemory, MemoryBus, CPU, OPCODE_TABLE};
use proptest::prelude::*;

/// Helper function to create a CPU with reset vector at 0x8000
fn setup_cpu() -> CPU<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    CPU::new(memory)
}

fn to_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

/// Opcodes that fall through to the next instruction.
fn sequential_opcodes() -> Vec<u8> {
    use lib6510::Mnemonic::*;
    OPCODE_TABLE
        .iter()
        .enumerate()
        .filter(|(_, m)| {
            m.legal
                && !matches!(
                    m.mnemonic,
                    Some(
                        Bcc | Bcs | Beq | Bmi | Bne | Bpl | Bvc | Bvs | Jmp | Jsr | Rts | Rti | Brk
                    )
                )
        })
        .map(|(i, _)| i as u8)
        .collect()
}

proptest! {
    /// ADC followed by SBC of the same operand restores A in binary mode.
    #[test]
    fn prop_adc_then_sbc_restores_a(a in any::<u8>(), m in any::<u8>(), carry in any::<bool>()) {
        let mut cpu = setup_cpu();
        // ADC #m; SBC #m
        cpu.memory_mut().load(0x8000, &[0x69, m, 0xE9, m]);
        cpu.set_a(a);
        cpu.set_flag_c(carry);
        cpu.set_flag_d(false);

        cpu.step();
        cpu.set_flag_c(!carry);
        cpu.step();

        prop_assert_eq!(cpu.a(), a);
    }

    /// Decimal ADC of valid BCD operands is (a + b + c) mod 100.
    #[test]
    fn prop_decimal_adc_matches_bcd_sum(a in 0u8..100, b in 0u8..100, carry in any::<bool>()) {
        let mut cpu = setup_cpu();
        cpu.memory_mut().load(0x8000, &[0x69, to_bcd(b)]);
        cpu.set_a(to_bcd(a));
        cpu.set_flag_c(carry);
        cpu.set_flag_d(true);

        cpu.step();

        let sum = a as u16 + b as u16 + carry as u16;
        prop_assert_eq!(cpu.a(), to_bcd((sum % 100) as u8));
        prop_assert_eq!(cpu.flag_c(), sum >= 100);
        prop_assert_eq!(cpu.flag_z(), sum % 100 == 0);
    }

    /// Decimal SBC of valid BCD operands is (a - b - borrow) mod 100.
    #[test]
    fn prop_decimal_sbc_matches_bcd_difference(a in 0u8..100, b in 0u8..100, carry in any::<bool>()) {
        let mut cpu = setup_cpu();
        cpu.memory_mut().load(0x8000, &[0xE9, to_bcd(b)]);
        cpu.set_a(to_bcd(a));
        cpu.set_flag_c(carry);
        cpu.set_flag_d(true);

        cpu.step();

        let difference = a as i16 - b as i16 - (!carry) as i16;
        prop_assert_eq!(cpu.a(), to_bcd(difference.rem_euclid(100) as u8));
        prop_assert_eq!(cpu.flag_c(), difference >= 0);
    }

    /// Pushes and pulls are last-in first-out for any pair of bytes.
    #[test]
    fn prop_stack_lifo(first in any::<u8>(), second in any::<u8>(), sp in any::<u8>()) {
        let mut cpu = setup_cpu();
        cpu.set_sp(sp);

        cpu.push(first);
        cpu.push(second);

        prop_assert_eq!(cpu.pull(), second);
        prop_assert_eq!(cpu.pull(), first);
        prop_assert_eq!(cpu.sp(), sp);
    }

    /// Sequential instructions advance PC by exactly their size.
    #[test]
    fn prop_pc_advances_by_instruction_size(
        opcode in prop::sample::select(sequential_opcodes()),
        operand1 in any::<u8>(),
        operand2 in 0u8..0x7F,
    ) {
        let mut cpu = setup_cpu();
        cpu.memory_mut().load(0x8000, &[opcode, operand1, operand2]);

        cpu.step();

        let size = OPCODE_TABLE[opcode as usize].size_bytes() as u16;
        prop_assert_eq!(cpu.pc(), 0x8000 + size);
    }

    /// Every documented instruction takes at least its base cycle cost.
    #[test]
    fn prop_step_costs_at_least_base_cycles(
        opcode in prop::sample::select(sequential_opcodes()),
        operand1 in any::<u8>(),
        operand2 in 0u8..0x7F,
    ) {
        let mut cpu = setup_cpu();
        cpu.memory_mut().load(0x8000, &[opcode, operand1, operand2]);

        let used = cpu.step();

        let base = OPCODE_TABLE[opcode as usize].base_cycles as u64;
        prop_assert!(used == base || used == base + 1);
    }
}
