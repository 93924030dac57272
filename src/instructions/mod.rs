//! # 6502 Instruction Implementations
//!
//! This module contains the implementations of all documented 6502 instructions,
//! organized by category. Each instruction is a standalone function that takes a
//! mutable reference to the CPU and the addressing mode, resolves its operand
//! (advancing PC past the operand bytes) and returns the number of penalty
//! cycles to charge before the next fetch.
//!
//! ## Categories
//!
//! - **alu**: Arithmetic and logic operations (ADC, SBC, AND, ORA, EOR, CMP, CPX, CPY, BIT)
//! - **branches**: Conditional branch instructions (BCC, BCS, BEQ, BNE, BMI, BPL, BVC, BVS)
//! - **shifts**: Shift and rotate operations (ASL, LSR, ROL, ROR)
//! - **load_store**: Load and store instructions (LDA, LDX, LDY, STA, STX, STY)
//! - **inc_dec**: Increment and decrement operations (INC, DEC, INX, INY, DEX, DEY)
//! - **control**: Control flow instructions (JMP, JSR, RTS, RTI, BRK, NOP)
//! - **stack**: Stack operations (PHA, PHP, PLA, PLP)
//! - **flags**: Status flag manipulation (CLC, SEC, CLI, SEI, CLD, SED, CLV)
//! - **transfer**: Register transfer operations (TAX, TAY, TXA, TYA, TSX, TXS)

pub mod alu;
pub mod branches;
pub mod control;
pub mod flags;
pub mod inc_dec;
pub mod load_store;
pub mod shifts;
pub mod stack;
pub mod transfer;

use crate::{AddressingMode, MemoryBus, Mnemonic, CPU};

/// Executes one decoded instruction and returns its penalty cycles.
pub(crate) fn execute<M: MemoryBus>(
    cpu: &mut CPU<M>,
    mnemonic: Mnemonic,
    mode: AddressingMode,
) -> u8 {
    match mnemonic {
        Mnemonic::Adc => alu::execute_adc(cpu, mode),
        Mnemonic::Sbc => alu::execute_sbc(cpu, mode),
        Mnemonic::And => alu::execute_and(cpu, mode),
        Mnemonic::Ora => alu::execute_ora(cpu, mode),
        Mnemonic::Eor => alu::execute_eor(cpu, mode),
        Mnemonic::Cmp => alu::execute_cmp(cpu, mode),
        Mnemonic::Cpx => alu::execute_cpx(cpu, mode),
        Mnemonic::Cpy => alu::execute_cpy(cpu, mode),
        Mnemonic::Bit => alu::execute_bit(cpu, mode),

        Mnemonic::Bcc => {
            let taken = !cpu.flag_c;
            branches::execute_branch(cpu, mode, taken)
        }
        Mnemonic::Bcs => {
            let taken = cpu.flag_c;
            branches::execute_branch(cpu, mode, taken)
        }
        Mnemonic::Beq => {
            let taken = cpu.flag_z;
            branches::execute_branch(cpu, mode, taken)
        }
        Mnemonic::Bne => {
            let taken = !cpu.flag_z;
            branches::execute_branch(cpu, mode, taken)
        }
        Mnemonic::Bmi => {
            let taken = cpu.flag_n;
            branches::execute_branch(cpu, mode, taken)
        }
        Mnemonic::Bpl => {
            let taken = !cpu.flag_n;
            branches::execute_branch(cpu, mode, taken)
        }
        Mnemonic::Bvc => {
            let taken = !cpu.flag_v;
            branches::execute_branch(cpu, mode, taken)
        }
        Mnemonic::Bvs => {
            let taken = cpu.flag_v;
            branches::execute_branch(cpu, mode, taken)
        }

        Mnemonic::Asl => shifts::execute_asl(cpu, mode),
        Mnemonic::Lsr => shifts::execute_lsr(cpu, mode),
        Mnemonic::Rol => shifts::execute_rol(cpu, mode),
        Mnemonic::Ror => shifts::execute_ror(cpu, mode),

        Mnemonic::Lda => load_store::execute_lda(cpu, mode),
        Mnemonic::Ldx => load_store::execute_ldx(cpu, mode),
        Mnemonic::Ldy => load_store::execute_ldy(cpu, mode),
        Mnemonic::Sta => load_store::execute_sta(cpu, mode),
        Mnemonic::Stx => load_store::execute_stx(cpu, mode),
        Mnemonic::Sty => load_store::execute_sty(cpu, mode),

        Mnemonic::Inc => inc_dec::execute_inc(cpu, mode),
        Mnemonic::Dec => inc_dec::execute_dec(cpu, mode),
        Mnemonic::Inx => inc_dec::execute_inx(cpu),
        Mnemonic::Iny => inc_dec::execute_iny(cpu),
        Mnemonic::Dex => inc_dec::execute_dex(cpu),
        Mnemonic::Dey => inc_dec::execute_dey(cpu),

        Mnemonic::Brk => control::execute_brk(cpu),
        Mnemonic::Jmp => control::execute_jmp(cpu, mode),
        Mnemonic::Jsr => control::execute_jsr(cpu, mode),
        Mnemonic::Rts => control::execute_rts(cpu),
        Mnemonic::Rti => control::execute_rti(cpu),
        Mnemonic::Nop => 0,

        Mnemonic::Pha => stack::execute_pha(cpu),
        Mnemonic::Php => stack::execute_php(cpu),
        Mnemonic::Pla => stack::execute_pla(cpu),
        Mnemonic::Plp => stack::execute_plp(cpu),

        Mnemonic::Clc => flags::execute_clc(cpu),
        Mnemonic::Sec => flags::execute_sec(cpu),
        Mnemonic::Cli => flags::execute_cli(cpu),
        Mnemonic::Sei => flags::execute_sei(cpu),
        Mnemonic::Cld => flags::execute_cld(cpu),
        Mnemonic::Sed => flags::execute_sed(cpu),
        Mnemonic::Clv => flags::execute_clv(cpu),

        Mnemonic::Tax => transfer::execute_tax(cpu),
        Mnemonic::Tay => transfer::execute_tay(cpu),
        Mnemonic::Txa => transfer::execute_txa(cpu),
        Mnemonic::Tya => transfer::execute_tya(cpu),
        Mnemonic::Tsx => transfer::execute_tsx(cpu),
        Mnemonic::Txs => transfer::execute_txs(cpu),

        // Never decoded: the fetch stage parks on it.
        Mnemonic::Jam => 0,
    }
}

/// One extra cycle when a read crossed a page boundary.
#[inline]
pub(crate) fn page_penalty(crossed: bool) -> u8 {
    if crossed {
        1
    } else {
        0
    }
}
