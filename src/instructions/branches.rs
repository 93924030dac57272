//! # Branch Instructions
//!
//! BCC, BCS, BEQ, BNE, BMI, BPL, BVC, BVS share one implementation; the
//! dispatcher evaluates the flag condition.
//!
//! Cycle timing:
//! - 2 cycles if not taken
//! - +1 cycle if taken
//! - +1 more if the target is on a different page than the next instruction

use crate::{addressing::Operand, AddressingMode, MemoryBus, CPU};

/// Executes a relative branch when `taken` holds.
pub(crate) fn execute_branch<M: MemoryBus>(
    cpu: &mut CPU<M>,
    mode: AddressingMode,
    taken: bool,
) -> u8 {
    let (operand, crossed) = cpu.resolve(mode);

    match operand {
        Operand::Address(target) if taken => {
            cpu.pc = target;
            if crossed {
                2
            } else {
                1
            }
        }
        _ => 0,
    }
}
